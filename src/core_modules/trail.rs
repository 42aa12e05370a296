// THEORY:
// The `trail` module converts the cursor's frame-sampled motion into a dense
// path for collision testing. At high marker speeds the cursor can jump
// farther than a target's diameter in a single frame; testing only the
// endpoint would tunnel straight through targets. Subdividing the last->
// current segment into one sample per pixel of travel makes hits continuous.
//
// Key architectural principles:
// 1.  **Speed-Proportional Density**: `ceil(distance)` evenly spaced samples
//     along the straight segment, so sample spacing is at most one pixel no
//     matter how fast the cursor moves. Zero travel still yields the single
//     current point.
// 2.  **Short-Lived Segments**: each sample becomes a `TrailSegment` whose
//     radius shrinks every frame; a segment is both a collision probe and a
//     fading visual streak. At radius zero it is dropped.
// 3.  **One Trail Per Channel**: the trail owns its segments; the collision
//     engine reads them for exactly one tick.

/// Initial radius of a trail segment, in px.
pub const TRAIL_RADIUS: f64 = 12.0;
/// Radius lost per frame.
pub const TRAIL_SHRINK: f64 = 3.0;

/// One sample on the cursor's recent path.
#[derive(Debug, Clone, Copy)]
pub struct TrailSegment {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

/// Subdivides the segment `prev -> cur` into `ceil(|cur - prev|)` evenly
/// spaced points, ending exactly at `cur`. Zero distance yields `[cur]`.
pub fn sample_path(prev: (f64, f64), cur: (f64, f64)) -> Vec<(f64, f64)> {
    let dx = cur.0 - prev.0;
    let dy = cur.1 - prev.1;
    let distance = dx.hypot(dy);

    let n = distance.ceil() as usize;
    if n == 0 {
        return vec![cur];
    }

    (1..=n)
        .map(|i| {
            let t = i as f64 / n as f64;
            (prev.0 + dx * t, prev.1 + dy * t)
        })
        .collect()
}

/// The fading sample trail for one channel's cursor.
#[derive(Debug, Default)]
pub struct Trail {
    segments: Vec<TrailSegment>,
}

impl Trail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends fresh samples covering the cursor's travel this frame.
    pub fn extend(&mut self, prev: (f64, f64), cur: (f64, f64)) {
        for (x, y) in sample_path(prev, cur) {
            self.segments.push(TrailSegment {
                x,
                y,
                radius: TRAIL_RADIUS,
            });
        }
    }

    /// Shrinks every segment and drops the ones that have faded out.
    pub fn decay(&mut self) {
        for segment in &mut self.segments {
            segment.radius -= TRAIL_SHRINK;
        }
        self.segments.retain(|s| s.radius > 0.0);
    }

    pub fn segments(&self) -> &[TrailSegment] {
        &self.segments
    }
}
