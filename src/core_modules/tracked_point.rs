// THEORY:
// The `tracked_point` module turns a per-frame list of merged regions into a
// single stable cursor position for one color channel. Raw detections jitter:
// the box center jumps with every glare flicker and partial occlusion. The
// filter smooths this by keeping a running position and letting recent
// detections pull it toward themselves.
//
// Key architectural principles:
// 1.  **Marker Decay Weighting**: every detection drops a synthetic marker at
//     the region center. Markers shrink each frame; a marker of radius `r`
//     pulls the running position toward itself by the fraction
//     `sqrt(r) / 16`. Fresh (large) markers pull hardest, so the filter
//     behaves like a critically-damped low-pass tracker biased toward
//     recently-confirmed detections, while old markers fade out instead of
//     dropping off a history cliff.
// 2.  **Hold On Silence**: with zero detections in a frame the position is
//     simply unchanged. A missed frame is not evidence the marker moved.
// 3.  **Session Lifetime**: one `TrackedPoint` per channel, created once and
//     updated every frame; it is never destroyed mid-session.

use std::collections::VecDeque;

use crate::core_modules::regions::MergedRegion;

/// Initial radius of a detection marker.
const MARKER_RADIUS: f64 = 16.0;
/// Radius lost per frame; a marker lives MARKER_RADIUS / MARKER_SHRINK frames.
const MARKER_SHRINK: f64 = 2.0;
/// Divisor converting a marker radius into a pull fraction.
const PULL_DIVISOR: f64 = 16.0;

/// A shrinking detection marker. Exposed for the rendering boundary, which
/// draws the fading per-channel detection trail from these.
#[derive(Debug, Clone, Copy)]
pub struct Marker {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

/// The smoothed cursor for one color channel.
#[derive(Debug, Clone)]
pub struct TrackedPoint {
    x: f64,
    y: f64,
    prev_x: f64,
    prev_y: f64,
    markers: VecDeque<Marker>,
}

impl TrackedPoint {
    /// Creates a cursor at rest at the given position (normally screen center).
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            prev_x: x,
            prev_y: y,
            markers: VecDeque::new(),
        }
    }

    /// Folds one frame's merged regions into the running position.
    pub fn update(&mut self, regions: &[MergedRegion]) {
        self.prev_x = self.x;
        self.prev_y = self.y;

        for region in regions {
            let (cx, cy) = region.center();
            self.markers.push_back(Marker {
                x: cx,
                y: cy,
                radius: MARKER_RADIUS,
            });
        }

        // Oldest first: newer markers get the last word each frame.
        for marker in &self.markers {
            let pull = marker.radius.max(0.0).sqrt() / PULL_DIVISOR;
            self.x += (marker.x - self.x) * pull;
            self.y += (marker.y - self.y) * pull;
        }

        for marker in &mut self.markers {
            marker.radius -= MARKER_SHRINK;
        }
        self.markers.retain(|m| m.radius > 0.0);
    }

    /// Current smoothed position.
    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Position before the most recent update.
    pub fn previous(&self) -> (f64, f64) {
        (self.prev_x, self.prev_y)
    }

    /// Displacement over the last update, in px/frame.
    pub fn velocity(&self) -> (f64, f64) {
        (self.x - self.prev_x, self.y - self.prev_y)
    }

    /// Euclidean distance moved over the last update.
    pub fn speed(&self) -> f64 {
        let (vx, vy) = self.velocity();
        vx.hypot(vy)
    }

    /// Live detection markers, oldest first.
    pub fn markers(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::regions::MergedRegion;

    fn detection(x: u32, y: u32) -> MergedRegion {
        MergedRegion {
            x,
            y,
            w: 0,
            h: 0,
            color: (255, 255, 255),
        }
    }

    #[test]
    fn holds_position_with_zero_detections() {
        let mut point = TrackedPoint::new(100.0, 100.0);
        point.update(&[]);
        assert_eq!(point.position(), (100.0, 100.0));
        assert_eq!(point.velocity(), (0.0, 0.0));
    }

    #[test]
    fn detection_pulls_cursor_toward_region_center() {
        let mut point = TrackedPoint::new(0.0, 0.0);
        point.update(&[detection(100, 100)]);
        let (x, y) = point.position();
        assert!(x > 0.0 && x < 100.0);
        assert!(y > 0.0 && y < 100.0);
        assert!(point.speed() > 0.0);
    }

    #[test]
    fn repeated_detections_converge_on_the_center() {
        let mut point = TrackedPoint::new(0.0, 0.0);
        for _ in 0..60 {
            point.update(&[detection(100, 100)]);
        }
        let (x, y) = point.position();
        assert!((x - 100.0).abs() < 1.0, "x = {}", x);
        assert!((y - 100.0).abs() < 1.0, "y = {}", y);
    }

    #[test]
    fn markers_fade_out() {
        let mut point = TrackedPoint::new(0.0, 0.0);
        point.update(&[detection(50, 50)]);
        assert_eq!(point.markers().count(), 1);
        for _ in 0..((MARKER_RADIUS / MARKER_SHRINK) as usize + 1) {
            point.update(&[]);
        }
        assert_eq!(point.markers().count(), 0);
    }
}
