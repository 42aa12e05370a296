// THEORY:
// The `game` module is the counterpart of `pipeline`: where the pipeline turns
// pixels into cursors, the session turns cursors into play. It owns every
// entity pool (targets, particles, per-channel trails), the spawner, the
// collision engine, the score, and the round clock, and advances all of them
// exactly once per `tick`.
//
// Key architectural principles:
// 1.  **Owned Pools, Borrowed Per Tick**: the session owns the pools; the
//     collision engine borrows the target pool mutably and the probe list
//     read-only for one tick and holds nothing across ticks.
// 2.  **Fixed Tick Order**: trail extension -> trail decay -> physics +
//     collision -> spawn -> cleanup. Newly spawned targets are therefore
//     never collision-tested in their spawn tick, and removal always sees
//     fully advanced positions.
// 3.  **Score Is A Sink**: the session accumulates the score; comparing it
//     against the persisted high score is the settings collaborator's
//     business (`Settings::record_score`).

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::core_modules::collision::{CollisionEngine, Probe};
use crate::core_modules::particles::Particle;
use crate::core_modules::targets::{Target, TargetSpawner};
use crate::core_modules::trail::Trail;
use crate::pipeline::FrameReport;

/// Radius of the cursor's own collision probe, in px.
const CURSOR_PROBE_RADIUS: f64 = 16.0;

/// Game-side configuration, supplied by the settings collaborator.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub screen_width: u32,
    pub screen_height: u32,
    pub target_frame_rate: u32,
    pub target_radius: f64,
    pub round_duration_seconds: u32,
    /// Number of tracked channels; the session keeps one trail per channel.
    pub channel_count: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: 640,
            screen_height: 480,
            target_frame_rate: 30,
            target_radius: 15.0,
            round_duration_seconds: 60,
            channel_count: 3,
        }
    }
}

/// One round of the slicing game.
pub struct GameSession {
    config: GameConfig,
    spawner: TargetSpawner,
    engine: CollisionEngine,
    rng: StdRng,
    targets: Vec<Target>,
    particles: Vec<Particle>,
    trails: Vec<Trail>,
    score: u32,
    frame_count: u64,
}

impl GameSession {
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Deterministic session for tests and replays.
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, rng: StdRng) -> Self {
        let spawner = TargetSpawner::new(
            config.screen_width as f64,
            config.screen_height as f64,
            config.target_frame_rate,
            config.target_radius,
        );
        let engine = CollisionEngine::new(config.screen_height as f64);
        let trails = (0..config.channel_count).map(|_| Trail::new()).collect();
        Self {
            config,
            spawner,
            engine,
            rng,
            targets: Vec::new(),
            particles: Vec::new(),
            trails,
            score: 0,
            frame_count: 0,
        }
    }

    /// Advances the game one frame using the pipeline's report for that frame.
    pub fn tick(&mut self, report: &FrameReport) {
        self.frame_count += 1;

        // Trail first, so this frame's travel is probed this frame.
        for (trail, channel) in self.trails.iter_mut().zip(&report.channels) {
            trail.decay();
            trail.extend(channel.previous, channel.cursor);
        }

        let mut probes = Vec::new();
        for (trail, channel) in self.trails.iter().zip(&report.channels) {
            let (vx, vy) = channel.velocity;
            probes.push(Probe {
                x: channel.cursor.0,
                y: channel.cursor.1,
                radius: CURSOR_PROBE_RADIUS,
                vx,
                vy,
            });
            for segment in trail.segments() {
                probes.push(Probe {
                    x: segment.x,
                    y: segment.y,
                    radius: segment.radius,
                    vx,
                    vy,
                });
            }
        }

        let cuts = self
            .engine
            .step(&mut self.targets, &mut self.particles, &probes, &mut self.rng);
        if cuts > 0 {
            self.score += cuts;
            log::debug!("{} cut(s), score now {}", cuts, self.score);
        }

        self.spawner.tick(&mut self.rng, &mut self.targets);
        self.engine.cleanup(&mut self.targets, &mut self.particles);
    }

    /// Places a target into the pool directly, bypassing the spawner.
    pub fn inject_target(&mut self, target: Target) {
        self.targets.push(target);
    }

    /// True once the round clock has run out.
    pub fn finished(&self) -> bool {
        let round_frames =
            self.config.round_duration_seconds as u64 * self.config.target_frame_rate as u64;
        self.frame_count >= round_frames
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn trails(&self) -> &[Trail] {
        &self.trails
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}

/// Draws the game entities - targets, particles, trails - onto `frame`.
pub fn draw_entities(frame: &mut crate::core_modules::segmenter::BgrImage, session: &GameSession) {
    use crate::core_modules::targets::Phase;
    use imageproc::drawing::draw_filled_circle_mut;

    for target in session.targets() {
        let (b, g, r) = target.color;
        let color = image::Rgb([b, g, r]);
        let radius = target.radius as i32;
        match &target.phase {
            Phase::Intact { x, y, .. } => {
                draw_filled_circle_mut(frame, (*x as i32, *y as i32), radius, color);
            }
            Phase::Cut {
                left_x,
                left_y,
                right_x,
                right_y,
                ..
            } => {
                let half = (radius / 2).max(1);
                draw_filled_circle_mut(frame, (*left_x as i32, *left_y as i32), half, color);
                draw_filled_circle_mut(frame, (*right_x as i32, *right_y as i32), half, color);
            }
        }
    }

    for particle in session.particles() {
        let (b, g, r) = particle.color;
        draw_filled_circle_mut(
            frame,
            (particle.x as i32, particle.y as i32),
            particle.size.max(1.0) as i32,
            image::Rgb([b, g, r]),
        );
    }
}
