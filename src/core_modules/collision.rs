// THEORY:
// The `collision` module resolves one tick of the physics half of the game:
// advance every target, test every intact target against the cursor probes,
// and turn proximity into an irreversible cut. It borrows the target and
// particle pools mutably for exactly one tick and reads the probe list; it
// holds nothing across ticks.
//
// Key architectural principles:
// 1.  **Advance, Then Test**: physics integration runs before the proximity
//     test, so a crossing within the same tick is resolved against the
//     already-advanced target position. The ordering is deterministic.
// 2.  **Probes, Not Cursors**: the engine doesn't know about channels. It
//     sees a flat list of probe points - each channel's current cursor plus
//     its trail samples - carrying the radius to test with and the cursor's
//     instantaneous velocity for the slice angle.
// 3.  **Cut Exactly Once**: a hit on an intact target transitions it to Cut,
//     scores one point, and bursts particles; further probes in the same or
//     any later tick see a cut target and skip it. The slice angle is
//     `atan(-vy / vx)`, with a vertical fallback of pi/2 when `vx == 0`.

use rand::Rng;

use crate::core_modules::particles::{self, Particle};
use crate::core_modules::targets::Target;

/// Minimum and maximum horizontal separation speed of the two halves.
const SEPARATION_MIN: f64 = 0.5;
const SEPARATION_MAX: f64 = 2.5;

/// One collision probe: a point on a cursor's current path.
#[derive(Debug, Clone, Copy)]
pub struct Probe {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    /// The owning cursor's instantaneous velocity, used for the slice angle.
    pub vx: f64,
    pub vy: f64,
}

impl Probe {
    /// Slice angle from the cursor's instantaneous velocity.
    pub fn slice_angle(&self) -> f64 {
        if self.vx == 0.0 {
            std::f64::consts::FRAC_PI_2
        } else {
            (-self.vy / self.vx).atan()
        }
    }
}

/// Resolves physics and slicing for the entity pools it is lent each tick.
pub struct CollisionEngine {
    bottom: f64,
}

impl CollisionEngine {
    pub fn new(bottom: f64) -> Self {
        Self { bottom }
    }

    /// Advances all targets and particles one frame, then resolves slices.
    /// Returns the number of cuts this tick (the score delta).
    pub fn step<R: Rng + ?Sized>(
        &self,
        targets: &mut [Target],
        particles: &mut Vec<Particle>,
        probes: &[Probe],
        rng: &mut R,
    ) -> u32 {
        for target in targets.iter_mut() {
            target.integrate();
        }
        for particle in particles.iter_mut() {
            particle.tick(self.bottom);
        }

        let mut cuts = 0;
        for target in targets.iter_mut() {
            let Some((cx, cy)) = target.intact_center() else {
                continue;
            };
            let Some(probe) = probes
                .iter()
                .find(|p| (p.x - cx).hypot(p.y - cy) < p.radius + target.radius)
            else {
                continue;
            };

            let left_vx = -rng.random_range(SEPARATION_MIN..SEPARATION_MAX);
            let right_vx = rng.random_range(SEPARATION_MIN..SEPARATION_MAX);
            if target.cut(probe.slice_angle(), left_vx, right_vx) {
                cuts += 1;
                particles.extend(particles::burst(cx, cy, target.color, rng));
            }
        }

        cuts
    }

    /// Drops every target whose halves have all left the screen and every
    /// particle below the bottom bound.
    pub fn cleanup(&self, targets: &mut Vec<Target>, particles: &mut Vec<Particle>) {
        targets.retain(|t| !t.is_below(self.bottom));
        particles.retain(|p| p.y - p.size <= self.bottom);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::targets::Phase;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn still_probe(x: f64, y: f64) -> Probe {
        Probe {
            x,
            y,
            radius: 16.0,
            vx: 0.0,
            vy: 0.0,
        }
    }

    fn hovering_target(x: f64, y: f64) -> Target {
        // Launch, then cancel the vertical motion so the proximity geometry
        // stays put across the few frames a test runs.
        let mut target = Target::launch(x, y - 15.0, 0.0, 30.0, 0.0, 15.0, 0);
        target.vy = 0.0;
        if let Phase::Intact { y: ty, .. } = &mut target.phase {
            *ty = y;
        }
        target
    }

    #[test]
    fn vertical_cursor_motion_slices_at_right_angle() {
        let probe = Probe {
            x: 0.0,
            y: 0.0,
            radius: 10.0,
            vx: 0.0,
            vy: -12.0,
        };
        assert_eq!(probe.slice_angle(), std::f64::consts::FRAC_PI_2);
    }

    #[test]
    fn slice_angle_follows_velocity() {
        let probe = Probe {
            x: 0.0,
            y: 0.0,
            radius: 10.0,
            vx: 5.0,
            vy: -5.0,
        };
        assert!((probe.slice_angle() - std::f64::consts::FRAC_PI_4).abs() < 1e-9);
    }

    #[test]
    fn proximity_cuts_once_with_symmetric_halves() {
        let mut rng = StdRng::seed_from_u64(3);
        let engine = CollisionEngine::new(480.0);
        let mut targets = vec![hovering_target(100.0, 100.0)];
        let mut particles = Vec::new();
        let probes = [still_probe(100.0, 100.0)];

        let mut score = 0;
        for _ in 0..3 {
            score += engine.step(&mut targets, &mut particles, &probes, &mut rng);
        }

        assert_eq!(score, 1);
        let Phase::Cut {
            left_vx, right_vx, ..
        } = targets[0].phase
        else {
            panic!("target should be cut");
        };
        assert!(left_vx <= 0.0);
        assert!(right_vx >= 0.0);
        assert_eq!(particles.len(), crate::core_modules::particles::BURST_COUNT);
    }

    #[test]
    fn distant_probe_does_not_cut() {
        let mut rng = StdRng::seed_from_u64(3);
        let engine = CollisionEngine::new(480.0);
        let mut targets = vec![hovering_target(300.0, 100.0)];
        let mut particles = Vec::new();
        let probes = [still_probe(10.0, 10.0)];

        let cuts = engine.step(&mut targets, &mut particles, &probes, &mut rng);
        assert_eq!(cuts, 0);
        assert!(targets[0].intact_center().is_some());
    }

    #[test]
    fn cleanup_drops_fallen_entities() {
        let engine = CollisionEngine::new(100.0);
        let mut fallen = hovering_target(50.0, 500.0);
        fallen.cut(0.0, -1.0, 1.0);
        let mut targets = vec![hovering_target(50.0, 50.0), fallen];
        let mut particles = vec![
            Particle {
                x: 0.0,
                y: 500.0,
                vx: 0.0,
                vy: 0.0,
                size: 2.0,
                gravity: 0.5,
                color: (0, 0, 0),
            },
            Particle {
                x: 0.0,
                y: 50.0,
                vx: 0.0,
                vy: 0.0,
                size: 2.0,
                gravity: 0.5,
                color: (0, 0, 0),
            },
        ];

        engine.cleanup(&mut targets, &mut particles);
        assert_eq!(targets.len(), 1);
        assert_eq!(particles.len(), 1);
    }
}
