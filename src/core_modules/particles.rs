// THEORY:
// The `particles` module provides the juice: every slice event emits a burst
// of a few hundred colored specks at the contact point, flying radially and
// falling under the same gravity constant as the targets. Particles are pure
// feedback; nothing reads them back.
//
// Key architectural principles:
// 1.  **Burst Construction**: a burst is a one-shot allocation of particles
//     with uniformly random directions and speeds up to a fixed strength,
//     tinted with the sliced target's own color.
// 2.  **Self-Terminating**: `tick` advances one particle and reports whether
//     it is still on screen; the session retains the survivors. A particle's
//     life ends only by falling past the bottom bound.

use rand::Rng;

use crate::core_modules::color_convert::Bgr;
use crate::core_modules::targets::GRAVITY;

/// Particles per slice burst.
pub const BURST_COUNT: usize = 300;
/// Maximum initial radial speed, in px/frame.
pub const BURST_STRENGTH: f64 = 8.0;

/// One speck of a slice burst.
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub size: f64,
    pub gravity: f64,
    pub color: Bgr,
}

impl Particle {
    /// Advances one frame. Returns false once the particle has fallen fully
    /// past `bottom`.
    pub fn tick(&mut self, bottom: f64) -> bool {
        self.x += self.vx;
        self.y += self.vy;
        self.vy += self.gravity;
        self.y - self.size <= bottom
    }
}

/// Emits a radial burst of `BURST_COUNT` particles at the contact point.
pub fn burst<R: Rng + ?Sized>(x: f64, y: f64, color: Bgr, rng: &mut R) -> Vec<Particle> {
    (0..BURST_COUNT)
        .map(|_| {
            let angle = rng.random_range(0.0..std::f64::consts::TAU);
            let speed = rng.random_range(0.0..BURST_STRENGTH);
            Particle {
                x,
                y,
                vx: angle.cos() * speed,
                vy: angle.sin() * speed,
                size: rng.random_range(1.0..3.0),
                gravity: GRAVITY,
                color,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn burst_emits_the_full_count_at_the_contact_point() {
        let mut rng = StdRng::seed_from_u64(1);
        let particles = burst(50.0, 60.0, (0, 255, 0), &mut rng);
        assert_eq!(particles.len(), BURST_COUNT);
        for p in &particles {
            assert_eq!((p.x, p.y), (50.0, 60.0));
            assert!(p.vx.hypot(p.vy) <= BURST_STRENGTH);
            assert_eq!(p.color, (0, 255, 0));
        }
    }

    #[test]
    fn particle_dies_below_the_bottom_bound() {
        let mut particle = Particle {
            x: 0.0,
            y: 0.0,
            vx: 0.0,
            vy: 10.0,
            size: 2.0,
            gravity: GRAVITY,
            color: (255, 255, 255),
        };
        let bottom = 100.0;
        let mut frames = 0;
        while particle.tick(bottom) {
            frames += 1;
            assert!(frames < 1000, "particle never fell past the bound");
        }
        assert!(particle.y - particle.size > bottom);
    }
}
