//! Fluid-style particle simulation driven by accelerometer tilt.
//!
//! A fixed arena of point masses falls under accelerometer-derived gravity
//! with damping, wall bounces, and pairwise repulsion, then rasterizes onto
//! the matrix at full brightness. The pairwise pass is O(P^2); acceptable
//! only because the particle count is small and fixed.

use crate::display::PixelGrid;
use crate::scan::LEVEL_MAX;

/// Gravity scale applied to the accelerometer reading.
pub const GRAVITY: f32 = 0.25;
/// Velocity retained after a wall bounce.
pub const DAMPING: f32 = 0.92;
/// Component-wise velocity clamp.
pub const MAX_VELOCITY: f32 = 1.2;

/// Baseline tick the timestep normalizes against (~60 Hz).
const DT_BASELINE_MS: f32 = 16.0;
/// Per-frame velocity persistence before gravity is added.
const VELOCITY_RETAIN: f32 = 0.95;
/// Squared distance below which two particles repel.
const REPULSION_DIST2: f32 = 1.0;
/// Positional push applied to each partner of a close pair.
const REPULSION_STEP: f32 = 0.15;
/// Rows of the seed band at the bottom edge of the matrix.
const SEED_ROWS: usize = 4;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Vec2 {
    x: f32,
    y: f32,
}

/// One point mass: continuous position (x = column, y = row) and velocity.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Particle {
    position: Vec2,
    velocity: Vec2,
}

impl Particle {
    /// Continuous `(x, y)` position in matrix coordinates.
    #[must_use]
    pub fn position(&self) -> (f32, f32) {
        (self.position.x, self.position.y)
    }

    /// Current `(x, y)` velocity.
    #[must_use]
    pub fn velocity(&self) -> (f32, f32) {
        (self.velocity.x, self.velocity.y)
    }
}

/// Fixed-count particle arena bounded to a `W x H` matrix.
///
/// Particles are allocated once, seeded into a band of rows at the bottom
/// edge with zero velocity, and mutated in place every tick; none are ever
/// created or destroyed afterwards.
pub struct Fluid<const P: usize, const W: usize, const H: usize> {
    particles: [Particle; P],
}

impl<const P: usize, const W: usize, const H: usize> Fluid<P, W, H> {
    /// Seed all particles into the bottom rows, resting.
    ///
    /// The band fills top to bottom; when `P` exceeds the band's cell count
    /// the surplus wraps into the rows above it, one cell per particle, so
    /// no two particles ever share a seed cell.
    #[must_use]
    pub fn new() -> Self {
        const {
            assert!(P <= W * H, "more particles than matrix cells");
        }
        let mut particles = [Particle::default(); P];
        let band_top = H.saturating_sub(SEED_ROWS);
        let mut index = 0;
        'seed: for row in (band_top..H).chain((0..band_top).rev()) {
            for col in 0..W {
                if index >= P {
                    break 'seed;
                }
                particles[index].position = Vec2 {
                    x: col as f32,
                    y: row as f32,
                };
                index += 1;
            }
        }
        Self { particles }
    }

    /// The particle arena, read-only.
    #[must_use]
    pub fn particles(&self) -> &[Particle; P] {
        &self.particles
    }

    /// Advance the simulation by `elapsed_ms` under lateral acceleration
    /// `(ax, ay)` in g.
    ///
    /// The timestep normalizes against a 16 ms baseline, and the gravity
    /// vector is the accelerometer reading rotated a quarter turn
    /// (`(-ay, ax)`) to match the board's mounting. Velocities stay clamped
    /// to [`MAX_VELOCITY`] per component and positions to the matrix bounds.
    pub fn step(&mut self, ax: f32, ay: f32, elapsed_ms: u32) {
        let dt = elapsed_ms as f32 / DT_BASELINE_MS;
        let gravity = Vec2 {
            x: -ay * GRAVITY * dt,
            y: ax * GRAVITY * dt,
        };

        let x_max = (W - 1) as f32;
        let y_max = (H - 1) as f32;

        for particle in &mut self.particles {
            let velocity = &mut particle.velocity;
            velocity.x = (velocity.x * VELOCITY_RETAIN + gravity.x).clamp(-MAX_VELOCITY, MAX_VELOCITY);
            velocity.y = (velocity.y * VELOCITY_RETAIN + gravity.y).clamp(-MAX_VELOCITY, MAX_VELOCITY);

            let mut new_x = particle.position.x + velocity.x;
            let mut new_y = particle.position.y + velocity.y;

            // Wall bounce: clamp position, reflect and damp the offending
            // velocity component so it points back into the matrix.
            if new_x < 0.0 {
                new_x = 0.0;
                velocity.x = libm::fabsf(velocity.x) * DAMPING;
            } else if new_x >= x_max {
                new_x = x_max;
                velocity.x = -libm::fabsf(velocity.x) * DAMPING;
            }
            if new_y < 0.0 {
                new_y = 0.0;
                velocity.y = libm::fabsf(velocity.y) * DAMPING;
            } else if new_y >= y_max {
                new_y = y_max;
                velocity.y = -libm::fabsf(velocity.y) * DAMPING;
            }

            particle.position = Vec2 { x: new_x, y: new_y };
        }

        self.repel_pairs();
    }

    /// Push apart every pair closer than one cell and merge their velocities.
    ///
    /// An approximate inelastic collision: both partners move a fixed step
    /// along the line connecting them and take the average velocity, which
    /// suppresses overlap and high-frequency jitter. The push can point
    /// through a wall, so both positions re-clamp to the matrix bounds.
    fn repel_pairs(&mut self) {
        let x_max = (W - 1) as f32;
        let y_max = (H - 1) as f32;
        for first in 0..P {
            for second in (first + 1)..P {
                let dx = self.particles[second].position.x - self.particles[first].position.x;
                let dy = self.particles[second].position.y - self.particles[first].position.y;
                let dist2 = dx * dx + dy * dy;
                if dist2 >= REPULSION_DIST2 {
                    continue;
                }

                // Unit vector from first toward second; coincident particles
                // separate along +x.
                let dist = libm::sqrtf(dist2);
                let (unit_x, unit_y) = if dist > 0.0 {
                    (dx / dist, dy / dist)
                } else {
                    (1.0, 0.0)
                };

                self.particles[first].position.x -= unit_x * REPULSION_STEP;
                self.particles[first].position.y -= unit_y * REPULSION_STEP;
                self.particles[second].position.x += unit_x * REPULSION_STEP;
                self.particles[second].position.y += unit_y * REPULSION_STEP;
                for index in [first, second] {
                    let position = &mut self.particles[index].position;
                    position.x = position.x.clamp(0.0, x_max);
                    position.y = position.y.clamp(0.0, y_max);
                }

                let average = Vec2 {
                    x: (self.particles[first].velocity.x + self.particles[second].velocity.x) * 0.5,
                    y: (self.particles[first].velocity.y + self.particles[second].velocity.y) * 0.5,
                };
                self.particles[first].velocity = average;
                self.particles[second].velocity = average;
            }
        }
    }

    /// Rasterize the particles: clear the display, then light the nearest
    /// cell to each particle at full brightness. No anti-aliasing.
    pub fn render(&self, grid: &impl PixelGrid) {
        grid.clear();
        for particle in &self.particles {
            let col = (libm::roundf(particle.position.x) as i32).clamp(0, W as i32 - 1) as usize;
            let row = (libm::roundf(particle.position.y) as i32).clamp(0, H as i32 - 1) as usize;
            grid.set_pixel(row, col, LEVEL_MAX);
        }
    }
}

impl<const P: usize, const W: usize, const H: usize> Default for Fluid<P, W, H> {
    fn default() -> Self {
        Self::new()
    }
}
