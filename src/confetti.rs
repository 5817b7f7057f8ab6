use rand::Rng;
use rand::rngs::ThreadRng;
use raylib::prelude::*;

use crate::constants::*;
use crate::interval::Interval;

/// One discrete particle emission, in the shape the original confetti
/// primitive was called with. `angle` is degrees counter-clockwise from the
/// +X axis (90 fires straight up), `origin` is in viewport fractions.
pub struct Burst {
    pub particle_count: u32,
    pub angle: f32,
    pub spread: f32,
    pub start_velocity: f32,
    pub gravity: f32,
    pub ticks: u32,
    pub origin: Vector2,
    pub colors: &'static [Color],
}

struct Particle {
    position: Vector2,
    velocity: Vector2,
    gravity: f32,
    age: f32,
    lifetime: f32,
    color: Color,
    size: f32,
    rotation: f32,
    spin: f32,
}

// Burst parameters are unitless in the original library; these map them
// onto pixels per second at this window scale.
const VELOCITY_SCALE: f32 = 14.0;
const GRAVITY_SCALE: f32 = 700.0;
const TICK: f32 = 1.0 / FPS as f32;

/// Two independently scheduled burst generators behind idempotent starts
/// and an unconditional joint stop, plus the pool of particles in flight.
/// The layered 0.2 s / 0.3 s cadences read less mechanical than one timer.
pub struct ConfettiEmitter {
    side_cannons: Option<Interval>,
    falling: Option<Interval>,
    particles: Vec<Particle>,
    rng: ThreadRng,
}

impl ConfettiEmitter {
    pub fn new() -> Self {
        Self {
            side_cannons: None,
            falling: None,
            particles: Vec::new(),
            rng: rand::rng(),
        }
    }

    pub fn start_side_cannons(&mut self) {
        if self.side_cannons.is_some() {
            return;
        }
        self.side_cannons = Some(Interval::new(SIDE_CANNON_PERIOD));
    }

    pub fn start_falling(&mut self) {
        if self.falling.is_some() {
            return;
        }
        self.falling = Some(Interval::new(FALLING_PERIOD));
    }

    /// Cancels both generators; particles already in flight live out their
    /// lifetime. Safe to call in any state.
    pub fn stop_all(&mut self) {
        self.side_cannons = None;
        self.falling = None;
    }

    pub fn is_emitting(&self) -> bool {
        self.side_cannons.is_some() || self.falling.is_some()
    }

    /// Fire-and-forget emission of one burst into the pool.
    pub fn emit(&mut self, burst: &Burst, screen: Vector2) {
        for _ in 0..burst.particle_count {
            let angle = burst.angle + self.rng.random_range(-0.5..0.5) * burst.spread;
            let speed =
                burst.start_velocity * VELOCITY_SCALE * self.rng.random_range(0.75..1.25);
            let rad = angle.to_radians();
            self.particles.push(Particle {
                position: Vector2::new(burst.origin.x * screen.x, burst.origin.y * screen.y),
                // Screen Y grows downward, launch angles point up
                velocity: Vector2::new(rad.cos() * speed, -rad.sin() * speed),
                gravity: burst.gravity * GRAVITY_SCALE,
                age: 0.0,
                lifetime: burst.ticks as f32 * TICK,
                color: burst.colors[self.rng.random_range(0..burst.colors.len())],
                size: self.rng.random_range(5.0..9.0),
                rotation: self.rng.random_range(0.0..360.0),
                spin: self.rng.random_range(-240.0..240.0),
            });
        }
    }

    fn side_cannon_bursts() -> [Burst; 2] {
        let base = |angle: f32, x: f32| Burst {
            particle_count: SIDE_CANNON_COUNT,
            angle,
            spread: CONFETTI_SPREAD,
            start_velocity: SIDE_CANNON_VELOCITY,
            gravity: SIDE_CANNON_GRAVITY,
            ticks: SIDE_CANNON_TICKS,
            origin: Vector2::new(x, 0.65),
            colors: &CONFETTI_COLORS,
        };
        // Mirrored corners: bottom-left firing up-right, bottom-right up-left
        [base(60.0, 0.0), base(120.0, 1.0)]
    }

    fn falling_burst(rng: &mut ThreadRng) -> Burst {
        Burst {
            particle_count: FALLING_COUNT,
            angle: 90.0,
            spread: CONFETTI_SPREAD,
            start_velocity: FALLING_VELOCITY,
            gravity: FALLING_GRAVITY,
            ticks: FALLING_TICKS,
            origin: Vector2::new(rng.random_range(0.0..1.0), 0.0),
            colors: &CONFETTI_COLORS,
        }
    }

    pub fn update(&mut self, dt: f32, screen: Vector2) {
        let cannon_ticks = self.side_cannons.as_mut().map_or(0, |t| t.tick(dt));
        for _ in 0..cannon_ticks {
            for burst in Self::side_cannon_bursts() {
                self.emit(&burst, screen);
            }
        }
        let falling_ticks = self.falling.as_mut().map_or(0, |t| t.tick(dt));
        for _ in 0..falling_ticks {
            let burst = Self::falling_burst(&mut self.rng);
            self.emit(&burst, screen);
        }

        for p in &mut self.particles {
            p.age += dt;
            p.velocity.y += p.gravity * dt;
            p.velocity.x *= 1.0 - 0.8 * dt; // horizontal drag
            p.position.x += p.velocity.x * dt;
            p.position.y += p.velocity.y * dt;
            p.rotation += p.spin * dt;
        }
        let floor = screen.y + 40.0;
        self.particles
            .retain(|p| p.age < p.lifetime && p.position.y < floor);
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn draw(&self, d: &mut RaylibDrawHandle) {
        for p in &self.particles {
            // Fade over the last quarter of the lifetime
            let left = 1.0 - p.age / p.lifetime;
            let alpha = (left * 4.0).clamp(0.0, 1.0);
            let color = Color::new(p.color.r, p.color.g, p.color.b, (alpha * 255.0) as u8);
            d.draw_rectangle_pro(
                Rectangle::new(p.position.x, p.position.y, p.size, p.size * 0.6),
                Vector2::new(p.size * 0.5, p.size * 0.3),
                p.rotation,
                color,
            );
        }
    }
}
