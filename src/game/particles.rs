//! Short-lived visual particles spawned on pickups
//!
//! Particles never affect gameplay. Positions and velocities are in grid
//! cells, so any front end can scale them to its own units.

use rand::Rng;

use super::state::{Position, SpecialFoodKind};

const BURST_SIZE: usize = 12;
/// Maximum speed along each axis, in cells per second
const BURST_SPEED: f32 = 2.5;
const MIN_LIFETIME: f32 = 0.3;
const LIFETIME_SPREAD: f32 = 0.2;
/// Velocity multiplier applied on every update
const DAMPING: f32 = 0.95;

/// Colour family of a burst
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleTint {
    Food,
    Golden,
    Speed,
    Slow,
    Ghost,
}

impl From<SpecialFoodKind> for ParticleTint {
    fn from(kind: SpecialFoodKind) -> Self {
        match kind {
            SpecialFoodKind::Golden => ParticleTint::Golden,
            SpecialFoodKind::Speed => ParticleTint::Speed,
            SpecialFoodKind::Slow => ParticleTint::Slow,
            SpecialFoodKind::Ghost => ParticleTint::Ghost,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Seconds left
    pub lifetime: f32,
    pub max_lifetime: f32,
    pub size: f32,
    pub tint: ParticleTint,
}

impl Particle {
    /// Remaining life in [0, 1], used for fading
    pub fn alpha(&self) -> f32 {
        if self.max_lifetime <= 0.0 {
            0.0
        } else {
            (self.lifetime / self.max_lifetime).clamp(0.0, 1.0)
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a burst centred on a grid cell
    pub fn burst<R: Rng + ?Sized>(&mut self, rng: &mut R, cell: Position, tint: ParticleTint) {
        let x = cell.x as f32 + 0.5;
        let y = cell.y as f32 + 0.5;

        for _ in 0..BURST_SIZE {
            let lifetime = MIN_LIFETIME + rng.gen_range(0.0..LIFETIME_SPREAD);
            self.particles.push(Particle {
                x,
                y,
                vx: rng.gen_range(-BURST_SPEED..BURST_SPEED),
                vy: rng.gen_range(-BURST_SPEED..BURST_SPEED),
                lifetime,
                max_lifetime: lifetime,
                size: rng.gen_range(3.0..5.0),
                tint,
            });
        }
    }

    /// Age, move and damp every particle; drop the expired ones
    pub fn update(&mut self, dt: f32) {
        self.particles.retain_mut(|p| {
            p.lifetime -= dt;
            if p.lifetime <= 0.0 {
                return false;
            }
            p.x += p.vx * dt;
            p.y += p.vy * dt;
            p.vx *= DAMPING;
            p.vy *= DAMPING;
            true
        });
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
