//! Transient particle effects: blood bursts and wreck fires
//!
//! These never affect gameplay. Each group owns its particles and reports
//! itself spent once the last one is gone so the world can drop it.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::anim::{AnimationTable, FIRE_PARTICLE, FrameClock};
use super::camera::{Camera, Rect};
use super::polar::from_polar;
use crate::SimError;

const BLOOD_GRAVITY: f32 = 2.0;
const BLOOD_BOUNCE: f32 = 0.8;
const BLOOD_SHRINK: f32 = 0.96;
const BLOOD_MIN_RADIUS: f32 = 0.5;
/// Particles start shrinking once their sideways drift drops to this
const BLOOD_SETTLE_SPEED: f32 = 1.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BloodParticle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    pub color: [u8; 3],
    ground_y: f32,
}

impl BloodParticle {
    pub fn new<R: Rng + ?Sized>(origin: Vec2, power: f32, ground_y: f32, rng: &mut R) -> Self {
        let speed = rng.random::<f32>() * power;
        let heading = rng.random_range(0..360) as f32;
        let velocity = from_polar(speed, heading);
        Self {
            position: origin + velocity / 2.0,
            velocity,
            radius: rng.random_range(2..=5) as f32,
            color: [rng.random_range(128..=200), 0, 0],
            ground_y,
        }
    }

    pub fn update(&mut self) {
        self.velocity.y += BLOOD_GRAVITY;
        self.position += self.velocity;
        if self.position.y > self.ground_y {
            self.position.y = self.ground_y;
            self.velocity *= BLOOD_BOUNCE;
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::around(self.position, self.radius)
    }

    pub fn visible(&self, camera: &Camera) -> bool {
        camera.rect_visible(&self.bounds())
    }
}

/// Burst of blood from a killed organic enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BloodBurst {
    pub particles: Vec<BloodParticle>,
}

impl BloodBurst {
    pub fn new<R: Rng + ?Sized>(
        origin: Vec2,
        amount: usize,
        power: f32,
        ground_y: f32,
        rng: &mut R,
    ) -> Self {
        Self {
            particles: (0..amount)
                .map(|_| BloodParticle::new(origin, power, ground_y, rng))
                .collect(),
        }
    }

    pub fn update(&mut self) {
        self.particles.retain_mut(|p| {
            p.update();
            if p.velocity.x.abs() <= BLOOD_SETTLE_SPEED {
                p.radius *= BLOOD_SHRINK;
                p.radius > BLOOD_MIN_RADIUS
            } else {
                true
            }
        });
    }

    pub fn is_spent(&self) -> bool {
        self.particles.is_empty()
    }
}

/// Append `burst`, evicting the oldest groups beyond `cap`
pub fn push_capped(bursts: &mut Vec<BloodBurst>, burst: BloodBurst, cap: usize) {
    bursts.push(burst);
    evict_oldest(bursts, cap);
}

/// Drop groups from the front until at most `cap` remain
pub fn evict_oldest<T>(items: &mut Vec<T>, cap: usize) {
    if items.len() > cap {
        let excess = items.len() - cap;
        items.drain(..excess);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FireParticle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub clock: FrameClock,
    gone: bool,
}

impl FireParticle {
    fn new<R: Rng + ?Sized>(position: Vec2, clock: FrameClock, rng: &mut R) -> Self {
        Self {
            position,
            velocity: Vec2::new(0.0, rng.random_range(-4..=-2) as f32),
            clock,
            gone: false,
        }
    }

    /// Rise with a sideways jitter that leans back toward zero drift
    fn update<R: Rng + ?Sized>(&mut self, dt: f32, rng: &mut R) {
        if self.clock.advance(dt) {
            self.gone = true;
        }
        let drift = self.velocity.x.abs() as u32;
        let pick = rng.random_range(0..3 + drift);
        let nudge = if pick < 3 {
            pick as f32 - 1.0
        } else {
            -self.velocity.x.signum()
        };
        self.velocity.x += nudge;
        self.position += self.velocity;
    }
}

/// Fire trailing a wrecked vehicle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fire {
    pub particles: Vec<FireParticle>,
    template: FrameClock,
}

impl Fire {
    pub fn ignite<R: Rng + ?Sized>(
        origin: Vec2,
        assets: &AnimationTable,
        rng: &mut R,
    ) -> Result<Self, SimError> {
        let template = assets.clock(FIRE_PARTICLE)?;
        let first = FireParticle::new(origin, template.clone(), rng);
        Ok(Self {
            particles: vec![first],
            template,
        })
    }

    /// Advance particles; emit a fresh one at `origin` while `emit` holds
    pub fn update<R: Rng + ?Sized>(&mut self, dt: f32, origin: Vec2, emit: bool, rng: &mut R) {
        self.particles.retain_mut(|p| {
            p.update(dt, rng);
            !p.gone
        });
        if emit {
            let particle = FireParticle::new(origin, self.template.clone(), rng);
            self.particles.push(particle);
        }
    }

    pub fn is_out(&self) -> bool {
        self.particles.is_empty()
    }
}
