//! Enemy projectiles
//!
//! Straight-line shots: constant velocity, culled on reaching the ground line
//! or after a fixed lifetime.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::polar::{angle_deg, normalized};
use crate::consts::PROJECTILE_MAX_AGE;

/// Which sprite set a projectile uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Gunner arm-cannon shot
    Plasma,
    /// Buggy turret shell
    Shell,
}

impl ProjectileKind {
    pub fn label(self) -> &'static str {
        match self {
            ProjectileKind::Plasma => "gunner",
            ProjectileKind::Shell => "buggy",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub kind: ProjectileKind,
    pub position: Vec2,
    pub velocity: Vec2,
    pub size: f32,
    /// Sprite mirrored vertically (cosmetic)
    pub flipped: bool,
    age: f32,
    max_age: f32,
}

impl Projectile {
    /// Shot from `origin` along `aim` at `speed` units per frame
    pub fn new(kind: ProjectileKind, origin: Vec2, aim: Vec2, speed: f32, size: f32) -> Self {
        Self {
            kind,
            position: origin,
            velocity: normalized(aim) * speed,
            size,
            flipped: false,
            age: 0.0,
            max_age: PROJECTILE_MAX_AGE,
        }
    }

    pub fn rotation_deg(&self) -> f32 {
        angle_deg(self.velocity)
    }

    /// Shots are small enough to cull on their centre
    pub fn visible(&self, camera: &Camera) -> bool {
        camera.point_visible(self.position)
    }

    pub fn age(&self) -> f32 {
        self.age
    }

    /// Advance one frame. Returns false once the shot should be removed.
    pub fn update(&mut self, dt: f32, ground_y: f32) -> bool {
        self.position += self.velocity;
        self.age += dt;
        self.position.y < ground_y && self.age <= self.max_age
    }
}
