//! Segmented creatures: a head and its chain of links
//!
//! Also holds the world-wrap rule shared by everything that scrolls with the
//! player: once an entity drifts more than two viewport widths from the
//! player it is shifted four widths back toward them, which keeps the endless
//! world in bounded float coordinates without changing what is on screen.

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::chain::{Head, HeadDrive, Link, PlayerDrive, Segment, Steering};
use super::polar::from_polar;
use crate::consts::*;

/// Horizontal shift that keeps `x` within two viewport widths of `reference_x`
pub fn wrap_offset(x: f32, reference_x: f32, view_width: f32) -> f32 {
    let trigger = WRAP_TRIGGER_WIDTHS * view_width;
    let shift = WRAP_SHIFT_WIDTHS * view_width;
    if x < reference_x - trigger {
        shift
    } else if x > reference_x + trigger {
        -shift
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentedCreature {
    pub head: Head,
    /// Ordered head to tail
    pub links: Vec<Link>,
    separation: f32,
}

impl SegmentedCreature {
    /// Build a chain of `links` links laid out straight behind `head`
    pub fn new(head: Head, links: usize, separation: f32) -> Self {
        let mut creature = Self {
            head,
            links: Vec::with_capacity(links),
            separation,
        };
        for _ in 0..links {
            creature.grow();
        }
        creature
    }

    pub fn player(position: Vec2, links: usize, separation: f32, drive: PlayerDrive) -> Self {
        Self::new(Head::player(position, drive), links, separation)
    }

    /// AI worm bouncing between `top` and `bottom`
    pub fn wanderer<R: Rng + ?Sized>(position: Vec2, top: f32, bottom: f32, rng: &mut R) -> Self {
        Self::new(
            Head::autonomous(position, top, bottom, rng),
            WANDERER_LINKS,
            WANDERER_SEPARATION,
        )
    }

    pub fn separation(&self) -> f32 {
        self.separation
    }

    /// Number of segments including the head
    pub fn segment_count(&self) -> usize {
        self.links.len() + 1
    }

    /// Append a link behind the current tail
    pub fn grow(&mut self) {
        let link = Link::behind(self.tail(), self.separation);
        self.links.push(link);
    }

    pub fn tail(&self) -> &Segment {
        self.links.last().map(|l| &l.body).unwrap_or(&self.head.body)
    }

    /// Head first, then links in chain order
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        std::iter::once(&self.head.body).chain(self.links.iter().map(|l| &l.body))
    }

    #[inline]
    pub fn head_position(&self) -> Vec2 {
        self.head.body.position
    }

    pub fn distance_to(&self, point: Vec2) -> f32 {
        (point - self.head_position()).length()
    }

    /// Advance the head, then every link against its already-updated leader
    pub fn update<R: Rng + ?Sized>(&mut self, dt: f32, steering: Steering, rng: &mut R) {
        self.head.update(dt, steering, rng);
        let mut leader = self.head.body;
        for link in &mut self.links {
            link.follow(&leader);
            leader = link.body;
        }
    }

    /// Move every segment by the same offset
    pub fn translate(&mut self, offset: Vec2) {
        self.head.body.translate(offset);
        for link in &mut self.links {
            link.body.translate(offset);
        }
    }

    /// Apply the world-wrap rule against `reference_x`. Returns the applied shift.
    pub fn wrap_toward(&mut self, reference_x: f32, view_width: f32) -> Vec2 {
        let shift = Vec2::new(
            wrap_offset(self.head_position().x, reference_x, view_width),
            0.0,
        );
        if shift != Vec2::ZERO {
            self.translate(shift);
        }
        shift
    }

    pub fn is_finite(&self) -> bool {
        self.segments()
            .all(|s| s.position.is_finite() && s.previous_position.is_finite())
    }
}

/// Jaw overlay riding on the player head
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fangs {
    /// Target state, set from the world's close signal
    pub opened: bool,
    /// Current opening in degrees
    pub angle: f32,
    pub open_angle: f32,
    /// Angular offset of each fang's mount from the head facing
    pub mount_angle: f32,
}

impl Default for Fangs {
    fn default() -> Self {
        Self {
            opened: false,
            angle: 0.0,
            open_angle: 70.0,
            mount_angle: 60.0,
        }
    }
}

impl Fangs {
    pub fn update(&mut self) {
        let target = if self.opened { self.open_angle } else { 0.0 };
        self.angle += (target - self.angle) / 2.0;
    }

    /// World positions of the (top, bottom) fang mounts
    pub fn mounts(&self, head: &Segment) -> (Vec2, Vec2) {
        let base = head.rotation_deg();
        let reach = head.radius * 0.5;
        (
            head.position + from_polar(reach, base - self.mount_angle),
            head.position + from_polar(reach, base + self.mount_angle),
        )
    }

    /// Sprite rotations in screen degrees for the (top, bottom) fangs
    pub fn rotations(&self, head: &Segment) -> (f32, f32) {
        let base = head.rotation_deg();
        (base - self.angle, base + self.angle)
    }
}

const DIRT_COLORS: [[u8; 3]; 5] = [
    [38, 18, 6],
    [30, 15, 7],
    [40, 20, 10],
    [12, 6, 3],
    [16, 8, 4],
];
const DIRT_LIFE: f32 = 50.0;

/// Puff of dirt kicked up behind a fast-burrowing worm
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dirt {
    pub position: Vec2,
    pub color: [u8; 3],
    pub life: f32,
}

impl Dirt {
    /// Draw size relative to the segment radius
    pub fn scale(&self) -> f32 {
        self.life / DIRT_LIFE
    }
}

/// The player-controlled worm
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerWorm {
    pub body: SegmentedCreature,
    pub fangs: Fangs,
    pub dirt: Vec<Dirt>,
    pub health: f32,
    pub max_health: f32,
    pub health_drain: f32,
}

impl PlayerWorm {
    pub fn new(body: SegmentedCreature, max_health: f32) -> Self {
        Self {
            body,
            fangs: Fangs::default(),
            dirt: Vec::new(),
            health: max_health,
            max_health,
            health_drain: HEALTH_DRAIN_PER_FRAME,
        }
    }

    pub fn head(&self) -> &Segment {
        &self.body.head.body
    }

    pub fn position(&self) -> Vec2 {
        self.body.head_position()
    }

    pub fn grounded(&self) -> bool {
        self.body.head.grounded()
    }

    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).min(self.max_health);
    }

    pub fn hurt(&mut self, amount: f32) {
        self.health = (self.health - amount).max(0.0);
    }

    pub fn update<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        steering: Steering,
        ground_y: f32,
        rng: &mut R,
    ) {
        self.body.update(dt, steering, rng);
        self.fangs.update();
        self.hurt(self.health_drain);

        self.dirt.retain_mut(|d| {
            d.life *= 0.95;
            d.life > 2.0
        });

        let tail = *self.body.tail();
        let head = &self.body.head;
        let normal_speed = match &head.drive {
            HeadDrive::Player(drive) => drive.normal_speed,
            HeadDrive::Autonomous(_) => PLAYER_NORMAL_SPEED,
        };
        if tail.position.y > ground_y + head.body.radius && head.speed() > normal_speed + 1.0 {
            let color = *DIRT_COLORS.choose(rng).unwrap_or(&DIRT_COLORS[0]);
            self.dirt.push(Dirt {
                position: tail.position,
                color,
                life: DIRT_LIFE,
            });
        }
    }
}
