//! Chain segment model
//!
//! A worm is a head followed by links. The head is steered (player input or
//! autonomous wandering); each link chases its predecessor with a two-phase
//! step:
//!
//! 1. Predict: move along a heading blended from where the predecessor *was*
//!    (lag, heavily weighted) and where it *is* (lead), by the distance the
//!    predecessor travelled this frame.
//! 2. Correct: project back onto the circle of radius `separation` around the
//!    predecessor.
//!
//! The prediction only picks the direction of the correction, which produces
//! the trailing whip; the projection keeps the chain length exact.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::camera::{Camera, Rect};
use super::polar::{angle_deg, from_polar, normalized, rotate, set_length};
use crate::consts::*;

/// Turn intent for a head
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Turn {
    /// Counter-clockwise on screen
    Left,
    #[default]
    Straight,
    /// Clockwise on screen
    Right,
}

impl Turn {
    pub fn sign(self) -> f32 {
        match self {
            Turn::Left => -1.0,
            Turn::Straight => 0.0,
            Turn::Right => 1.0,
        }
    }

    /// Right minus left, as held keys combine
    pub fn from_keys(left: bool, right: bool) -> Self {
        match (left, right) {
            (true, false) => Turn::Left,
            (false, true) => Turn::Right,
            _ => Turn::Straight,
        }
    }

    /// Uniform pick among the two intents that differ from `self`
    pub fn other_than<R: Rng + ?Sized>(self, rng: &mut R) -> Self {
        let others = match self {
            Turn::Left => [Turn::Straight, Turn::Right],
            Turn::Straight => [Turn::Left, Turn::Right],
            Turn::Right => [Turn::Left, Turn::Straight],
        };
        others[rng.random_range(0..2)]
    }
}

/// Control signals consumed by a player-driven head
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Steering {
    pub turn: Turn,
    pub boost: bool,
}

/// One body piece
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub position: Vec2,
    /// Position one frame ago
    pub previous_position: Vec2,
    /// Unit facing
    pub direction: Vec2,
    pub radius: f32,
}

impl Segment {
    pub fn new(position: Vec2, radius: f32) -> Self {
        Self {
            position,
            previous_position: position,
            direction: Vec2::X,
            radius,
        }
    }

    /// Distance covered during the last update
    #[inline]
    pub fn displacement(&self) -> f32 {
        (self.position - self.previous_position).length()
    }

    /// Sprite rotation in screen degrees
    pub fn rotation_deg(&self) -> f32 {
        angle_deg(self.direction)
    }

    pub fn bounds(&self) -> Rect {
        Rect::around(self.position, self.radius)
    }

    pub fn visible(&self, camera: &Camera) -> bool {
        camera.rect_visible(&self.bounds())
    }

    /// Shift both the current and previous positions so the next
    /// frame-to-frame displacement is unaffected
    pub fn translate(&mut self, offset: Vec2) {
        self.position += offset;
        self.previous_position += offset;
    }
}

/// Tuning for a player-driven head
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerDrive {
    pub normal_speed: f32,
    pub boost_speed: f32,
    /// Degrees per frame while grounded
    pub turn_rate: f32,
    pub air_turn_ratio: f32,
    /// Heads below this line (larger y) are grounded
    pub ground_y: f32,
    /// Bottom of the playfield
    pub floor_y: f32,
}

impl PlayerDrive {
    pub fn new(ground_y: f32, floor_y: f32) -> Self {
        Self {
            normal_speed: PLAYER_NORMAL_SPEED,
            boost_speed: PLAYER_BOOST_SPEED,
            turn_rate: PLAYER_TURN_RATE,
            air_turn_ratio: AIR_TURN_RATIO,
            ground_y,
            floor_y,
        }
    }
}

/// State of an autonomously wandering head
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutonomousDrive {
    /// Degrees per frame
    pub turn_rate: f32,
    pub top_bound: f32,
    pub bottom_bound: f32,
    pub turn: Turn,
    elapsed: f32,
    change_after: f32,
}

impl AutonomousDrive {
    pub fn new<R: Rng + ?Sized>(top_bound: f32, bottom_bound: f32, rng: &mut R) -> Self {
        let turn = match rng.random_range(0..3) {
            0 => Turn::Left,
            1 => Turn::Straight,
            _ => Turn::Right,
        };
        Self {
            turn_rate: WANDERER_TURN_RATE,
            top_bound,
            bottom_bound,
            turn,
            elapsed: 0.0,
            change_after: Self::draw_interval(rng),
        }
    }

    /// Mean 1.25 s between turn changes
    fn draw_interval<R: Rng + ?Sized>(rng: &mut R) -> f32 {
        rng.random_range(0.5..2.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum HeadDrive {
    Player(PlayerDrive),
    Autonomous(AutonomousDrive),
}

/// Lead segment of a chain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Head {
    pub body: Segment,
    pub velocity: Vec2,
    pub drive: HeadDrive,
}

impl Head {
    pub fn player(position: Vec2, drive: PlayerDrive) -> Self {
        Self {
            body: Segment::new(position, SEGMENT_RADIUS),
            velocity: Vec2::new(drive.normal_speed, 0.0),
            drive: HeadDrive::Player(drive),
        }
    }

    pub fn autonomous<R: Rng + ?Sized>(
        position: Vec2,
        top_bound: f32,
        bottom_bound: f32,
        rng: &mut R,
    ) -> Self {
        let speed = rng.random_range(0.25..0.75);
        Self {
            body: Segment::new(position, SEGMENT_RADIUS),
            velocity: Vec2::new(speed, 0.0),
            drive: HeadDrive::Autonomous(AutonomousDrive::new(top_bound, bottom_bound, rng)),
        }
    }

    /// Grounded means below the ground line. Autonomous heads live
    /// underground and always count as grounded.
    pub fn grounded(&self) -> bool {
        match &self.drive {
            HeadDrive::Player(drive) => self.body.position.y > drive.ground_y,
            HeadDrive::Autonomous(_) => true,
        }
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    pub fn update<R: Rng + ?Sized>(&mut self, dt: f32, steering: Steering, rng: &mut R) {
        let Head {
            body,
            velocity,
            drive,
        } = self;
        body.previous_position = body.position;
        match drive {
            HeadDrive::Player(drive) => drive_player(body, velocity, drive, steering),
            HeadDrive::Autonomous(auto) => drive_autonomous(body, velocity, auto, dt, rng),
        }
    }
}

fn drive_player(body: &mut Segment, velocity: &mut Vec2, drive: &PlayerDrive, steering: Steering) {
    let grounded = body.position.y > drive.ground_y;
    let target_speed = if steering.boost {
        drive.boost_speed
    } else {
        drive.normal_speed
    };
    let turn_rate = if grounded {
        drive.turn_rate
    } else {
        drive.turn_rate * drive.air_turn_ratio
    };

    *velocity = rotate(*velocity, turn_rate * steering.turn.sign());
    if grounded {
        let speed = velocity.length();
        let eased = speed + (target_speed - speed) * SPEED_EASE_GAIN;
        // A stalled head restarts along its facing
        let heading = if *velocity == Vec2::ZERO {
            body.direction
        } else {
            *velocity
        };
        *velocity = set_length(heading, eased);
    } else {
        velocity.y += GRAVITY;
        velocity.x *= AIR_DRAG;
    }
    face(body, *velocity);
    body.position += *velocity;

    let floor = drive.floor_y - body.radius;
    if body.position.y > floor {
        body.position.y = floor;
        velocity.y = 0.0;
    }
}

fn drive_autonomous<R: Rng + ?Sized>(
    body: &mut Segment,
    velocity: &mut Vec2,
    auto: &mut AutonomousDrive,
    dt: f32,
    rng: &mut R,
) {
    auto.elapsed += dt;
    if auto.elapsed >= auto.change_after {
        auto.elapsed = 0.0;
        auto.change_after = AutonomousDrive::draw_interval(rng);
        auto.turn = auto.turn.other_than(rng);
    }

    *velocity = rotate(*velocity, auto.turn.sign() * auto.turn_rate);
    body.position += *velocity;
    if body.position.y < auto.top_bound {
        velocity.y = velocity.y.abs();
    }
    if body.position.y > auto.bottom_bound {
        velocity.y = -velocity.y.abs();
    }
    face(body, *velocity);
}

/// Point `body` along `velocity` unless it is degenerate
fn face(body: &mut Segment, velocity: Vec2) {
    let facing = normalized(velocity);
    if facing != Vec2::ZERO {
        body.direction = facing;
    }
}

/// Heading in degrees for a link's predictive step.
///
/// Weighted mean of the lag and lead headings, each weighted by its weight
/// times its length. When the lag points up-left past -90° and the lead
/// down-left past 90°, the lag is lifted by 360° so the mean stays on the
/// short side of ±180°.
pub fn blend_heading(lag: Vec2, lead: Vec2) -> f32 {
    let mut lag_angle = angle_deg(lag);
    let lead_angle = angle_deg(lead);
    if lag_angle < -90.0 && lead_angle > 90.0 {
        lag_angle += 360.0;
    }

    let lag_w = LAG_WEIGHT * lag.length();
    let lead_w = LEAD_WEIGHT * lead.length();
    let total = lag_w + lead_w;
    if total <= f32::EPSILON {
        return lead_angle;
    }
    (lag_w * lag_angle + lead_w * lead_angle) / total
}

/// Trailing chain segment held at `separation` from its predecessor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    pub body: Segment,
    pub separation: f32,
}

impl Link {
    /// New link laid out straight to the left of `leader`
    pub fn behind(leader: &Segment, separation: f32) -> Self {
        let position = leader.position - Vec2::new(separation, 0.0);
        Self {
            body: Segment::new(position, leader.radius),
            separation,
        }
    }

    /// Advance one frame after `leader` has already moved this frame
    pub fn follow(&mut self, leader: &Segment) {
        self.body.previous_position = self.body.position;
        let own = self.body.position;

        let lag = leader.previous_position - own;
        let lead = leader.position - own;
        let heading = blend_heading(lag, lead);
        let predicted = own + from_polar(leader.displacement(), heading);

        let mut offset = predicted - leader.position;
        if offset == Vec2::ZERO {
            offset = -self.body.direction;
        }
        if offset == Vec2::ZERO {
            offset = Vec2::NEG_X;
        }
        self.body.position = leader.position + set_length(offset, self.separation);

        let facing = normalized(leader.position - self.body.position);
        if facing != Vec2::ZERO {
            self.body.direction = facing;
        }
    }
}
