//! Hostile entities and their per-species policies
//!
//! Every enemy shares one generic step (idle wandering, horizontal motion,
//! world-wrap). What differs per species is a pure decision over the offset
//! to the player head, expressed by the `decide_*` functions below, plus the
//! species' firing cadence.
//!
//! Species:
//! - Runner: panics and flees when the worm gets close
//! - Gunner: keeps its distance from an airborne worm and shoots at it
//! - Buggy: vehicle with a turret; wrecks instead of bleeding when killed

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::anim::AnimationTable;
use super::camera::{Camera, Rect};
use super::creature::wrap_offset;
use super::effects::Fire;
use super::polar::angle_deg;
use super::projectile::{Projectile, ProjectileKind};
use crate::SimError;
use crate::audio::SoundCue;

/// Chance per frame that an idle-wandering enemy turns around
const WANDER_FLIP_CHANCE: f64 = 0.001;
/// Chance per frame that an idle-wandering enemy starts or stops walking
const WANDER_TOGGLE_CHANCE: f64 = 0.005;
/// Spawn at least this far inside the camera edges
const SPAWN_MARGIN: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Facing::Left => "l",
            Facing::Right => "r",
        }
    }

    /// Facing toward a point `dx` away horizontally (ties face right)
    pub fn toward(dx: f32) -> Self {
        if dx >= 0.0 { Facing::Right } else { Facing::Left }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Species {
    Runner,
    Gunner,
    Buggy,
}

impl Species {
    /// Height of the sprite's centre above the ground line
    pub fn ground_offset(self) -> f32 {
        match self {
            Species::Runner => 17.0,
            Species::Gunner => 20.0,
            Species::Buggy => 44.0,
        }
    }

    /// Half width and half height of the sprite
    pub fn half_extents(self) -> Vec2 {
        match self {
            Species::Runner => Vec2::new(15.0, 17.0),
            Species::Gunner => Vec2::new(18.0, 20.0),
            Species::Buggy => Vec2::new(50.0, 44.0),
        }
    }

    /// Organic species bleed when killed: (particle count, burst power)
    pub fn blood(self) -> Option<(usize, f32)> {
        match self {
            Species::Runner => Some((40, 30.0)),
            Species::Gunner => Some((45, 25.0)),
            Species::Buggy => None,
        }
    }

    pub fn is_organic(self) -> bool {
        self.blood().is_some()
    }

    pub fn death_cues(self) -> &'static [SoundCue] {
        match self {
            Species::Runner | Species::Gunner => &[SoundCue::Scream],
            Species::Buggy => &[SoundCue::Scream, SoundCue::Crunch],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Species::Runner => "runner",
            Species::Gunner => "gunner",
            Species::Buggy => "buggy",
        }
    }
}

/// What the player looks like from an enemy's point of view this frame
#[derive(Debug, Clone, Copy)]
pub struct Surroundings {
    pub dt: f32,
    pub player: Vec2,
    pub player_grounded: bool,
    pub view_width: f32,
}

/// Decision shared by every species
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Intent {
    /// Reacting to the player; suppresses idle wandering
    pub engaged: bool,
    pub facing: Option<Facing>,
    pub moving: Option<bool>,
}

/// Runner: flee when the worm comes within reach (further when it is airborne)
pub fn decide_runner(offset: Vec2, player_grounded: bool) -> Intent {
    let flee_distance = if player_grounded { 70.0 } else { 130.0 };
    if offset.length() < flee_distance {
        Intent {
            engaged: true,
            facing: Some(Facing::toward(offset.x).flipped()),
            moving: Some(true),
        }
    } else {
        Intent::default()
    }
}

/// Gunner aim buckets, quantized from the bearing to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GunnerAim {
    Neutral,
    Right,
    UpRight,
    Up,
    UpLeft,
    Left,
}

impl GunnerAim {
    pub fn label(self) -> &'static str {
        match self {
            GunnerAim::Neutral => "n",
            GunnerAim::Right => "r",
            GunnerAim::UpRight => "ur",
            GunnerAim::Up => "u",
            GunnerAim::UpLeft => "ul",
            GunnerAim::Left => "l",
        }
    }

    /// Bucket for an upward bearing in degrees (0 = right, 90 = straight up).
    /// Straight-up is only available while standing.
    pub fn from_bearing(bearing: f32, moving: bool) -> Self {
        if bearing < 22.5 {
            GunnerAim::Right
        } else if bearing < 157.5 {
            if moving {
                if bearing < 90.0 {
                    GunnerAim::UpRight
                } else {
                    GunnerAim::UpLeft
                }
            } else if bearing < 67.5 {
                GunnerAim::UpRight
            } else if bearing < 112.5 {
                GunnerAim::Up
            } else {
                GunnerAim::UpLeft
            }
        } else {
            GunnerAim::Left
        }
    }

    /// Muzzle position relative to the gunner's centre.
    ///
    /// Panics on `Neutral`: firing without a bucket means the quantization
    /// table missed a case.
    pub fn muzzle_offset(self, facing: Facing) -> Vec2 {
        match self {
            GunnerAim::Up => Vec2::new(3.0 * facing.sign(), -25.0),
            GunnerAim::UpRight => Vec2::new(16.0, -22.0),
            GunnerAim::UpLeft => Vec2::new(-16.0, -22.0),
            GunnerAim::Right => Vec2::new(18.0, -10.0),
            GunnerAim::Left => Vec2::new(-18.0, -10.0),
            GunnerAim::Neutral => unreachable!("gunner fired without an aim bucket"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GunnerIntent {
    pub intent: Intent,
    /// Some when the player is above the horizon
    pub aim: Option<GunnerAim>,
    /// Firing timer runs while set, resets otherwise
    pub armed: bool,
}

/// Gunner: engage an airborne worm between 50 and 600 units. Back away below
/// `min_dist`, hold position in the band, advance beyond `max_dist`.
pub fn decide_gunner(offset: Vec2, player_grounded: bool, min_dist: f32, max_dist: f32) -> GunnerIntent {
    let dist = offset.length();
    if !(50.0 < dist && dist < 600.0) || player_grounded {
        return GunnerIntent {
            intent: Intent::default(),
            aim: None,
            armed: false,
        };
    }

    let facing = Facing::toward(offset.x);
    if dist < min_dist {
        return GunnerIntent {
            intent: Intent {
                engaged: true,
                facing: Some(facing.flipped()),
                moving: Some(true),
            },
            aim: None,
            armed: false,
        };
    }

    let moving = dist >= max_dist;
    let bearing = -angle_deg(offset);
    let aim = (bearing >= 0.0).then(|| GunnerAim::from_bearing(bearing, moving));
    GunnerIntent {
        intent: Intent {
            engaged: true,
            facing: Some(facing),
            moving: Some(moving),
        },
        aim,
        armed: true,
    }
}

/// Turret elevation buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurretAngle {
    Down2,
    Down1,
    Straight,
    Up1,
    Up2,
    Up3,
}

impl TurretAngle {
    pub fn label(self) -> &'static str {
        match self {
            TurretAngle::Down2 => "d2",
            TurretAngle::Down1 => "d1",
            TurretAngle::Straight => "straight",
            TurretAngle::Up1 => "u1",
            TurretAngle::Up2 => "u2",
            TurretAngle::Up3 => "u3",
        }
    }

    /// Barrel elevation drawn for this bucket, in degrees above horizontal
    pub fn degrees(self) -> f32 {
        match self {
            TurretAngle::Down2 => -20.7,
            TurretAngle::Down1 => -13.0,
            TurretAngle::Straight => 0.0,
            TurretAngle::Up1 => 15.5,
            TurretAngle::Up2 => 28.0,
            TurretAngle::Up3 => 38.2,
        }
    }

    /// Bucket for an elevation in degrees folded into [-90, 90]
    pub fn from_elevation(elevation: f32) -> Self {
        if elevation < -15.0 {
            TurretAngle::Down2
        } else if elevation < -5.0 {
            TurretAngle::Down1
        } else if elevation < 7.5 {
            TurretAngle::Straight
        } else if elevation < 20.5 {
            TurretAngle::Up1
        } else if elevation < 28.0 {
            TurretAngle::Up2
        } else {
            TurretAngle::Up3
        }
    }
}

/// Which end of the vehicle the turret points out of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurretSide {
    Front,
    Back,
}

impl TurretSide {
    pub fn label(self) -> &'static str {
        match self {
            TurretSide::Front => "front",
            TurretSide::Back => "back",
        }
    }
}

const TURRET_MOUNT: Vec2 = Vec2::new(-32.0, -25.0);
const TURRET_LENGTH: f32 = 36.0;
const TURRET_RANGE: f32 = 800.0;

fn turret_mount(facing: Facing) -> Vec2 {
    Vec2::new(TURRET_MOUNT.x * facing.sign(), TURRET_MOUNT.y)
}

/// Turret aim from the mount toward the player. None when out of range or
/// when the player is underground.
pub fn decide_turret(
    offset_from_mount: Vec2,
    facing: Facing,
    player_grounded: bool,
) -> Option<(TurretAngle, TurretSide)> {
    if offset_from_mount.length() > TURRET_RANGE || player_grounded {
        return None;
    }
    let mut bearing = -angle_deg(offset_from_mount);
    if bearing < -90.0 {
        bearing += 360.0;
    }
    // fold left-hand bearings onto the right-hand side
    let elevation = 90.0 - (bearing - 90.0).abs();
    let ahead = (offset_from_mount.x > 0.0) == (facing == Facing::Right);
    let side = if ahead {
        TurretSide::Front
    } else {
        TurretSide::Back
    };
    Some((TurretAngle::from_elevation(elevation), side))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Throttle {
    Forward,
    Reverse,
    Idle,
}

impl Throttle {
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        match rng.random_range(0..3) {
            0 => Throttle::Forward,
            1 => Throttle::Reverse,
            _ => Throttle::Idle,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GunnerState {
    pub aim: GunnerAim,
    pub shooting: bool,
    min_dist: f32,
    max_dist: f32,
    shot_timer: f32,
    shot_interval: f32,
}

/// Falling, spinning, burning remains of a vehicle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wreck {
    pub velocity: Vec2,
    pub spin: f32,
    pub rotation: f32,
    pub fire: Option<Fire>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuggyState {
    pub throttle: Throttle,
    pub max_speed: f32,
    pub turret: TurretAngle,
    pub side: TurretSide,
    shot_timer: f32,
    shot_interval: f32,
    pub wreck: Option<Wreck>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Behavior {
    Runner,
    Gunner(GunnerState),
    Buggy(BuggyState),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub species: Species,
    pub position: Vec2,
    pub facing: Facing,
    pub moving: bool,
    /// Walking pace for runners and gunners; signed velocity for the buggy
    pub speed: f32,
    pub death_radius: f32,
    pub dead: bool,
    /// Ready to be removed from the world
    pub gone: bool,
    /// Ground line under this enemy
    pub ground_y: f32,
    pub behavior: Behavior,
}

impl Enemy {
    pub fn new<R: Rng + ?Sized>(species: Species, position: Vec2, facing: Facing, ground_y: f32, rng: &mut R) -> Self {
        let (speed, death_radius, behavior) = match species {
            Species::Runner => (4.0 + (rng.random::<f32>() * 2.0 - 0.5), 0.0, Behavior::Runner),
            Species::Gunner => (
                3.0 + (rng.random::<f32>() * 1.5 - 0.25),
                0.0,
                Behavior::Gunner(GunnerState {
                    aim: match facing {
                        Facing::Left => GunnerAim::Left,
                        Facing::Right => GunnerAim::Right,
                    },
                    shooting: false,
                    min_dist: 90.0 + rng.random_range(-15..=15) as f32,
                    max_dist: 500.0 + rng.random_range(-40..=40) as f32,
                    shot_timer: 0.0,
                    shot_interval: rng.random::<f32>() * 0.2 + 0.6,
                }),
            ),
            Species::Buggy => (
                0.0,
                10.0,
                Behavior::Buggy(BuggyState {
                    throttle: Throttle::random(rng),
                    max_speed: rng.random_range(9..=13) as f32,
                    turret: TurretAngle::Straight,
                    side: TurretSide::Front,
                    shot_timer: 0.0,
                    shot_interval: rng.random::<f32>() * 0.5 + 0.25,
                    wreck: None,
                }),
            ),
        };
        Self {
            species,
            position,
            facing,
            moving: false,
            speed,
            death_radius,
            dead: false,
            gone: false,
            ground_y,
            behavior,
        }
    }

    /// Spawn standing on the ground line somewhere inside the camera view
    pub fn spawn_on_screen<R: Rng + ?Sized>(species: Species, camera: &Camera, ground_y: f32, rng: &mut R) -> Self {
        let left = camera.left() + SPAWN_MARGIN;
        let right = (camera.right() - SPAWN_MARGIN).max(left);
        let x = rng.random_range(left..=right);
        let facing = if rng.random_bool(0.5) {
            Facing::Left
        } else {
            Facing::Right
        };
        let position = Vec2::new(x, ground_y - species.ground_offset());
        Self::new(species, position, facing, ground_y, rng)
    }

    pub fn is_organic(&self) -> bool {
        self.species.is_organic()
    }

    /// Sprite label for the animation collaborator
    pub fn anim_label(&self) -> String {
        let gait = if self.moving { "run" } else { "idle" };
        match &self.behavior {
            Behavior::Runner => format!("{gait}_{}", self.facing.label()),
            Behavior::Gunner(g) => {
                let aim = if g.shooting { g.aim } else { GunnerAim::Neutral };
                format!("{gait}_{}_shoot_{}", self.facing.label(), aim.label())
            }
            Behavior::Buggy(b) if b.wreck.is_some() => "broken".to_string(),
            Behavior::Buggy(b) => format!("{}_{}", b.side.label(), b.turret.label()),
        }
    }

    /// Sprite rotation in degrees (only wrecks spin)
    pub fn rotation_deg(&self) -> f32 {
        match &self.behavior {
            Behavior::Buggy(BuggyState {
                wreck: Some(wreck), ..
            }) => wreck.rotation,
            _ => 0.0,
        }
    }

    /// Sprite box centred on the enemy
    pub fn bounds(&self) -> Rect {
        let half = self.species.half_extents();
        Rect::new(self.position - half, half * 2.0)
    }

    pub fn visible(&self, camera: &Camera) -> bool {
        camera.rect_visible(&self.bounds())
    }

    /// Wheel animation speed multiplier for a moving buggy
    pub fn wheel_rate(&self) -> Option<f32> {
        match &self.behavior {
            Behavior::Buggy(b) if b.wreck.is_none() && self.speed != 0.0 => {
                Some(b.max_speed / (2.0 * self.speed).abs())
            }
            _ => None,
        }
    }

    /// Advance one frame. Returns the distance to the player, or None once
    /// the enemy no longer interacts with it (a burning wreck).
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        env: &Surroundings,
        shots: &mut Vec<Projectile>,
        rng: &mut R,
    ) -> Result<Option<f32>, SimError> {
        let distance = if self.dead {
            self.update_wreck(env.dt, rng);
            None
        } else {
            // walkers are judged where they stood; the buggy after it drove
            let offset = env.player - self.position;
            match self.species {
                Species::Runner => {
                    let intent = decide_runner(offset, env.player_grounded);
                    self.step(intent, env, rng);
                    Some(offset.length())
                }
                Species::Gunner => {
                    self.update_gunner(offset, env, shots, rng);
                    Some(offset.length())
                }
                Species::Buggy => {
                    self.update_buggy(env, shots, rng);
                    Some((env.player - self.position).length())
                }
            }
        };

        if !self.position.is_finite() {
            return Err(SimError::NonFinite {
                entity: self.species.name(),
            });
        }
        Ok(distance)
    }

    /// Shared step: apply the intent, wander when idle, move, wrap
    fn step<R: Rng + ?Sized>(&mut self, intent: Intent, env: &Surroundings, rng: &mut R) {
        if let Some(facing) = intent.facing {
            self.facing = facing;
        }
        if let Some(moving) = intent.moving {
            self.moving = moving;
        }
        if !intent.engaged {
            if rng.random_bool(WANDER_FLIP_CHANCE) {
                self.facing = self.facing.flipped();
            }
            if rng.random_bool(WANDER_TOGGLE_CHANCE) {
                self.moving = !self.moving;
            }
        }

        if matches!(self.behavior, Behavior::Buggy(_)) {
            if self.speed > 0.0 {
                self.facing = Facing::Right;
            } else if self.speed < 0.0 {
                self.facing = Facing::Left;
            }
            self.position.x += self.speed;
        } else if self.moving {
            self.position.x += self.speed * self.facing.sign();
        }

        self.position.x += wrap_offset(self.position.x, env.player.x, env.view_width);
    }

    fn update_gunner<R: Rng + ?Sized>(
        &mut self,
        offset: Vec2,
        env: &Surroundings,
        shots: &mut Vec<Projectile>,
        rng: &mut R,
    ) {
        let Behavior::Gunner(state) = &mut self.behavior else {
            return;
        };
        let decision = decide_gunner(offset, env.player_grounded, state.min_dist, state.max_dist);
        state.shooting = decision.aim.is_some();
        if let Some(aim) = decision.aim {
            state.aim = aim;
        }

        let mut fire = None;
        if decision.armed {
            state.shot_timer += env.dt;
            if state.shot_timer > state.shot_interval {
                state.shot_timer = 0.0;
                fire = Some(state.aim);
            }
        } else {
            state.shot_timer = 0.0;
        }

        if let (Some(aim), Some(facing)) = (fire, decision.intent.facing) {
            let muzzle = self.position + aim.muzzle_offset(facing);
            let mut shot = Projectile::new(ProjectileKind::Plasma, muzzle, env.player - muzzle, 8.0, 7.0);
            shot.flipped = rng.random_bool(0.5);
            shots.push(shot);
        }
        self.step(decision.intent, env, rng);
    }

    fn update_buggy<R: Rng + ?Sized>(
        &mut self,
        env: &Surroundings,
        shots: &mut Vec<Projectile>,
        rng: &mut R,
    ) {
        let engaged = Intent {
            engaged: true,
            ..Intent::default()
        };
        self.step(engaged, env, rng);

        let Behavior::Buggy(state) = &mut self.behavior else {
            return;
        };
        let reroll = if state.throttle == Throttle::Idle { 0.05 } else { 0.02 };
        if rng.random_bool(reroll) {
            state.throttle = Throttle::random(rng);
        }
        self.speed = match state.throttle {
            Throttle::Forward => self.speed + if self.speed >= 0.0 { 0.25 } else { 0.5 },
            Throttle::Reverse => self.speed - if self.speed <= 0.0 { 0.25 } else { 0.5 },
            Throttle::Idle if self.speed > 0.0 => self.speed - 0.25,
            Throttle::Idle if self.speed < 0.0 => self.speed + 0.25,
            Throttle::Idle => 0.0,
        }
        .clamp(-state.max_speed, state.max_speed);
        self.moving = self.speed != 0.0;

        let mount = self.position + turret_mount(self.facing);
        match decide_turret(env.player - mount, self.facing, env.player_grounded) {
            Some((angle, side)) => {
                state.turret = angle;
                state.side = side;
                state.shot_timer += env.dt;
                if state.shot_timer >= state.shot_interval {
                    state.shot_timer = 0.0;
                    let outward = match (self.facing, side) {
                        (Facing::Right, TurretSide::Front) | (Facing::Left, TurretSide::Back) => 1.0,
                        _ => -1.0,
                    };
                    let (sin, cos) = angle.degrees().to_radians().sin_cos();
                    let muzzle = mount + Vec2::new(outward * TURRET_LENGTH * cos, -TURRET_LENGTH * sin);
                    shots.push(Projectile::new(ProjectileKind::Shell, muzzle, env.player - mount, 14.0, 5.0));
                }
            }
            None => {
                state.turret = TurretAngle::Straight;
                state.shot_timer = 0.0;
            }
        }
    }

    fn update_wreck<R: Rng + ?Sized>(&mut self, dt: f32, rng: &mut R) {
        let Behavior::Buggy(BuggyState {
            wreck: Some(wreck), ..
        }) = &mut self.behavior
        else {
            return;
        };
        wreck.velocity.y += 0.5;
        self.position += wreck.velocity;
        wreck.spin *= 0.95;
        wreck.rotation += wreck.spin;

        let burning = self.position.y < self.ground_y;
        let fire_out = match &mut wreck.fire {
            Some(fire) => {
                fire.update(dt, self.position, burning, rng);
                fire.is_out()
            }
            None => true,
        };
        if self.position.y > self.ground_y + 100.0 && fire_out {
            self.gone = true;
        }
    }

    /// Kill this enemy. Organic enemies are gone at once; a buggy turns into
    /// a wreck thrown along `impact`. A missing fire clip is returned as an
    /// error after the wreck has been set up without fire.
    pub fn die<R: Rng + ?Sized>(
        &mut self,
        impact: Vec2,
        assets: &AnimationTable,
        rng: &mut R,
    ) -> Result<(), SimError> {
        self.dead = true;
        let position = self.position;
        match &mut self.behavior {
            Behavior::Runner | Behavior::Gunner(_) => {
                self.gone = true;
                Ok(())
            }
            Behavior::Buggy(state) => {
                let fire = Fire::ignite(position, assets, rng);
                let velocity = Vec2::new(impact.x, rng.random_range(-10..=-5) as f32);
                let (fire, result) = match fire {
                    Ok(fire) => (Some(fire), Ok(())),
                    Err(err) => (None, Err(err)),
                };
                state.wreck = Some(Wreck {
                    velocity,
                    spin: 30.0,
                    rotation: 0.0,
                    fire,
                });
                result
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn env(player: Vec2, grounded: bool) -> Surroundings {
        Surroundings {
            dt: 1.0 / 30.0,
            player,
            player_grounded: grounded,
            view_width: 1200.0,
        }
    }

    #[test]
    fn test_runner_flees_closer_when_worm_is_underground() {
        // worm to the left: run right
        let intent = decide_runner(Vec2::new(-60.0, 0.0), true);
        assert_eq!(intent.facing, Some(Facing::Right));
        assert_eq!(intent.moving, Some(true));
        assert!(intent.engaged);

        assert!(!decide_runner(Vec2::new(-100.0, 0.0), true).engaged);
        assert!(decide_runner(Vec2::new(-100.0, 0.0), false).engaged);
    }

    #[test]
    fn test_gunner_ignores_grounded_worm() {
        let decision = decide_gunner(Vec2::new(200.0, -100.0), true, 90.0, 500.0);
        assert!(!decision.intent.engaged);
        assert!(!decision.armed);
    }

    #[test]
    fn test_gunner_backs_off_then_holds_then_advances() {
        let close = decide_gunner(Vec2::new(70.0, 0.0), false, 90.0, 500.0);
        assert_eq!(close.intent.facing, Some(Facing::Left));
        assert_eq!(close.intent.moving, Some(true));
        assert!(!close.armed);

        let band = decide_gunner(Vec2::new(200.0, -10.0), false, 90.0, 500.0);
        assert_eq!(band.intent.facing, Some(Facing::Right));
        assert_eq!(band.intent.moving, Some(false));
        assert!(band.armed);

        let far = decide_gunner(Vec2::new(-550.0, -10.0), false, 90.0, 500.0);
        assert_eq!(far.intent.facing, Some(Facing::Left));
        assert_eq!(far.intent.moving, Some(true));
    }

    #[test]
    fn test_gunner_aim_buckets() {
        assert_eq!(GunnerAim::from_bearing(10.0, false), GunnerAim::Right);
        assert_eq!(GunnerAim::from_bearing(45.0, false), GunnerAim::UpRight);
        assert_eq!(GunnerAim::from_bearing(90.0, false), GunnerAim::Up);
        assert_eq!(GunnerAim::from_bearing(120.0, false), GunnerAim::UpLeft);
        assert_eq!(GunnerAim::from_bearing(170.0, false), GunnerAim::Left);
        // no straight-up pose while running
        assert_eq!(GunnerAim::from_bearing(80.0, true), GunnerAim::UpRight);
        assert_eq!(GunnerAim::from_bearing(100.0, true), GunnerAim::UpLeft);
    }

    #[test]
    fn test_gunner_below_horizon_does_not_aim() {
        let decision = decide_gunner(Vec2::new(200.0, 50.0), false, 90.0, 500.0);
        assert!(decision.armed);
        assert_eq!(decision.aim, None);
    }

    #[test]
    #[should_panic(expected = "aim bucket")]
    fn test_neutral_aim_cannot_fire() {
        GunnerAim::Neutral.muzzle_offset(Facing::Right);
    }

    #[test]
    fn test_turret_buckets() {
        let level = decide_turret(Vec2::new(300.0, 0.0), Facing::Right, false);
        assert_eq!(level, Some((TurretAngle::Straight, TurretSide::Front)));

        // 45° up and behind
        let behind = decide_turret(Vec2::new(-100.0, -100.0), Facing::Right, false);
        assert_eq!(behind, Some((TurretAngle::Up3, TurretSide::Back)));

        let below = decide_turret(Vec2::new(100.0, 30.0), Facing::Left, false);
        assert_eq!(below, Some((TurretAngle::Down2, TurretSide::Back)));

        assert_eq!(decide_turret(Vec2::new(900.0, 0.0), Facing::Right, false), None);
        assert_eq!(decide_turret(Vec2::new(100.0, 0.0), Facing::Right, true), None);
    }

    #[test]
    fn test_gunner_fires_after_interval() {
        let mut rng = Pcg32::seed_from_u64(21);
        let mut gunner = Enemy::new(Species::Gunner, Vec2::new(0.0, 420.0), Facing::Right, 440.0, &mut rng);
        let mut shots = Vec::new();
        let surroundings = env(Vec2::new(200.0, 250.0), false);
        for _ in 0..30 {
            gunner.update(&surroundings, &mut shots, &mut rng).unwrap();
        }
        // interval is 0.6-0.8 s: one shot in a second
        assert_eq!(shots.len(), 1);
        assert_eq!(shots[0].kind, ProjectileKind::Plasma);
        assert!(gunner.anim_label().starts_with("idle_r_shoot_"));
        assert!(!gunner.anim_label().ends_with("_n"));
    }

    #[test]
    fn test_buggy_speed_is_clamped() {
        let mut rng = Pcg32::seed_from_u64(22);
        let mut buggy = Enemy::new(Species::Buggy, Vec2::new(0.0, 396.0), Facing::Right, 440.0, &mut rng);
        let mut shots = Vec::new();
        let far_below = env(Vec2::new(0.0, 800.0), true);
        for _ in 0..500 {
            buggy.update(&far_below, &mut shots, &mut rng).unwrap();
            let Behavior::Buggy(state) = &buggy.behavior else {
                unreachable!()
            };
            assert!(buggy.speed.abs() <= state.max_speed);
        }
        // grounded worm: turret stays quiet
        assert!(shots.is_empty());
    }

    #[test]
    fn test_buggy_turret_fires_at_airborne_worm() {
        let mut rng = Pcg32::seed_from_u64(23);
        let mut buggy = Enemy::new(Species::Buggy, Vec2::new(0.0, 396.0), Facing::Right, 440.0, &mut rng);
        let mut shots = Vec::new();
        let surroundings = env(Vec2::new(300.0, 200.0), false);
        for _ in 0..30 {
            buggy.update(&surroundings, &mut shots, &mut rng).unwrap();
        }
        assert!(!shots.is_empty());
        assert!(shots.iter().all(|s| s.kind == ProjectileKind::Shell));
    }

    #[test]
    fn test_wreck_falls_burns_and_goes() {
        let mut rng = Pcg32::seed_from_u64(24);
        let mut buggy = Enemy::new(Species::Buggy, Vec2::new(0.0, 396.0), Facing::Right, 440.0, &mut rng);
        let assets = AnimationTable::default();
        buggy.die(Vec2::new(6.0, -3.0), &assets, &mut rng).unwrap();
        assert!(buggy.dead && !buggy.gone);
        assert_eq!(buggy.anim_label(), "broken");

        let mut shots = Vec::new();
        let surroundings = env(Vec2::ZERO, false);
        let mut frames = 0;
        while !buggy.gone {
            let dist = buggy.update(&surroundings, &mut shots, &mut rng).unwrap();
            assert_eq!(dist, None);
            frames += 1;
            assert!(frames < 1000, "wreck never cleared");
        }
        assert!(buggy.position.y > 540.0);
        assert!(buggy.rotation_deg() > 30.0);
    }

    #[test]
    fn test_wreck_without_fire_clip_reports_and_still_falls() {
        let mut rng = Pcg32::seed_from_u64(25);
        let mut buggy = Enemy::new(Species::Buggy, Vec2::new(0.0, 396.0), Facing::Left, 440.0, &mut rng);
        let err = buggy.die(Vec2::ZERO, &AnimationTable::empty(), &mut rng).unwrap_err();
        assert!(matches!(err, SimError::UnknownAnimation(_)));
        let mut shots = Vec::new();
        for _ in 0..200 {
            buggy.update(&env(Vec2::ZERO, false), &mut shots, &mut rng).unwrap();
        }
        assert!(buggy.gone);
    }

    #[test]
    fn test_organic_enemy_is_gone_on_death() {
        let mut rng = Pcg32::seed_from_u64(26);
        let mut runner = Enemy::new(Species::Runner, Vec2::new(0.0, 423.0), Facing::Left, 440.0, &mut rng);
        runner.die(Vec2::ZERO, &AnimationTable::default(), &mut rng).unwrap();
        assert!(runner.dead && runner.gone);
        assert_eq!(Species::Runner.death_cues(), &[SoundCue::Scream]);
        assert_eq!(Species::Buggy.death_cues(), &[SoundCue::Scream, SoundCue::Crunch]);
    }

    #[test]
    fn test_enemies_wrap_with_the_player() {
        let mut rng = Pcg32::seed_from_u64(27);
        let mut runner = Enemy::new(Species::Runner, Vec2::new(-3000.0, 423.0), Facing::Left, 440.0, &mut rng);
        let mut shots = Vec::new();
        runner.update(&env(Vec2::new(0.0, 200.0), false), &mut shots, &mut rng).unwrap();
        assert!(runner.position.x > 0.0 && runner.position.x < 2400.0);
    }

    #[test]
    fn test_walkers_report_distance_before_moving() {
        let mut rng = Pcg32::seed_from_u64(30);
        let mut shots = Vec::new();
        let surroundings = env(Vec2::new(0.0, 300.0), false);
        for species in [Species::Runner, Species::Gunner] {
            let mut enemy = Enemy::new(species, Vec2::new(22.0, 300.0), Facing::Left, 440.0, &mut rng);
            let dist = enemy.update(&surroundings, &mut shots, &mut rng).unwrap();
            assert_eq!(dist, Some(22.0));
        }
    }

    #[test]
    fn test_wheel_rate_follows_speed() {
        let mut rng = Pcg32::seed_from_u64(31);
        let mut buggy = Enemy::new(Species::Buggy, Vec2::new(0.0, 396.0), Facing::Right, 440.0, &mut rng);
        buggy.speed = 0.0;
        assert_eq!(buggy.wheel_rate(), None);

        let Behavior::Buggy(state) = &buggy.behavior else {
            unreachable!()
        };
        let max_speed = state.max_speed;
        buggy.speed = -2.0;
        assert_eq!(buggy.wheel_rate(), Some(max_speed / 4.0));

        buggy.die(Vec2::ZERO, &AnimationTable::default(), &mut rng).unwrap();
        assert_eq!(buggy.wheel_rate(), None);

        let runner = Enemy::new(Species::Runner, Vec2::ZERO, Facing::Left, 440.0, &mut rng);
        assert_eq!(runner.wheel_rate(), None);
    }

    #[test]
    fn test_enemy_visibility_uses_sprite_box() {
        let mut rng = Pcg32::seed_from_u64(32);
        let camera = Camera::new(Vec2::ZERO, 1200.0, 890.0);
        let inside = Enemy::new(Species::Runner, Vec2::new(600.0, 423.0), Facing::Left, 440.0, &mut rng);
        assert!(inside.visible(&camera));

        // centre off screen, left edge of the box still inside
        let edge = Enemy::new(Species::Buggy, Vec2::new(1240.0, 396.0), Facing::Left, 440.0, &mut rng);
        assert!(edge.visible(&camera));

        let gone = Enemy::new(Species::Gunner, Vec2::new(1300.0, 420.0), Facing::Left, 440.0, &mut rng);
        assert!(!gone.visible(&camera));
    }

    #[test]
    fn test_runner_label() {
        let mut rng = Pcg32::seed_from_u64(28);
        let mut runner = Enemy::new(Species::Runner, Vec2::ZERO, Facing::Left, 440.0, &mut rng);
        assert_eq!(runner.anim_label(), "idle_l");
        runner.moving = true;
        runner.facing = Facing::Right;
        assert_eq!(runner.anim_label(), "run_r");
    }

    #[test]
    fn test_spawn_inside_view_on_ground() {
        let mut rng = Pcg32::seed_from_u64(29);
        let camera = Camera::new(Vec2::new(100.0, 0.0), 1200.0, 890.0);
        for species in [Species::Runner, Species::Gunner, Species::Buggy] {
            let enemy = Enemy::spawn_on_screen(species, &camera, 440.0, &mut rng);
            assert!(enemy.position.x >= 150.0 && enemy.position.x <= 1250.0);
            assert_eq!(enemy.position.y, 440.0 - species.ground_offset());
        }
    }
}
