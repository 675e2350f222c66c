//! Killer Worm - simulation kernel for a side-scrolling worm action game
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (worm chains, cameras, enemies, effects)
//! - `audio`: Sound category lookup for the audio collaborator
//! - `settings`: Data-driven tuning loaded from JSON
//! - `error`: Crate error type

pub mod audio;
pub mod error;
pub mod settings;
pub mod sim;

pub use error::SimError;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Simulation frame rate (one tick per rendered frame)
    pub const FRAME_RATE: f32 = 30.0;
    /// Seconds per frame at the nominal frame rate
    pub const FRAME_DT: f32 = 1.0 / FRAME_RATE;

    /// Viewport dimensions
    pub const SCREEN_WIDTH: f32 = 1200.0;
    pub const SCREEN_HEIGHT: f32 = 890.0;

    /// Ground line: anything with a larger y is underground
    pub const GROUND_Y: f32 = 440.0;

    /// Radius of every worm segment
    pub const SEGMENT_RADIUS: f32 = 25.0;

    /// Player worm defaults
    pub const PLAYER_LENGTH: usize = 10;
    pub const PLAYER_SEPARATION: f32 = 20.0;
    pub const PLAYER_NORMAL_SPEED: f32 = 2.0;
    pub const PLAYER_BOOST_SPEED: f32 = 14.0;
    /// Degrees per frame
    pub const PLAYER_TURN_RATE: f32 = 10.0;
    /// Turn rate multiplier while airborne
    pub const AIR_TURN_RATIO: f32 = 0.5;
    /// Fraction of the speed gap closed per grounded frame
    pub const SPEED_EASE_GAIN: f32 = 0.1;
    pub const GRAVITY: f32 = 0.5;
    pub const AIR_DRAG: f32 = 0.99;
    pub const PLAYER_MAX_HEALTH: f32 = 500.0;
    pub const HEALTH_DRAIN_PER_FRAME: f32 = 0.1;
    pub const CAPTURE_HEAL: f32 = 10.0;

    /// Wanderer (AI worm) defaults
    pub const WANDERER_LINKS: usize = 5;
    pub const WANDERER_SEPARATION: f32 = 5.0;
    /// Degrees per frame
    pub const WANDERER_TURN_RATE: f32 = 5.0;

    /// Link blending weights for the lag (previous) and lead (current) signals
    pub const LAG_WEIGHT: f32 = 500.0;
    pub const LEAD_WEIGHT: f32 = 1.0;

    /// World wraps once an entity is this many viewport widths away
    pub const WRAP_TRIGGER_WIDTHS: f32 = 2.0;
    /// ...and is moved by this many viewport widths
    pub const WRAP_SHIFT_WIDTHS: f32 = 4.0;

    /// Camera follow gain per frame
    pub const CAMERA_FOLLOW_GAIN: f32 = 1.0 / 20.0;
    /// Parallax divisors for the mid and far background layers
    pub const MID_LAYER_DIVISOR: f32 = 2.0;
    pub const FAR_LAYER_DIVISOR: f32 = 4.0;

    /// Anything within this distance of the player head opens the fangs
    pub const CLOSE_DISTANCE: f32 = 70.0;

    /// Maximum concurrently active blood bursts
    pub const MAX_BLOOD_BURSTS: usize = 7;
    /// Projectiles expire after this many seconds
    pub const PROJECTILE_MAX_AGE: f32 = 10.0;
}
