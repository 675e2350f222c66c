//! Frame-stepped simulation
//!
//! All gameplay logic lives here:
//! - Fixed per-frame steps driven by `tick`
//! - One seeded RNG, passed explicitly
//! - Stable iteration order within every collection
//! - No rendering, audio or platform dependencies

pub mod anim;
pub mod camera;
pub mod chain;
pub mod creature;
pub mod effects;
pub mod enemy;
pub mod lifecycle;
pub mod polar;
pub mod projectile;
pub mod state;
pub mod tick;

pub use anim::{AnimationTable, FrameClock};
pub use camera::{Camera, Rect};
pub use chain::{Head, Link, Segment, Steering, Turn};
pub use creature::{PlayerWorm, SegmentedCreature, wrap_offset};
pub use effects::{BloodBurst, Fire};
pub use enemy::{Enemy, Facing, Species};
pub use lifecycle::{Fate, SweepReport, sweep, sweep_spawning};
pub use projectile::{Projectile, ProjectileKind};
pub use state::{GameEvent, GameState};
pub use tick::{TickInput, tick};
