//! World state and spawning
//!
//! Everything the per-frame tick reads and writes lives in `GameState`. The
//! world is the only place entities are created or destroyed.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::camera::Camera;
use super::chain::PlayerDrive;
use super::creature::{PlayerWorm, SegmentedCreature};
use super::effects::BloodBurst;
use super::enemy::{Enemy, Species};
use super::projectile::Projectile;
use crate::Settings;
use crate::audio::SoundCue;

/// Something the host should react to, emitted during a tick
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Sound(SoundCue),
    EnemyKilled { species: Species, position: Vec2 },
    WandererCaptured { position: Vec2 },
    /// An animation or sound asset could not be resolved
    AssetMissing(String),
    /// An entity failed its update and was dropped
    EntityFault { collection: &'static str, reason: String },
}

/// Gap before the next death scream may play
pub fn draw_scream_gap<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.random::<f32>() * 0.5 + 0.25
}

/// Complete world state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub settings: Settings,
    /// Primary camera, tracks the player
    pub camera: Camera,
    /// Parallax layers
    pub mid_camera: Camera,
    pub far_camera: Camera,
    pub player: PlayerWorm,
    pub enemies: Vec<Enemy>,
    /// AI worms the player can capture
    pub wanderers: Vec<SegmentedCreature>,
    pub projectiles: Vec<Projectile>,
    pub blood_bursts: Vec<BloodBurst>,
    /// Seconds since the last death scream
    pub scream_time: f32,
    pub next_scream: f32,
    pub enemies_alive: usize,
    /// Something is within reach of the player head
    pub close: bool,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events from the most recent tick
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a populated world with the given seed
    pub fn new(settings: Settings, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let camera = Camera::new(Vec2::ZERO, settings.screen_width, settings.screen_height);

        let drive = PlayerDrive::new(settings.ground_y, settings.floor_y());
        let body = SegmentedCreature::player(
            settings.player_start,
            settings.player_length,
            settings.player_separation,
            drive,
        );
        let mut player = PlayerWorm::new(body, settings.player_max_health);
        player.health_drain = settings.health_drain;

        let next_scream = draw_scream_gap(&mut rng);
        let mut state = Self {
            seed,
            rng,
            camera,
            mid_camera: camera,
            far_camera: camera,
            player,
            enemies: Vec::new(),
            wanderers: Vec::new(),
            projectiles: Vec::new(),
            blood_bursts: Vec::new(),
            scream_time: 0.0,
            next_scream,
            enemies_alive: 0,
            close: false,
            time_ticks: 0,
            events: Vec::new(),
            settings,
        };

        let populations = [
            (Species::Runner, state.settings.runners),
            (Species::Gunner, state.settings.gunners),
            (Species::Buggy, state.settings.buggies),
        ];
        for (species, count) in populations {
            for _ in 0..count {
                state.spawn_enemy(species);
            }
        }
        for _ in 0..state.settings.wanderers {
            state.spawn_wanderer(false);
        }
        state.enemies_alive = state.enemies.len();

        log::info!(
            "World created: seed={seed}, {} enemies, {} wanderers",
            state.enemies.len(),
            state.wanderers.len()
        );
        state
    }

    /// Spawn an enemy standing on the ground somewhere in view
    pub fn spawn_enemy(&mut self, species: Species) {
        let enemy = Enemy::spawn_on_screen(species, &self.camera, self.settings.ground_y, &mut self.rng);
        log::debug!("Spawned {} at {:?}", species.name(), enemy.position);
        self.enemies.push(enemy);
    }

    /// Spawn an AI worm underground near the camera. With `off_screen` it is
    /// kept at least half a viewport from the camera centre.
    pub fn spawn_wanderer(&mut self, off_screen: bool) {
        let wanderer = new_wanderer(&self.camera, &self.settings, off_screen, &mut self.rng);
        self.wanderers.push(wanderer);
    }

    pub fn player_alive(&self) -> bool {
        self.player.health > 0.0
    }
}

/// Underground band wanderers live in: (top, bottom)
pub fn wanderer_band(settings: &Settings) -> (f32, f32) {
    let top = settings.ground_y + 50.0;
    let bottom = (settings.screen_height - 100.0).max(top);
    (top, bottom)
}

pub fn new_wanderer<R: Rng + ?Sized>(
    camera: &Camera,
    settings: &Settings,
    off_screen: bool,
    rng: &mut R,
) -> SegmentedCreature {
    let width = camera.width();
    let center_x = camera.center().x;
    let mut x = center_x + rng.random_range(-width..=2.0 * width);
    while off_screen && (center_x - x).abs() < width / 2.0 {
        x = center_x + rng.random_range(-width..=2.0 * width);
    }
    let (top, bottom) = wanderer_band(settings);
    let y = rng.random_range(top..=bottom);
    SegmentedCreature::wanderer(Vec2::new(x, y), top, bottom, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::PLAYER_MAX_HEALTH;
    use crate::sim::chain::HeadDrive;

    #[test]
    fn test_initial_populations() {
        let state = GameState::new(Settings::default(), 1);
        assert_eq!(state.enemies.len(), 18);
        assert_eq!(state.wanderers.len(), 10);
        assert_eq!(state.enemies_alive, 18);
        assert_eq!(state.player.body.segment_count(), 11);
        assert_eq!(state.player.health, PLAYER_MAX_HEALTH);
        assert!(state.next_scream >= 0.25 && state.next_scream < 0.75);
    }

    #[test]
    fn test_same_seed_same_world() {
        let a = GameState::new(Settings::default(), 42);
        let b = GameState::new(Settings::default(), 42);
        for (ea, eb) in a.enemies.iter().zip(&b.enemies) {
            assert_eq!(ea.position, eb.position);
            assert_eq!(ea.species, eb.species);
        }
    }

    #[test]
    fn test_wanderers_spawn_underground() {
        let state = GameState::new(Settings::default(), 2);
        let (top, bottom) = wanderer_band(&state.settings);
        for wanderer in &state.wanderers {
            let y = wanderer.head_position().y;
            assert!(y >= top && y <= bottom);
        }
    }

    #[test]
    fn test_off_screen_wanderer_keeps_distance() {
        let mut state = GameState::new(Settings::default(), 3);
        let center_x = state.camera.center().x;
        for _ in 0..50 {
            state.spawn_wanderer(true);
            let x = state.wanderers.last().unwrap().head_position().x;
            assert!((x - center_x).abs() >= state.camera.width() / 2.0);
        }
    }

    #[test]
    fn test_player_floor_tracks_screen_height() {
        let settings = Settings {
            screen_height: 1000.0,
            ..Settings::default()
        };
        let state = GameState::new(settings, 5);
        let HeadDrive::Player(drive) = &state.player.body.head.drive else {
            panic!("player head is not player driven");
        };
        assert_eq!(drive.floor_y, 1000.0);
    }

    #[test]
    fn test_scream_gap_range() {
        let mut rng = Pcg32::seed_from_u64(4);
        for _ in 0..200 {
            let gap = draw_scream_gap(&mut rng);
            assert!((0.25..0.75).contains(&gap));
        }
    }
}
