//! Simulation tuning
//!
//! Everything a host may want to tweak without recompiling. Defaults match
//! the shipped game; a JSON document may override any subset of fields.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::SimError;
use crate::consts::*;
use crate::sim::anim::AnimationTable;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Viewport ===
    pub screen_width: f32,
    pub screen_height: f32,
    /// Ticks per second; `frame_dt` is derived from it
    pub frame_rate: f32,

    // === World ===
    /// Ground line; larger y is underground
    pub ground_y: f32,
    /// Bottom of the playfield; the screen bottom when unset
    pub floor_y: Option<f32>,

    // === Player worm ===
    pub player_start: Vec2,
    pub player_length: usize,
    pub player_separation: f32,
    pub player_max_health: f32,
    /// Health lost every frame
    pub health_drain: f32,
    /// Health removed by the debug drain input
    pub debug_drain: f32,
    /// Health restored per captured wanderer
    pub capture_heal: f32,

    // === Populations ===
    pub runners: usize,
    pub gunners: usize,
    pub buggies: usize,
    pub wanderers: usize,

    // === Effects ===
    pub max_blood_bursts: usize,

    /// Frame timing for animations the simulation depends on
    pub animations: AnimationTable,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            frame_rate: FRAME_RATE,

            ground_y: GROUND_Y,
            floor_y: None,

            player_start: Vec2::new(600.0, 665.0),
            player_length: PLAYER_LENGTH,
            player_separation: PLAYER_SEPARATION,
            player_max_health: PLAYER_MAX_HEALTH,
            health_drain: HEALTH_DRAIN_PER_FRAME,
            debug_drain: 10.0,
            capture_heal: CAPTURE_HEAL,

            runners: 10,
            gunners: 5,
            buggies: 3,
            wanderers: 10,

            max_blood_bursts: MAX_BLOOD_BURSTS,

            animations: AnimationTable::default(),
        }
    }
}

impl Settings {
    pub fn frame_dt(&self) -> f32 {
        if self.frame_rate > 0.0 {
            1.0 / self.frame_rate
        } else {
            FRAME_DT
        }
    }

    pub fn floor_y(&self) -> f32 {
        self.floor_y.unwrap_or(self.screen_height)
    }

    /// Parse settings, falling back to defaults for missing fields
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let settings = Settings::default();
        assert_eq!(settings.player_length, 10);
        assert_eq!(settings.max_blood_bursts, 7);
        assert!((settings.frame_dt() - 1.0 / 30.0).abs() < 1e-6);
        assert_eq!(settings.runners + settings.gunners + settings.buggies, 18);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{"runners": 2, "ground_y": 500.0}"#).unwrap();
        assert_eq!(settings.runners, 2);
        assert_eq!(settings.ground_y, 500.0);
        assert_eq!(settings.gunners, 5);
        assert!(settings.animations.frame_times("fire_part").is_ok());
    }

    #[test]
    fn test_json_round_trip() {
        let mut settings = Settings::default();
        settings.wanderers = 3;
        let parsed = Settings::from_json(&settings.to_json().unwrap()).unwrap();
        assert_eq!(parsed.wanderers, 3);
        assert_eq!(parsed.player_start, settings.player_start);
    }

    #[test]
    fn test_floor_follows_screen_height() {
        assert_eq!(Settings::default().floor_y(), SCREEN_HEIGHT);
        let taller = Settings::from_json(r#"{"screen_height": 1000.0}"#).unwrap();
        assert_eq!(taller.floor_y(), 1000.0);
        let pinned = Settings::from_json(r#"{"screen_height": 1000.0, "floor_y": 950.0}"#).unwrap();
        assert_eq!(pinned.floor_y(), 950.0);
    }

    #[test]
    fn test_bad_json_is_a_config_error() {
        let err = Settings::from_json("{ runners: ").unwrap_err();
        assert!(matches!(err, SimError::Config(_)));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let err = Settings::load("/nonexistent/killer-worm.json").unwrap_err();
        assert!(matches!(err, SimError::Io(_)));
    }

    #[test]
    fn test_zero_frame_rate_falls_back() {
        let settings = Settings {
            frame_rate: 0.0,
            ..Settings::default()
        };
        assert!((settings.frame_dt() - FRAME_DT).abs() < 1e-6);
    }
}
