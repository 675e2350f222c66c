//! Animation timing
//!
//! The simulation never touches pixels, but some lifetimes are tied to how
//! long an animation plays (a fire particle lives for one loop of its clip),
//! so frame timing lives here. Frame durations come from an explicitly passed
//! `AnimationTable` keyed by clip label.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::SimError;

/// Clip label for a single fire particle
pub const FIRE_PARTICLE: &str = "fire_part";

/// Frame durations per clip label
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationTable {
    clips: HashMap<String, Vec<f32>>,
}

impl Default for AnimationTable {
    fn default() -> Self {
        let mut table = Self::empty();
        table.insert(FIRE_PARTICLE, vec![0.06; 8]);
        table
    }
}

impl AnimationTable {
    pub fn empty() -> Self {
        Self {
            clips: HashMap::new(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn insert(&mut self, label: impl Into<String>, frame_times: Vec<f32>) {
        self.clips.insert(label.into(), frame_times);
    }

    pub fn frame_times(&self, label: &str) -> Result<&[f32], SimError> {
        let times = self
            .clips
            .get(label)
            .ok_or_else(|| SimError::UnknownAnimation(label.to_string()))?;
        if times.is_empty() {
            return Err(SimError::EmptyAnimation(label.to_string()));
        }
        Ok(times)
    }

    /// A playing clock for `label`, starting at frame 0
    pub fn clock(&self, label: &str) -> Result<FrameClock, SimError> {
        let mut clock = FrameClock::new(self.frame_times(label)?.to_vec());
        clock.play(0);
        Ok(clock)
    }
}

/// Steps through frames, holding each for its own duration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameClock {
    frame_times: Vec<f32>,
    frame: usize,
    time: f32,
    playing: bool,
}

impl FrameClock {
    /// Stopped clock at frame 0. `frame_times` must not be empty.
    pub fn new(frame_times: Vec<f32>) -> Self {
        debug_assert!(!frame_times.is_empty());
        Self {
            frame_times,
            frame: 0,
            time: 0.0,
            playing: false,
        }
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn frame_count(&self) -> usize {
        self.frame_times.len()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn play(&mut self, frame: usize) {
        self.playing = true;
        self.time = 0.0;
        self.frame = frame % self.frame_count();
    }

    pub fn stop(&mut self) {
        self.playing = false;
        self.time = 0.0;
        self.frame = 0;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    pub fn resume(&mut self) {
        self.playing = true;
    }

    /// Advance by `dt`. At most one frame is stepped per call; returns true
    /// when the clip wrapped back to frame 0.
    pub fn advance(&mut self, dt: f32) -> bool {
        if !self.playing {
            return false;
        }
        self.time += dt;
        if self.time >= self.frame_times[self.frame] {
            self.time = 0.0;
            self.frame = (self.frame + 1) % self.frame_count();
            return self.frame == 0;
        }
        false
    }
}
