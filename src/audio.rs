//! Audio boundary
//!
//! The simulation only emits `SoundCue`s. Turning a cue into an actual clip is
//! done here: each category label maps to a set of interchangeable clips, one
//! is picked at random and assigned to the next mixer channel in round-robin
//! order. Mixing and playback belong to the host.

use std::collections::HashMap;

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::SimError;

/// Sound categories the simulation can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    /// Enemy death scream
    Scream,
    /// Vehicle crushed
    Crunch,
}

impl SoundCue {
    pub fn label(self) -> &'static str {
        match self {
            SoundCue::Scream => "death-scream",
            SoundCue::Crunch => "death-crunch",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "death-scream" => Some(SoundCue::Scream),
            "death-crunch" => Some(SoundCue::Crunch),
            _ => None,
        }
    }
}

/// Clip names per category label
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundBank {
    categories: HashMap<String, Vec<String>>,
}

impl Default for SoundBank {
    fn default() -> Self {
        let mut bank = Self::empty();
        bank.insert(
            SoundCue::Scream.label(),
            (0..3).map(|i| format!("scream/{i}.wav")).collect(),
        );
        bank.insert(
            SoundCue::Crunch.label(),
            (0..3).map(|i| format!("crunch/{i}.wav")).collect(),
        );
        bank
    }
}

impl SoundBank {
    pub fn empty() -> Self {
        Self {
            categories: HashMap::new(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn insert(&mut self, label: impl Into<String>, clips: Vec<String>) {
        self.categories.insert(label.into(), clips);
    }

    /// Random clip from the category `label`
    pub fn pick<R: Rng + ?Sized>(&self, label: &str, rng: &mut R) -> Result<&str, SimError> {
        self.categories
            .get(label)
            .and_then(|clips| clips.choose(rng))
            .map(String::as_str)
            .ok_or_else(|| SimError::UnknownSound(label.to_string()))
    }
}

/// A clip assigned to a mixer channel
#[derive(Debug, Clone, PartialEq)]
pub struct Playback {
    pub clip: String,
    pub channel: usize,
    pub volume: f32,
}

/// Channel allocation and volume for sound cues
#[derive(Debug, Clone)]
pub struct AudioManager {
    bank: SoundBank,
    channels: usize,
    next_channel: usize,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(SoundBank::default(), 8)
    }
}

impl AudioManager {
    pub fn new(bank: SoundBank, channels: usize) -> Self {
        Self {
            bank,
            channels: channels.max(1),
            next_channel: 0,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    pub fn play<R: Rng + ?Sized>(&mut self, cue: SoundCue, rng: &mut R) -> Result<Option<Playback>, SimError> {
        self.play_label(cue.label(), rng)
    }

    /// Resolve a category label to a clip on the next channel. Returns
    /// `Ok(None)` while muted; unknown labels are an error either way.
    pub fn play_label<R: Rng + ?Sized>(&mut self, label: &str, rng: &mut R) -> Result<Option<Playback>, SimError> {
        let clip = self.bank.pick(label, rng)?.to_string();
        let volume = self.effective_volume();
        if volume <= 0.0 {
            return Ok(None);
        }
        let channel = self.next_channel;
        self.next_channel = (self.next_channel + 1) % self.channels;
        log::debug!("sound {label} -> {clip} on channel {channel}");
        Ok(Some(Playback {
            clip,
            channel,
            volume,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_labels_round_trip() {
        for cue in [SoundCue::Scream, SoundCue::Crunch] {
            assert_eq!(SoundCue::from_label(cue.label()), Some(cue));
        }
        assert_eq!(SoundCue::from_label("death-whistle"), None);
    }

    #[test]
    fn test_unknown_label_is_an_error() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut audio = AudioManager::default();
        let err = audio.play_label("explosion", &mut rng).unwrap_err();
        assert!(matches!(err, SimError::UnknownSound(ref l) if l == "explosion"));
    }

    #[test]
    fn test_empty_category_is_an_error() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut bank = SoundBank::empty();
        bank.insert("death-scream", Vec::new());
        assert!(bank.pick("death-scream", &mut rng).is_err());
    }

    #[test]
    fn test_channels_round_robin() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut audio = AudioManager::new(SoundBank::default(), 3);
        let channels: Vec<usize> = (0..5)
            .map(|_| audio.play(SoundCue::Scream, &mut rng).unwrap().unwrap().channel)
            .collect();
        assert_eq!(channels, vec![0, 1, 2, 0, 1]);
    }

    #[test]
    fn test_clip_comes_from_category() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut audio = AudioManager::default();
        let playback = audio.play(SoundCue::Crunch, &mut rng).unwrap().unwrap();
        assert!(playback.clip.starts_with("crunch/"));
        assert!((playback.volume - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_muted_plays_nothing() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut audio = AudioManager::default();
        audio.set_muted(true);
        assert_eq!(audio.play(SoundCue::Scream, &mut rng).unwrap(), None);
    }
}
