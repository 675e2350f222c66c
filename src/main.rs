//! Killer Worm headless driver
//!
//! Runs the simulation without a window: a scripted input sequence steers the
//! worm, sound cues are resolved through the audio manager and a summary of
//! the world is logged periodically.
//!
//! Usage: `killer-worm [settings.json] [frames]`

fn main() {
    env_logger::init();
    if let Err(err) = driver::run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}

mod driver {
    use killer_worm::audio::AudioManager;
    use killer_worm::sim::{GameEvent, GameState, TickInput, Turn, tick};
    use killer_worm::{Settings, SimError};

    /// Default run length: 30 s at the nominal frame rate
    const DEFAULT_FRAMES: u64 = 900;
    const REPORT_EVERY: u64 = 150;

    /// Scripted steering: burrow, dive, then breach and arc back down
    fn scripted_input(frame: u64) -> TickInput {
        let phase = frame % 120;
        let (turn, boost) = match phase {
            0..30 => (Turn::Straight, false),
            30..45 => (Turn::Right, true),
            45..70 => (Turn::Left, true),
            70..90 => (Turn::Straight, true),
            _ => (Turn::Right, false),
        };
        TickInput {
            turn,
            boost,
            ..Default::default()
        }
    }

    pub fn run() -> Result<(), SimError> {
        let mut args = std::env::args().skip(1);
        let settings = match args.next() {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        let frames = args
            .next()
            .and_then(|n| n.parse().ok())
            .unwrap_or(DEFAULT_FRAMES);

        log::info!("Killer Worm (headless) starting, {frames} frames");
        let dt = settings.frame_dt();
        let mut state = GameState::new(settings, 0x5eed);
        let mut audio = AudioManager::default();
        let mut kills = 0usize;
        let mut captures = 0usize;

        for frame in 0..frames {
            tick(&mut state, &scripted_input(frame), dt);

            for event in &state.events {
                match event {
                    GameEvent::Sound(cue) => match audio.play(*cue, &mut state.rng) {
                        Ok(Some(playback)) => {
                            log::debug!("play {} on channel {}", playback.clip, playback.channel)
                        }
                        Ok(None) => {}
                        Err(err) => log::warn!("{err}"),
                    },
                    GameEvent::EnemyKilled { species, position } => {
                        kills += 1;
                        log::info!("frame {frame}: {} killed at {position:?}", species.name());
                    }
                    GameEvent::WandererCaptured { .. } => captures += 1,
                    GameEvent::AssetMissing(what) => log::warn!("frame {frame}: {what}"),
                    GameEvent::EntityFault { collection, reason } => {
                        log::warn!("frame {frame}: dropped from {collection}: {reason}")
                    }
                }
            }

            if (frame + 1) % REPORT_EVERY == 0 {
                log::info!(
                    "frame {}: head {:?}, health {:.1}, enemies alive {}, shots {}, bursts {}",
                    frame + 1,
                    state.player.position(),
                    state.player.health,
                    state.enemies_alive,
                    state.projectiles.len(),
                    state.blood_bursts.len()
                );
            }
            if !state.player_alive() {
                log::info!("frame {frame}: the worm starved");
                break;
            }
        }

        log::info!(
            "Done after {} ticks: {kills} kills, {captures} captures, {} enemies left",
            state.time_ticks,
            state.enemies_alive
        );
        Ok(())
    }
}
