//! Per-frame simulation tick
//!
//! Order within a frame:
//! 1. debug input (health drain, spawn)
//! 2. player worm, then the primary camera
//! 3. enemy pass (updates, kills, death cues, blood)
//! 4. wanderer pass (updates, captures, replacements)
//! 5. close signal to the fangs
//! 6. blood bursts, then projectiles
//! 7. parallax cameras

use super::chain::{Steering, Turn};
use super::effects::{BloodBurst, evict_oldest, push_capped};
use super::enemy::{Species, Surroundings};
use super::lifecycle::{Fate, SweepReport, sweep, sweep_spawning};
use super::state::{GameEvent, GameState, draw_scream_gap, new_wanderer};
use crate::SimError;
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub turn: Turn,
    pub boost: bool,
    /// Debug: add an enemy of this species on screen
    pub spawn: Option<Species>,
    /// Debug: remove a chunk of player health
    pub drain_health: bool,
}

/// Advance the world by one frame
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();

    if input.drain_health {
        state.player.hurt(state.settings.debug_drain);
    }
    if let Some(species) = input.spawn {
        state.spawn_enemy(species);
    }

    let steering = Steering {
        turn: input.turn,
        boost: input.boost,
    };
    let ground_y = state.settings.ground_y;
    state.player.update(dt, steering, ground_y, &mut state.rng);
    state.camera.track_x(state.player.position().x, CAMERA_FOLLOW_GAIN);

    let enemies_close = update_enemies(state, dt);
    let wanderers_close = update_wanderers(state, dt);
    state.close = enemies_close || wanderers_close;
    state.player.fangs.opened = state.close;

    update_blood(state);
    update_projectiles(state, dt);

    state.mid_camera.follow_parallax(&state.camera, MID_LAYER_DIVISOR);
    state.far_camera.follow_parallax(&state.camera, FAR_LAYER_DIVISOR);
    state.time_ticks += 1;
}

fn record_faults(events: &mut Vec<GameEvent>, collection: &'static str, report: SweepReport) {
    for err in report.faults {
        events.push(GameEvent::EntityFault {
            collection,
            reason: err.to_string(),
        });
    }
}

/// Returns true when an enemy is within reach of the player head
fn update_enemies(state: &mut GameState, dt: f32) -> bool {
    let GameState {
        rng,
        settings,
        camera,
        player,
        enemies,
        projectiles,
        blood_bursts,
        scream_time,
        next_scream,
        enemies_alive,
        events,
        ..
    } = state;

    *scream_time += dt;
    let env = Surroundings {
        dt,
        player: player.position(),
        player_grounded: player.grounded(),
        view_width: camera.width(),
    };
    let head_radius = player.head().radius;
    let impact = player.body.head.velocity;

    let mut close = false;
    let mut alive = 0;
    let report = sweep(enemies, |enemy| {
        let Some(distance) = enemy.update(&env, projectiles, rng)? else {
            return Ok(Fate::keep_if(!enemy.gone));
        };
        if distance < CLOSE_DISTANCE {
            close = true;
        }
        if !enemy.dead {
            alive += 1;
        }

        let caught = distance < head_radius + enemy.death_radius;
        if caught && !env.player_grounded && !enemy.dead {
            if *scream_time > *next_scream {
                events.extend(enemy.species.death_cues().iter().map(|&cue| GameEvent::Sound(cue)));
                *scream_time = 0.0;
                *next_scream = draw_scream_gap(rng);
            }
            if let Err(err) = enemy.die(impact, &settings.animations, rng) {
                log::warn!("{} died without its effects: {err}", enemy.species.name());
                events.push(GameEvent::AssetMissing(err.to_string()));
            }
            log::debug!("{} killed at {:?}", enemy.species.name(), enemy.position);
            events.push(GameEvent::EnemyKilled {
                species: enemy.species,
                position: enemy.position,
            });
            if let Some((amount, power)) = enemy.species.blood() {
                let burst = BloodBurst::new(enemy.position, amount, power, settings.ground_y, rng);
                push_capped(blood_bursts, burst, settings.max_blood_bursts);
            }
        }
        Ok(Fate::keep_if(!enemy.gone))
    });

    *enemies_alive = alive;
    record_faults(events, "enemies", report);
    close
}

/// Returns true when a wanderer is within reach of the player head
fn update_wanderers(state: &mut GameState, dt: f32) -> bool {
    let GameState {
        rng,
        settings,
        camera,
        player,
        wanderers,
        events,
        ..
    } = state;
    let settings = &*settings;
    let camera = &*camera;
    let head = player.position();
    let head_radius = player.head().radius;

    let mut close = false;
    let report = sweep_spawning(wanderers, |wanderer, spawned| {
        wanderer.update(dt, Steering::default(), rng);
        wanderer.wrap_toward(head.x, camera.width());
        if !wanderer.is_finite() {
            return Err(SimError::NonFinite { entity: "wanderer" });
        }

        let distance = wanderer.distance_to(head);
        if distance < CLOSE_DISTANCE {
            close = true;
        }
        if distance < head_radius {
            player.heal(settings.capture_heal);
            events.push(GameEvent::WandererCaptured {
                position: wanderer.head_position(),
            });
            spawned.push(new_wanderer(camera, settings, true, rng));
            return Ok(Fate::Remove);
        }
        Ok(Fate::Keep)
    });

    record_faults(events, "wanderers", report);
    close
}

fn update_blood(state: &mut GameState) {
    evict_oldest(&mut state.blood_bursts, state.settings.max_blood_bursts);
    sweep(&mut state.blood_bursts, |burst| {
        burst.update();
        Ok(Fate::keep_if(!burst.is_spent()))
    });
}

fn update_projectiles(state: &mut GameState, dt: f32) {
    let ground_y = state.settings.ground_y;
    let report = sweep(&mut state.projectiles, |shot| {
        let alive = shot.update(dt, ground_y);
        if !shot.position.is_finite() {
            return Err(SimError::NonFinite { entity: "projectile" });
        }
        Ok(Fate::keep_if(alive))
    });
    record_faults(&mut state.events, "projectiles", report);
}
