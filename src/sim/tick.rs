//! Fixed timestep simulation tick
//!
//! Advances one playthrough by a single step in a fixed order: input,
//! self-updates, interactions, cue flush, then the defeat, level and victory
//! checks.

use glam::Vec2;

use super::interaction::{Arena, Interactions};
use super::pool::Poolable;
use super::state::{GameState, Outcome, Phase, RunSummary};
use crate::arena_bounds;
use crate::audio::{MusicTrack, SoundCue};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub thrust: bool,
    pub brake: bool,
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub fire: bool,
    /// Open the upgrade shop (pauses the game)
    pub open_shop: bool,
    /// Abandon the run and go back to the menu
    pub cancel: bool,
}

/// Services the simulation calls out to. Fire-and-forget.
pub trait Host {
    fn play_sound(&mut self, cue: SoundCue);
    fn play_music(&mut self, track: MusicTrack);
    /// Called exactly once per run, on victory or defeat
    fn show_outcome(&mut self, outcome: Outcome, summary: RunSummary);
    fn exit_to_menu(&mut self);
    fn show_shop(&mut self) {}
}

/// Advance the game state by one timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32, host: &mut impl Host) {
    // Don't tick if paused or the run is over
    if state.is_paused() || state.phase.is_terminal() {
        return;
    }

    if input.cancel {
        state.phase = Phase::Abandoned;
        log::info!("Run abandoned at level {}", state.level);
        host.exit_to_menu();
        return;
    }
    if input.open_shop {
        state.set_paused(true);
        host.show_shop();
        return;
    }

    state.time_ticks += 1;
    state.round_timer += dt;
    state.help_timer += dt;

    apply_input(state, input, dt);
    update_entities(state, dt);

    let arena = if state.phase == Phase::Boss {
        Arena::Boss
    } else {
        Arena::Wave
    };
    let opponent = match arena {
        Arena::Wave => &mut state.enemy,
        Arena::Boss => &mut state.boss,
    };
    Interactions {
        arena,
        level: state.level,
        dt,
        player: &mut state.player,
        pilot: &mut state.pilot,
        opponent: Some(opponent),
        asteroids: &mut state.asteroids,
        projectiles: &mut state.projectiles,
        pickups: &mut state.pickups,
        effects: &mut state.effects,
        rng: &mut state.rng,
        rules: &state.tuning.rules,
        cues: &mut state.cues,
    }
    .resolve();

    state.projectiles.release_inactive();
    state.asteroids.release_inactive();
    state.pickups.release_inactive();
    state.effects.release_inactive();

    for cue in state.cues.drain(..) {
        host.play_sound(cue);
    }
    if let Some(track) = state.music.take() {
        host.play_music(track);
    }

    if !state.player.is_alive() {
        finish(state, Outcome::Defeat, host);
        return;
    }

    if state.phase == Phase::Wave && state.asteroids.is_empty() {
        advance_level(state, host);
    }

    if state.phase == Phase::Boss && !state.boss.is_alive() {
        finish(state, Outcome::Victory, host);
    }
}

fn apply_input(state: &mut GameState, input: &TickInput, dt: f32) {
    let player = &mut state.player;
    if input.rotate_left {
        player.rotate(1.0, dt);
    }
    if input.rotate_right {
        player.rotate(-1.0, dt);
    }
    if input.thrust {
        player.thrust(dt);
    }
    if input.brake {
        player.brake(dt);
    }
    if input.fire && player.try_fire(&mut state.projectiles) {
        state.cues.push(SoundCue::Shot);
    }
}

fn update_entities(state: &mut GameState, dt: f32) {
    let bounds = arena_bounds();

    state.player.update(dt, bounds);
    state.player.emit_trail(&mut state.effects);
    state.pilot.update(dt);

    state.helper.update(dt, bounds);
    if state
        .helper
        .ready_to_drop(state.player.hit(), state.help_timer)
    {
        state.pickups.spawn_random(state.helper.pos, &mut state.rng);
        state.help_timer = 0.0;
        log::debug!("Helper dropped a pickup");
    }

    state
        .projectiles
        .update_all(dt, bounds, &mut state.effects);
    state.pickups.update_all(dt);
    state.effects.update(dt);

    let target = state.player.pos;
    match state.phase {
        Phase::Wave => {
            if state.enemy.is_alive() {
                if state.enemy.pursue(target, dt, &mut state.projectiles) {
                    state.cues.push(SoundCue::Shot);
                }
                state.enemy.update(dt, bounds);
                state.enemy.emit_trail(&mut state.effects);
            }
            state.asteroids.update_all(dt, bounds);
        }
        Phase::Boss => {
            if state.boss.is_alive() {
                if state.boss.pursue(target, dt, &mut state.projectiles) {
                    state.cues.push(SoundCue::Shot);
                }
                state.boss.update(dt, bounds);
                state.boss.emit_trail(&mut state.effects);
            }
            if !state.boss_enraged && state.boss.hp() * 2 <= state.boss.hp_max() {
                state.boss_enraged = true;
                state.boss.upgrade_weapon();
                log::debug!("Boss enraged at {} hp", state.boss.hp());
            }
        }
        _ => {}
    }
}

/// Move on once the asteroid field is cleared
fn advance_level(state: &mut GameState, host: &mut impl Host) {
    let boss_level = state.boss_level();
    if state.level + 1 < boss_level {
        state.level += 1;
        state.player.restore();
        let spawn = state.tuning.enemy.spawn_point(&mut state.rng);
        state.enemy.place(spawn);
        state.enemy.resurrect();
        state.spawn_wave();
    } else if state.level + 1 == boss_level {
        state.level += 1;
        state.player.restore();
        state.phase = Phase::Boss;
        host.play_music(MusicTrack::Boss);
    } else {
        return;
    }

    state.round_timer = 0.0;
    host.play_sound(SoundCue::LevelUp);
    log::info!("Level {} (score {})", state.level, state.pilot.score());
}

fn finish(state: &mut GameState, outcome: Outcome, host: &mut impl Host) {
    state.phase = match outcome {
        Outcome::Victory => Phase::Victory,
        Outcome::Defeat => Phase::Defeat,
    };
    let summary = state.summary();
    log::info!(
        "{outcome:?} at level {} with score {}",
        summary.level,
        summary.score
    );
    host.play_sound(match outcome {
        Outcome::Victory => SoundCue::Victory,
        Outcome::Defeat => SoundCue::Defeat,
    });
    host.show_outcome(outcome, summary);
}

/// Simple AI pilot for the demo loop: fly at the nearest threat and shoot,
/// picking up loot when nothing is close
pub fn autopilot_input(state: &GameState) -> TickInput {
    let player = &state.player;
    let mut input = TickInput::default();

    let nearest = |points: &mut dyn Iterator<Item = Vec2>| {
        points.min_by(|a, b| {
            a.distance_squared(player.pos)
                .partial_cmp(&b.distance_squared(player.pos))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    };

    let opponent = match state.phase {
        Phase::Boss if state.boss.is_alive() => Some(state.boss.pos),
        Phase::Wave if state.enemy.is_alive() => Some(state.enemy.pos),
        _ => None,
    };
    let threat = nearest(
        &mut state
            .asteroids
            .iter()
            .filter(|a| a.is_active())
            .map(|a| a.pos)
            .chain(opponent),
    );
    let loot = nearest(&mut state.pickups.iter().filter(|p| p.is_active()).map(|p| p.pos));

    // Threats within this range take priority over loot
    const DANGER_RANGE: f32 = 350.0;
    let target = match (threat, loot) {
        (Some(t), Some(l)) if t.distance(player.pos) > DANGER_RANGE => Some((l, false)),
        (Some(t), _) => Some((t, true)),
        (None, Some(l)) => Some((l, false)),
        (None, None) => None,
    };

    let Some((target, hostile)) = target else {
        return input;
    };

    let wanted = crate::heading(player.pos, target);
    let delta = crate::normalize_angle(wanted - player.angle);
    if delta > 0.05 {
        input.rotate_left = true;
    } else if delta < -0.05 {
        input.rotate_right = true;
    }

    let dist = player.pos.distance(target);
    let facing = delta.abs() < 0.3;
    if hostile {
        input.fire = facing;
        // Keep some room so asteroids don't ram us
        input.thrust = facing && dist > 250.0;
        input.brake = dist < 150.0;
    } else {
        input.thrust = facing;
    }
    input
}
