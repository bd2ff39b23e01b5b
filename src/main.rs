//! Star Arena headless entry point
//!
//! Runs one autopiloted playthrough with the fixed-step accumulator loop a
//! windowed frontend would use, logging what a real host would render.
//!
//! Usage: `star-arena [seed] [tuning.json]`

use std::path::{Path, PathBuf};

use star_arena::audio::{AudioQueue, MusicTrack, SoundCue};
use star_arena::consts::*;
use star_arena::sim::{GameState, Host, Outcome, RunSummary, autopilot_input, tick};
use star_arena::{ConfigError, HighScores, Settings, Tuning};

const SETTINGS_FILE: &str = "settings.json";
const SCORES_FILE: &str = "highscores.json";

/// Wall-clock frame length the demo pretends to run at
const FRAME_DT: f32 = 1.0 / 30.0;
/// Give up after ten simulated minutes
const MAX_FRAMES: u32 = 30 * 60 * 10;

/// Host side of the simulation: audio mixing and navigation
struct DemoHost {
    audio: AudioQueue,
    outcome: Option<(Outcome, RunSummary)>,
    exited: bool,
}

impl Host for DemoHost {
    fn play_sound(&mut self, cue: SoundCue) {
        self.audio.play(cue);
    }

    fn play_music(&mut self, track: MusicTrack) {
        self.audio.play_music(track);
    }

    fn show_outcome(&mut self, outcome: Outcome, summary: RunSummary) {
        self.outcome = Some((outcome, summary));
    }

    fn exit_to_menu(&mut self) {
        self.exited = true;
    }
}

fn main() -> Result<(), ConfigError> {
    env_logger::init();
    log::info!("Star Arena (headless) starting...");

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0x5EED);
    let tuning = match args.next().map(PathBuf::from) {
        Some(path) => Tuning::load(&path)?,
        None => Tuning::default(),
    };

    let settings = Settings::load(Path::new(SETTINGS_FILE));
    let mut state = GameState::with_settings(seed, tuning, &settings)?;
    let mut host = DemoHost {
        audio: AudioQueue::new(&settings),
        outcome: None,
        exited: false,
    };

    let mut accumulator = 0.0;
    let mut frames = 0;
    while host.outcome.is_none() && !host.exited && frames < MAX_FRAMES {
        accumulator += FRAME_DT;

        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = autopilot_input(&state);
            tick(&mut state, &input, SIM_DT, &mut host);
            accumulator -= SIM_DT;
            substeps += 1;
        }

        // A real frontend would draw the snapshot and feed the mixer here
        let snapshot = state.snapshot();
        let played = host.audio.drain().count();
        if frames % 300 == 0 {
            log::debug!(
                "t={:.1}s level {} hp {}/{} score {} sprites {} particles {} sounds {}",
                state.time_ticks as f32 * SIM_DT,
                snapshot.hud.level,
                snapshot.hud.hp,
                snapshot.hud.hp_max,
                snapshot.hud.score,
                snapshot.sprites.len(),
                snapshot.particles.len(),
                played
            );
        }
        frames += 1;
    }

    let Some((outcome, summary)) = host.outcome else {
        log::warn!("Run did not finish in {MAX_FRAMES} frames");
        return Ok(());
    };
    log::info!(
        "{outcome:?}: level {}, score {}, currency {}",
        summary.level,
        summary.score,
        summary.currency
    );

    if outcome == Outcome::Victory {
        let path = Path::new(SCORES_FILE);
        let mut scores = HighScores::load(path)?;
        if let Some(rank) = scores.record("autopilot", &summary) {
            log::info!("Autopilot placed #{rank}");
            scores.save(path)?;
        }
        print!("{}", scores.format_table());
    }
    Ok(())
}
