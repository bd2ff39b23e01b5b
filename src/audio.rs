//! Sound cues and the mixing queue handed to the playback backend
//!
//! The simulation only names *what* happened; the host feeds those cues
//! through an [`AudioQueue`] that applies the player's volume settings and
//! hands the result to whatever backend actually makes noise.

use serde::{Deserialize, Serialize};

use crate::settings::Settings;

/// Discrete gameplay sounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    /// Volley fired by any ship
    Shot,
    /// Asteroid destroyed
    AsteroidDestroyed,
    /// Enemy or boss destroyed
    ShipDestroyed,
    /// Pickup collected
    PickupCollected,
    /// Level advanced
    LevelUp,
    Victory,
    Defeat,
}

impl SoundCue {
    /// Relative loudness of each cue before user volume is applied
    pub fn base_gain(self) -> f32 {
        match self {
            SoundCue::Shot => 0.4,
            SoundCue::PickupCollected => 0.7,
            SoundCue::AsteroidDestroyed | SoundCue::ShipDestroyed => 0.9,
            SoundCue::LevelUp | SoundCue::Victory | SoundCue::Defeat => 1.0,
        }
    }
}

/// Background music tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MusicTrack {
    Menu,
    Gameplay,
    Boss,
}

/// A cue ready for playback at a final volume
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Playback {
    pub cue: SoundCue,
    pub volume: f32,
}

/// Mixer state plus pending cues
#[derive(Debug, Clone)]
pub struct AudioQueue {
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    sound_enabled: bool,
    music_enabled: bool,
    muted: bool,
    pending: Vec<Playback>,
    music: Option<MusicTrack>,
}

impl Default for AudioQueue {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

impl AudioQueue {
    pub fn new(settings: &Settings) -> Self {
        let mut queue = Self {
            master_volume: 1.0,
            sfx_volume: 1.0,
            music_volume: 1.0,
            sound_enabled: true,
            music_enabled: true,
            muted: false,
            pending: Vec::new(),
            music: None,
        };
        queue.apply_settings(settings);
        queue
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.master_volume = settings.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
        self.music_volume = settings.music_volume.clamp(0.0, 1.0);
        self.sound_enabled = settings.sound_enabled;
        self.music_enabled = settings.music_enabled;
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn sfx_gain(&self) -> f32 {
        if self.muted || !self.sound_enabled {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Effective music volume
    pub fn music_gain(&self) -> f32 {
        if self.muted || !self.music_enabled {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }

    /// Queue a cue; silent cues are dropped
    pub fn play(&mut self, cue: SoundCue) {
        let volume = self.sfx_gain() * cue.base_gain();
        if volume <= 0.0 {
            return;
        }
        self.pending.push(Playback { cue, volume });
    }

    /// Switch the background track
    pub fn play_music(&mut self, track: MusicTrack) {
        if self.music != Some(track) {
            log::debug!("Music -> {track:?}");
            self.music = Some(track);
        }
    }

    pub fn music(&self) -> Option<MusicTrack> {
        self.music
    }

    /// Hand pending cues to the backend
    pub fn drain(&mut self) -> std::vec::Drain<'_, Playback> {
        self.pending.drain(..)
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_applies_settings() {
        let settings = Settings {
            master_volume: 0.5,
            sfx_volume: 0.5,
            ..Settings::default()
        };
        let mut audio = AudioQueue::new(&settings);
        audio.play(SoundCue::LevelUp);
        let played: Vec<_> = audio.drain().collect();
        assert_eq!(played.len(), 1);
        assert!((played[0].volume - 0.25).abs() < 1e-6);
        assert_eq!(audio.pending(), 0);
    }

    #[test]
    fn test_muted_drops_cues() {
        let mut audio = AudioQueue::default();
        audio.set_muted(true);
        audio.play(SoundCue::Shot);
        assert_eq!(audio.pending(), 0);
        assert_eq!(audio.music_gain(), 0.0);
    }

    #[test]
    fn test_sound_toggle() {
        let settings = Settings {
            sound_enabled: false,
            ..Settings::default()
        };
        let mut audio = AudioQueue::new(&settings);
        audio.play(SoundCue::Victory);
        assert_eq!(audio.pending(), 0);
        assert!(audio.music_gain() > 0.0);
    }

    #[test]
    fn test_music_switch() {
        let mut audio = AudioQueue::default();
        audio.play_music(MusicTrack::Gameplay);
        audio.play_music(MusicTrack::Boss);
        assert_eq!(audio.music(), Some(MusicTrack::Boss));
    }
}
