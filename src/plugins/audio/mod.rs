//! Audio cues.
//!
//! Gameplay only names the cue; the sink decides what to do with it. The default
//! sink logs and keeps a short history so the last cue can be inspected.

use bevy::prelude::*;

use crate::plugins::storage::Preferences;

#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    MenuMusic,
    GameMusic,
    ButtonClick,
    PlaneSelected,
    AlienDestroyed,
    Shoot,
    Ending,
    GameOver,
    NewHighScore,
}

impl AudioCue {
    pub fn is_music(self) -> bool {
        matches!(self, AudioCue::MenuMusic | AudioCue::GameMusic)
    }
}

#[derive(Resource, Debug, Default)]
pub struct AudioLog {
    pub current_music: Option<AudioCue>,
    pub played: Vec<AudioCue>,
}

impl AudioLog {
    const HISTORY: usize = 64;

    fn record(&mut self, cue: AudioCue) {
        if cue.is_music() {
            self.current_music = Some(cue);
        }
        if self.played.len() == Self::HISTORY {
            self.played.remove(0);
        }
        self.played.push(cue);
    }
}

/// Cues whose channel is muted are dropped.
pub fn play_cues(
    mut reader: MessageReader<AudioCue>,
    prefs: Option<Res<Preferences>>,
    mut log: ResMut<AudioLog>,
) {
    let prefs = prefs.map(|p| *p).unwrap_or_default();
    for cue in reader.read() {
        let volume = if cue.is_music() { prefs.effective_music() } else { prefs.effective_sfx() };
        if volume <= 0.0 {
            trace!("audio cue {cue:?} muted");
            continue;
        }
        debug!("audio cue {cue:?} at {volume:.2}");
        log.record(*cue);
    }
}

pub fn plugin(app: &mut App) {
    app.add_message::<AudioCue>()
        .init_resource::<AudioLog>()
        .add_systems(PostUpdate, play_cues);
}
