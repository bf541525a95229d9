// Audio playback boundary
//
// Mixing and decoding belong to the audio engine. Combat only fires cues.

use super::assets::SoundHandle;

/// Fire-and-forget audio playback
pub trait AudioSink {
    fn play(&mut self, sound: SoundHandle);
}

/// Audio sink that records every cue it is asked to play.
///
/// Used by the headless arena, where there is no mixer to hand cues to.
#[derive(Debug, Default)]
pub struct CueRecorder {
    played: Vec<SoundHandle>,
}

impl CueRecorder {
    pub fn new() -> Self {
        Self { played: Vec::new() }
    }

    /// All cues played so far, in order
    pub fn played(&self) -> &[SoundHandle] {
        &self.played
    }

    /// How many times `sound` was played
    pub fn count(&self, sound: SoundHandle) -> usize {
        self.played.iter().filter(|s| **s == sound).count()
    }

    pub fn clear(&mut self) {
        self.played.clear();
    }
}

impl AudioSink for CueRecorder {
    fn play(&mut self, sound: SoundHandle) {
        log::trace!("Audio cue {:?}", sound);
        self.played.push(sound);
    }
}
