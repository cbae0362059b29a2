//! Sound cues. Playback itself lives outside the simulation; the game only
//! fires cues and never waits on them.

/// Named sound events raised by the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Bite,
    Dash,
    Music,
}

impl Cue {
    pub fn name(self) -> &'static str {
        match self {
            Self::Bite => "BITE",
            Self::Dash => "DASH",
            Self::Music => "MUSIC",
        }
    }
}

/// Fire-and-forget audio trigger.
pub trait AudioSink {
    fn play(&mut self, cue: Cue);
}

/// Sink that only logs cues. Used when no audio device is wired up.
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, cue: Cue) {
        log::debug!("audio cue: {}", cue.name());
    }
}
