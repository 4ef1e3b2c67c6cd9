//! Audio and haptic cues for game events
//!
//! Cues are fire-and-forget: the game never waits for a sound to finish or
//! checks whether a vibration happened.

use std::io::Write;
use std::time::Duration;
use tracing::{debug, warn};

use crate::game::GameEvent;
use crate::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Eat,
    PowerUp,
    Death,
}

impl SoundCue {
    /// Length of the matching vibration pulse
    pub fn vibration(&self) -> Duration {
        match self {
            SoundCue::Eat => Duration::from_millis(50),
            SoundCue::PowerUp => Duration::from_millis(100),
            SoundCue::Death => Duration::from_millis(300),
        }
    }

    /// Cue for an event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<SoundCue> {
        match event {
            GameEvent::AteFood { .. } => Some(SoundCue::Eat),
            GameEvent::PowerUp { .. } => Some(SoundCue::PowerUp),
            GameEvent::GameOver { .. } => Some(SoundCue::Death),
            GameEvent::LevelUp { .. } => None,
        }
    }
}

/// Audio/haptics collaborator
pub trait Feedback {
    fn play(&mut self, cue: SoundCue);
    fn vibrate(&mut self, duration: Duration);
}

/// Play the cue for an event, honouring the sound and vibration toggles
pub fn notify(feedback: &mut dyn Feedback, settings: &Settings, event: &GameEvent) {
    let Some(cue) = SoundCue::for_event(event) else {
        return;
    };

    if settings.sound_enabled {
        feedback.play(cue);
    }
    if settings.vibration_enabled {
        feedback.vibrate(cue.vibration());
    }
}

/// Rings the terminal bell; terminals cannot vibrate, so pulses are only logged
pub struct TerminalFeedback<W: Write> {
    out: W,
}

impl<W: Write> TerminalFeedback<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Feedback for TerminalFeedback<W> {
    fn play(&mut self, cue: SoundCue) {
        debug!(?cue, "sound");
        // Logged, never propagated
        if let Err(error) = self.out.write_all(b"\x07").and_then(|_| self.out.flush()) {
            warn!(%error, "failed to ring terminal bell");
        }
    }

    fn vibrate(&mut self, duration: Duration) {
        debug!(millis = duration.as_millis() as u64, "vibration pulse");
    }
}
