use raylib::prelude::*;
use tracing::warn;

use crate::constants::HINT_REVERT_DELAY;

#[derive(thiserror::Error, Debug)]
#[error("playback denied: {0}")]
pub struct PlaybackError(pub String);

/// Seam between the control logic and the actual audio backend. The raylib
/// music stream implements it for the app; tests drive a scripted double.
pub trait Playback {
    fn is_playing(&self) -> bool;
    fn play(&mut self) -> Result<(), PlaybackError>;
    fn pause(&mut self);
    /// Stop and rewind to the start of the track.
    fn rewind(&mut self);
}

/// Raylib music stream behind the [`Playback`] seam. `poll` must be called
/// every frame to keep the stream buffer fed.
pub struct StreamPlayback<'a> {
    music: Music<'a>,
    started: bool,
}

impl<'a> StreamPlayback<'a> {
    pub fn new(music: Music<'a>) -> Self {
        Self {
            music,
            started: false,
        }
    }

    pub fn poll(&mut self) {
        if self.started {
            self.music.update_stream();
        }
    }
}

impl Playback for StreamPlayback<'_> {
    fn is_playing(&self) -> bool {
        self.music.is_stream_playing()
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        if self.started {
            self.music.resume_stream();
        } else {
            self.music.play_stream();
            self.started = true;
        }
        Ok(())
    }

    fn pause(&mut self) {
        self.music.pause_stream();
    }

    fn rewind(&mut self) {
        self.music.stop_stream();
        self.started = false;
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Glyph {
    /// Idle, inviting a click.
    Note,
    /// Currently playing, click pauses.
    Pause,
    /// Playback was denied; transient.
    Muted,
}

impl Glyph {
    pub fn label(self) -> &'static str {
        match self {
            Self::Note => ">",
            Self::Pause => "||",
            Self::Muted => "x",
        }
    }
}

/// Outcome of a toggle, for the caller to mirror into the hint line and the
/// sliding wall's nudge feedback.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ToggleOutcome {
    /// Click suppressed: the wall had not been slid open.
    Locked,
    Started,
    Paused,
    Denied,
}

/// The music button. Every toggle reads the reveal latch passed in at click
/// time; the control never caches or mutates it.
pub struct MusicControl {
    glyph: Glyph,
    revert_left: Option<f32>,
}

impl MusicControl {
    pub fn new() -> Self {
        Self {
            glyph: Glyph::Note,
            revert_left: None,
        }
    }

    pub fn glyph(&self) -> Glyph {
        self.glyph
    }

    pub fn toggle(&mut self, playback: &mut dyn Playback, revealed: bool) -> ToggleOutcome {
        if !revealed {
            // Guarded action while locked: suppressed, not an error
            return ToggleOutcome::Locked;
        }
        if playback.is_playing() {
            playback.pause();
            self.glyph = Glyph::Note;
            self.revert_left = None;
            return ToggleOutcome::Paused;
        }
        match playback.play() {
            Ok(()) => {
                self.glyph = Glyph::Pause;
                self.revert_left = None;
                ToggleOutcome::Started
            }
            Err(err) => {
                // No retry loop; the user clicks again
                warn!(%err, "music playback denied");
                self.glyph = Glyph::Muted;
                self.revert_left = Some(HINT_REVERT_DELAY);
                ToggleOutcome::Denied
            }
        }
    }

    /// Reverts the transient denied glyph after its fixed delay.
    pub fn update(&mut self, dt: f32) {
        if let Some(left) = self.revert_left {
            let left = left - dt;
            if left <= 0.0 {
                self.revert_left = None;
                self.glyph = Glyph::Note;
            } else {
                self.revert_left = Some(left);
            }
        }
    }

    /// Replay path: stop and rewind if playing, back to the idle glyph.
    pub fn reset(&mut self, playback: &mut dyn Playback) {
        if playback.is_playing() {
            playback.pause();
            playback.rewind();
        }
        self.glyph = Glyph::Note;
        self.revert_left = None;
    }
}
