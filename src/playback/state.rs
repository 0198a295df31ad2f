// SPDX-FileCopyrightText: 2024  Project Gliese contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use std::fmt::{self, Display, Formatter};

/// The state of the playback session, as observed from the pipeline.
///
/// The pipeline owns the real state machine; we only record what it tells
/// us through state-changed notifications. `Error` is transient: it is set
/// when the pipeline reports a runtime error, and replaced as soon as the
/// forced transition to `Ready` is reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Ready,
    Paused,
    Playing,
    Error,
}

impl PlaybackState {
    pub fn can_transition_to(self, next: PlaybackState) -> bool {
        use PlaybackState::*;

        // Pipelines re-post the current state after a seek or flush
        self == next
            || matches!(
                (self, next),
                (Idle, Ready)
                    | (Ready, Idle)
                    | (Ready, Paused)
                    | (Paused, Ready)
                    | (Paused, Playing)
                    | (Playing, Paused)
                    | (_, Error)
                    | (Error, Ready)
                    | (Error, Idle)
            )
    }

    pub fn is_paused_or_playing(self) -> bool {
        matches!(self, PlaybackState::Paused | PlaybackState::Playing)
    }

    pub fn is_playing(self) -> bool {
        self == PlaybackState::Playing
    }
}

impl Display for PlaybackState {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            PlaybackState::Idle => write!(f, "idle"),
            PlaybackState::Ready => write!(f, "ready"),
            PlaybackState::Paused => write!(f, "paused"),
            PlaybackState::Playing => write!(f, "playing"),
            PlaybackState::Error => write!(f, "error"),
        }
    }
}

// The one playback session the player holds while a media source is loaded.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub state: PlaybackState,
    pub uri: String,
    pub duration: Option<f64>,
}

impl Session {
    pub fn new(uri: &str) -> Self {
        Self {
            state: PlaybackState::Idle,
            uri: uri.to_string(),
            duration: None,
        }
    }

    pub fn duration_is_valid(&self) -> bool {
        self.duration.is_some()
    }
}
