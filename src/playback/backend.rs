// SPDX-FileCopyrightText: 2024  Project Gliese contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use std::fmt::{self, Display, Formatter};

use gtk::{gdk, glib};
use thiserror::Error;

use crate::playback::{ColorBalanceChannel, PlaybackState, StreamInfo, StreamKind};

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("unable to create the '{0}' element")]
    ElementCreation(String),
    #[error("unable to get the pipeline bus")]
    Bus,
    #[error("unable to set the pipeline to the {0} state")]
    StateChange(PlaybackState),
    #[error("{0}")]
    Glib(#[from] glib::BoolError),
    #[error("no media source is loaded")]
    NoSession,
}

/// A runtime error posted by the pipeline, e.g. a decoder failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaybackError {
    pub source: String,
    pub message: String,
    pub debug: Option<String>,
}

impl Display for PlaybackError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "Error received from element {}: {}", self.source, self.message)
    }
}

/// Notifications coming from the pipeline bus.
#[derive(Clone, Debug, PartialEq)]
pub enum BusMessage {
    Error(PlaybackError),
    EndOfStream,
    StateChanged {
        old: PlaybackState,
        current: PlaybackState,
    },
}

/// The command side of the media pipeline.
///
/// Replies come back asynchronously as [`BusMessage`]s through the sender
/// the backend was created with.
pub trait Backend {
    /// Builds the pipeline for `uri` and requests the playing state.
    ///
    /// On failure the backend releases whatever it created.
    fn open(&self, uri: &str) -> Result<(), PlayerError>;
    fn set_uri(&self, uri: &str);
    fn request_state(&self, state: PlaybackState) -> Result<(), PlayerError>;
    fn seek(&self, position: f64);
    fn position(&self) -> Option<f64>;
    fn duration(&self) -> Option<f64>;

    fn volume(&self) -> f64;
    fn set_volume(&self, volume: f64);

    fn color_balance_channels(&self) -> Vec<ColorBalanceChannel>;
    fn color_balance_value(&self, channel: &ColorBalanceChannel) -> Option<i32>;
    fn set_color_balance_value(&self, channel: &ColorBalanceChannel, value: i32);

    fn n_streams(&self, kind: StreamKind) -> i32;
    fn stream_tags(&self, kind: StreamKind, index: i32) -> Option<StreamInfo>;
    fn current_stream(&self, kind: StreamKind) -> Option<i32>;
    fn set_current_stream(&self, kind: StreamKind, index: i32);

    fn paintable(&self) -> Option<gdk::Paintable>;

    /// Forces the pipeline to the null state and releases it.
    fn teardown(&self);
}
