// SPDX-FileCopyrightText: 2024  Project Gliese contributors
// SPDX-License-Identifier: GPL-3.0-or-later

// Playback is split between a command side and a notification side.
//
// Player: owns the playback session and applies the pipeline state
// ├── Backend: the command interface of the media pipeline
// │   ╰── GstBackend: a playbin wrapper rendering into a GdkPaintable
// ╰── controllers: external bits of code that react to state changes
//     ├── InhibitController: blocks idling while playing
//     ╰── the main window
//
// The GstBackend forwards bus messages through an async channel; the Player
// drains that channel on the default main context, so every state change
// and every controller notification happens on the UI thread.

mod backend;
pub use backend::{Backend, BusMessage, PlaybackError, PlayerError};

pub mod color_balance;
pub use color_balance::ColorBalanceChannel;

mod controller;
pub use controller::Controller;

mod gst_backend;
pub use gst_backend::GstBackend;

mod inhibit_controller;
pub use inhibit_controller::InhibitController;

mod player;
pub use player::{Player, Progress};

mod state;
pub use state::{PlaybackState, Session};

mod streams;
pub use streams::{describe_streams, StreamInfo, StreamKind};
