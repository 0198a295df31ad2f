// SPDX-FileCopyrightText: 2024  Project Gliese contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::playback::{PlaybackError, PlaybackState};

// Observers of the playback session; all methods are called on the main
// context, after the session has been updated
pub trait Controller {
    fn set_playback_state(&self, state: PlaybackState);
    fn set_uri(&self, uri: &str);

    // The pipeline went from ready to paused: duration and stream tags
    // can now be queried
    fn metadata_available(&self);

    fn playback_error(&self, error: &PlaybackError);
    fn end_of_stream(&self);
}
