// SPDX-FileCopyrightText: 2024  Project Gliese contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use std::cell::Cell;

use gtk::{gio, prelude::*};
use log::debug;

use crate::{
    i18n::i18n,
    playback::{Controller, PlaybackError, PlaybackState},
};

// Keeps the screen from blanking while a video is playing
#[derive(Debug, Default)]
pub struct InhibitController {
    cookie: Cell<u32>,
}

impl InhibitController {
    pub fn new() -> Self {
        Self::default()
    }

    fn uninhibit(&self, app: &gtk::Application) {
        let cookie = self.cookie.take();
        if cookie != 0 {
            app.uninhibit(cookie);

            debug!("Idle uninhibited");
        }
    }
}

impl Controller for InhibitController {
    fn set_playback_state(&self, playback_state: PlaybackState) {
        let Some(app) = gio::Application::default()
            .and_then(|app| app.downcast::<gtk::Application>().ok())
        else {
            return;
        };

        if playback_state.is_playing() {
            if self.cookie.get() == 0 {
                let win = app.active_window();
                let cookie = app.inhibit(
                    win.as_ref(),
                    gtk::ApplicationInhibitFlags::IDLE | gtk::ApplicationInhibitFlags::SUSPEND,
                    Some(&i18n("Playback in progress")),
                );
                self.cookie.set(cookie);

                debug!("Idle inhibited");
            }
        } else {
            self.uninhibit(&app);
        }
    }

    fn set_uri(&self, _uri: &str) {}
    fn metadata_available(&self) {}
    fn playback_error(&self, _error: &PlaybackError) {}
    fn end_of_stream(&self) {}
}
