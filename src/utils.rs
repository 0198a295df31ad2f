// SPDX-FileCopyrightText: 2024  Project Gliese contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use gtk::{gio, glib};
use log::warn;

use crate::config::APPLICATION_ID;

/// Shown instead of a time while the pipeline cannot tell us one.
pub const TIME_PLACEHOLDER: &str = "-:--:--";

pub fn settings_manager() -> Option<gio::Settings> {
    // We ship a single schema for both default and development profiles
    let app_id = APPLICATION_ID.trim_end_matches(".Devel");

    let Some(source) = gio::SettingsSchemaSource::default() else {
        warn!("No settings schemas installed");
        return None;
    };

    if source.lookup(app_id, true).is_none() {
        warn!("Settings schema {app_id} not found, settings will not be saved");
        return None;
    }

    Some(gio::Settings::new(app_id))
}

pub fn format_time(t: f64) -> String {
    let t = if t.is_finite() { t.max(0.0) as u64 } else { 0 };
    format!("{}:{:02}:{:02}", t / 3600, (t / 60) % 60, t % 60)
}

// The name of the media at `uri`, used as window title
pub fn display_name(uri: &str) -> String {
    match glib::filename_from_uri(uri) {
        Ok((path, _)) => glib::filename_display_basename(path).to_string(),
        Err(_) => uri
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(uri)
            .to_string(),
    }
}
