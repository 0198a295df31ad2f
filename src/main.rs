// SPDX-FileCopyrightText: 2024  Project Gliese contributors
// SPDX-License-Identifier: GPL-3.0-or-later

mod application;
mod color_balance_window;
mod config;
mod fullscreen_window;
mod i18n;
mod playback;
mod properties_window;
mod transport_controls;
mod utils;
mod volume_control;
mod window;

use config::{APPLICATION_ID, GETTEXT_PACKAGE, LOCALEDIR, PROFILE};
use gettextrs::{bind_textdomain_codeset, bindtextdomain, setlocale, textdomain, LocaleCategory};
use gtk::{gio, glib, prelude::*};
use log::{debug, error, warn, LevelFilter};

use self::application::Application;

fn setup_gettext() {
    debug!("Setting up locale data");
    setlocale(LocaleCategory::LcAll, "");

    let res = bindtextdomain(GETTEXT_PACKAGE, LOCALEDIR)
        .and_then(|_| bind_textdomain_codeset(GETTEXT_PACKAGE, "UTF-8"))
        .and_then(|_| textdomain(GETTEXT_PACKAGE));
    if let Err(e) = res {
        warn!("Unable to set up translations: {e}");
    }
}

fn main() -> glib::ExitCode {
    let mut builder = pretty_env_logger::formatted_builder();
    if APPLICATION_ID.ends_with("Devel") {
        builder.filter(Some("gliese"), LevelFilter::Debug);
    } else {
        builder.filter(Some("gliese"), LevelFilter::Info);
    }
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();

    setup_gettext();

    debug!("Loading resources");
    if let Err(e) = gio::resources_register_include!("gliese.gresource") {
        error!("Unable to register the bundled resources: {e}");
        return glib::ExitCode::FAILURE;
    }

    debug!("Setting up application (profile: {})", &PROFILE);
    glib::set_application_name("Project Gliese");
    glib::set_program_name(Some("gliese"));

    if let Err(e) = gst::init() {
        error!("Unable to initialize GStreamer: {e}");
        return glib::ExitCode::FAILURE;
    }
    if let Err(e) = gstgtk4::plugin_register_static() {
        warn!("Unable to register the GTK video sink: {e}");
    }

    Application::new().run()
}
