// SPDX-FileCopyrightText: 2024  Project Gliese contributors
// SPDX-License-Identifier: GPL-3.0-or-later

pub const APPLICATION_ID: &str = match option_env!("GLIESE_APPLICATION_ID") {
    Some(id) => id,
    None => "io.github.ProjectGliese",
};

pub const PROFILE: &str = match option_env!("GLIESE_PROFILE") {
    Some(profile) => profile,
    None => "default",
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const GETTEXT_PACKAGE: &str = "gliese";

pub const LOCALEDIR: &str = match option_env!("GLIESE_LOCALEDIR") {
    Some(dir) => dir,
    None => "/usr/share/locale",
};
