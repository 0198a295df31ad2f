// SPDX-FileCopyrightText: 2024  Project Gliese contributors
// SPDX-License-Identifier: GPL-3.0-or-later

fn main() {
    glib_build_tools::compile_resources(
        &["data/resources"],
        "data/resources/resources.gresource.xml",
        "gliese.gresource",
    );
}
