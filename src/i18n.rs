// SPDX-FileCopyrightText: 2024  Project Gliese contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use gettextrs::gettext;

// Replaces each `{}` in `input` with the next argument
fn freplace(input: String, args: &[&str]) -> String {
    let mut parts = input.split("{}");
    let mut output = parts.next().unwrap_or_default().to_string();
    for (part, arg) in parts.zip(args.iter()) {
        output.push_str(arg);
        output.push_str(part);
    }

    output
}

pub fn i18n(format: &str) -> String {
    gettext(format)
}

pub fn i18n_f(format: &str, args: &[&str]) -> String {
    freplace(gettext(format), args)
}
