// SPDX-FileCopyrightText: 2024  Project Gliese contributors
// SPDX-License-Identifier: GPL-3.0-or-later

pub const CONTRAST: &str = "CONTRAST";
pub const BRIGHTNESS: &str = "BRIGHTNESS";
pub const HUE: &str = "HUE";
pub const SATURATION: &str = "SATURATION";

/// A named video adjustment exposed by the pipeline.
///
/// Values are integers in `min_value..=max_value`; the backend maps them on
/// whatever range the underlying element property uses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorBalanceChannel {
    pub label: String,
    pub min_value: i32,
    pub max_value: i32,
}

impl ColorBalanceChannel {
    pub fn new(label: &str, min_value: i32, max_value: i32) -> Self {
        Self {
            label: label.to_string(),
            min_value,
            max_value,
        }
    }

    // Maps a channel value linearly onto `lower..=upper`
    pub fn to_range(&self, value: i32, lower: f64, upper: f64) -> f64 {
        let span = f64::from(self.max_value - self.min_value);
        if span == 0.0 {
            return lower;
        }

        let value = value.clamp(self.min_value, self.max_value);
        lower + f64::from(value - self.min_value) * (upper - lower) / span
    }

    // Inverse of `to_range()`, rounded to the nearest channel value
    pub fn from_range(&self, value: f64, lower: f64, upper: f64) -> i32 {
        if upper == lower {
            return self.min_value;
        }

        let span = f64::from(self.max_value - self.min_value);
        let v = f64::from(self.min_value) + (value - lower) * span / (upper - lower);
        (v.round() as i32).clamp(self.min_value, self.max_value)
    }
}

/// Finds the channel whose label contains `name`.
///
/// The match is case-sensitive and the first channel in list order wins, so
/// a short name can select a longer label.
pub fn find_channel<'a>(
    channels: &'a [ColorBalanceChannel],
    name: &str,
) -> Option<&'a ColorBalanceChannel> {
    channels.iter().find(|c| c.label.contains(name))
}
