// SPDX-FileCopyrightText: 2024  Project Gliese contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use std::fmt::{self, Display, Formatter, Write};

use crate::i18n::i18n_f;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Video,
    Audio,
    Text,
}

impl StreamKind {
    pub const ALL: [StreamKind; 3] = [StreamKind::Video, StreamKind::Audio, StreamKind::Text];
}

impl Display for StreamKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            StreamKind::Video => write!(f, "video"),
            StreamKind::Audio => write!(f, "audio"),
            StreamKind::Text => write!(f, "subtitle"),
        }
    }
}

/// The tags we know how to display for a single stream.
///
/// Fields the pipeline did not report are left as `None`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StreamInfo {
    pub kind: StreamKind,
    pub index: i32,
    pub codec: Option<String>,
    pub language: Option<String>,
    pub bitrate: Option<u32>,
    pub title: Option<String>,
}

impl StreamInfo {
    pub fn new(kind: StreamKind, index: i32) -> Self {
        Self {
            kind,
            index,
            codec: None,
            language: None,
            bitrate: None,
            title: None,
        }
    }

    // Label used for the track selection menus
    pub fn track_label(&self) -> String {
        let number = (self.index + 1).to_string();
        match (&self.title, &self.language) {
            (Some(title), _) => i18n_f("Track {} ({})", &[number.as_str(), title.as_str()]),
            (None, Some(language)) => {
                i18n_f("Track {} ({})", &[number.as_str(), language.as_str()])
            }
            (None, None) => i18n_f("Track {}", &[number.as_str()]),
        }
    }
}

/// Renders the stream list as shown in the properties window.
pub fn describe_streams(streams: &[StreamInfo]) -> String {
    let mut text = String::new();

    for (i, stream) in streams.iter().enumerate() {
        if i > 0 {
            text.push('\n');
        }

        let _ = writeln!(text, "{} stream {}:", stream.kind, stream.index);
        if let Some(title) = &stream.title {
            let _ = writeln!(text, "  title: {title}");
        }
        if let Some(codec) = &stream.codec {
            let _ = writeln!(text, "  codec: {codec}");
        }
        if let Some(language) = &stream.language {
            let _ = writeln!(text, "  language: {language}");
        }
        if let Some(bitrate) = stream.bitrate {
            let _ = writeln!(text, "  bitrate: {bitrate}");
        }
    }

    text
}
