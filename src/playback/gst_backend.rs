// SPDX-FileCopyrightText: 2024  Project Gliese contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use std::cell::RefCell;

use async_channel::Sender;
use gst::prelude::*;
use gtk::{gdk, glib};
use log::{debug, error, warn};

use crate::playback::{
    color_balance::{BRIGHTNESS, CONTRAST, HUE, SATURATION},
    Backend, BusMessage, ColorBalanceChannel, PlaybackError, PlaybackState, PlayerError,
    StreamInfo, StreamKind,
};

// Route audio, video, subtitles and visualizations through the default
// renderers; volume is handled in software
const PLAYBIN_FLAGS: &str = "soft-volume+vis+text+audio+video";

const CHANNEL_MIN: i32 = -1000;
const CHANNEL_MAX: i32 = 1000;

// Channel label, videobalance property, property range
const BALANCE_PROPERTIES: [(&str, &str, f64, f64); 4] = [
    (HUE, "hue", -1.0, 1.0),
    (SATURATION, "saturation", 0.0, 2.0),
    (BRIGHTNESS, "brightness", -1.0, 1.0),
    (CONTRAST, "contrast", 0.0, 2.0),
];

#[derive(Debug)]
struct GstPipeline {
    playbin: gst::Element,
    balance: Option<gst::Element>,
    paintable: Option<gdk::Paintable>,
    _bus_watch: gst::bus::BusWatchGuard,
}

#[derive(Debug)]
pub struct GstBackend {
    sender: Sender<BusMessage>,
    pipeline: RefCell<Option<GstPipeline>>,
}

impl GstBackend {
    pub fn new(sender: Sender<BusMessage>) -> Self {
        Self {
            sender,
            pipeline: RefCell::new(None),
        }
    }

    fn playbin(&self) -> Option<gst::Element> {
        self.pipeline.borrow().as_ref().map(|p| p.playbin.clone())
    }

    fn balance(&self) -> Option<gst::Element> {
        self.pipeline.borrow().as_ref().and_then(|p| p.balance.clone())
    }

    fn setup_bus_watch(&self, playbin: &gst::Element) -> Result<gst::bus::BusWatchGuard, PlayerError> {
        let bus = playbin.bus().ok_or(PlayerError::Bus)?;

        let sender = self.sender.clone();
        let weak_playbin = playbin.downgrade();
        let guard = bus.add_watch_local(move |_, msg| {
            let Some(playbin) = weak_playbin.upgrade() else {
                return glib::ControlFlow::Break;
            };

            if let Some(message) = bus_message(&playbin, msg) {
                if let Err(e) = sender.send_blocking(message) {
                    error!("Unable to forward bus message: {e}");
                    return glib::ControlFlow::Break;
                }
            }

            glib::ControlFlow::Continue
        })?;

        Ok(guard)
    }
}

fn make_element(factory: &str) -> Result<gst::Element, PlayerError> {
    gst::ElementFactory::make(factory)
        .build()
        .map_err(|_| PlayerError::ElementCreation(factory.to_string()))
}

fn make_video_sink() -> Result<(gst::Element, gdk::Paintable), PlayerError> {
    let sink = make_element("gtk4paintablesink")?;
    let paintable = sink.property::<gdk::Paintable>("paintable");
    Ok((sink, paintable))
}

fn state_from_gst(state: gst::State) -> PlaybackState {
    match state {
        gst::State::Ready => PlaybackState::Ready,
        gst::State::Paused => PlaybackState::Paused,
        gst::State::Playing => PlaybackState::Playing,
        _ => PlaybackState::Idle,
    }
}

fn bus_message(playbin: &gst::Element, msg: &gst::Message) -> Option<BusMessage> {
    use gst::MessageView;

    match msg.view() {
        MessageView::Error(err) => Some(BusMessage::Error(PlaybackError {
            source: msg
                .src()
                .map(|s| s.name().to_string())
                .unwrap_or_else(|| "unknown".to_string()),
            message: err.error().to_string(),
            debug: err.debug().map(|d| d.to_string()),
        })),
        MessageView::Eos(..) => Some(BusMessage::EndOfStream),
        MessageView::StateChanged(state_changed)
            if msg.src() == Some(playbin.upcast_ref::<gst::Object>()) =>
        {
            Some(BusMessage::StateChanged {
                old: state_from_gst(state_changed.old()),
                current: state_from_gst(state_changed.current()),
            })
        }
        MessageView::Warning(warning) => {
            warn!("GStreamer warning: {}", warning.error());
            None
        }
        _ => None,
    }
}

fn balance_property(label: &str) -> Option<(&'static str, f64, f64)> {
    BALANCE_PROPERTIES
        .iter()
        .find(|(l, ..)| *l == label)
        .map(|(_, property, lower, upper)| (*property, *lower, *upper))
}

fn stream_signal(kind: StreamKind) -> &'static str {
    match kind {
        StreamKind::Video => "get-video-tags",
        StreamKind::Audio => "get-audio-tags",
        StreamKind::Text => "get-text-tags",
    }
}

fn stream_property(kind: StreamKind, prefix: &str) -> String {
    match kind {
        StreamKind::Video => format!("{prefix}-video"),
        StreamKind::Audio => format!("{prefix}-audio"),
        StreamKind::Text => format!("{prefix}-text"),
    }
}

fn nseconds_to_seconds(t: gst::ClockTime) -> f64 {
    t.nseconds() as f64 / gst::ClockTime::SECOND.nseconds() as f64
}

impl Backend for GstBackend {
    fn open(&self, uri: &str) -> Result<(), PlayerError> {
        self.teardown();

        let playbin = gst::ElementFactory::make("playbin")
            .name("playbin")
            .build()
            .map_err(|_| PlayerError::ElementCreation("playbin".to_string()))?;

        playbin.set_property("uri", uri);
        playbin.set_property_from_str("flags", PLAYBIN_FLAGS);

        let paintable = match make_video_sink() {
            Ok((sink, paintable)) => {
                playbin.set_property("video-sink", &sink);
                Some(paintable)
            }
            Err(e) => {
                warn!("Using the default video sink: {e}");
                None
            }
        };

        let balance = match make_element("videobalance") {
            Ok(balance) => {
                playbin.set_property("video-filter", &balance);
                Some(balance)
            }
            Err(e) => {
                warn!("Color balance is not available: {e}");
                None
            }
        };

        let bus_watch = self.setup_bus_watch(&playbin)?;

        if playbin.set_state(gst::State::Playing).is_err() {
            error!("Unable to set the pipeline to the playing state");
            let _ = playbin.set_state(gst::State::Null);
            return Err(PlayerError::StateChange(PlaybackState::Playing));
        }

        debug!("Pipeline created for {uri}");
        self.pipeline.replace(Some(GstPipeline {
            playbin,
            balance,
            paintable,
            _bus_watch: bus_watch,
        }));

        Ok(())
    }

    fn set_uri(&self, uri: &str) {
        if let Some(playbin) = self.playbin() {
            playbin.set_property("uri", uri);
        }
    }

    fn request_state(&self, state: PlaybackState) -> Result<(), PlayerError> {
        let playbin = self.playbin().ok_or(PlayerError::NoSession)?;
        let target = match state {
            PlaybackState::Idle => gst::State::Null,
            PlaybackState::Ready => gst::State::Ready,
            PlaybackState::Paused => gst::State::Paused,
            PlaybackState::Playing => gst::State::Playing,
            PlaybackState::Error => return Err(PlayerError::StateChange(state)),
        };

        playbin
            .set_state(target)
            .map(|_| ())
            .map_err(|_| PlayerError::StateChange(state))
    }

    fn seek(&self, position: f64) {
        if let Some(playbin) = self.playbin() {
            let nseconds = (position.max(0.0) * gst::ClockTime::SECOND.nseconds() as f64) as u64;
            if let Err(e) =
                playbin.seek_simple(gst::SeekFlags::FLUSH, gst::ClockTime::from_nseconds(nseconds))
            {
                warn!("Seek to {position}s failed: {e}");
            }
        }
    }

    fn position(&self) -> Option<f64> {
        self.playbin()?
            .query_position::<gst::ClockTime>()
            .map(nseconds_to_seconds)
    }

    fn duration(&self) -> Option<f64> {
        self.playbin()?
            .query_duration::<gst::ClockTime>()
            .map(nseconds_to_seconds)
    }

    fn volume(&self) -> f64 {
        self.playbin()
            .map(|p| p.property::<f64>("volume"))
            .unwrap_or(1.0)
    }

    fn set_volume(&self, volume: f64) {
        if let Some(playbin) = self.playbin() {
            debug!("Setting volume to: {volume}");
            playbin.set_property("volume", volume);
        }
    }

    fn color_balance_channels(&self) -> Vec<ColorBalanceChannel> {
        if self.balance().is_none() {
            return Vec::new();
        }

        BALANCE_PROPERTIES
            .iter()
            .map(|(label, ..)| ColorBalanceChannel::new(label, CHANNEL_MIN, CHANNEL_MAX))
            .collect()
    }

    fn color_balance_value(&self, channel: &ColorBalanceChannel) -> Option<i32> {
        let balance = self.balance()?;
        let (property, lower, upper) = balance_property(&channel.label)?;
        let value = balance.property::<f64>(property);
        Some(channel.from_range(value, lower, upper))
    }

    fn set_color_balance_value(&self, channel: &ColorBalanceChannel, value: i32) {
        let Some(balance) = self.balance() else {
            return;
        };

        if let Some((property, lower, upper)) = balance_property(&channel.label) {
            balance.set_property(property, channel.to_range(value, lower, upper));
        }
    }

    fn n_streams(&self, kind: StreamKind) -> i32 {
        self.playbin()
            .map(|p| p.property::<i32>(&stream_property(kind, "n")))
            .unwrap_or(0)
    }

    fn stream_tags(&self, kind: StreamKind, index: i32) -> Option<StreamInfo> {
        let playbin = self.playbin()?;
        let tags = playbin.emit_by_name::<Option<gst::TagList>>(stream_signal(kind), &[&index])?;

        let mut info = StreamInfo::new(kind, index);
        info.codec = match kind {
            StreamKind::Video => tags.get::<gst::tags::VideoCodec>().map(|t| t.get().to_string()),
            StreamKind::Audio => tags.get::<gst::tags::AudioCodec>().map(|t| t.get().to_string()),
            StreamKind::Text => tags
                .get::<gst::tags::SubtitleCodec>()
                .map(|t| t.get().to_string()),
        };
        info.language = tags
            .get::<gst::tags::LanguageCode>()
            .map(|t| t.get().to_string());
        info.bitrate = tags.get::<gst::tags::Bitrate>().map(|t| t.get());
        info.title = tags.get::<gst::tags::Title>().map(|t| t.get().to_string());

        Some(info)
    }

    fn current_stream(&self, kind: StreamKind) -> Option<i32> {
        let current = self
            .playbin()?
            .property::<i32>(&stream_property(kind, "current"));
        (current >= 0).then_some(current)
    }

    fn set_current_stream(&self, kind: StreamKind, index: i32) {
        if let Some(playbin) = self.playbin() {
            playbin.set_property(&stream_property(kind, "current"), index);
        }
    }

    fn paintable(&self) -> Option<gdk::Paintable> {
        self.pipeline
            .borrow()
            .as_ref()
            .and_then(|p| p.paintable.clone())
    }

    fn teardown(&self) {
        if let Some(pipeline) = self.pipeline.take() {
            debug!("Releasing pipeline");
            if pipeline.playbin.set_state(gst::State::Null).is_err() {
                warn!("Unable to set the pipeline to the null state");
            }
        }
    }
}
