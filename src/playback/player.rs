// SPDX-FileCopyrightText: 2024  Project Gliese contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use std::{
    cell::RefCell,
    fmt,
    rc::{Rc, Weak},
};

use async_channel::Receiver;
use gtk::{gdk, glib};
use log::{debug, error, info, warn};

use crate::playback::{
    color_balance::find_channel, Backend, BusMessage, Controller, GstBackend, InhibitController,
    PlaybackError, PlaybackState, PlayerError, Session, StreamInfo, StreamKind,
};

/// What the periodic UI refresh has to show.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Progress {
    /// `None` once the duration is cached and the labels are already set;
    /// `Some(None)` while the pipeline still cannot tell it.
    pub duration: Option<Option<f64>>,
    pub position: Option<f64>,
}

pub struct Player {
    backend: Box<dyn Backend>,
    controllers: RefCell<Vec<Box<dyn Controller>>>,
    session: RefCell<Option<Session>>,
}

impl fmt::Debug for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Player")
            .field("session", &self.session.borrow())
            .finish()
    }
}

impl Player {
    pub fn new() -> Rc<Self> {
        let (sender, receiver) = async_channel::unbounded();

        let backend = GstBackend::new(sender);
        let res = Self::with_backend(Box::new(backend));
        res.add_controller(Box::new(InhibitController::new()));

        process_messages(Rc::downgrade(&res), receiver);

        res
    }

    pub fn with_backend(backend: Box<dyn Backend>) -> Rc<Self> {
        Rc::new(Self {
            backend,
            controllers: RefCell::new(Vec::new()),
            session: RefCell::new(None),
        })
    }

    pub fn add_controller(&self, controller: Box<dyn Controller>) {
        self.controllers.borrow_mut().push(controller);
    }

    fn notify(&self, f: impl Fn(&dyn Controller)) {
        for c in self.controllers.borrow().iter() {
            f(c.as_ref());
        }
    }

    pub fn process_message(&self, message: BusMessage) {
        match message {
            BusMessage::StateChanged { old, current } => self.update_state(old, current),
            BusMessage::Error(error) => self.handle_error(error),
            BusMessage::EndOfStream => self.handle_end_of_stream(),
        }
    }

    fn update_state(&self, old: PlaybackState, current: PlaybackState) {
        if !old.can_transition_to(current) {
            warn!("Unexpected state change: {old} -> {current}");
        }

        match self.session.borrow_mut().as_mut() {
            Some(session) => session.state = current,
            None => return,
        }

        debug!("State set to {current}");
        self.notify(|c| c.set_playback_state(current));

        if old == PlaybackState::Ready && current == PlaybackState::Paused {
            self.notify(|c| c.metadata_available());
        }
    }

    fn handle_error(&self, error: PlaybackError) {
        error!("{error}");
        error!(
            "Debugging information: {}",
            error.debug.as_deref().unwrap_or("none")
        );

        let previous = match self.session.borrow_mut().as_mut() {
            Some(session) => std::mem::replace(&mut session.state, PlaybackState::Error),
            None => return,
        };

        self.notify(|c| c.set_playback_state(PlaybackState::Error));
        self.notify(|c| c.playback_error(&error));

        self.stop();

        // The pipeline does not report a change when it already is in the
        // ready state, so the error state has to be cleared here
        if previous == PlaybackState::Ready {
            self.update_state(PlaybackState::Error, PlaybackState::Ready);
        }
    }

    fn handle_end_of_stream(&self) {
        if !self.has_session() {
            return;
        }

        info!("End-Of-Stream reached");
        self.stop();
        self.notify(|c| c.end_of_stream());
    }

    fn request_state(&self, state: PlaybackState) {
        if !self.has_session() {
            debug!("No media loaded, ignoring request for the {state} state");
            return;
        }

        if let Err(e) = self.backend.request_state(state) {
            error!("{e}");
        }
    }

    /// Loads `uri` and starts playing it.
    ///
    /// If a media source is already loaded, this is the same as calling
    /// [`Player::change_source`].
    pub fn open(&self, uri: &str) -> Result<(), PlayerError> {
        if self.has_session() {
            return self.change_source(uri);
        }

        debug!("Opening {uri}");
        if let Err(e) = self.backend.open(uri) {
            error!("Unable to open {uri}: {e}");
            return Err(e);
        }

        self.session.replace(Some(Session::new(uri)));
        self.notify(|c| c.set_uri(uri));

        Ok(())
    }

    pub fn change_source(&self, uri: &str) -> Result<(), PlayerError> {
        if !self.has_session() {
            return Err(PlayerError::NoSession);
        }

        debug!("Changing source to {uri}");
        self.stop();
        self.backend.set_uri(uri);

        if let Some(session) = self.session.borrow_mut().as_mut() {
            session.uri = uri.to_string();
            session.duration = None;
        }
        self.notify(|c| c.set_uri(uri));

        self.play();

        Ok(())
    }

    pub fn play(&self) {
        self.request_state(PlaybackState::Playing);
    }

    pub fn pause(&self) {
        self.request_state(PlaybackState::Paused);
    }

    pub fn stop(&self) {
        self.request_state(PlaybackState::Ready);
    }

    pub fn toggle_play(&self) {
        if self.state().is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    pub fn seek(&self, position: f64) {
        if self.has_session() {
            debug!("Seeking to {position}s");
            self.backend.seek(position);
        }
    }

    pub fn query_position(&self) -> Option<f64> {
        if !self.has_session() {
            return None;
        }

        self.backend.position()
    }

    /// Queries the duration of the current media.
    ///
    /// Returns `None` until the pipeline knows it; the first definite value
    /// is cached in the session.
    pub fn query_duration(&self) -> Option<f64> {
        if !self.has_session() {
            return None;
        }

        let duration = self.backend.duration();
        if duration.is_some() {
            if let Some(session) = self.session.borrow_mut().as_mut() {
                session.duration = duration;
            }
        }

        duration
    }

    pub fn duration_is_valid(&self) -> bool {
        self.session
            .borrow()
            .as_ref()
            .map(Session::duration_is_valid)
            .unwrap_or(false)
    }

    /// Polls the pipeline for the refresh tick.
    ///
    /// Returns `None` unless the media is paused or playing. The duration is
    /// only queried until it is known.
    pub fn progress(&self) -> Option<Progress> {
        if !self.state().is_paused_or_playing() {
            return None;
        }

        let duration = if self.duration_is_valid() {
            None
        } else {
            Some(self.query_duration())
        };

        Some(Progress {
            duration,
            position: self.query_position(),
        })
    }

    pub fn volume(&self) -> f64 {
        self.backend.volume()
    }

    pub fn set_volume(&self, volume: f64) {
        self.backend.set_volume(volume);
    }

    pub fn color_balance(&self, name: &str) -> Option<i32> {
        let channels = self.backend.color_balance_channels();
        let channel = find_channel(&channels, name)?;
        self.backend.color_balance_value(channel)
    }

    pub fn set_color_balance(&self, name: &str, value: i32) {
        let channels = self.backend.color_balance_channels();
        if let Some(channel) = find_channel(&channels, name) {
            self.backend.set_color_balance_value(channel, value);
        }
    }

    /// Collects the tags of every video, audio and text stream, in that
    /// order. Streams without tags are skipped.
    pub fn streams(&self) -> Vec<StreamInfo> {
        if !self.has_session() {
            return Vec::new();
        }

        StreamKind::ALL
            .iter()
            .flat_map(|kind| {
                (0..self.backend.n_streams(*kind))
                    .filter_map(|i| self.backend.stream_tags(*kind, i))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Lists every stream of `kind`, including the ones without tags.
    pub fn tracks(&self, kind: StreamKind) -> Vec<StreamInfo> {
        if !self.has_session() {
            return Vec::new();
        }

        (0..self.backend.n_streams(kind))
            .map(|i| {
                self.backend
                    .stream_tags(kind, i)
                    .unwrap_or_else(|| StreamInfo::new(kind, i))
            })
            .collect()
    }

    pub fn current_stream(&self, kind: StreamKind) -> Option<i32> {
        self.backend.current_stream(kind)
    }

    pub fn select_stream(&self, kind: StreamKind, index: i32) {
        if self.has_session() {
            debug!("Selecting {kind} stream {index}");
            self.backend.set_current_stream(kind, index);
        }
    }

    pub fn paintable(&self) -> Option<gdk::Paintable> {
        self.backend.paintable()
    }

    pub fn state(&self) -> PlaybackState {
        self.session
            .borrow()
            .as_ref()
            .map(|s| s.state)
            .unwrap_or_default()
    }

    pub fn uri(&self) -> Option<String> {
        self.session.borrow().as_ref().map(|s| s.uri.clone())
    }

    pub fn has_session(&self) -> bool {
        self.session.borrow().is_some()
    }

    pub fn teardown(&self) {
        if self.session.take().is_some() {
            debug!("Tearing down the playback session");
            self.backend.teardown();
            self.notify(|c| c.set_playback_state(PlaybackState::Idle));
        }
    }
}

// Drains the bus messages on the main context for as long as the player lives
fn process_messages(player: Weak<Player>, receiver: Receiver<BusMessage>) {
    glib::MainContext::default().spawn_local(async move {
        use futures::prelude::*;

        let mut receiver = std::pin::pin!(receiver);
        while let Some(message) = receiver.next().await {
            match player.upgrade() {
                Some(player) => player.process_message(message),
                None => break,
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, VecDeque};

    use super::*;
    use crate::playback::{
        color_balance::{BRIGHTNESS, CONTRAST},
        ColorBalanceChannel,
    };

    const STEPS: [PlaybackState; 4] = [
        PlaybackState::Idle,
        PlaybackState::Ready,
        PlaybackState::Paused,
        PlaybackState::Playing,
    ];

    fn rank(state: PlaybackState) -> usize {
        STEPS.iter().position(|s| *s == state).unwrap_or(0)
    }

    #[derive(Debug, Default)]
    struct MockState {
        state: PlaybackState,
        uri: Option<String>,
        position: f64,
        duration: Option<f64>,
        volume: f64,
        channels: Vec<(ColorBalanceChannel, i32)>,
        streams: Vec<StreamInfo>,
        counts: HashMap<StreamKind, i32>,
        current: HashMap<StreamKind, i32>,
        pending: VecDeque<BusMessage>,
        requests: Vec<PlaybackState>,
        seeks: Vec<f64>,
        fail_open: bool,
        teardowns: u32,
        duration_queries: u32,
    }

    // A pipeline that moves one state at a time, like the real one, and
    // queues the matching bus messages until the test delivers them
    #[derive(Clone, Debug, Default)]
    struct MockBackend(Rc<RefCell<MockState>>);

    impl MockBackend {
        fn walk_to(&self, target: PlaybackState) {
            let mut state = self.0.borrow_mut();
            while state.state != target {
                let current = state.state;
                let next = if rank(target) > rank(current) {
                    STEPS[rank(current) + 1]
                } else {
                    STEPS[rank(current) - 1]
                };
                state.state = next;
                state.pending.push_back(BusMessage::StateChanged { old: current, current: next });
            }
        }

        fn prerolled(&self) -> bool {
            self.0.borrow().state.is_paused_or_playing()
        }
    }

    impl Backend for MockBackend {
        fn open(&self, uri: &str) -> Result<(), PlayerError> {
            if self.0.borrow().fail_open {
                return Err(PlayerError::ElementCreation("playbin".to_string()));
            }

            {
                let mut state = self.0.borrow_mut();
                state.uri = Some(uri.to_string());
                state.volume = 1.0;
            }
            self.walk_to(PlaybackState::Playing);
            Ok(())
        }

        fn set_uri(&self, uri: &str) {
            self.0.borrow_mut().uri = Some(uri.to_string());
        }

        fn request_state(&self, state: PlaybackState) -> Result<(), PlayerError> {
            if state == PlaybackState::Error {
                return Err(PlayerError::StateChange(state));
            }

            self.0.borrow_mut().requests.push(state);
            self.walk_to(state);
            Ok(())
        }

        fn seek(&self, position: f64) {
            let mut state = self.0.borrow_mut();
            state.seeks.push(position);
            state.position = position;
        }

        fn position(&self) -> Option<f64> {
            self.prerolled().then(|| self.0.borrow().position)
        }

        fn duration(&self) -> Option<f64> {
            self.0.borrow_mut().duration_queries += 1;
            if self.prerolled() {
                self.0.borrow().duration
            } else {
                None
            }
        }

        fn volume(&self) -> f64 {
            self.0.borrow().volume
        }

        fn set_volume(&self, volume: f64) {
            self.0.borrow_mut().volume = volume;
        }

        fn color_balance_channels(&self) -> Vec<ColorBalanceChannel> {
            self.0
                .borrow()
                .channels
                .iter()
                .map(|(c, _)| c.clone())
                .collect()
        }

        fn color_balance_value(&self, channel: &ColorBalanceChannel) -> Option<i32> {
            self.0
                .borrow()
                .channels
                .iter()
                .find(|(c, _)| c == channel)
                .map(|(_, v)| *v)
        }

        fn set_color_balance_value(&self, channel: &ColorBalanceChannel, value: i32) {
            if let Some((_, v)) = self
                .0
                .borrow_mut()
                .channels
                .iter_mut()
                .find(|(c, _)| c == channel)
            {
                *v = value;
            }
        }

        fn n_streams(&self, kind: StreamKind) -> i32 {
            self.0.borrow().counts.get(&kind).copied().unwrap_or(0)
        }

        fn stream_tags(&self, kind: StreamKind, index: i32) -> Option<StreamInfo> {
            self.0
                .borrow()
                .streams
                .iter()
                .find(|s| s.kind == kind && s.index == index)
                .cloned()
        }

        fn current_stream(&self, kind: StreamKind) -> Option<i32> {
            self.0.borrow().current.get(&kind).copied()
        }

        fn set_current_stream(&self, kind: StreamKind, index: i32) {
            self.0.borrow_mut().current.insert(kind, index);
        }

        fn paintable(&self) -> Option<gdk::Paintable> {
            None
        }

        fn teardown(&self) {
            let mut state = self.0.borrow_mut();
            state.teardowns += 1;
            state.state = PlaybackState::Idle;
            state.pending.clear();
        }
    }

    #[derive(Clone, Debug, PartialEq)]
    enum Event {
        State(PlaybackState),
        Uri(String),
        Metadata,
        Error(String),
        EndOfStream,
    }

    struct Recorder(Rc<RefCell<Vec<Event>>>);

    impl Controller for Recorder {
        fn set_playback_state(&self, state: PlaybackState) {
            self.0.borrow_mut().push(Event::State(state));
        }

        fn set_uri(&self, uri: &str) {
            self.0.borrow_mut().push(Event::Uri(uri.to_string()));
        }

        fn metadata_available(&self) {
            self.0.borrow_mut().push(Event::Metadata);
        }

        fn playback_error(&self, error: &PlaybackError) {
            self.0.borrow_mut().push(Event::Error(error.message.clone()));
        }

        fn end_of_stream(&self) {
            self.0.borrow_mut().push(Event::EndOfStream);
        }
    }

    fn setup() -> (Rc<Player>, MockBackend, Rc<RefCell<Vec<Event>>>) {
        let backend = MockBackend::default();
        let player = Player::with_backend(Box::new(backend.clone()));
        let events = Rc::new(RefCell::new(Vec::new()));
        player.add_controller(Box::new(Recorder(events.clone())));
        (player, backend, events)
    }

    // Delivers the queued bus messages, as the main loop would
    fn pump(player: &Player, backend: &MockBackend) {
        loop {
            let message = backend.0.borrow_mut().pending.pop_front();
            match message {
                Some(message) => player.process_message(message),
                None => break,
            }
        }
    }

    fn decode_error() -> BusMessage {
        BusMessage::Error(PlaybackError {
            source: "avdec_h264".to_string(),
            message: "Could not decode stream.".to_string(),
            debug: None,
        })
    }

    #[test]
    fn open_reports_each_state_and_one_metadata_trigger() {
        let (player, backend, events) = setup();

        player.open("file:///a.mp4").unwrap();
        pump(&player, &backend);

        assert_eq!(
            *events.borrow(),
            vec![
                Event::Uri("file:///a.mp4".to_string()),
                Event::State(PlaybackState::Ready),
                Event::State(PlaybackState::Paused),
                Event::Metadata,
                Event::State(PlaybackState::Playing),
            ]
        );
        assert_eq!(player.state(), PlaybackState::Playing);
    }

    #[test]
    fn pausing_and_resuming_does_not_refresh_metadata() {
        let (player, backend, events) = setup();

        player.open("file:///a.mp4").unwrap();
        pump(&player, &backend);
        player.pause();
        pump(&player, &backend);
        player.play();
        pump(&player, &backend);

        let triggers = events.borrow().iter().filter(|e| **e == Event::Metadata).count();
        assert_eq!(triggers, 1);
    }

    #[test]
    fn duration_is_unknown_until_the_pipeline_prerolls() {
        let (player, backend, _) = setup();
        backend.0.borrow_mut().duration = Some(42.5);

        player.open("file:///a.mp4").unwrap();
        backend.0.borrow_mut().state = PlaybackState::Ready;
        assert_eq!(player.query_duration(), None);
        assert!(!player.duration_is_valid());

        backend.0.borrow_mut().state = PlaybackState::Paused;
        assert_eq!(player.query_duration(), Some(42.5));
        assert!(player.duration_is_valid());
    }

    #[test]
    fn stop_is_idempotent() {
        let (player, backend, events) = setup();

        player.open("file:///a.mp4").unwrap();
        pump(&player, &backend);

        player.stop();
        pump(&player, &backend);
        assert_eq!(player.state(), PlaybackState::Ready);

        player.stop();
        pump(&player, &backend);
        assert_eq!(player.state(), PlaybackState::Ready);

        assert!(!events.borrow().iter().any(|e| matches!(e, Event::Error(_))));
        assert_eq!(
            backend.0.borrow().requests,
            vec![PlaybackState::Ready, PlaybackState::Ready]
        );
    }

    #[test]
    fn change_source_stops_rebinds_and_resumes() {
        let (player, backend, _) = setup();
        backend.0.borrow_mut().duration = Some(10.0);

        player.open("file:///a.mp4").unwrap();
        pump(&player, &backend);
        player.query_duration();
        assert!(player.duration_is_valid());

        player.change_source("file:///b.mkv").unwrap();
        assert!(!player.duration_is_valid());
        pump(&player, &backend);

        assert_eq!(
            backend.0.borrow().requests,
            vec![PlaybackState::Ready, PlaybackState::Playing]
        );
        assert_eq!(backend.0.borrow().uri.as_deref(), Some("file:///b.mkv"));
        assert_eq!(player.uri().as_deref(), Some("file:///b.mkv"));
        assert_eq!(player.state(), PlaybackState::Playing);
    }

    #[test]
    fn open_with_a_session_changes_the_source() {
        let (player, backend, _) = setup();

        player.open("file:///a.mp4").unwrap();
        pump(&player, &backend);
        player.open("file:///b.mkv").unwrap();
        pump(&player, &backend);

        assert_eq!(player.uri().as_deref(), Some("file:///b.mkv"));
        assert_eq!(player.state(), PlaybackState::Playing);
        assert_eq!(backend.0.borrow().teardowns, 0);
    }

    #[test]
    fn change_source_without_session_fails() {
        let (player, _, _) = setup();
        assert!(matches!(
            player.change_source("file:///b.mkv"),
            Err(PlayerError::NoSession)
        ));
    }

    #[test]
    fn failed_open_keeps_no_session() {
        let (player, backend, events) = setup();
        backend.0.borrow_mut().fail_open = true;

        assert!(player.open("file:///a.mp4").is_err());
        assert!(!player.has_session());
        assert_eq!(player.state(), PlaybackState::Idle);
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn color_balance_round_trips() {
        let (player, backend, _) = setup();
        backend.0.borrow_mut().channels = vec![
            (ColorBalanceChannel::new(BRIGHTNESS, -1000, 1000), 0),
            (ColorBalanceChannel::new(CONTRAST, -1000, 1000), 0),
        ];

        player.set_color_balance(CONTRAST, 250);
        assert_eq!(player.color_balance(CONTRAST), Some(250));
        assert_eq!(player.color_balance(BRIGHTNESS), Some(0));
    }

    #[test]
    fn missing_color_balance_channel_is_ignored() {
        let (player, backend, _) = setup();
        backend.0.borrow_mut().channels =
            vec![(ColorBalanceChannel::new(CONTRAST, -1000, 1000), 10)];

        player.set_color_balance("GAMMA", 500);
        assert_eq!(player.color_balance("GAMMA"), None);
        assert_eq!(player.color_balance(CONTRAST), Some(10));
    }

    #[test]
    fn seeking_keeps_the_playback_state() {
        let (player, backend, _) = setup();

        player.open("file:///a.mp4").unwrap();
        pump(&player, &backend);

        player.seek(5.0);
        pump(&player, &backend);
        assert_eq!(player.state(), PlaybackState::Playing);

        player.pause();
        pump(&player, &backend);
        player.seek(1.5);
        pump(&player, &backend);
        assert_eq!(player.state(), PlaybackState::Paused);

        assert_eq!(backend.0.borrow().seeks, vec![5.0, 1.5]);
        assert_eq!(player.query_position(), Some(1.5));
    }

    #[test]
    fn decode_error_forces_ready_and_playback_can_resume() {
        let (player, backend, events) = setup();

        player.open("file:///a.mp4").unwrap();
        pump(&player, &backend);

        player.process_message(decode_error());
        assert_eq!(player.state(), PlaybackState::Error);
        pump(&player, &backend);
        assert_eq!(player.state(), PlaybackState::Ready);
        assert!(events
            .borrow()
            .contains(&Event::Error("Could not decode stream.".to_string())));

        player.play();
        pump(&player, &backend);
        assert_eq!(player.state(), PlaybackState::Playing);
        assert_eq!(player.uri().as_deref(), Some("file:///a.mp4"));
        assert_eq!(backend.0.borrow().uri.as_deref(), Some("file:///a.mp4"));
    }

    #[test]
    fn error_while_ready_settles_on_ready() {
        let (player, backend, _) = setup();

        player.open("file:///a.mp4").unwrap();
        pump(&player, &backend);
        player.stop();
        pump(&player, &backend);

        player.process_message(decode_error());
        pump(&player, &backend);
        assert_eq!(player.state(), PlaybackState::Ready);
    }

    #[test]
    fn end_of_stream_returns_to_ready() {
        let (player, backend, events) = setup();

        player.open("file:///a.mp4").unwrap();
        pump(&player, &backend);

        player.process_message(BusMessage::EndOfStream);
        pump(&player, &backend);

        assert_eq!(player.state(), PlaybackState::Ready);
        assert!(events.borrow().contains(&Event::EndOfStream));
        assert!(!events.borrow().iter().any(|e| matches!(e, Event::Error(_))));
    }

    #[test]
    fn commands_without_session_do_nothing() {
        let (player, backend, _) = setup();

        player.play();
        player.pause();
        player.stop();
        player.seek(3.0);
        player.process_message(BusMessage::EndOfStream);

        assert!(backend.0.borrow().requests.is_empty());
        assert!(backend.0.borrow().seeks.is_empty());
        assert_eq!(player.query_position(), None);
        assert_eq!(player.query_duration(), None);
        assert!(player.streams().is_empty());
    }

    #[test]
    fn volume_is_passed_through_unclamped() {
        let (player, backend, _) = setup();

        player.open("file:///a.mp4").unwrap();
        player.set_volume(1.5);
        assert_eq!(player.volume(), 1.5);
        assert_eq!(backend.0.borrow().volume, 1.5);
    }

    #[test]
    fn streams_are_listed_by_kind_skipping_untagged_ones() {
        let (player, backend, _) = setup();

        let mut video = StreamInfo::new(StreamKind::Video, 0);
        video.codec = Some("H.264".to_string());
        let mut audio = StreamInfo::new(StreamKind::Audio, 1);
        audio.language = Some("en".to_string());
        let text = StreamInfo::new(StreamKind::Text, 0);

        {
            let mut state = backend.0.borrow_mut();
            state.streams = vec![text.clone(), audio.clone(), video.clone()];
            state.counts.insert(StreamKind::Video, 1);
            state.counts.insert(StreamKind::Audio, 2);
            state.counts.insert(StreamKind::Text, 1);
        }

        player.open("file:///a.mp4").unwrap();
        assert_eq!(player.streams(), vec![video, audio, text]);
    }

    #[test]
    fn tracks_include_untagged_streams() {
        let (player, backend, _) = setup();

        let mut commentary = StreamInfo::new(StreamKind::Audio, 1);
        commentary.title = Some("Commentary".to_string());
        {
            let mut state = backend.0.borrow_mut();
            state.streams = vec![commentary.clone()];
            state.counts.insert(StreamKind::Audio, 2);
        }

        assert!(player.tracks(StreamKind::Audio).is_empty());

        player.open("file:///a.mp4").unwrap();
        assert_eq!(
            player.tracks(StreamKind::Audio),
            vec![StreamInfo::new(StreamKind::Audio, 0), commentary]
        );
        assert!(player.tracks(StreamKind::Text).is_empty());
    }

    #[test]
    fn selecting_a_stream_needs_a_session() {
        let (player, backend, _) = setup();

        player.select_stream(StreamKind::Audio, 1);
        assert_eq!(player.current_stream(StreamKind::Audio), None);

        player.open("file:///a.mp4").unwrap();
        player.select_stream(StreamKind::Audio, 1);
        assert_eq!(player.current_stream(StreamKind::Audio), Some(1));
        assert_eq!(backend.0.borrow().current.get(&StreamKind::Audio), Some(&1));
    }

    #[test]
    fn teardown_releases_the_pipeline_once() {
        let (player, backend, events) = setup();

        player.open("file:///a.mp4").unwrap();
        pump(&player, &backend);

        player.teardown();
        player.teardown();

        assert!(!player.has_session());
        assert_eq!(backend.0.borrow().teardowns, 1);
        assert_eq!(events.borrow().last(), Some(&Event::State(PlaybackState::Idle)));
    }

    #[test]
    fn toggle_play_switches_between_playing_and_paused() {
        let (player, backend, _) = setup();

        player.open("file:///a.mp4").unwrap();
        pump(&player, &backend);

        player.toggle_play();
        pump(&player, &backend);
        assert_eq!(player.state(), PlaybackState::Paused);

        player.toggle_play();
        pump(&player, &backend);
        assert_eq!(player.state(), PlaybackState::Playing);
    }

    #[test]
    fn progress_needs_a_paused_or_playing_session() {
        let (player, backend, _) = setup();
        assert_eq!(player.progress(), None);

        player.open("file:///a.mp4").unwrap();
        assert_eq!(player.state(), PlaybackState::Idle);
        assert_eq!(player.progress(), None);

        pump(&player, &backend);
        player.process_message(decode_error());
        assert_eq!(player.state(), PlaybackState::Error);
        assert_eq!(player.progress(), None);

        pump(&player, &backend);
        assert_eq!(player.state(), PlaybackState::Ready);
        assert_eq!(player.progress(), None);

        assert_eq!(backend.0.borrow().duration_queries, 0);
    }

    #[test]
    fn progress_queries_the_duration_until_it_is_known() {
        let (player, backend, _) = setup();
        backend.0.borrow_mut().position = 4.0;

        player.open("file:///a.mp4").unwrap();
        pump(&player, &backend);

        assert_eq!(
            player.progress(),
            Some(Progress {
                duration: Some(None),
                position: Some(4.0),
            })
        );

        backend.0.borrow_mut().duration = Some(30.0);
        assert_eq!(
            player.progress(),
            Some(Progress {
                duration: Some(Some(30.0)),
                position: Some(4.0),
            })
        );
        assert_eq!(backend.0.borrow().duration_queries, 2);

        assert_eq!(
            player.progress(),
            Some(Progress {
                duration: None,
                position: Some(4.0),
            })
        );
        assert_eq!(backend.0.borrow().duration_queries, 2);
    }

    #[test]
    fn progress_is_reported_while_paused() {
        let (player, backend, _) = setup();
        backend.0.borrow_mut().duration = Some(30.0);

        player.open("file:///a.mp4").unwrap();
        pump(&player, &backend);
        player.pause();
        pump(&player, &backend);

        let progress = player.progress().unwrap();
        assert_eq!(progress.duration, Some(Some(30.0)));
    }
}
