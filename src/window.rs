// SPDX-FileCopyrightText: 2024  Project Gliese contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use adw::subclass::prelude::*;
use glib::clone;
use gtk::{gdk, gio, glib, prelude::*, CompositeTemplate};
use log::{debug, error, warn};

use crate::{
    application::Application,
    color_balance_window::ColorBalanceWindow,
    config::APPLICATION_ID,
    fullscreen_window::FullscreenWindow,
    i18n::{i18n, i18n_f},
    playback::{Controller, PlaybackError, PlaybackState, Player, StreamKind},
    properties_window::PropertiesWindow,
    transport_controls::TransportControls,
    utils,
};

const DEFAULT_WIDTH: i32 = 800;
const DEFAULT_HEIGHT: i32 = 535;

// Actions shared by the transport controls of both windows
const PLAYER_ACTIONS: [&str; 3] = ["toggle-play", "stop", "toggle-fullscreen"];

mod imp {
    use glib::{ParamSpec, ParamSpecInt, Value};
    use once_cell::{sync::Lazy, unsync::OnceCell};

    use super::*;

    #[derive(Debug, CompositeTemplate)]
    #[template(resource = "/io/github/ProjectGliese/window.ui")]
    pub struct Window {
        // Template widgets
        #[template_child]
        pub toast_overlay: TemplateChild<adw::ToastOverlay>,
        #[template_child]
        pub picture: TemplateChild<gtk::Picture>,
        #[template_child]
        pub controls: TemplateChild<TransportControls>,
        #[template_child]
        pub audio_tracks: TemplateChild<gio::Menu>,
        #[template_child]
        pub subtitle_tracks: TemplateChild<gio::Menu>,

        pub player: OnceCell<Rc<Player>>,
        pub player_actions: gio::SimpleActionGroup,
        pub settings: Option<gio::Settings>,
        pub fullscreen_window: RefCell<Option<FullscreenWindow>>,

        pub audio_track: Cell<i32>,
        pub subtitle_track: Cell<i32>,
    }

    #[glib::object_subclass]
    impl ObjectSubclass for Window {
        const NAME: &'static str = "GlieseWindow";
        type Type = super::Window;
        type ParentType = adw::ApplicationWindow;

        fn class_init(klass: &mut Self::Class) {
            Self::bind_template(klass);

            klass.install_action("win.open", None, move |win, _, _| {
                debug!("Window::win.open()");
                win.show_open_dialog();
            });
            klass.install_action("win.color-balance", None, move |win, _, _| {
                debug!("Window::win.color-balance()");
                win.show_color_balance();
            });
            klass.install_action("win.properties", None, move |win, _, _| {
                debug!("Window::win.properties()");
                win.show_properties();
            });
            klass.install_property_action("win.audio-track", "audio-track");
            klass.install_property_action("win.subtitle-track", "subtitle-track");
        }

        fn instance_init(obj: &glib::subclass::InitializingObject<Self>) {
            TransportControls::static_type();
            obj.init_template();
        }

        fn new() -> Self {
            Self {
                toast_overlay: TemplateChild::default(),
                picture: TemplateChild::default(),
                controls: TemplateChild::default(),
                audio_tracks: TemplateChild::default(),
                subtitle_tracks: TemplateChild::default(),
                player: OnceCell::new(),
                player_actions: gio::SimpleActionGroup::new(),
                settings: utils::settings_manager(),
                fullscreen_window: RefCell::default(),
                audio_track: Cell::new(-1),
                subtitle_track: Cell::new(-1),
            }
        }
    }

    impl ObjectImpl for Window {
        fn constructed(&self) {
            self.parent_constructed();

            if APPLICATION_ID.ends_with("Devel") {
                self.obj().add_css_class("devel");
            }
        }

        fn properties() -> &'static [ParamSpec] {
            static PROPERTIES: Lazy<Vec<ParamSpec>> = Lazy::new(|| {
                vec![
                    ParamSpecInt::builder("audio-track")
                        .minimum(-1)
                        .default_value(-1)
                        .build(),
                    ParamSpecInt::builder("subtitle-track")
                        .minimum(-1)
                        .default_value(-1)
                        .build(),
                ]
            });
            PROPERTIES.as_ref()
        }

        fn set_property(&self, _id: usize, value: &Value, pspec: &ParamSpec) {
            let obj = self.obj();
            match pspec.name() {
                "audio-track" => obj.select_track(StreamKind::Audio, value.get().unwrap_or(-1)),
                "subtitle-track" => obj.select_track(StreamKind::Text, value.get().unwrap_or(-1)),
                _ => unimplemented!(),
            }
        }

        fn property(&self, _id: usize, pspec: &ParamSpec) -> Value {
            match pspec.name() {
                "audio-track" => self.audio_track.get().to_value(),
                "subtitle-track" => self.subtitle_track.get().to_value(),
                _ => unimplemented!(),
            }
        }
    }

    impl WidgetImpl for Window {}

    impl WindowImpl for Window {
        fn close_request(&self) -> glib::Propagation {
            let obj = self.obj();
            obj.save_window_state();
            obj.player().stop();

            self.parent_close_request()
        }
    }

    impl ApplicationWindowImpl for Window {}
    impl AdwApplicationWindowImpl for Window {}
}

glib::wrapper! {
    pub struct Window(ObjectSubclass<imp::Window>)
        @extends gtk::Widget, gtk::Window, gtk::ApplicationWindow, adw::ApplicationWindow,
        @implements gio::ActionGroup, gio::ActionMap;
}

impl Window {
    pub fn new(application: &Application) -> Self {
        let win: Self = glib::Object::builder()
            .property("application", application)
            .build();

        let player = application.player();
        player.add_controller(Box::new(WindowController::new(&win)));
        if win.imp().player.set(player).is_err() {
            error!("Window player was already set");
        }

        win.setup_player_actions();
        win.setup_controls(&win.imp().controls);
        win.restore_window_state();
        win.setup_refresh();
        win.set_session_actions_enabled(win.player().has_session());

        win
    }

    fn player(&self) -> Rc<Player> {
        self.imp()
            .player
            .get()
            .cloned()
            .expect("Window is always created with a player")
    }

    fn setup_player_actions(&self) {
        let group = &self.imp().player_actions;
        group.add_action_entries([
            gio::ActionEntry::builder("toggle-play")
                .activate(clone!(
                    #[weak(rename_to = win)]
                    self,
                    move |_: &gio::SimpleActionGroup, _, _| {
                        debug!("Window::player.toggle-play()");
                        win.player().toggle_play();
                    }
                ))
                .build(),
            gio::ActionEntry::builder("stop")
                .activate(clone!(
                    #[weak(rename_to = win)]
                    self,
                    move |_: &gio::SimpleActionGroup, _, _| {
                        debug!("Window::player.stop()");
                        win.player().stop();
                    }
                ))
                .build(),
            gio::ActionEntry::builder("toggle-fullscreen")
                .activate(clone!(
                    #[weak(rename_to = win)]
                    self,
                    move |_: &gio::SimpleActionGroup, _, _| {
                        debug!("Window::player.toggle-fullscreen()");
                        win.toggle_fullscreen();
                    }
                ))
                .build(),
        ]);

        self.insert_action_group("player", Some(group));
    }

    fn set_session_actions_enabled(&self, enabled: bool) {
        let imp = self.imp();

        for name in PLAYER_ACTIONS {
            if let Some(action) = imp
                .player_actions
                .lookup_action(name)
                .and_downcast::<gio::SimpleAction>()
            {
                action.set_enabled(enabled);
            }
        }

        self.action_set_enabled("win.properties", enabled);
        self.action_set_enabled("win.color-balance", enabled);
        imp.controls.set_sensitive(enabled);
    }

    // Wires seeking and volume of a set of transport controls to the player
    fn setup_controls(&self, controls: &TransportControls) {
        controls.connect_seek_requested(clone!(
            #[weak(rename_to = win)]
            self,
            move |_, position| win.player().seek(position)
        ));

        controls.volume_control().connect_volume_changed(clone!(
            #[weak(rename_to = win)]
            self,
            move |_, volume| win.player().set_volume(volume)
        ));
    }

    fn setup_refresh(&self) {
        glib::timeout_add_seconds_local(
            1,
            clone!(
                #[weak(rename_to = win)]
                self,
                #[upgrade_or]
                glib::ControlFlow::Break,
                move || {
                    win.refresh();
                    glib::ControlFlow::Continue
                }
            ),
        );
    }

    fn restore_window_state(&self) {
        let imp = self.imp();

        let (width, height, volume) = match imp.settings.as_ref() {
            Some(settings) => (
                settings.int("window-width"),
                settings.int("window-height"),
                settings.double("volume"),
            ),
            None => (DEFAULT_WIDTH, DEFAULT_HEIGHT, 1.0),
        };

        self.set_default_size(width, height);
        imp.controls.volume_control().set_volume(volume);
    }

    fn save_window_state(&self) {
        let imp = self.imp();
        let Some(settings) = imp.settings.as_ref() else {
            return;
        };

        let (width, height) = self.default_size();
        let volume = imp.controls.volume_control().volume();

        let res = settings
            .set_int("window-width", width)
            .and_then(|_| settings.set_int("window-height", height))
            .and_then(|_| settings.set_double("volume", volume));
        if let Err(e) = res {
            warn!("Unable to save the window state: {e}");
        }
    }

    fn all_controls(&self) -> Vec<TransportControls> {
        let mut controls = vec![self.imp().controls.get()];
        if let Some(fullscreen) = self.imp().fullscreen_window.borrow().as_ref() {
            controls.push(fullscreen.controls());
        }
        controls
    }

    fn refresh(&self) {
        let Some(progress) = self.player().progress() else {
            return;
        };

        for c in &self.all_controls() {
            if let Some(duration) = progress.duration {
                c.set_duration(duration);
            }
            if let Some(position) = progress.position {
                c.set_position(position);
            }
        }
    }

    fn show_open_dialog(&self) {
        let filter = gtk::FileFilter::new();
        filter.set_name(Some(&i18n("Media Files")));
        filter.add_mime_type("video/*");
        filter.add_mime_type("audio/*");

        let filters = gio::ListStore::new::<gtk::FileFilter>();
        filters.append(&filter);

        let dialog = gtk::FileDialog::builder()
            .title(i18n("Open File"))
            .accept_label(i18n("_Open"))
            .modal(true)
            .filters(&filters)
            .build();

        dialog.open(
            Some(self),
            gio::Cancellable::NONE,
            clone!(
                #[weak(rename_to = win)]
                self,
                move |res| match res {
                    Ok(file) => win.open_file(&file),
                    Err(e) => debug!("No file selected: {e}"),
                }
            ),
        );
    }

    pub fn open_file(&self, file: &gio::File) {
        let uri = file.uri();
        debug!("Window::open_file({uri})");

        if let Err(e) = self.player().open(&uri) {
            warn!("Unable to open {uri}: {e}");
            self.add_toast(i18n_f(
                "Unable to open “{}”",
                &[utils::display_name(&uri).as_str()],
            ));
        }
    }

    pub fn add_toast(&self, msg: String) {
        let toast = adw::Toast::new(&msg);
        self.imp().toast_overlay.add_toast(toast);
    }

    fn show_properties(&self) {
        let player = self.player();
        let streams = player.streams();
        PropertiesWindow::new(self, player.uri().as_deref(), &streams).present();
    }

    fn show_color_balance(&self) {
        ColorBalanceWindow::new(self, self.player()).present();
    }

    fn track_cell(&self, kind: StreamKind) -> Option<(&Cell<i32>, &'static str)> {
        let imp = self.imp();
        match kind {
            StreamKind::Audio => Some((&imp.audio_track, "audio-track")),
            StreamKind::Text => Some((&imp.subtitle_track, "subtitle-track")),
            StreamKind::Video => None,
        }
    }

    fn select_track(&self, kind: StreamKind, index: i32) {
        let Some((cell, property)) = self.track_cell(kind) else {
            return;
        };

        if cell.replace(index) != index {
            if index >= 0 {
                self.player().select_stream(kind, index);
            }
            self.notify(property);
        }
    }

    fn rebuild_track_menu(&self, kind: StreamKind) {
        let imp = self.imp();
        let (menu, action) = match kind {
            StreamKind::Audio => (&imp.audio_tracks, "win.audio-track"),
            StreamKind::Text => (&imp.subtitle_tracks, "win.subtitle-track"),
            StreamKind::Video => return,
        };

        let player = self.player();
        let tracks = player.tracks(kind);

        menu.remove_all();
        if tracks.is_empty() {
            menu.append(Some(&i18n("None Available")), None);
        }
        for track in tracks {
            let item = gio::MenuItem::new(Some(&track.track_label()), None);
            item.set_action_and_target_value(Some(action), Some(&track.index.to_variant()));
            menu.append_item(&item);
        }

        // Reflect the pipeline choice without selecting it again
        if let Some((cell, property)) = self.track_cell(kind) {
            cell.set(player.current_stream(kind).unwrap_or(-1));
            self.notify(property);
        }
    }

    fn toggle_fullscreen(&self) {
        if self.imp().fullscreen_window.borrow().is_some() {
            self.leave_fullscreen();
        } else {
            self.enter_fullscreen();
        }
    }

    fn enter_fullscreen(&self) {
        let Some(application) = self.application() else {
            return;
        };

        let imp = self.imp();
        let player = self.player();

        let fullscreen = FullscreenWindow::new(&application);
        fullscreen.insert_action_group("player", Some(&imp.player_actions));

        let controls = fullscreen.controls();
        self.setup_controls(&controls);
        controls.volume_control().set_volume(imp.controls.volume_control().volume());
        controls.set_playing(player.state().is_playing());
        if player.duration_is_valid() {
            controls.set_duration(player.query_duration());
        }

        fullscreen.connect_close_request(clone!(
            #[weak(rename_to = win)]
            self,
            #[upgrade_or]
            glib::Propagation::Proceed,
            move |_| {
                win.restore_from_fullscreen();
                glib::Propagation::Proceed
            }
        ));

        imp.picture.set_paintable(None::<&gdk::Paintable>);
        fullscreen.set_paintable(player.paintable().as_ref());

        imp.fullscreen_window.replace(Some(fullscreen.clone()));
        self.set_visible(false);
        fullscreen.present();
        fullscreen.fullscreen();

        self.refresh();
    }

    fn leave_fullscreen(&self) {
        let fullscreen = self.imp().fullscreen_window.borrow().clone();
        if let Some(fullscreen) = fullscreen {
            fullscreen.close();
        }
    }

    fn restore_from_fullscreen(&self) {
        let imp = self.imp();
        let Some(fullscreen) = imp.fullscreen_window.take() else {
            return;
        };

        debug!("Leaving fullscreen");
        let volume = fullscreen.controls().volume_control().volume();
        fullscreen.set_paintable(None);

        imp.picture.set_paintable(self.player().paintable().as_ref());
        imp.controls.volume_control().set_volume(volume);

        self.set_visible(true);
        self.present();
        self.refresh();
    }

    fn media_changed(&self, uri: &str) {
        let imp = self.imp();

        self.set_title(Some(&utils::display_name(uri)));
        self.set_session_actions_enabled(true);

        for c in self.all_controls() {
            c.reset();
        }

        let paintable = self.player().paintable();
        match imp.fullscreen_window.borrow().as_ref() {
            Some(fullscreen) => fullscreen.set_paintable(paintable.as_ref()),
            None => imp.picture.set_paintable(paintable.as_ref()),
        }

        self.player().set_volume(imp.controls.volume_control().volume());
    }

    fn playback_state_changed(&self, state: PlaybackState) {
        let playing = state.is_playing();
        for c in self.all_controls() {
            c.set_playing(playing);
        }
    }

    fn metadata_available(&self) {
        self.refresh();
        self.rebuild_track_menu(StreamKind::Audio);
        self.rebuild_track_menu(StreamKind::Text);
    }

    fn end_of_stream(&self) {
        for c in self.all_controls() {
            c.set_position(0.0);
        }
    }
}

// Forwards playback notifications to the window, as long as it exists
struct WindowController {
    window: glib::WeakRef<Window>,
}

impl WindowController {
    fn new(window: &Window) -> Self {
        Self {
            window: window.downgrade(),
        }
    }
}

impl Controller for WindowController {
    fn set_playback_state(&self, state: PlaybackState) {
        if let Some(win) = self.window.upgrade() {
            win.playback_state_changed(state);
        }
    }

    fn set_uri(&self, uri: &str) {
        if let Some(win) = self.window.upgrade() {
            win.media_changed(uri);
        }
    }

    fn metadata_available(&self) {
        if let Some(win) = self.window.upgrade() {
            win.metadata_available();
        }
    }

    fn playback_error(&self, error: &PlaybackError) {
        if let Some(win) = self.window.upgrade() {
            win.add_toast(i18n_f("Playback failed: {}", &[error.message.as_str()]));
        }
    }

    fn end_of_stream(&self) {
        if let Some(win) = self.window.upgrade() {
            win.end_of_stream();
        }
    }
}
