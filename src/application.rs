// SPDX-FileCopyrightText: 2024  Project Gliese contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use std::rc::Rc;

use adw::subclass::prelude::*;
use gtk::{gio, glib, prelude::*};
use log::{debug, warn};

use crate::{
    config::{APPLICATION_ID, VERSION},
    i18n::i18n,
    playback::Player,
    window::Window,
};

mod imp {
    use super::*;

    #[derive(Debug)]
    pub struct Application {
        pub player: Rc<Player>,
    }

    #[glib::object_subclass]
    impl ObjectSubclass for Application {
        const NAME: &'static str = "GlieseApplication";
        type Type = super::Application;
        type ParentType = adw::Application;

        fn new() -> Self {
            Self {
                player: Player::new(),
            }
        }
    }

    impl ObjectImpl for Application {
        fn constructed(&self) {
            self.parent_constructed();

            let obj = self.obj();
            obj.setup_gactions();

            obj.set_accels_for_action("app.quit", &["<primary>q"]);
            obj.set_accels_for_action("win.open", &["<primary>o"]);
            obj.set_accels_for_action("player.toggle-fullscreen", &["F11"]);
            obj.set_accels_for_action("player.toggle-play", &["space"]);
        }
    }

    impl ApplicationImpl for Application {
        fn startup(&self) {
            self.parent_startup();

            gtk::Window::set_default_icon_name(APPLICATION_ID);
        }

        fn activate(&self) {
            debug!("Application::activate");

            self.obj().present_main_window();
        }

        fn open(&self, files: &[gio::File], _hint: &str) {
            debug!("Application::open");

            let window = self.obj().present_main_window();
            if files.len() > 1 {
                warn!("Only the first of {} files will be opened", files.len());
            }
            if let Some(file) = files.first() {
                window.open_file(file);
            }
        }

        fn shutdown(&self) {
            debug!("Application::shutdown");

            self.player.teardown();
            self.parent_shutdown();
        }
    }

    impl GtkApplicationImpl for Application {}
    impl AdwApplicationImpl for Application {}
}

glib::wrapper! {
    pub struct Application(ObjectSubclass<imp::Application>)
        @extends gio::Application, gtk::Application, adw::Application,
        @implements gio::ActionGroup, gio::ActionMap;
}

impl Default for Application {
    fn default() -> Self {
        glib::Object::builder::<Application>()
            .property("application-id", APPLICATION_ID)
            .property("flags", gio::ApplicationFlags::HANDLES_OPEN)
            .property("resource-base-path", "/io/github/ProjectGliese")
            .build()
    }
}

impl Application {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn player(&self) -> Rc<Player> {
        self.imp().player.clone()
    }

    fn present_main_window(&self) -> Window {
        let window = self
            .windows()
            .into_iter()
            .find_map(|w| w.downcast::<Window>().ok())
            .unwrap_or_else(|| Window::new(self));

        window.present();
        window
    }

    fn setup_gactions(&self) {
        self.add_action_entries([
            gio::ActionEntry::builder("quit")
                .activate(|app: &Application, _, _| {
                    app.quit_playback();
                })
                .build(),
            gio::ActionEntry::builder("about")
                .activate(|app: &Application, _, _| {
                    app.show_about();
                })
                .build(),
        ]);
    }

    fn quit_playback(&self) {
        debug!("Application::quit");

        self.player().stop();
        for window in self.windows() {
            window.close();
        }
        self.quit();
    }

    fn show_about(&self) {
        let dialog = adw::AboutWindow::builder()
            .application_icon(APPLICATION_ID)
            .application_name("Project Gliese")
            .developer_name("Project Gliese contributors")
            .version(VERSION)
            .comments(i18n("A simple media player."))
            .website("https://github.com/b1ackdemon/projectGliese")
            .license_type(gtk::License::Gpl30)
            // Translators: Replace "translator-credits" with your names, one name per line
            .translator_credits(i18n("translator-credits"))
            .modal(true)
            .build();

        if let Some(window) = self.active_window() {
            dialog.set_transient_for(Some(&window));
        }

        dialog.present();
    }
}
