// SPDX-FileCopyrightText: 2024  Project Gliese contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use std::cell::RefCell;

use adw::subclass::prelude::*;
use glib::clone;
use gtk::{gdk, gio, glib, prelude::*, CompositeTemplate};
use log::debug;

use crate::transport_controls::TransportControls;

const HIDE_TIMEOUT_SECONDS: u32 = 3;

/// Tracks whether the fullscreen controls are shown.
///
/// Only the first pointer motion after the controls were hidden reveals
/// them again; further motion is ignored until the hide timer fires.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AutoHide {
    revealed: bool,
}

impl AutoHide {
    /// Returns `true` if the controls must be revealed and the hide timer
    /// armed.
    pub fn pointer_moved(&mut self) -> bool {
        if self.revealed {
            return false;
        }

        self.revealed = true;
        true
    }

    /// Returns `true` if the controls must be hidden.
    pub fn timer_expired(&mut self) -> bool {
        std::mem::take(&mut self.revealed)
    }
}

mod imp {
    use super::*;

    #[derive(Debug, Default, CompositeTemplate)]
    #[template(resource = "/io/github/ProjectGliese/fullscreen-window.ui")]
    pub struct FullscreenWindow {
        #[template_child]
        pub overlay: TemplateChild<gtk::Overlay>,
        #[template_child]
        pub picture: TemplateChild<gtk::Picture>,
        #[template_child]
        pub revealer: TemplateChild<gtk::Revealer>,
        #[template_child]
        pub controls: TemplateChild<TransportControls>,

        pub auto_hide: RefCell<AutoHide>,
        pub hide_source: RefCell<Option<glib::SourceId>>,
    }

    #[glib::object_subclass]
    impl ObjectSubclass for FullscreenWindow {
        const NAME: &'static str = "GlieseFullscreenWindow";
        type Type = super::FullscreenWindow;
        type ParentType = adw::Window;

        fn class_init(klass: &mut Self::Class) {
            Self::bind_template(klass);

            klass.add_binding(gdk::Key::Escape, gdk::ModifierType::empty(), |win| {
                debug!("Leaving fullscreen");
                win.close();
                glib::Propagation::Stop
            });
        }

        fn instance_init(obj: &glib::subclass::InitializingObject<Self>) {
            TransportControls::static_type();
            obj.init_template();
        }
    }

    impl ObjectImpl for FullscreenWindow {
        fn constructed(&self) {
            self.parent_constructed();

            let obj = self.obj();
            obj.setup_motion();
            self.controls.set_fullscreen(true);
        }

        fn dispose(&self) {
            if let Some(source) = self.hide_source.take() {
                source.remove();
            }
        }
    }

    impl WidgetImpl for FullscreenWindow {}
    impl WindowImpl for FullscreenWindow {}
    impl AdwWindowImpl for FullscreenWindow {}
}

glib::wrapper! {
    pub struct FullscreenWindow(ObjectSubclass<imp::FullscreenWindow>)
        @extends gtk::Widget, gtk::Window, adw::Window,
        @implements gio::ActionGroup, gio::ActionMap;
}

impl FullscreenWindow {
    pub fn new<P: IsA<gtk::Application>>(application: &P) -> Self {
        glib::Object::builder()
            .property("application", application)
            .build()
    }

    pub fn controls(&self) -> TransportControls {
        self.imp().controls.get()
    }

    pub fn set_paintable(&self, paintable: Option<&gdk::Paintable>) {
        self.imp().picture.set_paintable(paintable);
    }

    fn setup_motion(&self) {
        let controller = gtk::EventControllerMotion::new();
        controller.connect_motion(clone!(
            #[weak(rename_to = win)]
            self,
            move |_, _, _| win.pointer_moved()
        ));
        self.imp().overlay.add_controller(controller);
    }

    fn pointer_moved(&self) {
        let imp = self.imp();
        if !imp.auto_hide.borrow_mut().pointer_moved() {
            return;
        }

        imp.overlay.set_cursor_from_name(Some("default"));
        imp.revealer.set_reveal_child(true);

        let source = glib::timeout_add_seconds_local_once(
            HIDE_TIMEOUT_SECONDS,
            clone!(
                #[weak(rename_to = win)]
                self,
                move || win.hide_controls()
            ),
        );
        imp.hide_source.replace(Some(source));
    }

    fn hide_controls(&self) {
        let imp = self.imp();

        // The source is gone once it fired
        let _ = imp.hide_source.take();

        if imp.auto_hide.borrow_mut().timer_expired() {
            imp.overlay.set_cursor_from_name(Some("none"));
            imp.revealer.set_reveal_child(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_motion_reveals_and_arms_the_timer() {
        let mut auto_hide = AutoHide::default();
        assert!(auto_hide.pointer_moved());
    }

    #[test]
    fn motion_while_revealed_is_ignored() {
        let mut auto_hide = AutoHide::default();

        auto_hide.pointer_moved();
        assert!(!auto_hide.pointer_moved());
        assert!(!auto_hide.pointer_moved());
        assert!(auto_hide.timer_expired());
    }

    #[test]
    fn timer_hides_and_rearms_motion() {
        let mut auto_hide = AutoHide::default();

        auto_hide.pointer_moved();
        assert!(auto_hide.timer_expired());
        assert!(!auto_hide.timer_expired());

        assert!(auto_hide.pointer_moved());
    }

    #[test]
    fn timer_without_reveal_does_nothing() {
        let mut auto_hide = AutoHide::default();
        assert!(!auto_hide.timer_expired());
    }
}
