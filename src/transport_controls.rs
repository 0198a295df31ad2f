// SPDX-FileCopyrightText: 2024  Project Gliese contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use std::cell::RefCell;

use adw::subclass::prelude::*;
use glib::clone;
use gtk::{gio, glib, prelude::*, CompositeTemplate};

use crate::{
    i18n::i18n,
    utils::{self, TIME_PLACEHOLDER},
    volume_control::VolumeControl,
};

mod imp {
    use glib::subclass::Signal;
    use once_cell::sync::Lazy;

    use super::*;

    #[derive(Debug, Default, CompositeTemplate)]
    #[template(resource = "/io/github/ProjectGliese/transport-controls.ui")]
    pub struct TransportControls {
        #[template_child]
        pub play_button: TemplateChild<gtk::Button>,
        #[template_child]
        pub stop_button: TemplateChild<gtk::Button>,
        #[template_child]
        pub volume_control: TemplateChild<VolumeControl>,
        #[template_child]
        pub position_label: TemplateChild<gtk::Label>,
        #[template_child]
        pub seek_scale: TemplateChild<gtk::Scale>,
        #[template_child]
        pub duration_label: TemplateChild<gtk::Label>,
        #[template_child]
        pub fullscreen_button: TemplateChild<gtk::Button>,

        // Blocked while the slider is moved by the refresh tick, so that
        // only user changes turn into seeks
        pub seek_handler: RefCell<Option<glib::SignalHandlerId>>,
    }

    #[glib::object_subclass]
    impl ObjectSubclass for TransportControls {
        const NAME: &'static str = "GlieseTransportControls";
        type Type = super::TransportControls;
        type ParentType = gtk::Widget;

        fn class_init(klass: &mut Self::Class) {
            Self::bind_template(klass);

            klass.set_layout_manager_type::<gtk::BinLayout>();
            klass.set_css_name("transportcontrols");
            klass.set_accessible_role(gtk::AccessibleRole::Group);
        }

        fn instance_init(obj: &glib::subclass::InitializingObject<Self>) {
            VolumeControl::static_type();
            obj.init_template();
        }
    }

    impl ObjectImpl for TransportControls {
        fn dispose(&self) {
            while let Some(child) = self.obj().first_child() {
                child.unparent();
            }
        }

        fn constructed(&self) {
            self.parent_constructed();

            self.obj().setup_seek_scale();
        }

        fn signals() -> &'static [Signal] {
            static SIGNALS: Lazy<Vec<Signal>> = Lazy::new(|| {
                vec![Signal::builder("seek-requested")
                    .param_types([f64::static_type()])
                    .build()]
            });

            SIGNALS.as_ref()
        }
    }

    impl WidgetImpl for TransportControls {}
}

glib::wrapper! {
    pub struct TransportControls(ObjectSubclass<imp::TransportControls>)
        @extends gtk::Widget,
        @implements gio::ActionGroup, gio::ActionMap;
}

impl Default for TransportControls {
    fn default() -> Self {
        glib::Object::new()
    }
}

impl TransportControls {
    fn setup_seek_scale(&self) {
        let adj = gtk::Adjustment::builder()
            .lower(0.0)
            .upper(0.0)
            .step_increment(1.0)
            .page_increment(10.0)
            .build();
        self.imp().seek_scale.set_adjustment(&adj);

        let handler = adj.connect_value_changed(clone!(
            #[weak(rename_to = this)]
            self,
            move |adj| {
                this.emit_by_name::<()>("seek-requested", &[&adj.value()]);
            }
        ));
        self.imp().seek_handler.replace(Some(handler));

        self.reset();
    }

    pub fn connect_seek_requested<F: Fn(&Self, f64) + 'static>(
        &self,
        f: F,
    ) -> glib::SignalHandlerId {
        self.connect_closure(
            "seek-requested",
            false,
            glib::closure_local!(move |this: &Self, position: f64| f(this, position)),
        )
    }

    pub fn volume_control(&self) -> VolumeControl {
        self.imp().volume_control.get()
    }

    pub fn set_duration(&self, duration: Option<f64>) {
        let imp = self.imp();
        match duration {
            Some(duration) => {
                imp.seek_scale.adjustment().set_upper(duration);
                imp.duration_label.set_label(&utils::format_time(duration));
            }
            None => imp.duration_label.set_label(TIME_PLACEHOLDER),
        }
    }

    pub fn set_position(&self, position: f64) {
        let imp = self.imp();
        let adj = imp.seek_scale.adjustment();

        if let Some(handler) = imp.seek_handler.borrow().as_ref() {
            adj.block_signal(handler);
            adj.set_value(position);
            adj.unblock_signal(handler);
        }

        imp.position_label.set_label(&utils::format_time(position));
    }

    pub fn set_playing(&self, playing: bool) {
        let button = &self.imp().play_button;
        if playing {
            button.set_icon_name("media-playback-pause-symbolic");
            button.set_tooltip_text(Some(&i18n("Pause")));
        } else {
            button.set_icon_name("media-playback-start-symbolic");
            button.set_tooltip_text(Some(&i18n("Play")));
        }
    }

    pub fn set_fullscreen(&self, fullscreen: bool) {
        let button = &self.imp().fullscreen_button;
        if fullscreen {
            button.set_icon_name("view-restore-symbolic");
            button.set_tooltip_text(Some(&i18n("Leave Fullscreen")));
        } else {
            button.set_icon_name("view-fullscreen-symbolic");
            button.set_tooltip_text(Some(&i18n("Fullscreen")));
        }
    }

    // Back to the state of a source that was never played
    pub fn reset(&self) {
        self.imp().seek_scale.adjustment().set_upper(0.0);
        self.set_position(0.0);
        self.set_duration(None);
        self.set_playing(false);
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;

    #[test]
    fn only_user_changes_request_a_seek() {
        // Needs a display
        if gtk::init().is_err() {
            return;
        }
        gio::resources_register_include!("gliese.gresource").unwrap();

        let controls = TransportControls::default();
        controls.set_duration(Some(120.0));

        let seeks = Rc::new(RefCell::new(Vec::new()));
        controls.connect_seek_requested(clone!(
            #[strong]
            seeks,
            move |_, position| seeks.borrow_mut().push(position)
        ));

        controls.set_position(42.0);
        assert!(seeks.borrow().is_empty());
        assert_eq!(controls.imp().seek_scale.value(), 42.0);
        assert_eq!(controls.imp().position_label.label(), "0:00:42");

        controls.imp().seek_scale.set_value(10.0);
        assert_eq!(*seeks.borrow(), vec![10.0]);
    }
}
