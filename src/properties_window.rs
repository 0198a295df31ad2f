// SPDX-FileCopyrightText: 2024  Project Gliese contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use adw::subclass::prelude::*;
use gtk::{gio, glib, prelude::*, CompositeTemplate};

use crate::{
    i18n::{i18n, i18n_f},
    playback::{describe_streams, StreamInfo},
    utils,
};

mod imp {
    use super::*;

    #[derive(Debug, Default, CompositeTemplate)]
    #[template(resource = "/io/github/ProjectGliese/properties-window.ui")]
    pub struct PropertiesWindow {
        #[template_child]
        pub text_view: TemplateChild<gtk::TextView>,
    }

    #[glib::object_subclass]
    impl ObjectSubclass for PropertiesWindow {
        const NAME: &'static str = "GliesePropertiesWindow";
        type Type = super::PropertiesWindow;
        type ParentType = adw::Window;

        fn class_init(klass: &mut Self::Class) {
            Self::bind_template(klass);
        }

        fn instance_init(obj: &glib::subclass::InitializingObject<Self>) {
            obj.init_template();
        }
    }

    impl ObjectImpl for PropertiesWindow {}
    impl WidgetImpl for PropertiesWindow {}
    impl WindowImpl for PropertiesWindow {}
    impl AdwWindowImpl for PropertiesWindow {}
}

glib::wrapper! {
    pub struct PropertiesWindow(ObjectSubclass<imp::PropertiesWindow>)
        @extends gtk::Widget, gtk::Window, adw::Window,
        @implements gio::ActionGroup, gio::ActionMap;
}

impl PropertiesWindow {
    /// Shows a snapshot of `streams`; the window is not updated afterwards.
    pub fn new<P: IsA<gtk::Window>>(
        parent: &P,
        uri: Option<&str>,
        streams: &[StreamInfo],
    ) -> Self {
        let win: Self = glib::Object::builder()
            .property("transient-for", parent)
            .property("modal", true)
            .build();

        if let Some(uri) = uri {
            win.set_title(Some(&i18n_f(
                "Properties of {}",
                &[utils::display_name(uri).as_str()],
            )));
        }

        let text = if streams.is_empty() {
            i18n("No stream information available")
        } else {
            describe_streams(streams)
        };
        win.imp().text_view.buffer().set_text(&text);

        win
    }
}
