// SPDX-FileCopyrightText: 2024  Project Gliese contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use std::rc::Rc;

use adw::subclass::prelude::*;
use glib::clone;
use gtk::{gio, glib, prelude::*, CompositeTemplate};
use log::debug;

use crate::playback::{
    color_balance::{BRIGHTNESS, CONTRAST, HUE, SATURATION},
    Player,
};

const CHANNEL_MIN: f64 = -1000.0;
const CHANNEL_MAX: f64 = 1000.0;

mod imp {
    use super::*;

    #[derive(Debug, Default, CompositeTemplate)]
    #[template(resource = "/io/github/ProjectGliese/color-balance-window.ui")]
    pub struct ColorBalanceWindow {
        #[template_child]
        pub contrast_scale: TemplateChild<gtk::Scale>,
        #[template_child]
        pub brightness_scale: TemplateChild<gtk::Scale>,
        #[template_child]
        pub hue_scale: TemplateChild<gtk::Scale>,
        #[template_child]
        pub saturation_scale: TemplateChild<gtk::Scale>,
    }

    #[glib::object_subclass]
    impl ObjectSubclass for ColorBalanceWindow {
        const NAME: &'static str = "GlieseColorBalanceWindow";
        type Type = super::ColorBalanceWindow;
        type ParentType = adw::Window;

        fn class_init(klass: &mut Self::Class) {
            Self::bind_template(klass);
        }

        fn instance_init(obj: &glib::subclass::InitializingObject<Self>) {
            obj.init_template();
        }
    }

    impl ObjectImpl for ColorBalanceWindow {}
    impl WidgetImpl for ColorBalanceWindow {}
    impl WindowImpl for ColorBalanceWindow {}
    impl AdwWindowImpl for ColorBalanceWindow {}
}

glib::wrapper! {
    pub struct ColorBalanceWindow(ObjectSubclass<imp::ColorBalanceWindow>)
        @extends gtk::Widget, gtk::Window, adw::Window,
        @implements gio::ActionGroup, gio::ActionMap;
}

impl ColorBalanceWindow {
    pub fn new<P: IsA<gtk::Window>>(parent: &P, player: Rc<Player>) -> Self {
        let win: Self = glib::Object::builder()
            .property("transient-for", parent)
            .property("modal", true)
            .build();

        let imp = win.imp();
        for (scale, channel) in [
            (&imp.contrast_scale, CONTRAST),
            (&imp.brightness_scale, BRIGHTNESS),
            (&imp.hue_scale, HUE),
            (&imp.saturation_scale, SATURATION),
        ] {
            bind_channel(scale, channel, &player);
        }

        win
    }
}

// Starts the scale at the current channel value and forwards every change
fn bind_channel(scale: &gtk::Scale, channel: &'static str, player: &Rc<Player>) {
    let adj = gtk::Adjustment::builder()
        .lower(CHANNEL_MIN)
        .upper(CHANNEL_MAX)
        .step_increment(1.0)
        .page_increment(100.0)
        .value(player.color_balance(channel).map(f64::from).unwrap_or(0.0))
        .build();
    scale.set_adjustment(&adj);

    adj.connect_value_changed(clone!(
        #[strong]
        player,
        move |adj| {
            let value = adj.value().round() as i32;
            debug!("Setting {channel} to {value}");
            player.set_color_balance(channel, value);
        }
    ));
}
