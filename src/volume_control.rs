// SPDX-FileCopyrightText: 2024  Project Gliese contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use std::cell::Cell;

use adw::subclass::prelude::*;
use glib::clone;
use gtk::{gio, glib, prelude::*, CompositeTemplate};
use log::debug;

use crate::i18n::i18n;

mod imp {
    use glib::{subclass::Signal, ParamSpec, ParamSpecDouble, Value};
    use once_cell::sync::Lazy;

    use super::*;

    #[derive(Debug, Default, CompositeTemplate)]
    #[template(resource = "/io/github/ProjectGliese/volume-control.ui")]
    pub struct VolumeControl {
        #[template_child]
        pub mute_button: TemplateChild<gtk::Button>,
        #[template_child]
        pub volume_scale: TemplateChild<gtk::Scale>,

        // Volume to go back to when unmuting
        pub unmuted_volume: Cell<f64>,
    }

    #[glib::object_subclass]
    impl ObjectSubclass for VolumeControl {
        const NAME: &'static str = "GlieseVolumeControl";
        type Type = super::VolumeControl;
        type ParentType = gtk::Widget;

        fn class_init(klass: &mut Self::Class) {
            Self::bind_template(klass);

            klass.set_layout_manager_type::<gtk::BoxLayout>();
            klass.set_css_name("volume");
            klass.set_accessible_role(gtk::AccessibleRole::Group);
        }

        fn instance_init(obj: &glib::subclass::InitializingObject<Self>) {
            obj.init_template();
        }
    }

    impl ObjectImpl for VolumeControl {
        fn constructed(&self) {
            self.parent_constructed();

            self.unmuted_volume.set(1.0);

            let obj = self.obj();
            obj.setup_adjustment();
            obj.setup_scroll();
            obj.setup_mute_button();
        }

        fn dispose(&self) {
            while let Some(child) = self.obj().first_child() {
                child.unparent();
            }
        }

        fn properties() -> &'static [ParamSpec] {
            static PROPERTIES: Lazy<Vec<ParamSpec>> = Lazy::new(|| {
                vec![ParamSpecDouble::builder("volume")
                    .minimum(0.0)
                    .maximum(1.0)
                    .default_value(1.0)
                    .build()]
            });

            PROPERTIES.as_ref()
        }

        fn set_property(&self, _id: usize, value: &Value, pspec: &ParamSpec) {
            match pspec.name() {
                "volume" => {
                    if let Ok(v) = value.get::<f64>() {
                        self.volume_scale.set_value(v);
                    }
                }
                _ => unimplemented!(),
            }
        }

        fn property(&self, _id: usize, pspec: &ParamSpec) -> Value {
            match pspec.name() {
                "volume" => self.volume_scale.value().to_value(),
                _ => unimplemented!(),
            }
        }

        fn signals() -> &'static [Signal] {
            static SIGNALS: Lazy<Vec<Signal>> = Lazy::new(|| {
                vec![Signal::builder("volume-changed")
                    .param_types([f64::static_type()])
                    .build()]
            });

            SIGNALS.as_ref()
        }
    }

    impl WidgetImpl for VolumeControl {}
}

glib::wrapper! {
    pub struct VolumeControl(ObjectSubclass<imp::VolumeControl>)
        @extends gtk::Widget,
        @implements gio::ActionGroup, gio::ActionMap;
}

impl Default for VolumeControl {
    fn default() -> Self {
        glib::Object::new()
    }
}

impl VolumeControl {
    fn setup_adjustment(&self) {
        let adj = gtk::Adjustment::builder()
            .lower(0.0)
            .upper(1.0)
            .step_increment(0.05)
            .page_increment(0.1)
            .value(1.0)
            .build();
        self.imp().volume_scale.set_adjustment(&adj);
        adj.connect_value_changed(clone!(
            #[weak(rename_to = this)]
            self,
            move |adj| {
                let value = adj.value();
                this.update_mute_button(value);
                this.notify("volume");
                this.emit_by_name::<()>("volume-changed", &[&value]);
            }
        ));
    }

    fn setup_scroll(&self) {
        let controller = gtk::EventControllerScroll::builder()
            .name("volume-scroll")
            .flags(gtk::EventControllerScrollFlags::VERTICAL)
            .build();
        controller.connect_scroll(clone!(
            #[weak(rename_to = this)]
            self,
            #[upgrade_or]
            glib::Propagation::Proceed,
            move |_, _, dy| {
                debug!("Volume scroll delta: {}", dy);
                let adj = this.imp().volume_scale.adjustment();
                let delta = dy * adj.step_increment();
                adj.set_value((adj.value() - delta).clamp(adj.lower(), adj.upper()));
                glib::Propagation::Stop
            }
        ));
        self.add_controller(controller);
    }

    fn setup_mute_button(&self) {
        self.imp().mute_button.connect_clicked(clone!(
            #[weak(rename_to = this)]
            self,
            move |_| {
                let imp = this.imp();
                let current = imp.volume_scale.value();
                if current > 0.0 {
                    imp.unmuted_volume.set(current);
                    imp.volume_scale.set_value(0.0);
                } else {
                    imp.volume_scale.set_value(imp.unmuted_volume.get());
                }
            }
        ));
    }

    fn update_mute_button(&self, volume: f64) {
        let button = &self.imp().mute_button;
        if volume <= 0.0 {
            button.set_icon_name("audio-volume-muted-symbolic");
            button.set_tooltip_text(Some(&i18n("Unmute")));
        } else {
            let icon = if volume < 0.5 {
                "audio-volume-low-symbolic"
            } else {
                "audio-volume-high-symbolic"
            };
            button.set_icon_name(icon);
            button.set_tooltip_text(Some(&i18n("Mute")));
        }
    }

    pub fn volume(&self) -> f64 {
        self.imp().volume_scale.value()
    }

    pub fn set_volume(&self, volume: f64) {
        self.imp().volume_scale.set_value(volume);
    }

    pub fn connect_volume_changed<F: Fn(&Self, f64) + 'static>(
        &self,
        f: F,
    ) -> glib::SignalHandlerId {
        self.connect_closure(
            "volume-changed",
            false,
            glib::closure_local!(move |this: &Self, volume: f64| f(this, volume)),
        )
    }
}
