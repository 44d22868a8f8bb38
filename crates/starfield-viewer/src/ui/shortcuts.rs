use bevy::prelude::ResMut;
use bevy_egui::{egui, EguiContexts};

use crate::galaxy::GalaxyState;

pub fn handle_shortcuts(mut contexts: EguiContexts, mut st: ResMut<GalaxyState>) {
    let ctx = contexts.ctx_mut();
    let esc_pressed = ctx.input(|i| i.key_pressed(egui::Key::Escape));
    let wants_keyboard = ctx.wants_keyboard_input();

    if esc_pressed && st.ui.selected.is_some() {
        st.ui.selected = None;
    }

    if wants_keyboard {
        return;
    }

    if ctx.input(|i| i.key_pressed(egui::Key::N)) {
        st.ui.show_names = !st.ui.show_names;
    }
    if ctx.input(|i| i.key_pressed(egui::Key::H)) {
        st.ui.show_panel = !st.ui.show_panel;
    }
    if ctx.input(|i| i.key_pressed(egui::Key::R)) {
        st.reset_field();
    }
}
