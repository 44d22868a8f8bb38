use bevy::prelude::*;
use bevy_egui::EguiContexts;
use std::time::Instant;

use crate::galaxy::GalaxyState;

pub fn pointer_input(
    windows: Query<&Window>,
    buttons: Res<ButtonInput<MouseButton>>,
    mut contexts: EguiContexts,
    mut st: ResMut<GalaxyState>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };
    // panels and popups take the pointer away from the field
    let over_ui = contexts.ctx_mut().is_pointer_over_area();
    let cursor = window.cursor_position().filter(|_| !over_ui);

    let st = &mut *st;
    st.interaction
        .pointer_moved(&mut st.world, cursor, Instant::now());

    if buttons.just_pressed(MouseButton::Left) {
        if let Some(pos) = cursor {
            st.interaction.click(&st.world, pos);
        }
    }
}
