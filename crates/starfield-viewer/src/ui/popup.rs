use bevy::prelude::ResMut;
use bevy_egui::{egui, EguiContexts};
use starfield_core::{Item, ItemId};
use std::time::Instant;

use crate::galaxy::GalaxyState;
use crate::sim::palette::body_color;
use crate::ui::layout::{popup_rect, POPUP_SIZE};
use crate::ui::UiLayout;

const DESCRIPTION_CHARS: usize = 140;

fn short(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut s: String = text.chars().take(max).collect();
    s.push('…');
    s
}

fn item_body(ui: &mut egui::Ui, item: &Item, tier_label: &str, tier: u8) {
    let c = body_color(item);
    ui.label(
        egui::RichText::new(&item.name)
            .strong()
            .size(16.0)
            .color(egui::Color32::from_rgb(c.r, c.g, c.b)),
    );
    ui.label(egui::RichText::new(format!("★ {tier_label} (magnitude {tier})")).small());
    if !item.description.is_empty() {
        ui.label(short(&item.description, DESCRIPTION_CHARS));
    }
    ui.horizontal_wrapped(|ui| {
        for tag in item.tags() {
            ui.label(egui::RichText::new(tag).small().background_color(egui::Color32::from_gray(40)));
        }
    });
    ui.label(format!("popularity: {}", item.popularity));
    ui.label(egui::RichText::new(c.to_hex()).small().weak());
    if let Some(url) = &item.homepage {
        ui.hyperlink_to("homepage", url);
    }
}

pub fn popup_cards(mut contexts: EguiContexts, mut st: ResMut<GalaxyState>) {
    let ctx = contexts.ctx_mut();
    let hover = ctx.pointer_hover_pos();
    let now = Instant::now();

    let mut ids: Vec<ItemId> = st.interaction.visible_popups().cloned().collect();
    ids.sort();

    for id in ids {
        let (Some(body), Some(item)) = (st.world.body(&id), st.world.item(&id)) else {
            continue;
        };
        let rect = popup_rect(st.world.viewport(), body.pos);
        let item = item.clone();
        let tier = st.world.tier_of(&id);
        let (tier_no, tier_label) = (tier.tier, tier.label.clone());

        egui::Area::new(egui::Id::new(("popup", id.as_str())))
            .order(egui::Order::Foreground)
            .fixed_pos(egui::pos2(rect.x, rect.y))
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.set_width(POPUP_SIZE.x - 16.0);
                    ui.set_max_height(POPUP_SIZE.y - 16.0);
                    item_body(ui, &item, &tier_label, tier_no);
                });
            });

        let inside = hover.map(|p| rect.contains(p.x, p.y)).unwrap_or(false);
        match (inside, st.interaction.is_popup_hovered(&id)) {
            (true, false) => st.interaction.popup_entered(&id),
            (false, true) => st.interaction.popup_left(&id, now),
            _ => {}
        }
    }
}

pub fn selected_card(
    mut contexts: EguiContexts,
    mut st: ResMut<GalaxyState>,
    mut layout: ResMut<UiLayout>,
) {
    let Some(item) = st.selected_item().cloned() else {
        layout.selected_rect = None;
        layout.close_button_rect = None;
        return;
    };
    let tier = st.world.magnitudes.tier_for(item.popularity);
    let (tier_no, tier_label) = (tier.tier, tier.label.clone());

    let mut close = None;
    let resp = egui::Window::new("Selected")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-12.0, 12.0))
        .default_width(POPUP_SIZE.x)
        .show(contexts.ctx_mut(), |ui| {
            item_body(ui, &item, &tier_label, tier_no);
            ui.separator();
            close = Some(ui.button("Close (Esc)"));
        });

    layout.selected_rect = resp.map(|r| r.response.rect);
    layout.close_button_rect = close.as_ref().map(|b| b.rect);
    if close.map(|b| b.clicked()).unwrap_or(false) {
        st.ui.selected = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_descriptions_are_shortened() {
        assert_eq!(short("abc", 5), "abc");
        assert_eq!(short("abcdef", 3), "abc…");
        assert_eq!(short("星星星星", 2), "星星…");
    }
}
