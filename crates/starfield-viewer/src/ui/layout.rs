use bevy::math::Vec2;
use bevy::prelude::{Res, ResMut, Resource};
use bevy_egui::egui;
use starfield_core::{ExclusionRect, RectKind};

use crate::galaxy::GalaxyState;

pub const POPUP_OFFSET: Vec2 = Vec2::new(30.0, -80.0);
pub const POPUP_SIZE: Vec2 = Vec2::new(280.0, 160.0);

#[derive(Resource, Default, Clone, Copy)]
pub struct UiLayout {
    pub panel_rect: Option<egui::Rect>,
    pub hud_rect: Option<egui::Rect>,
    pub controls_rect: Option<egui::Rect>,
    pub selected_rect: Option<egui::Rect>,
    pub close_button_rect: Option<egui::Rect>,
}

pub fn popup_rect(viewport: Vec2, body: Vec2) -> ExclusionRect {
    let max = (viewport - POPUP_SIZE).max(Vec2::ZERO);
    let origin = (body + POPUP_OFFSET).clamp(Vec2::ZERO, max);
    ExclusionRect::new(origin.x, origin.y, POPUP_SIZE.x, POPUP_SIZE.y, RectKind::Card)
}

fn from_egui(rect: egui::Rect, kind: RectKind) -> Option<ExclusionRect> {
    if !rect.is_finite() || rect.width() <= 0.0 || rect.height() <= 0.0 {
        return None;
    }
    Some(ExclusionRect::new(
        rect.min.x,
        rect.min.y,
        rect.width(),
        rect.height(),
        kind,
    ))
}

pub fn exclusion_rects(layout: &UiLayout, st: &GalaxyState) -> Vec<ExclusionRect> {
    let mut out: Vec<ExclusionRect> = [
        (layout.panel_rect, RectKind::Panel),
        (layout.hud_rect, RectKind::Text),
        (layout.controls_rect, RectKind::Control),
        (layout.selected_rect, RectKind::Card),
        (layout.close_button_rect, RectKind::Button),
    ]
    .into_iter()
    .filter_map(|(rect, kind)| rect.and_then(|r| from_egui(r, kind)))
    .collect();

    let viewport = st.world.viewport();
    let mut popups: Vec<_> = st.interaction.visible_popups().collect();
    popups.sort();
    for id in popups {
        if let Some(body) = st.world.body(id) {
            out.push(popup_rect(viewport, body.pos));
        }
    }
    out
}

pub fn update_exclusion_rects(layout: Res<UiLayout>, mut st: ResMut<GalaxyState>) {
    st.exclusion = exclusion_rects(&layout, &st);
}

#[cfg(test)]
mod tests {
    use super::*;
    use starfield_core::{Item, ItemId};
    use std::time::Instant;

    #[test]
    fn popup_sits_up_and_right_of_body() {
        let r = popup_rect(Vec2::new(1600.0, 1200.0), Vec2::new(400.0, 300.0));
        assert_eq!((r.x, r.y, r.width, r.height), (430.0, 220.0, 280.0, 160.0));
        assert_eq!(r.kind, RectKind::Card);
    }

    #[test]
    fn popup_is_clamped_into_view() {
        let v = Vec2::new(800.0, 600.0);
        let r = popup_rect(v, Vec2::new(790.0, 20.0));
        assert_eq!((r.x, r.y), (520.0, 0.0));
        let tiny = popup_rect(Vec2::new(100.0, 100.0), Vec2::new(50.0, 50.0));
        assert_eq!((tiny.x, tiny.y), (0.0, 0.0));
    }

    #[test]
    fn rects_cover_chrome_and_visible_popups() {
        let mut st = GalaxyState::default();
        st.resize(1600.0, 1200.0);
        st.load_items(vec![Item::new("a", "A")]);
        let id = ItemId::from("a");
        let pos = Vec2::new(500.0, 500.0);
        {
            let b = st.world.body_mut(&id).expect("a");
            b.pos = pos;
        }
        st.interaction
            .pointer_moved(&mut st.world, Some(pos), Instant::now());

        let layout = UiLayout {
            panel_rect: Some(egui::Rect::from_min_size(
                egui::pos2(0.0, 0.0),
                egui::vec2(260.0, 1200.0),
            )),
            hud_rect: Some(egui::Rect::NOTHING),
            ..UiLayout::default()
        };
        let rects = exclusion_rects(&layout, &st);

        assert_eq!(rects.len(), 2);
        assert_eq!(rects[0].kind, RectKind::Panel);
        assert_eq!(rects[0].width, 260.0);
        assert_eq!(rects[1], popup_rect(st.world.viewport(), pos));
    }
}
