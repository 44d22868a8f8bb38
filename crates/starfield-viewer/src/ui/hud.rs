use bevy::prelude::ResMut;
use bevy_egui::{egui, EguiContexts};

use crate::galaxy::{FeedStatus, GalaxyState};
use crate::ui::{
    UiLayout, HUD_EDGE_PADDING, HUD_FALLBACK_Y_OFFSET, HUD_MIN_CONTENT_W, HUD_PANEL_GAP, PANEL_W,
};

pub fn hud_overlay(
    mut contexts: EguiContexts,
    mut st: ResMut<GalaxyState>,
    mut layout: ResMut<UiLayout>,
) {
    let ctx = contexts.ctx_mut();
    let screen = ctx.screen_rect();
    let left = if st.ui.show_panel { PANEL_W + HUD_PANEL_GAP } else { HUD_EDGE_PADDING };
    let mut x = screen.min.x + left;
    let mut y = screen.min.y + HUD_EDGE_PADDING;
    if st.ui.show_panel && screen.width() < PANEL_W + HUD_MIN_CONTENT_W {
        x = screen.min.x + HUD_EDGE_PADDING;
        y = screen.min.y + HUD_EDGE_PADDING + HUD_FALLBACK_Y_OFFSET;
    }

    let hud = egui::Area::new("hud".into())
        .order(egui::Order::Foreground)
        .fixed_pos(egui::pos2(x, y))
        .show(ctx, |ui| {
            ui.group(|ui| {
                ui.label(format!("FPS: {:.0}", st.perf.fps));
                ui.label(format!("Ticks: {} ({:.0}/s)", st.perf.ticks, st.perf.tick_rate));
                ui.label(format!(
                    "Escapes / bounces / rect hits: {} / {} / {}",
                    st.perf.escapes, st.perf.wall_bounces, st.perf.rect_hits
                ));
                ui.label(format!(
                    "Popups: {} open, {} closing",
                    st.interaction.visible_popups().count(),
                    st.interaction.pending_timers()
                ));
                let feed = match st.feed.status {
                    FeedStatus::Offline => "offline",
                    FeedStatus::Connected => "connected",
                    FeedStatus::Disconnected => "reconnecting",
                };
                ui.label(format!(
                    "Feed: {feed} (catalogs {}, updates {})",
                    st.feed.catalogs, st.feed.updates
                ));
                if let Some(endpoint) = &st.feed.endpoint {
                    ui.label(egui::RichText::new(endpoint).small());
                }
                if let Some(seen) = st.feed.last_seen {
                    ui.label(format!("Last message: {:.0}s ago", seen.elapsed().as_secs_f32()));
                }
                if let Some(err) = &st.feed.last_error {
                    ui.label(egui::RichText::new(err).small().color(egui::Color32::LIGHT_RED));
                }
            });
        });
    layout.hud_rect = Some(hud.response.rect);

    let controls = egui::Area::new("controls".into())
        .order(egui::Order::Foreground)
        .anchor(
            egui::Align2::RIGHT_BOTTOM,
            egui::vec2(-HUD_EDGE_PADDING, -HUD_EDGE_PADDING),
        )
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                let names = if st.ui.show_names { "Hide names" } else { "Show names" };
                if ui.button(names).clicked() {
                    st.ui.show_names = !st.ui.show_names;
                }
                let panel = if st.ui.show_panel { "Hide panel" } else { "Show panel" };
                if ui.button(panel).clicked() {
                    st.ui.show_panel = !st.ui.show_panel;
                }
            });
        });
    layout.controls_rect = Some(controls.response.rect);
}
