use bevy::prelude::ResMut;
use bevy_egui::{egui, EguiContexts};
use std::time::Duration;

use crate::galaxy::GalaxyState;
use crate::ui::{UiLayout, PANEL_W};
use crate::util::config;

const HIDE_DELAY_MS: std::ops::RangeInclusive<u64> = 250..=10_000;

fn hide_delay_slider_ms(delay: Duration) -> u64 {
    let ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
    ms.clamp(*HIDE_DELAY_MS.start(), *HIDE_DELAY_MS.end())
}

pub fn ui_panel(
    mut contexts: EguiContexts,
    mut st: ResMut<GalaxyState>,
    mut layout: ResMut<UiLayout>,
) {
    if !st.ui.show_panel {
        layout.panel_rect = None;
        return;
    }

    let resp = egui::SidePanel::left("left")
        .exact_width(PANEL_W)
        .show(contexts.ctx_mut(), |ui| {
            ui.heading("Starfield");
            ui.label(format!("stars: {}", st.world.bodies().len()));
            ui.label(format!("background: {}", st.world.background().len()));
            ui.separator();

            ui.checkbox(&mut st.ui.show_names, "Show names");

            egui::CollapsingHeader::new("Magnitudes").show(ui, |ui| {
                for t in st.world.magnitudes.tiers() {
                    ui.label(format!("{} · {} (≥ {})", t.tier, t.label, t.min_popularity));
                }
            });

            ui.add_space(8.0);
            ui.separator();
            ui.heading("Motion");
            let p = &mut st.world.params;
            ui.add(egui::Slider::new(&mut p.centering_gain, 0.0..=0.2).text("centering gain"));
            ui.add(egui::Slider::new(&mut p.centering_threshold, 0.05..=0.5).text("centering radius"));
            ui.add(egui::Slider::new(&mut p.escape_chance, 0.0..=1.0).text("escape chance"));
            ui.add(egui::Slider::new(&mut p.wall_restitution, 0.1..=1.0).text("wall bounce"));
            ui.add(egui::Slider::new(&mut p.trail_len, 0..=30).text("trail length"));

            ui.add_space(8.0);
            ui.separator();
            ui.heading("Surfaces");
            let k = &mut st.world.params.restitution;
            ui.add(egui::Slider::new(&mut k.panel, 0.1..=1.0).text("panel"));
            ui.add(egui::Slider::new(&mut k.text, 0.1..=1.0).text("text"));
            ui.add(egui::Slider::new(&mut k.control, 0.1..=1.0).text("control"));
            ui.add(egui::Slider::new(&mut k.button, 0.1..=1.0).text("button"));
            ui.add(egui::Slider::new(&mut k.card, 0.1..=1.0).text("card"));

            ui.add_space(8.0);
            ui.separator();
            ui.heading("Popups");
            let mut ms = hide_delay_slider_ms(st.interaction.hide_delay);
            if ui
                .add(egui::Slider::new(&mut ms, HIDE_DELAY_MS).text("hide delay ms"))
                .changed()
            {
                st.interaction.hide_delay = Duration::from_millis(ms);
            }
            ui.add(egui::Slider::new(&mut st.interaction.hover_scale, 1.0..=2.0).text("hover scale"));

            ui.add_space(10.0);
            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("Reset field").clicked() {
                    st.reset_field();
                }
                if ui.button("Save settings").clicked() {
                    match config::save(&st.viewer_config()) {
                        Ok(()) => tracing::info!("viewer settings saved"),
                        Err(e) => tracing::warn!(error = %format!("{e:#}"), "failed to save settings"),
                    }
                }
            });
        });

    layout.panel_rect = Some(resp.response.rect);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hide_delay_slider_value_is_clamped_not_truncated() {
        assert_eq!(hide_delay_slider_ms(Duration::from_secs(3)), 3000);
        assert_eq!(hide_delay_slider_ms(Duration::from_millis(10)), 250);
        assert_eq!(hide_delay_slider_ms(Duration::from_secs(u64::MAX)), 10_000);
    }
}
