use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::galaxy::GalaxyState;
use crate::render::camera::to_camera_space;
use crate::sim::palette::StarColor;
use crate::sim::presenter::{compose_frame, safe_radius, FrameOptions};

const MIN_TRAIL_RADIUS: f32 = 0.5;

fn star_color(c: StarColor, alpha: f32) -> Color {
    Color::srgba(
        f32::from(c.r) / 255.0,
        f32::from(c.g) / 255.0,
        f32::from(c.b) / 255.0,
        alpha.clamp(0.0, 1.0),
    )
}

pub fn draw_field(
    st: Res<GalaxyState>,
    time: Res<Time>,
    mut gizmos: Gizmos,
    mut contexts: EguiContexts,
) {
    let opts = FrameOptions {
        show_names: st.ui.show_names,
        selected: st.ui.selected.clone(),
        min_trail_radius: MIN_TRAIL_RADIUS,
    };
    let frame = compose_frame(&st.world, &st.interaction, time.elapsed_seconds(), &opts);
    let viewport = st.world.viewport();

    for p in &frame.background {
        gizmos.circle_2d(
            to_camera_space(viewport, p.pos),
            safe_radius(p.size * 0.5),
            Color::srgba(0.85, 0.88, 1.0, p.brightness),
        );
    }

    for t in &frame.trails {
        gizmos.circle_2d(
            to_camera_space(viewport, t.pos),
            t.radius,
            star_color(t.color, t.opacity),
        );
    }

    for b in &frame.bodies {
        let centre = to_camera_space(viewport, b.pos);
        if b.glow_radius > b.radius {
            gizmos.circle_2d(centre, b.glow_radius, star_color(b.color, 0.25 * b.brightness));
        }
        // concentric rings read as a filled disc
        for k in [1.0, 0.66, 0.33] {
            gizmos.circle_2d(centre, safe_radius(b.radius * k), star_color(b.color, b.brightness));
        }
        if b.hovered {
            gizmos.circle_2d(centre, safe_radius(b.radius + 3.0), Color::srgba(1.0, 1.0, 1.0, 0.8));
        }
        if b.selected {
            gizmos.circle_2d(centre, safe_radius(b.radius + 6.0), Color::srgb(1.0, 0.85, 0.3));
        }
    }

    if frame.labels.is_empty() {
        return;
    }
    let painter = contexts
        .ctx_mut()
        .layer_painter(egui::LayerId::background());
    for label in &frame.labels {
        painter.text(
            egui::pos2(label.pos.x, label.pos.y),
            egui::Align2::LEFT_BOTTOM,
            &label.text,
            egui::FontId::proportional(12.0),
            egui::Color32::from_rgb(label.color.r, label.color.g, label.color.b),
        );
    }
}
