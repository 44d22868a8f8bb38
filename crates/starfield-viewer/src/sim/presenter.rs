use bevy::math::Vec2;
use starfield_core::ItemId;

use crate::sim::interaction::Interaction;
use crate::sim::palette::{body_color, StarColor, DEFAULT_COLOR};
use crate::sim::world::World;

pub const MIN_RADIUS: f32 = 0.05;
pub const LABEL_OFFSET: Vec2 = Vec2::new(15.0, -10.0);

pub fn safe_radius(r: f32) -> f32 {
    if r.is_finite() && r > MIN_RADIUS {
        r
    } else {
        MIN_RADIUS
    }
}

#[derive(Debug, Clone, Default)]
pub struct FrameOptions {
    pub show_names: bool,
    pub selected: Option<ItemId>,
    pub min_trail_radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundSprite {
    pub pos: Vec2,
    pub size: f32,
    pub brightness: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailSprite {
    pub pos: Vec2,
    pub radius: f32,
    pub opacity: f32,
    pub color: StarColor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BodySprite {
    pub id: ItemId,
    pub pos: Vec2,
    pub radius: f32,
    pub glow_radius: f32,
    pub brightness: f32,
    pub color: StarColor,
    pub tier: u8,
    pub tier_label: String,
    pub hovered: bool,
    pub selected: bool,
    pub paused: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NameLabel {
    pub id: ItemId,
    pub pos: Vec2,
    pub text: String,
    pub color: StarColor,
}

#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub background: Vec<BackgroundSprite>,
    pub trails: Vec<TrailSprite>,
    pub bodies: Vec<BodySprite>,
    pub labels: Vec<NameLabel>,
}

pub fn compose_frame(
    world: &World,
    interaction: &Interaction,
    t_secs: f32,
    opts: &FrameOptions,
) -> Frame {
    let mut frame = Frame {
        background: world
            .background()
            .iter()
            .map(|p| BackgroundSprite {
                pos: p.pos,
                size: safe_radius(p.size),
                brightness: p.brightness_at(t_secs),
            })
            .collect(),
        ..Frame::default()
    };

    let bound = world.params.trail_len.max(1) as f32;
    let min_trail = safe_radius(opts.min_trail_radius);

    for body in world.bodies() {
        let tier = world.tier_of(&body.id);
        let color = world
            .item(&body.id)
            .map(body_color)
            .unwrap_or(DEFAULT_COLOR);
        let hovered = interaction.hovered() == Some(&body.id);

        for p in &body.trail {
            let fade = ((bound - p.age as f32) / bound).clamp(0.0, 1.0);
            frame.trails.push(TrailSprite {
                pos: p.pos,
                radius: safe_radius((tier.radius * fade).max(min_trail)),
                opacity: 0.8 * fade,
                color,
            });
        }

        frame.bodies.push(BodySprite {
            id: body.id.clone(),
            pos: body.pos,
            radius: safe_radius(interaction.rendered_radius(world, &body.id)),
            glow_radius: if tier.glow_radius.is_finite() {
                tier.glow_radius.max(0.0)
            } else {
                0.0
            },
            brightness: tier.brightness.clamp(0.0, 1.0),
            color,
            tier: tier.tier,
            tier_label: tier.label.clone(),
            hovered,
            selected: opts.selected.as_ref() == Some(&body.id),
            paused: body.paused,
        });

        if opts.show_names {
            if let Some(item) = world.item(&body.id) {
                frame.labels.push(NameLabel {
                    id: body.id.clone(),
                    pos: body.pos + LABEL_OFFSET,
                    text: item.name.clone(),
                    color,
                });
            }
        }
    }

    frame
}
