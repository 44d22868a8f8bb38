use bevy::math::Vec2;
use rand::Rng;
use starfield_core::{ExclusionRect, ItemId};

use crate::sim::world::World;
use crate::util::config::PhysicsConfig;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct StepReport {
    pub moved: usize,
    pub wall_bounces: usize,
    pub rect_hits: usize,
    pub escaped: Vec<ItemId>,
}

#[derive(Clone, Copy)]
enum Axis {
    X,
    Y,
}

impl World {
    pub fn step(&mut self, rects: &[ExclusionRect]) -> StepReport {
        let mut report = StepReport::default();
        let viewport = self.viewport;
        let centre = self.centre();

        let World {
            params,
            magnitudes,
            bodies,
            items,
            rng,
            ..
        } = self;
        let bound = params.trail_len;

        for body in bodies.iter_mut() {
            body.age_trail(bound);
            if body.paused {
                continue;
            }
            body.push_trail(bound);

            if !(body.pos.is_finite() && body.vel.is_finite()) {
                body.pos = centre;
                body.vel = Vec2::ZERO;
            }

            let popularity = items.get(&body.id).map(|i| i.popularity).unwrap_or(0);
            let r = magnitudes.tier_for(popularity).radius;

            apply_centering(params, &mut body.vel, body.pos, centre, viewport);
            body.pos += body.vel;

            let mut escaped = false;
            for axis in [Axis::X, Axis::Y] {
                match resolve_wall(params, rng, &mut body.pos, &mut body.vel, axis, r, viewport) {
                    WallOutcome::Clear => {}
                    WallOutcome::Bounced => report.wall_bounces += 1,
                    WallOutcome::Escaped => escaped = true,
                }
            }

            for rect in rects {
                if resolve_rect(params, rng, &mut body.pos, &mut body.vel, rect, r) {
                    report.rect_hits += 1;
                }
            }

            body.pos = contain(body.pos, r, viewport);
            if escaped {
                report.escaped.push(body.id.clone());
            }
            report.moved += 1;
        }

        report
    }
}

fn apply_centering(p: &PhysicsConfig, vel: &mut Vec2, pos: Vec2, centre: Vec2, viewport: Vec2) {
    let limit = p.centering_threshold * viewport.min_element();
    let offset = centre - pos;
    let dist = offset.length();
    if dist > limit && dist > f32::EPSILON {
        *vel += offset / dist * p.centering_gain;
    }
}

enum WallOutcome {
    Clear,
    Bounced,
    Escaped,
}

fn resolve_wall(
    p: &PhysicsConfig,
    rng: &mut impl Rng,
    pos: &mut Vec2,
    vel: &mut Vec2,
    axis: Axis,
    r: f32,
    viewport: Vec2,
) -> WallOutcome {
    let (coord, v, other_v, extent) = match axis {
        Axis::X => (&mut pos.x, &mut vel.x, &mut vel.y, viewport.x),
        Axis::Y => (&mut pos.y, &mut vel.y, &mut vel.x, viewport.y),
    };

    let low_hit = *coord <= r;
    if !low_hit && *coord < extent - r {
        return WallOutcome::Clear;
    }

    if !roll(rng, p.escape_chance) {
        *v = -*v * p.wall_restitution;
        *coord = clamp_axis(*coord, r, extent);
        return WallOutcome::Bounced;
    }

    *coord = if low_hit {
        extent - r - p.escape_padding
    } else {
        r + p.escape_padding
    };
    *v = *v * p.escape_damping + jitter(rng, p.escape_jitter);
    *other_v += jitter(rng, p.cross_jitter);
    WallOutcome::Escaped
}

fn resolve_rect(
    p: &PhysicsConfig,
    rng: &mut impl Rng,
    pos: &mut Vec2,
    vel: &mut Vec2,
    rect: &ExclusionRect,
    r: f32,
) -> bool {
    let overlaps = pos.x + r > rect.x
        && pos.x - r < rect.right()
        && pos.y + r > rect.y
        && pos.y - r < rect.bottom();
    if !overlaps {
        return false;
    }

    let k = p.restitution.for_kind(rect.kind);
    let (cx, cy) = rect.center();
    let dx = pos.x - cx;
    let dy = pos.y - cy;

    if dx.abs() > dy.abs() {
        pos.x = if dx > 0.0 {
            rect.right() + r + p.rect_padding
        } else {
            rect.x - r - p.rect_padding
        };
        vel.x = -vel.x * k;
    } else {
        pos.y = if dy > 0.0 {
            rect.bottom() + r + p.rect_padding
        } else {
            rect.y - r - p.rect_padding
        };
        vel.y = -vel.y * k;
    }

    vel.x += jitter(rng, p.rect_jitter);
    vel.y += jitter(rng, p.rect_jitter);
    true
}

fn roll(rng: &mut impl Rng, chance: f32) -> bool {
    if !(chance > 0.0) {
        return false;
    }
    rng.random_bool(f64::from(chance.min(1.0)))
}

fn jitter(rng: &mut impl Rng, span: f32) -> f32 {
    let half = span.abs() * 0.5;
    if half.is_finite() && half > 0.0 {
        rng.random_range(-half..=half)
    } else {
        0.0
    }
}

fn clamp_axis(v: f32, r: f32, extent: f32) -> f32 {
    if extent <= 2.0 * r {
        return extent * 0.5;
    }
    v.clamp(r, extent - r)
}

fn contain(pos: Vec2, r: f32, viewport: Vec2) -> Vec2 {
    Vec2::new(
        clamp_axis(pos.x, r, viewport.x),
        clamp_axis(pos.y, r, viewport.y),
    )
}
