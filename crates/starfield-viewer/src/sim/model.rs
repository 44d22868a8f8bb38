use bevy::math::Vec2;
use smallvec::SmallVec;
use starfield_core::ItemId;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailPoint {
    pub pos: Vec2,
    pub age: u32,
}

pub type Trail = SmallVec<[TrailPoint; 16]>;

#[derive(Debug, Clone)]
pub struct Body {
    pub id: ItemId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub trail: Trail,
    pub paused: bool,
}

impl Body {
    pub fn new(id: ItemId, pos: Vec2, vel: Vec2) -> Self {
        Self {
            id,
            pos,
            vel,
            trail: Trail::new(),
            paused: false,
        }
    }

    // Ages every trail entry by one tick and drops those at or past `bound`.
    pub fn age_trail(&mut self, bound: u32) {
        for p in self.trail.iter_mut() {
            p.age = p.age.saturating_add(1);
        }
        self.trail.retain(|p| p.age < bound);
    }

    pub fn push_trail(&mut self, bound: u32) {
        if bound == 0 {
            return;
        }
        self.trail.insert(0, TrailPoint { pos: self.pos, age: 0 });
        self.trail.truncate(bound as usize);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundPoint {
    pub pos: Vec2,
    pub size: f32,
    pub base_brightness: f32,
    pub twinkle_period: f32,
    pub twinkle_phase: f32,
}

impl BackgroundPoint {
    pub fn brightness_at(&self, t_secs: f32) -> f32 {
        let period = if self.twinkle_period.is_finite() && self.twinkle_period > 0.0 {
            self.twinkle_period
        } else {
            1.0
        };
        let wave = (std::f32::consts::TAU * t_secs / period + self.twinkle_phase).sin();
        (self.base_brightness * (0.65 + 0.35 * wave)).clamp(0.0, 1.0)
    }
}
