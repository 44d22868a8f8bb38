use bevy::math::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use starfield_core::{Item, ItemId};
use std::collections::{HashMap, HashSet};

use crate::sim::magnitude::{MagnitudeTable, MagnitudeTier};
use crate::sim::model::{BackgroundPoint, Body};
use crate::util::config::PhysicsConfig;

pub struct World {
    pub params: PhysicsConfig,
    pub magnitudes: MagnitudeTable,
    pub(crate) bodies: Vec<Body>,
    pub(crate) items: HashMap<ItemId, Item>,
    pub(crate) background: Vec<BackgroundPoint>,
    pub(crate) viewport: Vec2,
    pub(crate) rng: StdRng,
}

impl Default for World {
    fn default() -> Self {
        Self::new(PhysicsConfig::default(), MagnitudeTable::default())
    }
}

impl World {
    pub fn new(params: PhysicsConfig, magnitudes: MagnitudeTable) -> Self {
        let rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            params,
            magnitudes,
            bodies: Vec::new(),
            items: HashMap::new(),
            background: Vec::new(),
            viewport: Vec2::ZERO,
            rng,
        }
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn centre(&self) -> Vec2 {
        self.viewport * 0.5
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn background(&self) -> &[BackgroundPoint] {
        &self.background
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.items.contains_key(id)
    }

    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.items.get(id)
    }

    pub fn body(&self, id: &ItemId) -> Option<&Body> {
        self.bodies.iter().find(|b| &b.id == id)
    }

    pub fn body_mut(&mut self, id: &ItemId) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|b| &b.id == id)
    }

    pub fn tier_of(&self, id: &ItemId) -> &MagnitudeTier {
        let popularity = self.items.get(id).map(|i| i.popularity).unwrap_or(0);
        self.magnitudes.tier_for(popularity)
    }

    pub fn radius_of(&self, id: &ItemId) -> f32 {
        self.tier_of(id).radius
    }

    pub fn set_params(&mut self, params: PhysicsConfig) {
        if let Some(seed) = params.seed {
            self.rng = StdRng::seed_from_u64(seed);
        }
        self.params = params;
    }

    pub fn set_magnitudes(&mut self, table: MagnitudeTable) {
        self.magnitudes = table;
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        let sanitize = |v: f32| if v.is_finite() && v >= 1.0 { v } else { 1.0 };
        self.viewport = Vec2::new(sanitize(width), sanitize(height));
        self.regenerate_background();

        for i in 0..self.bodies.len() {
            let pos = self.cluster_position();
            let b = &mut self.bodies[i];
            b.pos = pos;
            b.trail.clear();
        }

        tracing::debug!(
            width = self.viewport.x,
            height = self.viewport.y,
            background = self.background.len(),
            bodies = self.bodies.len(),
            "viewport resized"
        );
    }

    // Replaces the item set. Surviving ids keep their motion and trail.
    pub fn load_items(&mut self, items: Vec<Item>) {
        let mut seen: HashSet<ItemId> = HashSet::new();
        let mut old: HashMap<ItemId, Body> = self
            .bodies
            .drain(..)
            .map(|b| (b.id.clone(), b))
            .collect();
        self.items.clear();

        let mut created = 0usize;
        for item in items {
            if !seen.insert(item.id.clone()) {
                continue;
            }
            let body = match old.remove(&item.id) {
                Some(body) => body,
                None => {
                    created += 1;
                    self.spawn_body(item.id.clone())
                }
            };
            self.bodies.push(body);
            self.items.insert(item.id.clone(), item);
        }

        tracing::debug!(
            total = self.bodies.len(),
            created,
            removed = old.len(),
            "items loaded"
        );
    }

    pub fn upsert_item(&mut self, item: Item) {
        if !self.items.contains_key(&item.id) {
            let body = self.spawn_body(item.id.clone());
            self.bodies.push(body);
        }
        self.items.insert(item.id.clone(), item);
    }

    fn spawn_body(&mut self, id: ItemId) -> Body {
        let pos = self.cluster_position();
        let s = self.params.initial_speed.abs();
        let vel = if s.is_finite() && s > 0.0 {
            Vec2::new(self.rng.random_range(-s..=s), self.rng.random_range(-s..=s))
        } else {
            Vec2::ZERO
        };
        Body::new(id, pos, vel)
    }

    fn cluster_position(&mut self) -> Vec2 {
        let centre = self.centre();
        let max_dist = self.params.cluster_fraction.max(0.0) * self.viewport.min_element();
        let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
        let dist = if max_dist.is_finite() && max_dist > 0.0 {
            self.rng.random_range(0.0..=max_dist)
        } else {
            0.0
        };
        centre + Vec2::new(angle.cos(), angle.sin()) * dist
    }

    fn regenerate_background(&mut self) {
        let density = self.params.background_density.max(1.0);
        let area = self.viewport.x * self.viewport.y;
        let count = ((area / density).floor() as usize).min(self.params.max_background_points);

        let (w, h) = (self.viewport.x, self.viewport.y);
        let rng = &mut self.rng;
        self.background = (0..count)
            .map(|_| {
                let size = if rng.random_bool(0.05) {
                    3.0
                } else if rng.random_bool(0.2) {
                    2.0
                } else {
                    1.0
                };
                BackgroundPoint {
                    pos: Vec2::new(rng.random_range(0.0..w), rng.random_range(0.0..h)),
                    size,
                    base_brightness: rng.random_range(0.2..1.0),
                    twinkle_period: 2.0 + rng.random_range(0.0..5.0),
                    twinkle_phase: rng.random_range(0.0..std::f32::consts::TAU),
                }
            })
            .collect();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn seeded_world(w: f32, h: f32) -> World {
        let params = PhysicsConfig {
            seed: Some(42),
            ..PhysicsConfig::default()
        };
        let mut world = World::new(params, MagnitudeTable::default());
        world.resize(w, h);
        world
    }

    pub(crate) fn item(id: &str, popularity: u64) -> Item {
        let mut it = Item::new(id, &format!("Item {id}"));
        it.popularity = popularity;
        it
    }

    #[test]
    fn load_items_creates_clustered_bodies() {
        let mut world = seeded_world(1600.0, 1200.0);
        world.load_items((0..50).map(|i| item(&i.to_string(), i)).collect());

        assert_eq!(world.bodies().len(), 50);
        let centre = world.centre();
        let max_dist = 0.3 * 1200.0;
        for b in world.bodies() {
            assert!(b.pos.distance(centre) <= max_dist + 1e-3);
            assert!(b.vel.x.abs() <= 0.75 && b.vel.y.abs() <= 0.75);
            assert!(!b.paused);
            assert!(b.trail.is_empty());
        }
    }

    #[test]
    fn reload_keeps_survivors_and_drops_missing() {
        let mut world = seeded_world(800.0, 600.0);
        world.load_items(vec![item("a", 1), item("b", 2), item("c", 3)]);
        world.body_mut(&ItemId::from("b")).expect("b").pos = Vec2::new(12.0, 34.0);

        world.load_items(vec![item("b", 500), item("d", 0)]);

        let ids: Vec<&str> = world.bodies().iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "d"]);
        assert_eq!(
            world.body(&ItemId::from("b")).expect("b").pos,
            Vec2::new(12.0, 34.0)
        );
        assert!(!world.contains(&ItemId::from("a")));
        assert_eq!(world.tier_of(&ItemId::from("b")).tier, 2);
    }

    #[test]
    fn duplicate_ids_keep_first() {
        let mut world = seeded_world(800.0, 600.0);
        world.load_items(vec![item("a", 1), item("a", 2000)]);
        assert_eq!(world.bodies().len(), 1);
        assert_eq!(world.item(&ItemId::from("a")).expect("a").popularity, 1);
    }

    #[test]
    fn empty_item_list_is_valid() {
        let mut world = seeded_world(800.0, 600.0);
        world.load_items(vec![item("a", 1)]);
        world.load_items(Vec::new());
        assert!(world.bodies().is_empty());
        assert!(!world.background().is_empty());
    }

    #[test]
    fn background_scales_with_area() {
        let mut world = seeded_world(1500.0, 1000.0);
        assert_eq!(world.background().len(), 1000);
        world.resize(300.0, 100.0);
        assert_eq!(world.background().len(), 20);
        for p in world.background() {
            assert!(p.pos.x >= 0.0 && p.pos.x < 300.0);
            assert!(p.pos.y >= 0.0 && p.pos.y < 100.0);
            assert!([1.0, 2.0, 3.0].contains(&p.size));
            assert!((0.2..1.0).contains(&p.base_brightness));
        }
    }

    #[test]
    fn degenerate_resize_is_clamped() {
        let mut world = seeded_world(800.0, 600.0);
        world.load_items(vec![item("a", 1)]);
        world.resize(f32::NAN, -5.0);
        assert_eq!(world.viewport(), Vec2::new(1.0, 1.0));
        let b = world.body(&ItemId::from("a")).expect("a");
        assert!(b.pos.is_finite());
    }

    #[test]
    fn upsert_updates_popularity_in_place() {
        let mut world = seeded_world(800.0, 600.0);
        world.load_items(vec![item("a", 1)]);
        let before = world.body(&ItemId::from("a")).expect("a").pos;

        world.upsert_item(item("a", 1200));
        world.upsert_item(item("z", 0));

        assert_eq!(world.body(&ItemId::from("a")).expect("a").pos, before);
        assert_eq!(world.tier_of(&ItemId::from("a")).tier, 1);
        assert_eq!(world.bodies().len(), 2);
    }

    #[test]
    fn configured_seed_makes_spawns_repeatable() {
        let spawn = || {
            let mut world = World::default();
            world.set_params(PhysicsConfig {
                seed: Some(9),
                ..PhysicsConfig::default()
            });
            world.resize(800.0, 600.0);
            world.load_items(vec![item("a", 1), item("b", 2)]);
            world.bodies().iter().map(|b| (b.pos, b.vel)).collect::<Vec<_>>()
        };
        assert_eq!(spawn(), spawn());
    }
}
