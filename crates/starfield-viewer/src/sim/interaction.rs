use bevy::math::Vec2;
use starfield_core::ItemId;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::sim::world::World;
use crate::util::config::InteractionConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionEvent {
    Hover(Option<ItemId>),
    Select(ItemId),
    RecordInteraction(ItemId),
    PopupShown(ItemId),
    PopupHidden(ItemId),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PopupState {
    pub hovered: bool,
}

pub struct Interaction {
    pub hide_delay: Duration,
    pub hover_scale: f32,
    hovered: Option<ItemId>,
    popups: HashMap<ItemId, PopupState>,
    // pending hide deadlines
    timers: HashMap<ItemId, Instant>,
    events: Vec<InteractionEvent>,
}

impl Default for Interaction {
    fn default() -> Self {
        Self::new(&InteractionConfig::default())
    }
}

impl Interaction {
    pub fn new(cfg: &InteractionConfig) -> Self {
        Self {
            hide_delay: cfg.hide_delay(),
            hover_scale: cfg.hover_scale,
            hovered: None,
            popups: HashMap::new(),
            timers: HashMap::new(),
            events: Vec::new(),
        }
    }

    pub fn apply_config(&mut self, cfg: &InteractionConfig) {
        self.hide_delay = cfg.hide_delay();
        self.hover_scale = cfg.hover_scale;
    }

    pub fn hovered(&self) -> Option<&ItemId> {
        self.hovered.as_ref()
    }

    pub fn is_popup_visible(&self, id: &ItemId) -> bool {
        self.popups.contains_key(id)
    }

    pub fn is_popup_hovered(&self, id: &ItemId) -> bool {
        self.popups.get(id).map(|p| p.hovered).unwrap_or(false)
    }

    pub fn visible_popups(&self) -> impl Iterator<Item = &ItemId> {
        self.popups.keys()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn rendered_radius(&self, world: &World, id: &ItemId) -> f32 {
        let r = world.radius_of(id);
        if self.hovered.as_ref() == Some(id) {
            r * self.hover_scale.max(f32::EPSILON)
        } else {
            r
        }
    }

    pub fn hit_test(&self, world: &World, pos: Vec2) -> Option<ItemId> {
        if !pos.is_finite() {
            return None;
        }
        let mut best: Option<(f32, &ItemId)> = None;
        for b in world.bodies() {
            let d = b.pos.distance(pos);
            if d > self.rendered_radius(world, &b.id) {
                continue;
            }
            match best {
                Some((bd, _)) if bd <= d => {}
                _ => best = Some((d, &b.id)),
            }
        }
        best.map(|(_, id)| id.clone())
    }

    pub fn pointer_moved(&mut self, world: &mut World, pos: Option<Vec2>, now: Instant) {
        let target = pos.and_then(|p| self.hit_test(world, p));
        if target == self.hovered {
            return;
        }
        if let Some(prev) = self.hovered.take() {
            self.leave_body(prev, now);
        }
        if let Some(id) = target {
            self.enter_body(world, id);
        }
    }

    fn enter_body(&mut self, world: &mut World, id: ItemId) {
        self.cancel_hide(&id);
        if let Some(b) = world.body_mut(&id) {
            b.paused = true;
        }
        if !self.popups.contains_key(&id) {
            self.popups.insert(id.clone(), PopupState::default());
            self.events.push(InteractionEvent::PopupShown(id.clone()));
        }
        self.hovered = Some(id.clone());
        self.events.push(InteractionEvent::Hover(Some(id)));
    }

    fn leave_body(&mut self, id: ItemId, now: Instant) {
        self.events.push(InteractionEvent::Hover(None));
        if !self.is_popup_hovered(&id) {
            self.schedule_hide(id, now);
        }
    }

    pub fn popup_entered(&mut self, id: &ItemId) {
        if let Some(p) = self.popups.get_mut(id) {
            p.hovered = true;
            self.cancel_hide(id);
        }
    }

    pub fn popup_left(&mut self, id: &ItemId, now: Instant) {
        let Some(p) = self.popups.get_mut(id) else {
            return;
        };
        if !p.hovered {
            return;
        }
        p.hovered = false;
        if self.hovered.as_ref() != Some(id) {
            self.schedule_hide(id.clone(), now);
        }
    }

    fn schedule_hide(&mut self, id: ItemId, now: Instant) {
        // restarting replaces the previous deadline
        self.timers.insert(id, now + self.hide_delay);
    }

    pub fn click(&mut self, world: &World, pos: Vec2) -> Option<ItemId> {
        let id = self.hit_test(world, pos)?;
        self.events.push(InteractionEvent::Select(id.clone()));
        self.events.push(InteractionEvent::RecordInteraction(id.clone()));
        Some(id)
    }

    pub fn tick(&mut self, world: &mut World, now: Instant) -> Vec<ItemId> {
        let expired: Vec<ItemId> = self
            .timers
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(id, _)| id.clone())
            .collect();

        let mut hidden = Vec::with_capacity(expired.len());
        for id in expired {
            self.timers.remove(&id);
            if !world.contains(&id) {
                self.popups.remove(&id);
                continue;
            }
            if let Some(b) = world.body_mut(&id) {
                b.paused = false;
            }
            if self.popups.remove(&id).is_some() {
                self.events.push(InteractionEvent::PopupHidden(id.clone()));
                hidden.push(id);
            }
        }
        hidden
    }

    // Returns whether a timer was pending. Safe to call any number of times.
    pub fn cancel_hide(&mut self, id: &ItemId) -> bool {
        self.timers.remove(id).is_some()
    }

    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    pub fn retain_existing(&mut self, world: &World) {
        self.timers.retain(|id, _| world.contains(id));
        self.popups.retain(|id, _| world.contains(id));
        if let Some(h) = &self.hovered {
            if !world.contains(h) {
                self.hovered = None;
                self.events.push(InteractionEvent::Hover(None));
            }
        }
    }

    pub fn reset(&mut self, world: &mut World) {
        self.cancel_all();
        for id in self.popups.drain().map(|(id, _)| id) {
            if let Some(b) = world.body_mut(&id) {
                b.paused = false;
            }
            self.events.push(InteractionEvent::PopupHidden(id));
        }
        if let Some(id) = self.hovered.take() {
            if let Some(b) = world.body_mut(&id) {
                b.paused = false;
            }
            self.events.push(InteractionEvent::Hover(None));
        }
    }

    pub fn drain_events(&mut self) -> Vec<InteractionEvent> {
        std::mem::take(&mut self.events)
    }
}
