use bevy::prelude::Resource;
use starfield_core::{ExclusionRect, Item, ItemId};
use std::collections::VecDeque;
use std::time::Instant;

use crate::net::{Incoming, IncomingKind};
use crate::sim::{Interaction, InteractionEvent, MagnitudeTable, StepReport, World};
use crate::util::config::{PhysicsConfig, ViewerConfig};

#[derive(Default)]
pub struct UiState {
    pub show_names: bool,
    pub show_panel: bool,
    pub selected: Option<ItemId>,
}

pub struct PerfState {
    pub fps: f32,
    pub ticks: u64,
    pub escapes: u64,
    pub wall_bounces: u64,
    pub rect_hits: u64,
    pub tick_rate: f32,
    pub tick_window: VecDeque<Instant>,
}

impl Default for PerfState {
    fn default() -> Self {
        Self {
            fps: 0.0,
            ticks: 0,
            escapes: 0,
            wall_bounces: 0,
            rect_hits: 0,
            tick_rate: 0.0,
            tick_window: VecDeque::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedStatus {
    #[default]
    Offline,
    Connected,
    Disconnected,
}

#[derive(Default)]
pub struct FeedState {
    pub status: FeedStatus,
    pub endpoint: Option<String>,
    pub last_error: Option<String>,
    pub catalogs: u64,
    pub updates: u64,
    pub last_seen: Option<Instant>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HostEvents {
    pub hovered: Vec<Option<ItemId>>,
    pub selected: Vec<ItemId>,
    pub record: Vec<ItemId>,
}

#[derive(Resource)]
pub struct GalaxyState {
    pub world: World,
    pub interaction: Interaction,
    pub ui: UiState,
    pub perf: PerfState,
    pub feed: FeedState,
    pub exclusion: Vec<ExclusionRect>,
    pub cfg: ViewerConfig,
}

impl Default for GalaxyState {
    fn default() -> Self {
        Self {
            world: World::default(),
            interaction: Interaction::default(),
            ui: UiState {
                show_panel: true,
                ..UiState::default()
            },
            perf: PerfState::default(),
            feed: FeedState::default(),
            exclusion: Vec::new(),
            cfg: ViewerConfig::default(),
        }
    }
}

impl GalaxyState {
    pub fn apply_viewer_config(&mut self, cfg: &ViewerConfig) {
        match cfg.physics.validate() {
            Ok(()) => self.world.set_params(cfg.physics.clone()),
            Err(e) => {
                tracing::warn!(error = %e, "invalid physics settings in config, keeping defaults");
                self.world.set_params(PhysicsConfig {
                    seed: cfg.physics.seed,
                    ..PhysicsConfig::default()
                });
            }
        }
        match MagnitudeTable::from_config(&cfg.magnitudes) {
            Ok(table) => self.world.set_magnitudes(table),
            Err(e) => {
                tracing::warn!(error = %e, "invalid magnitude table in config, keeping defaults");
                self.world.set_magnitudes(MagnitudeTable::default());
            }
        }
        self.interaction.apply_config(&cfg.interaction);
        self.ui.show_names = cfg.show_names;
        self.cfg = cfg.clone();
    }

    pub fn viewer_config(&self) -> ViewerConfig {
        let mut cfg = self.cfg.clone();
        cfg.show_names = self.ui.show_names;
        cfg.physics = self.world.params.clone();
        cfg.interaction.hide_delay_ms = self.interaction.hide_delay.as_millis() as u64;
        cfg.interaction.hover_scale = self.interaction.hover_scale;
        cfg
    }

    pub fn load_items(&mut self, items: Vec<Item>) {
        self.world.load_items(items);
        self.forget_removed();
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.world.resize(width, height);
        self.forget_removed();
    }

    pub fn reset_field(&mut self) {
        self.interaction.reset(&mut self.world);
        let v = self.world.viewport();
        self.world.resize(v.x, v.y);
    }

    fn forget_removed(&mut self) {
        self.interaction.retain_existing(&self.world);
        if let Some(sel) = &self.ui.selected {
            if !self.world.contains(sel) {
                self.ui.selected = None;
            }
        }
    }

    pub fn physics_tick(&mut self, now: Instant) -> StepReport {
        let report = self.world.step(&self.exclusion);
        self.perf.ticks += 1;
        self.perf.escapes += report.escaped.len() as u64;
        self.perf.wall_bounces += report.wall_bounces as u64;
        self.perf.rect_hits += report.rect_hits as u64;
        self.perf.tick_window.push_back(now);
        report
    }

    pub fn apply(&mut self, inc: Incoming) {
        self.feed.last_seen = Some(Instant::now());
        match inc.kind {
            IncomingKind::Connected => {
                self.feed.status = FeedStatus::Connected;
                self.feed.endpoint = Some(inc.stream);
                self.feed.last_error = None;
            }
            IncomingKind::Disconnected => {
                self.feed.status = FeedStatus::Disconnected;
            }
            IncomingKind::Catalog(items) => {
                tracing::info!(endpoint = %inc.stream, items = items.len(), "catalog received");
                self.feed.catalogs += 1;
                self.load_items(items);
            }
            IncomingKind::ItemUpdated(item) => {
                self.feed.updates += 1;
                self.world.upsert_item(item);
            }
            IncomingKind::Other(msg) => {
                tracing::trace!(?msg, "ignoring feed message");
            }
            IncomingKind::Error(err) => {
                tracing::warn!(endpoint = %inc.stream, error = %err, "item feed error");
                self.feed.last_error = Some(err);
            }
        }
    }

    pub fn take_host_events(&mut self) -> HostEvents {
        let mut out = HostEvents::default();
        for ev in self.interaction.drain_events() {
            match ev {
                InteractionEvent::Hover(id) => out.hovered.push(id),
                InteractionEvent::Select(id) => {
                    self.ui.selected = Some(id.clone());
                    out.selected.push(id);
                }
                InteractionEvent::RecordInteraction(id) => out.record.push(id),
                InteractionEvent::PopupShown(_) | InteractionEvent::PopupHidden(_) => {}
            }
        }
        out
    }

    pub fn selected_item(&self) -> Option<&Item> {
        self.ui.selected.as_ref().and_then(|id| self.world.item(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::math::Vec2;
    use starfield_core::Msg;

    fn state() -> GalaxyState {
        let mut cfg = ViewerConfig::default();
        cfg.physics.seed = Some(7);
        let mut st = GalaxyState::default();
        st.apply_viewer_config(&cfg);
        st.resize(1200.0, 800.0);
        st
    }

    fn item(id: &str, popularity: u64) -> Item {
        let mut it = Item::new(id, id);
        it.popularity = popularity;
        it
    }

    #[test]
    fn catalog_replaces_items_and_clears_stale_selection() {
        let mut st = state();
        st.load_items(vec![item("a", 1), item("b", 2)]);
        st.ui.selected = Some(ItemId::from("a"));

        st.apply(Incoming::from_msg(
            "sock".into(),
            Msg::Catalog {
                items: vec![item("b", 2), item("c", 3)],
            },
        ));

        assert_eq!(st.world.bodies().len(), 2);
        assert!(st.ui.selected.is_none());
        assert_eq!(st.feed.catalogs, 1);
    }

    #[test]
    fn click_selects_and_requests_record() {
        let mut st = state();
        st.load_items(vec![item("a", 0)]);
        let id = ItemId::from("a");
        let pos = Vec2::new(300.0, 300.0);
        st.world.body_mut(&id).expect("a").pos = pos;

        st.interaction.click(&st.world, pos);
        let ev = st.take_host_events();

        assert_eq!(ev.selected, vec![id.clone()]);
        assert_eq!(ev.record, vec![id.clone()]);
        assert_eq!(st.ui.selected, Some(id));
        assert!(st.take_host_events().record.is_empty());
    }

    #[test]
    fn feed_errors_do_not_touch_the_world() {
        let mut st = state();
        st.load_items(vec![item("a", 0)]);
        st.apply(Incoming::error("sock".into(), "boom".into()));
        st.apply(Incoming::disconnected("sock".into()));
        assert_eq!(st.world.bodies().len(), 1);
        assert_eq!(st.feed.status, FeedStatus::Disconnected);
        assert_eq!(st.feed.last_error.as_deref(), Some("boom"));
    }

    #[test]
    fn invalid_magnitudes_fall_back_to_defaults() {
        let mut cfg = ViewerConfig::default();
        for row in &mut cfg.magnitudes {
            row.enabled = false;
        }
        let mut st = GalaxyState::default();
        st.apply_viewer_config(&cfg);
        assert_eq!(st.world.magnitudes, MagnitudeTable::default());
    }

    #[test]
    fn non_finite_physics_settings_fall_back_to_defaults() {
        let cfg: ViewerConfig =
            toml::from_str("[physics]\ninitial_speed = inf\nrect_jitter = inf\nseed = 3\n")
                .expect("parse");
        let mut st = GalaxyState::default();
        st.apply_viewer_config(&cfg);
        assert_eq!(st.world.params.initial_speed, PhysicsConfig::default().initial_speed);
        assert_eq!(st.world.params.seed, Some(3));

        st.resize(800.0, 600.0);
        st.load_items(vec![item("a", 0)]);
        let centre = st.world.centre();
        st.world.body_mut(&ItemId::from("a")).expect("a").pos = centre;
        st.exclusion = vec![ExclusionRect::new(
            centre.x - 50.0,
            centre.y - 50.0,
            100.0,
            100.0,
            starfield_core::RectKind::Panel,
        )];
        st.physics_tick(Instant::now());
        let b = st.world.body(&ItemId::from("a")).expect("a");
        assert!(b.pos.is_finite() && b.vel.is_finite());
    }

    #[test]
    fn config_snapshot_reflects_live_settings() {
        let mut st = state();
        st.ui.show_names = true;
        st.world.params.escape_chance = 0.5;
        let cfg = st.viewer_config();
        assert!(cfg.show_names);
        assert_eq!(cfg.physics.escape_chance, 0.5);
        assert_eq!(cfg.interaction.hide_delay_ms, 3000);
    }

    #[test]
    fn physics_tick_uses_current_exclusion_rects() {
        let mut st = state();
        st.load_items(vec![item("a", 0)]);
        let centre = st.world.centre();
        st.world.body_mut(&ItemId::from("a")).expect("a").pos = centre;
        st.exclusion = vec![ExclusionRect::new(
            centre.x - 50.0,
            centre.y - 50.0,
            100.0,
            100.0,
            starfield_core::RectKind::Panel,
        )];
        let report = st.physics_tick(Instant::now());
        assert_eq!(report.rect_hits, 1);
        assert_eq!(st.perf.rect_hits, 1);
        assert_eq!(st.perf.ticks, 1);
    }
}
