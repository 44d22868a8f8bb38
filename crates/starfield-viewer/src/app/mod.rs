use bevy::prelude::*;
use starfield_core::{Item, Msg};
use std::path::Path;
use std::time::{Duration, Instant};

use crate::app::events::{ItemHovered, ItemSelected, RecordInteraction};
use crate::app::resources::{Feed, NetRx};
use crate::galaxy::items::{demo_items, load_items_file};
use crate::galaxy::GalaxyState;
use crate::net::spawn_client;
use crate::ui::UiLayout;
use crate::util::config::{self, ViewerConfig};

pub mod events;
pub mod resources;

pub struct StarfieldViewerPlugin;

impl Plugin for StarfieldViewerPlugin {
    fn build(&self, app: &mut App) {
        let cfg = config::load_or_default();
        let mut st = GalaxyState::default();
        st.apply_viewer_config(&cfg);
        st.load_items(initial_items(&cfg));

        if cfg.auto_connect {
            let (tx, rx) = crossbeam_channel::unbounded();
            let feed = spawn_client(
                cfg.endpoint.clone(),
                Duration::from_secs(cfg.catalog_refresh_secs),
                tx,
            );
            app.insert_resource(NetRx(rx)).insert_resource(Feed(feed));
        }

        app.add_event::<ItemHovered>()
            .add_event::<ItemSelected>()
            .add_event::<RecordInteraction>()
            .insert_resource(Time::<Fixed>::from_duration(cfg.physics.tick_interval()))
            .insert_resource(st)
            .init_resource::<UiLayout>()
            .add_systems(Startup, crate::render::setup_camera)
            .add_systems(FixedUpdate, physics_tick)
            .add_systems(
                Update,
                (
                    track_viewport,
                    pump_network,
                    crate::ui::handle_shortcuts,
                    crate::ui::ui_panel,
                    crate::ui::hud_overlay,
                    crate::ui::popup_cards,
                    crate::ui::selected_card,
                    crate::ui::update_exclusion_rects,
                    crate::render::pointer_input,
                    tick_interaction,
                    flush_interaction_events,
                    send_record_clicks,
                    log_interaction_events,
                    crate::galaxy::tick_housekeeping,
                    crate::render::draw_field,
                )
                    .chain(),
            );
    }
}

fn initial_items(cfg: &ViewerConfig) -> Vec<Item> {
    if let Some(path) = &cfg.items_path {
        match load_items_file(Path::new(path)) {
            Ok(items) => {
                tracing::info!(path = %path, items = items.len(), "loaded items file");
                return items;
            }
            Err(e) => tracing::warn!(error = %format!("{e:#}"), "items file unusable"),
        }
    }
    if cfg.demo_mode {
        demo_items()
    } else {
        Vec::new()
    }
}

fn physics_tick(mut st: ResMut<GalaxyState>) {
    let report = st.physics_tick(Instant::now());
    if !report.escaped.is_empty() {
        tracing::trace!(escaped = report.escaped.len(), "bodies wrapped");
    }
}

fn track_viewport(windows: Query<&Window>, mut st: ResMut<GalaxyState>) {
    let Ok(window) = windows.get_single() else {
        return;
    };
    let size = Vec2::new(window.width(), window.height());
    if (st.world.viewport() - size).abs().max_element() > 0.5 {
        st.resize(size.x, size.y);
    }
}

fn pump_network(mut st: ResMut<GalaxyState>, rx: Option<Res<NetRx>>) {
    let Some(rx) = rx else {
        return;
    };
    for msg in rx.0.try_iter().take(10_000) {
        st.apply(msg);
    }
}

fn tick_interaction(mut st: ResMut<GalaxyState>) {
    let st = &mut *st;
    st.interaction.tick(&mut st.world, Instant::now());
}

fn flush_interaction_events(
    mut st: ResMut<GalaxyState>,
    mut hovered: EventWriter<ItemHovered>,
    mut selected: EventWriter<ItemSelected>,
    mut record: EventWriter<RecordInteraction>,
) {
    let ev = st.take_host_events();
    hovered.send_batch(ev.hovered.into_iter().map(ItemHovered));
    selected.send_batch(ev.selected.into_iter().map(ItemSelected));
    record.send_batch(ev.record.into_iter().map(RecordInteraction));
}

// Fire-and-forget: failures are logged, never retried.
fn send_record_clicks(mut reader: EventReader<RecordInteraction>, feed: Option<Res<Feed>>) {
    for RecordInteraction(id) in reader.read() {
        let Some(feed) = &feed else {
            tracing::debug!(item = %id, "no item feed, click not recorded");
            continue;
        };
        if let Err(e) = feed.0.send(Msg::RecordClick { id: id.clone() }) {
            tracing::warn!(item = %id, error = %e, "failed to record click");
        }
    }
}

fn log_interaction_events(
    mut hovered: EventReader<ItemHovered>,
    mut selected: EventReader<ItemSelected>,
) {
    for ItemHovered(id) in hovered.read() {
        tracing::debug!(item = ?id.as_ref().map(|i| i.as_str()), "hover");
    }
    for ItemSelected(id) in selected.read() {
        tracing::info!(item = %id, "selected");
    }
}
