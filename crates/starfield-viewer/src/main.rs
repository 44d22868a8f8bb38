mod app;
mod galaxy;
mod net;
mod render;
mod sim;
mod ui;
mod util;

use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy_egui::EguiPlugin;

use crate::app::StarfieldViewerPlugin;

fn init_tracing() {
    let _ = tracing_subscriber::fmt::try_init();
}

fn main() {
    init_tracing();

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Starfield".into(),
                        ..default()
                    }),
                    ..default()
                })
                // tracing is set up above
                .disable::<LogPlugin>(),
        )
        .add_plugins(EguiPlugin)
        .add_plugins(StarfieldViewerPlugin)
        .run();
}
