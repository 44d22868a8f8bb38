use bevy::prelude::*;

const SPACE: Color = Color::srgb(0.01, 0.01, 0.035);

pub fn setup_camera(mut commands: Commands) {
    commands.insert_resource(ClearColor(SPACE));
    commands.spawn(Camera2dBundle::default());
}

// Screen space (origin top-left, y down) to the centred, y-up space of the
// 2D camera.
pub fn to_camera_space(viewport: Vec2, p: Vec2) -> Vec2 {
    Vec2::new(p.x - viewport.x * 0.5, viewport.y * 0.5 - p.y)
}
