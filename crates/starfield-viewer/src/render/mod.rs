pub mod camera;
pub mod field;
pub mod input;

pub use camera::setup_camera;
pub use field::draw_field;
pub use input::pointer_input;
