pub mod integrator;
pub mod interaction;
pub mod magnitude;
pub mod model;
pub mod palette;
pub mod presenter;
pub mod world;

pub use integrator::StepReport;
pub use interaction::{Interaction, InteractionEvent};
pub use magnitude::MagnitudeTable;
pub use world::World;
