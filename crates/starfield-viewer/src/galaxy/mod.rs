pub mod items;
pub mod metrics;
pub mod state;

pub use metrics::tick_housekeeping;
pub use state::{FeedStatus, GalaxyState};
