pub mod hud;
pub mod layout;
pub mod panel;
pub mod popup;
pub mod shortcuts;

pub use hud::hud_overlay;
pub use layout::{update_exclusion_rects, UiLayout};
pub use panel::ui_panel;
pub use popup::{popup_cards, selected_card};
pub use shortcuts::handle_shortcuts;

pub const PANEL_W: f32 = 260.0;
pub const HUD_PANEL_GAP: f32 = 12.0;
pub const HUD_EDGE_PADDING: f32 = 12.0;
pub const HUD_MIN_CONTENT_W: f32 = 360.0;
pub const HUD_FALLBACK_Y_OFFSET: f32 = 40.0;
