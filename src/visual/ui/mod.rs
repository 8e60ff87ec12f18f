pub mod hud;

pub use hud::{HudState, handle_reset_input, spawn_hud, tick_session_timer, update_hud};
