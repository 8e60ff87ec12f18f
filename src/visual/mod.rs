pub mod interactions;
pub mod layout;
pub mod plugin;
pub mod tiles;
pub mod ui;
