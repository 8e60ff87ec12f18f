pub mod best_time;
pub mod config;
pub mod session;
pub mod timer;
