//! chargeview indicator
//!
//! Turns battery snapshots into display fields ([`format`]), tracks what the
//! indicator is showing ([`state`]) and draws it in the terminal ([`view`]).

pub mod app;
pub mod format;
pub mod state;
pub mod view;

pub use app::App;
pub use format::{BatteryDisplay, ColorClass, format};
pub use state::ViewState;
