//! Interactive terminal UI built on ratatui.

pub mod app;
pub mod keys;
mod runner;

pub use app::{App, UiOptions};
pub use keys::{map_key, Action};
pub use runner::{init_terminal, restore_terminal, run_interactive};
