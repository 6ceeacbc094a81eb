//! Terminal output: the interactive UI and one-shot printing.

pub mod colors;
pub mod oneshot;
pub mod tui;

pub use colors::Theme;
pub use oneshot::ResultPrinter;
