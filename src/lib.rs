//! Slangify - translate text into slang.
//!
//! The library holds the request lifecycle controller, the HTTP client for
//! the translation service, the entrance animation and the terminal front
//! ends. The `slangify` binary wires them together.

pub mod animator;
pub mod client;
pub mod clipboard;
pub mod config;
pub mod controller;
pub mod error;
pub mod levels;
pub mod logging;
pub mod ui;
