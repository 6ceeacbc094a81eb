//! Plain terminal output for one-shot translations.
//!
//! Result lines are revealed one after another on the same stagger schedule
//! as the interactive entrance animation.

use std::io::{self, Write};

use owo_colors::OwoColorize;
use tokio::time::{sleep_until, Instant};

use crate::animator::StaggerTiming;
use crate::levels::LevelCatalog;
use crate::ui::colors::{colors_enabled, Theme};

/// Writes one-shot results to a terminal stream.
#[derive(Debug, Clone)]
pub struct ResultPrinter {
    theme: Theme,
    colors_enabled: bool,
    timing: StaggerTiming,
    animate: bool,
}

impl Default for ResultPrinter {
    fn default() -> Self {
        Self::new(StaggerTiming::default())
    }
}

impl ResultPrinter {
    /// Create a printer. Colors follow NO_COLOR.
    pub fn new(timing: StaggerTiming) -> Self {
        Self {
            theme: Theme::default(),
            colors_enabled: colors_enabled(),
            timing,
            animate: true,
        }
    }

    /// Enable or disable colors.
    pub fn with_colors(mut self, enabled: bool) -> Self {
        self.colors_enabled = enabled;
        self
    }

    /// Set the reveal timing.
    pub fn with_timing(mut self, timing: StaggerTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Enable or disable the staggered reveal.
    pub fn with_animation(mut self, enabled: bool) -> Self {
        self.animate = enabled;
        self
    }

    /// Print the result lines, staggered when animation is on.
    pub async fn reveal<W: Write>(&self, out: &mut W, lines: &[&str]) -> io::Result<()> {
        let started = Instant::now();
        for (index, line) in lines.iter().enumerate() {
            if self.animate {
                sleep_until(started + self.timing.start_of(index)).await;
            }
            if self.colors_enabled {
                writeln!(out, "{}", line.color(Theme::ansi(self.theme.text)))?;
            } else {
                writeln!(out, "{}", line)?;
            }
            out.flush()?;
        }
        Ok(())
    }

    /// Print an error message.
    pub fn error<W: Write>(&self, out: &mut W, message: &str) -> io::Result<()> {
        if self.colors_enabled {
            writeln!(
                out,
                "{} {}",
                "error:".color(Theme::ansi(self.theme.error)).bold(),
                message
            )
        } else {
            writeln!(out, "error: {}", message)
        }
    }

    /// Print the copy confirmation.
    pub fn copied<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if self.colors_enabled {
            writeln!(out, "{}", "✓ Copied!".color(Theme::ansi(self.theme.success)))
        } else {
            writeln!(out, "Copied!")
        }
    }

    /// Print the level catalog, marking the selected level.
    pub fn levels<W: Write>(
        &self,
        out: &mut W,
        catalog: &LevelCatalog,
        selected: &str,
    ) -> io::Result<()> {
        for level in catalog.levels() {
            let marker = if level.id == selected { "*" } else { " " };
            if self.colors_enabled {
                writeln!(
                    out,
                    "{} {:<8} {:<8} {}",
                    marker.color(Theme::ansi(self.theme.accent)),
                    level.id.bold(),
                    level.label,
                    level.prompt.color(Theme::ansi(self.theme.muted))
                )?;
            } else {
                writeln!(out, "{} {:<8} {:<8} {}", marker, level.id, level.label, level.prompt)?;
            }
        }
        Ok(())
    }
}
