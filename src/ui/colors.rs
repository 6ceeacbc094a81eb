//! 24-bit RGB color theme for terminal output.

use owo_colors::Rgb;
use ratatui::style::Color;

/// RGB triple.
pub type Rgb8 = (u8, u8, u8);

/// Color palette shared by the interactive UI and one-shot output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Result text - near white (241, 245, 249)
    pub text: Rgb8,
    /// Background the result fades in from (15, 23, 42)
    pub background: Rgb8,
    /// Accent for titles and the selected level - pink (236, 72, 153)
    pub accent: Rgb8,
    /// Success state color - green (34, 197, 94)
    pub success: Rgb8,
    /// Error state color - red (239, 68, 68)
    pub error: Rgb8,
    /// Loading state color - blue (59, 130, 246)
    pub loading: Rgb8,
    /// Muted/secondary text color - gray (107, 114, 128)
    pub muted: Rgb8,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            text: (241, 245, 249),
            background: (15, 23, 42),
            accent: (236, 72, 153),
            success: (34, 197, 94),
            error: (239, 68, 68),
            loading: (59, 130, 246),
            muted: (107, 114, 128),
        }
    }
}

impl Theme {
    /// Convert to a ratatui color.
    pub fn tui(color: Rgb8) -> Color {
        Color::Rgb(color.0, color.1, color.2)
    }

    /// Convert to an owo-colors color.
    pub fn ansi(color: Rgb8) -> Rgb {
        Rgb(color.0, color.1, color.2)
    }
}

/// Whether color output should be enabled. Respects the NO_COLOR environment variable.
pub fn colors_enabled() -> bool {
    std::env::var("NO_COLOR").is_err()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        let theme = Theme::default();
        assert_eq!(Theme::tui(theme.accent), Color::Rgb(236, 72, 153));
        let Rgb(r, g, b) = Theme::ansi(theme.error);
        assert_eq!((r, g, b), (239, 68, 68));
    }
}
