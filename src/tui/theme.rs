//! Theme system for TUI colors and styles

use iocraft::prelude::Color;

use crate::error::FetchError;

const GREY: Color = Color::Rgb {
    r: 120,
    g: 120,
    b: 120,
};

/// Theme configuration for TUI components
#[derive(Debug, Clone)]
pub struct Theme {
    pub border: Color,
    pub border_focused: Color,
    pub background: Color,
    pub text: Color,
    pub text_dimmed: Color,
    pub highlight: Color,
    pub highlight_text: Color,
    pub search_match: Color,
    pub title: Color,
    pub digest: Color,

    // Fetch error colors
    pub error_auth: Color,
    pub error_not_found: Color,
    pub error_network: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            border: GREY,
            border_focused: Color::Blue,
            background: Color::Reset,
            text: Color::White,
            text_dimmed: GREY,
            highlight: Color::Blue,
            highlight_text: Color::White,
            search_match: Color::Yellow,
            title: Color::Cyan,
            digest: Color::Magenta,

            error_auth: Color::Yellow,
            error_not_found: Color::Magenta,
            error_network: Color::Red,
        }
    }
}

impl Theme {
    /// Border color for a pane, depending on focus
    pub fn border_for(&self, focused: bool) -> Color {
        if focused {
            self.border_focused
        } else {
            self.border
        }
    }

    /// Get the color for a fetch error
    pub fn error_color(&self, error: &FetchError) -> Color {
        match error {
            FetchError::Auth(_) => self.error_auth,
            FetchError::NotFound(_) => self.error_not_found,
            FetchError::Network(_) => self.error_network,
        }
    }
}

/// Global theme instance
pub static THEME: std::sync::LazyLock<Theme> = std::sync::LazyLock::new(Theme::default);

/// Get a reference to the global theme
pub fn theme() -> &'static Theme {
    &THEME
}
