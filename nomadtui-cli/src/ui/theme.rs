//! Color palette and style helpers for the nomadtui screens.

use ratatui::style::{Color, Modifier, Style};

use nomadtui_core::viewport::ContentStyle;

/// Color palette tokens for the theme
#[derive(Clone, Debug)]
pub struct Palette {
    /// Primary text color
    pub text: Color,
    /// Dimmed text (secondary info)
    pub text_dim: Color,
    /// Muted text (tertiary info, placeholders)
    pub text_muted: Color,
    /// Accent color (logo, focus)
    pub accent: Color,
    pub success: Color,
    pub warn: Color,
    pub error: Color,
    /// Selected row
    pub selection_bg: Color,
    pub selection_fg: Color,
    /// Filter term occurrences
    pub match_bg: Color,
    pub match_fg: Color,
    pub key_hint: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self::dark()
    }
}

impl Palette {
    pub fn dark() -> Self {
        Self {
            text: Color::Rgb(212, 212, 212),
            text_dim: Color::Rgb(150, 150, 150),
            text_muted: Color::Rgb(100, 100, 100),
            accent: Color::Rgb(0, 202, 142), // Nomad green
            success: Color::Rgb(78, 201, 176),
            warn: Color::Rgb(220, 180, 100),
            error: Color::Rgb(244, 135, 113),
            selection_bg: Color::Rgb(38, 79, 120),
            selection_fg: Color::White,
            match_bg: Color::Rgb(220, 180, 100),
            match_fg: Color::Black,
            key_hint: Color::Rgb(206, 145, 120),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Theme {
    pub palette: Palette,
}

impl Theme {
    // ---------- text ----------

    pub fn text_style(&self) -> Style {
        Style::default().fg(self.palette.text)
    }

    pub fn text_dim_style(&self) -> Style {
        Style::default().fg(self.palette.text_dim)
    }

    pub fn text_muted_style(&self) -> Style {
        Style::default().fg(self.palette.text_muted)
    }

    /// Body text of a viewport, by what it is showing.
    pub fn content_style(&self, style: ContentStyle) -> Style {
        match style {
            ContentStyle::Plain => self.text_style(),
            ContentStyle::StdErr => Style::default().fg(self.palette.error),
        }
    }

    // ---------- chrome ----------

    pub fn logo_style(&self) -> Style {
        Style::default()
            .fg(self.palette.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn key_hint_style(&self) -> Style {
        Style::default().fg(self.palette.key_hint)
    }

    /// Column header row of a table page
    pub fn column_header_style(&self) -> Style {
        Style::default()
            .fg(self.palette.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn filter_prefix_style(&self, focused: bool) -> Style {
        if focused {
            Style::default()
                .fg(self.palette.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .fg(self.palette.text)
                .add_modifier(Modifier::BOLD)
        }
    }

    pub fn filter_text_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.palette.warn)
        } else {
            Style::default().fg(self.palette.text_dim)
        }
    }

    // ---------- states ----------

    pub fn selection_style(&self) -> Style {
        Style::default()
            .bg(self.palette.selection_bg)
            .fg(self.palette.selection_fg)
    }

    pub fn match_style(&self) -> Style {
        Style::default()
            .bg(self.palette.match_bg)
            .fg(self.palette.match_fg)
    }

    pub fn success_style(&self) -> Style {
        Style::default().fg(self.palette.success)
    }

    pub fn warn_style(&self) -> Style {
        Style::default().fg(self.palette.warn)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.palette.error)
    }
}

static DEFAULT_THEME: std::sync::OnceLock<Theme> = std::sync::OnceLock::new();

pub fn theme() -> &'static Theme {
    DEFAULT_THEME.get_or_init(Theme::default)
}

/// Shorthand accessors over the global theme
pub mod styles {
    use super::*;

    pub fn text() -> Style {
        theme().text_style()
    }

    pub fn text_dim() -> Style {
        theme().text_dim_style()
    }

    pub fn text_muted() -> Style {
        theme().text_muted_style()
    }

    pub fn content(style: ContentStyle) -> Style {
        theme().content_style(style)
    }

    pub fn logo() -> Style {
        theme().logo_style()
    }

    pub fn key_hint() -> Style {
        theme().key_hint_style()
    }

    pub fn column_header() -> Style {
        theme().column_header_style()
    }

    pub fn filter_prefix(focused: bool) -> Style {
        theme().filter_prefix_style(focused)
    }

    pub fn filter_text(focused: bool) -> Style {
        theme().filter_text_style(focused)
    }

    pub fn selection() -> Style {
        theme().selection_style()
    }

    pub fn highlight() -> Style {
        theme().match_style()
    }

    pub fn success() -> Style {
        theme().success_style()
    }

    pub fn warn() -> Style {
        theme().warn_style()
    }

    pub fn error() -> Style {
        theme().error_style()
    }
}
