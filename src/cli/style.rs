//! Terminal styling helpers

use owo_colors::{OwoColorize, Stream, Style};

/// Check mark used in summaries
pub const CHECK: &str = "✓";

/// Styling shortcuts that respect whether stdout supports color
pub trait Stylize: std::fmt::Display + Sized {
    /// Styled with `style` when stdout supports color
    fn styled(&self, style: Style) -> String {
        format!(
            "{}",
            self.if_supports_color(Stream::Stdout, |t| t.style(style))
        )
    }

    /// De-emphasized text
    fn muted(&self) -> String {
        self.styled(Style::new().dimmed())
    }

    /// Bold text
    fn emphasis(&self) -> String {
        self.styled(Style::new().bold())
    }

    /// Highlighted value
    fn accent(&self) -> String {
        self.styled(Style::new().cyan())
    }

    /// Success text
    fn success(&self) -> String {
        self.styled(Style::new().green())
    }

    /// Warning text
    fn warn(&self) -> String {
        self.styled(Style::new().yellow())
    }
}

impl<T: std::fmt::Display> Stylize for T {}

/// Red `error:` prefix for stderr
pub fn error_prefix() -> String {
    format!(
        "{}",
        "error:".if_supports_color(Stream::Stderr, |t| t.red().bold().to_string())
    )
}
