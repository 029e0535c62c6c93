//! Terminal styles for the storefront CLI.
//!
//! Rendering code asks for a style by what the text *is* (a price, an id,
//! muted metadata) and never picks colors itself. `console` drops the escape
//! codes when stdout is not a terminal, so piped output stays plain.

use console::Style;

pub fn heading() -> Style {
    Style::new().bold()
}

pub fn id() -> Style {
    Style::new().yellow()
}

pub fn price() -> Style {
    Style::new().green()
}

pub fn muted() -> Style {
    Style::new().dim()
}

pub fn warning() -> Style {
    Style::new().red()
}

pub fn success() -> Style {
    Style::new().green().bold()
}
