use std::borrow::Cow;

use ratatui::{
    Frame,
    backend::FromCrossterm,
    layout::{Alignment, Rect},
    style::Style,
    widgets::{Clear, Paragraph},
};

use crate::config::Theme;

/// The characters for the spinner animation
pub const SPINNER_CHARS: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// A widget to display a centered loading spinner and message as an overlay
pub struct LoadingSpinner<'a> {
    /// The current state of the loading spinner animation
    spinner_state: usize,
    /// The style for the spinner text
    style: Style,
    /// Optional message to display with the spinner
    message: Option<Cow<'a, str>>,
}

impl<'a> LoadingSpinner<'a> {
    /// Creates a new [`LoadingSpinner`] styled according to the provided theme
    pub fn new(theme: &Theme) -> Self {
        Self {
            spinner_state: 0,
            style: Style::from_crossterm(theme.primary),
            message: None,
        }
    }

    /// Sets or replaces the message to be displayed with the spinner
    pub fn with_message(mut self, message: impl Into<Cow<'a, str>>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Advances the spinner animation by one tick
    pub fn tick(&mut self) {
        self.spinner_state = (self.spinner_state + 1) % SPINNER_CHARS.len();
    }

    /// Retrieves the spinner char for the current frame, to be displayed by other widgets
    pub fn current_char(&self) -> &'static str {
        SPINNER_CHARS[self.spinner_state]
    }

    /// Renders the loading spinner in the center of the given area
    pub fn render_in(&self, frame: &mut Frame, area: Rect) {
        let spinner_char = self.current_char();
        let loading_text = if let Some(ref msg) = self.message {
            format!("{spinner_char} {msg}")
        } else {
            spinner_char.to_string()
        };

        // Vertically center a single line
        let line_area = Rect {
            y: area.y + area.height.saturating_sub(1) / 2,
            height: area.height.min(1),
            ..area
        };
        let loading_paragraph = Paragraph::new(loading_text)
            .style(self.style)
            .alignment(Alignment::Center);

        frame.render_widget(Clear, area);
        frame.render_widget(loading_paragraph, line_area);
    }
}
