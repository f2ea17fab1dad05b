use ratatui::{
    backend::FromCrossterm,
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Widget},
};
use ratatui_textarea::{CursorMove, TextArea};

use crate::{config::Theme, utils::remove_newlines};

const DEFAULT_STYLE: Style = Style::new();
const PLACEHOLDER: &str = "Type to search";
const SCREEN_TITLE: &str = " Grid Search By Json ";

/// The state of the [SearchBar]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    /// The bar is not focused and the query is empty
    Idle,
    /// The user is editing the query
    Active,
}

/// A single-line text input used to filter the grid
#[derive(Clone)]
pub struct SearchBar<'a> {
    textarea: TextArea<'a>,
    state: SearchState,
    active_style: Style,
    idle_style: Style,
    cursor_style: Style,
}

impl<'a> SearchBar<'a> {
    /// Creates a new idle search bar, styled according to the provided theme
    pub fn new(theme: &Theme) -> Self {
        let active_style = Style::from_crossterm(theme.primary);
        let idle_style = Style::from_crossterm(theme.secondary);
        let cursor_style = active_style.add_modifier(Modifier::REVERSED);

        let mut textarea = TextArea::default();
        textarea.set_cursor_line_style(DEFAULT_STYLE);
        textarea.set_placeholder_text(PLACEHOLDER);
        textarea.set_placeholder_style(idle_style);

        let mut bar = Self {
            textarea,
            state: SearchState::Idle,
            active_style,
            idle_style,
            cursor_style,
        };
        bar.apply_state();
        bar
    }

    /// Creates a new search bar with an initial query, active if the query is not empty
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        let query = remove_newlines(query.into());
        if !query.is_empty() {
            self.activate();
            self.textarea.insert_str(query);
        }
        self
    }

    /// Returns the current state
    pub fn state(&self) -> SearchState {
        self.state
    }

    /// Returns whether the user is editing the query
    pub fn is_active(&self) -> bool {
        self.state == SearchState::Active
    }

    /// Retrieves the current query
    pub fn query(&self) -> &str {
        self.textarea.lines().first().map(String::as_str).unwrap_or_default()
    }

    /// Moves the bar into the active state, keeping the current query
    pub fn activate(&mut self) {
        if self.state != SearchState::Active {
            self.state = SearchState::Active;
            self.apply_state();
        }
    }

    /// Clears the query and moves the bar back into the idle state
    pub fn cancel(&mut self) {
        self.textarea.move_cursor(CursorMove::Jump(0, 0));
        self.textarea.delete_line_by_end();
        self.state = SearchState::Idle;
        self.apply_state();
    }

    /// Moves the cursor to the left, optionally by word
    pub fn move_cursor_left(&mut self, word: bool) {
        if self.is_active() {
            self.textarea
                .move_cursor(if word { CursorMove::WordBack } else { CursorMove::Back });
        }
    }

    /// Moves the cursor to the right, optionally by word
    pub fn move_cursor_right(&mut self, word: bool) {
        if self.is_active() {
            self.textarea.move_cursor(if word {
                CursorMove::WordForward
            } else {
                CursorMove::Forward
            });
        }
    }

    /// Moves the cursor to the start of the query
    pub fn move_home(&mut self) {
        if self.is_active() {
            self.textarea.move_cursor(CursorMove::Head);
        }
    }

    /// Moves the cursor to the end of the query
    pub fn move_end(&mut self) {
        if self.is_active() {
            self.textarea.move_cursor(CursorMove::End);
        }
    }

    /// Inserts a char at the current cursor position, activating the bar.
    ///
    /// Returns whether the query changed.
    pub fn insert_char(&mut self, c: char) -> bool {
        if c == '\n' || c == '\r' {
            return false;
        }
        self.activate();
        self.textarea.insert_char(c);
        true
    }

    /// Inserts a text at the current cursor position, activating the bar.
    ///
    /// Returns whether the query changed.
    pub fn insert_str(&mut self, text: impl AsRef<str>) -> bool {
        let text = remove_newlines(text);
        if text.is_empty() {
            return false;
        }
        self.activate();
        self.textarea.insert_str(text)
    }

    /// Delete characters at the cursor position based on the backspace and word flags.
    ///
    /// Returns whether the query changed.
    pub fn delete(&mut self, backspace: bool, word: bool) -> bool {
        if !self.is_active() {
            return false;
        }
        match (backspace, word) {
            (true, true) => self.textarea.delete_word(),
            (true, false) => self.textarea.delete_char(),
            (false, true) => self.textarea.delete_next_word(),
            (false, false) => self.textarea.delete_next_char(),
        }
    }

    fn apply_state(&mut self) {
        let (style, title) = match self.state {
            SearchState::Idle => (self.idle_style, " Search "),
            SearchState::Active => (self.active_style, " Search (esc to cancel) "),
        };
        self.textarea.set_style(style);
        self.textarea.set_cursor_style(if self.is_active() {
            self.cursor_style
        } else {
            DEFAULT_STYLE
        });
        self.textarea.set_block(
            Block::default()
                .borders(Borders::ALL)
                .style(style)
                .title(title)
                .title_top(Line::from(SCREEN_TITLE).right_aligned()),
        );
    }
}

impl<'a> Widget for &SearchBar<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.state {
            SearchState::Active => self.textarea.render(area, buf),
            // The textarea always reserves a cursor cell before its placeholder, the idle bar has no cursor
            SearchState::Idle => {
                let mut placeholder = Paragraph::new(PLACEHOLDER).style(self.idle_style);
                if let Some(block) = self.textarea.block() {
                    placeholder = placeholder.block(block.clone());
                }
                placeholder.render(area, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_new_bar_is_idle() {
        let bar = SearchBar::new(&Theme::default());
        assert_eq!(bar.state(), SearchState::Idle);
        assert_eq!(bar.query(), "");
    }

    #[test]
    fn test_typing_activates() {
        let mut bar = SearchBar::new(&Theme::default());
        assert!(bar.insert_char('N'));
        assert!(bar.insert_str("ot\nes"));
        assert!(bar.is_active());
        assert_eq!(bar.query(), "Not es");
    }

    #[test]
    fn test_cancel_clears_the_query() {
        let mut bar = SearchBar::new(&Theme::default()).with_query("Notes");
        assert!(bar.is_active());
        bar.move_cursor_left(false);

        bar.cancel();
        assert_eq!(bar.state(), SearchState::Idle);
        assert_eq!(bar.query(), "");
    }

    #[test]
    fn test_idle_bar_ignores_edits() {
        let mut bar = SearchBar::new(&Theme::default());
        assert!(!bar.delete(true, false));
        bar.move_cursor_right(true);
        assert_eq!(bar.state(), SearchState::Idle);
    }

    #[test]
    fn test_cursor_movement() {
        let mut bar = SearchBar::new(&Theme::default()).with_query("Star Notes");
        bar.move_home();
        assert!(bar.delete(false, false));
        assert_eq!(bar.query(), "tar Notes");
        bar.move_end();
        assert!(bar.delete(true, false));
        assert_eq!(bar.query(), "tar Note");
    }

    fn render(bar: &SearchBar) -> Vec<String> {
        let mut buf = Buffer::empty(Rect::new(0, 0, 60, 3));
        bar.render(buf.area, &mut buf);
        (0..buf.area.height)
            .map(|y| (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect())
            .collect()
    }

    #[test]
    fn test_render_idle_placeholder_without_cursor() {
        let rows = render(&SearchBar::new(&Theme::default()));
        assert!(rows[0].starts_with("┌ Search ─"));
        assert!(rows[0].ends_with("─ Grid Search By Json ┐"));
        assert_eq!(rows[1], format!("│Type to search{}│", " ".repeat(44)));
    }

    #[test]
    fn test_render_active_query() {
        let rows = render(&SearchBar::new(&Theme::default()).with_query("Piano"));
        assert!(rows[0].starts_with("┌ Search (esc to cancel) "));
        assert!(rows[0].ends_with(" Grid Search By Json ┐"));
        assert!(rows[1].starts_with("│Piano "));
    }
}
