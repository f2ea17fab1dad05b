use ratatui::{
    buffer::Buffer,
    layout::Rect,
    backend::FromCrossterm,
    style::{Color, Modifier, Style},
    widgets::Widget,
};

use super::ArtworkView;
use crate::{
    config::Theme,
    model::AppEntry,
    service::ArtworkState,
    utils::{highlighted_line, truncate_line_with_ellipsis},
};

/// Widget to render an [`AppEntry`] as a cell of the grid: the artwork and the name, release date and copyright below
pub struct AppCell<'a> {
    entry: &'a AppEntry,
    query: &'a str,
    artwork: Option<(&'a ArtworkState, u16)>,
    spinner: &'static str,
    background: Style,
    primary: Style,
    accent: Style,
    muted: Style,
}

impl<'a> AppCell<'a> {
    /// Builds a new cell for the given entry, highlighting the parts matching the query
    pub fn new(entry: &'a AppEntry, query: &'a str, theme: &Theme, is_highlighted: bool) -> Self {
        let (primary, accent, muted) = if is_highlighted {
            (
                theme.highlight_primary_full(),
                theme.highlight_accent_full(),
                theme.highlight_muted_full(),
            )
        } else {
            (theme.primary, theme.accent, theme.muted)
        };
        let mut background = Style::new();
        if is_highlighted && let Some(bg_color) = theme.highlight {
            background = background.bg(Color::from_crossterm(bg_color));
        }
        Self {
            entry,
            query,
            artwork: None,
            spinner: "",
            background,
            primary: Style::from_crossterm(primary),
            accent: Style::from_crossterm(accent),
            muted: Style::from_crossterm(muted),
        }
    }

    /// Displays the artwork on top of the texts, taking the given rows
    pub fn artwork(mut self, state: &'a ArtworkState, rows: u16, spinner: &'static str) -> Self {
        self.artwork = Some((state, rows));
        self.spinner = spinner;
        self
    }
}

impl Widget for AppCell<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, self.background);

        // Leave one column of padding on each side
        let inner = Rect {
            x: area.x.saturating_add(1),
            width: area.width.saturating_sub(2),
            ..area
        };
        if inner.is_empty() {
            return;
        }

        let mut y = inner.y;
        if let Some((state, rows)) = self.artwork {
            let artwork_area = Rect {
                y,
                width: inner.width.min(rows.saturating_mul(2)),
                height: rows.min(inner.height),
                ..inner
            };
            ArtworkView::new(state, self.spinner, self.muted).render(artwork_area, buf);
            y = y.saturating_add(rows);
        }

        let name_style = self.primary.add_modifier(Modifier::BOLD);
        let name_accent = self.accent.add_modifier(Modifier::BOLD);
        let lines = [
            highlighted_line(&self.entry.name, self.query, name_style, name_accent),
            highlighted_line(&self.entry.release_date, self.query, self.primary, self.accent),
            highlighted_line(&self.entry.copyright, self.query, self.muted, self.accent),
        ];
        for line in lines {
            if y >= inner.bottom() {
                break;
            }
            let line = truncate_line_with_ellipsis(line, inner.width);
            buf.set_line(inner.x, y, &line, inner.width);
            y += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use ratatui::style::Color;

    use super::*;

    fn entry() -> AppEntry {
        AppEntry {
            copyright: String::from("© 2021 Orbit LLC"),
            name: String::from("Star Notes"),
            artwork_url: String::from("https://img.example.com/star.png"),
            release_date: String::from("2021-01-03"),
        }
    }

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect()
    }

    #[test]
    fn test_render_texts() {
        let entry = entry();
        let mut buf = Buffer::empty(Rect::new(0, 0, 14, 4));
        AppCell::new(&entry, "", &Theme::default(), false).render(buf.area, &mut buf);

        assert_eq!(row(&buf, 0), " Star Notes   ");
        assert_eq!(row(&buf, 1), " 2021-01-03   ");
        assert_eq!(row(&buf, 2), " © 2021 Orbi… ");
        assert_eq!(row(&buf, 3), "              ");
        assert!(buf[(1, 0)].modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_render_matches_with_accent() {
        let entry = entry();
        let theme = Theme::default();
        let mut buf = Buffer::empty(Rect::new(0, 0, 14, 4));
        AppCell::new(&entry, "Notes", &theme, false).render(buf.area, &mut buf);

        assert_eq!(buf[(1, 0)].fg, Color::Reset);
        // Crossterm's yellow is the bright one
        assert_eq!(buf[(6, 0)].fg, Color::LightYellow);
    }

    #[test]
    fn test_render_highlighted_background() {
        let entry = entry();
        let mut buf = Buffer::empty(Rect::new(0, 0, 14, 4));
        AppCell::new(&entry, "", &Theme::default(), true).render(buf.area, &mut buf);

        assert_eq!(buf[(0, 0)].bg, Color::DarkGray);
        assert_eq!(buf[(13, 3)].bg, Color::DarkGray);
    }

    #[test]
    fn test_render_artwork_above_texts() {
        let entry = entry();
        let mut buf = Buffer::empty(Rect::new(0, 0, 14, 6));
        AppCell::new(&entry, "", &Theme::default(), false)
            .artwork(&ArtworkState::Failed, 2, "⠋")
            .render(buf.area, &mut buf);

        assert_eq!(row(&buf, 0), " ░░░░         ");
        assert_eq!(row(&buf, 1), " ░░░░         ");
        assert_eq!(row(&buf, 2), " Star Notes   ");
        assert_eq!(row(&buf, 5), "              ");
    }

    #[test]
    fn test_render_artwork_taller_than_the_cell() {
        let entry = entry();
        let mut buf = Buffer::empty(Rect::new(0, 3, 14, 4));
        AppCell::new(&entry, "", &Theme::default(), false)
            .artwork(&ArtworkState::Failed, u16::MAX, "⠋")
            .render(buf.area, &mut buf);

        // Only the artwork fits, the texts are left out
        assert_eq!(row(&buf, 3), " ░░░░░░░░░░░░ ");
        assert_eq!(row(&buf, 6), " ░░░░░░░░░░░░ ");
    }
}
