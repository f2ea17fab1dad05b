use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::service::ArtworkState;

/// Symbol used to render two vertical pixels per cell, the top one as foreground and the bottom one as background
const HALF_BLOCK: &str = "▀";
/// Symbol filling the area of artwork that couldn't be loaded
const PLACEHOLDER: &str = "░";

/// Widget to render the artwork of an app, or its placeholder
pub struct ArtworkView<'a> {
    state: &'a ArtworkState,
    spinner: &'static str,
    placeholder_style: Style,
}

impl<'a> ArtworkView<'a> {
    /// Builds a new view for the given artwork state
    pub fn new(state: &'a ArtworkState, spinner: &'static str, placeholder_style: impl Into<Style>) -> Self {
        Self {
            state,
            spinner,
            placeholder_style: placeholder_style.into(),
        }
    }
}

impl Widget for ArtworkView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        match self.state {
            ArtworkState::Ready(image) => {
                let (width, height) = image.dimensions();
                for row in 0..area.height {
                    let top_y = u32::from(row) * 2;
                    if top_y >= height {
                        break;
                    }
                    for col in 0..area.width.min(width.try_into().unwrap_or(u16::MAX)) {
                        let x = u32::from(col);
                        let top = image.get_pixel(x, top_y);
                        let bottom = image.get_pixel(x, (top_y + 1).min(height - 1));
                        if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                            cell.set_symbol(HALF_BLOCK)
                                .set_fg(Color::Rgb(top[0], top[1], top[2]))
                                .set_bg(Color::Rgb(bottom[0], bottom[1], bottom[2]));
                        }
                    }
                }
            }
            ArtworkState::Loading => {
                let x = area.x + area.width.saturating_sub(1) / 2;
                let y = area.y + area.height.saturating_sub(1) / 2;
                buf.set_string(x, y, self.spinner, self.placeholder_style);
            }
            ArtworkState::Failed => {
                for y in area.top()..area.bottom() {
                    for x in area.left()..area.right() {
                        if let Some(cell) = buf.cell_mut((x, y)) {
                            cell.set_symbol(PLACEHOLDER).set_style(self.placeholder_style);
                        }
                    }
                }
            }
        }
    }
}
