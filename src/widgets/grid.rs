use ratatui::layout::Rect;

/// Number of columns of the grid
pub const GRID_COLUMNS: usize = 3;

/// Number of text lines displayed below the artwork of each cell: name, release date and copyright
const TEXT_LINES: u16 = 3;

/// Geometry of the grid of apps.
///
/// Cells are laid out in row-major order, with [GRID_COLUMNS] columns splitting the width evenly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    artwork_rows: u16,
}

impl GridLayout {
    /// Builds a new layout, `artwork_rows` should be zero when artwork is not displayed
    pub fn new(artwork_rows: u16) -> Self {
        Self { artwork_rows }
    }

    /// Rows taken by the artwork of each cell
    pub fn artwork_rows(&self) -> u16 {
        self.artwork_rows
    }

    /// Total height of a cell, including a trailing empty row as spacing
    pub fn cell_height(&self) -> u16 {
        self.artwork_rows.saturating_add(TEXT_LINES + 1)
    }

    /// Number of grid rows fully (or partially, if there's not enough room for one) visible on the given height
    pub fn visible_rows(&self, height: u16) -> usize {
        usize::from(height / self.cell_height()).max(1)
    }

    /// Number of grid rows needed for the given amount of items
    pub fn total_rows(items: usize) -> usize {
        items.div_ceil(GRID_COLUMNS)
    }

    /// Computes the area of every visible cell, starting at the `scroll_row`.
    ///
    /// Returns the index of the item along with its area, the last cell might be clipped to the given area.
    pub fn cell_areas(&self, area: Rect, items: usize, scroll_row: usize) -> Vec<(usize, Rect)> {
        let mut cells = Vec::new();
        if area.is_empty() {
            return cells;
        }
        let cell_height = self.cell_height();
        let visible_rows = self.visible_rows(area.height);
        for row in 0..visible_rows {
            let y = area.y.saturating_add((row as u16).saturating_mul(cell_height));
            let height = cell_height.min(area.bottom().saturating_sub(y));
            if height == 0 {
                break;
            }
            for col in 0..GRID_COLUMNS {
                let index = (scroll_row + row) * GRID_COLUMNS + col;
                if index >= items {
                    return cells;
                }
                let (x, width) = column_bounds(area, col);
                cells.push((index, Rect::new(x, y, width, height)));
            }
        }
        cells
    }
}

/// Returns the x coordinate and width of the given column, the remainder of the width goes to the last columns
fn column_bounds(area: Rect, col: usize) -> (u16, u16) {
    let columns = GRID_COLUMNS as u16;
    let col = col as u16;
    let base = area.width / columns;
    let extra = area.width % columns;
    // The last `extra` columns get one more cell each
    let widen_from = columns - extra;
    let offset = col * base + col.saturating_sub(widen_from);
    let width = base + u16::from(col >= widen_from);
    (area.x + offset, width)
}

/// Computes the first row to display so the selected item is visible, moving the view as little as possible
pub fn scroll_to_selection(selected: usize, scroll_row: usize, visible_rows: usize) -> usize {
    let selected_row = selected / GRID_COLUMNS;
    if selected_row < scroll_row {
        selected_row
    } else if selected_row >= scroll_row + visible_rows {
        selected_row + 1 - visible_rows.max(1)
    } else {
        scroll_row
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_cell_height() {
        assert_eq!(GridLayout::new(5).cell_height(), 9);
        assert_eq!(GridLayout::new(0).cell_height(), 4);
        assert_eq!(GridLayout::new(u16::MAX).cell_height(), u16::MAX);
    }

    #[test]
    fn test_total_rows() {
        assert_eq!(GridLayout::total_rows(0), 0);
        assert_eq!(GridLayout::total_rows(3), 1);
        assert_eq!(GridLayout::total_rows(4), 2);
    }

    #[test]
    fn test_visible_rows() {
        let layout = GridLayout::new(0);
        assert_eq!(layout.visible_rows(2), 1);
        assert_eq!(layout.visible_rows(8), 2);
        assert_eq!(layout.visible_rows(11), 2);
    }

    #[test]
    fn test_column_bounds_cover_the_width() {
        let area = Rect::new(1, 0, 32, 10);
        let bounds = (0..GRID_COLUMNS).map(|c| column_bounds(area, c)).collect::<Vec<_>>();
        assert_eq!(bounds, vec![(1, 10), (11, 11), (22, 11)]);
    }

    #[test]
    fn test_cell_areas_are_row_major() {
        let layout = GridLayout::new(0);
        let area = Rect::new(0, 2, 30, 8);
        let cells = layout.cell_areas(area, 5, 0);
        assert_eq!(cells, vec![
            (0, Rect::new(0, 2, 10, 4)),
            (1, Rect::new(10, 2, 10, 4)),
            (2, Rect::new(20, 2, 10, 4)),
            (3, Rect::new(0, 6, 10, 4)),
            (4, Rect::new(10, 6, 10, 4)),
        ]);
    }

    #[test]
    fn test_cell_areas_start_at_the_scroll_row() {
        let layout = GridLayout::new(0);
        let area = Rect::new(0, 0, 30, 4);
        let indexes = layout
            .cell_areas(area, 9, 2)
            .into_iter()
            .map(|(i, _)| i)
            .collect::<Vec<_>>();
        assert_eq!(indexes, vec![6, 7, 8]);
    }

    #[test]
    fn test_scroll_to_selection() {
        // Already visible
        assert_eq!(scroll_to_selection(4, 0, 2), 0);
        // Above the view
        assert_eq!(scroll_to_selection(1, 2, 2), 0);
        // Below the view
        assert_eq!(scroll_to_selection(9, 0, 2), 2);
        assert_eq!(scroll_to_selection(9, 0, 1), 3);
    }
}
