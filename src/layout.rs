//! Screen geometry shared by the reducer (scroll targets) and the UI

use ratatui::layout::{Constraint, Layout, Rect};

pub const CARD_WIDTH: u16 = 26;
pub const DETAIL_WIDTH: u16 = 38;
/// Below this width the detail panel is dropped
pub const DETAIL_MIN_TERMINAL_WIDTH: u16 = 90;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageAreas {
    pub header: Rect,
    pub grid: Rect,
    pub detail: Option<Rect>,
    pub status: Rect,
}

pub fn page_layout(area: Rect) -> PageAreas {
    let rows = Layout::vertical([
        Constraint::Length(1), // Header
        Constraint::Min(1),    // Cards (+ detail)
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    let (grid, detail) = if area.width >= DETAIL_MIN_TERMINAL_WIDTH {
        let columns =
            Layout::horizontal([Constraint::Min(CARD_WIDTH), Constraint::Length(DETAIL_WIDTH)])
                .split(rows[1]);
        (columns[0], Some(columns[1]))
    } else {
        (rows[1], None)
    };

    PageAreas {
        header: rows[0],
        grid,
        detail,
        status: rows[2],
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridMetrics {
    pub columns: u16,
    pub visible_rows: u16,
}

impl GridMetrics {
    pub fn for_area(grid: Rect, card_height: u16) -> Self {
        Self {
            columns: (grid.width / CARD_WIDTH).max(1),
            visible_rows: (grid.height / card_height.max(1)).max(1),
        }
    }

    pub fn for_terminal(size: (u16, u16), card_height: u16) -> Self {
        let (width, height) = size;
        let areas = page_layout(Rect::new(0, 0, width, height));
        Self::for_area(areas.grid, card_height)
    }

    pub fn row_of(&self, index: usize) -> u16 {
        clamp_u16(index / self.columns as usize)
    }

    pub fn total_rows(&self, cards: usize) -> u16 {
        clamp_u16(cards.div_ceil(self.columns as usize))
    }

    pub fn max_top(&self, cards: usize) -> u16 {
        self.total_rows(cards).saturating_sub(self.visible_rows)
    }

    /// Top row that puts `index` in the vertical middle of the grid
    pub fn centered_top(&self, index: usize, cards: usize) -> u16 {
        let above = self.visible_rows.saturating_sub(1) / 2;
        self.row_of(index)
            .saturating_sub(above)
            .min(self.max_top(cards))
    }

    /// Smallest scroll change that keeps `index` on screen
    pub fn top_showing(&self, top: u16, index: usize, cards: usize) -> u16 {
        let row = self.row_of(index);
        let top = if row < top {
            row
        } else if row >= top + self.visible_rows {
            row + 1 - self.visible_rows
        } else {
            top
        };
        top.min(self.max_top(cards))
    }
}

fn clamp_u16(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}
