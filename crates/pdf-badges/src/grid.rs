//! Page grid calculation
//!
//! Badges are tiled left-to-right, top-to-bottom with a fixed gap between
//! neighbours; whatever space is left over is split evenly into the outer
//! margins.

use crate::options::BadgeOptions;

/// Position of a cell in the grid (row 0 is the top row)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridPosition {
    pub row: usize,
    pub col: usize,
}

impl GridPosition {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGrid {
    pub cols: usize,
    pub rows: usize,
    pub badge_width_mm: f32,
    pub badge_height_mm: f32,
    pub gap_mm: f32,
    /// Left and right outer margin
    pub margin_lr_mm: f32,
    /// Top and bottom outer margin
    pub margin_tb_mm: f32,
}

impl PageGrid {
    pub fn new(options: &BadgeOptions) -> Self {
        let gap = options.inner_margin_mm;
        let cols = (options.page_width_mm / (options.badge_width_mm + gap)).floor() as usize;
        let rows = (options.page_height_mm / (options.badge_height_mm + gap)).floor() as usize;

        let leftover = |page: f32, count: usize, badge: f32| {
            let count = count as f32;
            (page - count * badge - (count - 1.0).max(0.0) * gap) / 2.0
        };

        Self {
            cols,
            rows,
            badge_width_mm: options.badge_width_mm,
            badge_height_mm: options.badge_height_mm,
            gap_mm: gap,
            margin_lr_mm: leftover(options.page_width_mm, cols, options.badge_width_mm),
            margin_tb_mm: leftover(options.page_height_mm, rows, options.badge_height_mm),
        }
    }

    pub fn badges_per_page(&self) -> usize {
        self.rows * self.cols
    }

    /// Top-left corner of a cell, in mm from the page's top-left
    pub fn cell_origin_mm(&self, pos: GridPosition) -> (f32, f32) {
        (
            self.margin_lr_mm + pos.col as f32 * (self.badge_width_mm + self.gap_mm),
            self.margin_tb_mm + pos.row as f32 * (self.badge_height_mm + self.gap_mm),
        )
    }

    /// Pages needed for `badges` badges
    pub fn pages_for(&self, badges: usize) -> usize {
        badges.div_ceil(self.badges_per_page().max(1)).max(1)
    }
}

/// Walks the cells of a grid, reporting when a page fills up
#[derive(Debug, Clone)]
pub struct GridCursor {
    cols: usize,
    rows: usize,
    pos: GridPosition,
    placed_on_page: usize,
}

impl GridCursor {
    pub fn new(grid: &PageGrid) -> Self {
        Self {
            cols: grid.cols,
            rows: grid.rows,
            pos: GridPosition::default(),
            placed_on_page: 0,
        }
    }

    pub fn position(&self) -> GridPosition {
        self.pos
    }

    /// Badges placed since the last page was emitted
    pub fn placed_on_page(&self) -> usize {
        self.placed_on_page
    }

    /// Move past the current cell. Returns `true` when this filled the page;
    /// the cursor is then back at (0, 0) for a fresh page.
    pub fn advance(&mut self) -> bool {
        self.placed_on_page += 1;
        self.pos.col += 1;
        if self.pos.col == self.cols {
            self.pos.col = 0;
            self.pos.row += 1;
        }
        if self.pos.row == self.rows {
            self.pos = GridPosition::default();
            self.placed_on_page = 0;
            return true;
        }
        false
    }
}

// =============================================================================
// Tests
// =============================================================================
