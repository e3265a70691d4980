//! Page/row cursor shared by every list pane
//!
//! The cursor tracks a 1-based page and a 0-based row within that page. All
//! operations are total: out-of-range moves are ignored or clamped so the
//! cursor always points at a valid row (or at `(1, 0)` for an empty list).

/// Position of one paginated list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    page: usize,
    row: usize,
    page_size: usize,
    total_count: usize,
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Cursor {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            row: 0,
            page_size: page_size.max(1),
            total_count: 0,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// Number of pages, never less than one
    pub fn max_page(&self) -> usize {
        self.total_count.div_ceil(self.page_size).max(1)
    }

    /// Absolute index of the highlighted item, if the list is non-empty
    pub fn index(&self) -> Option<usize> {
        if self.total_count == 0 {
            None
        } else {
            Some((self.page - 1) * self.page_size + self.row)
        }
    }

    /// Rows shown on the current page
    fn rows_on_page(&self) -> usize {
        let start = (self.page - 1) * self.page_size;
        self.total_count.saturating_sub(start).min(self.page_size)
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        let page_size = page_size.max(1);
        if page_size == self.page_size {
            return;
        }
        self.page_size = page_size;
        self.page = self.page.min(self.max_page());

        let rows = self.rows_on_page();
        if self.row >= rows {
            self.row = rows.saturating_sub(1);
        }
    }

    pub fn next_page(&mut self) {
        if self.page < self.max_page() {
            self.page += 1;
            self.row = 0;
        }
    }

    pub fn previous_page(&mut self) {
        if self.page > 1 {
            self.page -= 1;
            self.row = 0;
        }
    }

    pub fn first_page(&mut self) {
        self.page = 1;
        self.row = 0;
    }

    pub fn last_page(&mut self) {
        self.page = self.max_page();
        self.row = 0;
    }

    pub fn next_row(&mut self) {
        if self.row + 1 < self.rows_on_page() {
            self.row += 1;
        }
    }

    pub fn previous_row(&mut self) {
        self.row = self.row.saturating_sub(1);
    }

    /// Adopt a new backing length. The position survives when it still
    /// points at a real row, otherwise the cursor goes back to the top.
    pub fn reset(&mut self, total_count: usize) {
        self.total_count = total_count;
        if self.page > self.max_page() || (total_count > 0 && self.row >= self.rows_on_page()) {
            self.page = 1;
            self.row = 0;
        }
        if total_count == 0 {
            self.row = 0;
        }
    }

    /// Half-open slice range of the current page
    pub fn visible_range(&self) -> (usize, usize) {
        let start = ((self.page - 1) * self.page_size).min(self.total_count);
        let end = (start + self.page_size).min(self.total_count);
        (start, end)
    }
}
