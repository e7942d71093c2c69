//! Active tab, selected row and scroll position. Pure arithmetic, no I/O.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionState {
    active_host: usize,
    selected_row: usize,
    scroll_offset: usize,
    viewport: usize,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new(1)
    }
}

impl SelectionState {
    pub fn new(viewport: usize) -> Self {
        Self {
            active_host: 0,
            selected_row: 0,
            scroll_offset: 0,
            viewport: viewport.max(1),
        }
    }

    pub fn active_host(&self) -> usize {
        self.active_host
    }

    pub fn selected_row(&self) -> usize {
        self.selected_row
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Number of table rows the renderer can show at once.
    pub fn viewport(&self) -> usize {
        self.viewport
    }

    pub fn set_viewport(&mut self, rows: usize) {
        self.viewport = rows.max(1);
        self.keep_visible();
    }

    pub fn move_up(&mut self) {
        self.selected_row = self.selected_row.saturating_sub(1);
        self.keep_visible();
    }

    pub fn move_down(&mut self, size: usize) {
        self.selected_row = (self.selected_row + 1).min(last_row(size));
        self.keep_visible();
    }

    pub fn page_up(&mut self) {
        self.selected_row = self.selected_row.saturating_sub(self.viewport);
        self.scroll_offset = self.scroll_offset.saturating_sub(self.viewport);
        self.keep_visible();
    }

    pub fn page_down(&mut self, size: usize) {
        self.selected_row = (self.selected_row + self.viewport).min(last_row(size));
        let max_offset = size.saturating_sub(self.viewport);
        self.scroll_offset = (self.scroll_offset + self.viewport).min(max_offset);
        self.keep_visible();
    }

    pub fn home(&mut self) {
        self.selected_row = 0;
        self.scroll_offset = 0;
    }

    pub fn end(&mut self, size: usize) {
        self.selected_row = last_row(size);
        self.keep_visible();
    }

    /// Advance to the next tab, wrapping around. Row and scroll start over.
    pub fn next_tab(&mut self, hosts: usize) {
        if hosts == 0 {
            return;
        }
        self.active_host = (self.active_host + 1) % hosts;
        self.reset_rows();
    }

    pub fn prev_tab(&mut self, hosts: usize) {
        if hosts == 0 {
            return;
        }
        self.active_host = (self.active_host + hosts - 1) % hosts;
        self.reset_rows();
    }

    /// Bring every index back in range after the roster or the active snapshot changed.
    pub fn clamp(&mut self, hosts: usize, size: usize) {
        if self.active_host >= hosts.max(1) {
            self.active_host = 0;
            self.reset_rows();
        }
        self.selected_row = self.selected_row.min(last_row(size));
        self.keep_visible();
    }

    fn reset_rows(&mut self) {
        self.selected_row = 0;
        self.scroll_offset = 0;
    }

    // Keep scroll_offset <= selected_row < scroll_offset + viewport.
    fn keep_visible(&mut self) {
        if self.scroll_offset > self.selected_row {
            self.scroll_offset = self.selected_row;
        }
        if self.selected_row >= self.scroll_offset + self.viewport {
            self.scroll_offset = self.selected_row + 1 - self.viewport;
        }
    }
}

fn last_row(size: usize) -> usize {
    size.saturating_sub(1)
}
