//! UI module root: screen layout and the per-panel drawing functions.

pub mod header;
pub mod help;
pub mod processes;
pub mod status;
pub mod tabs;
pub mod theme;
pub mod util;

use std::rc::Rc;

use procdeck_core::manager::DisplayModel;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

fn split(area: Rect) -> Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Length(3), // host tabs
            Constraint::Min(4),    // process table
            Constraint::Length(1), // status line
        ])
        .split(area)
}

/// Process rows that fit on a screen of this size.
pub fn table_rows(area: Rect) -> usize {
    processes::viewport_rows(split(area)[2])
}

pub fn draw(f: &mut ratatui::Frame<'_>, model: &DisplayModel<'_>) {
    let area = f.area();
    let rows = split(area);

    header::draw_header(f, rows[0], model);
    tabs::draw_tabs(f, rows[1], model);
    processes::draw_processes(f, rows[2], model);
    status::draw_status(f, rows[3], model);

    if model.show_help {
        help::draw_help(f, area);
    }
}
