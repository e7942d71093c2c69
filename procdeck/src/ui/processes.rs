//! Process table of the active host: colored cells, highlighted selection, scrollbar.

use procdeck_core::{manager::DisplayModel, ProcessEntry};
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};

use crate::ui::theme::{ACCENT, MUTED, SB_ARROW, SB_THUMB, SB_TRACK, SELECTED_BG, STALE};
use crate::ui::util::{fmt_elapsed, human_kb};

const COLS: [Constraint; 9] = [
    Constraint::Length(7),  // PID
    Constraint::Length(10), // USER
    Constraint::Length(1),  // S
    Constraint::Length(6),  // CPU
    Constraint::Length(5),  // MEM%
    Constraint::Length(7),  // VSZ
    Constraint::Length(7),  // RSS
    Constraint::Length(11), // ELAPSED
    Constraint::Min(8),     // COMMAND
];

// borders (2) + column header (1)
const CHROME_ROWS: u16 = 3;

/// Rows of processes visible inside a table drawn in `area`.
pub fn viewport_rows(area: Rect) -> usize {
    area.height.saturating_sub(CHROME_ROWS).max(1) as usize
}

fn title(model: &DisplayModel<'_>) -> Line<'static> {
    let Some(tab) = model.tabs.get(model.active) else {
        return Line::from("Processes");
    };
    let when = tab
        .refreshed_at
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "never".into());
    let mut spans = vec![Span::raw(format!(
        "{}: {} processes, updated {when}",
        tab.name, tab.processes
    ))];
    if let Some(err) = tab.error {
        spans.push(Span::styled(
            format!("  [stale: {err}]"),
            Style::default().fg(STALE),
        ));
    }
    Line::from(spans)
}

fn row<'a>(p: &'a ProcessEntry, selected: bool) -> Row<'a> {
    let cpu_fg = match p.cpu_load {
        x if x < 25.0 => Color::Green,
        x if x < 60.0 => Color::Yellow,
        _ => Color::Red,
    };
    let state_fg = match p.state {
        'R' => Color::Green,
        'T' | 't' => Color::Yellow,
        'Z' | 'X' => Color::Red,
        _ => MUTED,
    };
    let mem = p
        .mem_percent
        .map(|m| format!("{m:.1}"))
        .unwrap_or_else(|| "-".into());

    let r = Row::new(vec![
        Cell::from(p.pid.to_string()).style(Style::default().fg(MUTED)),
        Cell::from(p.user.as_str()),
        Cell::from(p.state.to_string()).style(Style::default().fg(state_fg)),
        Cell::from(format!("{:>6.1}", p.cpu_load)).style(Style::default().fg(cpu_fg)),
        Cell::from(mem),
        Cell::from(human_kb(p.vsize_kb)),
        Cell::from(human_kb(p.rss_kb)),
        Cell::from(fmt_elapsed(p.elapsed_secs)),
        Cell::from(p.command.as_str()),
    ]);
    if selected {
        r.style(Style::default().bg(SELECTED_BG).add_modifier(Modifier::BOLD))
    } else {
        r
    }
}

pub fn draw_processes(f: &mut ratatui::Frame<'_>, area: Rect, model: &DisplayModel<'_>) {
    let block = Block::default().borders(Borders::ALL).title(title(model));
    f.render_widget(block, area);

    // Inner area and content area (reserve 2 columns for scrollbar)
    let inner = Rect {
        x: area.x + 1,
        y: area.y + 1,
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    };
    if inner.height < 1 || inner.width < 3 {
        return;
    }
    let content = Rect {
        x: inner.x,
        y: inner.y,
        width: inner.width.saturating_sub(2),
        height: inner.height,
    };

    let entries = model.snapshot.entries();
    let total_rows = entries.len();
    let view = viewport_rows(area);
    let offset = model.selection.scroll_offset().min(total_rows);
    let selected = model.selection.selected_row();

    let rows = entries
        .iter()
        .enumerate()
        .skip(offset)
        .take(view)
        .map(|(i, p)| row(p, i == selected));

    let header = Row::new(vec![
        "PID", "USER", "S", "CPU", "MEM%", "VSZ", "RSS", "ELAPSED", "COMMAND",
    ])
    .style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD));

    let table = Table::new(rows, COLS.to_vec())
        .header(header)
        .column_spacing(1);
    f.render_widget(table, content);

    // Scrollbar in the rightmost inner column
    let scroll_area = Rect {
        x: inner.x + inner.width.saturating_sub(1),
        y: inner.y,
        width: 1,
        height: inner.height,
    };
    if scroll_area.height >= 3 {
        let track = (scroll_area.height - 2) as usize;
        let (thumb_top, thumb_len) = thumb(track, total_rows, view, offset);

        let mut lines: Vec<Line> = Vec::with_capacity(scroll_area.height as usize);
        lines.push(Line::from(Span::styled("▲", Style::default().fg(SB_ARROW))));
        for i in 0..track {
            if i >= thumb_top && i < thumb_top + thumb_len {
                lines.push(Line::from(Span::styled("█", Style::default().fg(SB_THUMB))));
            } else {
                lines.push(Line::from(Span::styled("│", Style::default().fg(SB_TRACK))));
            }
        }
        lines.push(Line::from(Span::styled("▼", Style::default().fg(SB_ARROW))));
        f.render_widget(Paragraph::new(lines), scroll_area);
    }
}

/// Thumb position and length on a `track`-cell scrollbar.
fn thumb(track: usize, total: usize, view: usize, offset: usize) -> (usize, usize) {
    let total = total.max(1);
    let view = view.clamp(1, total);
    let max_off = total.saturating_sub(view);
    let len = (track * view).div_ceil(total).max(1).min(track);
    let top = if max_off == 0 {
        0
    } else {
        ((track - len) * offset.min(max_off) + max_off / 2) / max_off
    };
    (top, len)
}
