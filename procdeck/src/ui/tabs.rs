//! One tab per host. Hosts whose last refresh failed carry a red marker.

use procdeck_core::manager::DisplayModel;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Tabs},
};

use crate::ui::theme::{ACCENT, MUTED, STALE};

pub fn draw_tabs(f: &mut ratatui::Frame<'_>, area: Rect, model: &DisplayModel<'_>) {
    let titles: Vec<Line> = model
        .tabs
        .iter()
        .map(|t| {
            let mut spans = vec![Span::raw(t.name)];
            if t.local {
                spans.push(Span::styled(" (local)", Style::default().fg(MUTED)));
            }
            if t.error.is_some() {
                spans.push(Span::styled(" !", Style::default().fg(STALE)));
            }
            Line::from(spans)
        })
        .collect();

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title("Hosts"))
        .select(model.active)
        .highlight_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
        .divider("|");
    f.render_widget(tabs, area);
}
