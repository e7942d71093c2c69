//! Top header: program name, active host, host count, refresh cycle and clock.

use chrono::Local;
use procdeck_core::manager::DisplayModel;
use ratatui::{
    layout::Rect,
    widgets::{Block, Borders},
};

pub fn draw_header(f: &mut ratatui::Frame<'_>, area: Rect, model: &DisplayModel<'_>) {
    let clock = Local::now().format("%H:%M:%S");
    let title = match model.tabs.get(model.active) {
        Some(tab) => format!(
            "procdeck | {} ({} of {}) | cycle {} | {clock}  (F1 help, q quit)",
            tab.name,
            model.active + 1,
            model.tabs.len(),
            model.cycles
        ),
        None => format!("procdeck | no hosts | {clock}  (q quit)"),
    };
    f.render_widget(Block::default().title(title).borders(Borders::BOTTOM), area);
}
