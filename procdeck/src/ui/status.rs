//! Bottom line: the current transient message, or a key reminder when there is none.

use procdeck_core::{manager::DisplayModel, message::Severity};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::ui::theme::{INFO, MUTED, STALE};

const HINTS: &str =
    "F2/F3 host  arrows select  F5 pause  F6 terminate  F7 kill  F8 continue  F1 help  q quit";

pub fn draw_status(f: &mut ratatui::Frame<'_>, area: Rect, model: &DisplayModel<'_>) {
    let line = match model.message {
        Some(m) => {
            let color = match m.severity {
                Severity::Info => INFO,
                Severity::Error => STALE,
            };
            Line::from(Span::styled(m.text.as_str(), Style::default().fg(color)))
        }
        None => Line::from(Span::styled(HINTS, Style::default().fg(MUTED))),
    };
    f.render_widget(Paragraph::new(line), area);
}
