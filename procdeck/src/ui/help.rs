//! Key binding overlay, toggled with F1.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::ui::theme::ACCENT;
use crate::ui::util::centered;

const BINDINGS: &[(&str, &str)] = &[
    ("F1  h ?", "toggle this help"),
    ("F2  Tab  Right", "next host"),
    ("F3  S-Tab  Left", "previous host"),
    ("Up Down", "move selection"),
    ("PgUp PgDn", "move one page"),
    ("Home End", "first / last process"),
    ("F4  /", "search"),
    ("F5  p", "pause (SIGSTOP)"),
    ("F6  t", "terminate (SIGTERM)"),
    ("F7  k", "force-kill (SIGKILL)"),
    ("F8  c", "continue (SIGCONT)"),
    ("Esc", "close help, or quit"),
    ("q  Ctrl-C", "quit"),
];

pub fn draw_help(f: &mut ratatui::Frame<'_>, area: Rect) {
    let key_style = Style::default().fg(ACCENT).add_modifier(Modifier::BOLD);
    let lines: Vec<Line> = BINDINGS
        .iter()
        .map(|(keys, what)| {
            Line::from(vec![
                Span::styled(format!("{keys:<18}"), key_style),
                Span::raw(*what),
            ])
        })
        .collect();

    let popup = centered(area, 48, BINDINGS.len() as u16 + 2);
    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Keys")),
        popup,
    );
}
