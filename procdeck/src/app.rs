//! Terminal side of the refresh loop: raw mode and alternate screen, drawing, key decoding.

use std::{io, time::Duration};

use anyhow::Result;
use crossterm::{
    cursor::Show,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use procdeck_core::manager::{Display, DisplayModel, Key, Manager};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    Terminal,
};

use crate::ui;

pub struct CrosstermDisplay<B: Backend> {
    terminal: Terminal<B>,
}

impl<B: Backend> CrosstermDisplay<B> {
    pub fn new(terminal: Terminal<B>) -> Self {
        Self { terminal }
    }
}

impl<B: Backend> Display for CrosstermDisplay<B> {
    fn viewport_rows(&self) -> usize {
        match self.terminal.size() {
            Ok(sz) => ui::table_rows(Rect::new(0, 0, sz.width, sz.height)),
            Err(_) => 1,
        }
    }

    fn draw(&mut self, model: &DisplayModel<'_>) -> io::Result<()> {
        self.terminal.draw(|f| ui::draw(f, model))?;
        Ok(())
    }

    fn poll_key(&mut self, timeout: Duration) -> io::Result<Option<Key>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(k) if k.kind == KeyEventKind::Press => Ok(map_key(k)),
            // resize: the next iteration picks up the new viewport
            _ => Ok(None),
        }
    }
}

pub fn map_key(k: KeyEvent) -> Option<Key> {
    let key = match k.code {
        KeyCode::Char(c) if k.modifiers.contains(KeyModifiers::CONTROL) => Key::Ctrl(c),
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::F(n) => Key::F(n),
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::Tab => Key::Tab,
        KeyCode::BackTab => Key::BackTab,
        KeyCode::Esc => Key::Esc,
        KeyCode::Enter => Key::Enter,
        _ => return None,
    };
    Some(key)
}

/// Runs `restore` once when dropped.
struct RestoreOnDrop<F: FnOnce()> {
    restore: Option<F>,
}

impl<F: FnOnce()> RestoreOnDrop<F> {
    fn new(restore: F) -> Self {
        Self {
            restore: Some(restore),
        }
    }
}

impl<F: FnOnce()> Drop for RestoreOnDrop<F> {
    fn drop(&mut self) {
        if let Some(restore) = self.restore.take() {
            restore();
        }
    }
}

fn restore_terminal() {
    // nothing to report to once the screen is going away
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
}

/// Run the loop on the alternate screen. The terminal is restored on every
/// exit path, including a failed setup.
pub async fn run(manager: &mut Manager) -> Result<()> {
    enable_raw_mode()?;
    let _restore = RestoreOnDrop::new(restore_terminal);

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut display = CrosstermDisplay::new(Terminal::new(backend)?);
    display.terminal.clear()?;

    manager.run(&mut display).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use procdeck_core::manager::Action;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> Option<Key> {
        map_key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn control_c_quits() {
        let key = press(KeyCode::Char('c'), KeyModifiers::CONTROL).unwrap();
        assert_eq!(key, Key::Ctrl('c'));
        assert_eq!(Action::from_key(key), Some(Action::Quit));
        // plain 'c' is continue, not quit
        let key = press(KeyCode::Char('c'), KeyModifiers::NONE).unwrap();
        assert_ne!(Action::from_key(key), Some(Action::Quit));
    }

    #[test]
    fn function_and_navigation_keys() {
        assert_eq!(press(KeyCode::F(6), KeyModifiers::NONE), Some(Key::F(6)));
        assert_eq!(press(KeyCode::BackTab, KeyModifiers::SHIFT), Some(Key::BackTab));
        assert_eq!(press(KeyCode::PageDown, KeyModifiers::NONE), Some(Key::PageDown));
        assert_eq!(press(KeyCode::Insert, KeyModifiers::NONE), None);
    }

    #[test]
    fn restore_runs_once_on_early_return() {
        use std::cell::Cell;

        fn enter_screen() -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "no terminal"))
        }

        fn setup(restored: &Cell<u32>) -> io::Result<()> {
            let _restore = RestoreOnDrop::new(|| restored.set(restored.get() + 1));
            enter_screen()?;
            Ok(())
        }

        let restored = Cell::new(0);
        assert!(setup(&restored).is_err());
        assert_eq!(restored.get(), 1);

        {
            let _restore = RestoreOnDrop::new(|| restored.set(restored.get() + 1));
        }
        assert_eq!(restored.get(), 2);
    }

    #[test]
    fn test_backend_draws_a_frame() {
        use procdeck_core::{selection::SelectionState, Snapshot};
        use ratatui::backend::TestBackend;

        let mut display = CrosstermDisplay::new(Terminal::new(TestBackend::new(100, 30)).unwrap());
        // header 1 + tabs 3 + status 1, table borders 2 + column header 1
        assert_eq!(display.viewport_rows(), 30 - 5 - 3);

        let snapshot = Snapshot::empty();
        let selection = SelectionState::new(display.viewport_rows());
        let model = DisplayModel {
            tabs: Vec::new(),
            active: 0,
            snapshot: &snapshot,
            selection: &selection,
            message: None,
            show_help: true,
            cycles: 0,
        };
        display.draw(&model).unwrap();
        let screen: String = display
            .terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(screen.contains("procdeck"));
        assert!(screen.contains("force-kill"));
    }
}
