//! Refresh loop: timed re-acquisition, drawing, and key dispatch.

use std::{
    io,
    time::{Duration, Instant},
};

use chrono::{DateTime, Local};
use tracing::debug;

use crate::action::{dispatch, ControlAction};
use crate::error::{AcquisitionError, ManagerError};
use crate::message::{TransientMessage, MESSAGE_DISPLAY_DURATION};
use crate::roster::HostRoster;
use crate::selection::SelectionState;
use crate::types::Snapshot;

pub const REFRESH_INTERVAL: Duration = Duration::from_secs(2);
pub const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(100);

static EMPTY_SNAPSHOT: Snapshot = Snapshot::empty();

/// Key codes handed back by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Ctrl(char),
    F(u8),
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    Home,
    End,
    Tab,
    BackTab,
    Esc,
    Enter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    // Esc: leave the help overlay, or quit when none is open
    Back,
    Help,
    Search,
    NextTab,
    PrevTab,
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
    Control(ControlAction),
}

impl Action {
    pub fn from_key(key: Key) -> Option<Action> {
        let action = match key {
            Key::Char('q' | 'Q') | Key::Ctrl('c') => Action::Quit,
            Key::Esc => Action::Back,
            Key::F(1) | Key::Char('h' | '?') => Action::Help,
            Key::F(2) | Key::Tab | Key::Right => Action::NextTab,
            Key::F(3) | Key::BackTab | Key::Left => Action::PrevTab,
            Key::F(4) | Key::Char('/') => Action::Search,
            Key::F(5) | Key::Char('p') => Action::Control(ControlAction::Pause),
            Key::F(6) | Key::Char('t') => Action::Control(ControlAction::Terminate),
            Key::F(7) | Key::Char('k') => Action::Control(ControlAction::ForceKill),
            Key::F(8) | Key::Char('c') => Action::Control(ControlAction::Continue),
            Key::Up => Action::Up,
            Key::Down => Action::Down,
            Key::PageUp => Action::PageUp,
            Key::PageDown => Action::PageDown,
            Key::Home => Action::Home,
            Key::End => Action::End,
            _ => return None,
        };
        Some(action)
    }
}

/// One tab as the renderer sees it.
#[derive(Debug, Clone)]
pub struct TabInfo<'a> {
    pub name: &'a str,
    pub local: bool,
    pub processes: usize,
    pub refreshed_at: Option<DateTime<Local>>,
    pub error: Option<&'a str>,
}

/// Everything the renderer needs for one frame.
pub struct DisplayModel<'a> {
    pub tabs: Vec<TabInfo<'a>>,
    pub active: usize,
    pub snapshot: &'a Snapshot,
    pub selection: &'a SelectionState,
    pub message: Option<&'a TransientMessage>,
    pub show_help: bool,
    pub cycles: u64,
}

/// The terminal side: draws a model, reports its table height, returns key codes.
pub trait Display {
    /// Rows available for process lines (excluding table header and borders).
    fn viewport_rows(&self) -> usize;

    fn draw(&mut self, model: &DisplayModel<'_>) -> io::Result<()>;

    /// Wait up to `timeout` for one key press.
    fn poll_key(&mut self, timeout: Duration) -> io::Result<Option<Key>>;
}

pub struct Manager {
    roster: HostRoster,
    selection: SelectionState,
    message: Option<TransientMessage>,
    show_help: bool,
    running: bool,
    cycles: u64,
    last_refresh: Option<Instant>,
    refresh_interval: Duration,
    poll_timeout: Duration,
    message_ttl: Duration,
}

impl Manager {
    pub fn new(roster: HostRoster) -> Self {
        Self {
            roster,
            selection: SelectionState::default(),
            message: None,
            show_help: false,
            running: true,
            cycles: 0,
            last_refresh: None,
            refresh_interval: REFRESH_INTERVAL,
            poll_timeout: INPUT_POLL_TIMEOUT,
            message_ttl: MESSAGE_DISPLAY_DURATION,
        }
    }

    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    pub fn with_message_ttl(mut self, ttl: Duration) -> Self {
        self.message_ttl = ttl;
        self
    }

    pub fn roster(&self) -> &HostRoster {
        &self.roster
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn message(&self) -> Option<&TransientMessage> {
        self.message.as_ref()
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn into_roster(self) -> HostRoster {
        self.roster
    }

    fn active_len(&self) -> usize {
        self.roster
            .get(self.selection.active_host())
            .map(|h| h.snapshot().len())
            .unwrap_or(0)
    }

    /// Run until quit or a fatal local acquisition failure, then disconnect every session.
    pub async fn run<D: Display>(&mut self, display: &mut D) -> Result<(), ManagerError> {
        let res = self.event_loop(display).await;
        self.roster.disconnect_all();
        res
    }

    async fn event_loop<D: Display>(&mut self, display: &mut D) -> Result<(), ManagerError> {
        while self.running {
            self.refresh_if_due(Instant::now())?;

            self.selection.set_viewport(display.viewport_rows());
            self.selection.clamp(self.roster.len(), self.active_len());
            self.expire_message(Instant::now());
            display.draw(&self.model())?;

            if let Some(key) = display.poll_key(self.poll_timeout)? {
                self.handle_key(key);
            }
            tokio::task::yield_now().await;
        }
        Ok(())
    }

    /// Refresh every host if the interval elapsed (or nothing was acquired yet).
    /// Returns whether a pass ran.
    pub fn refresh_if_due(&mut self, now: Instant) -> Result<bool, AcquisitionError> {
        let due = self
            .last_refresh
            .is_none_or(|t| now.saturating_duration_since(t) >= self.refresh_interval);
        if due {
            self.refresh()?;
        }
        Ok(due)
    }

    pub fn refresh(&mut self) -> Result<(), AcquisitionError> {
        let report = self.roster.refresh_all()?;
        self.cycles += 1;
        self.last_refresh = Some(Instant::now());
        debug!(
            "cycle {}: {} hosts refreshed, {} failed",
            self.cycles,
            report.refreshed,
            report.failed.len()
        );
        if !report.is_clean() {
            let detail = report
                .failed
                .iter()
                .map(|(host, e)| format!("{host}: {e}"))
                .collect::<Vec<_>>()
                .join("; ");
            self.message = Some(TransientMessage::error(format!("refresh failed ({detail})")));
        }
        self.selection.clamp(self.roster.len(), self.active_len());
        Ok(())
    }

    pub fn handle_key(&mut self, key: Key) {
        match Action::from_key(key) {
            Some(action) => self.apply(action),
            None => debug!("unbound key {key:?}"),
        }
    }

    pub fn apply(&mut self, action: Action) {
        let size = self.active_len();
        let hosts = self.roster.len();
        match action {
            Action::Quit => self.running = false,
            Action::Back => {
                if self.show_help {
                    self.show_help = false;
                } else {
                    self.running = false;
                }
            }
            Action::Help => self.show_help = !self.show_help,
            Action::Search => {
                self.message = Some(TransientMessage::info("search is not implemented yet"));
            }
            Action::NextTab => {
                self.selection.next_tab(hosts);
                self.selection.clamp(hosts, self.active_len());
            }
            Action::PrevTab => {
                self.selection.prev_tab(hosts);
                self.selection.clamp(hosts, self.active_len());
            }
            Action::Up => self.selection.move_up(),
            Action::Down => self.selection.move_down(size),
            Action::PageUp => self.selection.page_up(),
            Action::PageDown => self.selection.page_down(size),
            Action::Home => self.selection.home(),
            Action::End => self.selection.end(size),
            Action::Control(control) => {
                let result = dispatch(control, &mut self.roster, &self.selection);
                self.message = Some(if result.ok {
                    TransientMessage::info(result.message)
                } else {
                    TransientMessage::error(result.message)
                });
            }
        }
    }

    fn expire_message(&mut self, now: Instant) {
        if self
            .message
            .as_ref()
            .is_some_and(|m| m.is_expired(now, self.message_ttl))
        {
            self.message = None;
        }
    }

    pub fn model(&self) -> DisplayModel<'_> {
        let tabs = self
            .roster
            .iter()
            .map(|h| TabInfo {
                name: h.name(),
                local: h.is_local(),
                processes: h.snapshot().len(),
                refreshed_at: h.refreshed_at(),
                error: h.last_error(),
            })
            .collect();
        let snapshot = self
            .roster
            .get(self.selection.active_host())
            .map(|h| h.snapshot())
            .unwrap_or(&EMPTY_SNAPSHOT);
        DisplayModel {
            tabs,
            active: self.selection.active_host(),
            snapshot,
            selection: &self.selection,
            message: self.message.as_ref(),
            show_help: self.show_help,
            cycles: self.cycles,
        }
    }
}
