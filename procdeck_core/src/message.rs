//! Short status messages shown under the process table.

use std::time::{Duration, Instant};

pub const MESSAGE_DISPLAY_DURATION: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct TransientMessage {
    pub text: String,
    pub severity: Severity,
    pub created: Instant,
}

impl TransientMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self::new(text, Severity::Info)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(text, Severity::Error)
    }

    fn new(text: impl Into<String>, severity: Severity) -> Self {
        Self {
            text: text.into(),
            severity,
            created: Instant::now(),
        }
    }

    pub fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.created) >= ttl
    }
}
