//! Toast-style user notices.
//!
//! Every failure in the system is a recoverable input-validation failure;
//! all of them surface here as non-fatal notices instead of propagating.

use serde::{Deserialize, Serialize};

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeLevel {
    Success,
    Error,
    Info,
}

/// A single user-visible notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Accumulates notices until the presentation layer drains them.
#[derive(Debug, Clone, Default)]
pub struct NoticeLog {
    pending: Vec<Notice>,
}

impl NoticeLog {
    /// Create an empty notice log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a success notice.
    pub fn success(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Success, message.into());
    }

    /// Push an error notice.
    pub fn error(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Error, message.into());
    }

    /// Push an informational notice.
    pub fn info(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Info, message.into());
    }

    fn push(&mut self, level: NoticeLevel, message: String) {
        match level {
            NoticeLevel::Error => log::warn!("notice: {}", message),
            _ => log::debug!("notice: {}", message),
        }
        self.pending.push(Notice { level, message });
    }

    /// Number of undrained notices.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Check whether there are undrained notices.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Take all pending notices, oldest first.
    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.pending)
    }
}
