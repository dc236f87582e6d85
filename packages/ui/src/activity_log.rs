//! In-app record of what the user's actions did: saves, deletes, sign-in
//! problems. Shown by [`crate::ActivityLogPanel`].

use std::collections::VecDeque;

use chrono::{DateTime, Local};
use dioxus::prelude::*;

/// Oldest entries are dropped past this many.
const MAX_ENTRIES: usize = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl LogLevel {
    /// CSS modifier class for entries of this level.
    pub fn class(self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Success => "success",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LogEntry {
    pub at: DateTime<Local>,
    pub level: LogLevel,
    pub message: String,
}

impl LogEntry {
    pub fn time_label(&self) -> String {
        self.at.format("%H:%M:%S").to_string()
    }
}

#[derive(Clone, Debug, Default)]
pub struct ActivityLog {
    entries: VecDeque<LogEntry>,
    pub visible: bool,
}

impl ActivityLog {
    /// Append an entry. Errors open the panel so failures are not missed.
    pub fn record(&mut self, level: LogLevel, message: impl Into<String>) {
        if level == LogLevel::Error {
            self.visible = true;
        }
        self.entries.push_back(LogEntry {
            at: Local::now(),
            level,
            message: message.into(),
        });
        if self.entries.len() > MAX_ENTRIES {
            self.entries.pop_front();
        }
    }

    /// Up to `limit` entries, newest first.
    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().rev().take(limit)
    }

    pub fn error_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.level == LogLevel::Error)
            .count()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }
}

pub fn use_activity_log() -> Signal<ActivityLog> {
    use_context::<Signal<ActivityLog>>()
}

pub fn log_activity(log: &mut Signal<ActivityLog>, level: LogLevel, message: &str) {
    log.write().record(level, message);
}
