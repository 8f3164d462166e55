//! Progress and failure reporting.

use std::cell::RefCell;

use tracing::{error, info};

/// Receiver of human-readable progress lines.
pub trait LogSink {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}

/// Sink forwarding to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn info(&self, message: &str) {
        info!("{}", message);
    }

    fn error(&self, message: &str) {
        error!("{}", message);
    }
}

/// Severity of a recorded line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Error,
}

/// Sink keeping every line in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: RefCell<Vec<(Level, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(Level, String)> {
        self.entries.borrow().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.lines(Level::Error)
    }

    pub fn infos(&self) -> Vec<String> {
        self.lines(Level::Info)
    }

    fn lines(&self, level: Level) -> Vec<String> {
        self.entries
            .borrow()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, line)| line.clone())
            .collect()
    }
}

impl LogSink for MemorySink {
    fn info(&self, message: &str) {
        self.entries
            .borrow_mut()
            .push((Level::Info, message.to_string()));
    }

    fn error(&self, message: &str) {
        self.entries
            .borrow_mut()
            .push((Level::Error, message.to_string()));
    }
}
