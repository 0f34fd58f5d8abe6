use parking_lot::Mutex;
use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

pub const DEFAULT_MAX_LINES: usize = 5000;

/// One formatted event as the log panel draws it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: Option<Level>,
    pub text: String,
}

impl LogEntry {
    /// Reads the level column `tracing-subscriber`'s plain formatter writes
    /// after the timestamp. Continuation lines have none.
    pub fn parse(text: String) -> Self {
        let level = text
            .split_whitespace()
            .take(2)
            .filter(|token| token.chars().all(|c| c.is_ascii_alphabetic()))
            .find_map(|token| token.parse::<Level>().ok());
        Self { level, text }
    }
}

/// Warnings and errors seen since startup, including lines already evicted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelCounts {
    pub warn: u64,
    pub error: u64,
}

/// Bounded history behind the log panel.
pub struct LogStore {
    entries: VecDeque<LogEntry>,
    max_lines: usize,
    counts: LevelCounts,
}

impl LogStore {
    pub fn new(max_lines: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max_lines: max_lines.max(1),
            counts: LevelCounts::default(),
        }
    }

    pub fn push_line(&mut self, line: impl Into<String>) {
        let line = line.into();
        if line.trim().is_empty() {
            return;
        }
        let entry = LogEntry::parse(line);
        match entry.level {
            Some(Level::WARN) => self.counts.warn += 1,
            Some(Level::ERROR) => self.counts.error += 1,
            _ => {}
        }
        self.entries.push_back(entry);
        while self.entries.len() > self.max_lines {
            self.entries.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn counts(&self) -> LevelCounts {
        self.counts
    }

    /// Last `count` entries, oldest first.
    pub fn tail(&self, count: usize) -> Vec<LogEntry> {
        let skip = self.entries.len().saturating_sub(count);
        self.entries.iter().skip(skip).cloned().collect()
    }
}

pub type SharedLogStore = Arc<Mutex<LogStore>>;

/// Routes subscriber output into the [`LogStore`]; stdout belongs to the
/// alternate screen while the dashboard runs.
#[derive(Clone)]
pub struct LogMakeWriter {
    store: SharedLogStore,
}

impl LogMakeWriter {
    pub fn new(store: SharedLogStore) -> Self {
        Self { store }
    }
}

impl<'a> MakeWriter<'a> for LogMakeWriter {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriter {
            store: self.store.clone(),
            pending: Vec::new(),
        }
    }
}

/// Buffers bytes until a newline so multi-byte characters split across
/// writes decode intact.
pub struct LogWriter {
    store: SharedLogStore,
    pending: Vec<u8>,
}

impl LogWriter {
    fn commit(&self, raw: &[u8]) {
        let text = String::from_utf8_lossy(raw);
        self.store
            .lock()
            .push_line(text.trim_end_matches(['\r', '\n']).to_string());
    }
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        while let Some(idx) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=idx).collect();
            self.commit(&line);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for LogWriter {
    fn drop(&mut self) {
        if !self.pending.is_empty() {
            let rest = std::mem::take(&mut self.pending);
            self.commit(&rest);
        }
    }
}
