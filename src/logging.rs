//! JSONL request journal.
//!
//! One line per handled exchange or notable event, kept both on disk and in a
//! bounded in-memory ring. Console logging goes through `tracing`; the journal
//! is the durable, machine-readable record.

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

const MAX_JOURNAL_ENTRIES: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub timestamp: DateTime<Utc>,
    pub level: Level,
    pub component: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,
}

impl JournalEntry {
    pub fn new(level: Level, component: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            component: component.into(),
            message: message.into(),
            context: None,
        }
    }

    pub fn with_context(mut self, ctx: serde_json::Value) -> Self {
        self.context = Some(ctx);
        self
    }
}

/// Summary of one `/v1/messages` round trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exchange {
    pub message_id: Option<String>,
    pub requested_model: String,
    pub backend_model: String,
    pub status: u16,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

struct Journal {
    entries: VecDeque<JournalEntry>,
    file_path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl Journal {
    fn open(file_path: &Path) -> std::io::Result<Self> {
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut entries = VecDeque::with_capacity(MAX_JOURNAL_ENTRIES);
        let mut lines_on_disk = 0usize;

        if file_path.exists() {
            let reader = BufReader::new(File::open(file_path)?);
            for line in reader.lines().map_while(std::result::Result::ok) {
                lines_on_disk += 1;
                if let Ok(entry) = serde_json::from_str::<JournalEntry>(&line) {
                    if entries.len() >= MAX_JOURNAL_ENTRIES {
                        entries.pop_front();
                    }
                    entries.push_back(entry);
                }
            }
        }

        let mut journal = Self {
            entries,
            file_path: file_path.to_path_buf(),
            writer: Some(open_append(file_path)?),
        };

        // Keep the file from growing without bound across restarts.
        if lines_on_disk > MAX_JOURNAL_ENTRIES {
            journal.compact()?;
        }

        Ok(journal)
    }

    fn append(&mut self, entry: JournalEntry) {
        if let Some(ref mut writer) = self.writer {
            if let Ok(json) = serde_json::to_string(&entry) {
                let _ = writeln!(writer, "{}", json);
                let _ = writer.flush();
            }
        }
        if self.entries.len() >= MAX_JOURNAL_ENTRIES {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    fn recent(&self, limit: usize) -> Vec<JournalEntry> {
        self.entries.iter().rev().take(limit).cloned().collect()
    }

    /// Rewrite the file so it holds exactly the in-memory ring.
    fn compact(&mut self) -> std::io::Result<()> {
        self.writer = None;
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.file_path)?;
        let mut writer = BufWriter::new(file);
        for entry in &self.entries {
            if let Ok(json) = serde_json::to_string(entry) {
                writeln!(writer, "{}", json)?;
            }
        }
        writer.flush()?;
        self.writer = Some(open_append(&self.file_path)?);
        Ok(())
    }
}

fn open_append(path: &Path) -> std::io::Result<BufWriter<File>> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(BufWriter::new(file))
}

/// Cloneable handle to the journal shared by all request handlers.
#[derive(Clone)]
pub struct SharedJournal(Arc<Mutex<Journal>>);

impl SharedJournal {
    pub fn open(file_path: impl AsRef<Path>) -> Result<Self> {
        let journal = Journal::open(file_path.as_ref())?;
        Ok(Self(Arc::new(Mutex::new(journal))))
    }

    pub fn log(&self, entry: JournalEntry) {
        if let Ok(mut journal) = self.0.lock() {
            journal.append(entry);
        }
    }

    pub fn info(&self, component: impl Into<String>, message: impl Into<String>) {
        self.log(JournalEntry::new(Level::Info, component, message));
    }

    pub fn warn(&self, component: impl Into<String>, message: impl Into<String>) {
        self.log(JournalEntry::new(Level::Warn, component, message));
    }

    pub fn error(&self, component: impl Into<String>, message: impl Into<String>) {
        self.log(JournalEntry::new(Level::Error, component, message));
    }

    /// Record a completed exchange; failed exchanges are logged at `warn`.
    pub fn exchange(&self, exchange: &Exchange) {
        let level = if exchange.error.is_some() {
            Level::Warn
        } else {
            Level::Info
        };
        let message = format!(
            "{} -> {} status={} in={} out={} {}ms",
            exchange.requested_model,
            exchange.backend_model,
            exchange.status,
            exchange.input_tokens,
            exchange.output_tokens,
            exchange.latency_ms
        );
        let entry = JournalEntry::new(level, "exchange", message);
        self.log(match serde_json::to_value(exchange) {
            Ok(ctx) => entry.with_context(ctx),
            Err(_) => entry,
        });
    }

    /// Newest entries first.
    pub fn recent(&self, limit: usize) -> Vec<JournalEntry> {
        self.0.lock().map(|j| j.recent(limit)).unwrap_or_default()
    }

    pub fn compact(&self) -> Result<()> {
        if let Ok(mut journal) = self.0.lock() {
            journal.compact()?;
        }
        Ok(())
    }
}
