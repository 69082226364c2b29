// Dasa Sandbox - core/log.rs
//
// The user-facing event log shared by the host and its panels.
//
// Ownership: the host owns the single `LogList`. Panels never see the list;
// they receive `&mut dyn LogSink` and can only append. Entries are immutable
// once created and the list only shrinks through `clear`.

use chrono::{DateTime, Local};

// =============================================================================
// LogKind
// =============================================================================

/// Category of a log line, which drives its colour in the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogKind {
    Info,
    Error,
    Success,
}

impl LogKind {
    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            LogKind::Info => "Info",
            LogKind::Error => "Error",
            LogKind::Success => "Success",
        }
    }

    /// Short label for plain-text reports.
    pub fn short_label(&self) -> &'static str {
        match self {
            LogKind::Info => "INFO",
            LogKind::Error => "ERROR",
            LogKind::Success => "OK",
        }
    }
}

impl std::fmt::Display for LogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// LogEntry
// =============================================================================

/// A single status line reported by a panel.
#[derive(Debug, Clone)]
pub struct LogEntry {
    message: String,
    kind: LogKind,
    timestamp: DateTime<Local>,
}

impl LogEntry {
    /// Create an entry stamped with the current local time.
    pub fn now(message: impl Into<String>, kind: LogKind) -> Self {
        Self {
            message: message.into(),
            kind,
            timestamp: Local::now(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> LogKind {
        self.kind
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    /// Local time of day, as shown in the viewer.
    pub fn time_of_day(&self) -> String {
        self.timestamp.format("%H:%M:%S").to_string()
    }
}

// =============================================================================
// LogSink
// =============================================================================

/// Append-only log capability handed to panels.
pub trait LogSink {
    /// Record one line.
    fn append(&mut self, message: String, kind: LogKind);
}

impl dyn LogSink + '_ {
    pub fn info(&mut self, message: impl Into<String>) {
        self.append(message.into(), LogKind::Info);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.append(message.into(), LogKind::Error);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.append(message.into(), LogKind::Success);
    }
}

// =============================================================================
// LogList
// =============================================================================

/// Ordered, append-only list of log entries. Unbounded for the session.
#[derive(Debug, Default)]
pub struct LogList {
    entries: Vec<LogEntry>,
}

impl LogList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry stamped now.
    pub fn push(&mut self, message: impl Into<String>, kind: LogKind) {
        let entry = LogEntry::now(message, kind);
        tracing::debug!(kind = entry.kind.short_label(), message = %entry.message, "Log entry");
        self.entries.push(entry);
    }

    /// Remove every entry. Idempotent.
    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            tracing::debug!(removed = self.entries.len(), "Log cleared");
        }
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order (oldest first).
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Entries in display order (newest first).
    pub fn newest_first(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().rev()
    }

    /// Plain-text report, oldest first, one line per entry.
    pub fn report(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&format!(
                "{} [{}] {}\n",
                entry.time_of_day(),
                entry.kind.short_label(),
                entry.message
            ));
        }
        out
    }
}

impl LogSink for LogList {
    fn append(&mut self, message: String, kind: LogKind) {
        self.push(message, kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_grows_by_one_each_call() {
        let mut logs = LogList::new();
        for i in 0..25 {
            logs.push(format!("line {i}"), LogKind::Info);
            assert_eq!(logs.len(), i + 1);
        }
    }

    #[test]
    fn test_newest_first_is_exact_reverse_of_insertion() {
        let mut logs = LogList::new();
        logs.push("first", LogKind::Info);
        logs.push("second", LogKind::Error);
        logs.push("third", LogKind::Success);

        let shown: Vec<&str> = logs.newest_first().map(|e| e.message()).collect();
        assert_eq!(shown, vec!["third", "second", "first"]);

        let kinds: Vec<LogKind> = logs.newest_first().map(|e| e.kind()).collect();
        assert_eq!(kinds, vec![LogKind::Success, LogKind::Error, LogKind::Info]);
    }

    #[test]
    fn test_identical_messages_are_not_deduplicated() {
        let mut logs = LogList::new();
        logs.push("same", LogKind::Info);
        logs.push("same", LogKind::Info);
        assert_eq!(logs.len(), 2);
    }

    #[test]
    fn test_clear_is_total_and_idempotent() {
        let mut logs = LogList::new();
        logs.push("a", LogKind::Info);
        logs.push("b", LogKind::Error);
        logs.clear();
        assert!(logs.is_empty());
        logs.clear();
        assert_eq!(logs.len(), 0);
    }

    #[test]
    fn test_timestamps_are_non_decreasing() {
        let mut logs = LogList::new();
        logs.push("a", LogKind::Info);
        logs.push("b", LogKind::Info);
        let e = logs.entries();
        assert!(e[0].timestamp() <= e[1].timestamp());
    }

    #[test]
    fn test_report_is_oldest_first_with_kind_labels() {
        let mut logs = LogList::new();
        logs.push("started", LogKind::Info);
        logs.push("failed", LogKind::Error);
        let report = logs.report();
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("[INFO] started"));
        assert!(lines[1].ends_with("[ERROR] failed"));
    }

    #[test]
    fn test_dyn_sink_appends() {
        let mut logs = LogList::new();
        {
            let sink: &mut dyn LogSink = &mut logs;
            sink.success("via dyn");
        }
        assert_eq!(logs.entries()[0].message(), "via dyn");
    }
}
