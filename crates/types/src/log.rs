use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Number of entries the activity feed keeps
pub const ACTIVITY_FEED_CAPACITY: usize = 10;

/// Severity / style of a log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    System,
    Info,
    User,
    Success,
    Error,
    Warning,
}

impl LogKind {
    /// Prefix the terminal renders in front of the text
    pub fn tag(&self) -> &'static str {
        match self {
            LogKind::System => "[SYS]",
            LogKind::Info => "[TIP]",
            LogKind::User => ">",
            LogKind::Success => "[OK]",
            LogKind::Error => "[ERR]",
            LogKind::Warning => "[WARN]",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLine {
    pub kind: LogKind,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl LogLine {
    pub fn new(kind: LogKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            link: None,
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(LogKind::System, text)
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(LogKind::Info, text)
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(LogKind::User, text)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(LogKind::Success, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(LogKind::Error, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(LogKind::Warning, text)
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}

impl std::fmt::Display for LogLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind.tag(), self.text)?;
        if let Some(link) = &self.link {
            write!(f, " <{}>", link)?;
        }
        Ok(())
    }
}

/// How many lines a buffer keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retention {
    Unbounded,
    /// Keep only the most recent `n` lines
    Capped(usize),
}

/// Append-only, insertion-ordered list of log lines
#[derive(Debug, Clone)]
pub struct LogBuffer {
    lines: VecDeque<LogLine>,
    retention: Retention,
}

impl LogBuffer {
    /// Orchestration log: never evicts
    pub fn unbounded() -> Self {
        Self {
            lines: VecDeque::new(),
            retention: Retention::Unbounded,
        }
    }

    pub fn capped(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity),
            retention: Retention::Capped(capacity),
        }
    }

    /// Activity feed with its fixed capacity
    pub fn activity_feed() -> Self {
        Self::capped(ACTIVITY_FEED_CAPACITY)
    }

    /// Orchestration log pre-filled with the terminal banner
    pub fn with_banner(network: &str) -> Self {
        let mut buffer = Self::unbounded();
        buffer.extend(banner(network));
        buffer
    }

    pub fn push(&mut self, line: LogLine) {
        self.lines.push_back(line);
        if let Retention::Capped(capacity) = self.retention {
            while self.lines.len() > capacity {
                self.lines.pop_front();
            }
        }
    }

    pub fn extend(&mut self, lines: impl IntoIterator<Item = LogLine>) {
        for line in lines {
            self.push(line);
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn retention(&self) -> Retention {
        self.retention
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogLine> {
        self.lines.iter()
    }

    pub fn last(&self) -> Option<&LogLine> {
        self.lines.back()
    }

    pub fn snapshot(&self) -> Vec<LogLine> {
        self.lines.iter().cloned().collect()
    }
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Lines every fresh terminal starts with
pub fn banner(network: &str) -> Vec<LogLine> {
    vec![
        LogLine::system(format!(
            "AXIS PROTOCOL v{} - MIDL NETWORK",
            crate::PROTOCOL_VERSION
        )),
        LogLine::system("Bonding curve engine initialized..."),
        LogLine::system(format!("Connected to MIDL {}", network)),
        LogLine::info(
            "Type a description to generate your token, or toggle \"Advanced\" for manual config.",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbounded_keeps_everything_in_order() {
        let mut buffer = LogBuffer::unbounded();
        for i in 0..50 {
            buffer.push(LogLine::system(format!("line {i}")));
        }
        assert_eq!(buffer.len(), 50);
        assert_eq!(buffer.iter().next().unwrap().text, "line 0");
        assert_eq!(buffer.last().unwrap().text, "line 49");
    }

    #[test]
    fn test_activity_feed_evicts_oldest() {
        let mut feed = LogBuffer::activity_feed();
        for i in 0..15 {
            feed.push(LogLine::info(format!("trade {i}")));
        }
        assert_eq!(feed.len(), ACTIVITY_FEED_CAPACITY);
        assert_eq!(feed.iter().next().unwrap().text, "trade 5");
        assert_eq!(feed.last().unwrap().text, "trade 14");
    }

    #[test]
    fn test_banner() {
        let buffer = LogBuffer::with_banner("regtest");
        assert_eq!(buffer.len(), 4);
        assert_eq!(buffer.snapshot()[2].text, "Connected to MIDL regtest");
        assert_eq!(buffer.last().unwrap().kind, LogKind::Info);
    }

    #[test]
    fn test_display_includes_link() {
        let line = LogLine::success("done").with_link("https://example.org/tx/1");
        assert_eq!(line.to_string(), "[OK] done <https://example.org/tx/1>");
    }
}
