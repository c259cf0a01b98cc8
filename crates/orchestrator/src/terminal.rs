use std::sync::Arc;

use axis_types::{LogBuffer, LogLine};
use tokio::sync::{broadcast, RwLock};

const LIVE_CHANNEL_CAPACITY: usize = 256;

/// Shared log the launch flow writes to.
///
/// Lines land in the buffer in call order and are also published on a
/// broadcast channel so a front end can follow along live. A lagging
/// subscriber loses lines from the stream, never from the buffer.
#[derive(Clone)]
pub struct TerminalLog {
    buffer: Arc<RwLock<LogBuffer>>,
    live_tx: broadcast::Sender<LogLine>,
}

impl TerminalLog {
    pub fn new(buffer: LogBuffer) -> Self {
        let (live_tx, _) = broadcast::channel(LIVE_CHANNEL_CAPACITY);
        Self {
            buffer: Arc::new(RwLock::new(buffer)),
            live_tx,
        }
    }

    /// Unbounded log opened with the terminal banner
    pub fn with_banner(network: &str) -> Self {
        Self::new(LogBuffer::with_banner(network))
    }

    pub async fn push(&self, line: LogLine) {
        let mut buffer = self.buffer.write().await;
        buffer.push(line.clone());
        // No subscribers is fine
        let _ = self.live_tx.send(line);
    }

    /// Append several lines without interleaving other writers
    pub async fn extend(&self, lines: impl IntoIterator<Item = LogLine>) {
        let mut buffer = self.buffer.write().await;
        for line in lines {
            buffer.push(line.clone());
            let _ = self.live_tx.send(line);
        }
    }

    pub async fn len(&self) -> usize {
        self.buffer.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.buffer.read().await.is_empty()
    }

    pub async fn snapshot(&self) -> Vec<LogLine> {
        self.buffer.read().await.snapshot()
    }

    pub async fn last(&self) -> Option<LogLine> {
        self.buffer.read().await.last().cloned()
    }

    /// Stream of lines pushed from now on
    pub fn subscribe(&self) -> broadcast::Receiver<LogLine> {
        self.live_tx.subscribe()
    }
}

impl Default for TerminalLog {
    fn default() -> Self {
        Self::new(LogBuffer::unbounded())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_push_reaches_buffer_and_subscribers() {
        let log = TerminalLog::default();
        let mut rx = log.subscribe();

        log.push(LogLine::system("one")).await;
        log.extend(vec![LogLine::info("two"), LogLine::success("three")])
            .await;

        let texts: Vec<_> = log.snapshot().await.into_iter().map(|l| l.text).collect();
        assert_eq!(texts, vec!["one", "two", "three"]);

        assert_eq!(rx.recv().await.unwrap().text, "one");
        assert_eq!(rx.recv().await.unwrap().text, "two");
        assert_eq!(rx.recv().await.unwrap().text, "three");
    }

    #[tokio::test]
    async fn test_capped_buffer_keeps_recent_lines() {
        let log = TerminalLog::new(LogBuffer::activity_feed());
        for i in 0..15 {
            log.push(LogLine::info(format!("line {}", i))).await;
        }
        assert_eq!(log.len().await, 10);
        assert_eq!(log.last().await.unwrap().text, "line 14");
        assert_eq!(log.snapshot().await[0].text, "line 5");
    }

    #[tokio::test]
    async fn test_banner_opens_the_log() {
        let log = TerminalLog::with_banner("regtest");
        let lines = log.snapshot().await;
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[2].text, "Connected to MIDL regtest");
    }
}
