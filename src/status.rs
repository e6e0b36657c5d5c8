use std::collections::VecDeque;

use instant::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A timed user-facing message. Load failures and dataset errors reach the UI
/// through these instead of vanishing into the log.
#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
    pub posted: Instant,
    pub ttl_ms: u128,
}

impl Notice {
    pub fn expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.posted).as_millis() > self.ttl_ms
    }
}

#[derive(Default)]
pub struct NoticeLog {
    entries: VecDeque<Notice>,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, level: NoticeLevel, text: impl Into<String>, ttl_ms: u128) {
        self.entries.push_back(Notice {
            level,
            text: text.into(),
            posted: Instant::now(),
            ttl_ms,
        });
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(NoticeLevel::Info, text, 3000);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(NoticeLevel::Error, text, 5000);
    }

    pub fn sweep(&mut self) {
        self.sweep_at(Instant::now());
    }

    /// Expiry against a provided clock for deterministic tests.
    pub fn sweep_at(&mut self, now: Instant) {
        self.entries.retain(|n| !n.expired_at(now));
    }

    /// Most recent non-expired notice.
    pub fn latest(&self) -> Option<&Notice> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use super::*;

    #[test]
    fn expiry_honors_ttl_ordering() {
        let mut log = NoticeLog::new();
        log.push(NoticeLevel::Error, "short", 100);
        log.push(NoticeLevel::Info, "long", 300);
        assert_eq!(log.len(), 2);

        let now = Instant::now() + Duration::from_millis(200);
        log.sweep_at(now);
        assert_eq!(log.len(), 1);
        let latest = log.latest().unwrap();
        assert_eq!(latest.level, NoticeLevel::Info);
        assert_eq!(latest.text, "long");

        log.sweep_at(Instant::now() + Duration::from_millis(400));
        assert!(log.is_empty());
    }
}
