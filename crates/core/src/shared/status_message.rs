use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Unread messages kept for [`StatusBoard::take_unread`]; older ones are dropped.
const UNREAD_BACKLOG: usize = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

/// A transient user-facing message stamped with its creation time.
///
/// Expiry is evaluated against a caller-supplied clock; nothing fires on
/// its own.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusMessage {
    text: String,
    kind: MessageKind,
    created_at: Instant,
}

impl StatusMessage {
    pub fn new(text: impl Into<String>, kind: MessageKind, created_at: Instant) -> Self {
        Self {
            text: text.into(),
            kind,
            created_at,
        }
    }

    pub fn success(text: impl Into<String>, created_at: Instant) -> Self {
        Self::new(text, MessageKind::Success, created_at)
    }

    pub fn error(text: impl Into<String>, created_at: Instant) -> Self {
        Self::new(text, MessageKind::Error, created_at)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    pub fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.created_at) >= ttl
    }
}

/// Single-slot holder for the current status message.
///
/// Posting replaces whatever is shown; expired messages are dropped by
/// [`StatusBoard::clear_expired`] and hidden by [`StatusBoard::current`].
/// Every posted message is also queued until a reader takes it, so one
/// superseded before anyone looked is still delivered.
#[derive(Debug)]
pub struct StatusBoard {
    current: Option<StatusMessage>,
    unread: VecDeque<StatusMessage>,
    ttl: Duration,
    posted: u64,
}

impl StatusBoard {
    pub fn new(ttl: Duration) -> Self {
        Self {
            current: None,
            unread: VecDeque::new(),
            ttl,
            posted: 0,
        }
    }

    pub fn post(&mut self, message: StatusMessage) {
        log::debug!("status [{:?}]: {}", message.kind(), message.text());
        self.posted += 1;
        if self.unread.len() == UNREAD_BACKLOG {
            self.unread.pop_front();
        }
        self.unread.push_back(message.clone());
        self.current = Some(message);
    }

    /// Messages posted since the last call, oldest first.
    pub fn take_unread(&mut self) -> Vec<StatusMessage> {
        self.unread.drain(..).collect()
    }

    pub fn current(&self, now: Instant) -> Option<&StatusMessage> {
        self.current
            .as_ref()
            .filter(|m| !m.is_expired(now, self.ttl))
    }

    pub fn clear_expired(&mut self, now: Instant) {
        if self
            .current
            .as_ref()
            .is_some_and(|m| m.is_expired(now, self.ttl))
        {
            self.current = None;
        }
    }

    /// Total messages posted so far, expired or not.
    pub fn posted(&self) -> u64 {
        self.posted
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
