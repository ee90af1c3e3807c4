//! Transient user-facing notices.
//!
//! Failure notices and login prompts disappear on their own after a TTL, so
//! nothing has to remember to clear them.

use citybuzz_core::i18n::{Locale, Message};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Error,
    Info,
    /// An anonymous user tried an action that needs an account
    LoginPrompt,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub kind: NoticeKind,
    pub text: String,
}

struct Entry {
    notice: Notice,
    expires_at: Instant,
}

/// Queue of notices with automatic expiry.
pub struct NoticeBoard {
    locale: Locale,
    ttl: Duration,
    next_id: AtomicU64,
    entries: RwLock<Vec<Entry>>,
}

impl NoticeBoard {
    pub fn new(locale: Locale, ttl: Duration) -> Self {
        Self {
            locale,
            ttl,
            next_id: AtomicU64::new(1),
            entries: RwLock::new(Vec::new()),
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Shows a message from the locale table. Returns the notice id.
    pub async fn push(&self, kind: NoticeKind, message: Message) -> u64 {
        self.push_text(kind, message.text(self.locale)).await
    }

    /// Shows free text, e.g. a message passed through from the server.
    pub async fn push_text(&self, kind: NoticeKind, text: impl Into<String>) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let notice = Notice {
            id,
            kind,
            text: text.into(),
        };
        tracing::debug!(id, kind = ?notice.kind, text = %notice.text, "notice");

        let mut entries = self.entries.write().await;
        entries.push(Entry {
            notice,
            expires_at: Instant::now() + self.ttl,
        });
        id
    }

    /// Notices that have not expired yet, oldest first.
    pub async fn active(&self) -> Vec<Notice> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        entries.retain(|e| e.expires_at > now);
        entries.iter().map(|e| e.notice.clone()).collect()
    }

    /// Dismisses one notice early. Returns false if it was already gone.
    pub async fn dismiss(&self, id: u64) -> bool {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|e| e.notice.id != id);
        entries.len() != before
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}
