//! Shared plumbing for optimistic mutations.

use crate::notice::{NoticeBoard, NoticeKind};
use crate::session::SessionController;
use citybuzz_core::error::{CityBuzzError, Result};
use citybuzz_core::i18n::{Locale, Message};
use citybuzz_core::user::User;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// What every reconciler needs besides its own gateway.
#[derive(Clone)]
pub struct MutationContext {
    pub session: Arc<SessionController>,
    pub notices: Arc<NoticeBoard>,
    pub timeout: Duration,
}

impl MutationContext {
    pub fn new(session: Arc<SessionController>, notices: Arc<NoticeBoard>, timeout: Duration) -> Self {
        Self {
            session,
            notices,
            timeout,
        }
    }

    pub fn locale(&self) -> Locale {
        self.notices.locale()
    }

    /// Returns the current user, or shows the login prompt and fails with
    /// [`CityBuzzError::LoginRequired`]. No request is issued in that case.
    pub async fn require_user(&self, prompt: Message) -> Result<User> {
        match self.session.current_user().await {
            Some(user) => Ok(user),
            None => {
                tracing::debug!(?prompt, "action needs a logged-in user");
                self.notices.push(NoticeKind::LoginPrompt, prompt).await;
                Err(CityBuzzError::LoginRequired)
            }
        }
    }

    /// Runs a mutating call under the mutation timeout.
    pub async fn run<T, F>(&self, operation: &str, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(CityBuzzError::timeout(
                operation,
                self.timeout.as_millis() as u64,
            )),
        }
    }

    /// Surfaces a failed action.
    ///
    /// Locally rejected actions stay silent. A 401 on a protected endpoint
    /// drops the stale identity and re-runs the bootstrap; anything else shows
    /// the localized failure message.
    pub async fn report(&self, operation: &str, err: &CityBuzzError, message: Message) {
        if err.is_client_side() {
            return;
        }
        tracing::warn!(operation, error = %err, "action failed");

        if err.is_session_expired() {
            self.notices.push(NoticeKind::Error, Message::SessionExpired).await;
            self.session.handle_session_expired().await;
        } else {
            self.notices.push(NoticeKind::Error, message).await;
        }
    }
}
