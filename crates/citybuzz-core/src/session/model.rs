use crate::user::User;
use serde::{Deserialize, Serialize};

/// Where the session bootstrap currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Uninitialized,
    Initializing,
    Authenticated,
    Anonymous,
}

/// Current authentication state of the client.
///
/// `is_authenticated` is derived from `user`, so the two can never disagree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: Option<User>,
    /// Whether the initial "who am I" check (or a login) has completed
    pub has_checked_auth: bool,
    pub is_loading: bool,
    pub last_error: Option<String>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Derives the bootstrap phase from the stored flags.
    pub fn phase(&self) -> SessionPhase {
        match (&self.user, self.has_checked_auth, self.is_loading) {
            (Some(_), _, _) => SessionPhase::Authenticated,
            (None, true, _) => SessionPhase::Anonymous,
            (None, false, true) => SessionPhase::Initializing,
            (None, false, false) => SessionPhase::Uninitialized,
        }
    }

    /// Marks the start of a network round-trip and clears the previous error.
    pub fn begin(&mut self) {
        self.is_loading = true;
        self.last_error = None;
    }

    /// Marks the start of a "who am I" check.
    ///
    /// An anonymous session goes back to unchecked so consumers show a
    /// loading state again instead of assuming anonymity.
    pub fn begin_check(&mut self) {
        self.begin();
        if self.user.is_none() {
            self.has_checked_auth = false;
        }
    }

    /// Records a successful authentication.
    pub fn authenticated(&mut self, user: User) {
        self.user = Some(user);
        self.has_checked_auth = true;
        self.is_loading = false;
    }

    /// Records that the client is (now) anonymous.
    pub fn anonymous(&mut self) {
        self.user = None;
        self.has_checked_auth = true;
        self.is_loading = false;
    }

    /// Records a failed round-trip without touching identity.
    pub fn failed(&mut self, message: impl Into<String>) {
        self.is_loading = false;
        self.last_error = Some(message.into());
    }

    /// Back to the state the client starts in.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        serde_json::from_value(serde_json::json!({
            "id": "6f1c1a52-9f5e-4a7c-8f3e-3c8e2b1d0a11",
            "username": "camille",
        }))
        .unwrap()
    }

    #[test]
    fn test_default_session_is_uninitialized() {
        let session = Session::default();
        assert_eq!(session.phase(), SessionPhase::Uninitialized);
        assert!(!session.is_authenticated());
        assert!(!session.has_checked_auth);
    }

    #[test]
    fn test_phase_follows_lifecycle() {
        let mut session = Session::default();
        session.begin();
        assert_eq!(session.phase(), SessionPhase::Initializing);

        session.authenticated(user());
        assert_eq!(session.phase(), SessionPhase::Authenticated);
        assert!(session.is_authenticated());

        session.anonymous();
        assert_eq!(session.phase(), SessionPhase::Anonymous);
        assert!(!session.is_authenticated());
        assert!(session.has_checked_auth);
    }

    #[test]
    fn test_recheck_after_logout_is_initializing() {
        let mut session = Session::default();
        session.anonymous();
        session.begin_check();
        assert_eq!(session.phase(), SessionPhase::Initializing);
        assert!(!session.has_checked_auth);
    }

    #[test]
    fn test_failure_keeps_identity() {
        let mut session = Session::default();
        session.authenticated(user());
        session.begin();
        session.failed("network down");

        assert!(session.is_authenticated());
        assert!(!session.is_loading);
        assert_eq!(session.last_error.as_deref(), Some("network down"));
    }
}
