use citybuzz_core::error::{CityBuzzError, Result};
use citybuzz_core::session::{Session, SessionPhase};
use citybuzz_core::user::{AuthGateway, Credentials, RegisterRequest, User};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{RwLock, watch};

/// Owns the client's authentication state and the one-shot bootstrap.
///
/// Exactly one identity probe runs per bootstrap cycle no matter how many
/// callers race into [`initialize`](Self::initialize). Logout (and a detected
/// session expiry) resets the guards so the next cycle can probe again.
///
/// Every state change is broadcast through a `watch` channel; consumers that
/// render the session should [`subscribe`](Self::subscribe) rather than poll.
pub struct SessionController {
    gateway: Arc<dyn AuthGateway>,
    state: RwLock<Session>,
    /// A probe is running
    initializing: AtomicBool,
    /// A probe has completed in the current cycle
    initialized: AtomicBool,
    changes: watch::Sender<Session>,
}

impl SessionController {
    pub fn new(gateway: Arc<dyn AuthGateway>) -> Self {
        let (changes, _) = watch::channel(Session::default());
        Self {
            gateway,
            state: RwLock::new(Session::default()),
            initializing: AtomicBool::new(false),
            initialized: AtomicBool::new(false),
            changes,
        }
    }

    /// Runs the identity probe once per cycle.
    ///
    /// Returns `true` if this call performed the probe, `false` if it was
    /// skipped because a probe already ran or is running. The probe's failure
    /// never escapes: any error leaves the session anonymous and checked.
    ///
    /// Dropping the future mid-probe releases the guard and puts the session
    /// back in its pre-check state, so a later call probes again.
    pub async fn initialize(&self) -> bool {
        if self.initialized.load(Ordering::Acquire) {
            tracing::debug!("session already checked, skipping probe");
            return false;
        }
        if self
            .initializing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("session probe already running");
            return false;
        }
        let mut probe = ProbeGuard {
            controller: self,
            checked_before: None,
            settled: false,
        };
        // A concurrent probe may have finished between the two checks above
        if self.initialized.load(Ordering::Acquire) {
            probe.settled = true;
            return false;
        }

        let mut checked_before = false;
        self.update(|s| {
            checked_before = s.has_checked_auth;
            s.begin_check();
        })
        .await;
        probe.checked_before = Some(checked_before);

        match self.gateway.current_user().await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, username = %user.username, "session restored");
                self.update(|s| s.authenticated(user)).await;
            }
            Err(err) => {
                tracing::debug!(error = %err, "no active session");
                self.update(Session::anonymous).await;
            }
        }

        // `initialized` must be visible before the guard releases `initializing`
        self.initialized.store(true, Ordering::Release);
        probe.settled = true;
        true
    }

    /// Authenticates with credentials and stores the returned identity.
    ///
    /// On failure the message is kept in `last_error` and returned as an
    /// [`CityBuzzError::Auth`] when the server rejected the credentials or
    /// omitted the user.
    pub async fn login(&self, credentials: &Credentials) -> Result<User> {
        self.update(Session::begin).await;

        match self.gateway.login(credentials).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "logged in");
                self.update(|s| s.authenticated(user.clone())).await;
                Ok(user)
            }
            Err(err) => {
                let err = into_auth_error(err);
                tracing::warn!(error = %err, "login failed");
                let message = err.user_message();
                self.update(|s| {
                    s.failed(message);
                    s.has_checked_auth = true;
                })
                .await;
                Err(err)
            }
        }
    }

    /// Creates an account. The caller logs in separately afterwards.
    pub async fn register(&self, request: &RegisterRequest) -> Result<User> {
        self.update(Session::begin).await;

        match self.gateway.register(request).await {
            Ok(user) => {
                tracing::info!(username = %user.username, "account registered");
                self.update(|s| s.is_loading = false).await;
                Ok(user)
            }
            Err(err) => {
                tracing::warn!(error = %err, "registration failed");
                let message = err.user_message();
                self.update(|s| s.failed(message)).await;
                Err(err)
            }
        }
    }

    /// Ends the session.
    ///
    /// The local session is cleared and the bootstrap guards are reset even
    /// when the server call fails; the error is still returned.
    pub async fn logout(&self) -> Result<()> {
        self.update(Session::begin).await;
        let result = self.gateway.logout().await;
        self.reset_guards();

        match result {
            Ok(()) => {
                tracing::info!("logged out");
                self.update(Session::anonymous).await;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "logout request failed, clearing local session anyway");
                let message = err.user_message();
                self.update(|s| {
                    s.anonymous();
                    s.last_error = Some(message);
                })
                .await;
                Err(err)
            }
        }
    }

    /// Reacts to a 401 from a must-authenticate endpoint.
    ///
    /// The stale identity is dropped and the bootstrap runs again, so the
    /// client lands in whichever state the server now reports. Returns
    /// whether this call ran the new probe.
    pub async fn handle_session_expired(&self) -> bool {
        if self.initializing.load(Ordering::Acquire) {
            return false;
        }
        tracing::info!("session expired, re-checking identity");
        self.initialized.store(false, Ordering::Release);
        self.update(Session::reset).await;
        self.initialize().await
    }

    pub async fn clear_error(&self) {
        self.update(|s| s.last_error = None).await;
    }

    pub async fn snapshot(&self) -> Session {
        self.state.read().await.clone()
    }

    pub async fn phase(&self) -> SessionPhase {
        self.state.read().await.phase()
    }

    pub async fn current_user(&self) -> Option<User> {
        self.state.read().await.user.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.is_authenticated()
    }

    /// Receives a copy of the session after every change.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.changes.subscribe()
    }

    /// Resolves once the identity check has settled.
    pub async fn wait_until_checked(&self) -> Session {
        let mut rx = self.changes.subscribe();
        match rx.wait_for(|s| s.has_checked_auth && !s.is_loading).await {
            Ok(session) => session.clone(),
            Err(_) => self.snapshot().await,
        }
    }

    fn reset_guards(&self) {
        self.initialized.store(false, Ordering::Release);
        self.initializing.store(false, Ordering::Release);
    }

    async fn update(&self, apply: impl FnOnce(&mut Session)) -> Session {
        let mut state = self.state.write().await;
        apply(&mut state);
        let snapshot = state.clone();
        self.changes.send_replace(snapshot.clone());
        snapshot
    }
}

/// Releases `initializing` when a probe ends, however it ends.
struct ProbeGuard<'a> {
    controller: &'a SessionController,
    /// `has_checked_auth` as it was before the check began
    checked_before: Option<bool>,
    settled: bool,
}

impl Drop for ProbeGuard<'_> {
    fn drop(&mut self) {
        if let (false, Some(checked_before)) = (self.settled, self.checked_before) {
            match self.controller.state.try_write() {
                Ok(mut state) => {
                    tracing::debug!("session probe cancelled");
                    state.is_loading = false;
                    state.has_checked_auth = checked_before;
                    self.controller.changes.send_replace(state.clone());
                }
                Err(_) => tracing::warn!("session probe cancelled while the session was busy"),
            }
        }
        self.controller.initializing.store(false, Ordering::Release);
    }
}

/// A rejected login is an auth failure whatever status the server chose.
fn into_auth_error(err: CityBuzzError) -> CityBuzzError {
    match err {
        CityBuzzError::Api {
            status: 400 | 401 | 403,
            message,
        } => CityBuzzError::Auth(message),
        CityBuzzError::Protocol(_) => {
            CityBuzzError::auth("User object missing from login response")
        }
        other => other,
    }
}
