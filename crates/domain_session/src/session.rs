//! Session lifecycle
//!
//! A [`Session`] is an explicit object handed by reference to whichever
//! component needs the current credential; there is no ambient global auth
//! state. The periodic refresh is a scheduled task owned by the session:
//! it starts when asked, is aborted when the session is dropped or ended,
//! and runs independently of any registration workflow. A refresh outcome
//! (success or failure) only ever swaps the credential; it never touches
//! in-progress form data.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::ports::{AuthPort, SessionCredential, UserProfile};
use crate::token::{self, Claims};

/// State shared between the session and its refresh task
#[derive(Debug)]
struct SessionState {
    session_ref: String,
    profile: UserProfile,
    credential: RwLock<SessionCredential>,
}

/// An authenticated session against the registry backend
pub struct Session {
    auth: Arc<dyn AuthPort>,
    config: SessionConfig,
    state: Arc<SessionState>,
    refresh_task: Option<JoinHandle<()>>,
}

impl Session {
    /// Authenticates and opens a session
    ///
    /// The refresh task is not started automatically; call
    /// [`start_refresh`](Session::start_refresh) once the session should
    /// keep its credential fresh in the background.
    pub async fn login(
        auth: Arc<dyn AuthPort>,
        config: SessionConfig,
        username: &str,
        password: &str,
    ) -> Result<Self, SessionError> {
        let success = auth
            .login(username, password)
            .await
            .map_err(|e| SessionError::LoginFailed(e.to_string()))?;

        debug!(username, "session opened");
        Ok(Self {
            auth,
            config,
            state: Arc::new(SessionState {
                session_ref: success.session_ref,
                profile: success.profile,
                credential: RwLock::new(success.credential),
            }),
            refresh_task: None,
        })
    }

    /// The authenticated user's profile
    pub fn profile(&self) -> &UserProfile {
        &self.state.profile
    }

    /// A clone of the current access credential
    pub async fn credential(&self) -> SessionCredential {
        self.state.credential.read().await.clone()
    }

    /// Validates the current credential and returns its claims
    pub async fn claims(&self) -> Result<Claims, SessionError> {
        let credential = self.credential().await;
        token::validate_token(&credential.access_token, &self.config.jwt_secret)
    }

    /// Fails unless the current credential carries `permission`
    pub async fn require_permission(&self, permission: &str) -> Result<(), SessionError> {
        let claims = self.claims().await?;
        if token::has_role(&claims, permission) {
            Ok(())
        } else {
            Err(SessionError::MissingPermission(permission.to_string()))
        }
    }

    /// Refreshes the credential immediately
    pub async fn refresh_now(&self) -> Result<(), SessionError> {
        let credential = self
            .auth
            .refresh(&self.state.session_ref)
            .await
            .map_err(|e| SessionError::RefreshFailed(e.to_string()))?;
        *self.state.credential.write().await = credential;
        Ok(())
    }

    /// Starts the periodic refresh task
    ///
    /// The first refresh happens one full interval after this call. A
    /// failed refresh is logged and retried on the next tick; the previous
    /// credential stays in effect throughout.
    pub fn start_refresh(&mut self) {
        self.stop_refresh();

        let auth = Arc::clone(&self.auth);
        let state = Arc::clone(&self.state);
        let interval = Duration::from_secs(self.config.refresh_interval_secs);

        self.refresh_task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // The first tick of an interval completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                match auth.refresh(&state.session_ref).await {
                    Ok(credential) => {
                        debug!("credential refreshed");
                        *state.credential.write().await = credential;
                    }
                    Err(error) => {
                        warn!(%error, "credential refresh failed, keeping previous credential");
                    }
                }
            }
        }));
    }

    /// Stops the periodic refresh task, if running
    pub fn stop_refresh(&mut self) {
        if let Some(task) = self.refresh_task.take() {
            task.abort();
        }
    }

    /// Whether the refresh task is currently scheduled
    pub fn is_refresh_running(&self) -> bool {
        self.refresh_task
            .as_ref()
            .map_or(false, |task| !task.is_finished())
    }

    /// Ends the session: stops the refresh task and invalidates the
    /// server-side session reference
    pub async fn end(mut self) -> Result<(), SessionError> {
        self.stop_refresh();
        self.auth
            .logout(&self.state.session_ref)
            .await
            .map_err(|e| SessionError::RefreshFailed(e.to_string()))?;
        debug!("session ended");
        Ok(())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.stop_refresh();
    }
}
