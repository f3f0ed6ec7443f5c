//! Session Domain Ports
//!
//! The authentication service is a remote collaborator: it issues a
//! short-lived access credential together with a longer-lived server-side
//! session reference, and refreshes the credential against that reference.
//! Nothing about token issuance is implemented locally.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use registry_kernel::{DomainPort, HealthCheckable, PortError, UserId};

/// A short-lived access credential issued by the authentication service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCredential {
    /// The signed access token
    pub access_token: String,
    /// When the token stops being accepted
    pub expires_at: DateTime<Utc>,
}

/// Profile of the authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: UserId,
    pub username: String,
    pub display_name: String,
    pub roles: Vec<String>,
}

/// Successful login response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginSuccess {
    /// The initial access credential
    pub credential: SessionCredential,
    /// Longer-lived server-side session reference used for refresh
    pub session_ref: String,
    /// The authenticated user's profile
    pub profile: UserProfile,
}

/// Port for the remote authentication service
#[async_trait]
pub trait AuthPort: DomainPort + HealthCheckable {
    /// Authenticates a user by username and password
    async fn login(&self, username: &str, password: &str) -> Result<LoginSuccess, PortError>;

    /// Exchanges the session reference for a fresh access credential
    async fn refresh(&self, session_ref: &str) -> Result<SessionCredential, PortError>;

    /// Invalidates the server-side session
    async fn logout(&self, session_ref: &str) -> Result<(), PortError>;
}

/// Mock implementation of AuthPort for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
    use std::sync::Arc;
    use chrono::Duration;
    use tokio::sync::RwLock;

    use registry_kernel::{AdapterHealth, HealthCheckResult, SessionId};

    use crate::token;

    /// In-memory mock of the authentication service
    ///
    /// Issues real HS256 tokens signed with the configured secret so that
    /// session-side validation can be exercised in tests.
    #[derive(Debug)]
    pub struct MockAuthPort {
        secret: String,
        token_ttl_secs: u64,
        users: RwLock<HashMap<String, (String, UserProfile)>>,
        sessions: Arc<RwLock<HashMap<String, UserProfile>>>,
        fail_next_refresh: AtomicBool,
        refresh_calls: AtomicU64,
    }

    impl MockAuthPort {
        /// Creates a mock issuing tokens signed with `secret`
        pub fn new(secret: impl Into<String>) -> Self {
            Self {
                secret: secret.into(),
                token_ttl_secs: 300,
                users: RwLock::new(HashMap::new()),
                sessions: Arc::new(RwLock::new(HashMap::new())),
                fail_next_refresh: AtomicBool::new(false),
                refresh_calls: AtomicU64::new(0),
            }
        }

        /// Registers a user the mock will accept
        pub async fn with_user(
            self,
            username: impl Into<String>,
            password: impl Into<String>,
            profile: UserProfile,
        ) -> Self {
            self.users
                .write()
                .await
                .insert(username.into(), (password.into(), profile));
            self
        }

        /// Makes the next refresh call fail with a transient error
        pub fn fail_next_refresh(&self) {
            self.fail_next_refresh.store(true, Ordering::Relaxed);
        }

        /// Number of refresh calls received
        pub fn refresh_calls(&self) -> u64 {
            self.refresh_calls.load(Ordering::Relaxed)
        }

        fn issue(&self, profile: &UserProfile) -> Result<SessionCredential, PortError> {
            let access_token = token::create_token(
                &profile.user_id.to_string(),
                profile.roles.clone(),
                &self.secret,
                self.token_ttl_secs,
            )
            .map_err(|e| PortError::internal(e.to_string()))?;
            Ok(SessionCredential {
                access_token,
                expires_at: Utc::now() + Duration::seconds(self.token_ttl_secs as i64),
            })
        }
    }

    impl DomainPort for MockAuthPort {}

    #[async_trait]
    impl HealthCheckable for MockAuthPort {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult {
                adapter_id: "mock-auth-port".to_string(),
                status: AdapterHealth::Healthy,
                latency_ms: 0,
                message: Some("Mock adapter always healthy".to_string()),
                checked_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl AuthPort for MockAuthPort {
        async fn login(&self, username: &str, password: &str) -> Result<LoginSuccess, PortError> {
            let users = self.users.read().await;
            let (expected_password, profile) = users.get(username).ok_or_else(|| {
                PortError::Unauthorized {
                    message: "Unknown username or password".to_string(),
                }
            })?;
            if expected_password != password {
                return Err(PortError::Unauthorized {
                    message: "Unknown username or password".to_string(),
                });
            }

            let session_ref = SessionId::new_v7().to_string();
            self.sessions
                .write()
                .await
                .insert(session_ref.clone(), profile.clone());

            Ok(LoginSuccess {
                credential: self.issue(profile)?,
                session_ref,
                profile: profile.clone(),
            })
        }

        async fn refresh(&self, session_ref: &str) -> Result<SessionCredential, PortError> {
            self.refresh_calls.fetch_add(1, Ordering::Relaxed);
            if self.fail_next_refresh.swap(false, Ordering::Relaxed) {
                return Err(PortError::ServiceUnavailable {
                    service: "auth-service".to_string(),
                });
            }

            let sessions = self.sessions.read().await;
            let profile = sessions
                .get(session_ref)
                .ok_or_else(|| PortError::not_found("Session", session_ref))?;
            self.issue(profile)
        }

        async fn logout(&self, session_ref: &str) -> Result<(), PortError> {
            self.sessions.write().await.remove(session_ref);
            Ok(())
        }
    }
}
