//! Registry Gateway Adapter
//!
//! This module provides the adapter that connects the registration domain
//! to the remote registry backend via REST. It implements both the
//! [`ExistenceCheckPort`] and the [`PersonPersistencePort`], translating
//! between the backend's wire format and the domain model.
//!
//! # Error Handling
//!
//! Backend errors are mapped to `PortError` variants and never escape in
//! their raw wire shape:
//! - 404 -> `PortError::NotFound`
//! - 401/403 -> `PortError::Unauthorized`
//! - 409 -> `PortError::Conflict`
//! - 5xx -> `PortError::ServiceUnavailable`
//! - Timeouts -> `PortError::Timeout`
//! - Other -> `PortError::Internal`
//!
//! The circuit breaker opens after a configured number of consecutive
//! failures and half-opens after a reset timeout, so a dead backend fails
//! fast instead of stacking up timeouts.

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{instrument, warn};

use registry_kernel::{
    AdapterHealth, CircuitBreakerConfig, DomainPort, HealthCheckable, HealthCheckResult,
    OperationMetadata, PersonId, PortError,
};
use domain_identity::DocumentType;

use crate::draft::PersonDraft;
use crate::ports::{ExistenceCheckPort, PersonPersistencePort};
use crate::workflow::{ExistenceOutcome, PersonSummary};

/// Configuration for the registry gateway adapter
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryGatewayConfig {
    /// Base URL of the registry backend (e.g. "https://linc.example.gov/api/v1")
    pub base_url: String,

    /// Bearer credential presented on every request
    pub credential: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Number of retry attempts for transient failures
    pub retry_attempts: u32,

    /// Circuit breaker configuration
    pub circuit_breaker: Option<CircuitBreakerConfig>,
}

impl Default for RegistryGatewayConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            credential: String::new(),
            timeout_secs: 30,
            retry_attempts: 3,
            circuit_breaker: Some(CircuitBreakerConfig::default()),
        }
    }
}

impl RegistryGatewayConfig {
    /// Loads configuration from `LINC_GATEWAY_*` environment variables
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("LINC_GATEWAY"))
            .build()?
            .try_deserialize()
    }
}

/// Circuit breaker state for fault tolerance
#[derive(Debug)]
struct CircuitBreaker {
    config: CircuitBreakerConfig,
    failure_count: AtomicU64,
    success_count: AtomicU64,
    is_open: AtomicBool,
    last_failure_time: RwLock<Option<Instant>>,
}

impl CircuitBreaker {
    fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            config,
            failure_count: AtomicU64::new(0),
            success_count: AtomicU64::new(0),
            is_open: AtomicBool::new(false),
            last_failure_time: RwLock::new(None),
        }
    }

    async fn is_available(&self) -> bool {
        if !self.is_open.load(Ordering::Relaxed) {
            return true;
        }

        // Check if timeout has elapsed
        let last_failure = self.last_failure_time.read().await;
        if let Some(time) = *last_failure {
            if time.elapsed() > Duration::from_secs(self.config.reset_timeout_secs) {
                // Half-open state: allow one request through
                return true;
            }
        }

        false
    }

    fn record_success(&self) {
        self.failure_count.store(0, Ordering::Relaxed);
        let success = self.success_count.fetch_add(1, Ordering::Relaxed) + 1;
        if success >= self.config.success_threshold as u64 {
            self.is_open.store(false, Ordering::Relaxed);
            self.success_count.store(0, Ordering::Relaxed);
        }
    }

    async fn record_failure(&self) {
        self.success_count.store(0, Ordering::Relaxed);
        let failures = self.failure_count.fetch_add(1, Ordering::Relaxed) + 1;
        if failures >= self.config.failure_threshold as u64 {
            if !self.is_open.swap(true, Ordering::Relaxed) {
                warn!("registry gateway circuit breaker opened");
            }
            *self.last_failure_time.write().await = Some(Instant::now());
        }
    }
}

// ============================================================================
// Wire format
// ============================================================================

/// Existence-check response as the backend serializes it
#[derive(Debug, Serialize, Deserialize)]
struct ExistencePayload {
    exists: bool,
    #[serde(rename = "personSummary")]
    person_summary: Option<PersonSummaryPayload>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PersonSummaryPayload {
    id: PersonId,
    #[serde(rename = "displayName")]
    display_name: String,
    #[serde(rename = "natureCode")]
    nature_code: String,
    #[serde(rename = "isActive")]
    is_active: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedPayload {
    id: PersonId,
}

impl ExistencePayload {
    fn into_outcome(self) -> Result<ExistenceOutcome, PortError> {
        if !self.exists {
            return Ok(ExistenceOutcome::NoMatch);
        }
        let payload = self.person_summary.ok_or_else(|| {
            PortError::internal("Backend reported a match without a person summary")
        })?;
        let nature = payload
            .nature_code
            .parse()
            .map_err(|_| PortError::internal(format!(
                "Backend returned unknown nature code {}",
                payload.nature_code
            )))?;
        Ok(ExistenceOutcome::Match(PersonSummary {
            id: payload.id,
            display_name: payload.display_name,
            nature,
            is_active: payload.is_active,
        }))
    }
}

// ============================================================================
// Adapter
// ============================================================================

/// Adapter for the remote registry backend
///
/// # Example
///
/// ```rust,ignore
/// use domain_registration::adapters::{RegistryGatewayAdapter, RegistryGatewayConfig};
///
/// let adapter = RegistryGatewayAdapter::new(RegistryGatewayConfig::from_env()?);
/// let outcome = adapter.lookup(DocumentType::NationalId, "8001015009087", None).await?;
/// ```
#[derive(Debug)]
pub struct RegistryGatewayAdapter {
    config: RegistryGatewayConfig,
    circuit_breaker: Option<Arc<CircuitBreaker>>,
}

impl RegistryGatewayAdapter {
    /// Creates a new gateway adapter with the given configuration
    pub fn new(config: RegistryGatewayConfig) -> Self {
        let circuit_breaker = config
            .circuit_breaker
            .clone()
            .map(|cb| Arc::new(CircuitBreaker::new(cb)));

        Self {
            config,
            circuit_breaker,
        }
    }

    /// Returns the base URL of the registry backend
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Checks if the circuit breaker is open (blocking requests)
    pub async fn is_circuit_open(&self) -> bool {
        if let Some(ref cb) = self.circuit_breaker {
            !cb.is_available().await
        } else {
            false
        }
    }

    async fn guard(&self) -> Result<(), PortError> {
        if let Some(ref cb) = self.circuit_breaker {
            if !cb.is_available().await {
                return Err(PortError::ServiceUnavailable {
                    service: "registry gateway circuit breaker is open".to_string(),
                });
            }
        }
        Ok(())
    }

    async fn record(&self, result: &Result<impl Sized, PortError>) {
        if let Some(ref cb) = self.circuit_breaker {
            match result {
                Ok(_) => cb.record_success(),
                Err(e) if e.is_transient() => cb.record_failure().await,
                Err(_) => {}
            }
        }
    }

    /// Makes an HTTP GET request to the backend
    ///
    /// This is the transport seam. The deployment wires in its HTTP client
    /// here; the checked-in build has no live backend to call.
    async fn get<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T, PortError> {
        self.guard().await?;

        // let url = format!("{}/{}", self.config.base_url, path);
        // let response = self.client.get(&url)
        //     .bearer_auth(&self.config.credential)
        //     .timeout(Duration::from_secs(self.config.timeout_secs))
        //     .send()
        //     .await?;

        let result = Err(PortError::internal(format!(
            "Registry gateway transport not configured: GET {path}"
        )));
        self.record(&result).await;
        result
    }

    /// Makes an HTTP POST request to the backend
    async fn post<T, R>(&self, path: &str, _body: &T) -> Result<R, PortError>
    where
        T: Serialize,
        R: for<'de> Deserialize<'de>,
    {
        self.guard().await?;

        let result = Err(PortError::internal(format!(
            "Registry gateway transport not configured: POST {path}"
        )));
        self.record(&result).await;
        result
    }

    /// Makes an HTTP PUT request to the backend
    async fn put<T, R>(&self, path: &str, _body: &T) -> Result<R, PortError>
    where
        T: Serialize,
        R: for<'de> Deserialize<'de>,
    {
        self.guard().await?;

        let result = Err(PortError::internal(format!(
            "Registry gateway transport not configured: PUT {path}"
        )));
        self.record(&result).await;
        result
    }
}

impl DomainPort for RegistryGatewayAdapter {}

#[async_trait]
impl HealthCheckable for RegistryGatewayAdapter {
    /// Reports gateway health, degraded while the circuit is open
    async fn health_check(&self) -> HealthCheckResult {
        let start = Instant::now();

        if self.is_circuit_open().await {
            return HealthCheckResult {
                adapter_id: "registry-gateway".to_string(),
                status: AdapterHealth::Degraded,
                latency_ms: 0,
                message: Some("Circuit breaker is open".to_string()),
                checked_at: Utc::now(),
            };
        }

        let result = self.get::<serde_json::Value>("health").await;
        let latency_ms = start.elapsed().as_millis() as u64;

        let (status, message) = match result {
            Ok(_) => (AdapterHealth::Healthy, None),
            Err(e) => (AdapterHealth::Unhealthy, Some(e.to_string())),
        };

        HealthCheckResult {
            adapter_id: "registry-gateway".to_string(),
            status,
            latency_ms,
            message,
            checked_at: Utc::now(),
        }
    }
}

#[async_trait]
impl ExistenceCheckPort for RegistryGatewayAdapter {
    #[instrument(skip(self, _metadata))]
    async fn lookup(
        &self,
        document_type: DocumentType,
        number: &str,
        _metadata: Option<OperationMetadata>,
    ) -> Result<ExistenceOutcome, PortError> {
        let path = format!(
            "persons/existence?documentType={}&number={}",
            document_type.code(),
            number
        );
        let payload: ExistencePayload = self.get(&path).await?;
        payload.into_outcome()
    }
}

#[async_trait]
impl PersonPersistencePort for RegistryGatewayAdapter {
    #[instrument(skip(self, draft, _metadata))]
    async fn create(
        &self,
        draft: &PersonDraft,
        _metadata: Option<OperationMetadata>,
    ) -> Result<PersonId, PortError> {
        let persisted: PersistedPayload = self.post("persons", draft).await?;
        Ok(persisted.id)
    }

    #[instrument(skip(self, draft, _metadata))]
    async fn update(
        &self,
        person_id: PersonId,
        draft: &PersonDraft,
        _metadata: Option<OperationMetadata>,
    ) -> Result<PersonId, PortError> {
        let path = format!("persons/{person_id}");
        let persisted: PersistedPayload = self.put(&path, draft).await?;
        Ok(persisted.id)
    }
}
