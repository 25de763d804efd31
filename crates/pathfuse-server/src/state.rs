//! Application state with the shared `PathwayService`.
//!
//! The service owns a `rusqlite::Connection`, which is `!Sync`, so it sits
//! behind `Arc<tokio::sync::Mutex<_>>`. The resource registry is immutable
//! after start-up and is shared without a lock so that request validation
//! never waits on the service.

use std::sync::Arc;

use pathfuse_storage::{ManagerRegistry, DEFAULT_RESOURCES};

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::service::PathwayService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<tokio::sync::Mutex<PathwayService>>,
    pub registry: Arc<ManagerRegistry>,
}

impl AppState {
    /// Creates the state for a configured server.
    pub fn new(config: &ServerConfig) -> Result<Self, ApiError> {
        let registry = Arc::new(config.registry());
        let service = PathwayService::new(config, registry.clone())?;
        tracing::info!(
            db_path = %config.db_path,
            resources = ?registry,
            "pathway service ready"
        );
        Ok(AppState::from_service(service, registry))
    }

    /// Creates a state over an in-memory database with the default
    /// resources (for testing).
    pub fn in_memory() -> Result<Self, ApiError> {
        let registry = Arc::new(ManagerRegistry::from_resources(DEFAULT_RESOURCES));
        let service = PathwayService::in_memory(registry.clone())?;
        Ok(AppState::from_service(service, registry))
    }

    pub fn from_service(service: PathwayService, registry: Arc<ManagerRegistry>) -> Self {
        AppState {
            service: Arc::new(tokio::sync::Mutex::new(service)),
            registry,
        }
    }

    /// Runs `f` against the locked service on the blocking thread pool.
    ///
    /// Merges and graph analyses are CPU-bound; they hold the service lock
    /// for their whole run, so requests are still served one at a time.
    pub async fn with_service<F, T>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut PathwayService) -> Result<T, ApiError> + Send + 'static,
        T: Send + 'static,
    {
        let service = self.service.clone();
        tokio::task::spawn_blocking(move || {
            let mut service = service.blocking_lock();
            f(&mut service)
        })
        .await
        .map_err(|e| ApiError::InternalError(format!("analysis task failed: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn with_service_runs_off_the_async_worker() {
        let state = AppState::in_memory().unwrap();
        let count = state
            .with_service(|service| service.count_pathways())
            .await
            .unwrap();
        assert_eq!(count, 0);

        let err = state
            .with_service(|_| -> Result<(), ApiError> {
                Err(ApiError::BadRequest("rejected".to_string()))
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn panicking_task_becomes_internal_error() {
        let state = AppState::in_memory().unwrap();
        let err = state
            .with_service(|_| -> Result<(), ApiError> { panic!("boom") })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InternalError(_)));
    }
}
