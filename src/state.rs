//! Shared application state: the installed storage backend and degraded flag.

use std::sync::Arc;

use tokio::sync::{RwLock, watch};

use crate::{config::AppConfig, dao::store::MatchStore, error::ServiceError};

/// Cheaply clonable handle to the application state.
pub type SharedState = Arc<AppState>;

/// Central application state storing the storage backend handle and runtime
/// configuration. There is deliberately no in-process game state: every
/// request goes straight to the store.
pub struct AppState {
    store: RwLock<Option<Arc<dyn MatchStore>>>,
    degraded: watch::Sender<bool>,
    config: AppConfig,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a storage backend is installed.
    pub fn new(config: AppConfig) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        Arc::new(Self {
            store: RwLock::new(None),
            degraded: degraded_tx,
            config,
        })
    }

    /// Runtime configuration loaded at startup.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Obtain a handle to the current store, if one is installed.
    pub async fn store(&self) -> Option<Arc<dyn MatchStore>> {
        let guard = self.store.read().await;
        guard.as_ref().cloned()
    }

    /// Obtain the current store or fail with a degraded-mode error.
    pub async fn require_store(&self) -> Result<Arc<dyn MatchStore>, ServiceError> {
        self.store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a new storage backend and leave degraded mode.
    pub async fn install_store(&self, store: Arc<dyn MatchStore>) {
        {
            let mut guard = self.store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false).await;
    }

    /// Remove the current storage backend and enter degraded mode.
    pub async fn clear_store(&self) {
        {
            let mut guard = self.store.write().await;
            guard.take();
        }
        self.update_degraded(true).await;
    }

    /// Current degraded flag.
    pub async fn is_degraded(&self) -> bool {
        *self.degraded.borrow()
    }

    /// Update the degraded flag when the value changes.
    pub async fn update_degraded(&self, value: bool) {
        self.degraded.send_if_modified(|current| {
            let changed = *current != value;
            *current = value;
            changed
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::memory::MemoryMatchStore;

    #[tokio::test]
    async fn starts_degraded_until_a_store_is_installed() {
        let state = AppState::new(AppConfig::default());
        assert!(state.is_degraded().await);
        assert!(matches!(
            state.require_store().await,
            Err(ServiceError::Degraded)
        ));

        state
            .install_store(Arc::new(MemoryMatchStore::new()))
            .await;
        assert!(!state.is_degraded().await);
        assert!(state.require_store().await.is_ok());

        state.clear_store().await;
        assert!(state.is_degraded().await);
    }
}
