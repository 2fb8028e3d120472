//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ApiConfig;
use crate::db::Storage;
use crate::services::auth::{AuthError, CredentialHasher, TokenKeys};
use crate::services::{AuthService, CatalogService, OrderService};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like storage and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    storage: Arc<dyn Storage>,
    hasher: CredentialHasher,
    keys: TokenKeys,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - API configuration
    /// * `storage` - Storage adapter (Postgres in production)
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHash` if the hashing parameters are invalid.
    pub fn new(config: ApiConfig, storage: Arc<dyn Storage>) -> Result<Self, AuthError> {
        let hasher = CredentialHasher::new(config.password_hashing)?;
        let keys = TokenKeys::new(&config.token_secret);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                storage,
                hasher,
                keys,
            }),
        })
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the storage adapter.
    #[must_use]
    pub fn storage(&self) -> &dyn Storage {
        self.inner.storage.as_ref()
    }

    /// Get a reference to the token keys.
    #[must_use]
    pub fn token_keys(&self) -> &TokenKeys {
        &self.inner.keys
    }

    /// Authentication service bound to this state.
    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(self.storage(), &self.inner.hasher, &self.inner.keys)
    }

    /// Catalog service bound to this state.
    #[must_use]
    pub fn catalog(&self) -> CatalogService<'_> {
        CatalogService::new(self.storage())
    }

    /// Order service bound to this state.
    #[must_use]
    pub fn orders(&self) -> OrderService<'_> {
        OrderService::new(self.storage())
    }
}
