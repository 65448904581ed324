//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ApiConfig;
use crate::db::Stores;
use crate::services::auth::{AuthService, TokenService};
use crate::services::catalog::CatalogService;
use crate::services::orders::OrderService;
use crate::services::reviews::ReviewService;
use crate::services::users::UserAdminService;
use crate::uploads::ImageStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the stores, the token service and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    stores: Stores,
    tokens: TokenService,
    images: ImageStore,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - API configuration
    /// * `stores` - Store implementations (`PostgreSQL` or in-memory)
    #[must_use]
    pub fn new(config: ApiConfig, stores: Stores) -> Self {
        let tokens = TokenService::new(&config.token);
        let images = ImageStore::new(config.upload_dir.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                stores,
                tokens,
                images,
            }),
        }
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the stores.
    #[must_use]
    pub fn stores(&self) -> &Stores {
        &self.inner.stores
    }

    /// Get a reference to the token service.
    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.inner.tokens
    }

    /// Get a reference to the image store.
    #[must_use]
    pub fn images(&self) -> &ImageStore {
        &self.inner.images
    }

    /// Authentication service over this state.
    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(self.inner.stores.users.as_ref(), &self.inner.tokens)
    }

    /// Catalog service over this state.
    #[must_use]
    pub fn catalog(&self) -> CatalogService<'_> {
        CatalogService::new(self.inner.stores.products.as_ref(), &self.inner.images)
    }

    /// Order service over this state.
    #[must_use]
    pub fn orders(&self) -> OrderService<'_> {
        OrderService::new(self.inner.stores.orders.as_ref())
    }

    /// Review service over this state.
    #[must_use]
    pub fn reviews(&self) -> ReviewService<'_> {
        ReviewService::new(
            self.inner.stores.reviews.as_ref(),
            self.inner.stores.products.as_ref(),
        )
    }

    /// User administration service over this state.
    #[must_use]
    pub fn users(&self) -> UserAdminService<'_> {
        UserAdminService::new(self.inner.stores.users.as_ref())
    }
}
