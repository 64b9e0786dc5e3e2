use std::sync::Arc;

use crate::core::Config;
use crate::services::{AuthService, ImageService, MenuService, OrderService};
use crate::store::{
    Authenticator, BackendClient, BlobStore, DataStore, RestAuthenticator, RestBlobStore,
    RestStore,
};
use crate::utils::{AppError, AppResult};

/// Desk state - holds every service of the order desk
///
/// Services share their stores through `Arc`, so cloning is cheap.
///
/// # Components
///
/// | Field | Type | Meaning |
/// |-------|------|---------|
/// | config | Config | Settings (immutable) |
/// | orders | OrderService | Order list, status, detail, stats |
/// | menu | MenuService | Categories, foods, sides |
/// | images | ImageService | Image uploads |
/// | auth | AuthService | Sign-in |
///
/// # Example
///
/// ```no_run
/// # async fn run() -> shared::error::AppResult<()> {
/// use order_desk::{Config, DeskState};
///
/// let state = DeskState::connect(Config::from_env())?;
/// let batch = state.orders.load_order_batch().await;
/// println!("{} orders", batch.orders.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct DeskState {
    pub config: Config,
    pub orders: OrderService,
    pub menu: MenuService,
    pub images: ImageService,
    pub auth: AuthService,
}

impl DeskState {
    /// Connect to the hosted backend described by `config`
    pub fn connect(config: Config) -> AppResult<Self> {
        let client = BackendClient::new(&config)
            .map_err(|e| AppError::config(format!("Failed to build HTTP client: {}", e)))?;
        tracing::info!(backend = %config.backend_url, "Using hosted backend");

        Ok(Self::with_stores(
            config,
            Arc::new(RestStore::new(client.clone())),
            Arc::new(RestBlobStore::new(client.clone())),
            Arc::new(RestAuthenticator::new(client)),
        ))
    }

    /// Assemble services over arbitrary stores (in-memory ones in tests)
    pub fn with_stores(
        config: Config,
        store: Arc<dyn DataStore>,
        blobs: Arc<dyn BlobStore>,
        authenticator: Arc<dyn Authenticator>,
    ) -> Self {
        Self {
            orders: OrderService::new(store.clone()),
            menu: MenuService::new(store),
            images: ImageService::new(blobs, config.image_bucket.clone()),
            auth: AuthService::new(authenticator),
            config,
        }
    }
}
