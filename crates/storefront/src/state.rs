//! Application state shared across handlers.

use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use sr_robot_core::{Cart, Favorites, KeyValueStore, Product, ProductDraft, ProductId};
use tracing::instrument;

use crate::config::StorefrontConfig;
use crate::error::AppError;
use crate::services::auth::{self, AuthError, AuthService};
use crate::services::store::StoreService;

/// Per-shopper state: the session plus cart and favorites.
pub struct ShopperSession {
    pub auth: AuthService,
    pub cart: Cart,
    pub favorites: Favorites,
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. The process serves a single shopper, so the
/// cart, favorites and signed-in user live here rather than per request.
///
/// Locks are taken store first, then session, and are never held across an
/// `.await`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    store: RwLock<StoreService>,
    session: Mutex<ShopperSession>,
}

impl AppState {
    /// Create application state over `products`, resuming any session saved
    /// in `kv`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the persisted session cannot be read.
    pub fn new(
        config: StorefrontConfig,
        kv: Arc<dyn KeyValueStore>,
        products: Vec<Product>,
    ) -> Result<Self, AuthError> {
        let verifier = auth::verifier_for(config.admin.as_ref());
        let auth = AuthService::restore(kv, verifier)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                store: RwLock::new(StoreService::new(products)),
                session: Mutex::new(ShopperSession {
                    auth,
                    cart: Cart::new(),
                    favorites: Favorites::new(),
                }),
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Read access to the catalog and orders.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Internal` if the lock is poisoned.
    pub fn store(&self) -> Result<RwLockReadGuard<'_, StoreService>, AppError> {
        self.inner
            .store
            .read()
            .map_err(|_| AppError::Internal("store lock poisoned".to_string()))
    }

    /// Write access to the catalog and orders.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Internal` if the lock is poisoned.
    pub fn store_mut(&self) -> Result<RwLockWriteGuard<'_, StoreService>, AppError> {
        self.inner
            .store
            .write()
            .map_err(|_| AppError::Internal("store lock poisoned".to_string()))
    }

    /// The shopper session.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Internal` if the lock is poisoned.
    pub fn session(&self) -> Result<MutexGuard<'_, ShopperSession>, AppError> {
        self.inner
            .session
            .lock()
            .map_err(|_| AppError::Internal("session lock poisoned".to_string()))
    }

    /// Wait out the configured artificial delay for admin mutations.
    pub async fn simulate_latency(&self) {
        let delay = self.inner.config.simulated_latency;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    /// Add one unit of a catalog product to the cart and return the cart.
    ///
    /// The store stays read-locked until the line is added, so a concurrent
    /// delete cannot leave the product in the cart.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ProductNotFound` for ids not in the catalog.
    pub fn add_to_cart(&self, id: &ProductId) -> Result<Cart, AppError> {
        let store = self.store()?;
        let product = store.product(id)?;
        let mut session = self.session()?;
        session.cart.add_to_cart(product);
        Ok(session.cart.clone())
    }

    /// Flip a catalog product's favorite flag.
    ///
    /// Returns whether the product is now a favorite, with the resulting
    /// list. Locks are held as in [`Self::add_to_cart`].
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ProductNotFound` for ids not in the catalog.
    pub fn toggle_favorite(&self, id: &ProductId) -> Result<(bool, Favorites), AppError> {
        let store = self.store()?;
        let product = store.product(id)?;
        let mut session = self.session()?;
        let favorite = session.favorites.toggle(product);
        Ok((favorite, session.favorites.clone()))
    }

    /// Edit a product and refresh its snapshot in the cart and favorites.
    ///
    /// # Errors
    ///
    /// Returns the store error for unknown ids or invalid drafts.
    #[instrument(skip(self, draft))]
    pub fn update_product(&self, id: &ProductId, draft: ProductDraft) -> Result<Product, AppError> {
        let mut store = self.store_mut()?;
        let product = store.update_product(id, draft)?;
        let mut session = self.session()?;
        session.cart.sync_product(&product);
        session.favorites.sync_product(&product);
        Ok(product)
    }

    /// Delete a product and drop it from the cart and favorites.
    ///
    /// # Errors
    ///
    /// Returns the store error for unknown ids.
    #[instrument(skip(self))]
    pub fn delete_product(&self, id: &ProductId) -> Result<Product, AppError> {
        let mut store = self.store_mut()?;
        let product = store.delete_product(id)?;
        let mut session = self.session()?;
        session.cart.remove_from_cart(id);
        session.favorites.remove(id);
        Ok(product)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use sr_robot_core::MemoryStore;

    use super::*;
    use crate::seed;

    fn state() -> AppState {
        AppState::new(
            StorefrontConfig::default(),
            Arc::new(MemoryStore::new()),
            seed::catalog(),
        )
        .unwrap()
    }

    #[test]
    fn test_delete_product_cascades_to_cart_and_favorites() {
        let state = state();
        let product = state.store().unwrap().products()[0].clone();
        {
            let mut session = state.session().unwrap();
            session.cart.add_to_cart(&product);
            session.favorites.add(&product);
        }

        state.delete_product(&product.id).unwrap();

        let session = state.session().unwrap();
        assert!(session.cart.is_empty());
        assert!(session.favorites.is_empty());
        assert!(state.store().unwrap().product(&product.id).is_err());
    }

    #[test]
    fn test_update_product_refreshes_snapshots() {
        let state = state();
        let product = state.store().unwrap().products()[1].clone();
        state.session().unwrap().cart.add_to_cart(&product);

        let mut draft = ProductDraft::from(&product);
        draft.name = "Parlante Renovado".to_string();
        state.update_product(&product.id, draft).unwrap();

        let session = state.session().unwrap();
        assert_eq!(session.cart.lines()[0].product.name, "Parlante Renovado");
    }

    #[test]
    fn test_add_to_cart_requires_catalog_product() {
        let state = state();
        let id = state.store().unwrap().products()[2].id.clone();

        state.add_to_cart(&id).unwrap();
        let cart = state.add_to_cart(&id).unwrap();
        assert_eq!(cart.quantity_of(&id), Some(2));

        state.delete_product(&id).unwrap();
        assert!(state.add_to_cart(&id).is_err());
        assert!(state.toggle_favorite(&id).is_err());

        let session = state.session().unwrap();
        assert!(session.cart.is_empty());
        assert!(session.favorites.is_empty());
    }

    #[test]
    fn test_concurrent_delete_never_leaves_stale_lines() {
        let state = state();
        let ids: Vec<ProductId> = state
            .store()
            .unwrap()
            .products()
            .iter()
            .map(|p| p.id.clone())
            .collect();

        std::thread::scope(|scope| {
            for id in &ids {
                let state = &state;
                scope.spawn(move || {
                    for _ in 0..50 {
                        let _ = state.add_to_cart(id);
                        let _ = state.toggle_favorite(id);
                    }
                });
                scope.spawn(move || {
                    let _ = state.delete_product(id);
                });
            }
        });

        let store = state.store().unwrap();
        let session = state.session().unwrap();
        assert!(store.products().is_empty());
        assert!(session.cart.is_empty());
        assert!(session.favorites.is_empty());
    }
}
