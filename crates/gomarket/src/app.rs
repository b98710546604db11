//! The app shell: composition root of a storefront client.
//!
//! Owns the storage backend through the cart provider and hands contexts to
//! the screens below it. It holds no cart logic of its own.

use std::sync::Arc;

use gomarket_store::KeyValueStore;

use crate::cart_store::CartStore;
use crate::config::CartConfig;
use crate::persist::PersistStatus;
use crate::provider::{CartContext, CartProvider};

/// Top-level application wiring.
pub struct AppShell<S: KeyValueStore + 'static> {
    provider: CartProvider<S>,
}

impl<S: KeyValueStore + 'static> AppShell<S> {
    /// Mount the cart provider over `backend`.
    pub async fn bootstrap(backend: S, config: CartConfig) -> Self {
        let provider = CartProvider::mount(backend, config).await;
        tracing::info!(load = ?provider.load_outcome(), "app shell ready");
        Self { provider }
    }

    /// A cart context for a screen or component.
    pub fn context(&self) -> CartContext<S> {
        self.provider.context()
    }

    /// The mounted cart store.
    pub fn cart(&self) -> &Arc<CartStore<S>> {
        self.provider.store()
    }

    /// The provider, for callers that need the load outcome.
    pub fn provider(&self) -> &CartProvider<S> {
        &self.provider
    }

    /// Flush pending cart writes and tear the app down.
    pub async fn shutdown(self) -> PersistStatus {
        self.provider.unmount().await
    }
}
