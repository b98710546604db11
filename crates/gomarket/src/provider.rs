//! Provider and context: how consumers reach the cart store.
//!
//! A [`CartProvider`] owns the one live [`CartStore`] of an application.
//! Consumers receive a [`CartContext`] from it and call
//! [`CartContext::use_cart`] to get the store. A context created outside any
//! provider, or outliving its provider, fails with
//! [`CartError::StoreNotAvailable`].

use std::fmt;
use std::sync::{Arc, Weak};

use gomarket_store::KeyValueStore;

use crate::cart_store::{CartStore, LoadOutcome};
use crate::config::CartConfig;
use crate::error::{CartError, Result};
use crate::persist::PersistStatus;

/// Owner of a mounted cart store.
pub struct CartProvider<S: KeyValueStore + 'static> {
    store: Arc<CartStore<S>>,
    load: LoadOutcome,
}

impl<S: KeyValueStore + 'static> CartProvider<S> {
    /// Start a cart store over `backend` and load the stored cart.
    ///
    /// Contexts are only handed out after load has finished, so no mutation
    /// can race ahead of it.
    pub async fn mount(backend: S, config: CartConfig) -> Self {
        let store = Arc::new(CartStore::start(backend, config));
        let load = store.load().await;
        tracing::debug!(?load, "cart provider mounted");
        Self { store, load }
    }

    /// A context bound to this provider.
    pub fn context(&self) -> CartContext<S> {
        CartContext {
            store: Arc::downgrade(&self.store),
        }
    }

    /// The mounted store.
    pub fn store(&self) -> &Arc<CartStore<S>> {
        &self.store
    }

    /// How the stored cart was loaded at mount.
    pub fn load_outcome(&self) -> &LoadOutcome {
        &self.load
    }

    /// Flush pending writes and release the store.
    ///
    /// Contexts handed out by this provider stop resolving once no consumer
    /// holds the store any more.
    pub async fn unmount(self) -> PersistStatus {
        let status = self.store.flush().await;
        tracing::debug!(revision = status.revision, "cart provider unmounted");
        status
    }
}

/// A consumer's handle to the nearest cart provider.
pub struct CartContext<S: KeyValueStore + 'static> {
    store: Weak<CartStore<S>>,
}

impl<S: KeyValueStore + 'static> CartContext<S> {
    /// A context with no provider above it.
    pub fn detached() -> Self {
        Self { store: Weak::new() }
    }

    /// The cart store of the enclosing provider.
    pub fn use_cart(&self) -> Result<Arc<CartStore<S>>> {
        self.store.upgrade().ok_or(CartError::StoreNotAvailable)
    }

    /// Whether a live provider is reachable.
    pub fn is_available(&self) -> bool {
        self.store.strong_count() > 0
    }
}

impl<S: KeyValueStore + 'static> Clone for CartContext<S> {
    fn clone(&self) -> Self {
        Self {
            store: Weak::clone(&self.store),
        }
    }
}

impl<S: KeyValueStore + 'static> Default for CartContext<S> {
    fn default() -> Self {
        Self::detached()
    }
}

impl<S: KeyValueStore + 'static> fmt::Debug for CartContext<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartContext")
            .field("available", &self.is_available())
            .finish()
    }
}
