//! The cart store: authoritative in-memory cart mirrored into key-value storage.
//!
//! Mutations are applied synchronously and are visible to the next read.
//! Every change bumps a revision and wakes the background persister (see
//! [`crate::persist`]), which writes the encoded cart back to storage.
//! [`CartStore::flush`] waits for the persister to catch up.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use gomarket_core::{
    decode_cart, encode_cart, AddOutcome, Cart, DecrementOutcome, LineItem, ProductDescriptor,
    ProductId,
};
use gomarket_store::KeyValueStore;
use tokio::sync::watch;

use crate::config::CartConfig;
use crate::error::{CartError, Result};
use crate::persist::{PersistStatus, Persister};

/// What happened when the stored cart was loaded.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The stored cart replaced the in-memory cart.
    Restored { items: usize },
    /// Nothing was stored under the key.
    Empty,
    /// The stored value could not be decoded; the cart stays empty.
    Discarded { reason: String },
    /// Reading storage failed; the cart stays as it is.
    Unavailable { reason: String },
    /// The cart was mutated before load finished; the in-memory cart wins.
    Superseded,
    /// Load already ran for this store.
    AlreadyLoaded,
}

/// In-memory cart plus the revision counter of its last change.
#[derive(Debug, Default)]
pub(crate) struct Snapshot {
    pub(crate) cart: Cart,
    pub(crate) revision: u64,
}

/// State shared between the store handle and its persister task.
#[derive(Debug, Default)]
pub(crate) struct SharedCart {
    current: RwLock<Snapshot>,
    /// Items known to be in storage, if any.
    stored: Mutex<Option<Vec<LineItem>>>,
}

impl SharedCart {
    pub(crate) fn read<R>(&self, f: impl FnOnce(&Snapshot) -> R) -> R {
        f(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn write<R>(&self, f: impl FnOnce(&mut Snapshot) -> R) -> R {
        f(&mut self.current.write().unwrap_or_else(PoisonError::into_inner))
    }

    pub(crate) fn stored_matches(&self, items: &[LineItem]) -> bool {
        self.stored
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_deref()
            == Some(items)
    }

    pub(crate) fn set_stored(&self, items: Vec<LineItem>) {
        *self.stored.lock().unwrap_or_else(PoisonError::into_inner) = Some(items);
    }
}

/// The cart store.
///
/// Owns the in-memory cart exclusively. Storage holds a best-effort mirror
/// that is only read once, by [`CartStore::load`].
pub struct CartStore<S: KeyValueStore + 'static> {
    shared: Arc<SharedCart>,
    store: Arc<S>,
    config: CartConfig,
    loaded: AtomicBool,
    /// Number of persistence requests sent to the persister.
    requests: AtomicU64,
    changes: watch::Sender<u64>,
    persisted: watch::Receiver<PersistStatus>,
}

impl<S: KeyValueStore + 'static> CartStore<S> {
    /// Create an empty cart store and start its persister.
    ///
    /// Must be called from within a Tokio runtime; [`crate::CartProvider::mount`]
    /// is the public way in. The persister exits once the store is dropped,
    /// after a final write of any pending change.
    pub(crate) fn start(store: S, config: CartConfig) -> Self {
        let shared = Arc::new(SharedCart::default());
        let store = Arc::new(store);
        let (changes, changes_rx) = watch::channel(0);
        let (status_tx, persisted) = watch::channel(PersistStatus::default());

        let persister = Persister::new(
            Arc::clone(&shared),
            Arc::clone(&store),
            &config,
            changes_rx,
            status_tx,
        );
        tokio::spawn(persister.run());

        Self {
            shared,
            store,
            config,
            loaded: AtomicBool::new(false),
            requests: AtomicU64::new(0),
            changes,
            persisted,
        }
    }

    /// Get the store configuration.
    pub fn config(&self) -> &CartConfig {
        &self.config
    }

    /// Get the storage backend.
    pub fn backend(&self) -> &S {
        &self.store
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Load
    // ─────────────────────────────────────────────────────────────────────────

    /// Load the stored cart, once.
    ///
    /// Never fails: storage and decode errors leave the cart as it is and
    /// are reported in the outcome and the log.
    pub async fn load(&self) -> LoadOutcome {
        if self.loaded.swap(true, Ordering::SeqCst) {
            return LoadOutcome::AlreadyLoaded;
        }

        let key = &self.config.storage_key;
        let raw = match self.store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(key = %key, "no stored cart");
                return LoadOutcome::Empty;
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "failed to read stored cart");
                return LoadOutcome::Unavailable {
                    reason: e.to_string(),
                };
            }
        };

        let items = match decode_cart(&raw) {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "discarding undecodable stored cart");
                if self.config.persist_empty {
                    // Let the persister overwrite the bad value with the
                    // current (empty) cart.
                    self.request_persist();
                }
                return LoadOutcome::Discarded {
                    reason: e.to_string(),
                };
            }
        };

        let count = items.len();
        let restored = self.shared.write(|snapshot| {
            if snapshot.revision > 0 {
                return false;
            }
            snapshot.cart = Cart::from_items(items.clone());
            true
        });

        if !restored {
            tracing::warn!(
                key = %key,
                "cart changed before load finished; keeping in-memory cart"
            );
            return LoadOutcome::Superseded;
        }

        self.shared.set_stored(items);
        tracing::debug!(key = %key, items = count, "restored stored cart");
        LoadOutcome::Restored { items: count }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// A copy of the line items, in cart order.
    pub fn products(&self) -> Vec<LineItem> {
        self.shared.read(|s| s.cart.items().to_vec())
    }

    /// Run a closure against the current cart.
    pub fn with_cart<R>(&self, f: impl FnOnce(&Cart) -> R) -> R {
        self.shared.read(|s| f(&s.cart))
    }

    /// The line item for a product, if it is in the cart.
    pub fn get(&self, id: &ProductId) -> Option<LineItem> {
        self.shared.read(|s| s.cart.get(id).cloned())
    }

    /// Sum of quantities over all line items.
    pub fn total_quantity(&self) -> u64 {
        self.shared.read(|s| s.cart.total_quantity())
    }

    /// The cart in its stored JSON form.
    pub fn encoded(&self) -> Result<String> {
        let items = self.products();
        Ok(encode_cart(&items)?)
    }

    /// Revision of the most recent change. Starts at 0.
    pub fn revision(&self) -> u64 {
        self.shared.read(|s| s.revision)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Add one unit of a product to the cart.
    ///
    /// Rejects a non-finite price, and an item already at the quantity limit,
    /// without changing the cart.
    pub fn add_to_cart(&self, product: ProductDescriptor) -> Result<AddOutcome> {
        let policy = self.config.zero_quantity;
        let id = product.id.clone();
        let outcome = self
            .mutate(|cart| match cart.add(product, policy) {
                Ok(outcome) => (Ok(outcome), true),
                Err(e) => (Err(e), false),
            })
            .map_err(|e| self.rejected("add", e.into()))?;
        tracing::debug!(product = %id, ?outcome, "added to cart");
        Ok(outcome)
    }

    /// Add one unit to a product already in the cart.
    pub fn increment(&self, id: &ProductId) -> Result<u32> {
        self.mutate(|cart| match cart.increment(id) {
            Ok(quantity) => (Ok(quantity), true),
            Err(e) => (Err(e), false),
        })
        .map_err(|e| self.rejected("increment", e.into()))
    }

    /// Remove one unit from a product already in the cart. Never drops below 1.
    pub fn decrement(&self, id: &ProductId) -> Result<DecrementOutcome> {
        self.mutate(|cart| match cart.decrement(id) {
            Ok(outcome) => (Ok(outcome), outcome.changed()),
            Err(e) => (Err(e), false),
        })
        .map_err(|e| self.rejected("decrement", e.into()))
    }

    /// Apply a change under the write lock, then wake the persister if the
    /// closure reports that the cart changed.
    fn mutate<T>(&self, f: impl FnOnce(&mut Cart) -> (T, bool)) -> T {
        let (value, changed) = self.shared.write(|snapshot| {
            let (value, changed) = f(&mut snapshot.cart);
            if changed {
                snapshot.revision += 1;
            }
            (value, changed)
        });

        if changed {
            self.request_persist();
        }
        value
    }

    fn request_persist(&self) {
        let request = self.requests.fetch_add(1, Ordering::SeqCst) + 1;
        self.changes.send_replace(request);
    }

    fn rejected(&self, op: &str, error: CartError) -> CartError {
        tracing::warn!(op, error = %error, "cart operation rejected");
        error
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Persistence
    // ─────────────────────────────────────────────────────────────────────────

    /// Status of the most recent persistence pass.
    pub fn persist_status(&self) -> PersistStatus {
        self.persisted.borrow().clone()
    }

    /// Wait until every change made so far has been through a persistence
    /// pass, and return the resulting status.
    ///
    /// Write failures do not make this fail; check
    /// [`PersistStatus::last_error`].
    pub async fn flush(&self) -> PersistStatus {
        let target = self.requests.load(Ordering::SeqCst);
        let mut persisted = self.persisted.clone();

        let reached = match persisted.wait_for(|s| s.handled >= target).await {
            Ok(status) => Some(status.clone()),
            Err(_) => None,
        };
        reached.unwrap_or_else(|| {
            tracing::warn!(target, "persister stopped before flush completed");
            self.persist_status()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gomarket_store::MemoryStore;

    fn shirt() -> ProductDescriptor {
        ProductDescriptor::new("p1", "Shirt", "https://img.example/p1.png", 10.0)
    }

    #[tokio::test]
    async fn test_mutations_are_visible_immediately() {
        let cart = CartStore::start(MemoryStore::new(), CartConfig::default());

        cart.add_to_cart(shirt()).unwrap();
        assert_eq!(cart.products().len(), 1);
        assert_eq!(cart.increment(&ProductId::new("p1")).unwrap(), 2);
        assert_eq!(cart.get(&ProductId::new("p1")).unwrap().quantity, 2);
        assert_eq!(cart.revision(), 2);
    }

    #[tokio::test]
    async fn test_noop_decrement_does_not_bump_revision() {
        let cart = CartStore::start(MemoryStore::new(), CartConfig::default());
        cart.add_to_cart(shirt()).unwrap();

        let outcome = cart.decrement(&ProductId::new("p1")).unwrap();

        assert_eq!(outcome, DecrementOutcome::AtMinimum);
        assert_eq!(cart.revision(), 1);
    }

    #[tokio::test]
    async fn test_missing_item_is_recoverable() {
        let cart = CartStore::start(MemoryStore::new(), CartConfig::default());

        let err = cart.increment(&ProductId::new("missing")).unwrap_err();
        assert!(matches!(err, CartError::ItemNotFound(ref id) if id.as_str() == "missing"));

        let err = cart.decrement(&ProductId::new("missing")).unwrap_err();
        assert!(matches!(err, CartError::ItemNotFound(_)));
        assert_eq!(cart.revision(), 0);
    }

    #[tokio::test]
    async fn test_rejected_add_leaves_cart_unchanged() {
        let cart = CartStore::start(MemoryStore::new(), CartConfig::default());
        cart.add_to_cart(shirt()).unwrap();

        let err = cart
            .add_to_cart(ProductDescriptor::new("p2", "Broken", "", f64::NAN))
            .unwrap_err();

        assert!(matches!(err, CartError::InvalidPrice { ref id, .. } if id.as_str() == "p2"));
        assert_eq!(cart.products().len(), 1);
        assert_eq!(cart.revision(), 1);
    }

    #[tokio::test]
    async fn test_increment_at_limit_is_rejected() {
        let items = vec![shirt().into_line_item(u32::MAX)];
        let backend = MemoryStore::with_entry("@GoMarket:products", encode_cart(&items).unwrap());
        let cart = CartStore::start(backend, CartConfig::default());
        cart.load().await;

        let err = cart.increment(&ProductId::new("p1")).unwrap_err();

        assert!(matches!(err, CartError::QuantityOverflow(_)));
        assert!(matches!(cart.add_to_cart(shirt()), Err(CartError::QuantityOverflow(_))));
        assert_eq!(cart.products(), items);
        assert_eq!(cart.revision(), 0);
    }

    #[tokio::test]
    async fn test_encoded_matches_stored_form() {
        let cart = CartStore::start(MemoryStore::new(), CartConfig::default());
        assert_eq!(cart.encoded().unwrap(), "[]");

        cart.add_to_cart(shirt()).unwrap();
        assert_eq!(
            cart.encoded().unwrap(),
            encode_cart(&[shirt().into_line_item(1)]).unwrap()
        );
    }

    #[tokio::test]
    async fn test_load_restores_stored_cart() {
        let items = vec![shirt().into_line_item(3)];
        let backend = MemoryStore::with_entry("@GoMarket:products", encode_cart(&items).unwrap());
        let cart = CartStore::start(backend, CartConfig::default());

        assert_eq!(cart.load().await, LoadOutcome::Restored { items: 1 });
        assert_eq!(cart.products(), items);
        assert_eq!(cart.load().await, LoadOutcome::AlreadyLoaded);
    }

    #[tokio::test]
    async fn test_load_discards_malformed_json() {
        let backend = MemoryStore::with_entry("@GoMarket:products", "{not json");
        let cart = CartStore::start(backend, CartConfig::default());

        assert!(matches!(cart.load().await, LoadOutcome::Discarded { .. }));
        assert!(cart.products().is_empty());
    }

    #[tokio::test]
    async fn test_load_after_mutation_keeps_memory() {
        let items = vec![ProductDescriptor::new("old", "Old", "", 1.0).into_line_item(1)];
        let backend = MemoryStore::with_entry("@GoMarket:products", encode_cart(&items).unwrap());
        let cart = CartStore::start(backend, CartConfig::default());

        cart.add_to_cart(shirt()).unwrap();

        assert_eq!(cart.load().await, LoadOutcome::Superseded);
        assert_eq!(cart.products()[0].id.as_str(), "p1");
        assert_eq!(cart.products().len(), 1);
    }
}
