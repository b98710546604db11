//! Background persistence of the cart.
//!
//! One persister task runs per cart store. It sleeps until the store requests
//! a pass, optionally waits out a debounce window so bursts of changes
//! collapse into one write, then writes the encoded cart if it differs from
//! what is known to be stored.

use std::sync::Arc;
use std::time::Duration;

use gomarket_core::encode_cart;
use gomarket_store::KeyValueStore;
use tokio::sync::watch;

use crate::cart_store::SharedCart;
use crate::config::CartConfig;

/// Outcome of the most recent persistence pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistStatus {
    /// Highest cart revision that has been through a persistence pass.
    pub revision: u64,
    /// Number of successful writes to storage.
    pub writes: u64,
    /// Error of the most recent failed write, cleared by the next success.
    pub last_error: Option<String>,
    /// Highest persistence request handled.
    pub(crate) handled: u64,
}

/// Why a pass did or did not write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    Written,
    Unchanged,
    SkippedEmpty,
    Failed,
}

pub(crate) struct Persister<S: KeyValueStore + 'static> {
    shared: Arc<SharedCart>,
    store: Arc<S>,
    key: String,
    debounce: Option<Duration>,
    persist_empty: bool,
    changes: watch::Receiver<u64>,
    status: watch::Sender<PersistStatus>,
}

impl<S: KeyValueStore + 'static> Persister<S> {
    pub(crate) fn new(
        shared: Arc<SharedCart>,
        store: Arc<S>,
        config: &CartConfig,
        changes: watch::Receiver<u64>,
        status: watch::Sender<PersistStatus>,
    ) -> Self {
        Self {
            shared,
            store,
            key: config.storage_key.clone(),
            debounce: config.persist_debounce,
            persist_empty: config.persist_empty,
            changes,
            status,
        }
    }

    pub(crate) async fn run(mut self) {
        let mut handled = 0;
        loop {
            if self.changes.changed().await.is_err() {
                // Store dropped: one last pass for anything not yet written.
                let request = *self.changes.borrow();
                if request > handled {
                    self.persist_once(request).await;
                }
                tracing::debug!(key = %self.key, "cart persister stopped");
                return;
            }

            if let Some(delay) = self.debounce {
                tokio::time::sleep(delay).await;
            }
            handled = *self.changes.borrow_and_update();
            self.persist_once(handled).await;
        }
    }

    async fn persist_once(&self, request: u64) -> Pass {
        let (items, revision) = self
            .shared
            .read(|s| (s.cart.items().to_vec(), s.revision));

        let pass = if items.is_empty() && !self.persist_empty {
            Pass::SkippedEmpty
        } else if self.shared.stored_matches(&items) {
            Pass::Unchanged
        } else {
            self.write(items).await
        };

        tracing::debug!(key = %self.key, revision, ?pass, "persistence pass");

        self.status.send_modify(|status| {
            status.revision = status.revision.max(revision);
            status.handled = status.handled.max(request);
            match pass {
                Pass::Written => {
                    status.writes += 1;
                    status.last_error = None;
                }
                Pass::Failed | Pass::Unchanged | Pass::SkippedEmpty => {}
            }
        });
        pass
    }

    async fn write(&self, items: Vec<gomarket_core::LineItem>) -> Pass {
        let encoded = match encode_cart(&items) {
            Ok(encoded) => encoded,
            Err(e) => {
                self.record_failure(e.to_string());
                return Pass::Failed;
            }
        };

        match self.store.set(&self.key, &encoded).await {
            Ok(()) => {
                self.shared.set_stored(items);
                Pass::Written
            }
            Err(e) => {
                self.record_failure(e.to_string());
                Pass::Failed
            }
        }
    }

    fn record_failure(&self, error: String) {
        tracing::warn!(key = %self.key, error = %error, "failed to persist cart");
        self.status
            .send_modify(|status| status.last_error = Some(error));
    }
}
