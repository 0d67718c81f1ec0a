//! In-memory product store with change notification.
//!
//! The store owns the product collection as a sequence of immutable
//! snapshots. Every mutation builds a new snapshot and swaps it in; readers
//! holding an older [`Snapshot`] keep seeing exactly what they were handed.
//!
//! After each effective mutation the store notifies, in this order:
//! 1. synchronous listeners registered with [`ProductStore::subscribe`];
//! 2. channel subscriptions created with [`ProductStore::watch`].
//!
//! Both happen before the mutating call returns. Mutations that target an
//! unknown id change nothing and notify nobody.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use loomcraft_core::{Clock, Entity, ProductId, SystemClock};
use loomcraft_events::{Event, EventBus, InMemoryEventBus, ListenerHandle, Listeners, Subscription};

use crate::config::CatalogConfig;
use crate::product::{Product, ProductFormData, ProductPatch, StockPolicy};
use crate::seed;

/// Immutable view of the collection at one point in time (newest first).
pub type Snapshot = Arc<[Product]>;

/// What a mutation did. Carries the product as it is after the change
/// (or, for deletions, as it was when removed).
#[derive(Debug, Clone, PartialEq)]
pub enum ProductChange {
    Added {
        product: Product,
        occurred_at: DateTime<Utc>,
    },
    Updated {
        product: Product,
        occurred_at: DateTime<Utc>,
    },
    Deleted {
        product: Product,
        occurred_at: DateTime<Utc>,
    },
}

impl ProductChange {
    pub fn product(&self) -> &Product {
        match self {
            ProductChange::Added { product, .. }
            | ProductChange::Updated { product, .. }
            | ProductChange::Deleted { product, .. } => product,
        }
    }

    pub fn product_id(&self) -> ProductId {
        self.product().id_typed()
    }
}

impl Event for ProductChange {
    fn event_type(&self) -> &'static str {
        match self {
            ProductChange::Added { .. } => "catalog.product.added",
            ProductChange::Updated { .. } => "catalog.product.updated",
            ProductChange::Deleted { .. } => "catalog.product.deleted",
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            ProductChange::Added { occurred_at, .. }
            | ProductChange::Updated { occurred_at, .. }
            | ProductChange::Deleted { occurred_at, .. } => *occurred_at,
        }
    }
}

/// Single source of truth for the product collection.
pub struct ProductStore {
    products: RwLock<Snapshot>,
    policy: StockPolicy,
    clock: Arc<dyn Clock>,
    listeners: Listeners<ProductChange>,
    bus: InMemoryEventBus<ProductChange>,
}

impl ProductStore {
    /// Store holding `initial` (kept in the given order).
    ///
    /// Each product's status is re-derived under the configured policy so the
    /// quantity/status invariant holds from the first read.
    pub fn new(initial: impl IntoIterator<Item = Product>, config: &CatalogConfig) -> Self {
        let policy = config.stock;
        let products: Vec<Product> = initial
            .into_iter()
            .map(|p| p.restamped(&policy))
            .collect();

        tracing::debug!(count = products.len(), "product store initialized");

        Self {
            products: RwLock::new(Arc::from(products)),
            policy,
            clock: Arc::new(SystemClock),
            listeners: Listeners::new(),
            bus: InMemoryEventBus::new(),
        }
    }

    /// Store pre-loaded with the seed catalog.
    pub fn seeded(config: &CatalogConfig) -> Self {
        Self::new(seed::initial_products(&config.stock), config)
    }

    /// Replace the time source used to stamp new products and changes.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn policy(&self) -> &StockPolicy {
        &self.policy
    }

    /// Current snapshot.
    pub fn list(&self) -> Snapshot {
        match self.products.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    pub fn get(&self, id: ProductId) -> Option<Product> {
        let snapshot = self.list();
        position(&snapshot, id).map(|index| snapshot[index].clone())
    }

    pub fn len(&self) -> usize {
        self.list().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Create a product from `form` and put it at the front of the list.
    pub fn add(&self, form: ProductFormData) -> Product {
        let now = self.clock.now();
        let product = Product::new(ProductId::new(), form, now, &self.policy);

        self.replace(|current| {
            let mut next = Vec::with_capacity(current.len() + 1);
            next.push(product.clone());
            next.extend(current.iter().cloned());
            Some(next)
        });

        tracing::debug!(product_id = %product.id_typed(), name = product.name(), "product added");
        self.publish(ProductChange::Added {
            product: product.clone(),
            occurred_at: now,
        });
        product
    }

    /// Merge `patch` into the product with `id`.
    ///
    /// Returns the updated product, or `None` (and changes nothing) when no
    /// product has that id.
    pub fn update(&self, id: ProductId, patch: ProductPatch) -> Option<Product> {
        let mut updated = None;
        self.replace(|current| {
            let index = position(current, id)?;
            let merged = current[index].merged(&patch, &self.policy);
            let mut next = current.to_vec();
            next[index] = merged.clone();
            updated = Some(merged);
            Some(next)
        });

        let Some(product) = updated else {
            tracing::warn!(product_id = %id, "update ignored: unknown product");
            return None;
        };

        tracing::debug!(product_id = %id, status = product.status().label(), "product updated");
        self.publish(ProductChange::Updated {
            product: product.clone(),
            occurred_at: self.clock.now(),
        });
        Some(product)
    }

    /// Remove the product with `id`.
    ///
    /// Returns the removed product, or `None` (and changes nothing) when no
    /// product has that id.
    pub fn delete(&self, id: ProductId) -> Option<Product> {
        let mut removed = None;
        self.replace(|current| {
            let index = position(current, id)?;
            let mut next = current.to_vec();
            removed = Some(next.remove(index));
            Some(next)
        });

        let Some(product) = removed else {
            tracing::warn!(product_id = %id, "delete ignored: unknown product");
            return None;
        };

        tracing::debug!(product_id = %id, "product deleted");
        self.publish(ProductChange::Deleted {
            product: product.clone(),
            occurred_at: self.clock.now(),
        });
        Some(product)
    }

    /// Register a listener called synchronously after every effective
    /// mutation. Dropping the handle deregisters it.
    pub fn subscribe<F>(&self, listener: F) -> ListenerHandle<ProductChange>
    where
        F: Fn(&ProductChange) + Send + Sync + 'static,
    {
        self.listeners.subscribe(listener)
    }

    /// Channel subscription receiving a copy of every change from now on.
    pub fn watch(&self) -> Subscription<ProductChange> {
        self.bus.subscribe()
    }

    /// Swap in the snapshot produced by `build`, if it produces one.
    ///
    /// The write lock is held only while building; listeners run afterwards.
    fn replace<F>(&self, build: F)
    where
        F: FnOnce(&[Product]) -> Option<Vec<Product>>,
    {
        let mut guard = match self.products.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(next) = build(&guard) {
            *guard = Arc::from(next);
        }
    }

    fn publish(&self, change: ProductChange) {
        self.listeners.notify(&change);
        if let Err(e) = self.bus.publish(change) {
            tracing::warn!(error = %e, "failed to publish product change");
        }
    }
}

fn position(products: &[Product], id: ProductId) -> Option<usize> {
    products.iter().position(|p| *p.id() == id)
}

impl core::fmt::Debug for ProductStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProductStore")
            .field("products", &self.len())
            .field("policy", &self.policy)
            .field("listeners", &self.listeners)
            .finish()
    }
}
