//! The cart store: single owner of the cart, its persistence and observers.

use aqpvet_cache::{Cache, CacheError, KvStore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::{CartEvent, CartObserver, CartState, LineItem, SubscriptionId};
use crate::catalog::ProductSnapshot;
use crate::config::CartConfig;
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::{Currency, Money};

/// Version tag written into every persisted snapshot.
pub const PERSISTED_CART_VERSION: u32 = 1;

/// On-storage form of the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersistedCart {
    pub version: u32,
    pub currency: Currency,
    pub items: Vec<LineItem>,
    pub saved_at: DateTime<Utc>,
}

/// Shared shopping cart.
///
/// Every screen that reads or mutates the cart is handed the same
/// `CartStore`. Mutations never fail: unknown product ids are no-ops and a
/// failed storage write is logged while the in-memory cart stays
/// authoritative.
///
/// A mutation that changes the cart is committed, then persisted, then
/// published to observers in subscription order.
///
/// # Example
///
/// ```
/// use aqpvet_cache::MemoryStore;
/// use aqpvet_commerce::prelude::*;
///
/// let mut cart = CartStore::open(MemoryStore::new(), CartConfig::default());
/// let kibble = ProductSnapshot::new(1, "Kibble", Money::new(1000, Currency::PEN));
///
/// cart.add_one(&kibble);
/// cart.add_one(&kibble);
///
/// assert_eq!(cart.total_items(), 2);
/// assert_eq!(cart.total_price().display(), "S/ 20.00");
/// ```
pub struct CartStore<S: KvStore> {
    state: CartState,
    cache: Cache<S>,
    key: String,
    config: CartConfig,
    observers: Vec<(SubscriptionId, Box<dyn CartObserver>)>,
    next_subscription: u64,
    last_saved: Option<DateTime<Utc>>,
}

impl<S: KvStore> CartStore<S> {
    /// Open the cart, rehydrating it from `store` when a snapshot exists.
    ///
    /// A missing, unreadable or incompatible snapshot yields an empty cart.
    /// A `max_quantity_per_item` of 0 is raised to 1.
    pub fn open(store: S, mut config: CartConfig) -> Self {
        if config.max_quantity_per_item == 0 {
            tracing::warn!("max_quantity_per_item is 0, using 1");
            config.max_quantity_per_item = 1;
        }
        let cache = Cache::new(store);
        let key = config.storage_key();

        let (state, last_saved) = match cache.get::<PersistedCart>(&key) {
            Ok(Some(snapshot)) => Self::rehydrate(snapshot, &config),
            Ok(None) => (CartState::new(config.currency), None),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "discarding unreadable cart snapshot");
                (CartState::new(config.currency), None)
            }
        };

        tracing::debug!(
            key = %key,
            items = state.unique_item_count(),
            total_items = state.total_items(),
            "cart opened"
        );

        Self {
            state,
            cache,
            key,
            config,
            observers: Vec::new(),
            next_subscription: 0,
            last_saved,
        }
    }

    fn rehydrate(
        snapshot: PersistedCart,
        config: &CartConfig,
    ) -> (CartState, Option<DateTime<Utc>>) {
        if snapshot.version != PERSISTED_CART_VERSION {
            tracing::warn!(
                version = snapshot.version,
                expected = PERSISTED_CART_VERSION,
                "ignoring cart snapshot with unknown version"
            );
            return (CartState::new(config.currency), None);
        }
        if snapshot.currency != config.currency {
            tracing::warn!(
                stored = %snapshot.currency,
                configured = %config.currency,
                "ignoring cart snapshot priced in another currency"
            );
            return (CartState::new(config.currency), None);
        }

        let state = CartState::from_items(
            config.currency,
            snapshot.items,
            config.max_quantity_per_item,
        );
        (state, Some(snapshot.saved_at))
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Current cart contents.
    pub fn state(&self) -> &CartState {
        &self.state
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        self.state.items()
    }

    /// Get an item by product ID.
    pub fn get(&self, product_id: &ProductId) -> Option<&LineItem> {
        self.state.get(product_id)
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Sum of quantities, for the navigation badge.
    pub fn total_items(&self) -> u64 {
        self.state.total_items()
    }

    /// Sum of `unit_price * quantity`.
    pub fn total_price(&self) -> Money {
        self.state.total_price()
    }

    pub fn currency(&self) -> Currency {
        self.state.currency()
    }

    pub fn config(&self) -> &CartConfig {
        &self.config
    }

    /// Key the cart is persisted under.
    pub fn storage_key(&self) -> &str {
        &self.key
    }

    /// When the cart was last written to storage, if ever.
    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.last_saved
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Add `quantity` units of a product.
    ///
    /// A product already in the cart has its quantity increased; otherwise a
    /// new line item is appended. Quantities are clamped to the configured
    /// maximum. Adding zero units, or a product priced in another currency,
    /// changes nothing. Returns whether the cart changed.
    pub fn add_item(&mut self, product: &ProductSnapshot, quantity: u32) -> bool {
        if product.unit_price().currency != self.state.currency() {
            tracing::warn!(
                product_id = %product.id,
                product_currency = %product.unit_price().currency,
                cart_currency = %self.state.currency(),
                "ignoring product priced in another currency"
            );
            return false;
        }
        let event = self
            .state
            .add(product, quantity, self.config.max_quantity_per_item);
        self.commit(event)
    }

    /// Add a single unit of a product.
    pub fn add_one(&mut self, product: &ProductSnapshot) -> bool {
        self.add_item(product, 1)
    }

    /// Add one unit of a product that is already in the cart.
    pub fn increase_item(&mut self, product_id: &ProductId) -> bool {
        let event = self
            .state
            .increase(product_id, self.config.max_quantity_per_item);
        self.commit(event)
    }

    /// Remove one unit; the line item is deleted when it reaches zero.
    pub fn decrease_item(&mut self, product_id: &ProductId) -> bool {
        let event = self.state.decrease(product_id);
        self.commit(event)
    }

    /// Delete a line item regardless of its quantity.
    pub fn remove_item(&mut self, product_id: &ProductId) -> bool {
        let event = self.state.remove(product_id);
        self.commit(event)
    }

    /// Empty the cart.
    pub fn clear(&mut self) -> bool {
        let event = self.state.clear();
        self.commit(event)
    }

    // ------------------------------------------------------------------
    // Observers
    // ------------------------------------------------------------------

    /// Register an observer for committed changes.
    pub fn subscribe<O>(&mut self, observer: O) -> SubscriptionId
    where
        O: CartObserver + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove an observer. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let len_before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() < len_before
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Write the current cart to storage, reporting any failure.
    ///
    /// Mutations already persist on their own; this is for callers that
    /// need to know the write actually happened.
    pub fn flush(&mut self) -> Result<(), CommerceError> {
        self.persist().map_err(CommerceError::from)
    }

    fn persist(&mut self) -> Result<(), CacheError> {
        let snapshot = PersistedCart {
            version: PERSISTED_CART_VERSION,
            currency: self.state.currency(),
            items: self.state.items().to_vec(),
            saved_at: Utc::now(),
        };
        self.cache.set(&self.key, &snapshot)?;
        self.last_saved = Some(snapshot.saved_at);
        Ok(())
    }

    fn commit(&mut self, event: Option<CartEvent>) -> bool {
        let Some(event) = event else {
            return false;
        };

        tracing::debug!(
            event = ?event,
            total_items = self.state.total_items(),
            "cart changed"
        );

        if let Err(e) = self.persist() {
            tracing::warn!(key = %self.key, error = %e, "cart persistence failed, keeping in-memory state");
        }

        for (_, observer) in self.observers.iter_mut() {
            observer.on_change(&event, &self.state);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aqpvet_cache::MemoryStore;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn product(id: i64, cents: i64) -> ProductSnapshot {
        ProductSnapshot::new(id, format!("Product {id}"), Money::new(cents, Currency::PEN))
    }

    fn open(store: &MemoryStore) -> CartStore<MemoryStore> {
        CartStore::open(store.clone(), CartConfig::default())
    }

    #[test]
    fn test_mutation_persists_snapshot() {
        let storage = MemoryStore::new();
        let mut cart = open(&storage);
        assert!(cart.last_saved().is_none());

        cart.add_item(&product(1, 1000), 2);

        let cache = Cache::new(storage.clone());
        let saved: PersistedCart = cache.get("aqpvet-cart:guest").unwrap().unwrap();
        assert_eq!(saved.version, PERSISTED_CART_VERSION);
        assert_eq!(saved.items, cart.items());
        assert_eq!(cart.last_saved(), Some(saved.saved_at));
    }

    #[test]
    fn test_noop_does_not_write() {
        let storage = MemoryStore::new();
        let mut cart = open(&storage);

        assert!(!cart.decrease_item(&ProductId::new("404")));
        assert!(!cart.add_item(&product(1, 1000), 0));
        assert!(!cart.clear());
        assert!(storage.is_empty());
    }

    #[test]
    fn test_observers_see_committed_state() {
        let mut cart = open(&MemoryStore::new());
        let badge = Rc::new(RefCell::new(Vec::new()));

        let seen = Rc::clone(&badge);
        cart.subscribe(move |_: &CartEvent, state: &CartState| {
            seen.borrow_mut().push(state.total_items());
        });

        cart.add_one(&product(1, 1000));
        cart.add_item(&product(2, 500), 3);
        cart.decrease_item(&ProductId::new("404"));
        cart.decrease_item(&ProductId::new("2"));
        cart.clear();

        assert_eq!(*badge.borrow(), vec![1, 4, 3, 0]);
    }

    #[test]
    fn test_observer_order_and_unsubscribe() {
        let mut cart = open(&MemoryStore::new());
        let log = Rc::new(RefCell::new(Vec::new()));

        let first_log = Rc::clone(&log);
        let first = cart.subscribe(move |e: &CartEvent, _: &CartState| {
            first_log.borrow_mut().push(("first", e.clone()));
        });
        let second_log = Rc::clone(&log);
        cart.subscribe(move |e: &CartEvent, _: &CartState| {
            second_log.borrow_mut().push(("second", e.clone()));
        });

        cart.add_one(&product(1, 1000));
        assert!(cart.unsubscribe(first));
        assert!(!cart.unsubscribe(first));
        cart.remove_item(&ProductId::new("1"));

        let names: Vec<&str> = log.borrow().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["first", "second", "second"]);
        assert_eq!(
            log.borrow()[2].1,
            CartEvent::ItemRemoved {
                product_id: ProductId::new("1")
            }
        );
    }

    #[test]
    fn test_foreign_currency_product_is_ignored() {
        let mut cart = open(&MemoryStore::new());
        let usd = ProductSnapshot::new(1, "Import", Money::new(1000, Currency::USD));

        assert!(!cart.add_one(&usd));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_corrupt_snapshot_starts_empty() {
        let storage = MemoryStore::new();
        storage.set("aqpvet-cart:guest", b"{ not json").unwrap();

        let mut cart = open(&storage);
        assert!(cart.is_empty());

        // The next mutation overwrites the bad snapshot.
        cart.add_one(&product(1, 1000));
        let reopened = open(&storage);
        assert_eq!(reopened.total_items(), 1);
    }

    #[test]
    fn test_snapshot_in_other_currency_is_ignored() {
        let storage = MemoryStore::new();
        let mut cart = open(&storage);
        cart.add_one(&product(1, 1000));

        let config = CartConfig {
            currency: Currency::USD,
            ..CartConfig::default()
        };
        let reopened = CartStore::open(storage.clone(), config);
        assert!(reopened.is_empty());
        assert_eq!(reopened.currency(), Currency::USD);
    }

    #[test]
    fn test_zero_quantity_limit_is_raised_to_one() {
        let storage = MemoryStore::new();
        let config = CartConfig {
            max_quantity_per_item: 0,
            ..CartConfig::default()
        };
        let mut cart = CartStore::open(storage.clone(), config.clone());
        assert_eq!(cart.config().max_quantity_per_item, 1);

        assert!(cart.add_one(&product(1, 1000)));
        assert!(!cart.add_one(&product(1, 1000)));
        assert!(!cart.increase_item(&ProductId::new("1")));
        assert!(cart.items().iter().all(|i| i.quantity == 1));

        let reopened = CartStore::open(storage.clone(), config);
        assert_eq!(reopened.total_items(), 1);
    }

    #[test]
    fn test_namespaces_are_isolated() {
        let storage = MemoryStore::new();
        let mut guest = open(&storage);
        guest.add_one(&product(1, 1000));

        let member = CartStore::open(storage.clone(), CartConfig::for_namespace("user-5"));
        assert!(member.is_empty());
        assert_eq!(member.storage_key(), "aqpvet-cart:user-5");
    }
}
