use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::models::{CartModel, RepositoryResult};
use crate::observability::Metrics;
use crate::repositories::KeyValueStore;

/// Cart bound to its persisted copy.
///
/// Every mutation writes the whole cart back to the store before returning, so
/// any view rendered afterwards, or any other session reading the same store,
/// sees the new state.
pub struct CartService {
    store: Arc<dyn KeyValueStore>,
    key: String,
    cart: CartModel,
    last_restore: RestoreOutcome,
    metrics: Option<Arc<Metrics>>,
}

/// How the persisted cart was read back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    Restored,
    Missing,
    Discarded,
}

impl RestoreOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RestoreOutcome::Restored => "restored",
            RestoreOutcome::Missing => "missing",
            RestoreOutcome::Discarded => "discarded",
        }
    }
}

impl CartService {
    /// Restore the cart persisted under `key`.
    ///
    /// A missing key, an unreadable store or a value that does not parse as a
    /// cart all yield an empty cart.
    pub fn load(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let mut service = Self {
            store,
            key: key.into(),
            cart: CartModel::new(),
            last_restore: RestoreOutcome::Missing,
            metrics: None,
        };
        service.reload_cart();
        service
    }

    /// Attach metrics, counting the restore already done by `load`
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        metrics.record_cart_restore(self.last_restore.as_str());
        self.metrics = Some(metrics);
        self
    }

    pub fn last_restore(&self) -> RestoreOutcome {
        self.last_restore
    }

    pub fn cart(&self) -> &CartModel {
        &self.cart
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Add one unit of a service and persist
    #[instrument(skip(self), fields(key = %self.key))]
    pub fn add(&mut self, service_id: &str) -> RepositoryResult<()> {
        self.cart.add(service_id);
        debug!(quantity = self.cart.quantity_of(service_id), "Added to cart");
        self.persist_after("add")
    }

    /// Apply a signed quantity change and persist; a service not in the cart is left alone
    #[instrument(skip(self), fields(key = %self.key))]
    pub fn change_quantity(&mut self, service_id: &str, delta: i64) -> RepositoryResult<()> {
        if !self.cart.change_quantity(service_id, delta) {
            debug!("Service not in cart, ignoring quantity change");
            return Ok(());
        }
        debug!(
            quantity = self.cart.quantity_of(service_id),
            "Changed cart quantity"
        );
        self.persist_after("change_quantity")
    }

    /// Empty the cart and persist
    #[instrument(skip(self), fields(key = %self.key))]
    pub fn clear(&mut self) -> RepositoryResult<()> {
        self.cart.clear();
        info!("Cart cleared");
        self.persist_after("clear")
    }

    /// Write the full cart to the store, replacing the previous value
    pub fn persist(&self) -> RepositoryResult<()> {
        let serialized = self.cart.to_json()?;
        self.store.set(&self.key, &serialized)
    }

    /// Re-read the persisted cart, picking up writes made by another session
    pub fn reload(&mut self) {
        self.reload_cart();
        if let Some(metrics) = &self.metrics {
            metrics.record_cart_restore(self.last_restore.as_str());
        }
    }

    fn reload_cart(&mut self) {
        let (cart, outcome) = self.read_persisted();
        self.cart = cart;
        self.last_restore = outcome;
    }

    fn persist_after(&self, operation: &str) -> RepositoryResult<()> {
        let result = self.persist();
        if let Err(e) = &result {
            warn!(operation, error = %e, "Failed to persist cart");
        }
        if let Some(metrics) = &self.metrics {
            metrics.record_cart_operation(operation, result.is_ok());
        }
        result
    }

    fn read_persisted(&self) -> (CartModel, RestoreOutcome) {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %self.key, "No persisted cart");
                return (CartModel::new(), RestoreOutcome::Missing);
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Persisted cart unreadable, starting empty");
                return (CartModel::new(), RestoreOutcome::Discarded);
            }
        };

        match CartModel::from_json(&raw) {
            Ok(cart) => {
                debug!(key = %self.key, entries = cart.len(), "Restored persisted cart");
                (cart, RestoreOutcome::Restored)
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Discarding malformed persisted cart");
                (CartModel::new(), RestoreOutcome::Discarded)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CartEntry, RepositoryError};
    use crate::repositories::InMemoryStore;

    const KEY: &str = "portfolio_cart_v1";

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> RepositoryResult<Option<String>> {
            Err(RepositoryError::LockPoisoned)
        }

        fn set(&self, _key: &str, _value: &str) -> RepositoryResult<()> {
            Err(RepositoryError::LockPoisoned)
        }
    }

    fn entry(id: &str, quantity: u32) -> CartEntry {
        CartEntry {
            service_id: id.to_string(),
            quantity,
        }
    }

    #[test]
    fn test_load_missing_key_is_empty() {
        let service = CartService::load(Arc::new(InMemoryStore::new()), KEY);
        assert!(service.cart().is_empty());
    }

    #[test]
    fn test_load_malformed_value_is_empty() {
        for raw in ["", "null", "{}", "[1,2]", "definitely not json", r#"[{"id":"a"}]"#] {
            let store = Arc::new(InMemoryStore::with_value(KEY, raw));
            let service = CartService::load(store, KEY);
            assert!(service.cart().is_empty(), "expected empty cart for {:?}", raw);
        }
    }

    #[test]
    fn test_load_unreadable_store_is_empty() {
        let service = CartService::load(Arc::new(FailingStore), KEY);
        assert!(service.cart().is_empty());
        assert_eq!(service.last_restore(), RestoreOutcome::Discarded);
    }

    #[test]
    fn test_restore_outcomes() {
        let missing = CartService::load(Arc::new(InMemoryStore::new()), KEY);
        assert_eq!(missing.last_restore(), RestoreOutcome::Missing);

        let store = Arc::new(InMemoryStore::with_value(KEY, r#"[{"id":"A","qty":2}]"#));
        let restored = CartService::load(store, KEY);
        assert_eq!(restored.last_restore(), RestoreOutcome::Restored);
        assert_eq!(restored.cart().quantity_of("A"), 2);
    }

    #[test]
    fn test_mutations_persist() {
        let store = Arc::new(InMemoryStore::new());
        let mut service = CartService::load(store.clone(), KEY);

        service.add("A").unwrap();
        assert_eq!(store.get(KEY).unwrap().unwrap(), r#"[{"id":"A","qty":1}]"#);

        service.change_quantity("A", 2).unwrap();
        assert_eq!(store.get(KEY).unwrap().unwrap(), r#"[{"id":"A","qty":3}]"#);

        service.clear().unwrap();
        assert_eq!(store.get(KEY).unwrap().unwrap(), "[]");
    }

    #[test]
    fn test_noop_change_does_not_write() {
        let store = Arc::new(InMemoryStore::new());
        let mut service = CartService::load(store.clone(), KEY);

        service.change_quantity("missing", -1).unwrap();

        assert_eq!(store.get(KEY).unwrap(), None);
    }

    #[test]
    fn test_restore_after_reload() {
        let store = Arc::new(InMemoryStore::new());
        let mut service = CartService::load(store.clone(), KEY);
        service.add("A").unwrap();
        service.add("B").unwrap();
        service.add("A").unwrap();

        let restored = CartService::load(store, KEY);
        assert_eq!(restored.cart().entries(), &[entry("A", 2), entry("B", 1)]);
    }

    #[test]
    fn test_reload_sees_other_session_writes() {
        let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());
        let mut catalog_page = CartService::load(store.clone(), KEY);
        let mut checkout_page = CartService::load(store, KEY);

        catalog_page.add("A").unwrap();
        assert!(checkout_page.cart().is_empty());

        checkout_page.reload();
        assert_eq!(checkout_page.cart().entries(), &[entry("A", 1)]);
    }

    #[test]
    fn test_persist_failure_is_reported() {
        let mut service = CartService::load(Arc::new(FailingStore), KEY);

        assert!(service.add("A").is_err());
        // The in-memory cart still reflects the mutation
        assert_eq!(service.cart().quantity_of("A"), 1);
    }

    #[test]
    fn test_metrics_recorded() {
        let metrics = Arc::new(Metrics::new().unwrap());
        let mut service =
            CartService::load(Arc::new(InMemoryStore::new()), KEY).with_metrics(metrics.clone());

        service.add("A").unwrap();
        service.clear().unwrap();

        let encoded = metrics.encode().unwrap();
        assert!(encoded.contains(r#"cart_restores_total{outcome="missing"} 1"#));
        assert!(encoded.contains(r#"cart_operations_total{operation="add",status="success"} 1"#));
        assert!(encoded.contains(r#"cart_operations_total{operation="clear",status="success"} 1"#));
    }
}
