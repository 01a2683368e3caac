use serde::{Deserialize, Serialize};

/// Upper bound on a single entry's quantity; increments past it are clamped
pub const MAX_QUANTITY: u32 = u32::MAX;

/// A pending purchase of one service.
///
/// Serialized as `{"id": .., "qty": ..}`, the layout stored under the cart key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    #[serde(rename = "id")]
    pub service_id: String,
    #[serde(rename = "qty")]
    pub quantity: u32,
}

/// Ordered cart contents, in order of each service's first add.
///
/// Holds at most one entry per service id and never stores a quantity of zero.
/// Service ids are not checked against the catalog here; stale ids are skipped
/// by the views instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CartModel {
    entries: Vec<CartEntry>,
}

impl CartModel {
    /// Create an empty cart
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from raw entries, merging repeated ids into the first
    /// occurrence and dropping zero quantities
    pub fn from_entries(entries: impl IntoIterator<Item = CartEntry>) -> Self {
        let mut cart = Self::new();
        for entry in entries {
            if entry.quantity == 0 {
                continue;
            }
            match cart.position(&entry.service_id) {
                Some(index) => {
                    let existing = &mut cart.entries[index];
                    existing.quantity = existing
                        .quantity
                        .saturating_add(entry.quantity)
                        .min(MAX_QUANTITY);
                }
                None => cart.entries.push(entry),
            }
        }
        cart
    }

    /// Parse the persisted representation
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let entries: Vec<CartEntry> = serde_json::from_str(raw)?;
        Ok(Self::from_entries(entries))
    }

    /// Serialize the full ordered entry list
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.entries)
    }

    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// Add one unit of a service, appending a new entry if it is not in the cart yet
    pub fn add(&mut self, service_id: &str) {
        match self.position(service_id) {
            Some(index) => {
                let entry = &mut self.entries[index];
                entry.quantity = entry.quantity.saturating_add(1).min(MAX_QUANTITY);
            }
            None => self.entries.push(CartEntry {
                service_id: service_id.to_string(),
                quantity: 1,
            }),
        }
    }

    /// Apply a signed quantity change, removing the entry when it drops to zero or below.
    ///
    /// Results above [`MAX_QUANTITY`] are clamped to it.
    /// Returns `false` without touching the cart if the service is not in it.
    pub fn change_quantity(&mut self, service_id: &str, delta: i64) -> bool {
        let Some(index) = self.position(service_id) else {
            return false;
        };

        let updated = i64::from(self.entries[index].quantity).saturating_add(delta);
        if updated <= 0 {
            self.entries.remove(index);
        } else {
            let clamped = updated.min(i64::from(MAX_QUANTITY));
            self.entries[index].quantity = u32::try_from(clamped).unwrap_or(MAX_QUANTITY);
        }
        true
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn get(&self, service_id: &str) -> Option<&CartEntry> {
        self.entries
            .iter()
            .find(|entry| entry.service_id == service_id)
    }

    pub fn contains(&self, service_id: &str) -> bool {
        self.get(service_id).is_some()
    }

    /// Quantity held for a service, zero when absent
    pub fn quantity_of(&self, service_id: &str) -> u32 {
        self.get(service_id).map(|entry| entry.quantity).unwrap_or(0)
    }

    /// Sum of all quantities, including entries the catalog may no longer know
    pub fn total_quantity(&self) -> u64 {
        self.entries
            .iter()
            .map(|entry| u64::from(entry.quantity))
            .sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, service_id: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.service_id == service_id)
    }
}
