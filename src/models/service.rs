use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A sellable catalog offering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: Decimal,
    pub turnaround_days: u32,
    #[serde(default)]
    pub deliverables: Vec<String>,
}

/// Business details shown in page headers and used as the order destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    pub name: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub email_to: String,
}

/// The static document the catalog is loaded from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogDocument {
    pub business: Business,
    pub services: Vec<Service>,
}

fn default_currency() -> String {
    "USD".to_string()
}

impl Service {
    /// Text searched by the free-text filter: name, description and category
    pub fn search_text(&self) -> String {
        format!("{} {} {}", self.name, self.description, self.category).to_lowercase()
    }

    /// Case-insensitive substring match; `query` must already be lowercased and trimmed
    pub fn matches_query(&self, query: &str) -> bool {
        query.is_empty() || self.search_text().contains(query)
    }

    pub fn turnaround_label(&self) -> String {
        format!("{} day(s)", self.turnaround_days)
    }

    pub fn deliverables_label(&self) -> String {
        self.deliverables.join(", ")
    }

    /// Price for `quantity` units of this service, saturating at `Decimal::MAX`
    pub fn line_total(&self, quantity: u32) -> Decimal {
        self.price.saturating_mul(Decimal::from(quantity))
    }
}
