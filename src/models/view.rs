use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Category selector value: every category, or one exact category name
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryFilter {
    #[default]
    All,
    Exact(String),
}

impl CategoryFilter {
    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Exact(expected) => expected == category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => write!(f, "all"),
            CategoryFilter::Exact(category) => write!(f, "{}", category),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            Ok(CategoryFilter::All)
        } else {
            Ok(CategoryFilter::Exact(s.to_string()))
        }
    }
}

/// Filters applied by the catalog view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogFilter {
    pub query: String,
    pub category: CategoryFilter,
}

impl CatalogFilter {
    pub fn new(query: impl Into<String>, category: CategoryFilter) -> Self {
        Self {
            query: query.into(),
            category,
        }
    }

    /// Query as matched: trimmed and lowercased
    pub fn normalized_query(&self) -> String {
        self.query.trim().to_lowercase()
    }

    /// Reset query and category, as the "clear filters" control does
    pub fn clear(&mut self) {
        self.query.clear();
        self.category = CategoryFilter::All;
    }
}

/// Cart commands exposed by the rendered views
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorefrontAction {
    AddToCart { service_id: String },
    ChangeQuantity { service_id: String, delta: i64 },
    ClearCart,
}

/// One service as shown on the catalog page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceCard {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub turnaround_label: String,
    pub deliverables_label: String,
    pub price: Decimal,
    pub price_label: String,
    pub add_to_cart: StorefrontAction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogViewModel {
    pub business_name: String,
    pub categories: Vec<String>,
    pub filter: CatalogFilter,
    pub cards: Vec<ServiceCard>,
    pub match_count: usize,
    pub count_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineView {
    pub service_id: String,
    pub name: String,
    pub category: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub unit_price_label: String,
    pub line_total: Decimal,
    pub line_total_label: String,
    pub increment: StorefrontAction,
    pub decrement: StorefrontAction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartViewModel {
    pub lines: Vec<CartLineView>,
    pub item_count: u64,
    pub count_label: String,
    pub subtotal: Decimal,
    pub subtotal_label: String,
    pub checkout_enabled: bool,
    pub clear: StorefrontAction,
}

/// Checkout page order summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSummaryView {
    pub business_name: String,
    pub summary_text: String,
    pub item_count: u64,
    pub subtotal: Decimal,
    pub show_empty_notice: bool,
    pub submit_enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_filter_parsing() {
        assert_eq!("all".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert_eq!(
            "Web".parse::<CategoryFilter>().unwrap(),
            CategoryFilter::Exact("Web".to_string())
        );
        assert_eq!(CategoryFilter::All.to_string(), "all");
    }

    #[test]
    fn test_category_match_is_exact() {
        let filter = CategoryFilter::Exact("Web".to_string());
        assert!(filter.matches("Web"));
        assert!(!filter.matches("web"));
        assert!(!filter.matches("Web Design"));
    }

    #[test]
    fn test_normalized_query() {
        let filter = CatalogFilter::new("  RESPONSIVE Page ", CategoryFilter::All);
        assert_eq!(filter.normalized_query(), "responsive page");
        assert_eq!(CatalogFilter::default().normalized_query(), "");
    }

    #[test]
    fn test_clear_filter() {
        let mut filter = CatalogFilter::new("logo", CategoryFilter::Exact("Branding".into()));
        filter.clear();
        assert_eq!(filter, CatalogFilter::default());
    }

    #[test]
    fn test_action_serialization() {
        let action = StorefrontAction::ChangeQuantity {
            service_id: "web".to_string(),
            delta: -1,
        };
        let json = serde_json::to_string(&action).unwrap();
        assert_eq!(json, r#"{"type":"change_quantity","service_id":"web","delta":-1}"#);
    }
}
