use tracing::{debug, instrument};

use crate::models::{
    format_money, pluralize, Catalog, CatalogFilter, CatalogViewModel, CategoryFilter, Service,
    ServiceCard, StorefrontAction,
};

/// Services matching both filters, in catalog order
pub fn filter_services<'a>(catalog: &'a Catalog, filter: &CatalogFilter) -> Vec<&'a Service> {
    let query = filter.normalized_query();
    catalog
        .services()
        .iter()
        .filter(|service| {
            filter.category.matches(&service.category) && service.matches_query(&query)
        })
        .collect()
}

/// Keep only services in the selected category
pub fn apply_category<'a>(services: Vec<&'a Service>, category: &CategoryFilter) -> Vec<&'a Service> {
    services
        .into_iter()
        .filter(|service| category.matches(&service.category))
        .collect()
}

/// Keep only services matching the free-text query
pub fn apply_query<'a>(services: Vec<&'a Service>, query: &str) -> Vec<&'a Service> {
    let query = query.trim().to_lowercase();
    services
        .into_iter()
        .filter(|service| service.matches_query(&query))
        .collect()
}

/// Render the catalog page for the given filters
#[instrument(skip(catalog), fields(services = catalog.len()))]
pub fn render_catalog(catalog: &Catalog, filter: &CatalogFilter) -> CatalogViewModel {
    let currency = &catalog.business().currency;

    let cards: Vec<ServiceCard> = filter_services(catalog, filter)
        .into_iter()
        .map(|service| ServiceCard {
            id: service.id.clone(),
            name: service.name.clone(),
            description: service.description.clone(),
            category: service.category.clone(),
            turnaround_label: service.turnaround_label(),
            deliverables_label: service.deliverables_label(),
            price: service.price,
            price_label: format_money(service.price, currency),
            add_to_cart: StorefrontAction::AddToCart {
                service_id: service.id.clone(),
            },
        })
        .collect();

    let match_count = cards.len();
    debug!(match_count, "Rendered catalog");

    CatalogViewModel {
        business_name: catalog.business().name.clone(),
        categories: catalog.categories(),
        filter: filter.clone(),
        cards,
        match_count,
        count_label: pluralize(match_count as u64, "service"),
    }
}
