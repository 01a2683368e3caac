use std::collections::{BTreeSet, HashMap};

use super::{validate_catalog_document, Business, CatalogDocument, Service, ValidationResult};

/// Immutable in-memory catalog keyed by service id for the session's lifetime
#[derive(Debug, Clone)]
pub struct Catalog {
    business: Business,
    services: Vec<Service>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog from a loaded document, rejecting documents that fail validation
    pub fn new(document: CatalogDocument) -> ValidationResult<Self> {
        validate_catalog_document(&document)?;

        let index = document
            .services
            .iter()
            .enumerate()
            .map(|(position, service)| (service.id.clone(), position))
            .collect();

        Ok(Self {
            business: document.business,
            services: document.services,
            index,
        })
    }

    pub fn business(&self) -> &Business {
        &self.business
    }

    /// Services in their original document order
    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub fn get(&self, id: &str) -> Option<&Service> {
        self.index.get(id).map(|&position| &self.services[position])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Distinct category names, sorted, for the category selector
    pub fn categories(&self) -> Vec<String> {
        self.services
            .iter()
            .map(|service| service.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}
