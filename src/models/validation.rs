use rust_decimal::Decimal;
use std::collections::HashSet;

use super::{Business, CatalogDocument, Service, ValidationError, ValidationResult};

/// Trait for validating loaded catalog data
pub trait Validate {
    fn validate(&self) -> ValidationResult<()>;
}

/// Validation constants
pub const MIN_TURNAROUND_DAYS: u32 = 1;
pub const MIN_PRICE: Decimal = Decimal::ZERO;
/// Keeps `price * MAX_QUANTITY` and cart subtotals well inside `Decimal` range
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

impl Validate for CatalogDocument {
    fn validate(&self) -> ValidationResult<()> {
        validate_catalog_document(self)
    }
}

impl Validate for Service {
    fn validate(&self) -> ValidationResult<()> {
        validate_service(self, "service")
    }
}

/// Validate the business block and every service, and require unique service ids
pub fn validate_catalog_document(document: &CatalogDocument) -> ValidationResult<()> {
    validate_business(&document.business)?;

    let mut seen_ids = HashSet::new();
    for (index, service) in document.services.iter().enumerate() {
        validate_service(service, &format!("services[{}]", index))?;

        if !seen_ids.insert(service.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: service.id.clone(),
            });
        }
    }

    Ok(())
}

pub fn validate_business(business: &Business) -> ValidationResult<()> {
    if business.name.trim().is_empty() {
        return Err(ValidationError::RequiredField {
            field: "business.name".to_string(),
        });
    }

    validate_currency_code(&business.currency)?;

    Ok(())
}

/// Currency codes are three ASCII letters (ISO 4217 shape)
pub fn validate_currency_code(currency: &str) -> ValidationResult<()> {
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::InvalidValue {
            field: "business.currency".to_string(),
            value: currency.to_string(),
            reason: "Expected a three letter currency code".to_string(),
        });
    }

    Ok(())
}

pub fn validate_service(service: &Service, path: &str) -> ValidationResult<()> {
    if service.id.trim().is_empty() {
        return Err(ValidationError::RequiredField {
            field: format!("{}.id", path),
        });
    }

    if service.name.trim().is_empty() {
        return Err(ValidationError::RequiredField {
            field: format!("{}.name", path),
        });
    }

    validate_price(&service.price, path)?;

    if service.turnaround_days < MIN_TURNAROUND_DAYS {
        return Err(ValidationError::OutOfRange {
            field: format!("{}.turnaroundDays", path),
            min: MIN_TURNAROUND_DAYS.to_string(),
            value: service.turnaround_days.to_string(),
        });
    }

    Ok(())
}

pub fn validate_price(price: &Decimal, path: &str) -> ValidationResult<()> {
    if *price < MIN_PRICE {
        return Err(ValidationError::OutOfRange {
            field: format!("{}.price", path),
            min: MIN_PRICE.to_string(),
            value: price.to_string(),
        });
    }

    if *price > MAX_PRICE {
        return Err(ValidationError::InvalidValue {
            field: format!("{}.price", path),
            value: price.to_string(),
            reason: format!("Must not exceed {}", MAX_PRICE),
        });
    }

    Ok(())
}
