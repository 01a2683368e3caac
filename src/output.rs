use std::fmt::Write;

use crate::models::{CartViewModel, CatalogViewModel, CheckoutSummaryView, ComposedOrder};

/// Plain-text catalog page
pub fn catalog_text(view: &CatalogViewModel) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", view.business_name, view.count_label);

    for card in &view.cards {
        let _ = writeln!(out);
        let _ = writeln!(out, "[{}] {} - {}", card.id, card.name, card.price_label);
        let _ = writeln!(out, "  {}", card.category);
        let _ = writeln!(out, "  {}", card.description);
        let _ = writeln!(out, "  Turnaround: {}", card.turnaround_label);
        if !card.deliverables_label.is_empty() {
            let _ = writeln!(out, "  Deliverables: {}", card.deliverables_label);
        }
    }

    out
}

pub fn categories_text(view: &CatalogViewModel) -> String {
    let mut out = String::from("all\n");
    for category in &view.categories {
        let _ = writeln!(out, "{}", category);
    }
    out
}

/// Plain-text cart drawer
pub fn cart_text(view: &CartViewModel) -> String {
    if view.lines.is_empty() {
        return "Your cart is empty.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "Cart ({})", view.count_label);
    for line in &view.lines {
        let _ = writeln!(
            out,
            "- {} x{} @ {} = {}",
            line.name, line.quantity, line.unit_price_label, line.line_total_label
        );
    }
    let _ = writeln!(out, "Subtotal: {}", view.subtotal_label);
    out
}

pub fn checkout_text(view: &CheckoutSummaryView) -> String {
    if view.show_empty_notice {
        return "Your cart is empty. Add services before checking out.\n".to_string();
    }
    view.summary_text.clone()
}

pub fn order_text(order: &ComposedOrder) -> String {
    format!("{}\n\n{}", order.subject(), order.body())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Business, CartModel, Catalog, CatalogDocument, CatalogFilter, Service};
    use crate::services::{render_cart, render_catalog, render_checkout_summary};
    use rust_decimal_macros::dec;

    fn create_test_catalog() -> Catalog {
        Catalog::new(CatalogDocument {
            business: Business {
                name: "Studio".to_string(),
                currency: "EUR".to_string(),
                email_to: "orders@studio.test".to_string(),
            },
            services: vec![Service {
                id: "logo".to_string(),
                name: "Logo Design".to_string(),
                description: "Vector brand mark".to_string(),
                category: "Branding".to_string(),
                price: dec!(1250),
                turnaround_days: 5,
                deliverables: vec!["SVG".to_string(), "PNG".to_string()],
            }],
        })
        .unwrap()
    }

    #[test]
    fn test_catalog_text() {
        let view = render_catalog(&create_test_catalog(), &CatalogFilter::default());
        let text = catalog_text(&view);

        assert!(text.starts_with("Studio (1 service)\n"));
        assert!(text.contains("[logo] Logo Design - €1,250.00"));
        assert!(text.contains("  Turnaround: 5 day(s)"));
        assert!(text.contains("  Deliverables: SVG, PNG"));
        assert_eq!(categories_text(&view), "all\nBranding\n");
    }

    #[test]
    fn test_cart_text() {
        let catalog = create_test_catalog();
        let mut cart = CartModel::new();
        assert_eq!(cart_text(&render_cart(&catalog, &cart)), "Your cart is empty.\n");

        cart.add("logo");
        cart.add("logo");
        assert_eq!(
            cart_text(&render_cart(&catalog, &cart)),
            "Cart (2 items)\n- Logo Design x2 @ €1,250.00 = €2,500.00\nSubtotal: €2,500.00\n"
        );
    }

    #[test]
    fn test_checkout_text_empty_notice() {
        let view = render_checkout_summary(&create_test_catalog(), &CartModel::new());
        assert!(checkout_text(&view).starts_with("Your cart is empty."));
    }
}
