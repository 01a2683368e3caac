use rust_decimal::Decimal;
use tracing::{debug, instrument};

use crate::models::{
    format_money, pluralize, CartLineView, CartModel, CartViewModel, Catalog,
    CheckoutSummaryView, OrderLine, StorefrontAction,
};

/// Cart entries joined with their catalog services.
///
/// Entries whose service id is not in the catalog are skipped.
pub fn join_order_lines(catalog: &Catalog, cart: &CartModel) -> Vec<OrderLine> {
    cart.entries()
        .iter()
        .filter_map(|entry| {
            let Some(service) = catalog.get(&entry.service_id) else {
                debug!(service_id = %entry.service_id, "Skipping cart entry for unknown service");
                return None;
            };
            Some(OrderLine {
                service_id: service.id.clone(),
                name: service.name.clone(),
                category: service.category.clone(),
                quantity: entry.quantity,
                unit_price: service.price,
                line_total: service.line_total(entry.quantity),
            })
        })
        .collect()
}

/// Item count and subtotal over joined lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CartTotals {
    pub item_count: u64,
    pub subtotal: Decimal,
}

impl CartTotals {
    pub fn from_lines(lines: &[OrderLine]) -> Self {
        lines.iter().fold(Self::default(), |totals, line| Self {
            item_count: totals.item_count.saturating_add(u64::from(line.quantity)),
            subtotal: totals.subtotal.saturating_add(line.line_total),
        })
    }
}

/// Render the cart drawer
#[instrument(skip(catalog, cart), fields(entries = cart.len()))]
pub fn render_cart(catalog: &Catalog, cart: &CartModel) -> CartViewModel {
    let currency = &catalog.business().currency;
    let joined = join_order_lines(catalog, cart);
    let totals = CartTotals::from_lines(&joined);

    let lines = joined
        .into_iter()
        .map(|line| CartLineView {
            unit_price_label: format_money(line.unit_price, currency),
            line_total_label: format_money(line.line_total, currency),
            increment: StorefrontAction::ChangeQuantity {
                service_id: line.service_id.clone(),
                delta: 1,
            },
            decrement: StorefrontAction::ChangeQuantity {
                service_id: line.service_id.clone(),
                delta: -1,
            },
            service_id: line.service_id,
            name: line.name,
            category: line.category,
            quantity: line.quantity,
            unit_price: line.unit_price,
            line_total: line.line_total,
        })
        .collect();

    CartViewModel {
        lines,
        item_count: totals.item_count,
        count_label: pluralize(totals.item_count, "item"),
        subtotal: totals.subtotal,
        subtotal_label: format_money(totals.subtotal, currency),
        checkout_enabled: totals.item_count > 0,
        clear: StorefrontAction::ClearCart,
    }
}

/// Render the checkout page's order summary
#[instrument(skip(catalog, cart), fields(entries = cart.len()))]
pub fn render_checkout_summary(catalog: &Catalog, cart: &CartModel) -> CheckoutSummaryView {
    let currency = &catalog.business().currency;
    let lines = join_order_lines(catalog, cart);
    let totals = CartTotals::from_lines(&lines);

    let mut summary_text = String::from("Order Summary\n");
    for line in &lines {
        summary_text.push_str(&format!(
            "- {} x{} = {}\n",
            line.name,
            line.quantity,
            format_money(line.line_total, currency)
        ));
    }
    summary_text.push_str(&format!(
        "Subtotal: {}\n",
        format_money(totals.subtotal, currency)
    ));

    let has_items = totals.item_count > 0;
    CheckoutSummaryView {
        business_name: catalog.business().name.clone(),
        summary_text,
        item_count: totals.item_count,
        subtotal: totals.subtotal,
        show_empty_notice: !has_items,
        submit_enabled: has_items,
    }
}
