use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::models::{CartModel, Catalog, ComposedOrder, CustomerDetails, OrderId, ServiceResult};
use crate::observability::Metrics;
use crate::services::cart_service::CartService;
use crate::services::cart_view::{join_order_lines, CartTotals};
use crate::services::submission::SubmissionSink;

/// Builds order summaries and hands them to a submission sink
pub struct OrderComposer {
    sink: Arc<dyn SubmissionSink>,
    metrics: Option<Arc<Metrics>>,
}

impl OrderComposer {
    pub fn new(sink: Arc<dyn SubmissionSink>) -> Self {
        Self {
            sink,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Compose an order from the cart, or `None` when nothing in it resolves
    /// against the catalog
    pub fn compose(
        &self,
        catalog: &Catalog,
        cart: &CartModel,
        customer: &CustomerDetails,
    ) -> Option<ComposedOrder> {
        let lines = join_order_lines(catalog, cart);
        if lines.is_empty() {
            return None;
        }

        let totals = CartTotals::from_lines(&lines);
        let business = catalog.business();

        Some(ComposedOrder {
            order_id: OrderId::generate(),
            business_name: business.name.clone(),
            destination: business.email_to.clone(),
            currency: business.currency.clone(),
            customer: customer.trimmed(),
            lines,
            subtotal: totals.subtotal,
        })
    }

    /// Compose and submit the order, clearing the cart once the sink accepts it.
    ///
    /// An empty cart is refused with `Ok(None)`. A sink failure leaves the cart untouched.
    /// Once the sink has accepted the order the result is `Ok(Some(..))` even if the
    /// cleared cart cannot be written back.
    #[instrument(skip_all, fields(entries = cart.cart().len()))]
    pub async fn submit(
        &self,
        catalog: &Catalog,
        cart: &mut CartService,
        customer: &CustomerDetails,
    ) -> ServiceResult<Option<ComposedOrder>> {
        let Some(order) = self.compose(catalog, cart.cart(), customer) else {
            info!("Cart is empty, refusing submission");
            self.record("refused");
            return Ok(None);
        };

        let submission = order.to_submission();
        if let Err(e) = self.sink.submit(&submission).await {
            warn!(order_id = %order.order_id, error = %e, "Order hand-off failed");
            self.record("failed");
            return Err(e);
        }

        info!(
            order_id = %order.order_id,
            lines = order.lines.len(),
            subtotal = %order.subtotal,
            "Order handed off"
        );
        self.record("submitted");

        if let Err(e) = cart.clear() {
            warn!(
                order_id = %order.order_id,
                error = %e,
                "Order handed off but cleared cart was not persisted"
            );
        }
        Ok(Some(order))
    }

    fn record(&self, status: &str) {
        if let Some(metrics) = &self.metrics {
            metrics.record_order_submission(status);
        }
    }
}
