use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, instrument};

use crate::models::{
    CartModel, CartViewModel, Catalog, CatalogFilter, CatalogViewModel, CheckoutSummaryView,
    ComposedOrder, CustomerDetails, RepositoryError, ServiceError, ServiceResult,
    StorefrontAction,
};
use crate::observability::Metrics;
use crate::repositories::{CatalogSource, KeyValueStore};
use crate::services::{
    render_cart, render_catalog, render_checkout_summary, CartService, OrderComposer,
    SubmissionSink,
};

/// One storefront session: the loaded catalog, the persisted cart and the
/// order composer, shared by the catalog and checkout pages.
pub struct StorefrontSession {
    catalog: Catalog,
    cart: CartService,
    composer: OrderComposer,
    metrics: Arc<Metrics>,
}

impl StorefrontSession {
    /// Restore the cart, then load the catalog.
    ///
    /// A catalog that cannot be fetched or fails validation leaves no session.
    #[instrument(skip_all, fields(source = %source.location(), cart_key = %cart_key))]
    pub async fn open(
        source: &dyn CatalogSource,
        store: Arc<dyn KeyValueStore>,
        cart_key: &str,
        sink: Arc<dyn SubmissionSink>,
        metrics: Arc<Metrics>,
    ) -> ServiceResult<Self> {
        let cart = CartService::load(store, cart_key).with_metrics(metrics.clone());

        let started = Instant::now();
        let document = source.fetch().await.map_err(|e| {
            error!(error = %e, "Failed to load catalog");
            catalog_unavailable(source, e)
        })?;

        let catalog = Catalog::new(document).map_err(|e| {
            error!(error = %e, "Catalog failed validation");
            ServiceError::from(e)
        })?;
        metrics.record_catalog_load(started.elapsed().as_secs_f64(), catalog.len());

        info!(
            services = catalog.len(),
            cart_entries = cart.cart().len(),
            restore = cart.last_restore().as_str(),
            "Storefront session ready"
        );

        Ok(Self {
            catalog,
            cart,
            composer: OrderComposer::new(sink).with_metrics(metrics.clone()),
            metrics,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn cart(&self) -> &CartModel {
        self.cart.cart()
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    pub fn render_catalog(&self, filter: &CatalogFilter) -> CatalogViewModel {
        render_catalog(&self.catalog, filter)
    }

    pub fn render_cart(&self) -> CartViewModel {
        render_cart(&self.catalog, self.cart.cart())
    }

    pub fn render_checkout(&self) -> CheckoutSummaryView {
        render_checkout_summary(&self.catalog, self.cart.cart())
    }

    /// Apply a cart action and return the re-rendered cart
    #[instrument(skip(self))]
    pub fn dispatch(&mut self, action: &StorefrontAction) -> ServiceResult<CartViewModel> {
        match action {
            StorefrontAction::AddToCart { service_id } => self.cart.add(service_id)?,
            StorefrontAction::ChangeQuantity { service_id, delta } => {
                self.cart.change_quantity(service_id, *delta)?
            }
            StorefrontAction::ClearCart => self.cart.clear()?,
        }
        Ok(self.render_cart())
    }

    /// Submit the cart as an order; `Ok(None)` when the cart has nothing to order
    pub async fn checkout(
        &mut self,
        customer: &CustomerDetails,
    ) -> ServiceResult<Option<ComposedOrder>> {
        self.composer
            .submit(&self.catalog, &mut self.cart, customer)
            .await
    }

    /// Re-read the persisted cart written by another session
    pub fn refresh(&mut self) {
        self.cart.reload();
    }
}

fn catalog_unavailable(source: &dyn CatalogSource, error: RepositoryError) -> ServiceError {
    ServiceError::CatalogUnavailable {
        message: format!("{}: {}", source.location(), error),
    }
}
