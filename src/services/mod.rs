// Services module - storefront behavior on top of models and repositories

pub mod cart_service;
pub mod cart_view;
pub mod catalog_view;
pub mod order_composer;
pub mod submission;

pub use cart_service::{CartService, RestoreOutcome};
pub use cart_view::{join_order_lines, render_cart, render_checkout_summary, CartTotals};
pub use catalog_view::{apply_category, apply_query, filter_services, render_catalog};
pub use order_composer::OrderComposer;
pub use submission::{MailtoLauncher, MailtoSink, SubmissionSink};
