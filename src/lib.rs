pub mod cli;
pub mod config;
pub mod models;
pub mod observability;
pub mod output;
pub mod repositories;
pub mod services;
pub mod session;

pub use config::Config;
pub use observability::{init_observability, Metrics};
pub use session::StorefrontSession;
