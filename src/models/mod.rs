// Re-export all model types
pub use self::cart::*;
pub use self::catalog::*;
pub use self::errors::*;
pub use self::money::*;
pub use self::order::*;
pub use self::service::*;
pub use self::validation::*;
pub use self::view::*;

mod cart;
mod catalog;
mod errors;
mod money;
mod order;
mod service;
mod validation;
mod view;
