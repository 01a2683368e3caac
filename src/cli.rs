use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;
use crate::models::{CategoryFilter, CustomerDetails};

#[derive(Parser, Debug)]
#[command(name = "storefront", version, about = "Service catalog, cart and checkout")]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(long, global = true, help = "Print collected metrics after the command")]
    pub metrics: bool,
    #[arg(long, global = true, help = "Catalog file path or http(s) URL")]
    pub catalog: Option<String>,
    #[arg(long, global = true, help = "Directory holding the persisted cart")]
    pub storage_dir: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List services matching the filters
    Catalog {
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long, default_value = "all")]
        category: CategoryFilter,
    },
    /// List catalog categories
    Categories,
    /// Add one unit of a service to the cart
    Add { service_id: String },
    /// Change the quantity of a service already in the cart
    Change {
        service_id: String,
        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },
    /// Show the cart
    Cart,
    /// Empty the cart
    Clear,
    /// Show the checkout order summary
    Summary,
    /// Submit the cart as an order
    Checkout {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        company: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
}

impl Cli {
    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(catalog) = &self.catalog {
            config.catalog.catalog_source = catalog.clone();
        }
        if let Some(storage_dir) = &self.storage_dir {
            config.storage.storage_dir = storage_dir.clone();
        }
    }
}

impl Commands {
    pub fn customer(&self) -> Option<CustomerDetails> {
        match self {
            Commands::Checkout {
                name,
                email,
                phone,
                company,
                notes,
            } => Some(CustomerDetails {
                name: name.clone(),
                email: email.clone(),
                phone: phone.clone(),
                company: company.clone(),
                notes: notes.clone(),
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_catalog_filters() {
        let cli = Cli::parse_from(["storefront", "catalog", "--query", "logo", "--category", "Branding"]);

        match cli.command {
            Commands::Catalog { query, category } => {
                assert_eq!(query, "logo");
                assert_eq!(category, CategoryFilter::Exact("Branding".to_string()));
            }
            other => panic!("Unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_catalog_defaults_to_all() {
        let cli = Cli::parse_from(["storefront", "catalog"]);
        assert!(matches!(
            cli.command,
            Commands::Catalog { category: CategoryFilter::All, .. }
        ));
    }

    #[test]
    fn test_parse_negative_delta() {
        let cli = Cli::parse_from(["storefront", "change", "logo", "-1"]);
        assert!(matches!(
            cli.command,
            Commands::Change { ref service_id, delta: -1 } if service_id == "logo"
        ));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["storefront", "cart", "--json", "--metrics"]);
        assert!(cli.json);
        assert!(cli.metrics);
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::parse_from([
            "storefront",
            "--catalog",
            "http://localhost/services.json",
            "--storage-dir",
            "/tmp/store",
            "cart",
        ]);
        let mut config = Config::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.catalog.catalog_source, "http://localhost/services.json");
        assert_eq!(config.storage.storage_dir, PathBuf::from("/tmp/store"));
    }

    #[test]
    fn test_checkout_customer() {
        let cli = Cli::parse_from([
            "storefront",
            "checkout",
            "--name",
            "Ada",
            "--email",
            "ada@example.test",
        ]);
        let customer = cli.command.customer().unwrap();

        assert_eq!(customer.name, "Ada");
        assert_eq!(customer.phone, "");
        assert!(Commands::Cart.customer().is_none());
    }
}
