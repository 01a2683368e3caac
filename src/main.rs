use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

use storefront_rs::{
    cli::{Cli, Commands},
    init_observability,
    models::{CatalogFilter, CustomerDetails, StorefrontAction},
    output,
    repositories::{catalog_source_for, FileStore},
    services::MailtoSink,
    Config, Metrics, StorefrontSession,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_environment().context("Failed to load configuration")?;
    cli.apply_overrides(&mut config);
    config.validate().context("Invalid configuration")?;

    init_observability(
        &config.observability.service_name,
        &config.observability.log_level,
        config.observability.enable_json_logging,
    )?;

    info!(
        catalog = %config.catalog.catalog_source,
        storage_dir = %config.storage.storage_dir.display(),
        origin = %config.storage.origin,
        "Starting storefront"
    );

    let metrics = Arc::new(Metrics::new()?);
    let store = Arc::new(FileStore::new(
        &config.storage.storage_dir,
        &config.storage.origin,
    ));
    let source = catalog_source_for(
        &config.catalog.catalog_source,
        config.catalog.fetch_timeout(),
    )?;
    let sink = Arc::new(MailtoSink::from_opener(
        config.submission.mail_opener.as_deref(),
        cli.json,
    ));

    let mut session = match StorefrontSession::open(
        source.as_ref(),
        store,
        &config.storage.cart_key,
        sink,
        metrics.clone(),
    )
    .await
    {
        Ok(session) => session,
        Err(e) => {
            error!(error = %e, "Storefront unavailable");
            eprintln!("Could not load the service catalog: {}", e);
            std::process::exit(1);
        }
    };

    run(&cli, &mut session).await?;

    if cli.metrics {
        print!("{}", metrics.encode()?);
    }

    Ok(())
}

async fn run(cli: &Cli, session: &mut StorefrontSession) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Catalog { query, category } => {
            let view = session.render_catalog(&CatalogFilter::new(query.as_str(), category.clone()));
            emit(cli.json, &view, || output::catalog_text(&view))?;
        }
        Commands::Categories => {
            let view = session.render_catalog(&CatalogFilter::default());
            emit(cli.json, &view.categories, || output::categories_text(&view))?;
        }
        Commands::Add { service_id } => {
            if !session.catalog().contains(service_id) {
                anyhow::bail!("Unknown service: {}", service_id);
            }
            let view = session.dispatch(&StorefrontAction::AddToCart {
                service_id: service_id.clone(),
            })?;
            emit(cli.json, &view, || output::cart_text(&view))?;
        }
        Commands::Change { service_id, delta } => {
            let view = session.dispatch(&StorefrontAction::ChangeQuantity {
                service_id: service_id.clone(),
                delta: *delta,
            })?;
            emit(cli.json, &view, || output::cart_text(&view))?;
        }
        Commands::Cart => {
            let view = session.render_cart();
            emit(cli.json, &view, || output::cart_text(&view))?;
        }
        Commands::Clear => {
            let view = session.dispatch(&StorefrontAction::ClearCart)?;
            emit(cli.json, &view, || output::cart_text(&view))?;
        }
        Commands::Summary => {
            let view = session.render_checkout();
            emit(cli.json, &view, || output::checkout_text(&view))?;
        }
        Commands::Checkout { .. } => {
            let customer = cli.command.customer().unwrap_or_else(CustomerDetails::default);
            match session.checkout(&customer).await? {
                Some(order) => {
                    let payload = order.payload();
                    emit(cli.json, &payload, || output::order_text(&order))?;
                }
                None => {
                    let view = session.render_checkout();
                    emit(cli.json, &view, || output::checkout_text(&view))?;
                }
            }
        }
    }

    Ok(())
}

fn emit<T, F>(json: bool, value: &T, text: F) -> anyhow::Result<()>
where
    T: Serialize,
    F: FnOnce() -> String,
{
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", text());
    }
    Ok(())
}
