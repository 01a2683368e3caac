use thiserror::Error;
use tracing::info;
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

#[derive(Debug, Error)]
pub enum ObservabilityError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracingInit(String),
}

/// Initialize structured logging.
///
/// `RUST_LOG` wins over `log_level` when set. Logs go to stderr so command
/// output on stdout stays machine-readable.
pub fn init_observability(
    service_name: &str,
    log_level: &str,
    enable_json_logging: bool,
) -> Result<(), ObservabilityError> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives(service_name, log_level)))
        .map_err(|e| ObservabilityError::TracingInit(e.to_string()))?;

    if enable_json_logging {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(false)
            .with_span_list(false)
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_level(true)
            .with_file(false)
            .with_line_number(false)
            .with_span_events(FmtSpan::NONE)
            .with_writer(std::io::stderr);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| ObservabilityError::TracingInit(e.to_string()))?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_thread_names(false)
                    .with_file(false)
                    .with_line_number(false)
                    .with_span_events(FmtSpan::NONE)
                    .compact()
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .map_err(|e| ObservabilityError::TracingInit(e.to_string()))?;
    }

    info!(service = service_name, "Observability initialized");
    Ok(())
}

fn default_directives(service_name: &str, log_level: &str) -> String {
    format!(
        "{}={},storefront_rs={},reqwest=warn",
        service_name.replace('-', "_"),
        log_level,
        log_level
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives() {
        assert_eq!(
            default_directives("storefront-rs", "debug"),
            "storefront_rs=debug,storefront_rs=debug,reqwest=warn"
        );
        assert_eq!(
            default_directives("storefront", "info"),
            "storefront=info,storefront_rs=info,reqwest=warn"
        );
    }

    #[test]
    fn test_second_init_reports_error() {
        let _ = init_observability("storefront-test", "info", false);

        // Only one global subscriber can be installed per process
        let second = init_observability("storefront-test", "info", true);
        assert!(matches!(second, Err(ObservabilityError::TracingInit(_))));
    }
}
