//! Tracing subscriber setup for processes embedding the data layer.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install a global subscriber writing to stderr.
///
/// `RUST_LOG` overrides `default_filter`. Returns an error if a global
/// subscriber is already installed or the filter does not parse.
pub fn init_tracing(default_filter: &str) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter)
            .map_err(|e| anyhow::anyhow!("Invalid log filter '{}': {}", default_filter, e))?,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscriber_installs_once() {
        assert!(init_tracing("fuelmap=debug").is_ok());
        tracing::info!("[telemetry] subscriber installed");
        assert!(init_tracing("fuelmap=debug").is_err());
    }
}
