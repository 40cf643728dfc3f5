//! Prometheus metrics HTTP server.
//!
//! Uses the built-in HTTP listener from `metrics-exporter-prometheus`
//! to expose the parser and listener counters.

use std::net::SocketAddr;

use anyhow::Result;
use hllog_core::config::MetricsConfig;
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the global metrics recorder and start the HTTP listener.
///
/// Call once per process. Without it every `metrics::counter!()` in the
/// parser and listener is a no-op.
///
/// # Errors
///
/// - Unsupported endpoint path or invalid listen address
/// - Socket binding fails
/// - Global recorder is already installed
pub fn install_metrics_recorder(config: &MetricsConfig) -> Result<()> {
    if config.endpoint != "/metrics" {
        return Err(anyhow::anyhow!(
            "unsupported metrics endpoint '{}': only '/metrics' is currently supported",
            config.endpoint
        ));
    }

    let addr: SocketAddr = format!("{}:{}", config.listen_addr, config.port)
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid metrics listen address: {e}"))?;

    if addr.ip().is_unspecified() {
        tracing::warn!(
            listen_addr = %addr,
            "metrics endpoint is exposed on all interfaces"
        );
    }

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("failed to install metrics recorder: {e}"))?;

    hllog_core::metrics::describe_all();
    metrics::gauge!(
        hllog_core::metrics::DAEMON_BUILD_INFO,
        "version" => env!("CARGO_PKG_VERSION")
    )
    .set(1.0);

    tracing::info!(listen_addr = %addr, "Prometheus metrics endpoint active");

    Ok(())
}
