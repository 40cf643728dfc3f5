//! Mode runners -- configuration assembly and the `listen` / `read` flows.
//!
//! Configuration precedence: CLI flags > `HLLOG_*` environment > file > defaults.
//!
//! Both modes build the event registry from `[events]`, wrap the output
//! writer in a [`JsonLinesSink`] and hand it to a `LogLineParser`.
//! `listen` runs the UDP listener on the current task until the
//! cancellation token fires or a fatal transport error occurs.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;

use hllog_core::config::HlLogConfig;
use hllog_pipeline::{
    EventRegistry, ListenerSettings, ListenerStats, LogLineParser, ReadSummary,
    RemoteLogListener,
};

use crate::cli::DaemonCli;
use crate::output::JsonLinesSink;

/// Load and validate the effective configuration for this invocation.
///
/// Without `--config` the built-in defaults are used, still subject to
/// environment and CLI overrides.
pub async fn load_config(cli: &DaemonCli) -> Result<HlLogConfig> {
    let mut config = match &cli.config {
        Some(path) => HlLogConfig::from_file(path)
            .await
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => HlLogConfig::default(),
    };

    config.apply_env_overrides();
    cli.apply_overrides(&mut config);
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("config validation failed: {e}"))?;

    Ok(config)
}

/// Build the ordered event registry described by `[events]`.
pub async fn build_registry(config: &HlLogConfig) -> Result<EventRegistry> {
    EventRegistry::from_config(&config.events)
        .await
        .context("failed to build event registry")
}

/// Decode a log file and write every entry to `out`.
pub async fn run_read<W: Write>(
    config: &HlLogConfig,
    path: &Path,
    out: W,
) -> Result<ReadSummary> {
    let registry = build_registry(config).await?;
    let mut parser = LogLineParser::new(registry, JsonLinesSink::new(out));

    let summary = parser
        .parse_file(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let sink = parser.sink();
    if sink.failed() > 0 {
        tracing::warn!(failed = sink.failed(), "some entries could not be written");
    }

    Ok(summary)
}

/// Receive remote log datagrams until `cancel` fires.
///
/// Returns the listener statistics on a clean shutdown. A malformed
/// datagram under the `terminate` policy is returned as an error.
pub async fn run_listen<W: Write>(
    config: &HlLogConfig,
    out: W,
    cancel: CancellationToken,
) -> Result<ListenerStats> {
    let registry = build_registry(config).await?;
    let settings = ListenerSettings::from_core(&config.listener)?;
    let mut listener = RemoteLogListener::bind(settings).await?;
    let mut parser = LogLineParser::new(registry, JsonLinesSink::new(out));

    let stats = listener
        .run(&mut parser, cancel)
        .await
        .context("remote log listener stopped")?;

    tracing::info!(
        received = stats.received,
        forwarded = stats.forwarded,
        rejected = stats.rejected,
        foreign = stats.foreign,
        written = parser.sink().written(),
        "remote log listener finished"
    );

    Ok(stats)
}

/// Cancel `token` on SIGTERM or SIGINT.
///
/// # Errors
///
/// Returns an error if signal handlers cannot be installed.
pub fn spawn_shutdown_watcher(token: CancellationToken) -> Result<tokio::task::JoinHandle<()>> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("failed to install SIGTERM handler: {e}"))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("failed to install SIGINT handler: {e}"))?;

    Ok(tokio::spawn(async move {
        let name = tokio::select! {
            _ = sigterm.recv() => "SIGTERM",
            _ = sigint.recv() => "SIGINT",
            _ = token.cancelled() => return,
        };
        tracing::info!(signal = name, "shutdown signal received");
        token.cancel();
    }))
}
