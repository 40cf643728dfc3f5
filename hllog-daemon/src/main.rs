use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tokio_util::sync::CancellationToken;

use hllog_daemon::cli::{Command, DaemonCli};
use hllog_daemon::{logging, metrics_server, runner};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "hllog-daemon failed");
            eprintln!("hllog-daemon: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let cli = DaemonCli::parse();
    let config = runner::load_config(&cli).await?;

    logging::init_tracing(&config.general)?;

    if cli.validate {
        let registry = runner::build_registry(&config).await?;
        tracing::info!(events = registry.len(), "configuration is valid");
        println!("configuration is valid ({} events)", registry.len());
        return Ok(());
    }

    if config.metrics.enabled {
        metrics_server::install_metrics_recorder(&config.metrics)?;
    }

    let command = cli.command.clone().unwrap_or(Command::Listen(Default::default()));
    match command {
        Command::Read(args) => {
            let stdout = std::io::stdout().lock();
            let summary = runner::run_read(&config, &args.path, stdout).await?;
            tracing::info!(
                path = %args.path.display(),
                lines = summary.lines,
                emitted = summary.emitted,
                discarded = summary.discarded(),
                "log file decoded"
            );
        }
        Command::Listen(_) => {
            tracing::info!(
                local_addr = %config.listener.local_addr,
                remote_addr = %config.listener.remote_addr,
                "hllog-daemon starting"
            );
            let cancel = CancellationToken::new();
            let watcher = runner::spawn_shutdown_watcher(cancel.clone())?;
            let result = runner::run_listen(&config, std::io::stdout(), cancel.clone()).await;
            cancel.cancel();
            let _ = watcher.await;
            result?;
            tracing::info!("hllog-daemon shut down");
        }
    }

    Ok(())
}
