//! CLI argument definitions for hllog-daemon.
//!
//! Uses `clap` v4 derive macros to parse command-line arguments.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use hllog_core::config::{HlLogConfig, InvalidPacketPolicy};

/// HL Log Standard decoder.
///
/// Receives remote log datagrams from a Source dedicated server (or reads a
/// log file) and prints every decoded entry as one JSON object per line.
#[derive(Parser, Debug)]
#[command(name = "hllog-daemon")]
#[command(version, about, long_about = None)]
pub struct DaemonCli {
    /// Path to hllog.toml configuration file.
    ///
    /// Built-in defaults (plus `HLLOG_*` environment overrides) are used when omitted.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error).
    ///
    /// Takes precedence over the config file and environment variables.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Override log format (json, pretty).
    ///
    /// Takes precedence over the config file and environment variables.
    #[arg(long)]
    pub log_format: Option<String>,

    /// Validate configuration (including event definitions) and exit.
    #[arg(long)]
    pub validate: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Operating mode.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Receive remote log datagrams over UDP until interrupted.
    Listen(ListenArgs),
    /// Decode a log file line by line and exit.
    Read(ReadArgs),
}

/// Arguments for `listen`.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ListenArgs {
    /// Local address to bind (overrides `listener.local_addr`).
    #[arg(long)]
    pub local: Option<SocketAddr>,

    /// Game server address to accept datagrams from (overrides `listener.remote_addr`).
    #[arg(long)]
    pub remote: Option<SocketAddr>,

    /// Drop malformed datagrams instead of stopping the listener.
    #[arg(long)]
    pub drop_invalid: bool,
}

/// Arguments for `read`.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ReadArgs {
    /// Log file to decode.
    pub path: PathBuf,
}

impl DaemonCli {
    /// Apply command-line overrides on top of a loaded configuration.
    pub fn apply_overrides(&self, config: &mut HlLogConfig) {
        if let Some(level) = &self.log_level {
            config.general.log_level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.general.log_format = format.clone();
        }

        if let Some(Command::Listen(args)) = &self.command {
            if let Some(local) = args.local {
                config.listener.local_addr = local.to_string();
            }
            if let Some(remote) = args.remote {
                config.listener.remote_addr = remote.to_string();
            }
            if args.drop_invalid {
                config.listener.invalid_packet_policy = InvalidPacketPolicy::Drop;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clap_definition_is_consistent() {
        use clap::CommandFactory;
        DaemonCli::command().debug_assert();
    }

    #[test]
    fn listen_overrides_listener_section() {
        let cli = DaemonCli::try_parse_from([
            "hllog-daemon",
            "--log-level",
            "debug",
            "listen",
            "--local",
            "127.0.0.1:28000",
            "--remote",
            "10.0.0.5:27015",
            "--drop-invalid",
        ])
        .unwrap();

        let mut config = HlLogConfig::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.listener.local_addr, "127.0.0.1:28000");
        assert_eq!(config.listener.remote_addr, "10.0.0.5:27015");
        assert_eq!(config.listener.invalid_packet_policy, InvalidPacketPolicy::Drop);
    }

    #[test]
    fn read_leaves_listener_untouched() {
        let cli = DaemonCli::try_parse_from(["hllog-daemon", "read", "server.log"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Read(ReadArgs {
                path: PathBuf::from("server.log")
            }))
        );

        let mut config = HlLogConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.listener.local_addr, "0.0.0.0:27500");
    }

    #[test]
    fn rejects_malformed_address() {
        let result = DaemonCli::try_parse_from(["hllog-daemon", "listen", "--remote", "nowhere"]);
        assert!(result.is_err());
    }
}
