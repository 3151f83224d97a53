// SPDX-FileCopyrightText: 2026 Camara Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! camara-bridge - CAMARA network exposure bridge.
//!
//! This is the binary entry point. It loads configuration, activates the
//! configured backends and runs one operation against them.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod backends;
mod commands;

use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand};

/// camara-bridge - CAMARA network exposure bridge.
#[derive(Parser, Debug)]
#[command(name = "camara-bridge", version, about, long_about = None)]
struct Cli {
    /// Configuration file. Defaults to the system, user and working-directory lookup.
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// List compiled-in backends, which are active, and their health.
    Backends,
    /// Quality-on-demand sessions.
    Qod {
        /// Use the O-RAN backend instead of the network core.
        #[arg(long)]
        oran: bool,
        #[command(subcommand)]
        action: QodAction,
    },
    /// Traffic influence resources.
    Ti {
        #[command(subcommand)]
        action: TiAction,
    },
    /// Retrieve a device location. FILE holds the JSON request.
    Location { file: PathBuf },
    /// Control the core simulator.
    Coresim {
        #[command(subcommand)]
        action: CoresimAction,
    },
    /// Device reachability, roaming and subscriber profiles.
    DeviceStatus {
        #[command(subcommand)]
        action: DeviceStatusAction,
    },
    /// Share or verify the phone number behind a device address.
    NumberVerification {
        #[command(subcommand)]
        action: NumberAction,
    },
}

#[derive(Subcommand, Debug)]
enum QodAction {
    /// Create a session from a JSON request file.
    Create { file: PathBuf },
    Get { id: String },
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
enum TiAction {
    /// Create a resource from a JSON request file.
    Create { file: PathBuf },
    Get { id: String },
    List,
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
enum CoresimAction {
    Status,
    Start,
    Stop,
    /// Push a simulation configuration from a JSON file.
    Configure { file: PathBuf },
}

#[derive(Subcommand, Debug)]
enum DeviceStatusAction {
    Reachability { ip: String },
    Roaming { ip: String },
    /// Subscriber profile by exactly one of IP, SUPI or MSISDN.
    #[command(group(ArgGroup::new("key").required(true)))]
    Profile {
        #[arg(long, group = "key")]
        ip: Option<String>,
        #[arg(long, group = "key")]
        supi: Option<String>,
        #[arg(long, group = "key")]
        msisdn: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum NumberAction {
    /// Print the phone number allocated to the device.
    Share { ip: String },
    /// Check a claimed phone number, plain or as a SHA-256 hex digest.
    Verify {
        ip: String,
        #[arg(long)]
        phone_number: Option<String>,
        #[arg(long, conflicts_with = "phone_number")]
        hashed_phone_number: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => camara_config::load_and_validate_path(path),
        None => camara_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            camara_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.bridge.log_level);

    if let Err(e) = commands::run(cli.command, &config).await {
        commands::print_error(&e);
        std::process::exit(1);
    }
}

/// Initialize the tracing subscriber. `RUST_LOG` overrides the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("camara={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn qod_flags_parse() {
        let cli = Cli::try_parse_from([
            "camara-bridge",
            "--config",
            "bridge.toml",
            "qod",
            "--oran",
            "get",
            "pol-1",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("bridge.toml")));
        match cli.command {
            Commands::Qod {
                oran: true,
                action: QodAction::Get { id },
            } => assert_eq!(id, "pol-1"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn coresim_configure_takes_a_file() {
        let cli =
            Cli::try_parse_from(["camara-bridge", "coresim", "configure", "sim.json"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Coresim {
                action: CoresimAction::Configure { .. }
            }
        ));
    }

    #[test]
    fn profile_lookup_takes_exactly_one_key() {
        let cli = Cli::try_parse_from([
            "camara-bridge",
            "device-status",
            "profile",
            "--msisdn",
            "+33612345678",
        ])
        .unwrap();
        match cli.command {
            Commands::DeviceStatus {
                action: DeviceStatusAction::Profile { msisdn, ip, supi },
            } => {
                assert_eq!(msisdn.as_deref(), Some("+33612345678"));
                assert!(ip.is_none() && supi.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(Cli::try_parse_from(["camara-bridge", "device-status", "profile"]).is_err());
        assert!(Cli::try_parse_from([
            "camara-bridge",
            "device-status",
            "profile",
            "--ip",
            "12.1.0.2",
            "--supi",
            "001010000000001",
        ])
        .is_err());
    }

    #[test]
    fn number_verify_rejects_both_claims() {
        assert!(Cli::try_parse_from([
            "camara-bridge",
            "number-verification",
            "verify",
            "12.1.0.2",
            "--phone-number",
            "+33612345678",
            "--hashed-phone-number",
            "abc",
        ])
        .is_err());
    }
}
