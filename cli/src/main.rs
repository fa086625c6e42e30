//! labmon - homelab infrastructure monitor
//!
//! Generates a port-usage report (JSON plus optional HTML view), checks
//! a single TCP port for availability, or serves the HTTP status API.

mod commands;
mod server;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use labmon_core::Settings;

#[derive(Parser)]
#[command(name = "labmon")]
#[command(author, version, about = "Homelab infrastructure monitor")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Host/IP for the runtime port check
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// TCP port for the runtime check; exit code 0 = free, 1 = occupied
    #[arg(long)]
    check_port: Option<u16>,

    /// Path for the JSON report (default: port_usage_report.json next to the binary)
    #[arg(long)]
    json_path: Option<PathBuf>,

    /// Also write an HTML view of the report
    #[arg(long)]
    html: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP status API
    Serve {
        /// Listen address, e.g. 0.0.0.0:8080 (default: LABMON_HTTP_ADDR)
        #[arg(long)]
        addr: Option<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve { addr }) => {
            let settings = Settings::from_env();
            let addr = addr.unwrap_or_else(|| settings.http_addr.clone());
            server::run(settings, &addr).await?;
            Ok(())
        }
        None => {
            let code =
                commands::report::run(&cli.host, cli.check_port, cli.json_path, cli.html).await?;
            std::process::exit(code)
        }
    }
}
