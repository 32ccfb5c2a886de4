use clap::{Parser, Subcommand};
use dnstrace_domain::{CliOverrides, RecordType};
use std::process::ExitCode;
use tracing::info;

mod bootstrap;
mod commands;

#[derive(Parser)]
#[command(name = "dnstrace")]
#[command(version)]
#[command(about = "dnstrace - iterative DNS resolver with a step-by-step trace")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE", global = true)]
    config: Option<String>,

    /// Per-query timeout in milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a name starting at the root servers and print the trace
    Resolve {
        name: String,
        #[arg(default_value = "A")]
        record_type: RecordType,
    },
    /// Send a single question to one nameserver and print the reply
    Query {
        nameserver: String,
        name: String,
        #[arg(default_value = "A")]
        record_type: RecordType,
        /// Set the recursion-desired flag
        #[arg(short, long)]
        recursive: bool,
    },
    /// Run the authoritative responder
    Serve {
        /// Responder port
        #[arg(short = 'p', long)]
        port: Option<u16>,
        /// Responder bind address
        #[arg(short = 'b', long)]
        bind: Option<String>,
        /// Names whose askers are printed on shutdown
        #[arg(long = "watch", value_name = "NAME")]
        watch: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let (responder_port, responder_bind) = match &cli.command {
        Command::Serve { port, bind, .. } => (*port, bind.clone()),
        _ => (None, None),
    };
    let cli_overrides = CliOverrides {
        responder_port,
        responder_bind,
        query_timeout_ms: cli.timeout_ms,
        log_level: cli.log_level.clone(),
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config);

    info!("Starting dnstrace v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Resolve { name, record_type } => {
            commands::resolve(&config, &name, record_type).await
        }
        Command::Query {
            nameserver,
            name,
            record_type,
            recursive,
        } => commands::query(&config, &nameserver, &name, record_type, recursive).await,
        Command::Serve { watch, .. } => commands::serve(&config, &watch).await,
    }
}
