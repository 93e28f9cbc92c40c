// Gateway server and operator tooling

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands {
    pub mod call;
    pub mod serve;
}

#[derive(Parser)]
#[command(name = "estate-gateway")]
#[command(about = "Real-estate transaction gateway", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP gateway until interrupted
    Serve {
        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Run one contract operation by name against the filesystem ledger and
    /// print the outcome
    Call {
        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Contract operation name (createAsset, makeOffer, ...)
        operation: String,

        /// Positional arguments in contract order
        args: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => commands::serve::run(config.as_deref(), cli.verbose).await,
        Commands::Call {
            config,
            operation,
            args,
        } => commands::call::run(config.as_deref(), cli.verbose, &operation, &args).await,
    }
}
