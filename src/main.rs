//! Multisig account CLI
//!
//! Drives a file-backed multisig account from the command line. The block
//! height is supplied per call since there is no chain behind the CLI.

use clap::{Parser, Subcommand};
use multisig_account::cli::{self, AppState};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "multisig")]
#[command(author = "Darshan")]
#[command(version = "0.1.0")]
#[command(about = "Unanimous multi-signature account", long_about = None)]
struct Cli {
    /// Data directory for account storage
    #[arg(short, long, default_value = ".multisig_data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new signer identity
    Keygen {
        /// Derive the identity from an existing hex private key instead
        #[arg(long)]
        from_hex: Option<String>,
    },

    /// Configure the signer set
    Init {
        /// Signer address (repeat for each signer)
        #[arg(short, long = "signer", required = true)]
        signers: Vec<String>,

        /// Approval window in blocks (default 20)
        #[arg(short, long)]
        window: Option<u64>,
    },

    /// Submit a transaction for approval
    Submit {
        /// Submitting signer's address
        #[arg(short, long)]
        from: String,

        /// Current block height
        #[arg(long)]
        height: u64,

        /// Payload type URL
        #[arg(short, long)]
        type_url: String,

        /// Payload body as hex
        #[arg(short, long, default_value = "")]
        value: String,
    },

    /// Approve a pending transaction
    Approve {
        /// Approving signer's address
        #[arg(short, long)]
        from: String,

        /// Current block height
        #[arg(long)]
        height: u64,

        /// Transaction ID
        #[arg(short, long)]
        id: u64,
    },

    /// Show a pending transaction
    Query {
        /// Transaction ID
        #[arg(short, long)]
        id: u64,
    },

    /// List pending transactions
    List,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let command = match cli.command {
        Commands::Keygen { from_hex } => {
            cli::cmd_keygen(from_hex.as_deref())?;
            return Ok(());
        }
        command => command,
    };

    let mut state = AppState::new(&cli.data_dir)?;

    match command {
        Commands::Keygen { .. } => {}

        Commands::Init { signers, window } => {
            cli::cmd_init(&mut state, &signers, window)?;
        }

        Commands::Submit {
            from,
            height,
            type_url,
            value,
        } => {
            cli::cmd_submit(&mut state, &from, height, &type_url, &value)?;
        }

        Commands::Approve { from, height, id } => {
            cli::cmd_approve(&mut state, &from, height, id)?;
        }

        Commands::Query { id } => {
            cli::cmd_query(&state, id)?;
        }

        Commands::List => {
            cli::cmd_list(&state)?;
        }
    }

    Ok(())
}
