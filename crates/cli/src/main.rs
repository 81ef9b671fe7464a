//! Folkmint CLI - Demo data and database management tools.
//!
//! # Usage
//!
//! ```bash
//! # Load the demo catalog (safe to re-run)
//! fm-cli seed
//!
//! # Check that the configured database is reachable
//! fm-cli check
//!
//! # Create a user with an explicit role
//! fm-cli user create -e staff@folkmint.com -p secret -f Rina -l Akter -r admin
//! ```
//!
//! Database settings come from the same environment variables as the
//! storefront (`DATABASE_URL` or `DB_*`, `.env` honoured).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "fm-cli")]
#[command(author, version, about = "Folkmint CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Insert the demo categories, products, variants and images
    Seed,
    /// Connect to the database and report the server version
    Check,
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password (stored as given)
        #[arg(short, long)]
        password: String,

        /// First name
        #[arg(short, long)]
        first_name: String,

        /// Last name
        #[arg(short, long)]
        last_name: String,

        /// Role (`customer`, `admin`)
        #[arg(short, long, default_value = "customer")]
        role: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Seed => commands::seed::demo_catalog().await?,
        Commands::Check => commands::check::database().await?,
        Commands::User { action } => match action {
            UserAction::Create {
                email,
                password,
                first_name,
                last_name,
                role,
            } => {
                commands::user::create(&email, &password, &first_name, &last_name, &role).await?;
            }
        },
    }
    Ok(())
}
