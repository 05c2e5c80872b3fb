//! Sr. Robot CLI - Configuration and catalog tools.
//!
//! # Usage
//!
//! ```bash
//! # Hash the administrator password for SR_ROBOT_ADMIN_PASSWORD_HASH
//! sr-cli hash-password 'Robot-Admin-9'
//!
//! # List the seed catalog, filtered and sorted like the storefront
//! sr-cli catalog --category Audio --sort rating
//! ```
//!
//! # Commands
//!
//! - `hash-password` - Print an Argon2 PHC hash
//! - `catalog` - List products through the catalog filter

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use sr_robot_core::SortKey;

mod commands;

#[derive(Parser)]
#[command(name = "sr-cli")]
#[command(author, version, about = "Sr. Robot CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hash an administrator password
    HashPassword {
        /// Password to hash; read from stdin when omitted
        password: Option<String>,
    },
    /// List the seed catalog
    Catalog {
        /// Text matched against name or description
        #[arg(short, long)]
        query: Option<String>,

        /// Exact category
        #[arg(short, long)]
        category: Option<String>,

        /// Inclusive lower price bound
        #[arg(long)]
        min_price: Option<Decimal>,

        /// Inclusive upper price bound
        #[arg(long)]
        max_price: Option<Decimal>,

        /// Only products in stock
        #[arg(long)]
        in_stock: bool,

        /// `name`, `price-low`, `price-high` or `rating`
        #[arg(short, long, default_value = "name")]
        sort: SortKey,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli);

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::HashPassword { password } => commands::hash_password::run(password)?,
        Commands::Catalog {
            query,
            category,
            min_price,
            max_price,
            in_stock,
            sort,
        } => commands::catalog::run(&commands::catalog::CatalogArgs {
            query,
            category,
            min_price,
            max_price,
            in_stock,
            sort,
        }),
    }
    Ok(())
}
