//! Item Purchase CLI - catalog search, checkout, and item creation.
//!
//! # Usage
//!
//! ```bash
//! # Show filter options and search the catalog
//! ip-cli filters
//! ip-cli search rake --family Garden
//!
//! # Check out two widgets and a gadget for an account
//! ip-cli checkout --account 001xx0000001 --item a01W:2:9.99 --item a01G::4,50
//!
//! # Check out lines prepared by another tool
//! ip-cli checkout --account 001xx0000001 --lines lines.json
//!
//! # Create a catalog item
//! ip-cli create-item --name Rake --price 12,50 --family Garden
//!
//! # Replay recorded UI events
//! ip-cli replay events.json
//! ```
//!
//! # Commands
//!
//! - `filters` - Print filter options
//! - `search` - Search the catalog
//! - `account` - Look up an account
//! - `checkout` - Create a purchase from items or prepared lines
//! - `create-item` - Create a catalog item
//! - `replay` - Feed UI events through the app

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "ip-cli")]
#[command(author, version, about = "Item Purchase CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the allowed filter values
    Filters,
    /// Search the catalog
    Search {
        /// Search text (empty matches everything)
        #[arg(default_value = "")]
        text: String,

        /// Item family filter
        #[arg(short, long, default_value = "")]
        family: String,

        /// Item type filter
        #[arg(short = 't', long = "type", default_value = "")]
        item_type: String,
    },
    /// Look up an account
    Account {
        /// Account id
        id: String,
    },
    /// Create a purchase
    Checkout {
        /// Account the purchase is for (defaults to `ITEM_PURCHASE_DEFAULT_ACCOUNT`)
        #[arg(short, long)]
        account: Option<String>,

        /// Cart entry as `ITEM_ID[:AMOUNT[:UNIT_COST]]`, repeatable
        #[arg(short, long = "item")]
        items: Vec<String>,

        /// JSON file with prepared purchase lines
        #[arg(short, long, conflicts_with = "items")]
        lines: Option<PathBuf>,
    },
    /// Create a catalog item
    CreateItem {
        /// Item name
        #[arg(short, long)]
        name: String,

        /// Price, comma or dot as decimal separator
        #[arg(short, long, default_value = "")]
        price: String,

        /// Item type
        #[arg(short = 't', long = "type", default_value = "")]
        item_type: String,

        /// Item family
        #[arg(short, long, default_value = "")]
        family: String,

        /// Description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Image URL
        #[arg(short, long, default_value = "")]
        image: String,

        /// Do not look up an image automatically
        #[arg(long)]
        no_auto_image: bool,
    },
    /// Feed a JSON array of UI events through the app
    Replay {
        /// Events file
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("item_purchase=info,ip_cli=info")),
        )
        .init();

    let cli = Cli::parse();

    let result = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Filters => commands::catalog::filters().await,
        Commands::Search {
            text,
            family,
            item_type,
        } => commands::catalog::search(text, family, item_type).await,
        Commands::Account { id } => commands::catalog::account(&id).await,
        Commands::Checkout {
            account,
            items,
            lines,
        } => commands::purchase::checkout(account, &items, lines.as_deref()).await,
        Commands::CreateItem {
            name,
            price,
            item_type,
            family,
            description,
            image,
            no_auto_image,
        } => {
            let form = item_purchase::create_item::NewItemForm {
                name,
                price_input: price,
                item_type,
                family,
                description,
                image,
                auto_image: !no_auto_image,
            };
            commands::purchase::create_item(&form).await
        }
        Commands::Replay { file } => commands::purchase::replay(&file).await,
    }
}
