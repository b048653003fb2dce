//! Cart App CLI - database tools and a terminal client for the cart API.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! cartapp-cli migrate
//!
//! # Load the sample catalog
//! cartapp-cli seed --file crates/cli/data/products.yaml
//!
//! # Talk to a running server
//! cartapp-cli products
//! cartapp-cli cart add --user alice --product 1 --quantity 2
//! cartapp-cli cart show --user alice
//!
//! # Interactive shop
//! cartapp-cli shop --user alice
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Insert products from a YAML file
//! - `products` - List the catalog
//! - `cart show|add|update|remove` - One-shot cart operations
//! - `shop` - Interactive terminal shop

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use cartapp_cli::{ApiClient, ShopSession};
use cartapp_core::{ProductId, UserId};

mod commands;

#[derive(Parser)]
#[command(name = "cartapp-cli")]
#[command(author, version, about = "Cart App CLI tools")]
struct Cli {
    /// Base URL of the cart API
    #[arg(
        long,
        global = true,
        env = "CARTAPP_API_URL",
        default_value = "http://localhost:5000"
    )]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Insert products from a YAML file
    Seed {
        /// Path to the product file
        #[arg(short, long, default_value = "crates/cli/data/products.yaml")]
        file: PathBuf,
    },
    /// List the product catalog
    Products,
    /// Inspect or change a user's cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Start the interactive shop
    Shop {
        /// User ID to shop as
        #[arg(short, long)]
        user: UserId,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart with resolved products and total
    Show {
        #[arg(short, long)]
        user: UserId,
    },
    /// Add units of a product
    Add {
        #[arg(short, long)]
        user: UserId,
        #[arg(short, long)]
        product: ProductId,
        /// Units to add (server default is 1)
        #[arg(short, long)]
        quantity: Option<u32>,
    },
    /// Set the quantity of a line (0 removes it)
    Update {
        #[arg(short, long)]
        user: UserId,
        #[arg(short, long)]
        product: ProductId,
        #[arg(short, long)]
        quantity: u32,
    },
    /// Remove a product from the cart
    Remove {
        #[arg(short, long)]
        user: UserId,
        #[arg(short, long)]
        product: ProductId,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cartapp_cli=info,warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { file } => {
            commands::seed::run(&file).await?;
        }
        Commands::Products => {
            let client = ApiClient::new(&cli.api_url)?;
            commands::products::list(&client).await?;
        }
        Commands::Cart { action } => {
            let client = ApiClient::new(&cli.api_url)?;
            match action {
                CartAction::Show { user } => commands::cart::show(&client, &user).await?,
                CartAction::Add {
                    user,
                    product,
                    quantity,
                } => commands::cart::add(&client, &user, product, quantity).await?,
                CartAction::Update {
                    user,
                    product,
                    quantity,
                } => commands::cart::update(&client, &user, product, quantity).await?,
                CartAction::Remove { user, product } => {
                    commands::cart::remove(&client, &user, product).await?;
                }
            }
        }
        Commands::Shop { user } => {
            let client = ApiClient::new(&cli.api_url)?;
            ShopSession::start(client, user).await.run().await?;
        }
    }
    Ok(())
}
