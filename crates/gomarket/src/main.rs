use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gomarket::store::SqliteStore;
use gomarket::{AppShell, CartConfig, CartError, ProductDescriptor, ProductId};
use tracing_subscriber::EnvFilter;

/// gomarket - inspect and edit the persisted GoMarket cart
#[derive(Parser)]
#[command(name = "gomarket")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the cart database
    #[arg(long, env = "GOMARKET_DB", default_value = "gomarket.db", global = true)]
    db: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the cart
    List,

    /// Add one unit of a product
    Add {
        #[arg(long)]
        id: String,

        #[arg(long)]
        title: String,

        #[arg(long, default_value = "")]
        image_url: String,

        #[arg(long)]
        price: f64,
    },

    /// Add one unit to a product already in the cart
    Increment { id: String },

    /// Remove one unit from a product already in the cart
    Decrement { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .without_time()
        .init();

    let cli = Cli::parse();
    let config = CartConfig::from_env()?;
    let backend = SqliteStore::open(&cli.db)
        .with_context(|| format!("failed to open {}", cli.db.display()))?;

    let app = AppShell::bootstrap(backend, config).await;
    let cart = app.context().use_cart()?;

    let outcome = match cli.command {
        Commands::List => Ok(()),
        Commands::Add {
            id,
            title,
            image_url,
            price,
        } => cart
            .add_to_cart(ProductDescriptor::new(id, title, image_url, price))
            .map(drop),
        Commands::Increment { id } => cart.increment(&ProductId::new(id)).map(drop),
        Commands::Decrement { id } => cart.decrement(&ProductId::new(id)).map(drop),
    };

    println!("{}", cart.encoded()?);
    drop(cart);

    let status = app.shutdown().await;
    if let Some(error) = status.last_error {
        anyhow::bail!("cart was not saved: {}", error);
    }

    match outcome {
        Err(CartError::ItemNotFound(id)) => anyhow::bail!("product {} is not in the cart", id),
        other => Ok(other?),
    }
}
