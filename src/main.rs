use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use storefront_cli::cart::ProductId;
use storefront_cli::transport::cli::{self, OutputFormat, ProductFields};
use storefront_cli::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "storefront")]
#[command(
    author,
    version = concat!(env!("CARGO_PKG_VERSION"), env!("STOREFRONT_VERSION_SUFFIX")),
    about = "Storefront - browse products, fill a cart, and manage the catalog",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Product API base URL (overrides config and STOREFRONT_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the product catalog
    Products {
        #[command(subcommand)]
        action: ProductsCommand,
    },

    /// Interactive shopping session with an in-memory cart
    Shop,

    /// Manage products (create, update, delete)
    Admin {
        #[command(subcommand)]
        action: AdminCommand,
    },

    /// Upload an image file and print its URL
    Upload {
        /// File to upload
        path: PathBuf,
    },

    /// Show the effective configuration
    Config,
}

#[derive(Subcommand)]
enum ProductsCommand {
    /// List all products
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Show one product
    Show {
        /// Product ID
        id: ProductId,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
}

#[derive(Subcommand)]
enum AdminCommand {
    /// Product dashboard table
    List,

    /// Create a product
    Create {
        #[command(flatten)]
        fields: ProductFields,
    },

    /// Update a product; omitted fields keep their current values
    Update {
        /// Product ID
        id: ProductId,

        #[command(flatten)]
        fields: ProductFields,
    },

    /// Delete a product
    Delete {
        /// Product ID
        id: ProductId,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize logging
    let filter = if args.verbose {
        "storefront_cli=debug"
    } else {
        "storefront_cli=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::resolve(args.base_url.as_deref())?;

    match args.command {
        Commands::Products { action } => match action {
            ProductsCommand::List { format } => cli::run_products_list(&config, format).await?,
            ProductsCommand::Show { id, format } => {
                cli::run_product_show(&config, id, format).await?
            }
        },
        Commands::Shop => cli::run_shop(&config).await?,
        Commands::Admin { action } => match action {
            AdminCommand::List => cli::run_admin_list(&config).await?,
            AdminCommand::Create { fields } => cli::run_admin_create(&config, fields).await?,
            AdminCommand::Update { id, fields } => {
                cli::run_admin_update(&config, id, fields).await?
            }
            AdminCommand::Delete { id, yes } => cli::run_admin_delete(&config, id, yes).await?,
        },
        Commands::Upload { path } => cli::run_upload(&config, &path).await?,
        Commands::Config => cli::run_config_show(&config)?,
    }

    Ok(())
}
