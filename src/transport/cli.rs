//! Command runners behind the `storefront` subcommands

use super::render;
use super::shop::ShopSession;
use crate::admin::{AdminService, ProductForm};
use crate::cart::{CartStore, ProductId};
use crate::catalog::{CachedCatalog, ProductApi, ProductSource};
use crate::config::Config;
use crate::notice::Notice;
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Output format for `products list` and `products show`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Product fields accepted by `admin create` and `admin update`
#[derive(Debug, Clone, Default, Args)]
pub struct ProductFields {
    /// Product title
    #[arg(long)]
    pub title: Option<String>,

    /// Price (non-numeric input counts as 0)
    #[arg(long)]
    pub price: Option<String>,

    /// Product description
    #[arg(long)]
    pub description: Option<String>,

    /// Category ID
    #[arg(long)]
    pub category_id: Option<u64>,

    /// Image URL to add (repeatable)
    #[arg(long = "image")]
    pub images: Vec<String>,

    /// Local file to upload and add as an image (repeatable)
    #[arg(long = "upload")]
    pub uploads: Vec<PathBuf>,

    /// Drop the product's existing images before adding new ones
    #[arg(long)]
    pub clear_images: bool,
}

/// Build the cached catalog client described by `config`
pub fn open_catalog(config: &Config) -> Result<CachedCatalog<ProductApi>> {
    let api = ProductApi::from_config(&config.api).context("Failed to create product API client")?;
    tracing::debug!(base_url = %api.base_url(), "product API client ready");
    Ok(CachedCatalog::new(api).with_ttl(Duration::from_secs(config.api.cache_ttl_secs)))
}

pub async fn run_products_list(config: &Config, format: OutputFormat) -> Result<()> {
    let catalog = open_catalog(config)?;
    let products = catalog
        .list_products()
        .await
        .context("Failed to fetch products")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&products)?),
        OutputFormat::Table => {
            println!("\n{}\n", "=== PRODUCTS ===".bold().cyan());
            println!("{}", render::product_table(&products, &config.display));
            println!("{} products", products.len());
        }
    }
    Ok(())
}

pub async fn run_product_show(
    config: &Config,
    id: ProductId,
    format: OutputFormat,
) -> Result<()> {
    let catalog = open_catalog(config)?;
    let product = match catalog.get_product(id).await {
        Ok(product) => product,
        Err(e) if e.is_not_found() => anyhow::bail!("Product not found: {}", id),
        Err(e) => return Err(anyhow::Error::new(e).context("Failed to fetch product")),
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&product)?),
        OutputFormat::Table => print!("{}", render::product_detail(&product, &config.display)),
    }
    Ok(())
}

pub async fn run_shop(config: &Config) -> Result<()> {
    let catalog = open_catalog(config)?;
    let cart = CartStore::new().with_placeholder(config.cart.placeholder_image.clone());
    let session = ShopSession::new(&catalog, cart, &config.display);

    tracing::info!("Starting shop session");
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    session.run(stdin, &mut stdout).await
}

pub async fn run_admin_list(config: &Config) -> Result<()> {
    let catalog = open_catalog(config)?;
    let products = catalog
        .list_products()
        .await
        .context("Failed to fetch products")?;

    println!("\n{}\n", "=== PRODUCT DASHBOARD ===".bold().cyan());
    println!("{}", render::product_table(&products, &config.display));
    Ok(())
}

pub async fn run_admin_create(config: &Config, fields: ProductFields) -> Result<()> {
    let catalog = open_catalog(config)?;
    let mut form = ProductForm {
        category_id: config.api.default_category_id,
        ..ProductForm::default()
    };
    apply_fields(&catalog, &mut form, fields).await?;

    let mut admin = AdminService::new(&catalog);
    admin.dialog_mut().open_create();
    let (notice, product) = admin.create(&form).await;
    report(notice)?;

    if let Some(product) = product {
        print!("{}", render::product_detail(&product, &config.display));
    }
    Ok(())
}

pub async fn run_admin_update(config: &Config, id: ProductId, fields: ProductFields) -> Result<()> {
    let catalog = open_catalog(config)?;
    let existing = catalog
        .get_product(id)
        .await
        .with_context(|| format!("Failed to load product {}", id))?;

    let mut form = ProductForm::from_product(&existing);
    apply_fields(&catalog, &mut form, fields).await?;

    let mut admin = AdminService::new(&catalog);
    admin.dialog_mut().open_update(existing);
    if let Some((notice, product)) = admin.update(&form).await {
        report(notice)?;
        if let Some(product) = product {
            print!("{}", render::product_detail(&product, &config.display));
        }
    }
    Ok(())
}

pub async fn run_admin_delete(config: &Config, id: ProductId, yes: bool) -> Result<()> {
    let catalog = open_catalog(config)?;
    let existing = catalog
        .get_product(id)
        .await
        .with_context(|| format!("Failed to load product {}", id))?;

    if !yes && !confirm_delete(&existing.title).await? {
        println!("{}", Notice::info("Deletion cancelled."));
        return Ok(());
    }

    let mut admin = AdminService::new(&catalog);
    admin.dialog_mut().open_delete(existing);
    if let Some(notice) = admin.delete().await {
        report(notice)?;
    }
    Ok(())
}

pub async fn run_upload(config: &Config, path: &Path) -> Result<()> {
    let catalog = open_catalog(config)?;
    let uploaded = catalog
        .upload_file(path)
        .await
        .with_context(|| format!("Failed to upload {}", path.display()))?;

    println!("{}", Notice::success(format!("Uploaded {}", uploaded.originalname)));
    println!("{}", uploaded.location);
    Ok(())
}

pub fn run_config_show(config: &Config) -> Result<()> {
    let path = Config::config_path()?;
    println!("# {}", path.display());
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

/// Copy the given fields into `form`, uploading files first
async fn apply_fields<S: ProductSource>(
    source: &S,
    form: &mut ProductForm,
    fields: ProductFields,
) -> Result<()> {
    if let Some(title) = fields.title {
        form.title = title;
    }
    if let Some(price) = fields.price {
        form.set_price_text(&price);
    }
    if let Some(description) = fields.description {
        form.description = description;
    }
    if let Some(category_id) = fields.category_id {
        form.category_id = category_id;
    }
    if fields.clear_images {
        form.images.clear();
    }

    let uploads = futures::future::try_join_all(
        fields.uploads.iter().map(|path| source.upload_file(path)),
    )
    .await
    .context("Failed to upload image")?;

    let urls = fields
        .images
        .iter()
        .map(String::as_str)
        .chain(uploads.iter().map(|file| file.location.as_str()));
    for url in urls {
        if !form.add_image(url) {
            anyhow::bail!("Invalid image URL: {}", url);
        }
    }
    Ok(())
}

async fn confirm_delete(title: &str) -> Result<bool> {
    print!(
        "Are you sure you want to delete \"{}\"? This action cannot be undone. [y/N] ",
        title
    );
    std::io::Write::flush(&mut std::io::stdout())?;

    let mut answer = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut answer)
        .await?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

/// Print a notice, turning failures into an error exit
fn report(notice: Notice) -> Result<()> {
    if notice.is_failure() {
        anyhow::bail!("{}", notice.message());
    }
    println!("{}", notice);
    Ok(())
}
