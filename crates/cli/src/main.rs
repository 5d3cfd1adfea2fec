use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use clap::{Args, Parser, Subcommand};
use tokio::sync::Mutex;

use packcart_core::Sku;
use packcart_pricing::{PricingCatalog, quote};
use packcart_quantity::QuantityController;
use packcart_storefront::memory::MemoryPage;
use packcart_storefront::{
    CatalogSource, ClientError, FormElements, HttpCartApi, HttpCatalogSource, ProductForm,
    SelectedVariant, StorefrontConfig,
};

#[derive(Parser)]
#[command(name = "packcart")]
#[command(about = "Quantity-tiered pricing and pack-size aware add-to-cart", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the unit price for a quantity after pack-size normalization
    Quote(QuoteArgs),

    /// Add a variant to the storefront cart
    Add(AddArgs),
}

/// Quantity input attributes, as the product page would carry them.
#[derive(Args)]
struct QuantityArgs {
    /// Requested quantity
    #[arg(long)]
    quantity: String,

    /// Base64-encoded pack size (`data-encoded-min`)
    #[arg(long, value_name = "B64")]
    pack_size_attr: Option<String>,

    /// Minimum order quantity (`data-min`)
    #[arg(long)]
    moq: Option<String>,
}

impl QuantityArgs {
    fn controller(&self) -> QuantityController {
        QuantityController::initialize(
            self.pack_size_attr.as_deref(),
            self.moq.as_deref(),
            Some(self.quantity.as_str()),
        )
    }
}

#[derive(Args)]
struct QuoteArgs {
    #[arg(long)]
    sku: String,

    #[command(flatten)]
    quantity: QuantityArgs,

    /// Read the pricing catalog from a local JSON file instead of PACKCART_PRICING_URL
    #[arg(long, value_name = "PATH")]
    catalog: Option<PathBuf>,
}

#[derive(Args)]
struct AddArgs {
    #[arg(long)]
    variant_id: String,

    #[arg(long)]
    sku: String,

    #[command(flatten)]
    quantity: QuantityArgs,

    /// Product title shown in the cart notification
    #[arg(long, default_value = "")]
    title: String,

    /// Cart sections to re-render after the add
    #[arg(long = "section", value_name = "ID")]
    sections: Vec<String>,
}

/// Pricing catalog stored on disk.
struct FileCatalog(PathBuf);

#[async_trait]
impl CatalogSource for FileCatalog {
    async fn fetch_catalog(&self) -> Result<PricingCatalog, ClientError> {
        let body = tokio::fs::read_to_string(&self.0)
            .await
            .map_err(|e| ClientError::Network(format!("{}: {e}", self.0.display())))?;
        PricingCatalog::from_json(&body).map_err(|e| ClientError::Parse(e.to_string()))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    packcart_observability::init();

    let cli = Cli::parse();
    let config = StorefrontConfig::from_env();

    match cli.command {
        Commands::Quote(args) => run_quote(&config, args).await,
        Commands::Add(args) => run_add(config, args).await,
    }
}

async fn run_quote(config: &StorefrontConfig, args: QuoteArgs) -> anyhow::Result<()> {
    let source: Box<dyn CatalogSource> = match args.catalog {
        Some(path) => Box::new(FileCatalog(path)),
        None => Box::new(HttpCatalogSource::from_config(config)),
    };
    let catalog = source
        .fetch_catalog()
        .await
        .context("error fetching pricing data")?;

    let controller = args.quantity.controller();
    let quantity = controller
        .current_quantity()
        .context("quantity could not be determined")?;
    let priced = quote(&catalog, &Sku::new(&args.sku), quantity)?;

    println!(
        "{} x {} @ {} = {}",
        priced.quantity,
        priced.sku,
        priced.display_unit_price(),
        priced.display_line_total()
    );
    if let Err(err) = controller.validate_for_submission() {
        println!("note: {err}");
    }
    Ok(())
}

async fn run_add(config: StorefrontConfig, args: AddArgs) -> anyhow::Result<()> {
    let sections: Vec<&str> = args.sections.iter().map(String::as_str).collect();
    let page = Arc::new(
        MemoryPage::new()
            .with_quantity_input(
                args.quantity.pack_size_attr.as_deref(),
                args.quantity.moq.as_deref(),
                Some(args.quantity.quantity.as_str()),
            )
            .with_variant(SelectedVariant {
                sku: Sku::parse(&args.sku)?,
                variant_id: args.variant_id.clone(),
                title: args.title.clone(),
                image_url: String::new(),
            })
            .with_sections(&sections),
    );

    let controller = args.quantity.controller();
    let mut elements = FormElements::new(page.clone());
    elements.quantity = Some(page.clone());
    elements.variant = Some(page.clone());
    elements.error_banner = Some(page.clone());
    if !sections.is_empty() {
        elements.notification = Some(page.clone());
    }

    let form = ProductForm::new(
        config.clone(),
        Arc::new(HttpCatalogSource::from_config(&config)),
        Arc::new(HttpCartApi::from_config(&config)),
        elements,
        Arc::new(Mutex::new(controller)),
    );

    let result = form.submit().await;
    if let Some(message) = page.snapshot().error_message {
        eprintln!("{message}");
    }
    let response = result?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
