//! Remote product commands: list, show, create, edit, delete.

use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};

use catmirror_client::{validate_product, CatalogClient, ClientError, ProductFilter, UploadedFile};
use catmirror_core::AppConfig;
use catmirror_pipeline::{
    ImageResolver, OrchestrationError, ProductForm, ProductMutationOrchestrator,
};

/// Sub-commands available under `products`.
#[derive(Debug, Subcommand)]
pub enum ProductsCommands {
    /// List remote products, optionally filtered
    List {
        /// Match against product titles
        #[arg(long)]
        title: Option<String>,
        /// Only products in this category id
        #[arg(long)]
        category: Option<i64>,
    },
    /// Show one remote product as JSON
    Show { id: i64 },
    /// Create a product on the remote catalog
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        price: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        category_id: String,
        #[command(flatten)]
        image: ImageArgs,
    },
    /// Edit a product; omitted fields keep their current remote values
    Edit {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        price: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category_id: Option<String>,
        #[command(flatten)]
        image: ImageArgs,
    },
    /// Delete a product from the remote catalog
    Delete { id: i64 },
}

/// Image sources for create and edit. Supplying both is reported as a
/// validation error, not rejected by argument parsing.
#[derive(Debug, Args)]
pub struct ImageArgs {
    /// Absolute http(s) URL of an image
    #[arg(long)]
    pub image_url: Option<String>,
    /// Local image file to upload
    #[arg(long)]
    pub image_file: Option<PathBuf>,
}

pub(crate) async fn run(config: &AppConfig, command: ProductsCommands) -> anyhow::Result<()> {
    let client = crate::build_client(config)?;
    let orchestrator = ProductMutationOrchestrator::new(
        &client,
        ImageResolver::new(config.placeholder_image_url.clone()),
    );

    match command {
        ProductsCommands::List { title, category } => {
            list_products(&client, &ProductFilter {
                title,
                category_id: category,
            })
            .await
        }
        ProductsCommands::Show { id } => {
            let raw = client.get_product(id).await.map_err(|e| not_found(id, e))?;
            println!("{}", serde_json::to_string_pretty(&raw)?);
            Ok(())
        }
        ProductsCommands::Create {
            title,
            price,
            description,
            category_id,
            image,
        } => {
            let form = ProductForm {
                title,
                price,
                description,
                category_id,
                image_url: image.image_url,
            };
            let upload = image.image_file.as_deref().map(read_image_file).transpose()?;
            let created = orchestrator
                .create(&form, upload.as_ref())
                .await
                .map_err(report_errors)?;
            println!("created product {} \"{}\"", created.id, created.title);
            Ok(())
        }
        ProductsCommands::Edit {
            id,
            title,
            price,
            description,
            category_id,
            image,
        } => {
            let current = client.get_product(id).await.map_err(|e| not_found(id, e))?;
            let mut form = ProductForm::from_remote(&current);
            if let Some(title) = title {
                form.title = title;
            }
            if let Some(price) = price {
                form.price = price;
            }
            if let Some(description) = description {
                form.description = description;
            }
            if let Some(category_id) = category_id {
                form.category_id = category_id;
            }
            form.image_url = image.image_url;

            let upload = image.image_file.as_deref().map(read_image_file).transpose()?;
            let updated = orchestrator
                .update_loaded(id, &current, &form, upload.as_ref())
                .await
                .map_err(report_errors)?;
            println!("updated product {} \"{}\"", updated.id, updated.title);
            Ok(())
        }
        ProductsCommands::Delete { id } => {
            orchestrator.delete(id).await.map_err(report_errors)?;
            println!("deleted product {id}");
            Ok(())
        }
    }
}

async fn list_products(client: &CatalogClient, filter: &ProductFilter) -> anyhow::Result<()> {
    let raw = client.list_products(filter).await?;
    let mut shown = 0usize;
    for record in &raw {
        match validate_product(record) {
            Ok(product) => {
                shown += 1;
                println!(
                    "{:>6}  {:<40}  {:>10}  category {}",
                    product.id, product.title, product.price, product.category_id
                );
            }
            Err(rejection) => eprintln!("warning: unreadable product {rejection}"),
        }
    }
    println!("{shown} products");
    Ok(())
}

/// Prints every field error and the top-level message to stderr.
fn report_errors(err: OrchestrationError) -> anyhow::Error {
    if let Some(message) = err.errors.message() {
        eprintln!("error: {message}");
    }
    for (field, messages) in err.errors.fields() {
        for message in messages {
            eprintln!("  {field}: {message}");
        }
    }
    anyhow::anyhow!("product request failed at {} step", err.step)
}

fn not_found(id: i64, err: ClientError) -> anyhow::Error {
    match err {
        ClientError::NotFound { .. } => anyhow::anyhow!("product {id} not found"),
        other => anyhow::Error::new(other).context(format!("failed to load product {id}")),
    }
}

pub(crate) fn read_image_file(path: &Path) -> anyhow::Result<UploadedFile> {
    use anyhow::Context as _;

    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read image file {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload")
        .to_owned();
    Ok(UploadedFile {
        content_type: guess_content_type(path).map(str::to_owned),
        file_name,
        bytes,
    })
}

pub(crate) fn guess_content_type(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}
