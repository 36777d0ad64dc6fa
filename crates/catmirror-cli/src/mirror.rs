//! Operator commands against the local mirror tables.

use clap::Subcommand;

use catmirror_core::AppConfig;
use catmirror_db::{CatalogStore, PgCatalogStore};

#[derive(Debug, Subcommand)]
pub enum MirrorCommands {
    /// Show a mirrored product and its category
    ShowProduct { id: i64 },
    /// Remove a product from the mirror; the next sync restores it if it still exists remotely
    DeleteProduct { id: i64 },
}

pub(crate) async fn run(config: &AppConfig, command: MirrorCommands) -> anyhow::Result<()> {
    let store = PgCatalogStore::new(crate::connect(config).await?);

    match command {
        MirrorCommands::ShowProduct { id } => {
            let product = store
                .get_product_by_id(id)
                .await?
                .ok_or_else(|| anyhow::anyhow!("product {id} is not in the mirror"))?;
            let category = store.get_category_by_id(product.category_id).await?;

            println!("id:          {}", product.id);
            println!("title:       {}", product.title);
            println!("price:       {}", product.price);
            println!("description: {}", product.description);
            match category {
                Some(category) => println!("category:    {} ({})", category.name, category.id),
                None => println!("category:    {}", product.category_id),
            }
            if !product.image.is_empty() {
                println!("image:       {}", product.image);
            }
        }
        MirrorCommands::DeleteProduct { id } => {
            if store.delete_product(id).await? {
                println!("removed product {id} from the mirror");
            } else {
                anyhow::bail!("product {id} is not in the mirror");
            }
        }
    }
    Ok(())
}
