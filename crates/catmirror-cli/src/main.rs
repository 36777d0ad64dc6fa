mod mirror;
mod products;
mod sync;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::mirror::MirrorCommands;
use crate::products::ProductsCommands;

#[derive(Debug, Parser)]
#[command(name = "catmirror")]
#[command(about = "Mirror a remote product catalog into Postgres and manage its products")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Pull categories and products from the remote catalog into the mirror
    Sync {
        /// Reconcile into a throwaway in-memory store instead of Postgres
        #[arg(long)]
        dry_run: bool,
        /// Print the sync report as JSON
        #[arg(long)]
        json: bool,
    },
    /// List recent sync runs
    Runs {
        /// Maximum number of runs to show
        #[arg(long, default_value = "10")]
        limit: i64,
    },
    /// Browse and edit products on the remote catalog
    Products {
        #[command(subcommand)]
        command: ProductsCommands,
    },
    /// Inspect or prune the local mirror
    Mirror {
        #[command(subcommand)]
        command: MirrorCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    Ping,
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();
    let config = catmirror_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Some(Commands::Db { command }) => run_db(&config, command).await?,
        Some(Commands::Sync { dry_run, json }) => sync::run_sync(&config, dry_run, json).await?,
        Some(Commands::Runs { limit }) => sync::run_list_runs(&config, limit).await?,
        Some(Commands::Products { command }) => products::run(&config, command).await?,
        Some(Commands::Mirror { command }) => mirror::run(&config, command).await?,
        None => println!("no command given; run `catmirror --help` for usage"),
    }

    Ok(())
}

async fn run_db(config: &catmirror_core::AppConfig, command: DbCommands) -> anyhow::Result<()> {
    let pool = connect(config).await?;
    match command {
        DbCommands::Ping => {
            catmirror_db::ping(&pool).await?;
            println!("database ok");
        }
        DbCommands::Migrate => {
            let applied = catmirror_db::run_migrations(&pool).await?;
            println!("migrations applied: {applied}");
        }
    }
    Ok(())
}

pub(crate) async fn connect(config: &catmirror_core::AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let pool = catmirror_db::connect_pool_from_config(config).await?;
    Ok(pool)
}

pub(crate) fn build_client(
    config: &catmirror_core::AppConfig,
) -> anyhow::Result<catmirror_client::CatalogClient> {
    catmirror_client::CatalogClient::new(
        &config.api_base_url,
        config.api_timeout_secs,
        &config.api_user_agent,
    )
    .map_err(|e| anyhow::anyhow!("failed to build catalog client: {e}"))
}
