mod deals;
mod ingest;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "dealsnap-cli")]
#[command(about = "Deal extraction and storage for signage photos")]
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
    /// Process a batch of queued messages and store the deals
    Ingest {
        /// Read the payload from this file instead of stdin
        #[arg(long)]
        file: Option<PathBuf>,
        /// Shape of the payload
        #[arg(long, value_enum, default_value_t = PayloadFormat::Event)]
        format: PayloadFormat,
    },
    /// Assemble one message and print the deal without touching the database
    Extract {
        /// Read the message from this file instead of stdin
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Browse stored deals
    Deals {
        #[command(subcommand)]
        command: DealsCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Apply pending migrations
    Migrate,
    /// Check database connectivity
    Ping,
}

#[derive(Debug, Subcommand)]
enum DealsCommands {
    /// List deals, newest first
    List {
        /// Only deals with no expiration or one in the future
        #[arg(long)]
        active: bool,
        /// Maximum number of deals to show
        #[arg(long, default_value = "20")]
        limit: u32,
    },
    /// Show one deal
    Show {
        /// Deal id
        id: Uuid,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PayloadFormat {
    /// A queue event: `{"Records": [{"body": "..."}]}`
    Event,
    /// One message body per line
    Lines,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // `extract` is offline and must work without any database settings.
    if let Some(Commands::Extract { file }) = &cli.command {
        init_tracing("info");
        return ingest::run_extract(file.as_deref());
    }

    let config = dealsnap_core::load_app_config()?;
    init_tracing(&config.log_level);

    let Some(command) = cli.command else {
        println!("dealsnap-cli ready; run with --help for commands");
        return Ok(());
    };

    let pool_config = dealsnap_db::PoolConfig::from_app_config(&config);

    match command {
        Commands::Ingest { file, format } => {
            let sink =
                dealsnap_ingest::PgDealSink::open(&config.database_url, pool_config).await?;
            let result = ingest::run_ingest(&sink, file.as_deref(), format).await;
            sink.close().await;
            result
        }
        Commands::Db { command } => {
            let pool = dealsnap_db::connect_pool(&config.database_url, pool_config).await?;
            let result = run_db(&pool, command).await;
            pool.close().await;
            result
        }
        Commands::Deals { command } => {
            let pool = dealsnap_db::connect_pool(&config.database_url, pool_config).await?;
            let result = deals::run_deals(&pool, command).await;
            pool.close().await;
            result
        }
        // Handled before the config is loaded.
        Commands::Extract { .. } => Ok(()),
    }
}

async fn run_db(pool: &sqlx::PgPool, command: DbCommands) -> anyhow::Result<()> {
    match command {
        DbCommands::Migrate => {
            let applied = dealsnap_db::run_migrations(pool).await?;
            println!("applied {applied} migration(s)");
        }
        DbCommands::Ping => {
            dealsnap_db::health_check(pool).await?;
            println!("database ok");
        }
    }
    Ok(())
}

fn init_tracing(fallback: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
