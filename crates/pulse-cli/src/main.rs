mod ingest;
mod summary;

use clap::{Parser, Subcommand};
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "pulse-cli")]
#[command(about = "Pulse command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Ingest a CSV/JSON export into a dashboard.
    Ingest {
        /// Target dashboard id.
        #[arg(long)]
        dashboard: Uuid,
        /// Path to the .csv or .json file.
        #[arg(long)]
        file: std::path::PathBuf,
        /// Replace the dashboard's existing posts instead of appending.
        #[arg(long)]
        overwrite: bool,
    },
    /// Print the analytics summary for a dashboard.
    Summary {
        /// Target dashboard id.
        #[arg(long)]
        dashboard: Uuid,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let pool = pulse_db::connect_pool_from_env().await?;
    pulse_db::run_migrations(&pool).await?;

    match cli.command {
        Commands::Ingest {
            dashboard,
            file,
            overwrite,
        } => ingest::run(&pool, dashboard, &file, overwrite).await,
        Commands::Summary { dashboard } => summary::run(&pool, dashboard).await,
    }
}
