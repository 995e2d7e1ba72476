//! reactograph-import — import a Reactome relational database into an
//! embedded graph store.

use anyhow::Result;
use clap::Parser;
use reactograph::import::{ImportCoordinator, ImportOptions};
use reactograph::persistence::RocksStore;
use reactograph::source::{MySqlSource, SourceConfig};
use reactograph::writer::DEFAULT_BATCH_SIZE;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(
    name = "reactograph-import",
    version,
    about = "Import Reactome pathway data into an embedded graph store"
)]
struct Cli {
    /// The database host
    #[arg(long, default_value = "localhost")]
    host: String,

    /// The database port
    #[arg(long, default_value_t = 3306)]
    port: u16,

    /// The database name to connect to
    #[arg(long, default_value = "reactome")]
    name: String,

    /// The database user
    #[arg(long, default_value = "reactome")]
    user: String,

    /// The password to connect to the database
    #[arg(long, default_value = "reactome")]
    password: String,

    /// Destination directory for the graph store
    #[arg(long, default_value = "./target/graph.db")]
    target: PathBuf,

    /// Include interaction data. Without --intact-file the canonical
    /// dataset is downloaded.
    #[arg(long)]
    interactions: bool,

    /// Path to a local interaction data file (implies --interactions)
    #[arg(long)]
    intact_file: Option<PathBuf>,

    /// Suppress the progress bar; log discrete progress lines instead
    #[arg(long)]
    quiet: bool,

    /// Operations per write batch
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Some(file) = &cli.intact_file {
        if !file.exists() || file.is_dir() {
            eprintln!(
                "{} does not exist or is a directory. Please provide the path to the interaction data file",
                file.display()
            );
            std::process::exit(1);
        }
    }

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = SourceConfig {
        host: cli.host,
        port: cli.port,
        name: cli.name,
        user: cli.user,
        password: cli.password,
    };

    let source = MySqlSource::connect(&config).await?;
    let store = RocksStore::open(&cli.target)?;

    let options = ImportOptions {
        include_interactions: cli.interactions || cli.intact_file.is_some(),
        intact_file: cli.intact_file,
        quiet: cli.quiet,
        batch_size: cli.batch_size,
    };

    let coordinator = ImportCoordinator::new(source, store, options);

    // Ctrl-C requests a clean abort: the producer stops, completed batches
    // are flushed, the run reports failure.
    let abort = coordinator.abort_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received; aborting import");
            abort.trigger();
        }
    });

    let summary = coordinator.import_all().await?;
    info!("{}", summary.counters);

    Ok(())
}
