use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::bail;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cadhub::config::ServerConfig;
use cadhub::files::describe_file;
use cadhub::seed::seed_demo_project;
use cadhub::server::{AppState, create_router};
use cadhub::service::ProjectService;
use cadhub::store::{SqliteStore, Store};

#[derive(Parser)]
#[command(name = "cadhub")]
#[command(about = "Version control metadata server for CAD files", long_about = None)]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and database
    Init {
        /// Data directory for the database
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },

    /// Start the server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(long, short)]
        port: Option<u16>,

        /// Data directory for the database
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },

    /// Load the "Robotic Arm Assembly" demo project
    Seed {
        /// Data directory for the database
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },

    /// Print the commit manifest entries for CAD files as JSON
    Manifest {
        /// Files to describe
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<ServerConfig> {
    match path {
        Some(path) => Ok(ServerConfig::load(path)?),
        None => Ok(ServerConfig::default()),
    }
}

/// Opens the database of an initialized data directory.
fn open_store(config: &ServerConfig) -> anyhow::Result<SqliteStore> {
    let db_path = config.db_path();
    if !db_path.exists() {
        bail!(
            "Database not found at {}. Run 'cadhub init' first.",
            db_path.display()
        );
    }

    let store = SqliteStore::new(&db_path)?;
    store.initialize()?;
    Ok(store)
}

fn run_init(config: &ServerConfig) -> anyhow::Result<()> {
    fs::create_dir_all(&config.data_dir)?;

    let db_path = config.db_path();
    let store = SqliteStore::new(&db_path)?;
    store.initialize()?;

    println!("Initialized database at {}", db_path.display());
    Ok(())
}

fn run_seed(config: &ServerConfig) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let service = ProjectService::new(&store, config);
    let project = seed_demo_project(&service)?;

    println!("Created demo project '{}' ({})", project.name, project.id);
    Ok(())
}

fn run_manifest(paths: &[PathBuf]) -> anyhow::Result<()> {
    let manifest = paths
        .iter()
        .map(|path| describe_file(path))
        .collect::<Result<Vec<_>, _>>()?;

    println!("{}", serde_json::to_string_pretty(&manifest)?);
    Ok(())
}

async fn run_serve(config: ServerConfig) -> anyhow::Result<()> {
    let store = open_store(&config)?;
    let addr = config.socket_addr()?;

    let state = Arc::new(AppState::new(Arc::new(store), config));
    let app = create_router(state);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("cadhub=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Init { data_dir } => {
            if let Some(data_dir) = data_dir {
                config.data_dir = data_dir;
            }
            run_init(&config)?;
        }
        Commands::Serve {
            host,
            port,
            data_dir,
        } => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(data_dir) = data_dir {
                config.data_dir = data_dir;
            }
            run_serve(config).await?;
        }
        Commands::Seed { data_dir } => {
            if let Some(data_dir) = data_dir {
                config.data_dir = data_dir;
            }
            run_seed(&config)?;
        }
        Commands::Manifest { paths } => {
            run_manifest(&paths)?;
        }
    }

    Ok(())
}
