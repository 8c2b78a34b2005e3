use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use sustainsearch_core::config::{self, PoolSizing};
use sustainsearch_core::{Database, SearchEngine};
use sustainsearch_server::api::create_router;
use sustainsearch_server::api::handlers::AppState;
use sustainsearch_server::api::metrics;
use sustainsearch_server::corpus;
use sustainsearch_server::embedder::HttpEmbedder;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sustainsearch", about = "Hybrid search over climate news", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the search API over a built collection
    Serve(ServeArgs),
    /// Embed cleaned JSON records and write a fresh collection snapshot
    BuildIndex(BuildIndexArgs),
}

#[derive(Args)]
struct StoreArgs {
    /// Directory holding collection snapshots
    #[arg(short, long, default_value = config::DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Collection name
    #[arg(short, long, default_value = config::DEFAULT_COLLECTION)]
    collection: String,
}

#[derive(Args)]
struct EmbeddingArgs {
    /// OpenAI-compatible embeddings endpoint
    #[arg(long, env = "SUSTAINSEARCH_EMBEDDING_URL", default_value = config::DEFAULT_EMBEDDING_URL)]
    embedding_url: String,

    /// Model name sent with every embedding request
    #[arg(long, default_value = config::DEFAULT_EMBEDDING_MODEL)]
    embedding_model: String,
}

#[derive(Args)]
struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = config::DEFAULT_PORT)]
    port: u16,

    #[command(flatten)]
    store: StoreArgs,

    #[command(flatten)]
    embedding: EmbeddingArgs,

    /// Candidates fetched per strategy, as a multiple of the requested limit
    #[arg(long, default_value_t = config::CANDIDATE_POOL_MULTIPLIER)]
    pool_multiplier: usize,

    /// Minimum candidates fetched per strategy
    #[arg(long, default_value_t = config::CANDIDATE_POOL_FLOOR)]
    pool_floor: usize,
}

#[derive(Args)]
struct BuildIndexArgs {
    /// Directory of cleaned `*.json` records
    #[arg(short, long, default_value = config::DEFAULT_INPUT_DIR)]
    input_dir: PathBuf,

    #[command(flatten)]
    store: StoreArgs,

    #[command(flatten)]
    embedding: EmbeddingArgs,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(
                    "sustainsearch_server=info"
                        .parse()
                        .expect("valid directive literal"),
                )
                .add_directive(
                    "sustainsearch_core=info"
                        .parse()
                        .expect("valid directive literal"),
                ),
        )
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Serve(args) => serve(args).await,
        Command::BuildIndex(args) => build_index(args).await,
    };
    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

async fn serve(args: ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.port == 0 {
        return Err("port must be > 0".into());
    }
    let pool = PoolSizing {
        multiplier: args.pool_multiplier,
        floor: args.pool_floor,
    };
    if pool.pool_size(1) == 0 {
        return Err("pool sizing must fetch at least one candidate".into());
    }

    // Startup binding failures are fatal: never serve without a corpus
    let db = Database::new(args.store.data_dir.clone());
    let collection = Arc::new(db.get_collection(&args.store.collection)?);
    let embedder = HttpEmbedder::new(
        args.embedding.embedding_url.clone(),
        args.embedding.embedding_model.clone(),
    )?;

    let prometheus_handle =
        metrics_exporter_prometheus::PrometheusBuilder::new().install_recorder()?;

    let engine = SearchEngine::from_store(Arc::clone(&collection), Arc::new(embedder))
        .with_pool_sizing(pool);
    metrics::set_document_count(&args.store.collection, engine.document_count());

    let state = AppState {
        engine,
        collection: args.store.collection.clone(),
        prometheus_handle,
        start_time: Instant::now(),
    };
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", args.port);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        port = args.port,
        data_dir = %args.store.data_dir.display(),
        collection = %args.store.collection,
        documents = collection.len(),
        dimension = collection.dimension,
        embedding_url = %args.embedding.embedding_url,
        pool_multiplier = pool.multiplier,
        pool_floor = pool.floor,
        "sustainsearch ready"
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_signal())
        .await?;
    Ok(())
}

async fn build_index(args: BuildIndexArgs) -> Result<(), Box<dyn std::error::Error>> {
    let records = corpus::read_records(&args.input_dir)?;
    tracing::info!(
        records = records.len(),
        input_dir = %args.input_dir.display(),
        "Indexing records"
    );

    let embedder = HttpEmbedder::new(
        args.embedding.embedding_url,
        args.embedding.embedding_model,
    )?;
    let db = Database::new(args.store.data_dir);
    corpus::build_collection(&db, &args.store.collection, records, &embedder).await?;
    Ok(())
}

async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT"),
        _ = terminate => tracing::info!("Received SIGTERM"),
    }

    tracing::info!("Shutting down gracefully, draining in-flight requests...");
}
