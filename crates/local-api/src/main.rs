use anyhow::{Context, Result};

mod handlers;
mod pages;

use axum::{
    extract::State,
    handler::HandlerWithoutStateExt,
    http::{header, HeaderName, Method},
    routing::{get, post, MethodRouter},
    Router,
};
use bytes::Bytes;
use clap::{Args, Parser, Subcommand};
use intent_common::{ObservableMetrics, PredictorKind};
use intent_config::{AppConfig, ConfigLoader, ModelRegistry};
use intent_runtime::{ModelRuntime, PredictorRegistry};
use std::{net::{IpAddr, SocketAddr}, path::{Path, PathBuf}, sync::Arc, time::SystemTime};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone)]
pub(crate) struct AppState {
    predictors: Arc<PredictorRegistry>,
    metrics: Arc<ObservableMetrics>,
    start_time: SystemTime,
}

impl AppState {
    fn new(predictors: Arc<PredictorRegistry>) -> Self {
        Self {
            predictors,
            metrics: Arc::new(ObservableMetrics::new()),
            start_time: SystemTime::now(),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "intent-server", version, about = "Classify short banking messages into intent categories")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load both classifiers and serve HTTP
    Serve(ServeArgs),
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Path to a JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Address to bind, overrides the configuration
    #[arg(long)]
    host: Option<String>,
    /// Port to bind, overrides the configuration
    #[arg(long)]
    port: Option<u16>,
}

/// Route a POST endpoint to the entry handler with a fixed predictor
fn entry_route(kind: PredictorKind) -> MethodRouter<AppState> {
    post(move |State(state): State<AppState>, body: Bytes| {
        handlers::create_entry(state, kind, body)
    })
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([HeaderName::from_static("x-requested-with"), header::CONTENT_TYPE])
}

pub(crate) fn build_router(state: AppState, static_dir: &Path) -> Router {
    let static_files = ServeDir::new(static_dir)
        .not_found_service(pages::not_found_page.into_service());

    Router::new()
        .route("/", get(pages::homepage))
        .route("/chat", get(pages::chat_window))
        .nest_service("/static", static_files)
        .route("/create-entry", entry_route(PredictorKind::Primary))
        .route("/create-entry-oos", entry_route(PredictorKind::Oos))
        .route("/healthz", get(handlers::health_check))
        .route("/metrics", get(handlers::get_metrics))
        .fallback(pages::fallback)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn apply_overrides(mut config: AppConfig, args: &ServeArgs) -> Result<AppConfig> {
    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config.validate()?;
    Ok(config)
}

async fn serve(args: ServeArgs) -> Result<()> {
    let config = apply_overrides(ConfigLoader::load(args.config.as_ref())?, &args)?;

    let registry = ModelRegistry::for_config(&config)?;

    // Both classifiers must be in memory before the listener exists
    let predictors = ModelRuntime::create(&config, &registry)
        .await
        .context("failed to load classifier models")?;

    let state = AppState::new(predictors);
    let app = build_router(state, &config.server.static_dir);

    let ip: IpAddr = config.server.host.parse()
        .with_context(|| format!("invalid server.host '{}'", config.server.host))?;
    let addr = SocketAddr::new(ip, config.server.port);
    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Command::Serve(args)) => {
            info!("Starting intent server");
            serve(args).await
        }
        None => {
            info!("Nothing to do, run `intent-server serve` to start the server");
            Ok(())
        }
    }
}
