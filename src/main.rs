use agri_scout::ai::GeminiVisionClient;
use agri_scout::analysis::AnalysisPipeline;
use agri_scout::http::{self, AppState, RouterOptions, DEFAULT_BODY_LIMIT};
use agri_scout::models::Config;
use anyhow::Result;
use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "agri-scout")]
#[command(about = "Serve AI crop issue diagnosis from field photos")]
struct CliArgs {
    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Address to bind.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: IpAddr,

    /// Comma-separated CORS origins. Any origin when unset.
    #[arg(long, env = "ALLOWED_ORIGINS", value_delimiter = ',')]
    allowed_origins: Vec<String>,

    /// Directory of static web client files.
    #[arg(long, env = "STATIC_DIR")]
    static_dir: Option<PathBuf>,

    /// Maximum request body size in bytes.
    #[arg(long, env = "BODY_LIMIT_BYTES", default_value_t = DEFAULT_BODY_LIMIT)]
    body_limit: usize,
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Loads .env once, before the subscriber and clap read the environment.
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agri_scout=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();

    let inference = GeminiVisionClient::from_config(&config, reqwest::Client::new());
    let configured = config.gemini_api_key.is_some();
    let state = AppState::new(AnalysisPipeline::new(Arc::new(inference)));

    let app = http::router(
        state,
        &RouterOptions {
            allowed_origins: args.allowed_origins,
            body_limit: args.body_limit,
            static_dir: args.static_dir,
        },
    );

    let addr = SocketAddr::new(args.host, args.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Agri-Scout server running on http://{}", addr);
    info!(
        "Gemini API configured: {} (model: {})",
        configured, config.gemini_model
    );
    if !configured {
        warn!("GEMINI_API_KEY not set. AI analysis will not work.");
        warn!("Create a .env file with your API key to enable AI features.");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
