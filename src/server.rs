use std::path::PathBuf;

use clap::Parser;
use devis::api::{self, AppState};
use devis::assets;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Service HTTP de génération de devis PDF.
#[derive(Parser)]
#[command(name = "devis-server", version)]
struct Args {
    #[arg(long, env = "DEVIS_HOST", default_value = "0.0.0.0")]
    host: String,

    #[arg(long, env = "DEVIS_PORT", default_value_t = 3000)]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    let state = AppState { asset_dir: PathBuf::from(assets::ASSET_DIR) };
    let app = api::router(state);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("devis server listening on {}", addr);
    tracing::info!("  - POST /quote");
    tracing::info!("  - GET  /health");
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,devis=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
