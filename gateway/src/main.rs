use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use gateway::config::{self, LogFormat};
use gateway::conversion::ConversionResponse;
use gateway::upstream::youtube::extract_video_id;
use gateway::{api, cli, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let log_format = LogFormat::parse(std::env::var("GATEWAY_LOG_FORMAT").ok().as_deref())?;
    init_tracing(log_format);

    let cfg = config::load()?;

    let args = cli::Cli::parse();

    let result = match args.command {
        Some(cli::Commands::Serve { port }) => run_server(cfg, port).await,
        Some(cli::Commands::Convert { token, seed }) => run_convert(cfg, &token, seed).await,
        Some(cli::Commands::VideoId { link }) => match extract_video_id(&link) {
            Some(id) => {
                println!("{}", id);
                Ok(())
            }
            None => Err(anyhow::anyhow!("no video id found in link: {}", link)),
        },
        None => run_server(cfg, None).await,
    };

    if let Err(ref e) = result {
        eprintln!("Error: {:?}", e);
    }
    result
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "gateway=debug,tower_http=info".into()),
    );
    let fmt_layer = match format {
        LogFormat::Json => tracing_subscriber::fmt::layer().json().boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().boxed(),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

async fn run_convert(cfg: config::Config, token: &str, seed: Option<u64>) -> anyhow::Result<()> {
    let token = token.trim();
    if token.is_empty() {
        anyhow::bail!("--token must not be empty");
    }

    let state = AppState::from_config(cfg)?;
    let result = match seed {
        Some(seed) => state.converter.convert_seeded(token, seed).await,
        None => state.converter.convert(token).await,
    };

    let body = serde_json::to_string_pretty(&ConversionResponse::from(result))?;
    println!("{}", body);
    Ok(())
}

#[cfg(not(feature = "lambda"))]
async fn run_server(cfg: config::Config, port: Option<u16>) -> anyhow::Result<()> {
    use anyhow::Context as _;
    use std::net::SocketAddr;

    let port = port.unwrap_or(cfg.port);
    let state = Arc::new(AppState::from_config(cfg)?);
    let app = api::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("Lookup gateway listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Lookup gateway stopped");
    Ok(())
}

/// Serverless entry point: the same router, driven by the Lambda runtime.
#[cfg(feature = "lambda")]
async fn run_server(cfg: config::Config, _port: Option<u16>) -> anyhow::Result<()> {
    let state = Arc::new(AppState::from_config(cfg)?);
    let app = api::router(state);
    tracing::info!("Lookup gateway running under the Lambda runtime");
    lambda_http::run(app)
        .await
        .map_err(|e| anyhow::anyhow!("lambda runtime error: {}", e))
}

#[cfg(not(feature = "lambda"))]
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown signal received");
}
