//! Shelf HTTP server entrypoint.

use std::net::SocketAddr;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use shelf::config::Config;
use shelf::constants::DEFAULT_PORT;
use shelf::embedding::{Embedder, SentenceConfig, SentenceEmbedder};
use shelf::gateway::{HandlerState, create_app};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!(
        r#"
███████╗██╗  ██╗███████╗██╗     ███████╗
██╔════╝██║  ██║██╔════╝██║     ██╔════╝
███████╗███████║█████╗  ██║     █████╗
╚════██║██╔══██║██╔══╝  ██║     ██╔══╝
███████║██║  ██║███████╗███████╗██║
╚══════╝╚═╝  ╚═╝╚══════╝╚══════╝╚═╝

        READ. EMBED. RECOMMEND.
                                        AGPL-3.0
"#
    );

    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check());
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        top_k = config.top_k,
        "Shelf starting"
    );

    let sentence_config = if let Some(path) = &config.model_path {
        let sentence_config = SentenceConfig::new(path.clone());
        match config.max_seq_len {
            Some(max_seq_len) => sentence_config.with_max_seq_len(max_seq_len),
            None => sentence_config,
        }
    } else {
        tracing::warn!("No SHELF_MODEL_PATH configured, running embedder in stub mode");
        SentenceConfig::stub()
    };
    let embedder = SentenceEmbedder::load(sentence_config)?;

    tracing::info!(
        embedding_dim = embedder.embedding_dim(),
        max_seq_len = embedder.max_seq_len(),
        device = embedder.device_label(),
        stub = embedder.is_stub(),
        "Embedder ready"
    );

    let state = HandlerState::from_embedder(embedder, config.top_k)?;
    let app = create_app(state, config.cors_header_values()?);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shelf shutdown complete");
    Ok(())
}

fn run_health_check() -> i32 {
    let port = std::env::var("SHELF_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let Ok(rt) = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    else {
        return 1;
    };

    rt.block_on(async {
        let Ok(client) = reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()
        else {
            return 1;
        };

        match client.get(&url).send().await {
            Ok(res) if res.status().is_success() => 0,
            _ => 1,
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
