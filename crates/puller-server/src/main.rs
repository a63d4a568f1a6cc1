mod api;
mod cache;
mod middleware;

use std::sync::Arc;

use puller_scraper::{ListingProvider, SerpApiClient, SerpApiConfig};
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    cache::SearchCache,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = puller_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    if config.serpapi_key.is_none() {
        tracing::warn!("SERPAPI_KEY not set; searches will return no listings");
    }

    let client = SerpApiClient::new(SerpApiConfig::from_app_config(&config))?;
    let providers: Vec<Arc<dyn ListingProvider>> = vec![Arc::new(client)];
    let app = build_app(AppState {
        providers: Arc::from(providers),
        cache: SearchCache::new(),
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "puller-server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
