//! Pixel Gateway - short-lived signatures and placeholder images.
//!
//! This binary starts the HTTP server and the signature janitor.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pixel_gateway::{
    config::Config,
    images::{ImageRenderer, ImageStore, PlaceholderRenderer, SolidColorRenderer},
    keys::KeyStore,
    server::{create_router, AppState, RouterConfig},
    signature::{Janitor, SignatureIssuer, SignatureRegistry},
    SharedClock, SystemClock,
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    // Initialize logging
    init_logging(config.verbose);

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let clock: SharedClock = Arc::new(SystemClock);

    // Key store
    let keys = KeyStore::new(config.api_keys_or_default()).with_filler_keys(config.filler_keys);

    info!("Configuration:");
    if config.uses_default_api_key() {
        warn!("  API keys: using the built-in development key");
        warn!("            Configure real keys with --api-key or API_KEYS");
    } else {
        info!("  API keys: {} configured", config.api_keys.len());
    }
    if config.filler_keys > 0 {
        info!("  Filler keys: {}", config.filler_keys);
    }
    info!("  Signature TTL: {}ms", config.signature_ttl_ms);
    info!("  Sweep interval: {}s", config.sweep_interval_secs);
    info!("  Images: {} (max {})", config.images_dir.display(), config.max_images);
    info!("  Public assets: {}", config.public_dir.display());

    // Signatures
    let registry = Arc::new(SignatureRegistry::new(Arc::clone(&clock)));
    let issuer = SignatureIssuer::with_ttl(Arc::clone(&registry), config.signature_ttl());

    // Image storage
    let renderer: Arc<dyn ImageRenderer> = if config.render_color {
        Arc::new(SolidColorRenderer)
    } else {
        Arc::new(PlaceholderRenderer)
    };
    let images = ImageStore::new(&config.images_dir, renderer, clock, config.max_images);
    if let Err(e) = images.ensure_dir().await {
        error!(
            "Failed to create image directory {}: {}",
            config.images_dir.display(),
            e
        );
        return ExitCode::FAILURE;
    }

    let state = AppState::new(keys, issuer, images);
    let router = create_router(state, build_router_config(&config));

    let addr = config.bind_address();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    let janitor = Janitor::with_interval(Arc::clone(&registry), config.sweep_interval()).spawn();

    info!("");
    info!("  Server running on port {}", config.port);
    info!("  Access the server at http://localhost:{}", config.port);
    info!("");

    let result = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    janitor.shutdown().await;

    if let Err(e) = result {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Server stopped");
    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "pixel_gateway=debug,tower_http=debug"
    } else {
        "pixel_gateway=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build RouterConfig from the application Config.
fn build_router_config(config: &Config) -> RouterConfig {
    let mut router_config = RouterConfig::new()
        .with_public_dir(&config.public_dir)
        .with_tracing(!config.no_tracing);

    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    router_config
}

/// Resolve on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
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
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
