use std::sync::Arc;

use axum_server::tls_rustls::RustlsConfig;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use crate::{
    config::Config,
    database::{
        Database,
        auth::{
            SessionStore,
            storage::{FileStorage, LocalStorage, MemoryStorage},
        },
    },
    state::AppState,
};

mod action;
mod config;
mod database;
mod endpoints;
mod model;
mod routes;
mod security;
mod state;

#[tokio::main]
async fn main() {
    // Begin logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Could not install the log subscriber: {e}");
        return;
    }

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("{e}");
            return;
        }
    };

    let addr = match config.bind_addr() {
        Ok(a) => a,
        Err(e) => {
            tracing::error!("{e}");
            return;
        }
    };

    // The session mirror lives in a file when configured, otherwise only for this process
    let storage: Box<dyn LocalStorage> = match &config.storage_path {
        Some(path) => match FileStorage::open(path) {
            Ok(s) => Box::new(s),
            Err(e) => {
                tracing::error!("{e}");
                return;
            }
        },
        None => Box::new(MemoryStorage::default()),
    };

    // Until this runs every guarded view answers with "loading"
    let mut sessions = SessionStore::new(storage, config.session_ttl());
    sessions.hydrate();

    let tls = config.tls.clone();
    let state = Arc::new(AppState::new(Database::seeded(), sessions, config));
    let app = routes::app(state);

    info!("Serving on {addr}");

    let served = match tls {
        Some(tls) => {
            if rustls::crypto::aws_lc_rs::default_provider()
                .install_default()
                .is_err()
            {
                tracing::warn!("A rustls crypto provider was already installed");
            }

            let rustls_config = match RustlsConfig::from_pem_file(&tls.cert, &tls.key).await {
                Ok(c) => c,
                Err(e) => {
                    tracing::error!(
                        "Could not load certificate {}: {e}",
                        tls.cert.display()
                    );
                    return;
                }
            };

            axum_server::bind_rustls(addr, rustls_config)
                .serve(app.into_make_service())
                .await
        }
        None => {
            axum_server::bind(addr)
                .serve(app.into_make_service())
                .await
        }
    };

    if let Err(e) = served {
        tracing::error!("Server stopped: {e}");
    }
}
