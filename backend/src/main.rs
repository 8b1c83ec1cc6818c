//! Backend entry-point: wires the record store, REST endpoints, change
//! feeds, and OpenAPI docs.

mod server;

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::cookie::{Key, SameSite};
use actix_web::web;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use url::Url;

use backend::domain::ports::RecordStore;
use backend::inbound::http::health::HealthState;
use backend::outbound::store::{InMemoryRecordStore, RestRecordStore};

use server::{ServerConfig, create_server};

fn session_key() -> std::io::Result<Key> {
    let key_path =
        env::var("SESSION_KEY_FILE").unwrap_or_else(|_| "/var/run/secrets/session_key".into());
    match std::fs::read(&key_path) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(e) => {
            let allow_dev = env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %key_path, error = %e, "using temporary session key (dev only)");
                Ok(Key::generate())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read session key at {key_path}: {e}"
                )))
            }
        }
    }
}

fn record_store() -> std::io::Result<Arc<dyn RecordStore>> {
    match env::var("STORE_URL") {
        Ok(raw) => {
            let base = Url::parse(&raw)
                .map_err(|e| std::io::Error::other(format!("invalid STORE_URL {raw}: {e}")))?;
            let store = RestRecordStore::new(base)
                .map_err(|e| std::io::Error::other(format!("store client failed: {e}")))?;
            info!(url = %raw, "using hosted record store");
            Ok(Arc::new(store))
        }
        Err(_) => {
            warn!("STORE_URL not set, using the in-memory record store (data is not persisted)");
            Ok(Arc::new(InMemoryRecordStore::new()))
        }
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let key = session_key()?;
    let cookie_secure = env::var("SESSION_COOKIE_SECURE")
        .map(|v| v != "0")
        .unwrap_or(true);
    let bind_addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8080".into())
        .parse()
        .map_err(|e| std::io::Error::other(format!("invalid BIND_ADDR: {e}")))?;

    let store = record_store()?;
    let config = ServerConfig::new(key, cookie_secure, SameSite::Lax, bind_addr, store);

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(config, health_state.clone())?;

    health_state.mark_ready();
    info!(%bind_addr, "donor registry backend listening");
    server.await
}
