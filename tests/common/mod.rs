//! Shared setup: an API server on an ephemeral port backed by memory stores

#![allow(dead_code)]

use estate_crm::prelude::*;
use tokio::net::TcpListener;

pub fn memory_config() -> AppConfig {
    AppConfig {
        database: DatabaseConfig::memory(),
        ..AppConfig::default()
    }
}

/// Start a server and return its origin, e.g. `http://127.0.0.1:40123`
pub async fn spawn_app(config: AppConfig) -> String {
    let crm = EstateCrm::connect(config)
        .await
        .expect("memory backend always connects");
    let app = create_app(AppState::from(&crm), &[]);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("listener has an address");
    tokio::spawn(async move {
        let _ = serve_on(listener, app).await;
    });

    format!("http://{}", addr)
}

pub async fn spawn_seeded_app() -> String {
    spawn_app(memory_config()).await
}
