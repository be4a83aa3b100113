// Server module - HTTP routing and middleware
pub mod envelope;
pub mod error;
pub mod handlers;
pub mod pagination;
pub mod state;

use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::entities::{Client, Contract, Entity, Property, Transaction};

pub use envelope::{ApiResponse, DeleteResult};
pub use error::ApiError;
pub use state::AppState;

/// Create the Axum application router with all routes and middleware
pub fn create_app(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .nest("/api/clients", entity_routes::<Client>())
        .nest("/api/properties", entity_routes::<Property>())
        .nest("/api/transactions", entity_routes::<Transaction>())
        .nest("/api/contracts", entity_routes::<Contract>())
        .route(
            "/api/health",
            get(handlers::health_check).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/dashboard",
            get(handlers::dashboard).fallback(handlers::method_not_allowed),
        )
        .fallback(handlers::not_found)
        .layer(create_cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CRUD routes for one entity, mounted under its base path
fn entity_routes<E: Entity>() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list::<E>)
                .post(handlers::create::<E>)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/:id",
            get(handlers::get::<E>)
                .put(handlers::update::<E>)
                .delete(handlers::delete::<E>)
                .fallback(handlers::method_not_allowed),
        )
}

/// Browser origins allowed to call the API; an empty list allows any origin
pub fn create_cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE]);

    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "ignoring unparsable CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(allowed)
}

/// Run the server on the specified address
pub async fn run_server(app: Router, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    serve_on(listener, app).await
}

/// Serve on an already bound listener
pub async fn serve_on(listener: tokio::net::TcpListener, app: Router) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    info!("Server listening on {}", addr);
    info!("- API base: http://{}/api", addr);
    info!("- Health endpoint: http://{}/api/health", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
