//! REST API server module for pathlens
//!
//! This module provides the HTTP API consumed by the dashboard: store
//! CRUD, taxonomy lookup and upstream topology queries.
//!
//! # Architecture
//!
//! The server is organized into two submodules:
//!
//! - `error` - The [`ApiError`] type and its status-code mapping
//! - `handlers` - Individual route handler implementations
//!
//! # Usage
//!
//! ```rust,ignore
//! use pathlens::server::{start_server, AppState, ServerConfig};
//! use pathlens::PathlensConfig;
//!
//! let config = PathlensConfig::new(&None)?;
//! let state = AppState::from_config(&config)?;
//!
//! let server = ServerConfig::new()
//!     .with_address(config.host.clone())
//!     .with_port(config.port);
//! start_server(state, server).await?;
//! ```

pub mod error;
pub mod handlers;

// Re-export commonly used types
pub use error::ApiError;
pub use handlers::AppState;

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

// =============================================================================
// Server Configuration
// =============================================================================

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub address: String,

    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// Create a new server configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the address
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    /// Set the port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Get the full bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

// =============================================================================
// Router Creation
// =============================================================================

/// Create the axum router with all routes registered
pub fn create_router(state: AppState) -> Router {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/taxonomy", get(handlers::taxonomy::show))
        .route(
            "/api/networks",
            get(handlers::networks::list).post(handlers::networks::create),
        )
        .route("/api/networks/tag-by-ip", post(handlers::networks::tag_by_ip))
        .route(
            "/api/networks/:id",
            put(handlers::networks::update).delete(handlers::networks::delete),
        )
        .route(
            "/api/mappings",
            get(handlers::mappings::list).post(handlers::mappings::create),
        )
        .route(
            "/api/mappings/:id",
            put(handlers::mappings::update).delete(handlers::mappings::delete),
        )
        .route("/api/topology/path", post(handlers::topology::path))
        .route(
            "/api/topology/path-with-devices",
            post(handlers::topology::path_with_devices),
        )
        .route("/api/topology/path-image", get(handlers::topology::path_image))
        .layer(cors)
        .with_state(state)
}

/// Health check handler
async fn health_handler() -> &'static str {
    "OK"
}

// =============================================================================
// Server Startup
// =============================================================================

/// Start the REST API server
pub async fn start_server(state: AppState, config: ServerConfig) -> anyhow::Result<()> {
    let app = create_router(state);

    let bind_address = config.bind_address();
    tracing::info!("Starting REST API server on {}", bind_address);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
