//! # Rollcall Server
//!
//! JSON HTTP API over the attendance engine.
//!
//! ```text
//! /health                      GET
//! /api/session                 GET             active session
//! /api/session/start|end       POST
//! /api/sessions                GET
//! /api/validate                POST            scanner check-in
//! /api/attendance              GET | POST      query | manual check-in
//! /api/attendance/export       GET             csv | json | md attachment
//! /api/students                GET | POST
//! /api/students/upload         POST
//! /api/reports/summary         GET
//! ```

pub mod error;
pub mod routes;

pub use error::{ApiError, ApiResult};
pub use routes::router;

use rollcall_attendance::ServiceContext;
use std::net::SocketAddr;
use std::sync::Arc;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub ctx: Arc<ServiceContext>,
}

impl AppState {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx: Arc::new(ctx) }
    }
}

/// Bind and serve until Ctrl-C.
pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "rollcall server listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
