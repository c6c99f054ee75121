//! Combinatorics Solver - Axum Server
//!
//! Run with: cargo run
//! Then open: http://localhost:5000/q/swagger-ui

use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use combinatorics_solver::api::{self, AppState};
use combinatorics_solver::config::AppConfig;
use combinatorics_solver::console;

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("combinatorics_solver=info,tower_http=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    console::print_banner();
    console::print_config(&config);

    let addr = config.bind_addr;
    let state = Arc::new(AppState::new(config));
    let app = api::create_router(state);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %addr, "Failed to bind: {}", e);
            return ExitCode::FAILURE;
        }
    };
    console::print_listening(addr);

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }
    info!("Server stopped");
    ExitCode::SUCCESS
}
