//! Route modules.

use axum::Router;

use crate::state::AppState;

pub mod generate;
pub mod health;
pub mod prompts;

/// Returns the router for everything served under `/api`.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .merge(prompts::router())
        .merge(generate::router())
}
