mod dto;
mod error;
pub mod handlers;
#[cfg(test)]
pub mod memory;
pub mod repo;
mod repo_types;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub use repo::{PgProgressStore, ProgressStore};
pub use services::ProgressService;

pub fn router() -> Router<AppState> {
    handlers::progress_routes()
}
