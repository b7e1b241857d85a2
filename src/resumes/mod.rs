mod content;
mod dto;
pub mod generator;
pub mod handlers;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::resume_routes()
}
