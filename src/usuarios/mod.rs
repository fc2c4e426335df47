use axum::Router;

use crate::state::AppState;

mod dto;
mod handlers;
mod service;

pub fn router() -> Router<AppState> {
    handlers::usuarios_routes()
}
