use axum::Router;

use crate::state::AppState;

pub mod ai;
mod dto;
mod handlers;
mod service;

pub fn router() -> Router<AppState> {
    handlers::provas_routes()
}
