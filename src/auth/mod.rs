use axum::Router;

use crate::state::AppState;

pub mod claims;
pub mod dto;
pub mod extractors;
pub mod google;
pub mod guards;
pub mod handlers;
pub mod jwt;
pub mod password;
mod repo;
pub mod repo_types;
pub mod service;
pub mod tokens;

pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}
