use crate::state::AppState;
use axum::routing::post;
use axum::Router;

pub mod dto;
pub mod google;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod repo;
pub mod repo_types;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/register", post(handlers::register))
        .route("/api/login", post(handlers::login))
        .route("/api/google-login", post(handlers::google_login))
        .route("/api/check-user", post(handlers::check_user))
}
