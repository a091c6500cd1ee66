use crate::state::AppState;
use axum::routing::get;
use axum::Router;

pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/get-balance/:userId", get(handlers::get_balance))
}
