use axum::{routing::get, Router};

use crate::state::AppState;

pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod password;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/auth/register",
            get(handlers::register_form).post(handlers::register),
        )
        .route(
            "/auth/login",
            get(handlers::login_form).post(handlers::login),
        )
        .route("/auth/logout", get(handlers::logout))
}
