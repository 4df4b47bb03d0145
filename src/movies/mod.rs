use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub mod dto;
pub mod guard;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/movies", get(handlers::list))
        .route("/movies/add", get(handlers::add_form).post(handlers::add))
        .route("/movies/:id", get(handlers::details))
        .route(
            "/movies/edit/:id",
            get(handlers::edit_form).post(handlers::edit),
        )
        .route("/movies/delete/:id", post(handlers::delete))
}
