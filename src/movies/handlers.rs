use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{error, info, instrument, warn};

use crate::{
    auth::extractors::{CurrentUser, Notice},
    form::{
        normalize::normalize,
        validate::{self, Violation},
        Submission,
    },
    movies::{
        dto::{self, ListParams},
        guard::OwnedMovie,
        repo::Movie,
    },
    state::AppState,
    view::{redirect_with_notice, View},
};

#[instrument(skip(state, notice))]
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
    Notice(notice): Notice,
) -> Response {
    let query = params.q.as_deref();
    match Movie::search(&state.movies, query).await {
        Ok(movies) => View::new("movies/list")
            .with("movies", &movies)
            .with("q", query.unwrap_or_default())
            .notice(notice)
            .into_response(),
        Err(e) => {
            error!(error = %e, "movie search failed");
            View::new("movies/list")
                .with("movies", Vec::<Movie>::new())
                .with("q", query.unwrap_or_default())
                .errors(vec![Violation { field: "form", message: "Failed to load movies" }])
                .notice(notice)
                .into_response()
        }
    }
}

/// Public detail page. An unknown or malformed id renders the not-found
/// template rather than redirecting, so the page is linkable either way.
#[instrument(skip(state, notice))]
pub async fn details(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Notice(notice): Notice,
) -> Response {
    let movie = match Movie::load(&state.movies, &id).await {
        Ok(movie) => movie,
        Err(e) => {
            error!(error = %e, %id, "movie lookup failed");
            None
        }
    };

    let Some(movie) = movie else {
        return View::new("404")
            .status(StatusCode::NOT_FOUND)
            .notice(notice)
            .into_response();
    };

    let owner = match movie.owner {
        Some(owner_id) => state
            .users
            .find_by_id(owner_id)
            .await
            .map(|u| json!({ "username": u.username, "email": u.email })),
        None => None,
    };

    let mut view = View::new("movies/details").with("movie", &movie).notice(notice);
    if let Some(owner) = owner {
        view = view.with("owner", owner);
    }
    view.into_response()
}

#[instrument(skip(notice))]
pub async fn add_form(CurrentUser(_): CurrentUser, Notice(notice): Notice) -> Response {
    View::new("movies/add").notice(notice).into_response()
}

#[instrument(skip(state, identity, submission))]
pub async fn add(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    submission: Submission,
) -> Response {
    let normalized = normalize(&submission, dto::MULTI_VALUE_FIELDS);
    let violations = validate::run(&dto::rules(), &normalized);
    if !violations.is_empty() {
        return View::new("movies/add")
            .errors(violations)
            .old(&submission)
            .into_response();
    }

    match Movie::create(&state.movies, dto::lift(&normalized), identity.id).await {
        Ok(movie) => {
            info!(movie_id = %movie.id, owner = %identity.id, "movie created");
            redirect_with_notice(&format!("/movies/{}", movie.id), "Movie added successfully")
        }
        Err(e) => {
            error!(error = %e, "movie insert failed");
            View::new("movies/add")
                .errors(vec![Violation { field: "form", message: "Failed to create movie" }])
                .old(&submission)
                .into_response()
        }
    }
}

#[instrument(skip(gate, notice))]
pub async fn edit_form(gate: OwnedMovie, Notice(notice): Notice) -> Response {
    View::new("movies/edit")
        .with("movie", &gate.movie)
        .notice(notice)
        .into_response()
}

#[instrument(skip(state, gate, submission))]
pub async fn edit(
    State(state): State<AppState>,
    gate: OwnedMovie,
    submission: Submission,
) -> Response {
    let normalized = normalize(&submission, dto::MULTI_VALUE_FIELDS);
    let violations = validate::run(&dto::rules(), &normalized);
    if !violations.is_empty() {
        return View::new("movies/edit")
            .with("movie", &gate.movie)
            .errors(violations)
            .old(&submission)
            .into_response();
    }

    match Movie::update(&state.movies, gate.movie.id, dto::lift(&normalized)).await {
        Ok(Some(updated)) => {
            info!(movie_id = %updated.id, "movie updated");
            redirect_with_notice(&format!("/movies/{}", updated.id), "Movie updated")
        }
        Ok(None) => {
            // Deleted between the gate and the write.
            warn!(movie_id = %gate.movie.id, "movie vanished before the update");
            redirect_with_notice("/movies", "Movie not found")
        }
        Err(e) => {
            error!(error = %e, movie_id = %gate.movie.id, "movie update failed");
            View::new("movies/edit")
                .with("movie", &gate.movie)
                .errors(vec![Violation { field: "form", message: "Failed to update movie" }])
                .old(&submission)
                .into_response()
        }
    }
}

#[instrument(skip(state, gate))]
pub async fn delete(State(state): State<AppState>, gate: OwnedMovie) -> Response {
    match Movie::delete(&state.movies, gate.movie.id).await {
        Ok(removed) => {
            if removed {
                info!(movie_id = %gate.movie.id, "movie deleted");
            } else {
                warn!(movie_id = %gate.movie.id, "movie was already gone at delete time");
            }
            redirect_with_notice("/movies", "Movie deleted")
        }
        Err(e) => {
            error!(error = %e, movie_id = %gate.movie.id, "movie delete failed");
            redirect_with_notice("/movies", "Failed to delete movie")
        }
    }
}
