//! Why the gate chain turns a request away.
//!
//! A denial is an expected outcome, not a fault: every variant resolves to a
//! redirect with a one-shot advisory for the page the user lands on. Real
//! faults (store errors, hashing errors) travel as `anyhow::Error` and are
//! handled where they occur.

use axum::{
    http::header,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use thiserror::Error;
use uuid::Uuid;

use crate::session::cookie;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Denial {
    #[error("authentication required")]
    AuthenticationRequired,
    #[error("movie not found")]
    ResourceNotFound,
    #[error("movie has no owner recorded")]
    DataIntegrityGap,
    #[error("caller does not own movie {movie_id}")]
    OwnershipMismatch { movie_id: Uuid },
}

impl Denial {
    /// Where the denied request is sent. A missing record and a record with
    /// no recorded owner both land on the listing; only a genuine ownership
    /// mismatch reveals the record's detail page, which is public anyway.
    pub fn destination(&self) -> String {
        match self {
            Denial::AuthenticationRequired => "/auth/login".to_string(),
            Denial::ResourceNotFound | Denial::DataIntegrityGap => "/movies".to_string(),
            Denial::OwnershipMismatch { movie_id } => format!("/movies/{movie_id}"),
        }
    }

    pub fn advisory(&self) -> &'static str {
        match self {
            Denial::AuthenticationRequired => "You must be logged in to access this page",
            Denial::ResourceNotFound => "Movie not found",
            Denial::DataIntegrityGap => "This movie has no owner information",
            Denial::OwnershipMismatch { .. } => "You are not authorized to perform this action",
        }
    }
}

impl IntoResponse for Denial {
    fn into_response(self) -> Response {
        (
            AppendHeaders([(header::SET_COOKIE, cookie::flash_cookie(self.advisory()))]),
            Redirect::to(&self.destination()),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn each_denial_redirects_with_an_advisory() {
        let movie_id = Uuid::new_v4();
        let cases = [
            (Denial::AuthenticationRequired, "/auth/login".to_string()),
            (Denial::ResourceNotFound, "/movies".to_string()),
            (Denial::DataIntegrityGap, "/movies".to_string()),
            (
                Denial::OwnershipMismatch { movie_id },
                format!("/movies/{movie_id}"),
            ),
        ];

        for (denial, destination) in cases {
            let response = denial.clone().into_response();
            assert_eq!(response.status(), StatusCode::SEE_OTHER, "{denial:?}");
            assert_eq!(
                response.headers()[header::LOCATION].to_str().unwrap(),
                destination
            );
            let flash = response.headers()[header::SET_COOKIE].to_str().unwrap();
            assert!(flash.starts_with(cookie::FLASH_COOKIE), "{flash}");
        }
    }
}
