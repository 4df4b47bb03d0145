//! The ownership gate for mutating routes.
//!
//! Extracting `OwnedMovie` runs the whole admission chain: a live session,
//! the record loaded by its path id, and the owner comparison. A handler
//! behind it starts with the movie already in hand and never re-fetches it.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use tracing::warn;

use crate::{
    auth::extractors::CurrentUser,
    error::Denial,
    movies::repo::Movie,
    session::Identity,
    state::AppState,
};

pub struct OwnedMovie {
    pub movie: Movie,
    pub identity: Identity,
}

#[async_trait]
impl FromRequestParts<AppState> for OwnedMovie {
    type Rejection = Denial;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(identity) = CurrentUser::from_request_parts(parts, state).await?;

        let raw_id = match Path::<String>::from_request_parts(parts, state).await {
            Ok(Path(raw_id)) => raw_id,
            Err(e) => {
                warn!(error = %e, "ownership gate on a route without an id segment");
                return Err(Denial::ResourceNotFound);
            }
        };

        let loaded = match Movie::load(&state.movies, &raw_id).await {
            Ok(loaded) => loaded,
            Err(e) => {
                // A store fault still has to land the caller somewhere safe.
                warn!(error = %e, id = %raw_id, "movie lookup failed in ownership gate");
                return Err(Denial::ResourceNotFound);
            }
        };

        let movie = admit(&identity, loaded)?;
        Ok(OwnedMovie { movie, identity })
    }
}

/// The ownership decision itself, free of HTTP plumbing. Order matters:
/// existence is settled before ownership, and a record with no recorded
/// owner admits nobody.
fn admit(identity: &Identity, loaded: Option<Movie>) -> Result<Movie, Denial> {
    let Some(movie) = loaded else {
        return Err(Denial::ResourceNotFound);
    };
    let Some(owner) = movie.owner else {
        warn!(movie_id = %movie.id, "movie has no owner recorded");
        return Err(Denial::DataIntegrityGap);
    };
    if owner != identity.id {
        warn!(movie_id = %movie.id, caller = %identity.id, "caller does not own the movie");
        return Err(Denial::OwnershipMismatch { movie_id: movie.id });
    }
    Ok(movie)
}
