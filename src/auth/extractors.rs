use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;
use tracing::debug;

use crate::{
    error::Denial,
    session::{cookie, Identity},
    state::AppState,
};

/// The raw session token from the request cookie, whether or not it still
/// names a live session.
pub struct SessionToken(pub Option<String>);

#[async_trait]
impl<S> FromRequestParts<S> for SessionToken
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(SessionToken(cookie::cookie_value(
            &parts.headers,
            cookie::SESSION_COOKIE,
        )))
    }
}

/// Admits only requests with a live session and hands the handler the
/// identity snapshot. Everyone else is bounced to the login page. Reads the
/// session store, never writes it.
pub struct CurrentUser(pub Identity);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Denial;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match session_identity(parts, state).await {
            Some(identity) => Ok(CurrentUser(identity)),
            None => {
                debug!(path = %parts.uri.path(), "unauthenticated request bounced to login");
                Err(Denial::AuthenticationRequired)
            }
        }
    }
}

/// Like `CurrentUser`, but for pages anyone may see: carries the identity
/// when there is one and never rejects.
pub struct MaybeUser(pub Option<Identity>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(session_identity(parts, state).await))
    }
}

/// The one-shot advisory left by a previous redirect, if any.
pub struct Notice(pub Option<String>);

#[async_trait]
impl<S> FromRequestParts<S> for Notice
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Notice(cookie::flash_value(&parts.headers)))
    }
}

async fn session_identity(parts: &Parts, state: &AppState) -> Option<Identity> {
    let token = cookie::cookie_value(&parts.headers, cookie::SESSION_COOKIE)?;
    state.sessions.current(&token).await
}
