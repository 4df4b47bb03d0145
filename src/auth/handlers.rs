use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Redirect, Response},
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{login_rules, register_rules, Credentials},
        extractors::{MaybeUser, Notice, SessionToken},
        password,
        repo::User,
    },
    form::{
        validate::{self, Violation},
        Submission,
    },
    session::{cookie, Identity},
    state::AppState,
    store::UniqueViolation,
    view::{redirect_with_notice, View},
};

const EMAIL_TAKEN: Violation = Violation {
    field: "email",
    message: "Email already registered",
};
const BAD_CREDENTIALS: Violation = Violation {
    field: "form",
    message: "Invalid email or password",
};

#[instrument(skip(user, notice))]
pub async fn register_form(MaybeUser(user): MaybeUser, Notice(notice): Notice) -> Response {
    if user.is_some() {
        return Redirect::to("/movies").into_response();
    }
    View::new("auth/register").notice(notice).into_response()
}

#[instrument(skip(state, submission))]
pub async fn register(State(state): State<AppState>, submission: Submission) -> Response {
    let violations = validate::run(&register_rules(), &submission);
    if !violations.is_empty() {
        return render_register(&submission, violations);
    }

    let creds = Credentials::lift(&submission);
    let username = submission.scalar("username").unwrap_or_default().trim();

    match User::find_by_email(&state.users, &creds.email).await {
        Ok(None) => {}
        Ok(Some(_)) => {
            warn!(email = %creds.email, "email already registered");
            return render_register(&submission, vec![EMAIL_TAKEN]);
        }
        Err(e) => {
            error!(error = %e, "find_by_email failed");
            return render_register(
                &submission,
                vec![Violation { field: "form", message: "Registration failed" }],
            );
        }
    }

    let hash = match password::hash(&creds.password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "password hash failed");
            return render_register(
                &submission,
                vec![Violation { field: "form", message: "Registration failed" }],
            );
        }
    };

    let user = match User::create(&state.users, username, &creds.email, &hash).await {
        Ok(u) => u,
        Err(e) if e.downcast_ref::<UniqueViolation>().is_some() => {
            // Lost the race with a concurrent registration for the same email.
            warn!(email = %creds.email, "duplicate registration rejected at write time");
            return render_register(&submission, vec![EMAIL_TAKEN]);
        }
        Err(e) => {
            error!(error = %e, "create user failed");
            return render_register(
                &submission,
                vec![Violation { field: "form", message: "Registration failed" }],
            );
        }
    };

    info!(user_id = %user.id, email = %user.email, "user registered");
    sign_in(&state, user, "Welcome! You are registered and logged in.").await
}

#[instrument(skip(user, notice))]
pub async fn login_form(MaybeUser(user): MaybeUser, Notice(notice): Notice) -> Response {
    if user.is_some() {
        return Redirect::to("/movies").into_response();
    }
    View::new("auth/login").notice(notice).into_response()
}

#[instrument(skip(state, submission))]
pub async fn login(State(state): State<AppState>, submission: Submission) -> Response {
    let violations = validate::run(&login_rules(), &submission);
    if !violations.is_empty() {
        return render_login(&submission, violations);
    }

    let creds = Credentials::lift(&submission);

    let user = match User::find_by_email(&state.users, &creds.email).await {
        Ok(found) => found,
        Err(e) => {
            error!(error = %e, "find_by_email failed");
            return render_login(
                &submission,
                vec![Violation { field: "form", message: "Login failed" }],
            );
        }
    };

    // Unknown email and wrong password fail identically so the form never
    // confirms which addresses have accounts.
    let verified = user
        .as_ref()
        .map(|u| password::verify(&creds.password, &u.password_hash))
        .unwrap_or(false);

    let Some(user) = user.filter(|_| verified) else {
        warn!(email = %creds.email, "login rejected");
        return render_login(&submission, vec![BAD_CREDENTIALS]);
    };

    info!(user_id = %user.id, email = %user.email, "user logged in");
    sign_in(&state, user, "Welcome back!").await
}

/// Both a first and a repeated logout land on the login page; terminating a
/// dead token is a no-op in the store.
#[instrument(skip(state, token))]
pub async fn logout(State(state): State<AppState>, SessionToken(token): SessionToken) -> Response {
    if let Some(token) = token {
        state.sessions.terminate(&token).await;
    }
    let mut response = Redirect::to("/auth/login").into_response();
    response
        .headers_mut()
        .append(header::SET_COOKIE, cookie::clear_session_cookie());
    response
}

async fn sign_in(state: &AppState, user: User, greeting: &str) -> Response {
    let identity = Identity {
        id: user.id,
        username: user.username,
        email: user.email,
    };
    let token = state.sessions.establish(identity).await;

    let mut response = redirect_with_notice("/movies", greeting);
    response
        .headers_mut()
        .append(header::SET_COOKIE, cookie::session_cookie(&token));
    response
}

fn render_register(submission: &Submission, violations: Vec<Violation>) -> Response {
    View::new("auth/register")
        .errors(violations)
        .old(&submission.without(&["password"]))
        .into_response()
}

fn render_login(submission: &Submission, violations: Vec<Violation>) -> Response {
    View::new("auth/login")
        .errors(violations)
        .old(&submission.without(&["password"]))
        .into_response()
}
