//! The handoff to the presentation collaborator.
//!
//! Handlers never produce markup. They emit either a `View` — a template
//! name plus its data context, serialized as one JSON object — or a redirect
//! carrying a one-shot flash advisory for the next page.

use axum::{
    http::{header, StatusCode},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    form::{validate::Violation, Submission},
    session::cookie,
};

pub struct View {
    template: &'static str,
    status: StatusCode,
    errors: Vec<Violation>,
    old: Option<Value>,
    notice: Option<String>,
    context: Map<String, Value>,
}

impl View {
    pub fn new(template: &'static str) -> Self {
        Self {
            template,
            status: StatusCode::OK,
            errors: Vec::new(),
            old: None,
            notice: None,
            context: Map::new(),
        }
    }

    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn errors(mut self, errors: Vec<Violation>) -> Self {
        self.errors = errors;
        self
    }

    /// Echo the user's submission back for re-rendering, verbatim.
    pub fn old(mut self, submission: &Submission) -> Self {
        self.old = serde_json::to_value(submission).ok();
        self
    }

    /// Attach a one-shot advisory left by a previous redirect. Rendering it
    /// also clears the flash cookie.
    pub fn notice(mut self, notice: Option<String>) -> Self {
        self.notice = notice;
        self
    }

    pub fn with(mut self, key: &str, value: impl Serialize) -> Self {
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        self.context.insert(key.to_string(), value);
        self
    }
}

impl IntoResponse for View {
    fn into_response(self) -> Response {
        let mut body = Map::new();
        body.insert("template".to_string(), Value::String(self.template.into()));
        // The errors list is always present, empty meaning "nothing wrong".
        body.insert(
            "errors".to_string(),
            serde_json::to_value(&self.errors).unwrap_or(Value::Array(vec![])),
        );
        if let Some(old) = self.old {
            body.insert("old".to_string(), old);
        }
        if let Some(notice) = &self.notice {
            body.insert("notice".to_string(), Value::String(notice.clone()));
        }
        for (key, value) in self.context {
            body.insert(key, value);
        }

        let mut response = (self.status, Json(Value::Object(body))).into_response();
        if self.notice.is_some() {
            response
                .headers_mut()
                .append(header::SET_COOKIE, cookie::clear_flash_cookie());
        }
        response
    }
}

/// A 303 redirect that leaves an advisory for the page it lands on.
pub fn redirect_with_notice(to: &str, notice: &str) -> Response {
    (
        AppendHeaders([(header::SET_COOKIE, cookie::flash_cookie(notice))]),
        Redirect::to(to),
    )
        .into_response()
}
