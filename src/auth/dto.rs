//! Register and login form shapes: rule sets plus the trimmed values pulled
//! out of an accepted submission.

use crate::form::{validate::Rule, Submission};

pub fn register_rules() -> Vec<Rule> {
    vec![
        Rule::Required { field: "username", message: "Username is required" },
        Rule::Required { field: "email", message: "Email is required" },
        Rule::Email { field: "email", message: "Enter a valid email address" },
        Rule::Required { field: "password", message: "Password is required" },
        Rule::MinLen { field: "password", min: 8, message: "Password must be at least 8 characters" },
    ]
}

pub fn login_rules() -> Vec<Rule> {
    vec![
        Rule::Required { field: "email", message: "Email is required" },
        Rule::Email { field: "email", message: "Enter a valid email address" },
        Rule::Required { field: "password", message: "Password is required" },
    ]
}

/// Credentials lifted from a validated submission. The email is trimmed and
/// lowercased here so every later comparison sees the canonical form; the
/// password is left byte-for-byte as typed.
#[derive(Debug)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn lift(input: &Submission) -> Self {
        Self {
            email: input
                .scalar("email")
                .unwrap_or_default()
                .trim()
                .to_lowercase(),
            password: input.scalar("password").unwrap_or_default().to_string(),
        }
    }
}
