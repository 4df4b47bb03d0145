//! Declarative field rules evaluated over a submission.
//!
//! Evaluation never stops at the first failure: the caller gets every
//! violation in one pass so the form can report them all in a single round
//! trip. `Required` owns presence; the value rules skip fields that are
//! absent or blank, so one missing field yields exactly one violation.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use super::Submission;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

/// One failed rule: which field, and what to tell the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: &'static str,
    pub message: &'static str,
}

/// A single field rule.
#[derive(Debug, Clone)]
pub enum Rule {
    Required {
        field: &'static str,
        message: &'static str,
    },
    MinLen {
        field: &'static str,
        min: usize,
        message: &'static str,
    },
    IntRange {
        field: &'static str,
        min: i64,
        max: i64,
        message: &'static str,
    },
    FloatRange {
        field: &'static str,
        min: f64,
        max: f64,
        message: &'static str,
    },
    Email {
        field: &'static str,
        message: &'static str,
    },
    /// A normalized multi-value field must have at least one item.
    NonEmpty {
        field: &'static str,
        message: &'static str,
    },
}

/// Evaluate every rule, in order, collecting all violations.
pub fn run(rules: &[Rule], input: &Submission) -> Vec<Violation> {
    rules.iter().filter_map(|rule| rule.check(input)).collect()
}

impl Rule {
    fn check(&self, input: &Submission) -> Option<Violation> {
        match *self {
            Rule::Required { field, message } => {
                let blank = input.scalar(field).map_or(true, |v| v.trim().is_empty());
                blank.then_some(Violation { field, message })
            }
            Rule::MinLen { field, min, message } => {
                let value = present(input, field)?;
                (value.chars().count() < min).then_some(Violation { field, message })
            }
            Rule::IntRange { field, min, max, message } => {
                let value = present(input, field)?;
                match value.parse::<i64>() {
                    Ok(n) if (min..=max).contains(&n) => None,
                    _ => Some(Violation { field, message }),
                }
            }
            Rule::FloatRange { field, min, max, message } => {
                let value = present(input, field)?;
                match value.parse::<f64>() {
                    Ok(x) if x >= min && x <= max => None,
                    _ => Some(Violation { field, message }),
                }
            }
            Rule::Email { field, message } => {
                let value = present(input, field)?;
                (!EMAIL_RE.is_match(value)).then_some(Violation { field, message })
            }
            Rule::NonEmpty { field, message } => input
                .sequence(field)
                .is_empty()
                .then_some(Violation { field, message }),
        }
    }
}

/// A field's trimmed value, when one was actually submitted.
fn present<'a>(input: &'a Submission, field: &str) -> Option<&'a str> {
    let value = input.scalar(field)?.trim();
    (!value.is_empty()).then_some(value)
}
