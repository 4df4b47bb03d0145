//! Canonicalization of multi-value form fields.
//!
//! Whatever shape a multi-value field arrived in, after this pass it is a
//! sequence of trimmed, non-empty items. The original submission is left
//! untouched so the form can still echo the user's literal input.

use super::{FieldValue, Submission};

/// Rewrite the declared multi-value fields into canonical sequence form.
/// Every other field passes through unchanged. The output is a fixed point:
/// normalizing it again produces the same submission.
pub fn normalize(submission: &Submission, multi_fields: &[&str]) -> Submission {
    let mut out = submission.clone();
    for field in multi_fields {
        let canonical = canonicalize(out.get(field));
        out.set(field, FieldValue::Sequence(canonical));
    }
    out
}

fn canonicalize(value: Option<&FieldValue>) -> Vec<String> {
    match value {
        None => Vec::new(),
        Some(FieldValue::Scalar(raw)) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                Vec::new()
            } else if trimmed.contains(',') {
                split_items(trimmed.split(','))
            } else {
                vec![trimmed.to_string()]
            }
        }
        Some(FieldValue::Sequence(items)) => split_items(items.iter().map(String::as_str)),
    }
}

fn split_items<'a>(items: impl Iterator<Item = &'a str>) -> Vec<String> {
    items
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
