//! Raw form submissions without a fixed shape.
//!
//! Browsers submit multi-value fields three different ways (a single scalar,
//! a comma-joined scalar, repeated keys). `Submission` keeps whatever arrived
//! verbatim, one tagged value per field, so validation messages and form
//! echoes can show the user exactly what they typed. Only the normalization
//! pass flattens the declared multi-value fields into canonical sequences.

pub mod normalize;
pub mod validate;

use axum::{
    async_trait,
    extract::{Form, FromRequest, Request},
    http::StatusCode,
};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// How one field arrived in the request body.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Scalar(String),
    Sequence(Vec<String>),
}

/// An urlencoded body with field order preserved and nothing trimmed,
/// decoded, or dropped beyond percent-decoding. A field that was not
/// submitted at all is simply absent from the map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    fields: Vec<(String, FieldValue)>,
}

impl Submission {
    /// Fold decoded key/value pairs into the per-field union: the first
    /// occurrence of a key is a scalar, any repeat promotes it to a sequence.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut fields: Vec<(String, FieldValue)> = Vec::new();
        for (name, value) in pairs {
            match fields.iter().position(|(existing, _)| *existing == name) {
                Some(i) => {
                    let slot = &mut fields[i].1;
                    *slot = match std::mem::replace(slot, FieldValue::Sequence(Vec::new())) {
                        FieldValue::Scalar(first) => FieldValue::Sequence(vec![first, value]),
                        FieldValue::Sequence(mut items) => {
                            items.push(value);
                            FieldValue::Sequence(items)
                        }
                    };
                }
                None => fields.push((name, FieldValue::Scalar(value))),
            }
        }
        Self { fields }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// The first value submitted for a field, whatever its shape.
    pub fn scalar(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            FieldValue::Scalar(value) => Some(value),
            FieldValue::Sequence(items) => items.first().map(String::as_str),
        }
    }

    /// The items of a sequence-shaped field; scalar or absent reads as empty.
    pub fn sequence(&self, name: &str) -> &[String] {
        match self.get(name) {
            Some(FieldValue::Sequence(items)) => items,
            _ => &[],
        }
    }

    /// Replace a field's value, or append the field if it was absent.
    pub fn set(&mut self, name: &str, value: FieldValue) {
        match self.fields.iter().position(|(field, _)| field == name) {
            Some(i) => self.fields[i].1 = value,
            None => self.fields.push((name.to_string(), value)),
        }
    }

    /// A copy with the named fields dropped. Used to echo a submission back
    /// without its credential fields.
    pub fn without(&self, names: &[&str]) -> Submission {
        Submission {
            fields: self
                .fields
                .iter()
                .filter(|(field, _)| !names.contains(&field.as_str()))
                .cloned()
                .collect(),
        }
    }
}

impl Serialize for Submission {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[async_trait]
impl<S> FromRequest<S> for Submission
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        // Decoding into pairs rather than a struct keeps repeated keys.
        let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
            .await
            .map_err(|_| (StatusCode::BAD_REQUEST, "expected an urlencoded form body"))?;
        Ok(Submission::from_pairs(pairs))
    }
}
