//! The movie form shape: which fields are multi-value, the rule set, and the
//! typed field set lifted out of an accepted submission.

use serde::Deserialize;
use time::OffsetDateTime;

use super::repo::MovieFields;
use crate::form::{validate::Rule, Submission};

/// Fields the normalization pass flattens into canonical sequences.
pub const MULTI_VALUE_FIELDS: &[&str] = &["genres"];

pub const YEAR_FLOOR: i64 = 1900;

/// Query string of the listing page.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub q: Option<String>,
}

/// Built per call because the year ceiling tracks the current year.
pub fn rules() -> Vec<Rule> {
    let this_year = i64::from(OffsetDateTime::now_utc().year());
    vec![
        Rule::Required { field: "name", message: "Name is required" },
        Rule::MinLen { field: "name", min: 2, message: "Name must be at least 2 characters" },
        Rule::Required { field: "description", message: "Description is required" },
        Rule::MinLen {
            field: "description",
            min: 10,
            message: "Description must be at least 10 characters",
        },
        Rule::Required { field: "year", message: "Year is required" },
        Rule::IntRange {
            field: "year",
            min: YEAR_FLOOR,
            max: this_year,
            message: "Enter a valid year",
        },
        Rule::Required { field: "rating", message: "Rating is required" },
        Rule::FloatRange {
            field: "rating",
            min: 0.0,
            max: 5.0,
            message: "Rating must be between 0 and 5",
        },
        Rule::NonEmpty { field: "genres", message: "At least one genre is required" },
    ]
}

/// Lift the typed mutable fields out of a normalized submission that already
/// passed the rule set; the numeric parses cannot fail after the range rules
/// vouched for them.
pub fn lift(input: &Submission) -> MovieFields {
    MovieFields {
        name: input.scalar("name").unwrap_or_default().trim().to_string(),
        description: input
            .scalar("description")
            .unwrap_or_default()
            .trim()
            .to_string(),
        year: input
            .scalar("year")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or_default(),
        genres: input.sequence("genres").to_vec(),
        rating: input
            .scalar("rating")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or_default(),
        poster_url: input
            .scalar("poster_url")
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{normalize::normalize, validate::run};

    fn submission(raw: &[(&str, &str)]) -> Submission {
        Submission::from_pairs(
            raw.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn a_complete_movie_passes_every_rule() {
        let input = normalize(
            &submission(&[
                ("name", "Alien"),
                ("description", "A perfectly watchable film."),
                ("year", "1979"),
                ("genres", "Horror, Sci-Fi"),
                ("rating", "4.5"),
            ]),
            MULTI_VALUE_FIELDS,
        );
        assert!(run(&rules(), &input).is_empty());
    }

    #[test]
    fn one_broken_field_yields_exactly_one_violation() {
        let input = normalize(
            &submission(&[
                ("name", "A"),
                ("description", "A perfectly watchable film."),
                ("year", "1979"),
                ("genres", "Horror"),
                ("rating", "4.5"),
            ]),
            MULTI_VALUE_FIELDS,
        );
        let violations = run(&rules(), &input);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "name");
    }

    #[test]
    fn four_broken_fields_yield_exactly_four_violations() {
        // Empty name, out-of-range year and rating, no genres at all.
        let input = normalize(
            &submission(&[
                ("name", ""),
                ("description", "A perfectly watchable film."),
                ("year", "1700"),
                ("rating", "11"),
            ]),
            MULTI_VALUE_FIELDS,
        );
        let violations = run(&rules(), &input);
        let fields: Vec<_> = violations.iter().map(|v| v.field).collect();
        assert_eq!(fields, ["name", "year", "rating", "genres"]);
    }

    #[test]
    fn the_year_ceiling_is_the_current_year() {
        let this_year = OffsetDateTime::now_utc().year();
        let ok = normalize(
            &submission(&[
                ("name", "Alien"),
                ("description", "A perfectly watchable film."),
                ("year", &this_year.to_string()),
                ("genres", "Horror"),
                ("rating", "4.5"),
            ]),
            MULTI_VALUE_FIELDS,
        );
        assert!(run(&rules(), &ok).is_empty());

        let next = normalize(
            &submission(&[
                ("name", "Alien"),
                ("description", "A perfectly watchable film."),
                ("year", &(this_year + 1).to_string()),
                ("genres", "Horror"),
                ("rating", "4.5"),
            ]),
            MULTI_VALUE_FIELDS,
        );
        let violations = run(&rules(), &next);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "year");
    }

    #[test]
    fn lift_takes_the_canonical_genre_sequence_and_parsed_numbers() {
        let input = normalize(
            &submission(&[
                ("name", "  Alien "),
                ("description", " A perfectly watchable film. "),
                ("year", "1979"),
                ("genres", " Horror , Sci-Fi "),
                ("rating", "4.5"),
                ("poster_url", "   "),
            ]),
            MULTI_VALUE_FIELDS,
        );
        let fields = lift(&input);
        assert_eq!(fields.name, "Alien");
        assert_eq!(fields.description, "A perfectly watchable film.");
        assert_eq!(fields.year, 1979);
        assert_eq!(fields.genres, vec!["Horror", "Sci-Fi"]);
        assert_eq!(fields.rating, 4.5);
        assert_eq!(fields.poster_url, None);
    }
}
