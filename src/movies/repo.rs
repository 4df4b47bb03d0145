use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::store::Collection;

/// A movie record. `owner` is optional because imported or legacy rows can
/// predate ownership tracking; the create path always sets it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Movie {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub year: i32,
    pub genres: Vec<String>,
    pub rating: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<Uuid>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// The mutable field set: everything create and update are allowed to write.
/// Ownership is deliberately not part of it.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieFields {
    pub name: String,
    pub description: String,
    pub year: i32,
    pub genres: Vec<String>,
    pub rating: f64,
    pub poster_url: Option<String>,
}

impl Movie {
    /// Load by the raw id from the request path. A malformed id reads the
    /// same as a missing row, so the id format leaks nothing about what
    /// exists. Any textual encoding of the same id finds the same row.
    pub async fn load(movies: &Collection<Movie>, raw_id: &str) -> anyhow::Result<Option<Movie>> {
        let Ok(id) = Uuid::parse_str(raw_id.trim()) else {
            return Ok(None);
        };
        Ok(movies.find_by_id(id).await)
    }

    /// All movies, newest first. `query`, when present, is a case-insensitive
    /// substring filter on the name.
    pub async fn search(
        movies: &Collection<Movie>,
        query: Option<&str>,
    ) -> anyhow::Result<Vec<Movie>> {
        let needle = query.unwrap_or_default().trim().to_lowercase();
        let mut found = if needle.is_empty() {
            movies.find(|_| true).await
        } else {
            movies
                .find(|m| m.name.to_lowercase().contains(&needle))
                .await
        };
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    pub async fn create(
        movies: &Collection<Movie>,
        fields: MovieFields,
        owner: Uuid,
    ) -> anyhow::Result<Movie> {
        let now = OffsetDateTime::now_utc();
        let movie = Movie {
            id: Uuid::new_v4(),
            name: fields.name,
            description: fields.description,
            year: fields.year,
            genres: fields.genres,
            rating: fields.rating,
            poster_url: fields.poster_url,
            owner: Some(owner),
            created_at: now,
            updated_at: now,
        };
        Ok(movies.create(movie.id, movie).await)
    }

    /// Overwrite the mutable fields in one atomic write. The owner is not in
    /// the write set, whatever the request body claimed.
    pub async fn update(
        movies: &Collection<Movie>,
        id: Uuid,
        fields: MovieFields,
    ) -> anyhow::Result<Option<Movie>> {
        Ok(movies
            .update_by_id(id, move |movie| {
                movie.name = fields.name;
                movie.description = fields.description;
                movie.year = fields.year;
                movie.genres = fields.genres;
                movie.rating = fields.rating;
                movie.poster_url = fields.poster_url;
                movie.updated_at = OffsetDateTime::now_utc();
            })
            .await)
    }

    pub async fn delete(movies: &Collection<Movie>, id: Uuid) -> anyhow::Result<bool> {
        Ok(movies.delete_by_id(id).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(name: &str) -> MovieFields {
        MovieFields {
            name: name.into(),
            description: "A perfectly watchable film.".into(),
            year: 2020,
            genres: vec!["Drama".into()],
            rating: 4.0,
            poster_url: None,
        }
    }

    #[tokio::test]
    async fn malformed_ids_read_as_absent() {
        let movies = Collection::new();
        assert!(Movie::load(&movies, "not-a-uuid").await.unwrap().is_none());
        assert!(Movie::load(&movies, "").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn any_encoding_of_an_id_finds_the_row() {
        let movies = Collection::new();
        let owner = Uuid::new_v4();
        let movie = Movie::create(&movies, fields("Alien"), owner).await.unwrap();

        let hyphenated = movie.id.hyphenated().to_string();
        let simple = movie.id.simple().to_string();
        for encoding in [hyphenated, simple] {
            let found = Movie::load(&movies, &encoding).await.unwrap();
            assert_eq!(found.unwrap().id, movie.id);
        }
    }

    #[tokio::test]
    async fn search_filters_by_name_substring_case_insensitively() {
        let movies = Collection::new();
        let owner = Uuid::new_v4();
        Movie::create(&movies, fields("The Thing"), owner).await.unwrap();
        Movie::create(&movies, fields("Something Wild"), owner)
            .await
            .unwrap();
        Movie::create(&movies, fields("Alien"), owner).await.unwrap();

        let hits = Movie::search(&movies, Some("THING")).await.unwrap();
        let names: Vec<_> = hits.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"The Thing"));
        assert!(names.contains(&"Something Wild"));

        let all = Movie::search(&movies, None).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn search_returns_newest_first() {
        let movies = Collection::new();
        let owner = Uuid::new_v4();
        let base = OffsetDateTime::now_utc();
        for (i, name) in ["oldest", "middle", "newest"].iter().enumerate() {
            let mut movie = Movie::create(&movies, fields(name), owner).await.unwrap();
            movie.created_at = base + time::Duration::seconds(i as i64);
            movies.create(movie.id, movie).await;
        }

        let all = Movie::search(&movies, None).await.unwrap();
        let names: Vec<_> = all.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["newest", "middle", "oldest"]);
    }

    #[tokio::test]
    async fn update_rewrites_fields_but_never_the_owner() {
        let movies = Collection::new();
        let owner = Uuid::new_v4();
        let movie = Movie::create(&movies, fields("Alien"), owner).await.unwrap();

        let updated = Movie::update(
            &movies,
            movie.id,
            MovieFields {
                name: "Aliens".into(),
                rating: 4.5,
                ..fields("Aliens")
            },
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(updated.name, "Aliens");
        assert_eq!(updated.owner, Some(owner));
        assert!(updated.updated_at >= movie.updated_at);
    }

    #[tokio::test]
    async fn update_and_delete_report_unknown_ids() {
        let movies = Collection::new();
        let missing = Uuid::new_v4();
        assert!(Movie::update(&movies, missing, fields("x"))
            .await
            .unwrap()
            .is_none());
        assert!(!Movie::delete(&movies, missing).await.unwrap());
    }
}
