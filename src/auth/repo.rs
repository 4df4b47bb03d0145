use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::store::Collection;

/// A registered account. The credential hash never leaves the server.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl User {
    /// Find a user by email. Addresses are stored lowercased, so lookups are
    /// case-insensitive.
    pub async fn find_by_email(
        users: &Collection<User>,
        email: &str,
    ) -> anyhow::Result<Option<User>> {
        let needle = email.trim().to_lowercase();
        Ok(users.find_one(move |u| u.email == needle).await)
    }

    /// Create a new user with a hashed password. Email uniqueness is enforced
    /// by the store at write time, so a racing duplicate still loses.
    pub async fn create(
        users: &Collection<User>,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> anyhow::Result<User> {
        let now = OffsetDateTime::now_utc();
        let email = email.trim().to_lowercase();
        let user = User {
            id: Uuid::new_v4(),
            username: username.trim().to_string(),
            email: email.clone(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        };
        let user = users
            .create_unique(user.id, user, move |u| u.email == email, "email")
            .await?;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::UniqueViolation;

    #[tokio::test]
    async fn emails_are_stored_and_matched_lowercased() {
        let users = Collection::new();
        User::create(&users, "ada", "Ada@Example.COM", "hash")
            .await
            .unwrap();

        let found = User::find_by_email(&users, "ADA@example.com").await.unwrap();
        assert_eq!(found.unwrap().email, "ada@example.com");
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_whatever_its_case() {
        let users = Collection::new();
        User::create(&users, "ada", "ada@example.com", "hash")
            .await
            .unwrap();

        let err = User::create(&users, "imposter", "ADA@EXAMPLE.COM", "hash")
            .await
            .unwrap_err();
        let conflict = err.downcast_ref::<UniqueViolation>().unwrap();
        assert_eq!(conflict.field, "email");
    }

    #[tokio::test]
    async fn username_and_email_are_trimmed_on_create() {
        let users = Collection::new();
        let user = User::create(&users, "  ada  ", "  ada@example.com ", "hash")
            .await
            .unwrap();
        assert_eq!(user.username, "ada");
        assert_eq!(user.email, "ada@example.com");
    }

    #[test]
    fn the_password_hash_is_never_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            username: "ada".into(),
            email: "ada@example.com".into(),
            password_hash: "secret".into(),
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "ada");
    }
}
