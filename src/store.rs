use std::collections::HashMap;

use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Returned by a guarded insert when an existing row already claims the
/// unique field.
#[derive(Debug, Error)]
#[error("duplicate value for unique field `{field}`")]
pub struct UniqueViolation {
    pub field: &'static str,
}

/// One keyed collection of the backing document store.
///
/// Every operation is a single atomic call under one lock acquisition, so an
/// abandoned request can never leave a half-written row behind. Iteration
/// order is unspecified; callers sort their own result sets.
pub struct Collection<T> {
    rows: RwLock<HashMap<Uuid, T>>,
}

impl<T: Clone> Collection<T> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Option<T> {
        self.rows.read().await.get(&id).cloned()
    }

    pub async fn find_one<P>(&self, pred: P) -> Option<T>
    where
        P: Fn(&T) -> bool,
    {
        self.rows.read().await.values().find(|row| pred(row)).cloned()
    }

    pub async fn find<P>(&self, pred: P) -> Vec<T>
    where
        P: Fn(&T) -> bool,
    {
        self.rows
            .read()
            .await
            .values()
            .filter(|row| pred(row))
            .cloned()
            .collect()
    }

    pub async fn create(&self, id: Uuid, row: T) -> T {
        self.rows.write().await.insert(id, row.clone());
        row
    }

    /// Insert `row` unless another row already matches `conflict`.
    ///
    /// The check and the insert happen under the same write lock, so the
    /// uniqueness guarantee holds even when two writers race.
    pub async fn create_unique<P>(
        &self,
        id: Uuid,
        row: T,
        conflict: P,
        field: &'static str,
    ) -> Result<T, UniqueViolation>
    where
        P: Fn(&T) -> bool,
    {
        let mut rows = self.rows.write().await;
        if rows.values().any(|existing| conflict(existing)) {
            return Err(UniqueViolation { field });
        }
        rows.insert(id, row.clone());
        Ok(row)
    }

    /// Mutate the row under the write lock and return the updated copy, or
    /// `None` when the id is unknown.
    pub async fn update_by_id<F>(&self, id: Uuid, apply: F) -> Option<T>
    where
        F: FnOnce(&mut T),
    {
        let mut rows = self.rows.write().await;
        let row = rows.get_mut(&id)?;
        apply(row);
        Some(row.clone())
    }

    pub async fn delete_by_id(&self, id: Uuid) -> bool {
        self.rows.write().await.remove(&id).is_some()
    }
}

impl<T: Clone> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Doc {
        id: Uuid,
        label: String,
    }

    fn doc(label: &str) -> Doc {
        Doc {
            id: Uuid::new_v4(),
            label: label.into(),
        }
    }

    #[tokio::test]
    async fn create_then_find_by_id() {
        let col = Collection::new();
        let row = doc("first");
        col.create(row.id, row.clone()).await;

        assert_eq!(col.find_by_id(row.id).await, Some(row));
        assert_eq!(col.find_by_id(Uuid::new_v4()).await, None);
    }

    #[tokio::test]
    async fn find_one_and_find_filter_by_predicate() {
        let col = Collection::new();
        for label in ["alpha", "beta", "battle"] {
            let row = doc(label);
            col.create(row.id, row).await;
        }

        let one = col.find_one(|d: &Doc| d.label == "beta").await;
        assert_eq!(one.map(|d| d.label), Some("beta".to_string()));

        let many = col.find(|d: &Doc| d.label.starts_with('b')).await;
        assert_eq!(many.len(), 2);
    }

    #[tokio::test]
    async fn create_unique_rejects_conflicting_row() {
        let col = Collection::new();
        let first = doc("taken");
        col.create_unique(first.id, first.clone(), |d| d.label == "taken", "label")
            .await
            .expect("first insert succeeds");

        let second = doc("taken");
        let err = col
            .create_unique(second.id, second, |d| d.label == "taken", "label")
            .await
            .unwrap_err();
        assert_eq!(err.field, "label");
    }

    #[tokio::test]
    async fn update_by_id_mutates_atomically() {
        let col = Collection::new();
        let row = doc("before");
        col.create(row.id, row.clone()).await;

        let updated = col
            .update_by_id(row.id, |d| d.label = "after".into())
            .await
            .expect("row exists");
        assert_eq!(updated.label, "after");
        assert_eq!(col.find_by_id(row.id).await.map(|d| d.label), Some("after".to_string()));

        assert!(col.update_by_id(Uuid::new_v4(), |_| {}).await.is_none());
    }

    #[tokio::test]
    async fn delete_by_id_reports_presence() {
        let col = Collection::new();
        let row = doc("gone");
        col.create(row.id, row.clone()).await;

        assert!(col.delete_by_id(row.id).await);
        assert!(!col.delete_by_id(row.id).await);
        assert!(col.find_by_id(row.id).await.is_none());
    }
}
