use crate::domain::services::conflict::ConflictField;
use crate::infrastructure::db::database::{Database, DatabaseError};
use crate::infrastructure::db::dto::{ClientRow, NewClientRow};
use crate::infrastructure::db::stores::client_store::{ClientRepositoryError, ClientStore};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

#[derive(Default)]
struct MemoryState {
    last_id: i32,
    rows: BTreeMap<i32, ClientRow>,
}

impl MemoryState {
    /// The unique column a write would collide on, ignoring the row `exclude_id`.
    fn unique_violation(
        &self,
        cuit: &str,
        email: &str,
        exclude_id: Option<i32>,
    ) -> Option<ConflictField> {
        let others = || {
            self.rows
                .values()
                .filter(move |r| Some(r.id) != exclude_id)
        };
        if others().any(|r| r.cuit == cuit) {
            return Some(ConflictField::Cuit);
        }
        if others().any(|r| r.email == email) {
            return Some(ConflictField::Email);
        }
        None
    }
}

/// Process-local client store with the same semantics as the Postgres one.
///
/// Ids are assigned from a counter and never reused after a delete.
#[derive(Default)]
pub struct InMemoryClientStore {
    state: Mutex<MemoryState>,
}

impl InMemoryClientStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, ClientRepositoryError> {
        self.state
            .lock()
            .map_err(|_| ClientRepositoryError::StorageUnavailable)
    }
}

/// Lowercase and strip combining marks so "Pérez" matches "perez".
pub(crate) fn fold_for_search(value: &str) -> String {
    value
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

#[async_trait]
impl ClientStore for InMemoryClientStore {
    async fn list(&self) -> Result<Vec<ClientRow>, ClientRepositoryError> {
        Ok(self.lock()?.rows.values().cloned().collect())
    }

    async fn get(&self, client_id: i32) -> Result<Option<ClientRow>, ClientRepositoryError> {
        Ok(self.lock()?.rows.get(&client_id).cloned())
    }

    async fn insert(&self, row: &NewClientRow) -> Result<ClientRow, ClientRepositoryError> {
        let mut state = self.lock()?;
        if let Some(field) = state.unique_violation(&row.cuit, &row.email, None) {
            return Err(ClientRepositoryError::Conflict(field));
        }
        let id = state
            .last_id
            .checked_add(1)
            .ok_or(ClientRepositoryError::StorageUnavailable)?;
        state.last_id = id;
        let stored = row.clone().with_id(id);
        state.rows.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, row: &ClientRow) -> Result<ClientRow, ClientRepositoryError> {
        let mut state = self.lock()?;
        if !state.rows.contains_key(&row.id) {
            return Err(ClientRepositoryError::NotFound);
        }
        if let Some(field) = state.unique_violation(&row.cuit, &row.email, Some(row.id)) {
            return Err(ClientRepositoryError::Conflict(field));
        }
        state.rows.insert(row.id, row.clone());
        Ok(row.clone())
    }

    async fn delete(&self, client_id: i32) -> Result<(), ClientRepositoryError> {
        match self.lock()?.rows.remove(&client_id) {
            Some(_) => Ok(()),
            None => Err(ClientRepositoryError::NotFound),
        }
    }

    async fn search_by_name(
        &self,
        fragment: &str,
    ) -> Result<Vec<ClientRow>, ClientRepositoryError> {
        let needle = fold_for_search(fragment);
        Ok(self
            .lock()?
            .rows
            .values()
            .filter(|r| {
                fold_for_search(&r.first_name).contains(&needle)
                    || fold_for_search(&r.last_name).contains(&needle)
            })
            .cloned()
            .collect())
    }

    async fn find_conflict(
        &self,
        cuit: &str,
        email: &str,
    ) -> Result<Option<ClientRow>, ClientRepositoryError> {
        let state = self.lock()?;
        let by_cuit = state.rows.values().find(|r| r.cuit == cuit);
        let found = by_cuit.or_else(|| state.rows.values().find(|r| r.email == email));
        Ok(found.cloned())
    }

    async fn email_exists_for_other(
        &self,
        email: &str,
        exclude_id: i32,
    ) -> Result<bool, ClientRepositoryError> {
        Ok(self
            .lock()?
            .rows
            .values()
            .any(|r| r.id != exclude_id && r.email == email))
    }
}

#[async_trait]
impl Database for InMemoryClientStore {
    async fn execute(&self, _query: &str) -> Result<u64, DatabaseError> {
        self.state
            .lock()
            .map(|_| 0)
            .map_err(|_| DatabaseError::Connection("memory store poisoned".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::{InMemoryClientStore, fold_for_search};
    use crate::domain::entities::client::test_support::sample_draft;
    use crate::domain::services::conflict::ConflictField;
    use crate::infrastructure::db::dto::NewClientRow;
    use crate::infrastructure::db::stores::client_store::{ClientRepositoryError, ClientStore};

    fn row(first_name: &str, last_name: &str, cuit: &str, email: &str) -> NewClientRow {
        let mut draft = sample_draft(cuit, email);
        draft.first_name = first_name.to_string();
        draft.last_name = last_name.to_string();
        NewClientRow::from_draft(&draft)
    }

    #[test]
    fn given_accented_text_when_folded_should_drop_marks_and_case() {
        assert_eq!(fold_for_search("José PÉREZ Muñoz"), "jose perez munoz");
    }

    #[tokio::test]
    async fn given_inserts_when_list_should_return_rows_in_id_order() {
        let store = InMemoryClientStore::new();
        let a = store
            .insert(&row("Ana", "Gómez", "20-11111111-1", "a@t.com"))
            .await
            .unwrap();
        let b = store
            .insert(&row("Bruno", "Díaz", "20-22222222-2", "b@t.com"))
            .await
            .unwrap();

        let rows = store.list().await.unwrap();

        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[tokio::test]
    async fn given_deleted_row_when_insert_should_not_reuse_id() {
        let store = InMemoryClientStore::new();
        let a = store
            .insert(&row("Ana", "Gómez", "20-11111111-1", "a@t.com"))
            .await
            .unwrap();
        store.delete(a.id).await.unwrap();

        let b = store
            .insert(&row("Bruno", "Díaz", "20-22222222-2", "b@t.com"))
            .await
            .unwrap();

        assert_eq!(b.id, 2);
    }

    #[tokio::test]
    async fn given_duplicate_unique_fields_when_insert_should_report_cuit_first() {
        let store = InMemoryClientStore::new();
        store
            .insert(&row("Ana", "Gómez", "20-11111111-1", "a@t.com"))
            .await
            .unwrap();

        let both = store
            .insert(&row("X", "Y", "20-11111111-1", "a@t.com"))
            .await
            .unwrap_err();
        let email = store
            .insert(&row("X", "Y", "20-99999999-9", "a@t.com"))
            .await
            .unwrap_err();

        assert_eq!(both, ClientRepositoryError::Conflict(ConflictField::Cuit));
        assert_eq!(email, ClientRepositoryError::Conflict(ConflictField::Email));
    }

    #[tokio::test]
    async fn given_update_keeping_own_email_when_update_should_succeed() {
        let store = InMemoryClientStore::new();
        let mut stored = store
            .insert(&row("Ana", "Gómez", "20-11111111-1", "a@t.com"))
            .await
            .unwrap();
        stored.first_name = "Anabel".to_string();

        let updated = store.update(&stored).await.unwrap();

        assert_eq!(updated.first_name, "Anabel");
    }

    #[tokio::test]
    async fn given_update_taking_other_cuit_when_update_should_conflict() {
        let store = InMemoryClientStore::new();
        store
            .insert(&row("Ana", "Gómez", "20-11111111-1", "a@t.com"))
            .await
            .unwrap();
        let mut second = store
            .insert(&row("Bruno", "Díaz", "20-22222222-2", "b@t.com"))
            .await
            .unwrap();
        second.cuit = "20-11111111-1".to_string();

        let err = store.update(&second).await.unwrap_err();

        assert_eq!(err, ClientRepositoryError::Conflict(ConflictField::Cuit));
    }

    #[tokio::test]
    async fn given_missing_row_when_update_or_delete_should_return_not_found() {
        let store = InMemoryClientStore::new();
        let ghost = row("Ana", "Gómez", "20-11111111-1", "a@t.com").with_id(99);

        assert_eq!(
            store.update(&ghost).await.unwrap_err(),
            ClientRepositoryError::NotFound
        );
        assert_eq!(
            store.delete(99).await.unwrap_err(),
            ClientRepositoryError::NotFound
        );
    }

    #[tokio::test]
    async fn given_fragment_when_search_should_match_anywhere_ignoring_case_and_accents() {
        let store = InMemoryClientStore::new();
        store
            .insert(&row("José", "Gómez", "20-11111111-1", "a@t.com"))
            .await
            .unwrap();
        store
            .insert(&row("María", "Pérez", "20-22222222-2", "b@t.com"))
            .await
            .unwrap();

        let by_first = store.search_by_name("OSE").await.unwrap();
        let by_last = store.search_by_name("perez").await.unwrap();
        let none = store.search_by_name("zzz").await.unwrap();

        assert_eq!(by_first.len(), 1);
        assert_eq!(by_first[0].first_name, "José");
        assert_eq!(by_last.len(), 1);
        assert_eq!(by_last[0].first_name, "María");
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn given_email_and_cuit_on_different_rows_when_find_conflict_should_prefer_cuit_row() {
        let store = InMemoryClientStore::new();
        store
            .insert(&row("Ana", "Gómez", "20-11111111-1", "a@t.com"))
            .await
            .unwrap();
        let cuit_owner = store
            .insert(&row("Bruno", "Díaz", "20-22222222-2", "b@t.com"))
            .await
            .unwrap();

        let found = store
            .find_conflict("20-22222222-2", "a@t.com")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(found.id, cuit_owner.id);
    }

    #[tokio::test]
    async fn given_email_on_other_row_when_email_exists_for_other_should_be_true() {
        let store = InMemoryClientStore::new();
        let a = store
            .insert(&row("Ana", "Gómez", "20-11111111-1", "a@t.com"))
            .await
            .unwrap();

        assert!(!store.email_exists_for_other("a@t.com", a.id).await.unwrap());
        assert!(store.email_exists_for_other("a@t.com", a.id + 1).await.unwrap());
        assert!(!store.email_exists_for_other("nobody@t.com", 0).await.unwrap());
    }
}
