use crate::domain::services::conflict::ConflictField;
use crate::infrastructure::db::database::DatabaseError;
use crate::infrastructure::db::dto::{ClientRow, NewClientRow};
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientRepositoryError {
    NotFound,
    /// A unique constraint rejected the write.
    Conflict(ConflictField),
    InvalidInput,
    StorageUnavailable,
}

impl From<DatabaseError> for ClientRepositoryError {
    fn from(_: DatabaseError) -> Self {
        ClientRepositoryError::StorageUnavailable
    }
}

/// Persistence for `clients` rows.
///
/// Implementations must enforce CUIT and email uniqueness themselves and
/// report violations as [`ClientRepositoryError::Conflict`], so a race between
/// a conflict check and the write still surfaces as a conflict.
#[async_trait]
pub trait ClientStore: Send + Sync {
    /// Every row, ordered by id.
    async fn list(&self) -> Result<Vec<ClientRow>, ClientRepositoryError>;
    /// Fetch a client by its ID. Returns `None` if it doesn't exist.
    async fn get(&self, client_id: i32) -> Result<Option<ClientRow>, ClientRepositoryError>;
    /// Insert a client and return the stored row with its assigned id.
    async fn insert(&self, row: &NewClientRow) -> Result<ClientRow, ClientRepositoryError>;
    /// Overwrite every mutable column of the row with the same id.
    async fn update(&self, row: &ClientRow) -> Result<ClientRow, ClientRepositoryError>;
    /// Delete a client by its ID. Returns an error if it doesn't exist.
    async fn delete(&self, client_id: i32) -> Result<(), ClientRepositoryError>;
    /// Case- and accent-insensitive substring match on first or last name.
    async fn search_by_name(&self, fragment: &str)
    -> Result<Vec<ClientRow>, ClientRepositoryError>;
    /// First row whose CUIT or email equals the given one.
    async fn find_conflict(
        &self,
        cuit: &str,
        email: &str,
    ) -> Result<Option<ClientRow>, ClientRepositoryError>;
    /// Whether a row other than `exclude_id` already uses `email`.
    async fn email_exists_for_other(
        &self,
        email: &str,
        exclude_id: i32,
    ) -> Result<bool, ClientRepositoryError>;
}
