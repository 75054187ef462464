use std::sync::Arc;

use crate::infrastructure::db::database::{Database, DatabaseError};
use crate::infrastructure::db::memory::InMemoryClientStore;
use crate::infrastructure::db::postgres::PostgresDatabase;
use crate::infrastructure::db::postgres::client_store_postgres::ClientStorePostgres;
use crate::infrastructure::db::repositories::client_repository::ClientRepository;

#[derive(Clone)]
pub struct Repositories {
    /// Raw access to the backing store, used by readiness checks.
    pub db: Option<Arc<dyn Database>>,
    pub client: Arc<ClientRepository>,
}

impl Repositories {
    /// Build all repositories backed by Postgres stores.
    pub fn postgres(db: Arc<PostgresDatabase>) -> Self {
        let client_store = Arc::new(ClientStorePostgres::new(db.clone()));

        Self {
            db: Some(db),
            client: Arc::new(ClientRepository::new(client_store)),
        }
    }

    /// Build all repositories over a fresh process-local store.
    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryClientStore::new());

        Self {
            db: Some(store.clone()),
            client: Arc::new(ClientRepository::new(store)),
        }
    }

    /// Execute a raw SQL statement against the backing store.
    pub async fn execute(&self, query: &str) -> Result<u64, DatabaseError> {
        let Some(db) = self.db.as_ref() else {
            return Err(DatabaseError::Connection("db_unavailable".to_string()));
        };
        db.execute(query).await
    }
}
