use crate::domain::services::client_validation::ClientValidator;
use crate::infrastructure::db::repositories::Repositories;

/// Shared application resources used by use cases.
pub struct AppContext {
    pub repos: Repositories,
    pub validator: ClientValidator,
}

impl AppContext {
    /// Build a new application context with shared repositories and validation policy.
    pub fn new(repos: Repositories, validator: ClientValidator) -> Self {
        Self { repos, validator }
    }
}

#[cfg(test)]
pub mod test_support {
    use super::AppContext;
    use crate::domain::services::client_validation::{ClientInput, ClientValidator};
    use crate::infrastructure::db::dto::{ClientRow, NewClientRow};
    use crate::infrastructure::db::repositories::Repositories;
    use crate::infrastructure::db::repositories::client_repository::ClientRepository;
    use crate::infrastructure::db::stores::client_store::{ClientRepositoryError, ClientStore};
    use async_trait::async_trait;
    use std::sync::Arc;

    /// A store whose every call fails as if the database were down.
    #[derive(Clone)]
    pub struct NullClientStore;

    #[async_trait]
    impl ClientStore for NullClientStore {
        async fn list(&self) -> Result<Vec<ClientRow>, ClientRepositoryError> {
            Err(ClientRepositoryError::StorageUnavailable)
        }

        async fn get(&self, _client_id: i32) -> Result<Option<ClientRow>, ClientRepositoryError> {
            Err(ClientRepositoryError::StorageUnavailable)
        }

        async fn insert(&self, _row: &NewClientRow) -> Result<ClientRow, ClientRepositoryError> {
            Err(ClientRepositoryError::StorageUnavailable)
        }

        async fn update(&self, _row: &ClientRow) -> Result<ClientRow, ClientRepositoryError> {
            Err(ClientRepositoryError::StorageUnavailable)
        }

        async fn delete(&self, _client_id: i32) -> Result<(), ClientRepositoryError> {
            Err(ClientRepositoryError::StorageUnavailable)
        }

        async fn search_by_name(
            &self,
            _fragment: &str,
        ) -> Result<Vec<ClientRow>, ClientRepositoryError> {
            Err(ClientRepositoryError::StorageUnavailable)
        }

        async fn find_conflict(
            &self,
            _cuit: &str,
            _email: &str,
        ) -> Result<Option<ClientRow>, ClientRepositoryError> {
            Err(ClientRepositoryError::StorageUnavailable)
        }

        async fn email_exists_for_other(
            &self,
            _email: &str,
            _exclude_id: i32,
        ) -> Result<bool, ClientRepositoryError> {
            Err(ClientRepositoryError::StorageUnavailable)
        }
    }

    /// Context whose store always fails (tests override as needed).
    pub fn test_context() -> AppContext {
        let repos = Repositories {
            db: None,
            client: Arc::new(ClientRepository::new(Arc::new(NullClientStore))),
        };
        AppContext::new(repos, ClientValidator::default())
    }

    /// Context over a fresh in-memory store.
    pub fn memory_context() -> AppContext {
        AppContext::new(Repositories::in_memory(), ClientValidator::default())
    }

    /// Raw input that passes validation under the default policy.
    pub fn valid_input(cuit: &str, email: &str) -> ClientInput {
        ClientInput {
            first_name: Some("Juan".to_string()),
            last_name: Some("Pérez".to_string()),
            corporate_name: Some("Pérez SRL".to_string()),
            cuit: Some(cuit.to_string()),
            birthdate: Some("1990-05-17".to_string()),
            cell_phone: Some("1123456789".to_string()),
            email: Some(email.to_string()),
        }
    }

    /// Context over the given store.
    pub fn context_with_store(store: Arc<dyn ClientStore>) -> AppContext {
        let repos = Repositories {
            db: None,
            client: Arc::new(ClientRepository::new(store)),
        };
        AppContext::new(repos, ClientValidator::default())
    }
}
