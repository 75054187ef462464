use crate::domain::entities::client::{Client, ClientDraft};
use crate::domain::value_objects::ids::ClientId;
use crate::infrastructure::db::dto::{ClientRow, NewClientRow};
use crate::infrastructure::db::stores::client_store::{ClientRepositoryError, ClientStore};
use std::sync::Arc;

/// Domain-facing access to client records, over any [`ClientStore`].
pub struct ClientRepository {
    store: Arc<dyn ClientStore>,
}

fn into_clients(rows: Vec<ClientRow>) -> Vec<Client> {
    rows.into_iter().map(ClientRow::into_client).collect()
}

impl ClientRepository {
    /// Build a repository that uses the given store implementation.
    pub fn new(store: Arc<dyn ClientStore>) -> Self {
        Self { store }
    }

    /// All clients, ordered by id.
    pub async fn list(&self) -> Result<Vec<Client>, ClientRepositoryError> {
        Ok(into_clients(self.store.list().await?))
    }

    /// Fetch a client by its ID. Returns `None` if it doesn't exist.
    pub async fn get(&self, client_id: ClientId) -> Result<Option<Client>, ClientRepositoryError> {
        Ok(self.store.get(client_id.0).await?.map(ClientRow::into_client))
    }

    /// Persist a new client and return it with the id the store assigned.
    pub async fn insert(&self, draft: &ClientDraft) -> Result<Client, ClientRepositoryError> {
        let dto = NewClientRow::from_draft(draft);
        let stored = self.store.insert(&dto).await?;

        Ok(stored.into_client())
    }

    /// Update a client and return what was actually stored in the database.
    pub async fn update(&self, client: &Client) -> Result<Client, ClientRepositoryError> {
        let dto = ClientRow::from_client(client);
        let stored = self.store.update(&dto).await?;

        Ok(stored.into_client())
    }

    /// Delete a previously fetched client.
    pub async fn delete(&self, client: &Client) -> Result<(), ClientRepositoryError> {
        self.store.delete(client.id.0).await
    }

    pub async fn search_by_name(&self, fragment: &str) -> Result<Vec<Client>, ClientRepositoryError> {
        Ok(into_clients(self.store.search_by_name(fragment).await?))
    }

    /// First existing client sharing the CUIT or the email, if any.
    pub async fn find_conflict(
        &self,
        cuit: &str,
        email: &str,
    ) -> Result<Option<Client>, ClientRepositoryError> {
        Ok(self
            .store
            .find_conflict(cuit, email)
            .await?
            .map(ClientRow::into_client))
    }

    pub async fn email_exists_for_other(
        &self,
        email: &str,
        exclude: ClientId,
    ) -> Result<bool, ClientRepositoryError> {
        self.store.email_exists_for_other(email, exclude.0).await
    }
}
