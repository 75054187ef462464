// Use case: list_clients.

use crate::application::context::AppContext;
use crate::domain::entities::client::Client;
use tracing::error;

/// Returns every registered client.
pub struct ListClientsUseCase;

#[derive(Debug)]
pub enum ListClientsError {
    Storage(String),
}

impl ListClientsUseCase {
    pub async fn execute(ctx: &AppContext) -> Result<Vec<Client>, ListClientsError> {
        ctx.repos.client.list().await.map_err(|e| {
            error!(error = ?e, "client list failed");
            ListClientsError::Storage(format!("{e:?}"))
        })
    }
}
