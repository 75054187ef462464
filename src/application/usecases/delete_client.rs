// Use case: delete_client.

use crate::application::context::AppContext;
use crate::domain::value_objects::ids::ClientId;
use crate::infrastructure::db::stores::client_store::ClientRepositoryError;
use tracing::{error, info};

/// Removes a client permanently.
pub struct DeleteClientUseCase;

#[derive(Debug)]
pub enum DeleteClientError {
    NotFound,
    Storage(String),
}

fn storage(e: ClientRepositoryError) -> DeleteClientError {
    error!(error = ?e, "client delete failed");
    DeleteClientError::Storage(format!("{e:?}"))
}

impl DeleteClientUseCase {
    pub async fn execute(ctx: &AppContext, client_id: ClientId) -> Result<(), DeleteClientError> {
        // Step 1: Fetch the client; missing ids are reported without a delete.
        let client = ctx
            .repos
            .client
            .get(client_id)
            .await
            .map_err(storage)?
            .ok_or(DeleteClientError::NotFound)?;

        // Step 2: Delete it. A concurrent delete between the two calls is still NotFound.
        ctx.repos.client.delete(&client).await.map_err(|e| match e {
            ClientRepositoryError::NotFound => DeleteClientError::NotFound,
            other => storage(other),
        })?;

        info!(client_id = client_id.0, "client deleted");
        Ok(())
    }
}
