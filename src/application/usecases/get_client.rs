// Use case: get_client.

use crate::application::context::AppContext;
use crate::domain::entities::client::Client;
use crate::domain::value_objects::ids::ClientId;
use tracing::error;

/// Fetches a client by its ID.
pub struct GetClientUseCase;

#[derive(Debug)]
pub enum GetClientError {
    NotFound,
    Storage(String),
}

impl GetClientUseCase {
    /// Get a client by ID.
    pub async fn execute(ctx: &AppContext, client_id: ClientId) -> Result<Client, GetClientError> {
        // Step 1: Fetch from storage.
        let client = ctx.repos.client.get(client_id).await.map_err(|e| {
            error!(error = ?e, client_id = client_id.0, "client fetch failed");
            GetClientError::Storage(format!("{e:?}"))
        })?;

        // Step 2: Return NotFound when missing.
        client.ok_or(GetClientError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::{GetClientError, GetClientUseCase};
    use crate::application::context::test_support::{memory_context, test_context};
    use crate::domain::entities::client::test_support::sample_draft;
    use crate::domain::value_objects::ids::ClientId;

    #[tokio::test]
    async fn given_existing_client_when_execute_should_return_it() {
        let ctx = memory_context();
        let stored = ctx
            .repos
            .client
            .insert(&sample_draft("20-11111111-1", "a@t.com"))
            .await
            .unwrap();

        let client = GetClientUseCase::execute(&ctx, stored.id).await.unwrap();

        assert_eq!(client, stored);
    }

    #[tokio::test]
    async fn given_missing_client_when_execute_should_return_not_found() {
        let ctx = memory_context();

        let result = GetClientUseCase::execute(&ctx, ClientId(404)).await;

        assert!(matches!(result, Err(GetClientError::NotFound)));
    }

    #[tokio::test]
    async fn given_storage_error_when_execute_should_return_storage_error() {
        let ctx = test_context();

        let result = GetClientUseCase::execute(&ctx, ClientId(1)).await;

        assert!(matches!(result, Err(GetClientError::Storage(_))));
    }
}
