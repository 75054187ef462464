// Use case: create_client.

use crate::application::context::AppContext;
use crate::domain::entities::client::Client;
use crate::domain::services::client_validation::{ClientInput, FieldError};
use crate::domain::services::conflict::{ClientConflict, resolve_conflict};
use crate::infrastructure::db::stores::client_store::ClientRepositoryError;
use tracing::{error, info};

/// Registers a new client after validation and uniqueness checks.
pub struct CreateClientUseCase;

#[derive(Debug)]
pub enum CreateClientError {
    Validation(Vec<FieldError>),
    Conflict(ClientConflict),
    Storage(String),
}

impl CreateClientUseCase {
    /// Create a client and return it with its store-assigned id.
    pub async fn execute(ctx: &AppContext, input: ClientInput) -> Result<Client, CreateClientError> {
        // Step 1: Validate field formats (pure, no store access).
        let draft = ctx
            .validator
            .validate(&input)
            .map_err(CreateClientError::Validation)?;

        // Step 2: Look for an existing client sharing the CUIT or the email.
        let existing = ctx
            .repos
            .client
            .find_conflict(&draft.cuit, &draft.email)
            .await
            .map_err(|e| {
                error!(error = ?e, "conflict lookup failed");
                CreateClientError::Storage(format!("{e:?}"))
            })?;

        // Step 3: Reject with an attributable reason (CUIT wins over email).
        if let Some(conflict) = existing
            .as_ref()
            .and_then(|client| resolve_conflict(client, &draft))
        {
            info!(field = conflict.field.as_str(), "client create rejected");
            return Err(CreateClientError::Conflict(conflict));
        }

        // Step 4: Persist; a unique violation here means a concurrent create won the race.
        let stored = ctx
            .repos
            .client
            .insert(&draft)
            .await
            .map_err(|e| match e {
                ClientRepositoryError::Conflict(field) => {
                    info!(field = field.as_str(), "client create lost a uniqueness race");
                    CreateClientError::Conflict(ClientConflict::for_draft(field, &draft))
                }
                other => {
                    error!(error = ?other, "client insert failed");
                    CreateClientError::Storage(format!("{other:?}"))
                }
            })?;

        // Step 5: Return the stored client.
        info!(client_id = stored.id.0, "client created");
        Ok(stored)
    }
}
