// Use case: update_client.

use crate::application::context::AppContext;
use crate::domain::entities::client::Client;
use crate::domain::services::client_validation::{ClientInput, FieldError};
use crate::domain::services::conflict::{ClientConflict, ConflictField};
use crate::domain::value_objects::ids::ClientId;
use crate::infrastructure::db::stores::client_store::ClientRepositoryError;
use tracing::{error, info};

/// Replaces every mutable field of an existing client.
pub struct UpdateClientUseCase;

#[derive(Debug)]
pub struct UpdateClientCommand {
    /// Id addressed by the request path.
    pub client_id: ClientId,
    /// Id carried in the body, which must name the same client.
    pub body_id: Option<ClientId>,
    pub input: ClientInput,
}

#[derive(Debug)]
pub enum UpdateClientError {
    IdMismatch,
    Validation(Vec<FieldError>),
    NotFound,
    Conflict(ClientConflict),
    Storage(String),
}

fn storage(e: ClientRepositoryError) -> UpdateClientError {
    error!(error = ?e, "client update failed");
    UpdateClientError::Storage(format!("{e:?}"))
}

impl UpdateClientUseCase {
    pub async fn execute(
        ctx: &AppContext,
        cmd: UpdateClientCommand,
    ) -> Result<Client, UpdateClientError> {
        // Step 1: Path and body must address the same client; no store access otherwise.
        if cmd.body_id != Some(cmd.client_id) {
            return Err(UpdateClientError::IdMismatch);
        }

        // Step 2: Validate the replacement fields.
        let draft = ctx
            .validator
            .validate(&cmd.input)
            .map_err(UpdateClientError::Validation)?;

        // Step 3: Fetch the current record.
        let mut client = ctx
            .repos
            .client
            .get(cmd.client_id)
            .await
            .map_err(storage)?
            .ok_or(UpdateClientError::NotFound)?;

        // Step 4: The new email may only belong to this client.
        let taken = ctx
            .repos
            .client
            .email_exists_for_other(&draft.email, client.id)
            .await
            .map_err(storage)?;
        if taken {
            info!(client_id = client.id.0, "client update rejected: email in use");
            return Err(UpdateClientError::Conflict(ClientConflict::for_draft(
                ConflictField::Email,
                &draft,
            )));
        }

        // Step 5: Overwrite and persist.
        let conflict_draft = draft.clone();
        client.apply(draft);
        let stored = ctx
            .repos
            .client
            .update(&client)
            .await
            .map_err(|e| match e {
                ClientRepositoryError::NotFound => UpdateClientError::NotFound,
                ClientRepositoryError::Conflict(field) => {
                    UpdateClientError::Conflict(ClientConflict::for_draft(field, &conflict_draft))
                }
                other => storage(other),
            })?;

        info!(client_id = stored.id.0, "client updated");
        Ok(stored)
    }
}
