// HTTP routes: client CRUD and name search.

use crate::application::usecases::create_client::{CreateClientError, CreateClientUseCase};
use crate::application::usecases::delete_client::{DeleteClientError, DeleteClientUseCase};
use crate::application::usecases::get_client::{GetClientError, GetClientUseCase};
use crate::application::usecases::list_clients::ListClientsUseCase;
use crate::application::usecases::search_clients::{SearchClientsUseCase, SearchOutcome};
use crate::application::usecases::update_client::{
    UpdateClientCommand, UpdateClientError, UpdateClientUseCase,
};
use crate::domain::entities::client::Client;
use crate::domain::value_objects::ids::ClientId;
use crate::interface::http::dto::client::{ClientRequest, ClientResponse, SearchQuery};
use crate::interface::http::problem::{
    CLIENT_ID_MISMATCH, CLIENT_NO_MATCHES, CLIENT_NOT_FOUND, CLIENT_REQUEST_MALFORMED,
    conflict_problem, internal_problem, problem, validation_problem,
};
use crate::interface::http::state::AppState;
use crate::interface::http::trace::TraceId;
use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Extension, Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;

/// Builds the client routes.
pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/clients", get(list_clients).post(create_client))
        .route("/clients/search", get(search_clients))
        .route(
            "/clients/:client_id",
            get(get_client).put(update_client).delete(delete_client),
        )
}

fn instance(client_id: &str) -> Option<String> {
    Some(format!("/clients/{client_id}"))
}

fn parse_client_id(raw: &str, trace_id: &TraceId) -> Result<ClientId, Response> {
    raw.parse::<ClientId>().map_err(|_| {
        problem(
            StatusCode::BAD_REQUEST,
            CLIENT_REQUEST_MALFORMED,
            Some("client id must be an integer".to_string()),
            None,
            trace_id.value(),
        )
    })
}

fn malformed_body(rejection: JsonRejection, trace_id: &TraceId) -> Response {
    problem(
        StatusCode::BAD_REQUEST,
        CLIENT_REQUEST_MALFORMED,
        Some(rejection.body_text()),
        None,
        trace_id.value(),
    )
}

fn not_found(client_id: ClientId, trace_id: &TraceId) -> Response {
    problem(
        StatusCode::NOT_FOUND,
        CLIENT_NOT_FOUND,
        Some(format!("client {client_id} not found")),
        instance(&client_id.to_string()),
        trace_id.value(),
    )
}

fn client_list(clients: Vec<Client>) -> Response {
    let body: Vec<ClientResponse> = clients.into_iter().map(ClientResponse::from).collect();
    (StatusCode::OK, Json(body)).into_response()
}

/// Lists every client ordered by id.
async fn list_clients(
    State(state): State<AppState>,
    Extension(trace_id): Extension<TraceId>,
) -> Response {
    match ListClientsUseCase::execute(&state.ctx).await {
        Ok(clients) => client_list(clients),
        Err(_) => internal_problem(trace_id.value()),
    }
}

/// Returns a single client.
async fn get_client(
    State(state): State<AppState>,
    Extension(trace_id): Extension<TraceId>,
    Path(raw_id): Path<String>,
) -> Response {
    // Step 1: Parse the path id.
    let client_id = match parse_client_id(&raw_id, &trace_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    // Step 2: Fetch and map the outcome.
    match GetClientUseCase::execute(&state.ctx, client_id).await {
        Ok(client) => (StatusCode::OK, Json(ClientResponse::from(client))).into_response(),
        Err(GetClientError::NotFound) => not_found(client_id, &trace_id),
        Err(GetClientError::Storage(_)) => internal_problem(trace_id.value()),
    }
}

/// Searches clients by a fragment of their first or last name.
async fn search_clients(
    State(state): State<AppState>,
    Extension(trace_id): Extension<TraceId>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => {
            return problem(
                StatusCode::BAD_REQUEST,
                CLIENT_REQUEST_MALFORMED,
                Some(rejection.body_text()),
                None,
                trace_id.value(),
            );
        }
    };

    match SearchClientsUseCase::execute(&state.ctx, query.name.as_deref()).await {
        Ok(SearchOutcome::NoMatches) => problem(
            StatusCode::NOT_FOUND,
            CLIENT_NO_MATCHES,
            Some(format!(
                "no client name contains '{}'",
                query.name.as_deref().unwrap_or_default().trim()
            )),
            None,
            trace_id.value(),
        ),
        Ok(outcome) => client_list(outcome.into_clients()),
        Err(_) => internal_problem(trace_id.value()),
    }
}

/// Registers a new client and points `Location` at it.
async fn create_client(
    State(state): State<AppState>,
    Extension(trace_id): Extension<TraceId>,
    payload: Result<Json<ClientRequest>, JsonRejection>,
) -> Response {
    // Step 1: Reject bodies that are not a client object.
    let Json(request) = match payload {
        Ok(json) => json,
        Err(rejection) => return malformed_body(rejection, &trace_id),
    };

    // Step 2: Any id in the body is ignored; the store assigns it.
    let (_, input) = request.into_parts();

    // Step 3: Execute and map the outcome.
    match CreateClientUseCase::execute(&state.ctx, input).await {
        Ok(client) => {
            let location = format!("/clients/{}", client.id);
            (
                StatusCode::CREATED,
                [(header::LOCATION, location)],
                Json(ClientResponse::from(client)),
            )
                .into_response()
        }
        Err(CreateClientError::Validation(errors)) => {
            validation_problem(&errors, None, trace_id.value())
        }
        Err(CreateClientError::Conflict(conflict)) => {
            conflict_problem(&conflict, None, trace_id.value())
        }
        Err(CreateClientError::Storage(_)) => internal_problem(trace_id.value()),
    }
}

/// Replaces every field of an existing client.
async fn update_client(
    State(state): State<AppState>,
    Extension(trace_id): Extension<TraceId>,
    Path(raw_id): Path<String>,
    payload: Result<Json<ClientRequest>, JsonRejection>,
) -> Response {
    // Step 1: Parse the path id and the body.
    let client_id = match parse_client_id(&raw_id, &trace_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let Json(request) = match payload {
        Ok(json) => json,
        Err(rejection) => return malformed_body(rejection, &trace_id),
    };
    let (body_id, input) = request.into_parts();

    // Step 2: Execute the update use case.
    let result = UpdateClientUseCase::execute(
        &state.ctx,
        UpdateClientCommand {
            client_id,
            body_id,
            input,
        },
    )
    .await;

    // Step 3: Map the outcome.
    match result {
        Ok(client) => (StatusCode::OK, Json(ClientResponse::from(client))).into_response(),
        Err(UpdateClientError::IdMismatch) => problem(
            StatusCode::BAD_REQUEST,
            CLIENT_ID_MISMATCH,
            Some("the body id does not match the path id".to_string()),
            instance(&raw_id),
            trace_id.value(),
        ),
        Err(UpdateClientError::Validation(errors)) => {
            validation_problem(&errors, instance(&raw_id), trace_id.value())
        }
        Err(UpdateClientError::NotFound) => not_found(client_id, &trace_id),
        Err(UpdateClientError::Conflict(conflict)) => {
            conflict_problem(&conflict, instance(&raw_id), trace_id.value())
        }
        Err(UpdateClientError::Storage(_)) => internal_problem(trace_id.value()),
    }
}

/// Deletes a client; 204 with no body on success.
async fn delete_client(
    State(state): State<AppState>,
    Extension(trace_id): Extension<TraceId>,
    Path(raw_id): Path<String>,
) -> Response {
    let client_id = match parse_client_id(&raw_id, &trace_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match DeleteClientUseCase::execute(&state.ctx, client_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(DeleteClientError::NotFound) => not_found(client_id, &trace_id),
        Err(DeleteClientError::Storage(_)) => internal_problem(trace_id.value()),
    }
}
