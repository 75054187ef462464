use std::collections::BTreeMap;

use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::domain::services::client_validation::FieldError;
use crate::domain::services::conflict::{ClientConflict, ConflictField};

/// RFC 7807 Problem Details payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemDetails {
    /// A URI reference that identifies the problem type.
    #[serde(rename = "type")]
    pub r#type: String,
    /// A short, human-readable summary of the problem type.
    pub title: String,
    /// The HTTP status code for this occurrence.
    pub status: u16,
    /// A human-readable explanation specific to this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// A URI reference that identifies this specific occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    /// A stable, machine-readable application error code (CLIENT_...).
    pub code: String,
    /// Per-field messages, keyed by the JSON field name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
    /// The request's trace id, for support.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

impl ProblemDetails {
    fn new(status: StatusCode, code: &str, detail: Option<String>) -> Self {
        Self {
            r#type: "about:blank".to_string(),
            title: status.canonical_reason().unwrap_or("Error").to_string(),
            status: status.as_u16(),
            detail,
            instance: None,
            code: code.to_string(),
            errors: None,
            trace_id: None,
        }
    }

    fn into_response_with_status(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, Json(self)).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/problem+json"),
        );
        response
    }
}

/// Build a Problem Details response with the correct content-type.
pub fn problem(
    status: StatusCode,
    code: &str,
    detail: Option<String>,
    instance: Option<String>,
    trace_id: Option<String>,
) -> Response {
    // Step 1: Build the problem payload.
    let mut payload = ProblemDetails::new(status, code, detail);
    payload.instance = instance;
    payload.trace_id = trace_id;

    // Step 2: Convert to an HTTP response with the RFC 7807 content type.
    payload.into_response_with_status()
}

/// 400 listing every failing field.
pub fn validation_problem(
    errors: &[FieldError],
    instance: Option<String>,
    trace_id: Option<String>,
) -> Response {
    let mut by_field: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for error in errors {
        by_field
            .entry(error.field.to_string())
            .or_default()
            .push(error.message.clone());
    }

    let mut payload = ProblemDetails::new(
        StatusCode::BAD_REQUEST,
        CLIENT_VALIDATION_FAILED,
        Some("one or more fields are invalid".to_string()),
    );
    payload.instance = instance;
    payload.errors = Some(by_field);
    payload.trace_id = trace_id;
    payload.into_response_with_status()
}

/// 409 naming the colliding field.
pub fn conflict_problem(
    conflict: &ClientConflict,
    instance: Option<String>,
    trace_id: Option<String>,
) -> Response {
    let code = match conflict.field {
        ConflictField::Cuit => CLIENT_CUIT_CONFLICT,
        ConflictField::Email => CLIENT_EMAIL_CONFLICT,
    };
    let message = conflict.to_string();

    let mut payload = ProblemDetails::new(StatusCode::CONFLICT, code, Some(message.clone()));
    payload.instance = instance;
    payload.errors = Some(BTreeMap::from([(
        conflict.field.as_str().to_string(),
        vec![message],
    )]));
    payload.trace_id = trace_id;
    payload.into_response_with_status()
}

/// Opaque 500; details stay in the server log.
pub fn internal_problem(trace_id: Option<String>) -> Response {
    problem(
        StatusCode::INTERNAL_SERVER_ERROR,
        CLIENT_INTERNAL,
        Some("an unexpected error occurred".to_string()),
        None,
        trace_id,
    )
}

pub const CLIENT_REQUEST_MALFORMED: &str = "CLIENT_REQUEST_MALFORMED";
pub const CLIENT_VALIDATION_FAILED: &str = "CLIENT_VALIDATION_FAILED";
pub const CLIENT_ID_MISMATCH: &str = "CLIENT_ID_MISMATCH";
pub const CLIENT_NOT_FOUND: &str = "CLIENT_NOT_FOUND";
pub const CLIENT_NO_MATCHES: &str = "CLIENT_NO_MATCHES";
pub const CLIENT_CUIT_CONFLICT: &str = "CLIENT_CUIT_CONFLICT";
pub const CLIENT_EMAIL_CONFLICT: &str = "CLIENT_EMAIL_CONFLICT";
pub const CLIENT_INTERNAL: &str = "CLIENT_INTERNAL";

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body_json(response: Response) -> Value {
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn given_problem_when_rendered_should_use_problem_json_and_camel_case() {
        let response = problem(
            StatusCode::NOT_FOUND,
            CLIENT_NOT_FOUND,
            Some("client 7 not found".to_string()),
            Some("/clients/7".to_string()),
            Some("trace-1".to_string()),
        );

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/problem+json"
        );
        let json = body_json(response).await;
        assert_eq!(json["code"], "CLIENT_NOT_FOUND");
        assert_eq!(json["title"], "Not Found");
        assert_eq!(json["traceId"], "trace-1");
        assert!(json.get("errors").is_none());
    }

    #[tokio::test]
    async fn given_field_errors_when_rendered_should_group_messages_by_field() {
        let errors = vec![
            FieldError {
                field: "cuit",
                message: "The cuit field is required.".to_string(),
            },
            FieldError {
                field: "email",
                message: "The email field is not a valid e-mail address.".to_string(),
            },
        ];

        let response = validation_problem(&errors, None, None);

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["code"], "CLIENT_VALIDATION_FAILED");
        assert_eq!(json["errors"]["cuit"][0], "The cuit field is required.");
        assert_eq!(json["errors"].as_object().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn given_email_conflict_when_rendered_should_name_email_field() {
        let conflict = ClientConflict {
            field: ConflictField::Email,
            value: "j@t.com".to_string(),
        };

        let response = conflict_problem(&conflict, None, None);

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let json = body_json(response).await;
        assert_eq!(json["code"], "CLIENT_EMAIL_CONFLICT");
        assert!(json["errors"].get("email").is_some());
        assert!(json["detail"].as_str().unwrap().contains("j@t.com"));
    }

    #[tokio::test]
    async fn given_internal_problem_when_rendered_should_not_leak_detail() {
        let response = internal_problem(None);

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["code"], "CLIENT_INTERNAL");
        assert_eq!(json["detail"], "an unexpected error occurred");
    }
}
