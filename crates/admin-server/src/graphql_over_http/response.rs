use async_graphql::{ServerError, Value};
use axum::{
    body::Body,
    response::{IntoResponse, Response},
};
use http::{header::CONTENT_TYPE, HeaderValue, StatusCode};

use super::ExtractionError;

const APPLICATION_JSON: HeaderValue = HeaderValue::from_static("application/json");

// Sent when the result itself cannot be serialized.
const ENCODING_FAILURE: &str = r#"{"data":null,"errors":[{"message":"Internal error: the response could not be encoded"}]}"#;

/// Outcome of executing one admin request.
///
/// Both fields are always serialized, `errors` being empty on success.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ExecutionResult {
    /// Data produced by the operation, null when it could not run.
    pub data: Value,
    /// Errors raised while parsing, validating or executing the operation.
    pub errors: Vec<ServerError>,
}

impl ExecutionResult {
    /// A result for a request that never reached the execution engine.
    pub fn refused(error: &ExtractionError) -> Self {
        Self {
            data: Value::Null,
            errors: vec![ServerError::new(
                format!("Bad request: GraphQL request is not well formed: {error}"),
                None,
            )],
        }
    }

    /// 400 as soon as there is a single error, 200 otherwise.
    pub fn status_code(&self) -> StatusCode {
        if self.errors.is_empty() {
            StatusCode::OK
        } else {
            StatusCode::BAD_REQUEST
        }
    }
}

impl From<async_graphql::Response> for ExecutionResult {
    fn from(response: async_graphql::Response) -> Self {
        Self {
            data: response.data,
            errors: response.errors,
        }
    }
}

impl IntoResponse for ExecutionResult {
    fn into_response(self) -> Response {
        let (status, body) = match serde_json::to_vec(&self) {
            Ok(body) => (self.status_code(), body),
            Err(error) => {
                tracing::warn!(%error, "could not encode the admin response");
                (StatusCode::BAD_REQUEST, ENCODING_FAILURE.as_bytes().to_vec())
            }
        };

        let mut response = Response::new(Body::from(body));

        *response.status_mut() = status;
        response.headers_mut().insert(CONTENT_TYPE, APPLICATION_JSON);

        response
    }
}
