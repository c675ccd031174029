//! GraphQL over HTTP: extracting request parameters and encoding results.

mod response;

use axum::body::{Body, Bytes};
use serde_json::{Map, Value};

pub use response::ExecutionResult;

/// Parameters of a GraphQL request, as sent by the client.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameters {
    /// The GraphQL document.
    pub query: String,
    /// Values of the variables declared by the operation.
    #[serde(default)]
    pub variables: Option<Map<String, Value>>,
    /// The operation to run when the document holds several of them.
    #[serde(default)]
    pub operation_name: Option<String>,
}

impl Parameters {
    /// Converts the parameters into a request for the execution engine.
    pub fn into_request(self) -> async_graphql::Request {
        let mut request = async_graphql::Request::new(self.query);

        if let Some(variables) = self.variables {
            request = request.variables(async_graphql::Variables::from_json(Value::Object(variables)));
        }

        if let Some(operation_name) = self.operation_name.filter(|name| !name.is_empty()) {
            request = request.operation_name(operation_name);
        }

        request
    }
}

/// Why parameters could not be extracted from a request.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// POST requests must carry JSON.
    #[error("Missing or invalid Content-Type header. You must specify 'application/json'.")]
    UnsupportedContentType,
    /// The body is too large or the connection failed while reading it.
    #[error("could not read the request body: {0}")]
    Body(#[source] axum::Error),
    /// The POST body is not a GraphQL request.
    #[error("JSON deserialization failure: {0}")]
    Json(#[source] serde_json::Error),
    /// The query string of a GET request cannot be decoded.
    #[error("Could not deserialize request from query parameters: {0}")]
    QueryParameters(#[source] serde_urlencoded::de::Error),
    /// The `variables` query parameter is not a JSON object.
    #[error("variables must be a JSON object: {0}")]
    Variables(#[source] serde_json::Error),
    /// A GET request without `query`.
    #[error("missing the query parameter")]
    MissingQuery,
}

#[derive(serde::Deserialize)]
struct QueryParameters {
    #[serde(default)]
    query: Option<String>,
    #[serde(default)]
    variables: Option<String>,
    #[serde(default, rename = "operationName")]
    operation_name: Option<String>,
}

/// Reads the GraphQL parameters from the JSON body of POST requests, and from
/// the query string otherwise.
pub(crate) async fn extract(
    parts: &http::request::Parts,
    body: Body,
    body_limit_bytes: usize,
) -> Result<Parameters, ExtractionError> {
    if parts.method == http::Method::POST {
        if !content_type_is_application_json(&parts.headers) {
            return Err(ExtractionError::UnsupportedContentType);
        }

        let body = axum::body::to_bytes(body, body_limit_bytes)
            .await
            .map_err(ExtractionError::Body)?;

        from_json_body(&body)
    } else {
        from_query_string(parts.uri.query().unwrap_or_default())
    }
}

fn from_json_body(body: &Bytes) -> Result<Parameters, ExtractionError> {
    serde_json::from_slice(body).map_err(ExtractionError::Json)
}

fn from_query_string(query: &str) -> Result<Parameters, ExtractionError> {
    let QueryParameters {
        query,
        variables,
        operation_name,
    } = serde_urlencoded::from_str(query).map_err(ExtractionError::QueryParameters)?;

    let variables = match variables.as_deref() {
        None | Some("") => None,
        Some(variables) => serde_json::from_str(variables).map_err(ExtractionError::Variables)?,
    };

    Ok(Parameters {
        query: query.ok_or(ExtractionError::MissingQuery)?,
        variables,
        operation_name: operation_name.filter(|name| !name.is_empty()),
    })
}

fn content_type_is_application_json(headers: &http::HeaderMap) -> bool {
    let Some(header) = headers.get(http::header::CONTENT_TYPE) else {
        return false;
    };

    let header = header.to_str().unwrap_or_default();
    let (without_parameters, _) = header.split_once(';').unwrap_or((header, ""));

    without_parameters.trim().eq_ignore_ascii_case("application/json")
}
