use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use tracing::Instrument;

use super::state::ServerState;
use crate::{graphql_over_http, ExecutionContext, ExecutionResult};

/// Executes one GraphQL request against the admin schema.
///
/// Never fails: extraction and execution errors are all written as the
/// `errors` of a JSON body, with a 400 status.
pub(super) async fn execute(State(state): State<ServerState>, request: axum::extract::Request) -> Response {
    let (parts, body) = request.into_parts();

    let parameters = match graphql_over_http::extract(&parts, body, state.request_body_limit_bytes()).await {
        Ok(parameters) => parameters,
        Err(error) => {
            tracing::debug!(%error, "refusing a malformed admin request");
            return ExecutionResult::refused(&error).into_response();
        }
    };

    let span = tracing::info_span!(
        "admin-request",
        method = %parts.method,
        operation_name = parameters.operation_name.as_deref().unwrap_or_default(),
    );

    let context = ExecutionContext::new(parts.headers, state.timeout());

    let result = state.engine().execute(parameters, context).instrument(span.clone()).await;

    span.in_scope(|| tracing::debug!(errors = result.errors.len(), "admin request executed"));

    result.into_response()
}
