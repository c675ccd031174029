use std::{sync::Arc, time::Duration};

use async_graphql::{ObjectType, ServerError, SubscriptionType};
use tokio::time::Instant;

use crate::{ExecutionResult, Parameters};

/// Request scoped data handed to the executor alongside the GraphQL request.
///
/// Built from the inbound HTTP request and dropped once the response is written.
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    headers: http::HeaderMap,
    deadline: Option<Instant>,
}

impl ExecutionContext {
    /// Creates a context for a request received now, expiring after `timeout` if any.
    /// A timeout too far in the future to represent means no deadline.
    pub fn new(headers: http::HeaderMap, timeout: Option<Duration>) -> Self {
        Self {
            headers,
            deadline: timeout.and_then(|timeout| Instant::now().checked_add(timeout)),
        }
    }

    /// Headers of the inbound request.
    pub fn headers(&self) -> &http::HeaderMap {
        &self.headers
    }

    /// Point in time after which the execution is abandoned.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}

/// Something able to execute a GraphQL request against a fixed schema.
///
/// Implemented for every `async_graphql::Schema`, and a trait object so the
/// router does not need to be generic over the root types.
#[async_trait::async_trait]
pub trait Executor: Send + Sync + 'static {
    /// Executes one request. Failures are reported in the response errors.
    async fn execute(&self, request: async_graphql::Request, context: &ExecutionContext) -> async_graphql::Response;
}

#[async_trait::async_trait]
impl<Q, M, S> Executor for async_graphql::Schema<Q, M, S>
where
    Q: ObjectType + 'static,
    M: ObjectType + 'static,
    S: SubscriptionType + 'static,
{
    async fn execute(&self, request: async_graphql::Request, context: &ExecutionContext) -> async_graphql::Response {
        async_graphql::Schema::execute(self, request.data(context.clone())).await
    }
}

/// The execution engine bound to the admin schema.
#[derive(Clone)]
pub struct Engine {
    executor: Arc<dyn Executor>,
}

impl Engine {
    /// Binds the engine to an executor, usually the admin schema.
    pub fn new(executor: impl Executor) -> Self {
        Self {
            executor: Arc::new(executor),
        }
    }

    /// Executes the parameters once. The deadline of the context is honored by
    /// abandoning the execution, reported as an error of the result.
    pub async fn execute(&self, parameters: Parameters, context: ExecutionContext) -> ExecutionResult {
        let request = parameters.into_request();
        let execution = self.executor.execute(request, &context);

        let response = match context.deadline() {
            Some(deadline) => match tokio::time::timeout_at(deadline, execution).await {
                Ok(response) => response,
                Err(_) => {
                    tracing::warn!("admin request timed out");
                    async_graphql::Response::from_errors(vec![ServerError::new("Request timed out", None)])
                }
            },
            None => execution.await,
        };

        ExecutionResult::from(response)
    }
}
