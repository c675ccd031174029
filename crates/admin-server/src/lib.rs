//! HTTP surface of the admin GraphQL endpoint.
//!
//! A request goes through parameter extraction, a single execution against the
//! admin schema and JSON encoding of `{ data, errors }`. The response status is
//! 400 whenever `errors` is not empty and 200 otherwise.

#![deny(missing_docs)]

mod engine;
mod error;
mod graphql_over_http;
mod router;
mod server;

pub use engine::{Engine, ExecutionContext, Executor};
pub use error::Error;
pub use graphql_over_http::{ExecutionResult, ExtractionError, Parameters};
pub use router::create as create_router;
pub use server::{serve, ServerConfig};

/// The admin server result type
pub type Result<T> = std::result::Result<T, Error>;
