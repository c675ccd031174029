use async_graphql::Object;

#[derive(Debug, Default)]
pub struct ServiceQuery;

#[Object]
impl ServiceQuery {
    /// Always true, useful to check the admin endpoint is reachable.
    async fn ping(&self) -> bool {
        true
    }

    /// Version of the running gateway.
    async fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }
}
