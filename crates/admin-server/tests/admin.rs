use std::time::Duration;

use admin_config::Config;
use admin_schema::{User, UserStore};
use admin_server::{Engine, ExecutionContext, Executor};
use axum::body::Body;
use http::{header::CONTENT_TYPE, StatusCode};
use http_body_util::BodyExt;
use indoc::indoc;
use serde_json::json;
use tower::ServiceExt;

struct TestAdmin {
    router: axum::Router,
}

struct TestResponse {
    status: StatusCode,
    content_type: Option<String>,
    body: serde_json::Value,
}

impl TestAdmin {
    fn new(config: &str) -> Self {
        Self::with_store(config, UserStore::default())
    }

    fn with_store(config: &str, store: UserStore) -> Self {
        let config: Config = toml::from_str(config).unwrap();
        let schema = admin_schema::build(&config, store);

        Self::with_engine(&config, Engine::new(schema))
    }

    fn with_engine(config: &Config, engine: Engine) -> Self {
        let router = admin_server::create_router(config, engine).unwrap();

        Self { router }
    }

    async fn post(&self, body: serde_json::Value) -> TestResponse {
        let request = http::Request::post("/admin")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        self.send(request).await
    }

    async fn get(&self, query_string: &str) -> TestResponse {
        let request = http::Request::get(format!("/admin?{query_string}"))
            .body(Body::empty())
            .unwrap();

        self.send(request).await
    }

    async fn send_raw(&self, request: http::Request<Body>) -> axum::response::Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn send(&self, request: http::Request<Body>) -> TestResponse {
        let response = self.send_raw(request).await;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .map(|value| value.to_str().unwrap().to_string());
        let bytes = response.into_body().collect().await.unwrap().to_bytes();

        TestResponse {
            status,
            content_type,
            body: serde_json::from_slice(&bytes).unwrap(),
        }
    }
}

impl TestResponse {
    fn errors(&self) -> &[serde_json::Value] {
        self.body["errors"].as_array().map(Vec::as_slice).unwrap_or_default()
    }
}

#[tokio::test]
async fn typename() {
    let admin = TestAdmin::new("");

    let response = admin.post(json!({ "query": "{ __typename }" })).await;

    assert_eq!(StatusCode::OK, response.status);
    assert_eq!(Some("application/json"), response.content_type.as_deref());

    insta::assert_json_snapshot!(response.body, @r#"
    {
      "data": {
        "__typename": "Query"
      },
      "errors": []
    }
    "#);
}

#[tokio::test]
async fn unknown_field() {
    let admin = TestAdmin::new("");

    let response = admin.post(json!({ "query": "{ invalidField }" })).await;

    assert_eq!(StatusCode::BAD_REQUEST, response.status);
    assert_eq!(json!(null), response.body["data"]);
    assert_eq!(1, response.errors().len());

    let message = response.errors()[0]["message"].as_str().unwrap();
    assert!(message.contains("\"invalidField\""), "{message}");
}

#[tokio::test]
async fn empty_query() {
    let admin = TestAdmin::new("");

    let response = admin.post(json!({ "query": "" })).await;

    assert_eq!(StatusCode::BAD_REQUEST, response.status);
    assert_eq!(json!(null), response.body["data"]);
    assert!(!response.errors().is_empty());
}

#[tokio::test]
async fn get_request() {
    let admin = TestAdmin::new("");

    let response = admin.get("query=%7B%20ping%20%7D").await;

    assert_eq!(StatusCode::OK, response.status);

    insta::assert_json_snapshot!(response.body, @r#"
    {
      "data": {
        "ping": true
      },
      "errors": []
    }
    "#);
}

#[tokio::test]
async fn get_request_with_variables_and_operation_name() {
    let store = UserStore::with_users([User {
        username: "amy".into(),
        enabled: true,
        plan: Some("premium".into()),
    }]);
    let admin = TestAdmin::with_store("", store);

    let query = "query Ping { ping } query Find($u: String!) { user(username: $u) { username plan } }";
    let query_string = format!(
        "query={}&variables={}&operationName=Find",
        urlencode(query),
        urlencode(r#"{"u":"amy"}"#)
    );

    let response = admin.get(&query_string).await;

    assert_eq!(StatusCode::OK, response.status);

    insta::assert_json_snapshot!(response.body, @r#"
    {
      "data": {
        "user": {
          "username": "amy",
          "plan": "premium"
        }
      },
      "errors": []
    }
    "#);
}

#[tokio::test]
async fn mutation_then_query() {
    let admin = TestAdmin::new("");

    let mutation = indoc! {r#"
        mutation Create($input: UserInput!) {
          createOrUpdateUser(input: $input) {
            username
            enabled
          }
        }
    "#};

    let response = admin
        .post(json!({
            "query": mutation,
            "variables": { "input": { "username": "bob", "enabled": false } },
            "operationName": "Create"
        }))
        .await;

    assert_eq!(StatusCode::OK, response.status);

    let response = admin.post(json!({ "query": "{ users { username enabled plan } }" })).await;

    insta::assert_json_snapshot!(response.body, @r#"
    {
      "data": {
        "users": [
          {
            "username": "bob",
            "enabled": false,
            "plan": null
          }
        ]
      },
      "errors": []
    }
    "#);
}

#[tokio::test]
async fn resolver_error() {
    let admin = TestAdmin::new("");

    let response = admin
        .post(json!({
            "query": r#"mutation { createOrUpdateUser(input: { username: "" }) { username } }"#
        }))
        .await;

    assert_eq!(StatusCode::BAD_REQUEST, response.status);
    assert_eq!(json!("username must not be empty"), response.errors()[0]["message"]);
    assert_eq!(json!(["createOrUpdateUser"]), response.errors()[0]["path"]);
}

#[tokio::test]
async fn several_operations_require_a_name() {
    let admin = TestAdmin::new("");
    let query = "query A { ping } query B { version }";

    let response = admin.post(json!({ "query": query })).await;

    assert_eq!(StatusCode::BAD_REQUEST, response.status);
    assert_eq!(json!(null), response.body["data"]);
    assert_eq!(1, response.errors().len());

    let response = admin.post(json!({ "query": query, "operationName": "A" })).await;

    assert_eq!(StatusCode::OK, response.status);
    assert_eq!(json!({ "ping": true }), response.body["data"]);
}

#[tokio::test]
async fn unknown_variable_type() {
    let admin = TestAdmin::new("");

    let response = admin
        .post(json!({
            "query": "query Find($u: String!) { user(username: $u) { username } }",
            "variables": { "u": 42 }
        }))
        .await;

    assert_eq!(StatusCode::BAD_REQUEST, response.status);
    assert!(!response.errors().is_empty());
}

#[tokio::test]
async fn post_without_json_content_type() {
    let admin = TestAdmin::new("");

    let request = http::Request::post("/admin")
        .header(CONTENT_TYPE, "text/plain")
        .body(Body::from(r#"{"query":"{ ping }"}"#))
        .unwrap();

    let response = admin.send(request).await;

    assert_eq!(StatusCode::BAD_REQUEST, response.status);
    assert_eq!(Some("application/json"), response.content_type.as_deref());

    insta::assert_json_snapshot!(response.body, @r#"
    {
      "data": null,
      "errors": [
        {
          "message": "Bad request: GraphQL request is not well formed: Missing or invalid Content-Type header. You must specify 'application/json'."
        }
      ]
    }
    "#);
}

#[tokio::test]
async fn post_with_malformed_json() {
    let admin = TestAdmin::new("");

    let request = http::Request::post("/admin")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{ query"))
        .unwrap();

    let response = admin.send(request).await;

    assert_eq!(StatusCode::BAD_REQUEST, response.status);
    assert_eq!(json!(null), response.body["data"]);

    let message = response.errors()[0]["message"].as_str().unwrap();
    assert!(
        message.starts_with("Bad request: GraphQL request is not well formed: JSON deserialization failure"),
        "{message}"
    );
}

#[tokio::test]
async fn get_without_query() {
    let admin = TestAdmin::new("");

    let response = admin.get("operationName=Find").await;

    assert_eq!(StatusCode::BAD_REQUEST, response.status);

    insta::assert_json_snapshot!(response.body, @r#"
    {
      "data": null,
      "errors": [
        {
          "message": "Bad request: GraphQL request is not well formed: missing the query parameter"
        }
      ]
    }
    "#);
}

#[tokio::test]
async fn request_body_limit() {
    let admin = TestAdmin::new(r#"request_body_limit = "1KiB""#);

    let query = format!("{{ ping }}{}", " ".repeat(2048));
    let response = admin.post(json!({ "query": query })).await;

    assert_eq!(StatusCode::BAD_REQUEST, response.status);
    assert_eq!(json!(null), response.body["data"]);
    assert_eq!(1, response.errors().len());
}

#[tokio::test]
async fn repeated_requests_are_identical() {
    let admin = TestAdmin::new("");
    let request = json!({ "query": "{ ping version users { username } }" });

    let first = admin.post(request.clone()).await;
    let second = admin.post(request).await;

    assert_eq!(first.status, second.status);
    assert_eq!(first.body, second.body);
}

#[tokio::test]
async fn custom_path() {
    let config: Config = toml::from_str(indoc! {r#"
        [graph]
        path = "/internal/graphql"
    "#})
    .unwrap();

    let admin = TestAdmin::with_engine(&config, Engine::new(admin_schema::build(&config, UserStore::default())));

    let request = http::Request::get("/internal/graphql?query=%7B%20ping%20%7D")
        .body(Body::empty())
        .unwrap();

    assert_eq!(StatusCode::OK, admin.send(request).await.status);
}

#[tokio::test]
async fn health_check() {
    let admin = TestAdmin::new("");

    let request = http::Request::get("/health").body(Body::empty()).unwrap();
    let response = admin.send(request).await;

    assert_eq!(StatusCode::OK, response.status);
    assert_eq!(json!({ "status": "healthy" }), response.body);
}

#[test]
fn overlapping_routes_are_refused() {
    let config: Config = toml::from_str(indoc! {r#"
        [graph]
        path = "/health"
    "#})
    .unwrap();

    let result = admin_server::create_router(&config, Engine::new(admin_schema::build(&config, UserStore::default())));

    assert!(matches!(result, Err(admin_server::Error::InvalidRoute(_))));
}

#[test]
fn relative_path_is_refused() {
    let config: Config = toml::from_str(indoc! {r#"
        [graph]
        path = "admin"
    "#})
    .unwrap();

    let result = admin_server::create_router(&config, Engine::new(admin_schema::build(&config, UserStore::default())));

    assert!(matches!(result, Err(admin_server::Error::InvalidRoute(_))));
}

#[test]
fn wildcard_path_is_refused() {
    let config: Config = toml::from_str(indoc! {r#"
        [graph]
        path = "/admin/*"
    "#})
    .unwrap();

    let result = admin_server::create_router(&config, Engine::new(admin_schema::build(&config, UserStore::default())));

    assert!(matches!(result, Err(admin_server::Error::InvalidRoute(_))));
}

#[test]
fn health_path_with_capture_is_refused() {
    let config: Config = toml::from_str(indoc! {r#"
        [health]
        path = "/health/:probe"
    "#})
    .unwrap();

    let result = admin_server::create_router(&config, Engine::new(admin_schema::build(&config, UserStore::default())));

    assert!(matches!(result, Err(admin_server::Error::InvalidRoute(_))));
}

#[tokio::test]
async fn permissive_cors_by_default() {
    let admin = TestAdmin::new("");

    let request = http::Request::get("/admin?query=%7B%20ping%20%7D")
        .header(http::header::ORIGIN, "https://anywhere.example.com")
        .body(Body::empty())
        .unwrap();

    let response = admin.send_raw(request).await;

    assert_eq!(StatusCode::OK, response.status());
    assert_eq!("*", response.headers()[http::header::ACCESS_CONTROL_ALLOW_ORIGIN]);
}

#[tokio::test]
async fn configured_cors_preflight() {
    let admin = TestAdmin::new(indoc! {r#"
        [cors]
        allow_origins = ["https://app.example.com"]
        allow_methods = ["POST"]
    "#});

    let preflight = |origin: &str| {
        http::Request::options("/admin")
            .header(http::header::ORIGIN, origin)
            .header(http::header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap()
    };

    let response = admin.send_raw(preflight("https://app.example.com")).await;

    assert_eq!(StatusCode::OK, response.status());
    assert_eq!("https://app.example.com", response.headers()[http::header::ACCESS_CONTROL_ALLOW_ORIGIN]);
    assert_eq!("POST", response.headers()[http::header::ACCESS_CONTROL_ALLOW_METHODS]);

    let response = admin.send_raw(preflight("https://evil.example.com")).await;

    assert!(response.headers().get(http::header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}

struct Stalled;

#[async_trait::async_trait]
impl Executor for Stalled {
    async fn execute(&self, _: async_graphql::Request, _: &ExecutionContext) -> async_graphql::Response {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        async_graphql::Response::new(async_graphql::Value::Null)
    }
}

#[tokio::test]
async fn execution_deadline() {
    let config: Config = toml::from_str(indoc! {r#"
        [gateway]
        timeout = "50ms"
    "#})
    .unwrap();

    let admin = TestAdmin::with_engine(&config, Engine::new(Stalled));

    let response = admin.post(json!({ "query": "{ ping }" })).await;

    assert_eq!(StatusCode::BAD_REQUEST, response.status);

    insta::assert_json_snapshot!(response.body, @r#"
    {
      "data": null,
      "errors": [
        {
          "message": "Request timed out"
        }
      ]
    }
    "#);
}

fn urlencode(value: &str) -> String {
    serde_urlencoded::to_string([("v", value)]).unwrap()[2..].to_string()
}
