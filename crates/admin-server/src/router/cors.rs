use admin_config::{AnyOrList, CorsConfig, HttpMethod};
use http::{HeaderName, HeaderValue};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer, ExposeHeaders};
use url::Url;

/// Builds the CORS layer, refusing combinations browsers reject and
/// tower-http would panic on.
pub(super) fn generate(config: &CorsConfig) -> crate::Result<CorsLayer> {
    if config.allow_credentials {
        if matches!(config.allow_origins, Some(AnyOrList::Any)) {
            return Err(crate::Error::InvalidCors("credentials cannot be allowed for any origin"));
        }

        if matches!(config.allow_methods, Some(AnyOrList::Any)) {
            return Err(crate::Error::InvalidCors("credentials cannot be allowed for any method"));
        }

        if matches!(config.allow_headers, Some(AnyOrList::Any)) {
            return Err(crate::Error::InvalidCors("credentials cannot be allowed for any header"));
        }

        if matches!(config.expose_headers, Some(AnyOrList::Any)) {
            return Err(crate::Error::InvalidCors("credentials cannot be allowed when exposing any header"));
        }
    }

    let mut cors = CorsLayer::new()
        .allow_credentials(config.allow_credentials)
        .allow_private_network(config.allow_private_network);

    if let Some(max_age) = config.max_age {
        cors = cors.max_age(max_age);
    }

    if let Some(ref origins) = config.allow_origins {
        cors = cors.allow_origin(allow_origin(origins));
    }

    if let Some(ref methods) = config.allow_methods {
        cors = cors.allow_methods(allow_methods(methods));
    }

    if let Some(ref headers) = config.allow_headers {
        cors = cors.allow_headers(match headers {
            AnyOrList::Any => AllowHeaders::any(),
            AnyOrList::List(headers) => AllowHeaders::list(header_names(headers)),
        });
    }

    if let Some(ref headers) = config.expose_headers {
        cors = cors.expose_headers(match headers {
            AnyOrList::Any => ExposeHeaders::any(),
            AnyOrList::List(headers) => ExposeHeaders::list(header_names(headers)),
        });
    }

    Ok(cors)
}

fn allow_origin(origins: &AnyOrList<Url>) -> AllowOrigin {
    match origins {
        AnyOrList::Any => AllowOrigin::any(),
        AnyOrList::List(origins) => {
            let origins = origins
                .iter()
                .map(|url| url.as_str())
                .map(|url| url.strip_suffix('/').unwrap_or(url))
                .filter_map(|url| match HeaderValue::from_str(url) {
                    Ok(origin) => Some(origin),
                    Err(_) => {
                        tracing::warn!("ignoring the CORS origin {url}");
                        None
                    }
                });

            AllowOrigin::list(origins)
        }
    }
}

fn allow_methods(methods: &AnyOrList<HttpMethod>) -> AllowMethods {
    match methods {
        AnyOrList::Any => AllowMethods::any(),
        AnyOrList::List(methods) => AllowMethods::list(methods.iter().map(|method| match method {
            HttpMethod::Get => http::Method::GET,
            HttpMethod::Post => http::Method::POST,
            HttpMethod::Put => http::Method::PUT,
            HttpMethod::Delete => http::Method::DELETE,
            HttpMethod::Head => http::Method::HEAD,
            HttpMethod::Options => http::Method::OPTIONS,
            HttpMethod::Connect => http::Method::CONNECT,
            HttpMethod::Patch => http::Method::PATCH,
            HttpMethod::Trace => http::Method::TRACE,
        })),
    }
}

fn header_names(headers: &[ascii::AsciiString]) -> Vec<HeaderName> {
    headers
        .iter()
        .filter_map(|header| match HeaderName::from_bytes(header.as_bytes()) {
            Ok(name) => Some(name),
            Err(_) => {
                tracing::warn!("ignoring the CORS header {header}");
                None
            }
        })
        .collect()
}
