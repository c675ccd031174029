use std::time::Duration;

use ascii::AsciiString;
use serde::de::Error as _;
use url::Url;

/// Cross-origin rules for browsers calling the admin endpoint.
#[derive(Clone, Default, Debug, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorsConfig {
    /// Send `Access-Control-Allow-Credentials`. Incompatible with `"any"` lists.
    pub allow_credentials: bool,
    pub allow_origins: Option<AnyOrList<Url>>,
    /// How long a browser may cache the preflight answer.
    #[serde(deserialize_with = "duration_str::deserialize_option_duration")]
    pub max_age: Option<Duration>,
    pub allow_methods: Option<AnyOrList<HttpMethod>>,
    pub allow_headers: Option<AnyOrList<AsciiString>>,
    pub expose_headers: Option<AnyOrList<AsciiString>>,
    pub allow_private_network: bool,
}

/// Either the string `"any"` or an explicit list of values.
#[derive(Debug, PartialEq, Clone)]
pub enum AnyOrList<T> {
    Any,
    List(Vec<T>),
}

impl<'de, T> serde::Deserialize<'de> for AnyOrList<T>
where
    T: serde::Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Raw<T> {
            Keyword(String),
            List(Vec<T>),
        }

        match Raw::deserialize(deserializer) {
            Ok(Raw::Keyword(keyword)) if keyword == "any" => Ok(Self::Any),
            Ok(Raw::Keyword(keyword)) => Err(D::Error::custom(format!(
                "expected \"any\" or a list, found \"{keyword}\""
            ))),
            Ok(Raw::List(values)) => Ok(Self::List(values)),
            Err(_) => Err(D::Error::custom("expected \"any\" or a list of valid values")),
        }
    }
}

/// Methods are written in upper case, as on the wire.
#[derive(Debug, PartialEq, Eq, Clone, Copy, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Head,
    Options,
    Connect,
    Patch,
    Trace,
}
