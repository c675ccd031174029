/// The admin server error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configured routes cannot be served
    #[error("invalid route configuration: {0}")]
    InvalidRoute(String),
    /// The CORS settings are rejected by the browser rules
    #[error("invalid CORS configuration: {0}")]
    InvalidCors(&'static str),
    /// Cannot find the certificate or key file
    #[error("reading certificate files: {0}")]
    CertificateError(#[source] std::io::Error),
    /// Cannot start the HTTP server
    #[error("starting server: {0}")]
    Server(#[source] std::io::Error),
}
