use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;
use tracing::Subscriber;
use tracing_subscriber::{registry::LookupSpan, Layer};

mod log;

pub(crate) use log::{LogLevel, LogStyle};

pub(crate) const DEFAULT_CONFIG_PATH: &str = "./admin.toml";

pub(crate) type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

#[derive(Debug, Parser)]
#[command(name = "The Admin Gateway", version)]
/// The Admin Gateway
pub(crate) struct Args {
    /// IP address on which the server will listen for incoming connections. Defaults to 127.0.0.1:5000.
    #[arg(short, long)]
    pub listen_address: Option<SocketAddr>,
    /// Path to the TOML configuration file
    #[arg(long, short, env = "ADMIN_CONFIG_PATH", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,
    /// Set the logging level
    #[arg(long = "log", env = "ADMIN_LOG")]
    pub log_level: Option<LogLevel>,
    /// Set the style of log output
    #[arg(long, env = "ADMIN_LOG_STYLE", default_value_t = LogStyle::Text)]
    pub log_style: LogStyle,
}

impl Args {
    pub fn log_format<S>(&self) -> BoxedLayer<S>
    where
        S: Subscriber + for<'span> LookupSpan<'span> + Send + Sync,
    {
        let layer = tracing_subscriber::fmt::layer();

        match self.log_style {
            // for interactive terminals we provide colored output
            LogStyle::Text if atty::is(atty::Stream::Stdout) => layer.with_ansi(true).boxed(),
            // for server logs, colors are off
            LogStyle::Text => layer.with_ansi(false).boxed(),
            LogStyle::Json => layer.json().boxed(),
        }
    }
}

pub(crate) fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use clap::CommandFactory;

    use super::*;

    #[test]
    fn verify_cli() {
        Args::command().debug_assert();
    }

    #[test]
    fn all_flags() {
        let args = Args::try_parse_from([
            "admin-gateway",
            "--listen-address",
            "0.0.0.0:4000",
            "--config",
            "/etc/admin.toml",
            "--log",
            "debug",
            "--log-style",
            "json",
        ])
        .unwrap();

        assert_eq!(Some(SocketAddr::from(([0, 0, 0, 0], 4000))), args.listen_address);
        assert_eq!(Path::new("/etc/admin.toml"), args.config);
        assert_eq!(Some(LogLevel::Debug), args.log_level);
        assert_eq!(LogStyle::Json, args.log_style);
    }

    #[test]
    fn short_flags() {
        let args = Args::try_parse_from(["admin-gateway", "-l", "[::1]:4000", "-c", "custom.toml"]).unwrap();

        assert_eq!(Some("[::1]:4000".parse().unwrap()), args.listen_address);
        assert_eq!(Path::new("custom.toml"), args.config);
    }

    #[test]
    fn invalid_log_level() {
        let result = Args::try_parse_from(["admin-gateway", "--log", "loud"]);

        assert!(result.is_err());
    }
}
