use std::fmt;

use clap::ValueEnum;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Default, ValueEnum)]
pub(crate) enum LogLevel {
    /// No output at all
    Off,
    /// Only errors from the admin crates
    Error,
    /// Warnings and errors from the admin crates
    Warn,
    /// Info, warning and error messages from the admin crates
    #[default]
    Info,
    /// Debug, info, warning and error messages from the admin crates
    Debug,
    /// Everything, dependencies included
    Trace,
}

impl LogLevel {
    // Targets starting with `admin` cover every crate of the gateway.
    pub(crate) fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "admin=error,off",
            LogLevel::Warn => "admin=warn,off",
            LogLevel::Info => "admin=info,off",
            LogLevel::Debug => "admin=debug,off",
            LogLevel::Trace => "trace",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value_name(self, f)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub(crate) enum LogStyle {
    /// Standard text
    Text,
    /// JSON objects
    Json,
}

impl fmt::Display for LogStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value_name(self, f)
    }
}

// Displays the same name clap accepts on the command line.
fn write_value_name(value: &impl ValueEnum, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let value = value.to_possible_value().ok_or(fmt::Error)?;

    f.write_str(value.get_name())
}
