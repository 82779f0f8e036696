use thiserror::Error;

/// Errors raised while wiring the crate at startup.
#[derive(Error, Debug)]
pub enum InfraError {
    #[error("Configuration error: {var} is not a valid URL")]
    InvalidUrl {
        var: &'static str,
        #[source]
        source: url::ParseError,
    },

    #[error("Configuration error: {var} must not be empty")]
    EmptyValue { var: &'static str },

    #[error("Tracing subscriber could not be installed")]
    Tracing(#[source] tracing_subscriber::util::TryInitError),
}
