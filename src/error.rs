use thiserror::Error;

/// Failures raised by a [MediaEnvironment](crate::environment::MediaEnvironment).
///
/// These are the matching facility's own failure domain and are propagated
/// uncaught: there is no transient-failure class, so nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvironmentError {
    /// No live matching facility exists in this environment.
    #[error("no live media matching facility is available")]
    NotLive,

    /// The environment could not parse the query expression.
    #[error("malformed media query expression: {0:?}")]
    Malformed(String),
}
