/// Core error type for the relay.
///
/// Adapter crates map their specific errors into this type. Submission
/// failures never surface as errors; they are folded into the pipeline outcome.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;
