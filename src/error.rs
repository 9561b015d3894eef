use reqwest::StatusCode;
use thiserror::Error;

/// Failures surfaced by the remote store, the geocoder and the feed loader.
///
/// Every variant ends up as a plain-text status message; none of them is
/// fatal to the running interface.
#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success HTTP status. `message` is the server's `error` field when
    /// the body carried one, otherwise a fixed description of the operation.
    #[error("{message}")]
    Status { status: StatusCode, message: String },

    #[error("Invalid location. Try another city/province.")]
    LocationNotFound,

    #[error("Location service error. Try again.")]
    LocationService(#[source] Box<AtlasError>),

    #[error("{0}")]
    Validation(String),

    #[error("Invalid response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl AtlasError {
    pub fn status(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// True when the failure happened before anything reached the remote store.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::LocationNotFound | Self::LocationService(_) | Self::Validation(_) | Self::Io(_)
        )
    }
}

pub type AtlasResult<T> = Result<T, AtlasError>;
