use thiserror::Error;

/// Anything that went wrong between issuing a request and decoding its
/// response. The views never tell the variants apart.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} answered with status {status}")]
    Status { endpoint: String, status: u16 },

    #[error("malformed response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Input rejected before any request is made.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please select at least one category")]
    NoCategories,

    /// The digest page words it as a sentence.
    #[error("Please select at least one category.")]
    NoDigestCategories,

    #[error("Please enter a search query")]
    EmptyQuery,

    #[error("Please enter text to summarize")]
    EmptyText,

    #[error("Please enter a number between {min} and {max}.")]
    OutOfRange { min: i64, max: i64 },
}

/// The controller loop has stopped and no longer accepts events.
#[derive(Debug, Error)]
#[error("controller is no longer running")]
pub struct ControllerClosed;
