//! Error types for the analysis API client.

use thiserror::Error;

/// Errors that can occur while querying a remote analysis API.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The request could not be sent or no response arrived.
    #[error("Failed to reach analysis API at {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a non-success status other than 404.
    #[error("API request failed with status {status}")]
    Status { status: u16 },

    /// The response body was not the expected JSON.
    #[error("Failed to parse analysis API response: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Type alias for Result with ClientError.
pub type ClientResult<T> = Result<T, ClientError>;
