//! Error types shared by the Supabase client.

use reqwest::StatusCode;
use thiserror::Error;

use crate::dao::storage::StorageError;

/// Convenient result alias returning [`SupabaseError`] failures.
pub type SupabaseResult<T> = Result<T, SupabaseError>;

/// Failures that can occur while interacting with Supabase.
#[derive(Debug, Error)]
pub enum SupabaseError {
    /// Required environment variable is missing.
    #[error("missing Supabase environment variable `{var}`")]
    MissingEnvVar { var: &'static str },
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build Supabase client")]
    ClientBuilder {
        #[source]
        source: reqwest::Error,
    },
    /// A request could not be sent.
    #[error("failed to send Supabase request to `{path}`")]
    RequestSend {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    /// Supabase answered with an unexpected status code.
    #[error("unexpected Supabase response status {status} for `{path}`")]
    RequestStatus { path: String, status: StatusCode },
    /// Response payload could not be parsed into JSON.
    #[error("failed to decode Supabase response for `{path}`")]
    DecodeResponse {
        path: String,
        #[source]
        source: reqwest::Error,
    },
}

impl From<SupabaseError> for StorageError {
    fn from(err: SupabaseError) -> Self {
        match err {
            SupabaseError::DecodeResponse { .. } => {
                StorageError::corrupt("unreadable Supabase payload".into(), err)
            }
            other => StorageError::unavailable("Supabase request failed".into(), other),
        }
    }
}
