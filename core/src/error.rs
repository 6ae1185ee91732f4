//! Error types for the movie API client.
//!
//! # Design
//! Failures are split by where they happen: before any I/O
//! (`MissingCredential`, `InvalidPosterPath`), in the transport, in status
//! validation, or in decoding. `HttpStatus` keeps the decoded page when the
//! body still decoded, so a caller can decide whether an error-status payload
//! is worth showing. `kind()` flattens everything to one discriminant for
//! callers that only branch on the category of failure.

use thiserror::Error;

use crate::decode::DecodeError;
use crate::types::MovieListPage;

/// The network round-trip could not complete.
///
/// Covers connection, DNS, TLS, timeout and malformed-URL failures. A
/// response with an error status is not a transport error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("request to {url} failed: {cause}")]
pub struct TransportError {
    pub url: String,
    pub cause: String,
}

/// Errors returned by `MovieApi` and `MovieClient`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No API key was configured when a request URL was built.
    #[error("no API key configured")]
    MissingCredential,

    /// The poster path was empty.
    #[error("invalid poster path: {0:?}")]
    InvalidPosterPath(String),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server answered outside 200..=299. `page` holds the body if it
    /// still decoded.
    #[error("request returned HTTP status code {status}")]
    HttpStatus {
        status: u16,
        page: Option<Box<MovieListPage>>,
    },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("request was cancelled")]
    Cancelled,
}

/// Category of an `ApiError`, one per failure kind callers distinguish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MissingCredential,
    InvalidInput,
    Transport,
    HttpStatus,
    NoData,
    Corrupted,
    KeyNotFound,
    TypeMismatch,
    ValueNotFound,
    Unknown,
    Cancelled,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::MissingCredential => ErrorKind::MissingCredential,
            ApiError::InvalidPosterPath(_) => ErrorKind::InvalidInput,
            ApiError::Transport(_) => ErrorKind::Transport,
            ApiError::HttpStatus { .. } => ErrorKind::HttpStatus,
            ApiError::Decode(err) => match err {
                DecodeError::NoData => ErrorKind::NoData,
                DecodeError::Corrupted { .. } => ErrorKind::Corrupted,
                DecodeError::KeyNotFound { .. } => ErrorKind::KeyNotFound,
                DecodeError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
                DecodeError::ValueNotFound { .. } => ErrorKind::ValueNotFound,
                DecodeError::Unknown { .. } => ErrorKind::Unknown,
            },
            ApiError::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// HTTP status the failure came with, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The page decoded from an error-status response, if decoding succeeded.
    pub fn decoded_page(&self) -> Option<&MovieListPage> {
        match self {
            ApiError::HttpStatus { page, .. } => page.as_deref(),
            _ => None,
        }
    }

    /// Consume the error and take the decoded page out of it.
    pub fn into_decoded_page(self) -> Option<MovieListPage> {
        match self {
            ApiError::HttpStatus { page, .. } => page.map(|p| *p),
            _ => None,
        }
    }
}
