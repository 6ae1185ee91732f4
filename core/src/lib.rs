//! API client core for the movie database service.
//!
//! # Overview
//! Builds requests against the versioned REST API, runs them through a
//! pluggable `Transport`, validates status codes, decodes JSON into typed
//! pages, and classifies every failure. Poster images are fetched as raw
//! bytes.
//!
//! # Design
//! - `ClientConfig` is an explicit value passed to the client; there is no
//!   global state.
//! - `MovieApi` is the synchronous build/parse core (host-does-IO). It is
//!   what the FFI layer wraps.
//! - `MovieClient` drives `MovieApi` through a `Transport` with async
//!   functions, one completion per request.
//! - `PageCache` is the caller-side map from category to latest page.

pub mod cache;
pub mod client;
pub mod config;
pub mod decode;
pub mod error;
pub mod fetch;
pub mod http;
pub mod transport;
pub mod types;

pub use cache::PageCache;
pub use client::MovieApi;
pub use config::ClientConfig;
pub use decode::{decode_movie_list_page, DecodeError, FieldPath, PathSegment};
pub use error::{ApiError, ErrorKind, TransportError};
pub use fetch::MovieClient;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport};
pub use types::{Category, MovieEntry, MovieListPage, MovieListResponse, PosterImage};
pub use tokio_util::sync::CancellationToken;
