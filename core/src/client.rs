//! Stateless HTTP request builder and response parser for the movie API.
//!
//! # Design
//! `MovieApi` holds only its `ClientConfig` and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. The caller executes the round-trip in between, either
//! through `MovieClient` and a `Transport` or natively across the FFI.

use tracing::warn;

use crate::config::ClientConfig;
use crate::decode::{decode_movie_list_page, is_blank, DecodeError};
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{Category, MovieListResponse, PosterImage};

/// The only page the client requests.
pub const FIRST_PAGE: u32 = 1;

/// Synchronous, stateless client for the movie API.
#[derive(Debug, Clone)]
pub struct MovieApi {
    config: ClientConfig,
}

impl MovieApi {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build the request for the first page of `category`.
    ///
    /// Fails with `MissingCredential` when no API key is configured.
    pub fn build_movie_list(&self, category: Category) -> Result<HttpRequest, ApiError> {
        let url = self.config.build_url(category, FIRST_PAGE)?;
        Ok(HttpRequest::get(url))
    }

    /// Build the request for a poster image.
    pub fn build_poster_image(&self, poster_path: &str) -> Result<HttpRequest, ApiError> {
        let url = self.config.build_image_url(poster_path)?;
        Ok(HttpRequest::get(url))
    }

    /// Validate and decode a movie list response.
    ///
    /// An empty body is `NoData` regardless of status. A decode failure wins
    /// over a bad status. A bad status with a body that still decoded is
    /// reported as `HttpStatus` carrying the decoded page.
    pub fn parse_movie_list(&self, response: &HttpResponse) -> Result<MovieListResponse, ApiError> {
        if is_blank(&response.body) {
            warn!(status = response.status, "request returned no data");
            return Err(DecodeError::NoData.into());
        }

        let bad_status = !response.is_success();
        if bad_status {
            warn!(
                status = response.status,
                "request returned HTTP status code {}", response.status
            );
        }

        let page = decode_movie_list_page(&response.body)?;

        if bad_status {
            return Err(ApiError::HttpStatus {
                status: response.status,
                page: Some(Box::new(page)),
            });
        }
        Ok(MovieListResponse {
            page,
            status: response.status,
        })
    }

    /// Take a poster response body as opaque image bytes.
    ///
    /// Only the presence of a body is checked.
    pub fn parse_poster_image(
        &self,
        poster_path: &str,
        response: HttpResponse,
    ) -> Result<PosterImage, ApiError> {
        if response.body.is_empty() {
            warn!(poster_path, status = response.status, "poster request returned no data");
            return Err(DecodeError::NoData.into());
        }
        let content_type = response.header("content-type").map(str::to_string);
        Ok(PosterImage {
            poster_path: poster_path.to_string(),
            bytes: response.body,
            content_type,
            status: response.status,
        })
    }
}
