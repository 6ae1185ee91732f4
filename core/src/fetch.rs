//! Asynchronous movie client: `MovieApi` driven through a `Transport`.
//!
//! Every operation is an `async fn` that completes exactly once with a
//! `Result`. Nothing is retried. Fetches share no state besides the read-only
//! configuration, so any number can be in flight at once and complete in any
//! order; results are keyed by what was requested, never by completion order.

use std::sync::Arc;

use futures::future::join_all;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cache::PageCache;
use crate::client::MovieApi;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{log_request, log_response, Transport};
use crate::types::{Category, MovieListResponse, PosterImage};

/// Async client for the movie API.
///
/// Cloning is cheap when the transport is; clones share the configuration.
#[derive(Clone)]
pub struct MovieClient<T> {
    api: Arc<MovieApi>,
    transport: T,
}

impl<T: Transport> MovieClient<T> {
    pub fn new(config: ClientConfig, transport: T) -> Self {
        Self {
            api: Arc::new(MovieApi::new(config)),
            transport,
        }
    }

    pub fn api(&self) -> &MovieApi {
        &self.api
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch the first page of `category`.
    ///
    /// A missing API key fails before the transport is called.
    pub async fn fetch_movie_list(&self, category: Category) -> Result<MovieListResponse, ApiError> {
        let request = self.api.build_movie_list(category)?;
        let response = self.round_trip(&request).await?;
        self.api.parse_movie_list(&response)
    }

    /// Fetch a poster image as raw bytes.
    pub async fn fetch_poster_image(&self, poster_path: &str) -> Result<PosterImage, ApiError> {
        let request = self.api.build_poster_image(poster_path)?;
        let response = self.round_trip(&request).await?;
        self.api.parse_poster_image(poster_path, response)
    }

    /// `fetch_movie_list`, abandoned with `Cancelled` once `cancel` fires.
    pub async fn fetch_movie_list_cancellable(
        &self,
        category: Category,
        cancel: &CancellationToken,
    ) -> Result<MovieListResponse, ApiError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(%category, "movie list request cancelled");
                Err(ApiError::Cancelled)
            }
            result = self.fetch_movie_list(category) => result,
        }
    }

    /// `fetch_poster_image`, abandoned with `Cancelled` once `cancel` fires.
    pub async fn fetch_poster_image_cancellable(
        &self,
        poster_path: &str,
        cancel: &CancellationToken,
    ) -> Result<PosterImage, ApiError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(poster_path, "poster request cancelled");
                Err(ApiError::Cancelled)
            }
            result = self.fetch_poster_image(poster_path) => result,
        }
    }

    /// Fetch several categories concurrently.
    ///
    /// Each result is paired with the category it was requested for.
    pub async fn fetch_categories(
        &self,
        categories: &[Category],
    ) -> Vec<(Category, Result<MovieListResponse, ApiError>)> {
        let fetches = categories.iter().map(|&category| async move {
            (category, self.fetch_movie_list(category).await)
        });
        join_all(fetches).await
    }

    /// Fetch every category concurrently and store each page that decoded
    /// cleanly. Failed categories keep whatever `cache` held before.
    ///
    /// Returns the failures, keyed by category.
    pub async fn refresh_all(&self, cache: &mut PageCache) -> Vec<(Category, ApiError)> {
        let mut failures = Vec::new();
        for (category, result) in self.fetch_categories(&Category::ALL).await {
            match result {
                Ok(response) => {
                    cache.insert(category, response.page);
                }
                Err(err) => failures.push((category, err)),
            }
        }
        info!(
            refreshed = Category::ALL.len() - failures.len(),
            failed = failures.len(),
            "refreshed movie lists"
        );
        failures
    }

    async fn round_trip(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        log_request(request);
        let response = self.transport.execute(request).await?;
        log_response(request, &response);
        Ok(response)
    }
}
