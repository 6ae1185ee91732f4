use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;

pub const DEFAULT_API_KEY: &str = "test-key";

/// The four list routes served under `/3/movie/`.
pub const LISTS: [&str; 4] = ["top_rated", "now_playing", "popular", "upcoming"];

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    pub overview: String,
    pub vote_average: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MoviePage {
    pub page: u32,
    pub total_results: u64,
    pub total_pages: u32,
    pub results: Vec<Movie>,
}

/// Error body the real API sends with 401 and 404 responses.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ApiErrorBody {
    pub status_code: u32,
    pub status_message: String,
    pub success: bool,
}

/// What a list route answers with.
#[derive(Clone, Debug)]
pub enum Fixture {
    Page(MoviePage),
    /// Sent verbatim, for status and malformed-body scenarios.
    Raw { status: u16, body: String },
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub api_key: Option<String>,
    pub language: Option<String>,
    pub page: Option<u32>,
}

/// Shared server state: accepted key, fixtures, and a request counter.
#[derive(Clone)]
pub struct MockState {
    api_key: Arc<str>,
    lists: Arc<RwLock<HashMap<String, Fixture>>>,
    posters: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    hits: Arc<AtomicUsize>,
}

impl MockState {
    /// State preloaded with sample pages for every list and their posters.
    pub fn new(api_key: &str) -> Self {
        let mut lists = HashMap::new();
        let mut posters = HashMap::new();
        for (i, list) in LISTS.iter().enumerate() {
            let page = sample_page(list, i as u64);
            for movie in &page.results {
                if let Some(path) = &movie.poster_path {
                    posters.insert(path.trim_start_matches('/').to_string(), fake_jpeg(path));
                }
            }
            lists.insert(list.to_string(), Fixture::Page(page));
        }
        Self {
            api_key: Arc::from(api_key),
            lists: Arc::new(RwLock::new(lists)),
            posters: Arc::new(RwLock::new(posters)),
            hits: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub async fn set_fixture(&self, list: &str, fixture: Fixture) {
        self.lists.write().await.insert(list.to_string(), fixture);
    }

    pub async fn set_poster(&self, file: &str, bytes: Vec<u8>) {
        self.posters.write().await.insert(file.to_string(), bytes);
    }

    /// Number of requests served so far, on any route.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

impl Default for MockState {
    fn default() -> Self {
        Self::new(DEFAULT_API_KEY)
    }
}

pub fn app() -> Router {
    app_with_state(MockState::default())
}

pub fn app_with_state(state: MockState) -> Router {
    Router::new()
        .route("/3/movie/{list}", get(movie_list))
        .route("/t/p/w500/{file}", get(poster))
        .with_state(state)
}

pub async fn run_with_state(listener: TcpListener, state: MockState) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(state)).await
}

fn error_body(status: StatusCode, status_code: u32, message: &str) -> Response {
    let body = ApiErrorBody {
        status_code,
        status_message: message.to_string(),
        success: false,
    };
    (status, Json(body)).into_response()
}

async fn movie_list(
    State(state): State<MockState>,
    Path(list): Path<String>,
    Query(query): Query<ListQuery>,
) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    debug!(list = %list, language = ?query.language, page = ?query.page, "movie list request");

    if query.api_key.as_deref() != Some(&*state.api_key) {
        return error_body(
            StatusCode::UNAUTHORIZED,
            7,
            "Invalid API key: You must be granted a valid key.",
        );
    }

    let lists = state.lists.read().await;
    match lists.get(&list) {
        Some(Fixture::Page(page)) => Json(page.clone()).into_response(),
        Some(Fixture::Raw { status, body }) => {
            let status = StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, [(header::CONTENT_TYPE, "application/json")], body.clone()).into_response()
        }
        None => error_body(
            StatusCode::NOT_FOUND,
            34,
            "The resource you requested could not be found.",
        ),
    }
}

async fn poster(State(state): State<MockState>, Path(file): Path<String>) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    debug!(file = %file, "poster request");

    match state.posters.read().await.get(&file) {
        Some(bytes) => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "image/jpeg")
            .body(Body::from(bytes.clone()))
            .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response()),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

fn sample_page(list: &str, seed: u64) -> MoviePage {
    let results: Vec<Movie> = (1..=3)
        .map(|n| {
            let id = seed * 100 + n;
            Movie {
                id,
                title: format!("{} movie {n}", list.replace('_', " ")),
                // The last movie on every list has no poster.
                poster_path: (n < 3).then(|| format!("/{list}_{n}.jpg")),
                overview: format!("Overview of {list} movie {n}."),
                vote_average: 6.0 + n as f64 / 2.0,
            }
        })
        .collect();
    MoviePage {
        page: 1,
        total_results: results.len() as u64,
        total_pages: 1,
        results,
    }
}

/// Bytes with a JPEG start-of-image marker followed by the poster path.
fn fake_jpeg(path: &str) -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE0];
    bytes.extend_from_slice(path.as_bytes());
    bytes.extend_from_slice(&[0xFF, 0xD9]);
    bytes
}
