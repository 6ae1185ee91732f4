//! End-to-end tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives `MovieClient` with the
//! real `UreqTransport` over HTTP. Validates that request building, status
//! handling and decoding work with actual responses.

use std::net::SocketAddr;
use std::time::Duration;

use mock_server::{Fixture, MockState, DEFAULT_API_KEY};
use moviedb_core::{
    ApiError, Category, ClientConfig, ErrorKind, MovieClient, PageCache, UreqTransport,
};

/// Serve `state` on a random local port from a dedicated runtime thread.
fn start_server(state: MockState) -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run_with_state(listener, state).await
        })
        .unwrap();
    });

    addr
}

fn config(addr: SocketAddr) -> ClientConfig {
    ClientConfig::new(
        &format!("http://{addr}"),
        "3",
        &format!("http://{addr}/t/p/w500"),
    )
    .with_timeout(Duration::from_secs(5))
}

fn client(config: ClientConfig) -> MovieClient<UreqTransport> {
    let transport = UreqTransport::new(config.request_timeout());
    MovieClient::new(config, transport)
}

#[tokio::test]
async fn fetches_every_category_and_its_posters() {
    let addr = start_server(MockState::default());
    let client = client(config(addr).with_api_key(DEFAULT_API_KEY));

    let mut cache = PageCache::new();
    let failures = client.refresh_all(&mut cache).await;
    assert!(failures.is_empty(), "{failures:?}");
    assert_eq!(cache.len(), 4);

    for category in Category::ALL {
        let entries = cache.entries_for_display(category);
        assert_eq!(entries.len(), 3, "{category}");
        assert!(entries[2].poster_path.is_none());

        let path = entries[0].poster_path.as_deref().unwrap();
        let image = client.fetch_poster_image(path).await.unwrap();
        assert_eq!(image.status, 200);
        assert_eq!(image.content_type.as_deref(), Some("image/jpeg"));
        assert_eq!(&image.bytes[..3], &[0xFF, 0xD8, 0xFF]);
    }
}

#[tokio::test]
async fn missing_key_never_reaches_the_server() {
    let state = MockState::default();
    let addr = start_server(state.clone());
    let client = client(config(addr));

    let err = client.fetch_movie_list(Category::Popular).await.unwrap_err();
    assert_eq!(err, ApiError::MissingCredential);
    assert_eq!(state.hits(), 0);
}

#[tokio::test]
async fn wrong_key_is_http_status_401_with_decoded_error_page() {
    let addr = start_server(MockState::default());
    let client = client(config(addr).with_api_key("wrong"));

    let err = client.fetch_movie_list(Category::TopRated).await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert!(err.decoded_page().is_some());
}

#[tokio::test]
async fn service_unavailable_keeps_decoded_page() {
    let state = MockState::default();
    state
        .set_fixture(
            "now_playing",
            Fixture::Raw {
                status: 503,
                body: r#"{"page":1,"total_results":1,"total_pages":1,"results":[{"title":"Cached"}]}"#
                    .to_string(),
            },
        )
        .await;
    let addr = start_server(state);
    let client = client(config(addr).with_api_key(DEFAULT_API_KEY));

    let err = client.fetch_movie_list(Category::NowPlaying).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::HttpStatus);
    assert_eq!(err.status(), Some(503));
    let page = err.into_decoded_page().unwrap();
    assert_eq!(page.entries()[0].title.as_deref(), Some("Cached"));
}

#[tokio::test]
async fn malformed_body_is_classified() {
    let state = MockState::default();
    state
        .set_fixture(
            "popular",
            Fixture::Raw {
                status: 200,
                body: r#"{"results": "not-an-array"}"#.to_string(),
            },
        )
        .await;
    state
        .set_fixture(
            "upcoming",
            Fixture::Raw {
                status: 200,
                body: String::new(),
            },
        )
        .await;
    let addr = start_server(state);
    let client = client(config(addr).with_api_key(DEFAULT_API_KEY));

    let err = client.fetch_movie_list(Category::Popular).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);

    let err = client.fetch_movie_list(Category::Upcoming).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoData);
}

#[tokio::test]
async fn missing_poster_is_returned_as_received() {
    let addr = start_server(MockState::default());
    let client = client(config(addr));

    // The 404 has an empty body.
    let err = client.fetch_poster_image("/missing.jpg").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoData);
}

#[tokio::test]
async fn closed_port_is_transport_error() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let client = client(config(addr).with_api_key(DEFAULT_API_KEY));

    let err = client.fetch_movie_list(Category::Popular).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(!err.to_string().contains(DEFAULT_API_KEY));
}
