//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Expected pages are compared as decoded values,
//! not raw strings, to avoid false negatives from field ordering.

use moviedb_core::{
    ApiError, Category, ClientConfig, ErrorKind, HttpMethod, HttpResponse, MovieApi, MovieListPage,
};

const BASE_URL: &str = "http://localhost:3000";

fn api() -> MovieApi {
    MovieApi::new(
        ClientConfig::new(BASE_URL, "3", &format!("{BASE_URL}/t/p/w500")).with_api_key("vector-key"),
    )
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        other => panic!("unknown method: {other}"),
    }
}

fn parse_kind(s: &str) -> ErrorKind {
    match s {
        "MissingCredential" => ErrorKind::MissingCredential,
        "Transport" => ErrorKind::Transport,
        "HttpStatus" => ErrorKind::HttpStatus,
        "NoData" => ErrorKind::NoData,
        "Corrupted" => ErrorKind::Corrupted,
        "KeyNotFound" => ErrorKind::KeyNotFound,
        "TypeMismatch" => ErrorKind::TypeMismatch,
        "ValueNotFound" => ErrorKind::ValueNotFound,
        "Unknown" => ErrorKind::Unknown,
        other => panic!("unknown error kind: {other}"),
    }
}

fn check_expected_error(name: &str, err: &ApiError, expected: &serde_json::Value) {
    assert_eq!(err.kind(), parse_kind(expected["kind"].as_str().unwrap()), "{name}: kind");

    if let Some(path) = expected.get("path") {
        let actual = match err {
            ApiError::Decode(decode) => decode.path().map(|p| p.to_string()),
            _ => None,
        };
        assert_eq!(actual.as_deref(), path.as_str(), "{name}: path");
    }
    if let Some(status) = expected.get("status") {
        assert_eq!(err.status().map(u64::from), status.as_u64(), "{name}: status");
    }
    if let Some(page) = expected.get("decoded_page") {
        let expected_page: MovieListPage = serde_json::from_value(page.clone()).unwrap();
        assert_eq!(err.decoded_page(), Some(&expected_page), "{name}: decoded page");
    }
}

// ---------------------------------------------------------------------------
// Movie lists
// ---------------------------------------------------------------------------

#[test]
fn movie_list_test_vectors() {
    let raw = include_str!("../../test-vectors/movie_list.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let api = api();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let category: Category = case["category"].as_str().unwrap().parse().unwrap();
        let expected_req = &case["expected_request"];

        // Verify build
        let req = api.build_movie_list(category).unwrap();
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: url");
        assert!(req.headers.is_empty(), "{name}: headers");

        // Verify parse
        let sim = &case["simulated_response"];
        let response = HttpResponse::new(
            sim["status"].as_u64().unwrap() as u16,
            sim["body"].as_str().unwrap(),
        );
        let result = api.parse_movie_list(&response);

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            check_expected_error(name, &err, expected_error);
        } else {
            let parsed = result.unwrap();
            let expected: MovieListPage = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(parsed.page, expected, "{name}: parsed result");
            assert_eq!(parsed.status, response.status, "{name}: status");
        }
    }
}

// ---------------------------------------------------------------------------
// Poster images
// ---------------------------------------------------------------------------

#[test]
fn poster_image_test_vectors() {
    let raw = include_str!("../../test-vectors/poster_image.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let api = api();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let poster_path = case["poster_path"].as_str().unwrap();
        let expected_req = &case["expected_request"];

        // Verify build
        let req = api.build_poster_image(poster_path).unwrap();
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: url");

        // Verify parse
        let sim = &case["simulated_response"];
        let body = hex::decode(sim["body_hex"].as_str().unwrap()).unwrap();
        let response = HttpResponse::new(sim["status"].as_u64().unwrap() as u16, body);
        let result = api.parse_poster_image(poster_path, response);

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            check_expected_error(name, &err, expected_error);
        } else {
            let image = result.unwrap();
            let expected = hex::decode(case["expected_result"]["body_hex"].as_str().unwrap()).unwrap();
            assert_eq!(image.bytes, expected, "{name}: bytes");
            assert_eq!(image.poster_path, poster_path, "{name}: poster path");
        }
    }
}

#[test]
fn build_without_key_is_missing_credential_for_every_category() {
    let api = MovieApi::new(ClientConfig::new(BASE_URL, "3", BASE_URL));
    for category in Category::ALL {
        let err = api.build_movie_list(category).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingCredential, "{category}");
    }
}
