//! C-ABI wrapper around `moviedb-core`.
//!
//! # Overview
//! Exposes the movie API's request building and response parsing through
//! `extern "C"` functions so a native UI (Swift, Objective-C, anything with a
//! C FFI) performs the HTTP round-trip itself and hands the bytes back for
//! validation and decoding.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - `moviedb_build_*` / `moviedb_parse_*` mirror `MovieApi` 1:1.
//! - A single `FfiMovieResult` envelope with `FfiDataTag` + `void* data`
//!   conveys success payloads and errors uniformly.
//! - The C caller owns all returned pointers and must call the matching
//!   `moviedb_free_*` function to release them.
//! - `moviedb_client_set_api_key` must not race with other calls on the same
//!   client; set the key once after creation.

pub mod types;

use std::ffi::CStr;
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use moviedb_core::{ClientConfig, HttpResponse, MovieApi};

use types::*;

/// Read a C string argument. Null or invalid UTF-8 yields `None`.
fn read_str<'a>(s: *const c_char) -> Option<&'a str> {
    if s.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(s) }.to_str().ok()
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a client for the given API and image base URLs.
///
/// Returns null if any argument is null or if an internal panic occurs.
/// The client has no API key until `moviedb_client_set_api_key` is called.
/// The caller must free the returned pointer with `moviedb_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn moviedb_client_new(
    api_base_url: *const c_char,
    api_version: *const c_char,
    image_base_url: *const c_char,
) -> *mut FfiMovieClient {
    catch_unwind(|| {
        let (Some(base), Some(version), Some(images)) =
            (read_str(api_base_url), read_str(api_version), read_str(image_base_url))
        else {
            return std::ptr::null_mut();
        };
        let api = MovieApi::new(ClientConfig::new(base, version, images));
        Box::into_raw(Box::new(FfiMovieClient { inner: api }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Set the API key used by every subsequent movie list request.
///
/// Returns false if `client` or `api_key` is null.
#[unsafe(no_mangle)]
pub extern "C" fn moviedb_client_set_api_key(client: *mut FfiMovieClient, api_key: *const c_char) -> bool {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return false;
        }
        let Some(key) = read_str(api_key) else {
            return false;
        };
        let client = unsafe { &mut *client };
        let config = client.inner.config().clone().with_api_key(key);
        client.inner = MovieApi::new(config);
        true
    }))
    .unwrap_or(false)
}

/// True when the client has a non-empty API key.
#[unsafe(no_mangle)]
pub extern "C" fn moviedb_client_has_api_key(client: *const FfiMovieClient) -> bool {
    catch_unwind(|| {
        if client.is_null() {
            return false;
        }
        unsafe { &*client }.inner.config().has_api_key()
    })
    .unwrap_or(false)
}

/// Free a client created by `moviedb_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn moviedb_client_free(client: *mut FfiMovieClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

/// Build the request for the first page of a category (`FfiCategory` value).
///
/// Returns null if `client` is null, the category is unknown, or no API key
/// is set. The caller must free the returned pointer with
/// `moviedb_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn moviedb_build_movie_list(client: *const FfiMovieClient, category: u32) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let Some(category) = FfiCategory::from_raw(category) else {
            return std::ptr::null_mut();
        };
        match client.inner.build_movie_list(category) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build the request for a poster image.
///
/// Returns null if `client` or `poster_path` is null, or the path is empty.
#[unsafe(no_mangle)]
pub extern "C" fn moviedb_build_poster_image(
    client: *const FfiMovieClient,
    poster_path: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let Some(path) = read_str(poster_path) else {
            return std::ptr::null_mut();
        };
        match client.inner.build_poster_image(path) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Parse response functions
// ---------------------------------------------------------------------------

/// Copy an `FfiHttpResponse` into a core `HttpResponse`.
fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    let body = if resp.body.is_null() || resp.body_len == 0 {
        Vec::new()
    } else {
        unsafe { std::slice::from_raw_parts(resp.body, resp.body_len) }.to_vec()
    };
    let mut core = HttpResponse::new(resp.status, body);
    if let Some(content_type) = read_str(resp.content_type) {
        core.headers
            .push(("Content-Type".to_string(), content_type.to_string()));
    }
    core
}

/// Parse the response to a movie list request.
///
/// Returns a result with `data_tag = MovieListPage` on success. An
/// `HttpStatus` error also carries the page when the body decoded.
#[unsafe(no_mangle)]
pub extern "C" fn moviedb_parse_movie_list(
    client: *const FfiMovieClient,
    response: *const FfiHttpResponse,
) -> *mut FfiMovieResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiMovieResult::null_arg("client");
        }
        if response.is_null() {
            return FfiMovieResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let core_resp = ffi_response_to_core(unsafe { &*response });
        match client.inner.parse_movie_list(&core_resp) {
            Ok(parsed) => FfiMovieResult::ok_page(&parsed.page, parsed.status),
            Err(e) => FfiMovieResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiMovieResult::panic("panic in moviedb_parse_movie_list"))
}

/// Parse the response to a poster image request.
///
/// Returns a result with `data_tag = PosterImage` on success.
#[unsafe(no_mangle)]
pub extern "C" fn moviedb_parse_poster_image(
    client: *const FfiMovieClient,
    poster_path: *const c_char,
    response: *const FfiHttpResponse,
) -> *mut FfiMovieResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiMovieResult::null_arg("client");
        }
        let Some(path) = read_str(poster_path) else {
            return FfiMovieResult::null_arg("poster_path");
        };
        if response.is_null() {
            return FfiMovieResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let core_resp = ffi_response_to_core(unsafe { &*response });
        match client.inner.parse_poster_image(path, core_resp) {
            Ok(image) => FfiMovieResult::ok_poster(image),
            Err(e) => FfiMovieResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiMovieResult::panic("panic in moviedb_parse_poster_image"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by any `moviedb_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn moviedb_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        free_c_string(req.url);
    });
}

/// Free an `FfiMovieResult` returned by any `moviedb_parse_*` function.
/// Safe to call with null. Uses `data_tag` to determine what `data` points to.
#[unsafe(no_mangle)]
pub extern "C" fn moviedb_free_result(result: *mut FfiMovieResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        free_c_string(result.error_message);
        free_c_string(result.error_path);
        if result.data.is_null() {
            return;
        }
        match result.data_tag {
            FfiDataTag::MovieListPage => {
                let page = unsafe { Box::from_raw(result.data as *mut FfiMovieListPage) };
                if let Some(entries) = reclaim_slice(page.results, page.results_len) {
                    for entry in entries.iter() {
                        entry.free_fields();
                    }
                }
            }
            FfiDataTag::PosterImage => {
                let image = unsafe { Box::from_raw(result.data as *mut FfiPosterImage) };
                drop(reclaim_slice(image.bytes, image.len));
                free_c_string(image.content_type);
            }
            FfiDataTag::None => {}
        }
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn moviedb_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| free_c_string(s));
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
