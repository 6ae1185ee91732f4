//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, pointer plus length instead of `Vec`,
//! and tagged enums with explicit discriminants. Absent optional strings are
//! null pointers and absent optional integers are flagged by a `has_*` field.
//! Conversion functions
//! live here to keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::{c_void, CString};
use std::os::raw::c_char;

use moviedb_core::{ApiError, Category, ErrorKind, HttpMethod, MovieEntry, MovieListPage, PosterImage};

/// Opaque handle to a `MovieApi`. C callers receive a pointer to this and
/// pass it back into every FFI function.
pub struct FfiMovieClient {
    pub(crate) inner: moviedb_core::MovieApi,
}

/// Movie list category. Passed across the boundary as its `u32` value.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiCategory {
    TopRated = 0,
    NowPlaying = 1,
    Popular = 2,
    Upcoming = 3,
}

impl FfiCategory {
    pub(crate) fn from_raw(raw: u32) -> Option<Category> {
        match raw {
            0 => Some(Category::TopRated),
            1 => Some(Category::NowPlaying),
            2 => Some(Category::Popular),
            3 => Some(Category::Upcoming),
            _ => None,
        }
    }
}

/// Convert a Rust string into an owned C string, dropping interior NULs.
pub(crate) fn into_c_string(s: &str) -> *mut c_char {
    CString::new(s.replace('\0', ""))
        .unwrap_or_default()
        .into_raw()
}

fn optional_c_string(s: Option<&str>) -> *mut c_char {
    s.map_or(std::ptr::null_mut(), into_c_string)
}

/// Free a C string allocated by `into_c_string`. Null is ignored.
pub(crate) fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

/// Leak a vector as a raw pointer plus length. Empty vectors become null.
fn leak_slice<T>(items: Vec<T>) -> (*mut T, usize) {
    if items.is_empty() {
        return (std::ptr::null_mut(), 0);
    }
    let len = items.len();
    let ptr = Box::into_raw(items.into_boxed_slice()) as *mut T;
    (ptr, len)
}

/// Reclaim a slice leaked by `leak_slice`.
pub(crate) fn reclaim_slice<T>(ptr: *mut T, len: usize) -> Option<Box<[T]>> {
    if ptr.is_null() || len == 0 {
        return None;
    }
    Some(unsafe { Box::from_raw(std::ptr::slice_from_raw_parts_mut(ptr, len)) })
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
pub enum FfiHttpMethod {
    Get = 0,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
        }
    }
}

/// An HTTP request described as C-compatible plain data.
///
/// Built by `moviedb_build_*` functions. The C caller executes the request
/// and passes the response back through `moviedb_parse_*`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: moviedb_core::HttpRequest) -> *mut Self {
        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            url: into_c_string(&req.url),
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller constructs this after executing a request and passes a
/// pointer to a `moviedb_parse_*` function. The FFI layer copies the body and
/// never frees these fields. `body` may be null when `body_len` is zero.
/// `content_type` is the response's `Content-Type` header, or null.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const u8,
    pub body_len: usize,
    pub content_type: *const c_char,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiMovieResult`, one per failure kind.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    MissingCredential = 1,
    InvalidInput = 2,
    Transport = 3,
    HttpStatus = 4,
    NoData = 5,
    Corrupted = 6,
    KeyNotFound = 7,
    TypeMismatch = 8,
    ValueNotFound = 9,
    Unknown = 10,
    Cancelled = 11,
    Panic = 12,
    NullArg = 13,
}

impl From<ErrorKind> for FfiErrorCode {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::MissingCredential => FfiErrorCode::MissingCredential,
            ErrorKind::InvalidInput => FfiErrorCode::InvalidInput,
            ErrorKind::Transport => FfiErrorCode::Transport,
            ErrorKind::HttpStatus => FfiErrorCode::HttpStatus,
            ErrorKind::NoData => FfiErrorCode::NoData,
            ErrorKind::Corrupted => FfiErrorCode::Corrupted,
            ErrorKind::KeyNotFound => FfiErrorCode::KeyNotFound,
            ErrorKind::TypeMismatch => FfiErrorCode::TypeMismatch,
            ErrorKind::ValueNotFound => FfiErrorCode::ValueNotFound,
            ErrorKind::Unknown => FfiErrorCode::Unknown,
            ErrorKind::Cancelled => FfiErrorCode::Cancelled,
        }
    }
}

/// Tag that tells `moviedb_free_result` what `FfiMovieResult::data` points to.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiDataTag {
    None = 0,
    MovieListPage = 1,
    PosterImage = 2,
}

/// A single movie exposed to C. Absent fields are null.
#[repr(C)]
pub struct FfiMovieEntry {
    pub title: *mut c_char,
    pub poster_path: *mut c_char,
    pub overview: *mut c_char,
}

impl FfiMovieEntry {
    fn from_core(entry: &MovieEntry) -> Self {
        Self {
            title: optional_c_string(entry.title.as_deref()),
            poster_path: optional_c_string(entry.poster_path.as_deref()),
            overview: optional_c_string(entry.overview.as_deref()),
        }
    }

    pub(crate) fn free_fields(&self) {
        free_c_string(self.title);
        free_c_string(self.poster_path);
        free_c_string(self.overview);
    }
}

/// A page of movies exposed to C.
///
/// Each integer is only meaningful when its `has_*` flag is set; absent
/// integers are `0`. `has_results` tells an absent `results` key apart from an
/// empty array.
#[repr(C)]
pub struct FfiMovieListPage {
    pub page: i64,
    pub has_page: bool,
    pub total_results: i64,
    pub has_total_results: bool,
    pub total_pages: i64,
    pub has_total_pages: bool,
    pub has_results: bool,
    pub results: *mut FfiMovieEntry,
    pub results_len: usize,
}

impl FfiMovieListPage {
    fn from_core(page: &MovieListPage) -> Self {
        let entries: Vec<FfiMovieEntry> = page.entries().iter().map(FfiMovieEntry::from_core).collect();
        let (results, results_len) = leak_slice(entries);
        Self {
            page: page.page.unwrap_or_default(),
            has_page: page.page.is_some(),
            total_results: page.total_results.unwrap_or_default(),
            has_total_results: page.total_results.is_some(),
            total_pages: page.total_pages.unwrap_or_default(),
            has_total_pages: page.total_pages.is_some(),
            has_results: page.results.is_some(),
            results,
            results_len,
        }
    }
}

/// Poster image bytes exposed to C. `content_type` is null when the response
/// carried none.
#[repr(C)]
pub struct FfiPosterImage {
    pub bytes: *mut u8,
    pub len: usize,
    pub content_type: *mut c_char,
    pub http_status: u16,
}

/// Result envelope for all parse operations.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `data`
/// points to the parsed payload (tagged by `data_tag`). On failure
/// `error_code` names the kind, `error_message` is a human-readable C string
/// and `error_path` holds the field path of a decode failure, or null.
/// `HttpStatus` failures still carry the decoded page in `data` when the body
/// decoded.
#[repr(C)]
pub struct FfiMovieResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub error_path: *mut c_char,
    pub http_status: u16,
    pub data_tag: FfiDataTag,
    pub data: *mut c_void,
}

impl FfiMovieResult {
    fn boxed(
        error_code: FfiErrorCode,
        error_message: *mut c_char,
        http_status: u16,
        data_tag: FfiDataTag,
        data: *mut c_void,
    ) -> *mut Self {
        Box::into_raw(Box::new(FfiMovieResult {
            error_code,
            error_message,
            error_path: std::ptr::null_mut(),
            http_status,
            data_tag,
            data,
        }))
    }

    fn page_data(page: &MovieListPage) -> *mut c_void {
        Box::into_raw(Box::new(FfiMovieListPage::from_core(page))) as *mut c_void
    }

    /// Build a success result carrying a decoded page.
    pub(crate) fn ok_page(page: &MovieListPage, status: u16) -> *mut Self {
        Self::boxed(
            FfiErrorCode::Ok,
            std::ptr::null_mut(),
            status,
            FfiDataTag::MovieListPage,
            Self::page_data(page),
        )
    }

    /// Build a success result carrying poster bytes.
    pub(crate) fn ok_poster(image: PosterImage) -> *mut Self {
        let status = image.status;
        let (bytes, len) = leak_slice(image.bytes);
        let poster = Box::new(FfiPosterImage {
            bytes,
            len,
            content_type: optional_c_string(image.content_type.as_deref()),
            http_status: status,
        });
        Self::boxed(
            FfiErrorCode::Ok,
            std::ptr::null_mut(),
            status,
            FfiDataTag::PosterImage,
            Box::into_raw(poster) as *mut c_void,
        )
    }

    /// Build an error result from an `ApiError`.
    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let message = into_c_string(&err.to_string());
        let code = FfiErrorCode::from(err.kind());
        let status = err.status().unwrap_or(0);
        let path = match &err {
            ApiError::Decode(decode) => decode
                .path()
                .map_or(std::ptr::null_mut(), |p| into_c_string(&p.to_string())),
            _ => std::ptr::null_mut(),
        };
        let (data_tag, data) = match err.decoded_page() {
            Some(page) => (FfiDataTag::MovieListPage, Self::page_data(page)),
            None => (FfiDataTag::None, std::ptr::null_mut()),
        };
        Box::into_raw(Box::new(FfiMovieResult {
            error_code: code,
            error_message: message,
            error_path: path,
            http_status: status,
            data_tag,
            data,
        }))
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::boxed(
            FfiErrorCode::NullArg,
            into_c_string(&format!("null argument: {name}")),
            0,
            FfiDataTag::None,
            std::ptr::null_mut(),
        )
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::boxed(
            FfiErrorCode::Panic,
            into_c_string(msg),
            0,
            FfiDataTag::None,
            std::ptr::null_mut(),
        )
    }
}
