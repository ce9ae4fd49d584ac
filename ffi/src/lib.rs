//! C-ABI wrapper around `appart-core` for native mobile hosts.
//!
//! # Overview
//! Exposes the apartments API through `extern "C"` functions so a host UI
//! can build requests, run them with its own HTTP stack, and parse the
//! responses, without linking an async runtime or serde.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Per-operation `build_*` / `parse_*` mirrors the core API 1:1.
//! - A single `FfiApartmentResult` envelope with `FfiDataTag` + `void* data`
//!   conveys success payloads and errors uniformly.
//! - The caller owns all returned pointers and must call the matching
//!   `appart_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use appart_core::{ApartmentClient, ApartmentInput, ApiError, HttpResponse, Observation};

use types::*;

/// Borrow a C string as `&str`. Null or non-UTF-8 input yields `None`.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string that outlives `'a`.
unsafe fn borrow_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok()
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a new client bound to `base_url`.
///
/// Returns null if `base_url` is null or not UTF-8.
/// The caller must free the returned pointer with `appart_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn appart_client_new(base_url: *const c_char) -> *mut FfiApartmentClient {
    catch_unwind(|| {
        let Some(url) = (unsafe { borrow_str(base_url) }) else {
            return std::ptr::null_mut();
        };
        let client = ApartmentClient::new(url);
        Box::into_raw(Box::new(FfiApartmentClient { inner: client }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `appart_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn appart_client_free(client: *mut FfiApartmentClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

/// Run `build` against the client, mapping null client and build failures
/// to a null request.
fn build_with<F>(client: *const FfiApartmentClient, build: F) -> *mut FfiHttpRequest
where
    F: FnOnce(&ApartmentClient) -> Option<appart_core::HttpRequest>,
{
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        build(&client.inner).map_or(std::ptr::null_mut(), FfiHttpRequest::from_core)
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Collect the three form values into an `ApartmentInput`.
///
/// # Safety
/// String pointers must be null or valid NUL-terminated strings.
unsafe fn input_from_c(
    num_app: *const c_char,
    design: *const c_char,
    loyer: f64,
) -> Option<ApartmentInput> {
    Some(ApartmentInput {
        num_app: borrow_str(num_app)?.to_string(),
        design: borrow_str(design)?.to_string(),
        loyer,
    })
}

/// Build the request listing every apartment.
///
/// Returns null if `client` is null.
/// The caller must free the returned pointer with `appart_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn appart_build_list(client: *const FfiApartmentClient) -> *mut FfiHttpRequest {
    build_with(client, |c| Some(c.build_list()))
}

/// Build the request creating an apartment.
///
/// Returns null if any pointer is null or if `loyer` is not finite.
#[unsafe(no_mangle)]
pub extern "C" fn appart_build_create(
    client: *const FfiApartmentClient,
    num_app: *const c_char,
    design: *const c_char,
    loyer: f64,
) -> *mut FfiHttpRequest {
    build_with(client, |c| {
        let input = unsafe { input_from_c(num_app, design, loyer) }?;
        c.build_create(&input).ok()
    })
}

/// Build the request replacing apartment `id`.
///
/// Returns null if any pointer is null or if `loyer` is not finite.
#[unsafe(no_mangle)]
pub extern "C" fn appart_build_update(
    client: *const FfiApartmentClient,
    id: i64,
    num_app: *const c_char,
    design: *const c_char,
    loyer: f64,
) -> *mut FfiHttpRequest {
    build_with(client, |c| {
        let input = unsafe { input_from_c(num_app, design, loyer) }?;
        c.build_update(id, &input).ok()
    })
}

/// Build the request deleting apartment `id`.
#[unsafe(no_mangle)]
pub extern "C" fn appart_build_delete(
    client: *const FfiApartmentClient,
    id: i64,
) -> *mut FfiHttpRequest {
    build_with(client, |c| Some(c.build_delete(id)))
}

/// Build the request fetching rent statistics.
#[unsafe(no_mangle)]
pub extern "C" fn appart_build_stats(client: *const FfiApartmentClient) -> *mut FfiHttpRequest {
    build_with(client, |c| Some(c.build_stats()))
}

// ---------------------------------------------------------------------------
// Parse response functions
// ---------------------------------------------------------------------------

/// Convert an `FfiHttpResponse` to a core `HttpResponse`. A null or
/// non-UTF-8 body reads as empty.
fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    let body = unsafe { borrow_str(resp.body) }.unwrap_or("").to_string();
    HttpResponse {
        status: resp.status,
        headers: Vec::new(),
        body,
    }
}

/// Shared null checks and panic guard for every `appart_parse_*`.
fn parse_with<F>(
    client: *const FfiApartmentClient,
    response: *const FfiHttpResponse,
    op: &str,
    parse: F,
) -> *mut FfiApartmentResult
where
    F: FnOnce(&ApartmentClient, HttpResponse) -> *mut FfiApartmentResult,
{
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return FfiApartmentResult::null_arg("client");
        }
        if response.is_null() {
            return FfiApartmentResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        parse(&client.inner, ffi_response_to_core(resp))
    }))
    .unwrap_or_else(|_| FfiApartmentResult::panic(&format!("panic in appart_parse_{op}")))
}

fn into_result<T>(
    result: Result<T, ApiError>,
    ok: impl FnOnce(T) -> *mut FfiApartmentResult,
) -> *mut FfiApartmentResult {
    match result {
        Ok(value) => ok(value),
        Err(e) => FfiApartmentResult::from_error(e),
    }
}

/// Parse a list response. `data_tag = ApartmentList` on success.
#[unsafe(no_mangle)]
pub extern "C" fn appart_parse_list(
    client: *const FfiApartmentClient,
    response: *const FfiHttpResponse,
) -> *mut FfiApartmentResult {
    parse_with(client, response, "list", |c, r| {
        into_result(c.parse_list(r), FfiApartmentResult::ok_apartment_list)
    })
}

/// Parse a create response. `data_tag = Apartment` on success.
#[unsafe(no_mangle)]
pub extern "C" fn appart_parse_create(
    client: *const FfiApartmentClient,
    response: *const FfiHttpResponse,
) -> *mut FfiApartmentResult {
    parse_with(client, response, "create", |c, r| {
        into_result(c.parse_create(r), FfiApartmentResult::ok_apartment)
    })
}

/// Parse an update response. `data_tag = Apartment` on success.
#[unsafe(no_mangle)]
pub extern "C" fn appart_parse_update(
    client: *const FfiApartmentClient,
    response: *const FfiHttpResponse,
) -> *mut FfiApartmentResult {
    parse_with(client, response, "update", |c, r| {
        into_result(c.parse_update(r), FfiApartmentResult::ok_apartment)
    })
}

/// Parse a delete response. `data_tag = None` on success; the body is ignored.
#[unsafe(no_mangle)]
pub extern "C" fn appart_parse_delete(
    client: *const FfiApartmentClient,
    response: *const FfiHttpResponse,
) -> *mut FfiApartmentResult {
    parse_with(client, response, "delete", |c, r| {
        into_result(c.parse_delete(r), |()| FfiApartmentResult::ok_empty())
    })
}

/// Parse a stats response. `data_tag = Stats` on success.
#[unsafe(no_mangle)]
pub extern "C" fn appart_parse_stats(
    client: *const FfiApartmentClient,
    response: *const FfiHttpResponse,
) -> *mut FfiApartmentResult {
    parse_with(client, response, "stats", |c, r| {
        into_result(c.parse_stats(r), FfiApartmentResult::ok_stats)
    })
}

// ---------------------------------------------------------------------------
// Observation
// ---------------------------------------------------------------------------

/// Classify a rent: below 1000 `Bas`, up to 5000 inclusive `Moyen`,
/// above `Eleve`.
#[unsafe(no_mangle)]
pub extern "C" fn appart_observation(loyer: f64) -> FfiObservation {
    Observation::from_loyer(loyer).into()
}

/// Static UTF-8 label for an observation. Never free the returned pointer.
#[unsafe(no_mangle)]
pub extern "C" fn appart_observation_label(observation: FfiObservation) -> *const c_char {
    match observation {
        FfiObservation::Bas => c"bas".as_ptr(),
        FfiObservation::Moyen => c"moyen".as_ptr(),
        FfiObservation::Eleve => c"élevé".as_ptr(),
    }
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by any `appart_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn appart_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        if !req.path.is_null() {
            drop(unsafe { CString::from_raw(req.path) });
        }
        if !req.body.is_null() {
            drop(unsafe { CString::from_raw(req.body) });
        }
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    req.headers,
                    req.headers_len as usize,
                ))
            };
            for h in headers.iter() {
                if !h.key.is_null() {
                    drop(unsafe { CString::from_raw(h.key) });
                }
                if !h.value.is_null() {
                    drop(unsafe { CString::from_raw(h.value) });
                }
            }
        }
    });
}

/// Free an `FfiApartmentResult` returned by any `appart_parse_*` function.
/// Safe to call with null. Uses `data_tag` to determine what `data` points to.
#[unsafe(no_mangle)]
pub extern "C" fn appart_free_result(result: *mut FfiApartmentResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        if !result.error_message.is_null() {
            drop(unsafe { CString::from_raw(result.error_message) });
        }
        if result.data.is_null() {
            return;
        }
        match result.data_tag {
            FfiDataTag::Apartment => {
                let apartment = unsafe { Box::from_raw(result.data as *mut FfiApartment) };
                unsafe { free_apartment_fields(&apartment) };
            }
            FfiDataTag::ApartmentList => {
                let list = unsafe { Box::from_raw(result.data as *mut FfiApartmentList) };
                if !list.items.is_null() && list.len > 0 {
                    let items = unsafe {
                        Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                            list.items,
                            list.len as usize,
                        ))
                    };
                    for item in items.iter() {
                        unsafe { free_apartment_fields(item) };
                    }
                }
            }
            FfiDataTag::Stats => {
                drop(unsafe { Box::from_raw(result.data as *mut FfiStats) });
            }
            FfiDataTag::None => {}
        }
    });
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
