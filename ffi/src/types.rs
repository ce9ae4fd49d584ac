//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type with C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, an
//! explicit `has_id` flag instead of `Option<i64>`. Conversion functions
//! live here to keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::{c_void, CString};
use std::os::raw::c_char;

use appart_core::{Apartment, ApiError, HttpMethod, Observation, Stats};

/// Opaque handle to an `ApartmentClient`. C callers receive a pointer to
/// this and pass it back into every FFI function.
pub struct FfiApartmentClient {
    pub(crate) inner: appart_core::ApartmentClient,
}

/// Copy `s` into a heap C string owned by the caller. Interior NULs are
/// dropped rather than failing the whole conversion.
pub(crate) fn c_string(s: String) -> *mut c_char {
    let s = if s.contains('\0') { s.replace('\0', "") } else { s };
    CString::new(s).unwrap_or_default().into_raw()
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Put = 2,
    Delete = 3,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Put => FfiHttpMethod::Put,
            HttpMethod::Delete => FfiHttpMethod::Delete,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// Built by `appart_build_*` functions. The host executes the request and
/// passes the response back through `appart_parse_*`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub path: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: appart_core::HttpRequest) -> *mut Self {
        let body = req.body.map_or(std::ptr::null_mut(), c_string);

        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: c_string(k),
                    value: c_string(v),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            path: c_string(req.path),
            headers,
            headers_len,
            body,
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The host builds this after executing a request and passes a pointer to an
/// `appart_parse_*` function. The FFI layer reads but does not free it.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiApartmentResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    Service = 1,
    Deserialization = 2,
    Serialization = 3,
    Transport = 4,
    Panic = 5,
    NullArg = 6,
}

/// Tells `appart_free_result` what `FfiApartmentResult::data` points to.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiDataTag {
    None = 0,
    Apartment = 1,
    ApartmentList = 2,
    Stats = 3,
}

/// Rent tier, see `appart_observation`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiObservation {
    Bas = 0,
    Moyen = 1,
    Eleve = 2,
}

impl From<Observation> for FfiObservation {
    fn from(o: Observation) -> Self {
        match o {
            Observation::Bas => FfiObservation::Bas,
            Observation::Moyen => FfiObservation::Moyen,
            Observation::Eleve => FfiObservation::Eleve,
        }
    }
}

/// A single apartment exposed to C. `id` is meaningful only when `has_id`.
#[repr(C)]
pub struct FfiApartment {
    pub has_id: bool,
    pub id: i64,
    pub num_app: *mut c_char,
    pub design: *mut c_char,
    pub loyer: f64,
    pub observation: FfiObservation,
}

impl FfiApartment {
    fn from_core(apartment: Apartment) -> Self {
        let observation = apartment.observation().into();
        FfiApartment {
            has_id: apartment.id.is_some(),
            id: apartment.id.unwrap_or_default(),
            num_app: c_string(apartment.num_app),
            design: c_string(apartment.design),
            loyer: apartment.loyer,
            observation,
        }
    }
}

/// A list of apartments exposed to C.
#[repr(C)]
pub struct FfiApartmentList {
    pub items: *mut FfiApartment,
    pub len: u32,
}

/// Rent aggregate exposed to C.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FfiStats {
    pub total: f64,
    pub min: f64,
    pub max: f64,
}

/// Result envelope for all parse operations.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `data`
/// points to the payload tagged by `data_tag`. On failure `error_message`
/// is the text to show (for `Service`, the service's own message) and
/// `data` is null.
#[repr(C)]
pub struct FfiApartmentResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub data_tag: FfiDataTag,
    pub data: *mut c_void,
}

impl FfiApartmentResult {
    fn ok(data_tag: FfiDataTag, data: *mut c_void) -> *mut Self {
        Box::into_raw(Box::new(FfiApartmentResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            http_status: 0,
            data_tag,
            data,
        }))
    }

    fn err(error_code: FfiErrorCode, http_status: u16, message: String) -> *mut Self {
        Box::into_raw(Box::new(FfiApartmentResult {
            error_code,
            error_message: c_string(message),
            http_status,
            data_tag: FfiDataTag::None,
            data: std::ptr::null_mut(),
        }))
    }

    pub(crate) fn ok_apartment(apartment: Apartment) -> *mut Self {
        let data = Box::into_raw(Box::new(FfiApartment::from_core(apartment)));
        Self::ok(FfiDataTag::Apartment, data as *mut c_void)
    }

    pub(crate) fn ok_apartment_list(apartments: Vec<Apartment>) -> *mut Self {
        let len = apartments.len() as u32;
        let items = if apartments.is_empty() {
            std::ptr::null_mut()
        } else {
            let items: Box<[FfiApartment]> =
                apartments.into_iter().map(FfiApartment::from_core).collect();
            Box::into_raw(items) as *mut FfiApartment
        };
        let data = Box::into_raw(Box::new(FfiApartmentList { items, len }));
        Self::ok(FfiDataTag::ApartmentList, data as *mut c_void)
    }

    pub(crate) fn ok_stats(stats: Stats) -> *mut Self {
        let data = Box::into_raw(Box::new(FfiStats {
            total: stats.total,
            min: stats.min,
            max: stats.max,
        }));
        Self::ok(FfiDataTag::Stats, data as *mut c_void)
    }

    pub(crate) fn ok_empty() -> *mut Self {
        Self::ok(FfiDataTag::None, std::ptr::null_mut())
    }

    /// Service failures pass the service's message through untouched so the
    /// host can show it; other errors use their `Display` text.
    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let (error_code, http_status) = match &err {
            ApiError::Service { status, .. } => (FfiErrorCode::Service, *status),
            ApiError::Deserialization(_) => (FfiErrorCode::Deserialization, 0),
            ApiError::Serialization(_) => (FfiErrorCode::Serialization, 0),
            ApiError::Transport(_) => (FfiErrorCode::Transport, 0),
        };
        let message = match err {
            ApiError::Service { message, .. } => message,
            other => other.to_string(),
        };
        Self::err(error_code, http_status, message)
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::err(FfiErrorCode::NullArg, 0, format!("null argument: {name}"))
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::err(FfiErrorCode::Panic, 0, msg.to_string())
    }
}

/// Free the C-string fields of an `FfiApartment` (but not the struct itself).
///
/// # Safety
/// The fields must have been produced by `c_string` and not freed yet.
pub(crate) unsafe fn free_apartment_fields(apartment: &FfiApartment) {
    if !apartment.num_app.is_null() {
        drop(CString::from_raw(apartment.num_app));
    }
    if !apartment.design.is_null() {
        drop(CString::from_raw(apartment.design));
    }
}
