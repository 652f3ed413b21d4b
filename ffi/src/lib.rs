//! C-ABI wrapper around `matrix-core`.
//!
//! # Overview
//! Exposes every Matrix request constructor through `extern "C"` functions so
//! any language with a C FFI can obtain request descriptors and run the HTTP
//! round-trip itself.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - One `matrix_build_*` per core constructor, taking NUL-terminated UTF-8
//!   strings. A null or non-UTF-8 argument yields a null result.
//! - The C caller owns every returned `FfiHttpRequest` and must release it
//!   with `matrix_free_request`.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{catch_unwind, UnwindSafe};

use matrix_core::HttpRequest;

use types::*;

/// Borrow a C string as `&str`; `None` for null or invalid UTF-8.
fn read_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

/// Run a builder behind `catch_unwind` and hand the result to C.
fn build_with<F>(f: F) -> *mut FfiHttpRequest
where
    F: FnOnce() -> Option<HttpRequest> + UnwindSafe,
{
    catch_unwind(|| f().map_or(std::ptr::null_mut(), FfiHttpRequest::from_core))
        .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

/// `GET /_matrix/client/versions`.
///
/// Returns null if `base_url` is null or not UTF-8.
/// The caller must free the returned pointer with `matrix_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn matrix_build_spec_versions(base_url: *const c_char) -> *mut FfiHttpRequest {
    build_with(|| Some(matrix_core::spec_versions(read_str(base_url)?)))
}

/// `GET /.well-known/matrix/client`.
#[unsafe(no_mangle)]
pub extern "C" fn matrix_build_server_discovery(base_url: *const c_char) -> *mut FfiHttpRequest {
    build_with(|| Some(matrix_core::server_discovery(read_str(base_url)?)))
}

/// `GET /_matrix/client/r0/login`.
#[unsafe(no_mangle)]
pub extern "C" fn matrix_build_login_flows(base_url: *const c_char) -> *mut FfiHttpRequest {
    build_with(|| Some(matrix_core::login_flows(read_str(base_url)?)))
}

/// `POST /_matrix/client/r0/login` with an `m.login.password` body.
///
/// Returns null if any argument is null or not UTF-8.
#[unsafe(no_mangle)]
pub extern "C" fn matrix_build_login_with_password(
    base_url: *const c_char,
    username: *const c_char,
    password: *const c_char,
) -> *mut FfiHttpRequest {
    build_with(|| {
        Some(matrix_core::login_with_password(
            read_str(base_url)?,
            read_str(username)?,
            read_str(password)?,
        ))
    })
}

/// `POST /_matrix/client/r0/logout` with `Authorization: Bearer <token>`.
#[unsafe(no_mangle)]
pub extern "C" fn matrix_build_logout(
    base_url: *const c_char,
    token: *const c_char,
) -> *mut FfiHttpRequest {
    build_with(|| Some(matrix_core::logout(read_str(base_url)?, read_str(token)?)))
}

/// `POST /_matrix/client/r0/register?kind=guest`.
#[unsafe(no_mangle)]
pub extern "C" fn matrix_build_register_guest(base_url: *const c_char) -> *mut FfiHttpRequest {
    build_with(|| Some(matrix_core::register_guest(read_str(base_url)?)))
}

/// `POST /_matrix/client/r0/register` with an `m.login.dummy` auth body.
#[unsafe(no_mangle)]
pub extern "C" fn matrix_build_register_user(
    base_url: *const c_char,
    username: *const c_char,
    password: *const c_char,
) -> *mut FfiHttpRequest {
    build_with(|| {
        Some(matrix_core::register_user(
            read_str(base_url)?,
            read_str(username)?,
            read_str(password)?,
        ))
    })
}

/// `GET /_matrix/client/r0/publicRooms`.
#[unsafe(no_mangle)]
pub extern "C" fn matrix_build_room_discovery(base_url: *const c_char) -> *mut FfiHttpRequest {
    build_with(|| Some(matrix_core::room_discovery(read_str(base_url)?)))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by any `matrix_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn matrix_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        free_string(req.base_url);
        free_string(req.path);
        free_string(req.body);
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    req.headers,
                    req.headers_len as usize,
                ))
            };
            for h in headers.iter() {
                free_string(h.key);
                free_string(h.value);
            }
        }
    });
}

fn free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
