//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, a raw pointer + length instead of
//! `Vec`, and a C enum with explicit discriminants. The JSON body crosses as
//! encoded text because C has no map type. Conversion lives here to keep
//! `lib.rs` focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use matrix_core::{HttpMethod, HttpRequest};

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

/// A Matrix request described as C-compatible plain data.
///
/// Built by `matrix_build_*` functions and released with
/// `matrix_free_request`. `body` is JSON text, or null when the request has
/// no body.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub base_url: *mut c_char,
    pub path: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    ///
    /// Returns null if any string holds an interior NUL byte, since C could
    /// not read it back intact.
    pub(crate) fn from_core(req: HttpRequest) -> *mut Self {
        let body = match req.body_json() {
            Ok(body) => body,
            Err(_) => return std::ptr::null_mut(),
        };
        let (method, base_url, path, headers, _) = req.into_parts();

        // Convert everything before handing out raw pointers so a failure
        // part-way through leaks nothing.
        let Ok(base_url) = CString::new(base_url) else {
            return std::ptr::null_mut();
        };
        let Ok(path) = CString::new(path) else {
            return std::ptr::null_mut();
        };
        let body = match body.map(CString::new).transpose() {
            Ok(body) => body,
            Err(_) => return std::ptr::null_mut(),
        };
        let mut c_headers = Vec::with_capacity(headers.len());
        for (k, v) in headers {
            match (CString::new(k), CString::new(v)) {
                (Ok(k), Ok(v)) => c_headers.push((k, v)),
                _ => return std::ptr::null_mut(),
            }
        }

        let headers_len = c_headers.len() as u32;
        let headers = if c_headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = c_headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: k.into_raw(),
                    value: v.into_raw(),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            method: method.into(),
            base_url: base_url.into_raw(),
            path: path.into_raw(),
            headers,
            headers_len,
            body: body.map_or(std::ptr::null_mut(), CString::into_raw),
        }))
    }
}
