//! HTTP request descriptors for the host-does-IO pattern.
//!
//! # Design
//! An `HttpRequest` describes one pending call to a homeserver as plain data.
//! The core crate builds these values without ever touching the network; the
//! caller (host) serializes the body, sends the request, and deals with the
//! response. Fields are private so a descriptor cannot change after it has
//! been built, and everything is owned (`String`, `Vec`, `Map`) so values
//! cross the FFI boundary without lifetime concerns.

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};
use tracing::trace;

use crate::error::RequestError;

/// JSON object carried as a request body.
pub type JsonBody = Map<String, Value>;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            other => Err(RequestError::UnknownMethod(other.to_string())),
        }
    }
}

/// An HTTP request described as plain data.
///
/// Built by the functions in [`crate::requests`] (or the matching
/// `MatrixClient::build_*` methods). The caller executes it against
/// `base_url + path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    method: HttpMethod,
    base_url: String,
    path: String,
    headers: Vec<(String, String)>,
    body: JsonBody,
}

impl HttpRequest {
    /// A request with no headers and an empty body.
    pub(crate) fn new(method: HttpMethod, base_url: &str, path: impl Into<String>) -> Self {
        let path = path.into();
        trace!(%method, %path, "building request");
        Self {
            method,
            base_url: base_url.to_string(),
            path,
            headers: Vec::new(),
            body: JsonBody::new(),
        }
    }

    pub(crate) fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    pub(crate) fn with_body(mut self, body: JsonBody) -> Self {
        self.body = body;
        self
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body(&self) -> &JsonBody {
        &self.body
    }

    /// First header value whose name matches `name`, ignoring ASCII case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Absolute URL the transport should call.
    ///
    /// Plain concatenation; a trailing `/` on `base_url` is dropped so the
    /// joint never doubles up. Nothing is validated.
    pub fn url(&self) -> String {
        let base = self.base_url.strip_suffix('/').unwrap_or(&self.base_url);
        format!("{base}{}", self.path)
    }

    /// Body encoded as JSON text, or `None` when there is nothing to send.
    pub fn body_json(&self) -> Result<Option<String>, RequestError> {
        if self.body.is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::to_string(&self.body)?))
    }

    /// Split the descriptor into its owned parts.
    pub fn into_parts(self) -> (HttpMethod, String, String, Vec<(String, String)>, JsonBody) {
        (self.method, self.base_url, self.path, self.headers, self.body)
    }
}
