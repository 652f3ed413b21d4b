//! Request builder core for the Matrix client-server API.
//!
//! # Overview
//! Builds `HttpRequest` descriptors for spec discovery, login, logout,
//! registration, and room discovery without touching the network
//! (host-does-IO pattern). The caller executes the HTTP round-trip and owns
//! everything that happens after: TLS, timeouts, retries, response parsing.
//!
//! # Design
//! - Every endpoint is a pure function in [`requests`]; `MatrixClient` is a
//!   stateless handle that forwards to them with a bound `base_url`.
//! - Descriptors are immutable values with equality, so building twice with
//!   the same arguments gives equal results.
//! - Types use owned `String` / `Vec` / `Map` fields to simplify FFI mapping.

pub mod client;
pub mod error;
pub mod http;
pub mod requests;
pub mod types;

pub use client::MatrixClient;
pub use error::RequestError;
pub use http::{HttpMethod, HttpRequest, JsonBody};
pub use requests::{
    login_flows, login_with_password, logout, register_guest, register_user, room_discovery,
    server_discovery, spec_versions,
};
