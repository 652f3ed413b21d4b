//! Wire vocabulary of the Matrix client-server API.
//!
//! Paths, login types, and header names used when building requests. Kept in
//! one place so the builder, the FFI layer, and the mock server agree on the
//! exact strings.

/// `GET` — spec versions supported by the homeserver.
pub const VERSIONS_PATH: &str = "/_matrix/client/versions";

/// `GET` — client well-known discovery document.
pub const WELL_KNOWN_CLIENT_PATH: &str = "/.well-known/matrix/client";

/// `GET` lists login flows, `POST` logs in.
pub const LOGIN_PATH: &str = "/_matrix/client/r0/login";

pub const LOGOUT_PATH: &str = "/_matrix/client/r0/logout";

pub const REGISTER_PATH: &str = "/_matrix/client/r0/register";

/// Guest registration carries its kind in a literal query string.
pub const REGISTER_GUEST_PATH: &str = "/_matrix/client/r0/register?kind=guest";

pub const PUBLIC_ROOMS_PATH: &str = "/_matrix/client/r0/publicRooms";

/// Login type for username + password authentication.
pub const LOGIN_TYPE_PASSWORD: &str = "m.login.password";

/// Auth type for the no-op registration stage.
pub const LOGIN_TYPE_DUMMY: &str = "m.login.dummy";

pub const AUTHORIZATION_HEADER: &str = "Authorization";

pub const BEARER_SCHEME: &str = "Bearer";
