//! Stateless request builder bound to one homeserver.
//!
//! # Design
//! `MatrixClient` holds only a `base_url` and carries no mutable state between
//! calls. Each `build_*` method forwards to the matching free function in
//! [`crate::requests`], so both entry points produce identical descriptors.
//! The caller executes the actual HTTP round-trip and interprets the
//! response.

use crate::http::HttpRequest;
use crate::requests;

/// Synchronous, stateless request builder for one Matrix homeserver.
///
/// Builds `HttpRequest` values without touching the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixClient {
    base_url: String,
}

impl MatrixClient {
    /// The base URL is stored verbatim; it is neither trimmed nor validated.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_spec_versions(&self) -> HttpRequest {
        requests::spec_versions(&self.base_url)
    }

    pub fn build_server_discovery(&self) -> HttpRequest {
        requests::server_discovery(&self.base_url)
    }

    pub fn build_login_flows(&self) -> HttpRequest {
        requests::login_flows(&self.base_url)
    }

    pub fn build_login_with_password(&self, username: &str, password: &str) -> HttpRequest {
        requests::login_with_password(&self.base_url, username, password)
    }

    pub fn build_logout(&self, token: &str) -> HttpRequest {
        requests::logout(&self.base_url, token)
    }

    pub fn build_register_guest(&self) -> HttpRequest {
        requests::register_guest(&self.base_url)
    }

    pub fn build_register_user(&self, username: &str, password: &str) -> HttpRequest {
        requests::register_user(&self.base_url, username, password)
    }

    pub fn build_room_discovery(&self) -> HttpRequest {
        requests::room_discovery(&self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;

    const BASE_URL: &str = "http://localhost:8008";

    fn client() -> MatrixClient {
        MatrixClient::new(BASE_URL)
    }

    #[test]
    fn build_methods_match_free_functions() {
        let c = client();
        assert_eq!(c.build_spec_versions(), requests::spec_versions(BASE_URL));
        assert_eq!(c.build_server_discovery(), requests::server_discovery(BASE_URL));
        assert_eq!(c.build_login_flows(), requests::login_flows(BASE_URL));
        assert_eq!(
            c.build_login_with_password("alice", "secret"),
            requests::login_with_password(BASE_URL, "alice", "secret")
        );
        assert_eq!(c.build_logout("tok"), requests::logout(BASE_URL, "tok"));
        assert_eq!(c.build_register_guest(), requests::register_guest(BASE_URL));
        assert_eq!(
            c.build_register_user("bob", "pw"),
            requests::register_user(BASE_URL, "bob", "pw")
        );
        assert_eq!(c.build_room_discovery(), requests::room_discovery(BASE_URL));
    }

    #[test]
    fn build_logout_produces_correct_request() {
        let req = client().build_logout("tok123");
        assert_eq!(req.method(), HttpMethod::Post);
        assert_eq!(req.url(), "http://localhost:8008/_matrix/client/r0/logout");
        assert_eq!(req.header("Authorization"), Some("Bearer tok123"));
        assert_eq!(req.body_json().unwrap(), None);
    }

    #[test]
    fn trailing_slash_is_kept_on_descriptor() {
        let client = MatrixClient::new("http://localhost:8008/");
        let req = client.build_room_discovery();
        assert_eq!(req.base_url(), "http://localhost:8008/");
        assert_eq!(req.url(), "http://localhost:8008/_matrix/client/r0/publicRooms");
    }
}
