//! One pure constructor per Matrix client-server endpoint.
//!
//! Every function maps its arguments straight to an [`HttpRequest`]. Nothing
//! here validates input: an empty or malformed `base_url` is carried through
//! and left for the transport to reject.

use serde_json::{json, Value};

use crate::http::{HttpMethod, HttpRequest, JsonBody};
use crate::types::{
    AUTHORIZATION_HEADER, BEARER_SCHEME, LOGIN_PATH, LOGIN_TYPE_DUMMY, LOGIN_TYPE_PASSWORD,
    LOGOUT_PATH, PUBLIC_ROOMS_PATH, REGISTER_GUEST_PATH, REGISTER_PATH, VERSIONS_PATH,
    WELL_KNOWN_CLIENT_PATH,
};

/// `GET /_matrix/client/versions`
pub fn spec_versions(base_url: &str) -> HttpRequest {
    HttpRequest::new(HttpMethod::Get, base_url, VERSIONS_PATH)
}

/// `GET /.well-known/matrix/client`
pub fn server_discovery(base_url: &str) -> HttpRequest {
    HttpRequest::new(HttpMethod::Get, base_url, WELL_KNOWN_CLIENT_PATH)
}

/// `GET /_matrix/client/r0/login` — the login flows the server supports.
pub fn login_flows(base_url: &str) -> HttpRequest {
    HttpRequest::new(HttpMethod::Get, base_url, LOGIN_PATH)
}

/// `POST /_matrix/client/r0/login` with an `m.login.password` body.
pub fn login_with_password(base_url: &str, username: &str, password: &str) -> HttpRequest {
    let body = object(json!({
        "type": LOGIN_TYPE_PASSWORD,
        "user": username,
        "password": password,
    }));
    HttpRequest::new(HttpMethod::Post, base_url, LOGIN_PATH).with_body(body)
}

/// `POST /_matrix/client/r0/logout`, authenticated with `token`.
pub fn logout(base_url: &str, token: &str) -> HttpRequest {
    HttpRequest::new(HttpMethod::Post, base_url, LOGOUT_PATH)
        .with_header(AUTHORIZATION_HEADER, format!("{BEARER_SCHEME} {token}"))
}

/// `POST /_matrix/client/r0/register?kind=guest`
pub fn register_guest(base_url: &str) -> HttpRequest {
    HttpRequest::new(HttpMethod::Post, base_url, REGISTER_GUEST_PATH)
}

/// `POST /_matrix/client/r0/register` completing the `m.login.dummy` stage.
pub fn register_user(base_url: &str, username: &str, password: &str) -> HttpRequest {
    let body = object(json!({
        "auth": { "type": LOGIN_TYPE_DUMMY },
        "username": username,
        "password": password,
    }));
    HttpRequest::new(HttpMethod::Post, base_url, REGISTER_PATH).with_body(body)
}

/// `GET /_matrix/client/r0/publicRooms`
pub fn room_discovery(base_url: &str) -> HttpRequest {
    HttpRequest::new(HttpMethod::Get, base_url, PUBLIC_ROOMS_PATH)
}

// `json!` with an object literal always yields `Value::Object`.
fn object(value: Value) -> JsonBody {
    match value {
        Value::Object(map) => map,
        _ => JsonBody::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE_URL: &str = "https://matrix.org";

    fn body_value(req: &HttpRequest) -> Value {
        Value::Object(req.body().clone())
    }

    #[test]
    fn spec_versions_is_bodyless_get() {
        let req = spec_versions(BASE_URL);
        assert_eq!(req.method(), HttpMethod::Get);
        assert_eq!(req.base_url(), BASE_URL);
        assert_eq!(req.path(), "/_matrix/client/versions");
        assert!(req.headers().is_empty());
        assert!(req.body().is_empty());
    }

    #[test]
    fn server_discovery_targets_well_known() {
        let req = server_discovery(BASE_URL);
        assert_eq!(req.method(), HttpMethod::Get);
        assert_eq!(req.path(), "/.well-known/matrix/client");
        assert!(req.body().is_empty());
    }

    #[test]
    fn login_flows_is_get_on_login() {
        let req = login_flows(BASE_URL);
        assert_eq!(req.method(), HttpMethod::Get);
        assert_eq!(req.path(), "/_matrix/client/r0/login");
        assert!(req.body().is_empty());
    }

    #[test]
    fn login_with_password_posts_credentials() {
        let req = login_with_password(BASE_URL, "alice", "secret");
        assert_eq!(req.method(), HttpMethod::Post);
        assert_eq!(req.path(), "/_matrix/client/r0/login");
        assert!(req.headers().is_empty());
        assert_eq!(
            body_value(&req),
            json!({"type": "m.login.password", "user": "alice", "password": "secret"})
        );
    }

    #[test]
    fn logout_carries_bearer_token() {
        let req = logout(BASE_URL, "tok123");
        assert_eq!(req.method(), HttpMethod::Post);
        assert_eq!(req.path(), "/_matrix/client/r0/logout");
        assert_eq!(
            req.headers(),
            &[("Authorization".to_string(), "Bearer tok123".to_string())]
        );
        assert!(req.body().is_empty());
    }

    #[test]
    fn register_guest_uses_kind_query() {
        let req = register_guest(BASE_URL);
        assert_eq!(req.method(), HttpMethod::Post);
        assert_eq!(req.path(), "/_matrix/client/r0/register?kind=guest");
        assert!(req.body().is_empty());
    }

    #[test]
    fn register_user_completes_dummy_stage() {
        let req = register_user(BASE_URL, "bob", "pw");
        assert_eq!(req.method(), HttpMethod::Post);
        assert_eq!(req.path(), "/_matrix/client/r0/register");
        assert_eq!(
            body_value(&req),
            json!({"auth": {"type": "m.login.dummy"}, "username": "bob", "password": "pw"})
        );
    }

    #[test]
    fn room_discovery_lists_public_rooms() {
        let req = room_discovery(BASE_URL);
        assert_eq!(req.method(), HttpMethod::Get);
        assert_eq!(req.path(), "/_matrix/client/r0/publicRooms");
        assert!(req.body().is_empty());
    }

    #[test]
    fn constructors_are_idempotent() {
        assert_eq!(spec_versions(BASE_URL), spec_versions(BASE_URL));
        assert_eq!(
            login_with_password(BASE_URL, "alice", "secret"),
            login_with_password(BASE_URL, "alice", "secret")
        );
        assert_eq!(logout(BASE_URL, "t"), logout(BASE_URL, "t"));
        assert_eq!(register_user(BASE_URL, "bob", "pw"), register_user(BASE_URL, "bob", "pw"));
        assert_ne!(logout(BASE_URL, "a"), logout(BASE_URL, "b"));
    }

    #[test]
    fn base_url_is_not_validated() {
        let req = room_discovery("");
        assert_eq!(req.base_url(), "");
        assert_eq!(req.url(), "/_matrix/client/r0/publicRooms");

        let req = spec_versions("not a url");
        assert_eq!(req.base_url(), "not a url");
    }

    #[test]
    fn credentials_are_not_escaped_or_trimmed() {
        let req = login_with_password(BASE_URL, " @alice:example.org ", "p\"w");
        assert_eq!(req.body()["user"], " @alice:example.org ");
        assert_eq!(req.body()["password"], "p\"w");
    }
}
