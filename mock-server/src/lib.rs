use std::{collections::HashMap, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

pub const SUPPORTED_VERSIONS: &[&str] = &["r0.5.0", "r0.6.1", "v1.1"];

/// Error envelope used by every Matrix endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub errcode: String,
    pub error: String,
}

#[derive(Debug)]
pub struct MatrixError {
    status: StatusCode,
    body: ErrorBody,
}

impl MatrixError {
    fn new(status: StatusCode, errcode: &str, error: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                errcode: errcode.to_string(),
                error: error.into(),
            },
        }
    }

    fn forbidden(error: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, "M_FORBIDDEN", error)
    }

    fn bad_json(error: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "M_BAD_JSON", error)
    }
}

impl IntoResponse for MatrixError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublicRoom {
    pub room_id: String,
    pub name: String,
    pub num_joined_members: u64,
    pub world_readable: bool,
    pub guest_can_join: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PublicRooms {
    pub chunk: Vec<PublicRoom>,
    pub total_room_count_estimate: u64,
}

/// Returned by both login and registration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub access_token: String,
    pub device_id: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(rename = "type")]
    pub login_type: String,
    pub user: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize)]
pub struct AuthData {
    #[serde(rename = "type")]
    pub auth_type: String,
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub auth: Option<AuthData>,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize)]
pub struct RegisterParams {
    pub kind: Option<String>,
}

/// In-memory homeserver state.
#[derive(Debug)]
pub struct Homeserver {
    server_name: String,
    /// localpart -> password; guests hold the name without a password
    users: HashMap<String, Option<String>>,
    /// access token -> user id
    tokens: HashMap<String, String>,
    next_guest: u64,
    rooms: Vec<PublicRoom>,
}

impl Homeserver {
    pub fn new(server_name: &str) -> Self {
        let rooms = vec![
            PublicRoom {
                room_id: format!("!lobby:{server_name}"),
                name: "Lobby".to_string(),
                num_joined_members: 42,
                world_readable: true,
                guest_can_join: true,
            },
            PublicRoom {
                room_id: format!("!rust:{server_name}"),
                name: "Rust".to_string(),
                num_joined_members: 7,
                world_readable: false,
                guest_can_join: false,
            },
        ];
        Self {
            server_name: server_name.to_string(),
            users: HashMap::new(),
            tokens: HashMap::new(),
            next_guest: 1,
            rooms,
        }
    }

    fn user_id(&self, localpart: &str) -> String {
        format!("@{localpart}:{}", self.server_name)
    }

    /// Accept either a bare localpart or a full `@local:server` id.
    fn localpart<'a>(&self, user: &'a str) -> &'a str {
        let user = user.strip_prefix('@').unwrap_or(user);
        match user.split_once(':') {
            Some((local, _)) => local,
            None => user,
        }
    }

    /// Claim the next numeric localpart not already taken by a user.
    fn allocate_guest(&mut self) -> String {
        loop {
            let localpart = self.next_guest.to_string();
            self.next_guest += 1;
            if !self.users.contains_key(&localpart) {
                self.users.insert(localpart.clone(), None);
                return localpart;
            }
        }
    }

    fn open_session(&mut self, user_id: String) -> Session {
        let access_token = Uuid::new_v4().simple().to_string();
        let device_id = Uuid::new_v4().simple().to_string()[..10].to_uppercase();
        self.tokens.insert(access_token.clone(), user_id.clone());
        Session {
            user_id,
            access_token,
            device_id,
        }
    }
}

pub type Db = Arc<RwLock<Homeserver>>;

pub fn app() -> Router {
    app_with_name("localhost")
}

pub fn app_with_name(server_name: &str) -> Router {
    let db: Db = Arc::new(RwLock::new(Homeserver::new(server_name)));
    Router::new()
        .route("/_matrix/client/versions", get(versions))
        .route("/.well-known/matrix/client", get(well_known))
        .route("/_matrix/client/r0/login", get(login_flows).post(login))
        .route("/_matrix/client/r0/logout", post(logout))
        .route("/_matrix/client/r0/register", post(register))
        .route("/_matrix/client/r0/publicRooms", get(public_rooms))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_name(listener, "localhost").await
}

pub async fn run_with_name(listener: TcpListener, server_name: &str) -> Result<(), std::io::Error> {
    info!(server_name, addr = ?listener.local_addr().ok(), "mock homeserver ready");
    axum::serve(listener, app_with_name(server_name)).await
}

async fn versions() -> Json<Value> {
    Json(json!({ "versions": SUPPORTED_VERSIONS }))
}

async fn well_known(State(db): State<Db>, headers: HeaderMap) -> Json<Value> {
    let base_url = match headers.get(header::HOST).and_then(|h| h.to_str().ok()) {
        Some(host) => format!("http://{host}"),
        None => format!("https://{}", db.read().await.server_name),
    };
    Json(json!({ "m.homeserver": { "base_url": base_url } }))
}

async fn login_flows() -> Json<Value> {
    Json(json!({ "flows": [{ "type": "m.login.password" }] }))
}

// Parsed by hand so a body sent without `Content-Type` is still accepted and
// malformed JSON gets the Matrix error envelope.
async fn login(State(db): State<Db>, body: Bytes) -> Result<Json<Session>, MatrixError> {
    let input: LoginRequest =
        serde_json::from_slice(&body).map_err(|e| MatrixError::bad_json(e.to_string()))?;
    if input.login_type != "m.login.password" {
        return Err(MatrixError::new(
            StatusCode::BAD_REQUEST,
            "M_UNKNOWN",
            format!("unsupported login type: {}", input.login_type),
        ));
    }
    let (Some(user), Some(password)) = (input.user, input.password) else {
        return Err(MatrixError::bad_json("user and password are required"));
    };

    let mut hs = db.write().await;
    let localpart = hs.localpart(&user).to_string();
    if !matches!(hs.users.get(&localpart), Some(Some(stored)) if *stored == password) {
        debug!(%localpart, "login rejected");
        return Err(MatrixError::forbidden("invalid username or password"));
    }
    let user_id = hs.user_id(&localpart);
    let session = hs.open_session(user_id);
    info!(user_id = %session.user_id, "logged in");
    Ok(Json(session))
}

async fn logout(State(db): State<Db>, headers: HeaderMap) -> Result<Json<Value>, MatrixError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| {
            MatrixError::new(StatusCode::UNAUTHORIZED, "M_MISSING_TOKEN", "missing access token")
        })?;

    let mut hs = db.write().await;
    match hs.tokens.remove(token) {
        Some(user_id) => {
            info!(%user_id, "logged out");
            Ok(Json(json!({})))
        }
        None => {
            debug!("logout with unknown token");
            Err(MatrixError::new(
                StatusCode::UNAUTHORIZED,
                "M_UNKNOWN_TOKEN",
                "unrecognised access token",
            ))
        }
    }
}

// The guest flow posts no body at all, so the payload is parsed by hand.
async fn register(
    State(db): State<Db>,
    Query(params): Query<RegisterParams>,
    body: Bytes,
) -> Result<Response, MatrixError> {
    if params.kind.as_deref() == Some("guest") {
        let mut hs = db.write().await;
        let localpart = hs.allocate_guest();
        let user_id = hs.user_id(&localpart);
        let session = hs.open_session(user_id);
        info!(user_id = %session.user_id, "registered guest");
        return Ok(Json(session).into_response());
    }

    let input: RegisterRequest = if body.is_empty() {
        RegisterRequest {
            auth: None,
            username: None,
            password: None,
        }
    } else {
        serde_json::from_slice(&body).map_err(|e| MatrixError::bad_json(e.to_string()))?
    };

    // Without auth the server answers with the stages it expects.
    let Some(auth) = input.auth else {
        let flows = json!({ "flows": [{ "stages": ["m.login.dummy"] }], "params": {} });
        return Ok((StatusCode::UNAUTHORIZED, Json(flows)).into_response());
    };
    if auth.auth_type != "m.login.dummy" {
        return Err(MatrixError::new(
            StatusCode::BAD_REQUEST,
            "M_UNRECOGNIZED",
            format!("unsupported auth type: {}", auth.auth_type),
        ));
    }
    let (Some(username), Some(password)) = (input.username, input.password) else {
        return Err(MatrixError::bad_json("username and password are required"));
    };
    if username.is_empty() || username.contains(['@', ':']) {
        return Err(MatrixError::new(
            StatusCode::BAD_REQUEST,
            "M_INVALID_USERNAME",
            "username must be a non-empty localpart without '@' or ':'",
        ));
    }

    let mut hs = db.write().await;
    if hs.users.contains_key(&username) {
        debug!(%username, "registration rejected: name taken");
        return Err(MatrixError::new(
            StatusCode::BAD_REQUEST,
            "M_USER_IN_USE",
            "user ID already taken",
        ));
    }
    hs.users.insert(username.clone(), Some(password));
    let user_id = hs.user_id(&username);
    let session = hs.open_session(user_id);
    info!(user_id = %session.user_id, "registered user");
    Ok(Json(session).into_response())
}

async fn public_rooms(State(db): State<Db>) -> Json<PublicRooms> {
    let hs = db.read().await;
    Json(PublicRooms {
        chunk: hs.rooms.clone(),
        total_room_count_estimate: hs.rooms.len() as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_serializes_to_matrix_envelope() {
        let err = MatrixError::forbidden("nope");
        let json = serde_json::to_value(&err.body).unwrap();
        assert_eq!(json, json!({"errcode": "M_FORBIDDEN", "error": "nope"}));
        assert_eq!(err.status, StatusCode::FORBIDDEN);
    }

    #[test]
    fn localpart_accepts_full_user_id() {
        let hs = Homeserver::new("example.org");
        assert_eq!(hs.localpart("@alice:example.org"), "alice");
        assert_eq!(hs.localpart("alice"), "alice");
        assert_eq!(hs.user_id("alice"), "@alice:example.org");
    }

    #[test]
    fn open_session_records_token() {
        let mut hs = Homeserver::new("localhost");
        let session = hs.open_session("@bob:localhost".to_string());
        assert_eq!(session.device_id.len(), 10);
        assert_eq!(hs.tokens.get(&session.access_token).map(String::as_str), Some("@bob:localhost"));
    }

    #[test]
    fn guest_localparts_skip_taken_names() {
        let mut hs = Homeserver::new("localhost");
        hs.users.insert("1".to_string(), Some("pw".to_string()));
        assert_eq!(hs.allocate_guest(), "2");
        assert_eq!(hs.allocate_guest(), "3");
        assert_eq!(hs.users.get("2"), Some(&None));
    }

    #[test]
    fn sessions_get_distinct_tokens() {
        let mut hs = Homeserver::new("localhost");
        let a = hs.open_session("@a:localhost".to_string());
        let b = hs.open_session("@a:localhost".to_string());
        assert_ne!(a.access_token, b.access_token);
        assert_eq!(hs.tokens.len(), 2);
    }

    #[test]
    fn login_request_reads_type_field() {
        let input: LoginRequest =
            serde_json::from_str(r#"{"type":"m.login.password","user":"alice","password":"pw"}"#)
                .unwrap();
        assert_eq!(input.login_type, "m.login.password");
        assert_eq!(input.user.as_deref(), Some("alice"));
    }

    #[test]
    fn register_request_fields_optional() {
        let input: RegisterRequest = serde_json::from_str("{}").unwrap();
        assert!(input.auth.is_none());
        assert!(input.username.is_none());
    }

    #[test]
    fn seeded_rooms_use_server_name() {
        let hs = Homeserver::new("example.org");
        assert!(hs.rooms.iter().all(|r| r.room_id.ends_with(":example.org")));
    }
}
