//! A local stand-in for the remote item service.
//!
//! Responses are scripted per method and path; every request is recorded so
//! tests can assert on paths, headers, and bodies.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use item_purchase::config::ItemServiceConfig;
use item_purchase::remote::{RemoteError, RestItemService};
use secrecy::SecretString;
use serde_json::Value;
use tokio::task::JoinHandle;

use crate::lock;

/// Path prefix of every service endpoint.
pub const API_PREFIX: &str = "/services/apexrest/item-purchase";

/// Token the stub's clients authenticate with.
pub const TEST_TOKEN: &str = "stub-token-8f3a";

/// A request the stub received.
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub method: Method,
    /// Path relative to [`API_PREFIX`], e.g. `/items/search`.
    pub path: String,
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Debug, Default)]
struct StubState {
    routes: Mutex<BTreeMap<(String, String), (u16, String)>>,
    requests: Mutex<Vec<Recorded>>,
}

/// A running stub server; stops when dropped.
pub struct StubServer {
    addr: SocketAddr,
    state: Arc<StubState>,
    task: JoinHandle<()>,
}

impl StubServer {
    /// Bind to an ephemeral local port and start serving.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn start() -> std::io::Result<Self> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state = Arc::new(StubState::default());

        let app = Router::new().fallback(handle).with_state(state.clone());
        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self { addr, state, task })
    }

    /// Base URL to configure clients with.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    /// A client pointed at this server.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be built.
    pub fn client(&self) -> Result<RestItemService, RemoteError> {
        let config = ItemServiceConfig::new(&self.base_url(), SecretString::from(TEST_TOKEN))
            .map_err(|e| RemoteError::message(0, e.to_string()))?;
        RestItemService::new(&config)
    }

    /// Answer `method path` (relative to [`API_PREFIX`]) with `status` and
    /// a JSON body.
    pub fn respond(&self, method: &Method, path: &str, status: u16, body: &Value) {
        lock(&self.state.routes).insert(
            (method.to_string(), path.to_string()),
            (status, body.to_string()),
        );
    }

    /// Every request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<Recorded> {
        lock(&self.state.requests).clone()
    }

    /// Number of requests received for `method path`.
    #[must_use]
    pub fn hits(&self, method: &Method, path: &str) -> usize {
        lock(&self.state.requests)
            .iter()
            .filter(|r| &r.method == method && r.path == path)
            .count()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn handle(
    State(state): State<Arc<StubState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let path = uri
        .path()
        .strip_prefix(API_PREFIX)
        .unwrap_or_else(|| uri.path())
        .to_string();

    lock(&state.requests).push(Recorded {
        method: method.clone(),
        path: path.clone(),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(String::from),
        body: serde_json::from_str(&body).unwrap_or(Value::Null),
    });

    let scripted = lock(&state.routes)
        .get(&(method.to_string(), path))
        .cloned();
    let (status, body) = scripted.unwrap_or_else(|| {
        (
            404,
            r#"[{"message":"No route","errorCode":"NOT_FOUND"}]"#.to_string(),
        )
    });

    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response()
}
