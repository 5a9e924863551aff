//! In-process stand-in for the TrueNAS REST API
//!
//! Routes are matched on method plus the raw (still percent-encoded) path.
//! Every request is recorded so tests can assert on what the client sent.

#![allow(dead_code)]

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    Router,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tnmanage::config::{EnvVars, Settings, StoredConfig};
use tnmanage::truenas::TrueNasClient;

pub const TOKEN: &str = "1-test-api-key";

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Option<Value>,
}

#[derive(Default)]
struct MockState {
    routes: HashMap<(String, String), (u16, String)>,
    requests: Vec<RecordedRequest>,
}

pub struct MockTrueNas {
    pub url: String,
    state: Arc<Mutex<MockState>>,
}

impl MockTrueNas {
    pub async fn start() -> Self {
        let state = Arc::new(Mutex::new(MockState::default()));
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock server");
        let addr = listener.local_addr().expect("No local address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Mock server failed");
        });

        Self {
            url: format!("http://{}", addr),
            state,
        }
    }

    /// Reply to `method path` (path below `/api/v2.0`) with a JSON body
    pub fn respond(&self, method: &str, path: &str, status: u16, body: Value) -> &Self {
        self.respond_raw(method, path, status, &body.to_string())
    }

    pub fn respond_raw(&self, method: &str, path: &str, status: u16, body: &str) -> &Self {
        self.state.lock().unwrap().routes.insert(
            (method.to_string(), format!("/api/v2.0{}", path)),
            (status, body.to_string()),
        );
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn client(&self) -> TrueNasClient {
        TrueNasClient::with_params(&self.url, TOKEN).expect("Failed to build client")
    }

    /// Settings that point at this server through the config file layer only
    pub fn settings(&self) -> Settings {
        Settings::new(
            StoredConfig {
                url: Some(self.url.clone()),
                api_key: Some(TOKEN.to_string()),
            },
            EnvVars::default(),
        )
    }
}

async fn handle(
    State(state): State<Arc<Mutex<MockState>>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, String) {
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let recorded = RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        authorization: header_value(header::AUTHORIZATION),
        content_type: header_value(header::CONTENT_TYPE),
        body: serde_json::from_slice(&body).ok(),
    };

    let mut state = state.lock().unwrap();
    let reply = state
        .routes
        .get(&(recorded.method.clone(), recorded.path.clone()))
        .cloned();
    state.requests.push(recorded);

    match reply {
        Some((status, body)) => (
            StatusCode::from_u16(status).expect("Invalid status in test"),
            body,
        ),
        None => (StatusCode::NOT_FOUND, "no route".to_string()),
    }
}
