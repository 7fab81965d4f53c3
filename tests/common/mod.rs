//! In-process stand-in for the schema registry API.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::sync::oneshot;

pub const TOKEN: &str = "test-token";
pub const SCHEMA_ID: &str = "4b1d3c4e-0000-4000-8000-000000000001";

/// How the mock registry should answer
#[derive(Clone, Debug)]
pub struct Behavior {
    /// Type reported for the existing schema
    pub schema_type: String,
    /// Raw body returned by `GET /v1/schema/{id}` instead of a schema
    pub schema_body: Option<String>,
    /// Status returned by `PUT /v1/schema`
    pub update_status: StatusCode,
}

impl Default for Behavior {
    fn default() -> Self {
        Behavior {
            schema_type: "protobuf".to_string(),
            schema_body: None,
            update_status: StatusCode::OK,
        }
    }
}

#[derive(Clone)]
struct MockState {
    behavior: Behavior,
    calls: Arc<Mutex<Vec<String>>>,
    updates: Arc<Mutex<Vec<Value>>>,
}

pub struct MockRegistry {
    base_url: String,
    calls: Arc<Mutex<Vec<String>>>,
    updates: Arc<Mutex<Vec<Value>>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockRegistry {
    /// Start the mock on `127.0.0.1:0`
    pub async fn start(behavior: Behavior) -> Self {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let updates = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            behavior,
            calls: calls.clone(),
            updates: updates.clone(),
        };

        let app = Router::new()
            .route("/v1/account", get(account))
            .route("/v1/schema/:id", get(get_schema))
            .route("/v1/schema", put(update_schema))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            let server = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });
            let _ = server.await;
        });

        MockRegistry {
            base_url,
            calls,
            updates,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `METHOD /path` of every request received, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// JSON bodies received on `PUT /v1/schema`
    pub fn updates(&self) -> Vec<Value> {
        self.updates.lock().unwrap().clone()
    }
}

impl Drop for MockRegistry {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

pub fn schema_json(id: &str, name: &str, schema_type: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "root_type": "acme.orders.v1.Order",
        "type": schema_type,
        "team_id": "team-1",
        "shared": false,
        "archived": false,
        "proto_files": [{
            "id": "pf-1",
            "file_name": "orders.proto",
            "contents": "syntax = \"proto3\";",
            "schema_id": id,
            "inserted_at": "2023-05-01T12:00:00Z",
            "updated_at": "2023-05-01T12:00:00Z"
        }],
        "inserted_at": "2023-05-01T12:00:00Z",
        "updated_at": "2023-05-02T08:30:00Z"
    })
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {TOKEN}"))
        .unwrap_or(false)
}

fn record(state: &MockState, call: String) {
    state.calls.lock().unwrap().push(call);
}

async fn account(State(state): State<MockState>, headers: HeaderMap) -> (StatusCode, String) {
    record(&state, "GET /v1/account".to_string());
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, "invalid token".to_string());
    }
    (StatusCode::OK, json!({"id": "acct-1"}).to_string())
}

async fn get_schema(
    State(state): State<MockState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> (StatusCode, String) {
    record(&state, format!("GET /v1/schema/{id}"));
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, "invalid token".to_string());
    }
    if let Some(body) = &state.behavior.schema_body {
        return (StatusCode::OK, body.clone());
    }
    if id != SCHEMA_ID {
        return (StatusCode::NOT_FOUND, "schema not found".to_string());
    }
    let body = schema_json(&id, "orders", &state.behavior.schema_type);
    (StatusCode::OK, body.to_string())
}

async fn update_schema(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, String) {
    record(&state, "PUT /v1/schema".to_string());
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, "invalid token".to_string());
    }
    state.updates.lock().unwrap().push(body.clone());
    if state.behavior.update_status != StatusCode::OK {
        return (state.behavior.update_status, "upload rejected".to_string());
    }
    let id = body["schema_id"].as_str().unwrap_or_default();
    let name = body["name"].as_str().unwrap_or_default();
    let updated = schema_json(id, name, &state.behavior.schema_type);
    (StatusCode::OK, updated.to_string())
}
