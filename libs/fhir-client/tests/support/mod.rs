//! In-process stub FHIR server for client tests.
//!
//! Serves `GET /fhir/Patient` from a fixed patient list. Requests carrying
//! `Cache-Control: no-cache` are delayed by [`UNCACHED_DELAY`] to stand in for
//! a server that had to run the query instead of answering from its cache.

#![allow(dead_code)]

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

pub const UNCACHED_DELAY: Duration = Duration::from_millis(50);

/// Family name that makes the stub answer 500
pub const FAILING_FAMILY: &str = "ServerError";

const PATIENTS: &[(&str, &str, &str)] = &[
    ("John", "Smith", "1970-01-01"),
    ("Jane", "Smith", "1982-05-17"),
    ("Neil", "Peart", "1952-09-12"),
    ("Geddy", "Lee", "1953-07-29"),
    ("Alex", "Lifeson", "1953-08-27"),
];

/// One request as seen by the stub.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub family: Option<String>,
    pub cache_control: Option<String>,
    pub accept: Option<String>,
}

#[derive(Clone, Default)]
pub struct StubState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

pub struct StubServer {
    pub base_url: String,
    state: StubState,
}

impl StubServer {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }
}

pub fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Start the stub on an ephemeral port; it lives until the test runtime ends.
pub async fn spawn_stub_server() -> StubServer {
    let state = StubState::default();
    let app = Router::new()
        .route("/fhir/Patient", get(search_patients))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind stub server");
    let addr = listener.local_addr().expect("stub server has no address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server failed");
    });

    StubServer {
        base_url: format!("http://{addr}/fhir"),
        state,
    }
}

async fn search_patients(
    State(state): State<StubState>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let header_str = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let cache_control = header_str(header::CACHE_CONTROL);
    let family = params.get("family").cloned();

    state.requests.lock().unwrap().push(RecordedRequest {
        family: family.clone(),
        cache_control: cache_control.clone(),
        accept: header_str(header::ACCEPT),
    });

    if cache_control.as_deref().is_some_and(|v| v.contains("no-cache")) {
        tokio::time::sleep(UNCACHED_DELAY).await;
    }

    let family = family.unwrap_or_default();
    if family == FAILING_FAMILY {
        let outcome = json!({
            "resourceType": "OperationOutcome",
            "issue": [{"severity": "error", "code": "exception"}]
        });
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(outcome)).into_response();
    }

    Json(searchset(&family)).into_response()
}

/// Case-insensitive "starts with" match; an empty family matches nothing.
fn searchset(family: &str) -> Value {
    let needle = family.to_lowercase();
    let entries: Vec<Value> = PATIENTS
        .iter()
        .enumerate()
        .filter(|_| !needle.is_empty())
        .filter(|(_, (_, last, _))| last.to_lowercase().starts_with(&needle))
        .map(|(id, (given, last, birth_date))| {
            json!({
                "fullUrl": format!("http://stub/fhir/Patient/{id}"),
                "resource": {
                    "resourceType": "Patient",
                    "id": id.to_string(),
                    "name": [{"family": last, "given": [given]}],
                    "birthDate": birth_date
                },
                "search": {"mode": "match"}
            })
        })
        .collect();

    json!({
        "resourceType": "Bundle",
        "type": "searchset",
        "total": entries.len(),
        "entry": entries
    })
}
