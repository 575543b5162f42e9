//! Stub FHIR server for running the `patient-search` binary end to end.

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
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// Family name that makes the stub answer 500
pub const FAILING_FAMILY: &str = "ServerError";

// Deliberately unsorted
const PATIENTS: &[(&str, &str, &str)] = &[
    ("John", "Smith", "1970-01-01"),
    ("Adam", "Smith", "1982-05-17"),
    ("Neil", "Peart", "1952-09-12"),
    ("Geddy", "Lee", "1953-07-29"),
];

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub family: Option<String>,
    pub cache_control: Option<String>,
}

pub struct StubServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubServer {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

pub async fn spawn_stub_server() -> StubServer {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/fhir/Patient", get(search_patients))
        .with_state(requests.clone());

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind stub server");
    let addr = listener.local_addr().expect("stub server has no address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server failed");
    });

    StubServer {
        base_url: format!("http://{addr}/fhir"),
        requests,
    }
}

async fn search_patients(
    State(requests): State<Arc<Mutex<Vec<RecordedRequest>>>>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let family = params.get("family").cloned().unwrap_or_default();
    requests.lock().unwrap().push(RecordedRequest {
        family: params.get("family").cloned(),
        cache_control: headers
            .get(header::CACHE_CONTROL)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    });

    if family == FAILING_FAMILY {
        let outcome = json!({
            "resourceType": "OperationOutcome",
            "issue": [{"severity": "error", "code": "exception"}]
        });
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(outcome)).into_response();
    }

    let entries: Vec<Value> = PATIENTS
        .iter()
        .filter(|(_, last, _)| !family.is_empty() && last.eq_ignore_ascii_case(&family))
        .map(|(given, last, birth_date)| {
            json!({
                "resource": {
                    "resourceType": "Patient",
                    "name": [{"family": last, "given": [given]}],
                    "birthDate": birth_date
                },
                "search": {"mode": "match"}
            })
        })
        .collect();

    Json(json!({
        "resourceType": "Bundle",
        "type": "searchset",
        "total": entries.len(),
        "entry": entries
    }))
    .into_response()
}
