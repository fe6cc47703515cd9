// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use cad_dispatch_domain::CadSettings;
use cad_dispatch_persistence::Persistence;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower::ServiceExt;

use crate::live::LiveEventBroadcaster;
use crate::notify::Notifier;
use crate::{AppState, build_router};

/// Helper to create test app state with in-memory persistence.
pub fn create_test_app_state() -> AppState {
    let persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to create in-memory persistence");
    AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        settings: Arc::new(CadSettings::default()),
        notifier: Notifier::new(Arc::new(LiveEventBroadcaster::new()), None),
    }
}

/// Sends a request and returns the status with the decoded JSON body
/// (`Value::Null` for an empty body).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body: Body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_string(&value).unwrap())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status: StatusCode = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value: Value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// A router over a fresh database seeded with on-duty, off-duty and panic
/// status codes.
pub struct TestServer {
    pub app: Router,
    pub state: AppState,
    pub on_duty: String,
    pub off_duty: String,
}

impl TestServer {
    pub async fn new() -> Self {
        let state: AppState = create_test_app_state();
        let app: Router = build_router(state.clone());
        let on_duty: String = create_status(&app, "10-8", "SET_ON_DUTY", 1).await;
        let off_duty: String = create_status(&app, "10-7", "SET_OFF_DUTY", 2).await;
        create_status(&app, "PANIC", "PANIC_BUTTON", 3).await;
        Self {
            app,
            state,
            on_duty,
            off_duty,
        }
    }

    pub async fn unit(&self, callsign: &str, callsign2: &str, user_id: &str) -> String {
        let (status, body) = send(
            &self.app,
            "POST",
            "/units",
            Some(json!({
                "discipline": "LEO",
                "callsign": callsign,
                "callsign2": callsign2,
                "user_id": user_id,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }

    pub async fn on_duty_unit(&self, callsign: &str, callsign2: &str, user_id: &str) -> String {
        let id: String = self.unit(callsign, callsign2, user_id).await;
        let (status, _) = send(
            &self.app,
            "PUT",
            &format!("/units/{id}/status"),
            Some(json!({ "status_id": self.on_duty, "requested_by": user_id })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        id
    }

    pub async fn call(&self, location: &str) -> String {
        let (status, body) = send(
            &self.app,
            "POST",
            "/calls",
            Some(json!({ "location": location })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }
}

async fn create_status(app: &Router, value: &str, should_do: &str, position: i32) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/status-codes",
        Some(json!({ "value": value, "should_do": should_do, "position": position })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}
