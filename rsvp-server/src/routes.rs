//! HTTP route handlers for the RSVP API.

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use rsvp::core::types::{AttendanceUpdate, Guest};
use rsvp::messages;
use serde::Serialize;
use tracing::{error, info};

use crate::state::AppState;

/// Build the API router.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/fetch", get(fetch))
        .route("/submit", post(submit))
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

type ApiError = (StatusCode, Json<MessageResponse>);

async fn health() -> &'static str {
    "ok"
}

/// GET /fetch - current guests and their replies.
async fn fetch(State(state): State<AppState>) -> Result<Json<Vec<Guest>>, ApiError> {
    match state.service.fetch().await {
        Ok(guests) => Ok(Json(guests)),
        Err(err) => {
            error!(error = %err, "fetch failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                MessageResponse::new(err.user_message()),
            ))
        }
    }
}

/// POST /submit - store a batch of attendance answers.
async fn submit(
    State(state): State<AppState>,
    Json(updates): Json<Vec<AttendanceUpdate>>,
) -> Result<Json<MessageResponse>, ApiError> {
    match state.service.submit(&updates).await {
        Ok(report) => {
            info!(
                updated = report.updated.len(),
                unmatched = report.unmatched.len(),
                "submit handled"
            );
            Ok(MessageResponse::new(messages::WRITE_SUCCESS))
        }
        Err(err) => {
            error!(error = %err, "submit failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                MessageResponse::new(err.user_message()),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Method, Request, header};
    use rsvp::io::config::RsvpConfig;
    use rsvp::io::store::{MemoryStore, SheetStore};
    use rsvp::service::RsvpService;
    use rsvp::test_support::{FailingStore, header_row, sheet_row, update};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;

    fn state(store: Arc<dyn SheetStore>) -> AppState {
        AppState::new(RsvpService::new(store, &RsvpConfig::default()))
    }

    fn app(store: Arc<dyn SheetStore>) -> Router {
        api_router().with_state(state(store))
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request")
    }

    /// Send `request` and return the status plus the raw body.
    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.oneshot(request).await.expect("response");
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        (status, body.to_vec())
    }

    fn seeded() -> Arc<MemoryStore> {
        Arc::new(MemoryStore::new(vec![
            header_row(),
            sheet_row(3, "ceremony", ["", "", "", ""]),
            sheet_row(7, "city_hall, DINER", ["", "", "", ""]),
        ]))
    }

    #[tokio::test]
    async fn router_serves_health() {
        let (status, body) = send(app(seeded()), get_request("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"ok");
    }

    #[tokio::test]
    async fn router_fetch_returns_guest_json() {
        let (status, body) = send(app(seeded()), get_request("/fetch")).await;
        assert_eq!(status, StatusCode::OK);
        let guests: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(guests[1]["id"], 7);
        assert_eq!(guests[1]["invitedFor"], serde_json::json!(["city_hall", "diner"]));
        assert_eq!(guests[1]["alreadyReplied"], false);
    }

    #[tokio::test]
    async fn router_fetch_failure_is_500_message() {
        let app = app(Arc::new(FailingStore::failing_reads()));
        let (status, body) = send(app, get_request("/fetch")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(body["message"], messages::READ_ERROR);
    }

    #[tokio::test]
    async fn router_submit_parses_body_and_writes() {
        let store = seeded();
        let payload = r#"[
            {"guest": {"id": 7, "firstName": "First7"}, "city_hall": "COMING",
             "ceremony": "NO", "diner": "NO", "party": "NO", "remarks": "vegetarian"},
            {"guest": {"id": null}, "city_hall": "COMING", "ceremony": "COMING",
             "diner": "COMING", "party": "COMING", "remarks": ""}
        ]"#;
        let (status, body) = send(app(store.clone()), post_json("/submit", payload)).await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(body["message"], messages::WRITE_SUCCESS);
        assert_eq!(store.snapshot()[2][10], "vegetarian");
    }

    #[tokio::test]
    async fn router_submit_rejects_non_list_body() {
        let (status, _) = send(app(seeded()), post_json("/submit", r#"{"guest": 1}"#)).await;
        assert!(status.is_client_error());
    }

    #[tokio::test]
    async fn router_routes_methods() {
        let (status, _) = send(app(seeded()), get_request("/submit")).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        let (status, _) = send(app(seeded()), post_json("/fetch", "[]")).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn fetch_returns_guests() {
        let store = Arc::new(MemoryStore::new(vec![
            header_row(),
            sheet_row(3, "ceremony", ["", "", "", ""]),
        ]));
        let Json(guests) = fetch(State(state(store))).await.expect("fetch");
        assert_eq!(guests.len(), 1);
        assert_eq!(guests[0].id, Some(3));
    }

    #[tokio::test]
    async fn fetch_failure_is_500_with_message() {
        let (status, Json(body)) = fetch(State(state(Arc::new(FailingStore::failing_reads()))))
            .await
            .expect_err("fetch fails");
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.message, messages::READ_ERROR);
    }

    #[tokio::test]
    async fn submit_success_reports_message() {
        let store = Arc::new(MemoryStore::new(vec![
            header_row(),
            sheet_row(7, "city_hall", ["", "", "", ""]),
        ]));
        let Json(body) = submit(
            State(state(store)),
            Json(vec![update(7, ["COMING", "NO", "NO", "NO"], "")]),
        )
        .await
        .expect("submit");
        assert_eq!(body.message, messages::WRITE_SUCCESS);
    }

    #[tokio::test]
    async fn submit_write_failure_is_500() {
        let store = Arc::new(FailingStore::failing_writes(vec![
            header_row(),
            sheet_row(7, "city_hall", ["", "", "", ""]),
        ]));
        let (status, Json(body)) = submit(
            State(state(store)),
            Json(vec![update(7, ["COMING", "NO", "NO", "NO"], "")]),
        )
        .await
        .expect_err("submit fails");
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.message, messages::WRITE_ERROR);
    }

    #[tokio::test]
    async fn submit_read_failure_is_500() {
        let (status, Json(body)) = submit(
            State(state(Arc::new(FailingStore::failing_reads()))),
            Json(vec![update(7, ["COMING", "NO", "NO", "NO"], "")]),
        )
        .await
        .expect_err("submit fails");
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.message, messages::READ_ERROR);
    }
}
