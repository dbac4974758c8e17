use super::*;
use crate::{
    error::ErrorCategory,
    session::{AnonymousSession, TokenSession},
};
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::json;
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone, Default)]
struct ServerState {
    seen: Arc<Mutex<Vec<(String, Option<String>, Value)>>>,
}

impl ServerState {
    async fn record(&self, route: &str, headers: &HeaderMap, body: Value) {
        let auth = headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        self.seen.lock().await.push((route.to_string(), auth, body));
    }
}

async fn list_banks(State(state): State<ServerState>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    state.record("list", &headers, Value::Null).await;
    if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some("Bearer tok-1") {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Unauthorized" })));
    }
    (
        StatusCode::OK,
        Json(json!({ "data": { "banks": [{ "_id": "b1", "bankName": "State Bank" }] } })),
    )
}

async fn create_limit(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.record("create", &headers, body).await;
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "message": "E11000 duplicate key error collection: app.limits index: service_1 dup key: { service: \"AEPS\" }"
        })),
    )
}

async fn update_member(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    state.record("update", &headers, body).await;
    Json(json!({ "success": true }))
}

async fn block_member(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    state.record("block", &headers, body).await;
    Json(json!({ "success": true }))
}

async fn delete_bank(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> StatusCode {
    state.record("delete", &headers, Value::String(id)).await;
    StatusCode::NO_CONTENT
}

async fn spawn_api() -> anyhow::Result<(String, ServerState)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = ServerState::default();
    let app = Router::new()
        .route("/api/bank/get/all", get(list_banks))
        .route("/api/bank/delete/:id", delete(delete_bank))
        .route("/api/limit/create", post(create_limit))
        .route("/api/member/update", put(update_member))
        .route("/api/member/block", put(block_member))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}/api/"), state))
}

fn backend(base_url: &str, token: &str) -> HttpBackend {
    HttpBackend::new(base_url, Arc::new(TokenSession::new(token))).expect("backend")
}

#[tokio::test]
async fn list_request_carries_bearer_token() {
    let (base_url, state) = spawn_api().await.expect("spawn api");
    let raw = backend(&base_url, "tok-1")
        .get_all(Resource::BANK)
        .await
        .expect("list");

    assert_eq!(raw["data"]["banks"][0]["_id"], json!("b1"));
    let seen = state.seen.lock().await;
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].1.as_deref(), Some("Bearer tok-1"));
}

#[tokio::test]
async fn rejected_request_surfaces_server_message() {
    let (base_url, _state) = spawn_api().await.expect("spawn api");
    let err = backend(&base_url, "wrong")
        .get_all(Resource::BANK)
        .await
        .expect_err("unauthorized");

    match &err {
        ConsoleError::Server { status, message } => {
            assert_eq!(*status, 401);
            assert_eq!(message, "Unauthorized");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn missing_token_never_reaches_the_network() {
    let (base_url, state) = spawn_api().await.expect("spawn api");
    let backend = HttpBackend::new(&base_url, Arc::new(AnonymousSession)).expect("backend");

    let err = backend.get_all(Resource::BANK).await.expect_err("no session");
    assert!(matches!(err, ConsoleError::MissingSession));
    assert!(state.seen.lock().await.is_empty());
}

#[tokio::test]
async fn duplicate_limit_message_is_kept_verbatim_and_friendly_on_request() {
    let (base_url, state) = spawn_api().await.expect("spawn api");
    let err = backend(&base_url, "tok-1")
        .create(Resource::LIMIT, &json!({ "service": "AEPS" }))
        .await
        .expect_err("conflict");

    assert!(err.to_string().starts_with("E11000 duplicate key"));
    assert_eq!(err.user_message(), "A limit for service 'AEPS' already exists.");
    assert_eq!(err.category(), ErrorCategory::Conflict);
    assert_eq!(state.seen.lock().await[0].2, json!({ "service": "AEPS" }));
}

#[tokio::test]
async fn update_and_flag_requests_send_json_bodies() {
    let (base_url, state) = spawn_api().await.expect("spawn api");
    let backend = backend(&base_url, "tok-1");

    backend
        .update(Resource::MEMBER, &json!({ "id": "m1", "phone": "9876543210" }))
        .await
        .expect("update");
    backend
        .set_flag(
            Resource::MEMBER,
            StatusFlag::Blocked,
            &FlagUpdate {
                id: "m1".into(),
                new_value: json!(true),
            },
        )
        .await
        .expect("block");

    let seen = state.seen.lock().await;
    assert_eq!(seen[0].0, "update");
    assert_eq!(seen[0].2, json!({ "id": "m1", "phone": "9876543210" }));
    assert_eq!(seen[1].0, "block");
    assert_eq!(seen[1].2, json!({ "id": "m1", "newValue": true }));
}

#[tokio::test]
async fn empty_success_body_is_null() {
    let (base_url, state) = spawn_api().await.expect("spawn api");
    let raw = backend(&base_url, "tok-1")
        .delete(Resource::BANK, "b9")
        .await
        .expect("delete");

    assert_eq!(raw, Value::Null);
    assert_eq!(state.seen.lock().await[0].2, json!("b9"));
}

#[test]
fn rejects_unparsable_base_url() {
    let err = HttpBackend::new("not a url", Arc::new(AnonymousSession))
        .err()
        .expect("invalid url");
    assert!(matches!(err, ConsoleError::InvalidBaseUrl(_)));
}

#[tokio::test]
async fn id_with_reserved_characters_stays_one_segment() {
    let (base_url, state) = spawn_api().await.expect("spawn api");
    backend(&base_url, "tok-1")
        .delete(Resource::BANK, "a/b?c")
        .await
        .expect("delete");

    assert_eq!(state.seen.lock().await[0].2, json!("a/b?c"));
}
