use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use console_core::{
    schema::MEMBER_SCHEMA, AdminBackend, FormController, HttpBackend, ListController,
    RefreshOutcome, SubmitOutcome, TokenSession,
};
use serde_json::{json, Map, Value};
use shared::{domain::Member, protocol::StatusFlag};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone)]
struct Store {
    members: Arc<Mutex<Vec<Value>>>,
    updates: Arc<Mutex<Vec<Value>>>,
}

async fn all_members(State(store): State<Store>) -> Json<Value> {
    let members = store.members.lock().await.clone();
    Json(json!({ "success": true, "data": { "members": members } }))
}

async fn one_member(State(store): State<Store>, Path(id): Path<String>) -> (StatusCode, Json<Value>) {
    let members = store.members.lock().await;
    match members.iter().find(|member| member["_id"] == json!(id)) {
        Some(member) => (StatusCode::OK, Json(json!({ "data": { "member": member } }))),
        None => (StatusCode::NOT_FOUND, Json(json!({ "message": "Member not found" }))),
    }
}

fn merge(store: &mut [Value], id: &Value, fields: &Map<String, Value>) {
    if let Some(Value::Object(member)) = store.iter_mut().find(|member| &member["_id"] == id) {
        for (key, value) in fields {
            if key != "id" {
                member.insert(key.clone(), value.clone());
            }
        }
    }
}

async fn update_member(State(store): State<Store>, Json(body): Json<Value>) -> Json<Value> {
    store.updates.lock().await.push(body.clone());
    if let Value::Object(fields) = &body {
        merge(&mut store.members.lock().await, &body["id"], fields);
    }
    Json(json!({ "success": true }))
}

async fn block_member(State(store): State<Store>, Json(body): Json<Value>) -> Json<Value> {
    let mut fields = Map::new();
    fields.insert("isBlocked".into(), body["newValue"].clone());
    merge(&mut store.members.lock().await, &body["id"], &fields);
    Json(json!({ "success": true }))
}

async fn spawn_backend() -> (String, Store) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let members = (1..=12)
        .map(|n| {
            json!({
                "_id": format!("m{n}"),
                "name": format!("Member {n}"),
                "email": format!("member{n}@example.com"),
                "phone": format!("98765432{n:02}"),
                "role": if n % 4 == 0 { "distributor" } else { "retailer" },
                "walletBalance": n * 100,
                "isBlocked": false,
                "kycStatus": "pending"
            })
        })
        .collect();
    let store = Store {
        members: Arc::new(Mutex::new(members)),
        updates: Arc::new(Mutex::new(Vec::new())),
    };

    let app = Router::new()
        .route("/api/member/get/all", get(all_members))
        .route("/api/member/get/member/:id", get(one_member))
        .route("/api/member/update", put(update_member))
        .route("/api/member/block", put(block_member))
        .with_state(store.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}/api"), store)
}

#[tokio::test]
async fn list_edit_and_refresh_round_trip() {
    let (base_url, store) = spawn_backend().await;
    let backend = HttpBackend::new(&base_url, Arc::new(TokenSession::new("operator-token")))
        .expect("backend");

    let mut members = ListController::<Member>::new(5);
    assert_eq!(
        members.refresh(&backend).await.expect("refresh"),
        RefreshOutcome::Applied(12)
    );
    assert_eq!(members.total_pages(), 3);

    members.set_category("role", "distributor");
    let view = members.view();
    assert_eq!(view.total_count, 3);
    let target = view.items[0].id.to_string();
    assert_eq!(target, "m4");

    let mut form = FormController::new(&MEMBER_SCHEMA);
    form.open(&backend, &target).await.expect("open");
    form.set_field("walletBalance", json!("975.25")).expect("set");
    let outcome = form.submit(&backend).await.expect("submit");
    assert!(matches!(outcome, SubmitOutcome::Saved { .. }));
    assert_eq!(
        store.updates.lock().await.clone(),
        vec![json!({ "id": "m4", "walletBalance": 975.25 })]
    );

    form.toggle(&backend, StatusFlag::Blocked, json!(true))
        .await
        .expect("block");

    members.refresh(&backend).await.expect("refresh again");
    let updated = members.find("m4").expect("m4");
    assert_eq!(updated.wallet_balance, 975.25);
    assert!(updated.is_blocked);
    assert_eq!(members.page(), 1);
}

#[tokio::test]
async fn missing_record_reports_server_message() {
    let (base_url, _store) = spawn_backend().await;
    let backend = HttpBackend::new(&base_url, Arc::new(TokenSession::new("operator-token")))
        .expect("backend");

    let raw = backend.get_all(shared::protocol::Resource::MEMBER).await.expect("list");
    assert_eq!(raw["data"]["members"].as_array().map(Vec::len), Some(12));

    let mut form = FormController::new(&MEMBER_SCHEMA);
    let err = form.open(&backend, "m99").await.expect_err("missing");
    assert_eq!(err.user_message(), "Member not found");
    assert!(!form.is_open());
}
