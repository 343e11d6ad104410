//! 端到端支付流程测试
//!
//! 通过完整的 axum 应用 (路由 + 中间件) 驱动结账发起与网关回调，
//! 使用 mock 网关与 mock 身份服务，订单存储落在临时目录。

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use tower::ServiceExt;

use karya_server::api;
use karya_server::auth::MockAuthProvider;
use karya_server::catalog::ProjectCatalog;
use karya_server::core::{Config, ServerState};
use karya_server::gateway::MockGateway;
use karya_server::payments::OrderStore;
use karya_server::payments::signature::expected_signature;
use shared::payment::{OrderRecord, PaymentStatus};

const SERVER_KEY: &str = "SB-Mid-server-test-key";

struct TestApp {
    app: Router,
    gateway: Arc<MockGateway>,
    // 保持临时目录存活到测试结束
    _work_dir: tempfile::TempDir,
}

fn test_app() -> TestApp {
    let work_dir = tempfile::tempdir().unwrap();

    let mut config = Config::with_overrides(work_dir.path().to_string_lossy(), 0);
    config.gateway_server_key = SERVER_KEY.to_string();
    config.ensure_work_dir_structure().unwrap();

    let orders = OrderStore::open(config.orders_db_path()).unwrap();
    let gateway = Arc::new(MockGateway::new());

    let state = ServerState::with_parts(
        config,
        orders,
        Arc::new(ProjectCatalog::with_mock_data()),
        gateway.clone(),
        Arc::new(MockAuthProvider::new()),
    );

    TestApp {
        app: api::build_app(state),
        gateway,
        _work_dir: work_dir,
    }
}

async fn send_json(app: &Router, method: &str, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn send_get(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}

fn initiate_body(project_id: &str, gross_amount: u64) -> serde_json::Value {
    serde_json::json!({
        "project_id": project_id,
        "gross_amount": gross_amount,
        "customer_details": {
            "first_name": "Budi",
            "last_name": "Santoso",
            "email": "budi.santoso@example.com",
            "phone": "08123456789"
        }
    })
}

fn notification_body(
    order_id: &str,
    gross_amount: &str,
    transaction_id: &str,
    status: &str,
    fraud: Option<&str>,
) -> serde_json::Value {
    let signature = expected_signature(order_id, "200", gross_amount, SERVER_KEY);
    let mut body = serde_json::json!({
        "order_id": order_id,
        "transaction_id": transaction_id,
        "status_code": "200",
        "gross_amount": gross_amount,
        "signature_key": signature,
        "transaction_status": status,
    });
    if let Some(f) = fraud {
        body["fraud_status"] = serde_json::Value::String(f.to_string());
    }
    body
}

async fn fetch_order(app: &Router, order_id: &str) -> OrderRecord {
    let (status, json) = send_get(app, &format!("/api/transactions/{order_id}")).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_value(json).unwrap()
}

#[tokio::test]
async fn checkout_settlement_and_replay() {
    let t = test_app();

    // 发起结账
    let (status, json) = send_json(&t.app, "POST", "/api/transactions", initiate_body("2", 2_500_000)).await;
    assert_eq!(status, StatusCode::OK);
    let order_id = json["orderId"].as_str().unwrap().to_string();
    assert!(order_id.starts_with("ORDER-"));
    assert!(json["token"].as_str().unwrap().starts_with("mock-token-"));
    assert!(!json["redirect_url"].as_str().unwrap().is_empty());

    let record = fetch_order(&t.app, &order_id).await;
    assert_eq!(record.status, PaymentStatus::Created);
    assert!(record.session_token.is_some());

    // settlement 回调
    let (status, _) = send_json(
        &t.app,
        "POST",
        "/api/transactions/notification",
        notification_body(&order_id, "2500000.00", "e1", "settlement", None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let record = fetch_order(&t.app, &order_id).await;
    assert_eq!(record.status, PaymentStatus::Success);
    let applied_before = record.status_history.len();

    // 重投同一事件：状态不变，仅追加重复标记
    let (status, _) = send_json(
        &t.app,
        "POST",
        "/api/transactions/notification",
        notification_body(&order_id, "2500000.00", "e1", "settlement", None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let record = fetch_order(&t.app, &order_id).await;
    assert_eq!(record.status, PaymentStatus::Success);
    assert_eq!(record.status_history.len(), applied_before + 1);
    assert!(record.status_history.last().unwrap().duplicate);
}

#[tokio::test]
async fn fraud_challenge_then_manual_accept() {
    let t = test_app();

    let (_, json) = send_json(&t.app, "POST", "/api/transactions", initiate_body("2", 2_500_000)).await;
    let order_id = json["orderId"].as_str().unwrap().to_string();

    let (status, _) = send_json(
        &t.app,
        "POST",
        "/api/transactions/notification",
        notification_body(&order_id, "2500000.00", "txn-1", "capture", Some("challenge")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetch_order(&t.app, &order_id).await.status, PaymentStatus::Challenge);

    let (status, _) = send_json(
        &t.app,
        "POST",
        "/api/transactions/notification",
        notification_body(&order_id, "2500000.00", "txn-1", "capture", Some("accept")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetch_order(&t.app, &order_id).await.status, PaymentStatus::Success);
}

#[tokio::test]
async fn expired_order_locks_out_late_settlement() {
    let t = test_app();

    let (_, json) = send_json(&t.app, "POST", "/api/transactions", initiate_body("3", 1_500_000)).await;
    let order_id = json["orderId"].as_str().unwrap().to_string();

    let (status, _) = send_json(
        &t.app,
        "POST",
        "/api/transactions/notification",
        notification_body(&order_id, "1500000.00", "e1", "expire", None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetch_order(&t.app, &order_id).await.status, PaymentStatus::Expired);

    // 迟到的 settlement 被终态保护拒绝，但仍须确认
    let (status, _) = send_json(
        &t.app,
        "POST",
        "/api/transactions/notification",
        notification_body(&order_id, "1500000.00", "e2", "settlement", None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetch_order(&t.app, &order_id).await.status, PaymentStatus::Expired);
}

#[tokio::test]
async fn tampered_signature_is_rejected() {
    let t = test_app();

    let (_, json) = send_json(&t.app, "POST", "/api/transactions", initiate_body("2", 2_500_000)).await;
    let order_id = json["orderId"].as_str().unwrap().to_string();

    let mut body = notification_body(&order_id, "2500000.00", "e1", "settlement", None);
    body["signature_key"] = serde_json::Value::String("deadbeef".to_string());

    let (status, _) = send_json(&t.app, "POST", "/api/transactions/notification", body).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert_eq!(fetch_order(&t.app, &order_id).await.status, PaymentStatus::Created);
}

#[tokio::test]
async fn amount_mismatch_is_acked_but_not_applied() {
    let t = test_app();

    let (_, json) = send_json(&t.app, "POST", "/api/transactions", initiate_body("2", 2_500_000)).await;
    let order_id = json["orderId"].as_str().unwrap().to_string();

    // 签名有效但金额与订单不符
    let (status, _) = send_json(
        &t.app,
        "POST",
        "/api/transactions/notification",
        notification_body(&order_id, "1.00", "e1", "settlement", None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let record = fetch_order(&t.app, &order_id).await;
    assert_eq!(record.status, PaymentStatus::Created);
    assert_eq!(record.status_history.len(), 1);
}

#[tokio::test]
async fn initiate_rejects_bad_input() {
    let t = test_app();

    let (status, _) = send_json(&t.app, "POST", "/api/transactions", initiate_body("2", 0)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send_json(&t.app, "POST", "/api/transactions", initiate_body("42", 1_000)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn gateway_failure_is_retryable_and_leaves_created_order() {
    let t = test_app();
    t.gateway.set_fail(true);

    let (status, json) = send_json(&t.app, "POST", "/api/transactions", initiate_body("2", 2_500_000)).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["code"].as_str().unwrap(), "E7001");

    // 重试成功
    t.gateway.set_fail(false);
    let (status, _) = send_json(&t.app, "POST", "/api/transactions", initiate_body("2", 2_500_000)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn catalog_and_health_endpoints() {
    let t = test_app();

    let (status, json) = send_get(&t.app, "/api/projects").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 3);

    let (status, json) = send_get(&t.app, "/api/projects/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["budget"].as_u64().unwrap(), 2_500_000);

    let (status, json) = send_get(&t.app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"].as_str().unwrap(), "healthy");
}

#[tokio::test]
async fn register_login_and_post_project() {
    let t = test_app();

    let (status, json) = send_json(
        &t.app,
        "POST",
        "/api/auth/register",
        serde_json::json!({
            "email": "ayu@example.com",
            "password": "rahasia-kuat",
            "first_name": "Ayu",
            "last_name": "Lestari",
            "user_type": "klien"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["email"].as_str().unwrap(), "ayu@example.com");

    let (status, json) = send_json(
        &t.app,
        "POST",
        "/api/auth/login",
        serde_json::json!({ "email": "ayu@example.com", "password": "rahasia-kuat" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = json["access_token"].as_str().unwrap().to_string();

    // 未带令牌发布项目 → 401
    let project_body = serde_json::json!({
        "title": "Mural for Cafe",
        "description": "Wall mural, 3x5m",
        "budget": 3_000_000u64,
        "category": "Mural",
        "deadline": null
    });
    let request = Request::builder()
        .method("POST")
        .uri("/api/projects")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(project_body.to_string()))
        .unwrap();
    let (status, _) = send(&t.app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // 带令牌发布项目
    let request = Request::builder()
        .method("POST")
        .uri("/api/projects")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(project_body.to_string()))
        .unwrap();
    let (status, json) = send(&t.app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["title"].as_str().unwrap(), "Mural for Cafe");

    // /api/auth/me 返回会话上下文
    let request = Request::builder()
        .uri("/api/auth/me")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(&t.app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["user_type"].as_str().unwrap(), "klien");
}

#[tokio::test]
async fn unknown_order_notification_is_acknowledged() {
    let t = test_app();

    let (status, _) = send_json(
        &t.app,
        "POST",
        "/api/transactions/notification",
        notification_body("ORDER-missing", "100.00", "e1", "settlement", None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}
