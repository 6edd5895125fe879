use std::time::Duration;

use argon2::{password_hash::SaltString, Argon2, PasswordHasher};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rand::{rngs::OsRng, RngCore};
use septic_server::{api::app_router, build_state, config::Config};
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

const OWNER_EMAIL: &str = "owner@example.com";
const OWNER_PASSWORD: &str = "owner-password";

fn test_config(tmp: &TempDir, secret: Option<String>, owner_hash: Option<String>) -> Config {
    Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        db_path: tmp.path().join("test.db").to_string_lossy().into_owned(),
        upload_dir: tmp.path().join("uploads").to_string_lossy().into_owned(),
        cors_allow: vec!["*".to_string()],
        request_timeout: Duration::from_secs(30),
        max_upload_bytes: 1024 * 1024,
        static_dir: tmp.path().join("dist").to_string_lossy().into_owned(),
        secret_key: secret,
        token_ttl: Duration::from_secs(3600),
        bootstrap_email: owner_hash.as_ref().map(|_| OWNER_EMAIL.to_string()),
        bootstrap_password_hash: owner_hash,
        fixed_expense_interval: Duration::from_secs(3600),
    }
}

/// Router with authentication disabled: every caller acts as Owner.
async fn open_router() -> (Router, TempDir) {
    let tmp = tempdir().unwrap();
    let config = test_config(&tmp, None, None);
    let state = build_state(&config).await.unwrap();
    (app_router(state, &config), tmp)
}

/// Router with JWT auth and a bootstrap owner account.
async fn secured_router() -> (Router, TempDir) {
    let tmp = tempdir().unwrap();
    let salt = SaltString::generate(&mut OsRng);
    let owner_hash = Argon2::default()
        .hash_password(OWNER_PASSWORD.as_bytes(), &salt)
        .unwrap()
        .to_string();
    let mut secret_bytes = [0u8; 32];
    OsRng.fill_bytes(&mut secret_bytes);
    let config = test_config(&tmp, Some(BASE64.encode(secret_bytes)), Some(owner_hash));
    let state = build_state(&config).await.unwrap();
    (app_router(state, &config), tmp)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::String(
            String::from_utf8_lossy(&bytes).into_owned(),
        ))
    };
    (status, value)
}

async fn login(app: &Router, email: &str, password: &str) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await
}

async fn owner_token(app: &Router) -> String {
    let (status, body) = login(app, OWNER_EMAIL, OWNER_PASSWORD).await;
    assert_eq!(status, StatusCode::OK);
    body["accessToken"].as_str().unwrap().to_string()
}

/// Creates an active staff member with the given role and logs them in.
async fn create_staff(app: &Router, owner: &str, email: &str, role: &str) -> (String, String) {
    let password = "staff-password";
    let (status, staff) = send(
        app,
        Method::POST,
        "/api/v1/staff",
        Some(owner),
        Some(json!({ "name": email, "email": email, "role": role, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = login(app, email, password).await;
    assert_eq!(status, StatusCode::OK);
    (
        staff["id"].as_str().unwrap().to_string(),
        body["accessToken"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
async fn health_and_openapi_are_public() {
    let (app, _tmp) = secured_router().await;

    let (status, body) = send(&app, Method::GET, "/api/v1/healthz", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("ok".into()));

    let (status, _) = send(&app, Method::GET, "/api/v1/readyz", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, doc) = send(&app, Method::GET, "/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/api/v1/budgets/{id}/initial-payment"].is_object());
}

#[tokio::test]
async fn login_and_access_protected_route() {
    let (app, _tmp) = secured_router().await;

    let (status, body) = send(&app, Method::GET, "/api/v1/works", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 401);

    let (status, body) = send(&app, Method::GET, "/api/v1/auth/status", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["requiresPassword"], true);

    let (status, _) = login(&app, OWNER_EMAIL, "wrong-password").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = login(&app, OWNER_EMAIL, OWNER_PASSWORD).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tokenType"], "Bearer");
    assert_eq!(body["staff"]["role"], "OWNER");
    assert!(body["staff"].get("passwordHash").is_none());
    let token = body["accessToken"].as_str().unwrap().to_string();

    let (status, me) = send(&app, Method::GET, "/api/v1/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], OWNER_EMAIL);

    let (status, _) = send(&app, Method::GET, "/api/v1/works", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::GET, "/api/v1/works", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn roles_limit_route_groups() {
    let (app, _tmp) = secured_router().await;
    let owner = owner_token(&app).await;

    let (status, worker) = send(
        &app,
        Method::POST,
        "/api/v1/staff",
        Some(&owner),
        Some(json!({
            "name": "Pedro",
            "email": "Pedro@Example.com",
            "role": "WORKER",
            "password": "worker-password"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(worker["email"], "pedro@example.com");

    let (status, body) = login(&app, "pedro@example.com", "worker-password").await;
    assert_eq!(status, StatusCode::OK);
    let worker_token = body["accessToken"].as_str().unwrap().to_string();

    let (status, _) = send(&app, Method::GET, "/api/v1/works", Some(&worker_token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) =
        send(&app, Method::GET, "/api/v1/incomes", Some(&worker_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Forbidden");

    let (status, _) = send(&app, Method::GET, "/api/v1/staff", Some(&worker_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/system-types",
        Some(&worker_token),
        Some(json!({ "name": "Aerobic", "price": 9500 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Deactivated staff can no longer log in.
    let worker_id = worker["id"].as_str().unwrap();
    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/staff/{}", worker_id),
        Some(&owner),
        Some(json!({
            "name": "Pedro",
            "email": "pedro@example.com",
            "role": "WORKER",
            "isActive": false
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = login(&app, "pedro@example.com", "worker-password").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Tokens issued before the deactivation stop working too.
    let (status, _) = send(&app, Method::GET, "/api/v1/works", Some(&worker_token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn role_changes_apply_to_issued_tokens() {
    let (app, _tmp) = secured_router().await;
    let owner = owner_token(&app).await;
    let (worker_id, worker_token) =
        create_staff(&app, &owner, "lena@example.com", "WORKER").await;

    let (status, _) =
        send(&app, Method::GET, "/api/v1/incomes", Some(&worker_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/staff/{}", worker_id),
        Some(&owner),
        Some(json!({
            "name": "Lena",
            "email": "lena@example.com",
            "role": "FINANCE",
            "isActive": true
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) =
        send(&app, Method::GET, "/api/v1/incomes", Some(&worker_token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn field_staff_see_work_details_without_amounts() {
    let (app, _tmp) = secured_router().await;
    let owner = owner_token(&app).await;
    let (_, worker_token) = create_staff(&app, &owner, "ana@example.com", "WORKER").await;
    let (_, finance_token) = create_staff(&app, &owner, "tom@example.com", "FINANCE").await;

    let (status, work) = send(
        &app,
        Method::POST,
        "/api/v1/works",
        Some(&owner),
        Some(json!({ "propertyAddress": "8 Heron Ln" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let work_id = work["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/incomes",
        Some(&owner),
        Some(json!({
            "date": "2025-05-02",
            "amount": 500,
            "incomeType": "OTHER",
            "workId": work_id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let uri = format!("/api/v1/works/{}", work_id);
    let (status, field) = send(&app, Method::GET, &uri, Some(&worker_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(field["propertyAddress"], "8 Heron Ln");
    assert!(field["materials"].is_array());
    for hidden in ["incomes", "expenses", "finalInvoice", "balance"] {
        assert!(field.get(hidden).is_none(), "{hidden} leaked to field staff");
    }

    let (status, full) = send(&app, Method::GET, &uri, Some(&finance_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(full["incomes"].as_array().map(Vec::len), Some(1));
    assert_eq!(full["balance"]["totalIncome"].as_f64(), Some(500.0));
}

#[tokio::test]
async fn approved_budget_initial_payment_opens_a_work() {
    let (app, _tmp) = open_router().await;

    let (status, budget) = send(
        &app,
        Method::POST,
        "/api/v1/budgets",
        None,
        Some(json!({
            "propertyAddress": "12 Palm Rd",
            "applicantName": "Rosa Diaz",
            "lineItems": [
                { "name": "Septic tank 1000 gal", "category": "Tanks", "quantity": 2, "unitPrice": 1500 }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(budget["status"], "DRAFT");
    assert_eq!(budget["total"].as_f64(), Some(3000.0));
    assert_eq!(budget["initialPayment"].as_f64(), Some(1800.0));
    let budget_id = budget["id"].as_str().unwrap().to_string();

    // Draft budgets cannot be paid.
    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/v1/budgets/{}/initial-payment", budget_id),
        None,
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, approved) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/budgets/{}/status", budget_id),
        None,
        Some(json!({ "status": "APPROVED" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(approved["status"], "APPROVED");

    let (status, result) = send(
        &app,
        Method::POST,
        &format!("/api/v1/budgets/{}/initial-payment", budget_id),
        None,
        Some(json!({ "paymentMethod": "check" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["budget"]["status"], "PAID");
    assert_eq!(result["work"]["status"], "PENDING");
    assert_eq!(result["work"]["budgetId"], budget_id.as_str());
    assert_eq!(result["income"]["amount"].as_f64(), Some(1800.0));

    // A second payment is rejected and does not open another work.
    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/v1/budgets/{}/initial-payment", budget_id),
        None,
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, works) = send(&app, Method::GET, "/api/v1/works", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(works.as_array().map(Vec::len), Some(1));

    let (status, balance) = send(&app, Method::GET, "/api/v1/balance", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(balance["totalIncome"].as_f64(), Some(1800.0));
}

#[tokio::test]
async fn duplicate_permit_number_is_a_bad_request() {
    let (app, _tmp) = open_router().await;
    let permit = json!({ "permitNumber": "SP-2024-001", "propertyAddress": "7 Bay St" });

    let (status, _) = send(&app, Method::POST, "/api/v1/permits", None, Some(permit)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/permits",
        None,
        Some(json!({ "permitNumber": "SP-2024-001", "propertyAddress": "9 Other Ave" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("already exists"));

    let (status, check) = send(
        &app,
        Method::GET,
        "/api/v1/permits/check?permitNumber=SP-2024-001",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(check["exists"], true);

    let (status, _) = send(&app, Method::GET, "/api/v1/permits/missing", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn receipt_upload_and_download() {
    let (app, _tmp) = open_router().await;

    let (status, expense) = send(
        &app,
        Method::POST,
        "/api/v1/expenses",
        None,
        Some(json!({
            "date": "2025-03-01",
            "amount": 120.5,
            "expenseType": "MATERIALS"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let expense_id = expense["id"].as_str().unwrap().to_string();

    let boundary = "septic-test-boundary";
    let content = b"\x89PNG\r\n\x1a\nfake image bytes";
    let mut body = Vec::new();
    for (name, value) in [("relatedModel", "EXPENSE"), ("relatedId", expense_id.as_str())] {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"ticket.png\"\r\nContent-Type: image/png\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/receipts")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let receipt: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(receipt["relatedModel"], "EXPENSE");
    assert_eq!(receipt["size"].as_i64(), Some(content.len() as i64));

    let (status, listed) = send(
        &app,
        Method::GET,
        &format!(
            "/api/v1/receipts?relatedModel=EXPENSE&relatedId={}",
            expense_id
        ),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().map(Vec::len), Some(1));

    let receipt_id = receipt["id"].as_str().unwrap();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/v1/receipts/{}/file", receipt_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE].to_str().unwrap(),
        "image/png"
    );
    let downloaded = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&downloaded[..], &content[..]);
}

#[tokio::test]
async fn balance_export_is_a_csv_attachment() {
    let (app, _tmp) = open_router().await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/incomes",
        None,
        Some(json!({
            "date": "2025-04-02",
            "amount": 500,
            "incomeType": "OTHER"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/balance/export?startDate=2025-04-01&endDate=2025-04-30")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/csv"));
    assert!(response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .starts_with("attachment"));
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let csv = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(csv.starts_with("Date,Kind,Type,Amount"));
    assert!(csv.contains("2025-04-02"));
}
