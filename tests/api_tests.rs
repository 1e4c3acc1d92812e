//! HTTP API 集成测试
//!
//! 通过 `api::configure` 装配完整路由，覆盖认证、交易、预算、资料、health 端点。

use std::sync::{Arc, Once};
use std::time::Duration;

use actix_web::body::MessageBody;
use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::App;
use serde_json::{Value, json};
use tempfile::TempDir;

use budgetly::api::configure;
use budgetly::api::jwt::JwtService;
use budgetly::api::services::AppStartTime;
use budgetly::config::init_config;
use budgetly::events::ChangeFeed;
use budgetly::services::AppServices;
use budgetly::storage::SeaOrmStorage;

// =============================================================================
// 测试环境初始化
// =============================================================================

static INIT: Once = Once::new();

async fn setup() -> (TempDir, AppServices) {
    INIT.call_once(|| {
        // SAFETY: 在任何配置读取之前、只执行一次
        unsafe { std::env::set_var("BUDGETLY__EVENTS__KEEP_ALIVE_SECS", "1") };
        init_config();
    });
    let temp_dir = TempDir::new().expect("创建临时目录失败");
    let db_path = temp_dir.path().join("api_test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let storage = Arc::new(
        SeaOrmStorage::new(&db_url, "sqlite")
            .await
            .expect("创建存储失败"),
    );
    let jwt = Arc::new(JwtService::new("api-test-secret", 15, 7));
    (temp_dir, AppServices::new(storage, ChangeFeed::new(64), jwt))
}

fn start_time() -> AppStartTime {
    AppStartTime {
        start_datetime: chrono::Utc::now(),
    }
}

fn peer() -> std::net::SocketAddr {
    "127.0.0.1:40000".parse().unwrap()
}

fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

fn sign_up_body(email: &str) -> Value {
    json!({
        "first_name": "Ada",
        "last_name": "Lovelace",
        "email": email,
        "password": "analytical",
        "confirm_password": "analytical",
        "monthly_budget": "2000",
        "address": "12 St James's Square",
        "phone_number": "555-0100"
    })
}

/// 注册并返回 access token
macro_rules! sign_up {
    ($app:expr, $email:expr) => {{
        let req = TestRequest::post()
            .uri("/api/v1/auth/signup")
            .set_json(sign_up_body($email))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        body["data"]["access_token"].as_str().unwrap().to_string()
    }};
}

// =============================================================================
// 认证
// =============================================================================

#[actix_rt::test]
async fn test_signup_login_and_me() {
    let (_dir, services) = setup().await;
    let app = test::init_service(App::new().configure(configure(services, start_time()))).await;

    let token = sign_up!(app, "ada@example.com");

    let req = TestRequest::post()
        .uri("/api/v1/auth/login")
        .peer_addr(peer())
        .set_json(json!({ "email": "ada@example.com", "password": "analytical" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 0);
    assert!(body["data"]["refresh_token"].is_string());

    let req = TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["email"], "ada@example.com");
}

#[actix_rt::test]
async fn test_login_wrong_password() {
    let (_dir, services) = setup().await;
    let app = test::init_service(App::new().configure(configure(services, start_time()))).await;
    sign_up!(app, "ada@example.com");

    let req = TestRequest::post()
        .uri("/api/v1/auth/login")
        .peer_addr(peer())
        .set_json(json!({ "email": "ada@example.com", "password": "wrong-password" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 2000);
    assert_eq!(body["message"], "Invalid email or password");
}

#[actix_rt::test]
async fn test_login_is_rate_limited_per_peer() {
    let (_dir, services) = setup().await;
    let app = test::init_service(App::new().configure(configure(services, start_time()))).await;

    let mut statuses = Vec::new();
    for _ in 0..8 {
        let req = TestRequest::post()
            .uri("/api/v1/auth/login")
            .peer_addr(peer())
            .set_json(json!({ "email": "nobody@example.com", "password": "whatever" }))
            .to_request();
        statuses.push(test::call_service(&app, req).await.status());
    }

    assert_eq!(statuses[0], StatusCode::UNAUTHORIZED);
    assert!(statuses.contains(&StatusCode::TOO_MANY_REQUESTS));
}

#[actix_rt::test]
async fn test_signup_duplicate_and_invalid() {
    let (_dir, services) = setup().await;
    let app = test::init_service(App::new().configure(configure(services, start_time()))).await;
    sign_up!(app, "ada@example.com");

    let req = TestRequest::post()
        .uri("/api/v1/auth/signup")
        .set_json(sign_up_body("ADA@example.com"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 2005);

    let mut invalid = sign_up_body("new@example.com");
    invalid["confirm_password"] = json!("different");
    let req = TestRequest::post()
        .uri("/api/v1/auth/signup")
        .set_json(invalid)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Passwords do not match");
}

#[actix_rt::test]
async fn test_protected_routes_require_token() {
    let (_dir, services) = setup().await;
    let app = test::init_service(App::new().configure(configure(services, start_time()))).await;

    for uri in [
        "/api/v1/transactions",
        "/api/v1/categories",
        "/api/v1/budgets",
        "/api/v1/budgets/stream",
        "/api/v1/profile",
        "/api/v1/insights",
        "/api/v1/auth/me",
    ] {
        let req = TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{}", uri);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], 1001);
    }

    let req = TestRequest::get()
        .uri("/api/v1/transactions")
        .insert_header(bearer("not-a-jwt"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 2002);

    // /auth 下的入口不经过鉴权 scope
    let req = TestRequest::post().uri("/api/v1/auth/logout").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

// =============================================================================
// 交易
// =============================================================================

#[actix_rt::test]
async fn test_transaction_endpoints() {
    let (_dir, services) = setup().await;
    let app = test::init_service(App::new().configure(configure(services, start_time()))).await;
    let token = sign_up!(app, "ada@example.com");

    let req = TestRequest::post()
        .uri("/api/v1/transactions")
        .insert_header(bearer(&token))
        .set_json(json!({
            "type": "expense",
            "amount": "42.50",
            "description": "Groceries",
            "category": "groceries",
            "timestamp": "2024-03-05T10:00:00Z"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["type"], "expense");
    assert_eq!(body["data"]["amount"], 42.5);

    let req = TestRequest::put()
        .uri(&format!("/api/v1/transactions/{}", id))
        .insert_header(bearer(&token))
        .set_json(json!({
            "type": "expense",
            "amount": 50,
            "description": "Groceries and snacks",
            "category": "groceries"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["amount"], 50.0);

    let req = TestRequest::get()
        .uri("/api/v1/transactions?type=expense&category=groceries")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let req = TestRequest::get()
        .uri("/api/v1/transactions/summary?period=all")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["totals"]["expenses"], 50.0);
    assert_eq!(body["data"]["count"], 1);

    let req = TestRequest::get()
        .uri("/api/v1/transactions/export")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp.headers().get("content-type").unwrap().to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/csv"));
    let csv = test::read_body(resp).await;
    assert!(String::from_utf8_lossy(&csv).contains("Groceries and snacks"));

    let req = TestRequest::delete()
        .uri(&format!("/api/v1/transactions/{}", id))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = TestRequest::get()
        .uri(&format!("/api/v1/transactions/{}", id))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 3000);
}

#[actix_rt::test]
async fn test_transaction_validation_and_ownership() {
    let (_dir, services) = setup().await;
    let app = test::init_service(App::new().configure(configure(services, start_time()))).await;
    let ada = sign_up!(app, "ada@example.com");
    let grace = sign_up!(app, "grace@example.com");

    let req = TestRequest::post()
        .uri("/api/v1/transactions")
        .insert_header(bearer(&ada))
        .set_json(json!({ "type": "income", "amount": "", "description": "Pay", "category": "salary" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 3001);
    assert_eq!(body["message"], "Please fill in all fields");

    let req = TestRequest::post()
        .uri("/api/v1/transactions")
        .insert_header(bearer(&ada))
        .set_json(json!({ "type": "income", "amount": 1200, "description": "Pay", "category": "salary" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    // 其他用户看不到、也删不掉
    let req = TestRequest::delete()
        .uri(&format!("/api/v1/transactions/{}", id))
        .insert_header(bearer(&grace))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = TestRequest::get()
        .uri("/api/v1/transactions")
        .insert_header(bearer(&grace))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[actix_rt::test]
async fn test_categories_catalog() {
    let (_dir, services) = setup().await;
    let app = test::init_service(App::new().configure(configure(services, start_time()))).await;
    let token = sign_up!(app, "ada@example.com");

    let req = TestRequest::get()
        .uri("/api/v1/categories?type=income")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let names: Vec<&str> = body["data"]["categories"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Salary", "Freelancing", "Investment", "Bonus", "Others"]);
}

// =============================================================================
// 预算
// =============================================================================

#[actix_rt::test]
async fn test_budget_endpoints_compute_spent() {
    let (_dir, services) = setup().await;
    let app = test::init_service(App::new().configure(configure(services, start_time()))).await;
    let token = sign_up!(app, "ada@example.com");

    let req = TestRequest::post()
        .uri("/api/v1/budgets")
        .insert_header(bearer(&token))
        .set_json(json!({ "category": "food", "amount": 100, "month": 3, "year": 2024 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let budget_id = body["data"]["id"].as_str().unwrap().to_string();

    for (amount, ts) in [(30, "2024-03-03T08:00:00Z"), (55, "2024-03-28T20:00:00Z"), (99, "2024-04-01T00:00:00Z")] {
        let req = TestRequest::post()
            .uri("/api/v1/transactions")
            .insert_header(bearer(&token))
            .set_json(json!({
                "type": "expense",
                "amount": amount,
                "description": "Meal",
                "category": "food",
                "timestamp": ts
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let req = TestRequest::get()
        .uri("/api/v1/budgets?month=3&year=2024")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"][0]["spent"], 85.0);

    let req = TestRequest::get()
        .uri("/api/v1/budgets/overview?month=3&year=2024")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["total_spent"], 85.0);
    assert_eq!(body["data"]["budgets"][0]["status"], "warning");

    let req = TestRequest::put()
        .uri(&format!("/api/v1/budgets/{}", budget_id))
        .insert_header(bearer(&token))
        .set_json(json!({ "amount": 80 }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["amount"], 80.0);
    assert_eq!(body["data"]["spent"], 85.0);

    let req = TestRequest::get()
        .uri("/api/v1/budgets?month=13&year=2024")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = TestRequest::delete()
        .uri(&format!("/api/v1/budgets/{}", budget_id))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

/// 读取 SSE 响应体的下一个 chunk
async fn next_chunk<B>(body: &mut std::pin::Pin<Box<B>>) -> String
where
    B: MessageBody,
    B::Error: std::fmt::Debug,
{
    let chunk = tokio::time::timeout(
        Duration::from_secs(5),
        std::future::poll_fn(|cx| body.as_mut().poll_next(cx)),
    )
    .await
    .expect("no frame within 5s")
    .expect("stream ended early")
    .expect("stream errored");
    String::from_utf8(chunk.to_vec()).unwrap()
}

#[actix_rt::test]
async fn test_budget_stream_pushes_snapshots_and_keep_alive() {
    let (_dir, services) = setup().await;
    let app = test::init_service(App::new().configure(configure(services, start_time()))).await;
    let token = sign_up!(app, "ada@example.com");

    let req = TestRequest::post()
        .uri("/api/v1/budgets")
        .insert_header(bearer(&token))
        .set_json(json!({ "category": "food", "amount": 100, "month": 3, "year": 2024 }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let req = TestRequest::get()
        .uri("/api/v1/budgets/stream?month=3&year=2024")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "text/event-stream"
    );

    let mut body = Box::pin(resp.into_body());
    let first = next_chunk(&mut body).await;
    assert!(first.starts_with("event: budgets\ndata: "));
    assert!(first.contains(r#""month":3"#));
    assert!(first.contains(r#""spent":0.0"#));

    let req = TestRequest::post()
        .uri("/api/v1/transactions")
        .insert_header(bearer(&token))
        .set_json(json!({
            "type": "expense",
            "amount": 30,
            "description": "Dinner",
            "category": "food",
            "timestamp": "2024-03-05T19:00:00Z"
        }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let mut second = next_chunk(&mut body).await;
    while second.starts_with(':') {
        second = next_chunk(&mut body).await;
    }
    assert!(second.starts_with("event: budgets\ndata: "));
    assert!(second.contains(r#""spent":30.0"#));

    // 没有变更时按配置的 1s 间隔发送心跳
    assert_eq!(next_chunk(&mut body).await, ": keep-alive\n\n");
}

#[actix_rt::test]
async fn test_budget_stream_releases_watch_when_client_disconnects() {
    use actix_web::HttpServer;
    use budgetly::ledger::SignUpForm;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    let (_dir, services) = setup().await;
    let form: SignUpForm = serde_json::from_value(sign_up_body("ada@example.com")).unwrap();
    let session = services.auth.sign_up(&form).await.unwrap();

    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let app_services = services.clone();
    let server = HttpServer::new(move || {
        App::new().configure(configure(app_services.clone(), start_time()))
    })
    .workers(1)
    .disable_signals()
    .listen(listener)
    .unwrap()
    .run();
    let handle = server.handle();
    actix_rt::spawn(server);

    let mut client = TcpStream::connect(addr).await.unwrap();
    let request = format!(
        "GET /api/v1/budgets/stream?month=3&year=2024 HTTP/1.1\r\nHost: {}\r\nAuthorization: Bearer {}\r\n\r\n",
        addr, session.access_token
    );
    client.write_all(request.as_bytes()).await.unwrap();

    let mut received = String::new();
    let mut buf = [0u8; 4096];
    while !received.contains("event: budgets") {
        let n = tokio::time::timeout(Duration::from_secs(5), client.read(&mut buf))
            .await
            .expect("no response within 5s")
            .unwrap();
        assert!(n > 0, "connection closed before the first frame");
        received.push_str(&String::from_utf8_lossy(&buf[..n]));
    }
    assert!(received.starts_with("HTTP/1.1 200"));
    assert_eq!(services.feed.receiver_count(), 1);

    drop(client);

    // 心跳写入失败后 actix 丢弃响应流，watch 随之取消订阅
    let deadline = tokio::time::Instant::now() + Duration::from_secs(10);
    while services.feed.receiver_count() > 0 {
        assert!(
            tokio::time::Instant::now() < deadline,
            "budget watch still subscribed after the client went away"
        );
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    handle.stop(false).await;
}

// =============================================================================
// 资料 / insights
// =============================================================================

#[actix_rt::test]
async fn test_profile_get_and_update() {
    let (_dir, services) = setup().await;
    let app = test::init_service(App::new().configure(configure(services, start_time()))).await;
    let token = sign_up!(app, "ada@example.com");

    let req = TestRequest::get()
        .uri("/api/v1/profile")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["display_name"], "Ada");
    assert_eq!(body["data"]["initials"], "AL");

    let req = TestRequest::put()
        .uri("/api/v1/profile")
        .insert_header(bearer(&token))
        .set_json(json!({ "first_name": "Augusta", "monthly_budget": "2500" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["full_name"], "Augusta Lovelace");
    assert_eq!(body["data"]["details"]["monthly_budget"], "2500");
}

#[actix_rt::test]
async fn test_insights_endpoint() {
    let (_dir, services) = setup().await;
    let app = test::init_service(App::new().configure(configure(services, start_time()))).await;
    let token = sign_up!(app, "ada@example.com");

    let req = TestRequest::get()
        .uri("/api/v1/insights")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["summary"], "No transactions recorded this month yet.");
}

// =============================================================================
// Health
// =============================================================================

#[actix_rt::test]
async fn test_health_endpoints() {
    let (_dir, services) = setup().await;
    let app = test::init_service(App::new().configure(configure(services, start_time()))).await;

    let resp = test::call_service(&app, TestRequest::get().uri("/health/live").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = test::call_service(&app, TestRequest::get().uri("/health/ready").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(&app, TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["status"], "healthy");
    assert_eq!(body["data"]["database"]["backend"], "sqlite");
    assert_eq!(body["data"]["change_feed"]["subscribers"], 0);
}
