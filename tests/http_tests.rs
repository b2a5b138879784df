/// HTTP-level tests driving the router with `oneshot`
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use rust_leads_api::config::Config;
use rust_leads_api::db::Database;
use rust_leads_api::db_storage::LeadStore;
use rust_leads_api::handlers::AppState;
use rust_leads_api::routes::{build_router, RateLimit};
use rust_leads_api::services::SubmissionService;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

struct TestApp {
    _dir: TempDir,
    db: Database,
    store: LeadStore,
    router: Router,
}

async fn test_app(rate_limit: Option<RateLimit>) -> anyhow::Result<TestApp> {
    let dir = tempfile::tempdir()?;
    let config = Config {
        database_url: format!("sqlite://{}", dir.path().join("leads.db").display()),
        port: 5000,
        contact_number: "5581995294741".to_string(),
        business_name: "Help Bank".to_string(),
        db_max_connections: 5,
        db_busy_timeout_secs: 10,
        rate_limit_replenish_ms: 100,
        rate_limit_burst: 20,
    };

    let db = Database::new(&config).await?;
    let store = LeadStore::new(db.pool.clone());
    store.ensure_schema().await?;

    let state = Arc::new(AppState {
        submissions: SubmissionService::new(&config, store.clone()),
    });
    let router = build_router(state, rate_limit)?;

    Ok(TestApp {
        _dir: dir,
        db,
        store,
        router,
    })
}

fn form_request(fields: &[(&str, &str)]) -> Request<Body> {
    let body = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields)
        .finish();

    Request::builder()
        .method("POST")
        .uri("/simulacao")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header("x-forwarded-for", "203.0.113.7")
        .body(Body::from(body))
        .unwrap()
}

fn valid_fields() -> Vec<(&'static str, &'static str)> {
    vec![
        ("nome", "Maria da Silva"),
        ("cpf", "529.982.247-25"),
        ("data_nascimento", "01/02/1980"),
        ("email", "maria@example.com"),
        ("celular", "(81) 99999-0000"),
        ("tipo_servico", "Empréstimo consignado"),
    ]
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_returns_ok() -> anyhow::Result<()> {
    let app = test_app(None).await?;

    let request = Request::builder().uri("/health").body(Body::empty())?;
    let response = app.router.oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
    Ok(())
}

#[tokio::test]
async fn valid_submission_returns_success_payload() -> anyhow::Result<()> {
    let app = test_app(None).await?;

    let response = app.router.oneshot(form_request(&valid_fields())).await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["contact_number"], "5581995294741");

    let message = body["message"].as_str().unwrap();
    for (_, value) in valid_fields() {
        assert!(message.contains(value), "message should contain {:?}", value);
    }
    assert!(body["contact_url"]
        .as_str()
        .unwrap()
        .starts_with("https://wa.me/5581995294741?text="));

    assert_eq!(app.store.count().await?, 1);
    Ok(())
}

#[tokio::test]
async fn invalid_cpf_returns_bad_request() -> anyhow::Result<()> {
    let app = test_app(None).await?;
    let mut fields = valid_fields();
    fields[1] = ("cpf", "00000000000");

    let response = app.router.oneshot(form_request(&fields)).await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "invalid identifier");
    assert_eq!(app.store.count().await?, 0);
    Ok(())
}

#[tokio::test]
async fn storage_failure_returns_generic_internal_error() -> anyhow::Result<()> {
    let app = test_app(None).await?;
    app.db.pool.close().await;

    let response = app.router.oneshot(form_request(&valid_fields())).await?;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "internal error");
    Ok(())
}

#[tokio::test]
async fn unreadable_body_returns_generic_internal_error() -> anyhow::Result<()> {
    let app = test_app(None).await?;

    let request = Request::builder()
        .method("POST")
        .uri("/simulacao")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"cpf": "52998224725"}"#))?;
    let response = app.router.oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["message"], "internal error");
    Ok(())
}

#[tokio::test]
async fn rate_limit_rejects_burst_overflow() -> anyhow::Result<()> {
    let app = test_app(Some(RateLimit {
        replenish_ms: 60_000,
        burst: 1,
    }))
    .await?;

    let first = app
        .router
        .clone()
        .oneshot(form_request(&valid_fields()))
        .await?;
    assert_eq!(first.status(), StatusCode::OK);

    let second = app.router.oneshot(form_request(&valid_fields())).await?;
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(second.headers()[header::CONTENT_TYPE]
        .to_str()?
        .starts_with("application/json"));
    let body = json_body(second).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "internal error");

    assert_eq!(app.store.count().await?, 1);
    Ok(())
}

fn oversized_fields(name: &str) -> Vec<(&str, &str)> {
    let mut fields = valid_fields();
    fields[0] = ("nome", name);
    fields
}

#[tokio::test]
async fn oversized_body_with_content_length_returns_json_413() -> anyhow::Result<()> {
    let app = test_app(None).await?;
    let name = "a".repeat(70 * 1024);

    let mut request = form_request(&oversized_fields(&name));
    let length = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(&oversized_fields(&name))
        .finish()
        .len();
    request
        .headers_mut()
        .insert(header::CONTENT_LENGTH, length.into());

    let response = app.router.oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "internal error");
    assert_eq!(app.store.count().await?, 0);
    Ok(())
}

#[tokio::test]
async fn oversized_body_without_content_length_returns_json_413() -> anyhow::Result<()> {
    let app = test_app(None).await?;
    let name = "a".repeat(70 * 1024);

    let request = form_request(&oversized_fields(&name));
    assert!(request.headers().get(header::CONTENT_LENGTH).is_none());

    let response = app.router.oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "internal error");
    assert_eq!(app.store.count().await?, 0);
    Ok(())
}
