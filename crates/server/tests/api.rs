use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use base64::prelude::*;
use http_body_util::BodyExt;
use migration::MigratorTrait;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use server::{ServerState, router};

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = engine::Engine::builder()
        .database(db)
        .build()
        .await
        .unwrap();
    engine.new_user("admin", "admin-pw", true).await.unwrap();
    engine.new_user("alice", "alice-pw", false).await.unwrap();
    engine.new_user("bob", "bob-pw", false).await.unwrap();

    router(ServerState::new(engine, None))
}

fn basic(username: &str, password: &str) -> String {
    let secret = BASE64_STANDARD.encode(format!("{username}:{password}"));
    format!("Basic {secret}")
}

async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    auth: Option<(&str, &str)>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some((username, password)) = auth {
        req = req.header(header::AUTHORIZATION, basic(username, password));
    }
    let req = match body {
        Some(body) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };

    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

const ADMIN: Option<(&str, &str)> = Some(("admin", "admin-pw"));
const ALICE: Option<(&str, &str)> = Some(("alice", "alice-pw"));
const BOB: Option<(&str, &str)> = Some(("bob", "bob-pw"));

#[tokio::test]
async fn project_list_is_public() {
    let app = app().await;

    let (status, body) = call(&app, "GET", "/charity_project/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn authentication_is_required() {
    let app = app().await;
    let project = json!({"name": "Shelter", "description": "Roof", "full_amount": 100});

    let (status, _) = call(&app, "POST", "/charity_project/", None, Some(project.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = call(
        &app,
        "POST",
        "/charity_project/",
        Some(("admin", "wrong")),
        Some(project),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, _) = call(&app, "GET", "/donation/my", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn only_superusers_manage_projects() {
    let app = app().await;
    let project = json!({"name": "Shelter", "description": "Roof", "full_amount": 100});

    let (status, _) = call(&app, "POST", "/charity_project/", ALICE, Some(project.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call(&app, "POST", "/charity_project/", ADMIN, Some(project)).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_i64().unwrap();

    let uri = format!("/charity_project/{id}");
    let (status, _) = call(&app, "DELETE", &uri, ALICE, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = call(&app, "GET", "/donation/", ALICE, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = call(&app, "POST", "/google/", ALICE, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn donations_are_invested_into_projects() {
    let app = app().await;

    let (_, p1) = call(
        &app,
        "POST",
        "/charity_project/",
        ADMIN,
        Some(json!({"name": "Shelter", "description": "Roof", "full_amount": 100})),
    )
    .await;
    call(
        &app,
        "POST",
        "/charity_project/",
        ADMIN,
        Some(json!({"name": "Food", "description": "Winter food", "full_amount": 50})),
    )
    .await;
    assert_eq!(p1["fully_invested"], false);
    assert_eq!(p1["invested_amount"], 0);

    let (status, donation) = call(
        &app,
        "POST",
        "/donation/",
        ALICE,
        Some(json!({"full_amount": 120, "comment": "for the cats"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(donation["full_amount"], 120);
    assert_eq!(donation["comment"], "for the cats");
    assert!(donation.get("invested_amount").is_none());

    let (_, projects) = call(&app, "GET", "/charity_project/", None, None).await;
    assert_eq!(projects[0]["invested_amount"], 100);
    assert_eq!(projects[0]["fully_invested"], true);
    assert!(projects[0]["close_date"].is_string());
    assert_eq!(projects[1]["invested_amount"], 20);
    assert_eq!(projects[1]["fully_invested"], false);

    let (status, all) = call(&app, "GET", "/donation/", ADMIN, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all[0]["user_id"], "alice");
    assert_eq!(all[0]["invested_amount"], 120);
    assert_eq!(all[0]["fully_invested"], true);
}

#[tokio::test]
async fn my_donations_only_lists_the_caller() {
    let app = app().await;
    call(&app, "POST", "/donation/", ALICE, Some(json!({"full_amount": 10}))).await;
    call(&app, "POST", "/donation/", BOB, Some(json!({"full_amount": 20}))).await;

    let (status, mine) = call(&app, "GET", "/donation/my", ALICE, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine.as_array().map(Vec::len), Some(1));
    assert_eq!(mine[0]["full_amount"], 10);
}

#[tokio::test]
async fn project_lifecycle_errors() {
    let app = app().await;
    let (_, project) = call(
        &app,
        "POST",
        "/charity_project/",
        ADMIN,
        Some(json!({"name": "Shelter", "description": "Roof", "full_amount": 100})),
    )
    .await;
    let uri = format!("/charity_project/{}", project["id"]);

    let (status, _) = call(
        &app,
        "POST",
        "/charity_project/",
        ADMIN,
        Some(json!({"name": "Shelter", "description": "Again", "full_amount": 10})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = call(
        &app,
        "POST",
        "/charity_project/",
        ADMIN,
        Some(json!({"name": "Zero", "description": "Nothing", "full_amount": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    call(&app, "POST", "/donation/", ALICE, Some(json!({"full_amount": 40}))).await;

    let (status, _) = call(&app, "PATCH", &uri, ADMIN, Some(json!({"full_amount": 30}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = call(&app, "PATCH", &uri, ADMIN, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(&app, "DELETE", &uri, ADMIN, None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = call(&app, "PATCH", &uri, ADMIN, Some(json!({"full_amount": 40}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fully_invested"], true);

    let (status, body) = call(&app, "PATCH", &uri, ADMIN, Some(json!({"name": "New"}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("closed"));

    let (status, _) = call(&app, "DELETE", "/charity_project/999", ADMIN, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn empty_project_can_be_removed() {
    let app = app().await;
    let (_, project) = call(
        &app,
        "POST",
        "/charity_project/",
        ADMIN,
        Some(json!({"name": "Shelter", "description": "Roof", "full_amount": 100})),
    )
    .await;
    let uri = format!("/charity_project/{}", project["id"]);

    let (status, body) = call(&app, "DELETE", &uri, ADMIN, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Shelter");

    let (_, projects) = call(&app, "GET", "/charity_project/", None, None).await;
    assert_eq!(projects, json!([]));
}

#[tokio::test]
async fn report_needs_google_settings() {
    let app = app().await;

    let (status, body) = call(&app, "POST", "/google/", ADMIN, None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].is_string());
}
