use axum::http::StatusCode;
use axum::{middleware, Extension, Router};
use axum::routing::{get, post};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;
use shapedoc_core::{
    camelize_json_responses, Casing, Typed, TypedResponse, ValidatedForm, ValidatedHeaders,
    ValidatedJson, ValidatedQuery,
};
use shapedoc_test::TestApp;

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
struct Pet {
    pet_name: String,
    owner_id: u32,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct Search {
    count_le: u32,
    name_like: Option<String>,
    only_active: Option<bool>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct RequestHeaders {
    x_request_id: String,
}

#[derive(Serialize)]
struct RateLimit {
    x_rate_limit: u32,
    x_note: Option<String>,
}

async fn echo_pet(ValidatedJson(pet): ValidatedJson<Pet>) -> Typed<Pet> {
    Typed(pet)
}

async fn echo_form(ValidatedForm(pet): ValidatedForm<Pet>) -> Typed<Pet> {
    Typed(pet)
}

async fn search(ValidatedQuery(search): ValidatedQuery<Search>) -> Typed<serde_json::Value> {
    Typed(json!({
        "count_le": search.count_le,
        "name_like": search.name_like,
        "only_active": search.only_active,
    }))
}

async fn request_id(ValidatedHeaders(headers): ValidatedHeaders<RequestHeaders>) -> String {
    headers.x_request_id
}

async fn created() -> TypedResponse<Pet, RateLimit> {
    TypedResponse::new(
        Pet {
            pet_name: "Rex".into(),
            owner_id: 1,
        },
        StatusCode::CREATED,
    )
    .with_headers(RateLimit {
        x_rate_limit: 10,
        x_note: None,
    })
}

fn routes() -> Router {
    Router::new()
        .route("/pets", post(echo_pet))
        .route("/pets/form", post(echo_form))
        .route("/search", get(search))
        .route("/request-id", get(request_id))
        .route("/created", post(created))
}

fn app(casing: Casing) -> TestApp {
    let mut router = routes().layer(Extension(casing));
    if casing.is_camel() {
        router = router.layer(middleware::from_fn(camelize_json_responses));
    }
    TestApp::new(router)
}

#[tokio::test]
async fn json_body_without_casing() {
    app(Casing::Preserve)
        .post("/pets")
        .json(&json!({"pet_name": "Rex", "owner_id": 3}))
        .send()
        .await
        .assert_ok()
        .assert_json(json!({"pet_name": "Rex", "owner_id": 3}));
}

#[tokio::test]
async fn json_body_with_casing() {
    app(Casing::Camel)
        .post("/pets")
        .json(&json!({"petName": "Rex", "ownerId": 3}))
        .send()
        .await
        .assert_ok()
        .assert_json(json!({"petName": "Rex", "ownerId": 3}));
}

#[tokio::test]
async fn camel_keys_are_rejected_without_casing() {
    app(Casing::Preserve)
        .post("/pets")
        .json(&json!({"petName": "Rex", "ownerId": 3}))
        .send()
        .await
        .assert_bad_request()
        .assert_json_path("error", "Request schema validation failed");
}

#[tokio::test]
async fn json_body_requires_json_content_type() {
    app(Casing::Preserve)
        .post("/pets")
        .header("content-type", "text/plain")
        .body(r#"{"pet_name": "Rex", "owner_id": 3}"#)
        .send()
        .await
        .assert_bad_request();
}

#[tokio::test]
async fn malformed_json_is_a_validation_error() {
    app(Casing::Preserve)
        .post("/pets")
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .assert_bad_request()
        .assert_json_path("error", "Request schema validation failed");
}

#[tokio::test]
async fn form_body_with_casing() {
    app(Casing::Camel)
        .post("/pets/form")
        .form(&[("petName", "Rex"), ("ownerId", "7")])
        .send()
        .await
        .assert_ok()
        .assert_json(json!({"petName": "Rex", "ownerId": 7}));
}

#[tokio::test]
async fn query_with_casing() {
    app(Casing::Camel)
        .get("/search")
        .query("countLe", 3)
        .query("onlyActive", true)
        .send()
        .await
        .assert_ok()
        .assert_json(json!({"countLe": 3, "nameLike": null, "onlyActive": true}));
}

#[tokio::test]
async fn query_without_casing() {
    app(Casing::Preserve)
        .get("/search")
        .query("count_le", 5)
        .query("name_like", "re")
        .send()
        .await
        .assert_ok()
        .assert_json(json!({"count_le": 5, "name_like": "re", "only_active": null}));
}

#[tokio::test]
async fn query_missing_required_field() {
    app(Casing::Preserve)
        .get("/search")
        .send()
        .await
        .assert_bad_request()
        .assert_json_path("error", "Request schema validation failed");
}

#[tokio::test]
async fn headers_bind_with_dashes() {
    let resp = app(Casing::Camel)
        .get("/request-id")
        .header("x-request-id", "abc-123")
        .send()
        .await
        .assert_ok();
    assert_eq!(resp.text(), "abc-123");
}

#[tokio::test]
async fn undeclared_non_ascii_header_is_ignored() {
    let resp = app(Casing::Preserve)
        .get("/request-id")
        .header("x-request-id", "abc-123")
        .header("x-referer-label", "caf\u{e9}")
        .send()
        .await
        .assert_ok();
    assert_eq!(resp.text(), "abc-123");
}

#[tokio::test]
async fn declared_non_ascii_header_is_missing() {
    app(Casing::Preserve)
        .get("/request-id")
        .header("x-request-id", "caf\u{e9}")
        .send()
        .await
        .assert_bad_request()
        .assert_json_path("error", "Request schema validation failed");
}

#[tokio::test]
async fn missing_header_is_rejected() {
    app(Casing::Preserve)
        .get("/request-id")
        .send()
        .await
        .assert_bad_request();
}

#[tokio::test]
async fn typed_response_writes_status_and_headers() {
    let resp = app(Casing::Preserve)
        .post("/created")
        .send()
        .await
        .assert_created()
        .assert_header("x-rate-limit", "10")
        .assert_json(json!({"pet_name": "Rex", "owner_id": 1}));
    assert!(resp.header("x-note").is_none());
}

#[tokio::test]
async fn casing_middleware_leaves_text_alone() {
    let resp = app(Casing::Camel)
        .get("/request-id")
        .header("x-request-id", "snake_value")
        .send()
        .await
        .assert_ok();
    assert_eq!(resp.text(), "snake_value");
}
