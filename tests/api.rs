use actix_web::http::{Method, StatusCode, header};
use actix_web::{App, middleware, test, web};
use serde_json::{Value, json};

use productos::repository::DieselRepository;
use productos::routes;

mod common;

macro_rules! init_app {
    ($test_db:expr) => {
        test::init_service(
            App::new()
                .wrap(middleware::NormalizePath::trim())
                .app_data(web::Data::new(DieselRepository::new($test_db.pool())))
                .configure(routes::configure),
        )
        .await
    };
}

fn widget_body(code: &str) -> Value {
    json!({
        "code": code,
        "name": "Widget",
        "price": 9.99,
        "quantity": 5
    })
}

#[actix_web::test]
async fn product_lifecycle_over_http() {
    let test_db = common::TestDb::new("api_product_lifecycle.db");
    let app = init_app!(test_db);

    let req = test::TestRequest::post()
        .uri("/api/productos")
        .set_json(widget_body("ABC123"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["active"], true);
    assert_eq!(body["data"]["createdAt"], body["data"]["updatedAt"]);
    let id = body["data"]["id"].as_i64().expect("numeric id");

    let req = test::TestRequest::post()
        .uri("/api/productos/")
        .set_json(widget_body("ABC123"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["title"], "Validation error");
    assert!(
        body["message"]
            .as_str()
            .unwrap_or_default()
            .contains("duplicate code")
    );

    let req = test::TestRequest::delete()
        .uri(&format!("/api/productos/{id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"], Value::Null);

    let req = test::TestRequest::get().uri("/api/productos").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(0));

    let req = test::TestRequest::get()
        .uri("/api/productos/todos")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));

    let req = test::TestRequest::get()
        .uri(&format!("/api/productos/{id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["active"], false);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/productos/{id}/permanente"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/productos/{id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["title"], "Not found");

    let req = test::TestRequest::get()
        .uri("/api/productos/codigo/ABC123")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn not_found_on_mutation_is_a_bad_request() {
    let test_db = common::TestDb::new("api_not_found_mutations.db");
    let app = init_app!(test_db);

    let req = test::TestRequest::put()
        .uri("/api/productos/999")
        .set_json(widget_body("ABC123"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::delete()
        .uri("/api/productos/999")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::delete()
        .uri("/api/productos/999/permanente")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn malformed_input_is_a_bad_request() {
    let test_db = common::TestDb::new("api_malformed_input.db");
    let app = init_app!(test_db);

    for uri in [
        "/api/productos/0",
        "/api/productos/-4",
        "/api/productos/abc",
        "/api/productos/codigo/x",
        "/api/productos/existe/bad%20code",
        "/api/productos/buscar",
        "/api/productos/buscar?nombre=ab",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "GET {uri}");
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "error", "GET {uri}");
    }

    let req = test::TestRequest::post()
        .uri("/api/productos")
        .insert_header(("content-type", "application/json"))
        .set_payload("null")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/productos")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["title"], "Validation error");
}

#[actix_web::test]
async fn search_update_and_exists_endpoints() {
    let test_db = common::TestDb::new("api_search_update_exists.db");
    let app = init_app!(test_db);

    let req = test::TestRequest::post()
        .uri("/api/productos")
        .set_json(widget_body("SRCH-1"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let id = body["data"]["id"].as_i64().expect("numeric id");

    let req = test::TestRequest::get()
        .uri("/api/productos/buscar?nombre=WIDG")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));

    let req = test::TestRequest::put()
        .uri(&format!("/api/productos/{id}"))
        .set_json(json!({
            "code": "SRCH-1",
            "name": "Gizmo",
            "description": "renamed",
            "price": 12.5,
            "quantity": 7,
            "image": "gizmo.png",
            "active": true
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["id"], id);
    assert_eq!(body["data"]["name"], "Gizmo");
    assert_eq!(body["data"]["image"], "gizmo.png");

    let req = test::TestRequest::get()
        .uri("/api/productos/existe/SRCH-1")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "exists": true, "code": "SRCH-1" }));

    let req = test::TestRequest::get()
        .uri("/api/productos/existe/OTHER-1")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["exists"], false);
}

#[actix_web::test]
async fn cross_origin_preflight_is_allowed() {
    let test_db = common::TestDb::new("api_cors_preflight.db");
    let app = init_app!(test_db);

    let origin = "http://shop.example.com";
    let req = test::TestRequest::default()
        .method(Method::OPTIONS)
        .uri("/api/productos/7")
        .insert_header((header::ORIGIN, origin))
        .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "PUT"))
        .insert_header((header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let allow_origin = resp
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .and_then(|value| value.to_str().ok());
    assert!(matches!(allow_origin, Some(value) if value == origin || value == "*"));

    let max_age = resp
        .headers()
        .get(header::ACCESS_CONTROL_MAX_AGE)
        .and_then(|value| value.to_str().ok());
    assert_eq!(max_age, Some("3600"));

    let req = test::TestRequest::get()
        .uri("/api/productos")
        .insert_header((header::ORIGIN, origin))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
        resp.headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
    );
}

#[actix_web::test]
async fn update_without_active_keeps_product_listed() {
    let test_db = common::TestDb::new("api_update_keeps_active.db");
    let app = init_app!(test_db);

    let req = test::TestRequest::post()
        .uri("/api/productos")
        .set_json(widget_body("ABC123"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let id = body["data"]["id"].as_i64().expect("numeric id");

    let req = test::TestRequest::put()
        .uri(&format!("/api/productos/{id}"))
        .set_json(widget_body("ABC123"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["active"], true);

    let req = test::TestRequest::get().uri("/api/productos").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));

    let mut nulled = widget_body("ABC123");
    nulled["active"] = Value::Null;
    let req = test::TestRequest::put()
        .uri(&format!("/api/productos/{id}"))
        .set_json(nulled)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["active"], false);
}

#[actix_web::test]
async fn search_folds_non_ascii_case() {
    let test_db = common::TestDb::new("api_search_non_ascii.db");
    let app = init_app!(test_db);

    let mut body = widget_body("CAFE-1");
    body["name"] = json!("CAFÉ MOLIDO");
    let req = test::TestRequest::post()
        .uri("/api/productos")
        .set_json(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri("/api/productos/buscar?nombre=caf%C3%A9")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["data"][0]["code"], "CAFE-1");
}
