mod common;

use actix_web::test;
use serial_test::serial;

use common::TestApp;

#[actix_rt::test]
#[serial]
async fn test_health_check() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body = test::read_body(resp).await;
    assert_eq!(body, "OK");
}

#[actix_rt::test]
#[serial]
async fn test_unknown_route_is_not_found() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get().uri("/api/nonexistent").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}
