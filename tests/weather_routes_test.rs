mod common;

use actix_web::test;
use serial_test::serial;

use common::TestApp;

#[actix_rt::test]
#[serial]
async fn test_weather_requires_city_and_range() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get()
        .uri("/api/weather?city=Paris&from=2026-09-01")
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("city, from, to"));
}

#[actix_rt::test]
#[serial]
async fn test_weather_rejects_blank_city() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get()
        .uri("/api/weather?city=%20&from=2026-09-01&to=2026-09-05")
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_rt::test]
#[serial]
async fn test_weather_rejects_malformed_dates() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get()
        .uri("/api/weather?city=Paris&from=septemberish&to=2026-09-05")
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}
