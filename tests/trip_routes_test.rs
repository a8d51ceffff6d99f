mod common;

use actix_web::test;
use serde_json::json;
use serial_test::serial;

use common::{sample_itinerary_json, TestApp};

#[actix_rt::test]
#[serial]
async fn test_trip_intake_rejects_invalid_request() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/trips")
        .set_json(&json!({
            "destinations": [],
            "travelDates": { "from": "2026-09-01", "to": "2026-09-05" },
            "budget": "around $1500 USD",
            "travelers": 2,
            "travelStyle": ["Adventure"],
            "dreamTrip": "A week of food, museums and long walks."
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
}

#[actix_rt::test]
#[serial]
async fn test_unknown_trip_token_is_not_found() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get()
        .uri("/api/trips/no-such-token")
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_rt::test]
#[serial]
async fn test_unknown_trip_token_plan_is_not_found() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get()
        .uri("/api/trips/no-such-token/plan")
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_rt::test]
#[serial]
async fn test_seeded_session_reads_back() {
    let test_app = TestApp::new();
    let token = test_app.seed_session(
        vec!["Paris".to_string(), "Rome".to_string()],
        vec![1, 1],
        &sample_itinerary_json(),
    );
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/trips/{}", token))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["trip"]["destinations"][0], "Paris");
    assert_eq!(body["trip"]["destinationDays"][1], 1);
    assert!(body["itinerary"].as_str().unwrap().contains("Day 1"));
}

#[actix_rt::test]
#[serial]
async fn test_plan_without_destinations_omits_augmentation() {
    // An empty destination list short-circuits every vendor fetch: the day
    // cards come back with no destination, weather, or hotel attached.
    let test_app = TestApp::new();
    let token = test_app.seed_session(vec![], vec![], &sample_itinerary_json());
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/trips/{}/plan", token))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    let days = body["plan"]["days"].as_array().unwrap();
    assert_eq!(days.len(), 2);
    assert_eq!(days[0]["day"], "Day 1");
    assert_eq!(days[0]["date"], "2026-09-01");
    assert!(days[0].get("destination").is_none() || days[0]["destination"].is_null());
    assert!(days[0].get("weatherTip").is_none() || days[0]["weatherTip"].is_null());
    assert!(days[0].get("hotel").is_none() || days[0]["hotel"].is_null());
    assert_eq!(body["plan"]["flights"].as_array().unwrap().len(), 0);
    assert_eq!(
        body["plan"]["totalEstimatedCost"],
        "$650 - $980 USD"
    );
}
