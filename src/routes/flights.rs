use actix_web::{web, HttpResponse, Responder};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use crate::services::amadeus_service::AmadeusService;
use crate::services::flight_service;

const DEFAULT_MAX_OFFERS: u32 = 5;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightQuery {
    origin: Option<String>,
    origin_location_code: Option<String>,
    destination: Option<String>,
    destination_location_code: Option<String>,
    departure_date: Option<String>,
    return_date: Option<String>,
    adults: Option<u32>,
    children: Option<u32>,
    currency_code: Option<String>,
    max: Option<u32>,
    non_stop: Option<bool>,
}

/*
    /api/flights
*/
pub async fn search(
    amadeus: web::Data<AmadeusService>,
    query: web::Query<FlightQuery>,
) -> impl Responder {
    let params = query.into_inner();
    let origin = params.origin.or(params.origin_location_code);
    let destination = params.destination.or(params.destination_location_code);

    let (Some(origin), Some(destination), Some(departure_date)) =
        (origin, destination, params.departure_date)
    else {
        return HttpResponse::BadRequest().json(json!({
            "success": false,
            "error": "Missing required params: origin, destination, departureDate",
        }));
    };

    if NaiveDate::parse_from_str(&departure_date, "%Y-%m-%d").is_err() {
        return HttpResponse::BadRequest().json(json!({
            "success": false,
            "error": "departureDate must be formatted as YYYY-MM-DD",
        }));
    }
    if let Some(return_date) = &params.return_date {
        if NaiveDate::parse_from_str(return_date, "%Y-%m-%d").is_err() {
            return HttpResponse::BadRequest().json(json!({
                "success": false,
                "error": "returnDate must be formatted as YYYY-MM-DD",
            }));
        }
    }

    let currency = params.currency_code.unwrap_or_else(|| "USD".to_string());

    match flight_service::search_flights(
        &amadeus,
        &origin,
        &destination,
        &departure_date,
        params.return_date.as_deref(),
        params.adults.unwrap_or(1),
        params.children.unwrap_or(0),
        &currency,
        params.max.unwrap_or(DEFAULT_MAX_OFFERS),
        params.non_stop.unwrap_or(false),
    )
    .await
    {
        Ok((origin_code, destination_code, flights)) => HttpResponse::Ok().json(json!({
            "success": true,
            "originLocationCode": origin_code,
            "destinationLocationCode": destination_code,
            "flights": flights,
        })),
        Err(err) => {
            eprintln!("Flights API error: {}", err);
            HttpResponse::InternalServerError().json(json!({
                "success": false,
                "error": err.to_string(),
            }))
        }
    }
}
