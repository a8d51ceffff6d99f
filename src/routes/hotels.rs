use actix_web::{web, HttpResponse, Responder};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use crate::services::amadeus_service::AmadeusService;
use crate::services::hotel_service::{self, HotelSearchError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelQuery {
    city: Option<String>,
    city_code: Option<String>,
    check_in_date: Option<String>,
    check_out_date: Option<String>,
    adults: Option<u32>,
    currency: Option<String>,
    room_quantity: Option<u32>,
}

/*
    /api/hotels
*/
pub async fn search(
    amadeus: web::Data<AmadeusService>,
    query: web::Query<HotelQuery>,
) -> impl Responder {
    let params = query.into_inner();
    let city = params.city.or(params.city_code);

    let (Some(city), Some(check_in), Some(check_out)) =
        (city, params.check_in_date, params.check_out_date)
    else {
        return HttpResponse::BadRequest().json(json!({
            "success": false,
            "error": "Missing required params: city, checkInDate, checkOutDate",
        }));
    };

    let (Ok(check_in_date), Ok(check_out_date)) = (
        NaiveDate::parse_from_str(&check_in, "%Y-%m-%d"),
        NaiveDate::parse_from_str(&check_out, "%Y-%m-%d"),
    ) else {
        return HttpResponse::BadRequest().json(json!({
            "success": false,
            "error": "checkInDate and checkOutDate must be formatted as YYYY-MM-DD",
        }));
    };

    let currency = params.currency.unwrap_or_else(|| "USD".to_string());

    match hotel_service::search_city_hotels(
        &amadeus,
        &city,
        check_in_date,
        check_out_date,
        params.adults.unwrap_or(2),
        &currency,
        params.room_quantity.unwrap_or(1),
    )
    .await
    {
        Ok(result) => HttpResponse::Ok().json(json!({
            "success": true,
            "cityCode": result.city_code,
            "hotels": result.hotels,
        })),
        Err(HotelSearchError::CityResolution(_)) => HttpResponse::BadRequest().json(json!({
            "success": false,
            "error": "Unable to resolve city code from the provided city keyword.",
        })),
        Err(err) => {
            eprintln!("Hotels API error: {}", err);
            HttpResponse::InternalServerError().json(json!({
                "success": false,
                "error": err.to_string(),
            }))
        }
    }
}
