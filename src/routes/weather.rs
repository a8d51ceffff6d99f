use actix_web::{web, HttpResponse, Responder};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use crate::services::weather_service::{WeatherError, WeatherService};

#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    city: Option<String>,
    from: Option<String>,
    to: Option<String>,
}

/*
    /api/weather
*/
pub async fn forecast(
    weather: web::Data<WeatherService>,
    query: web::Query<WeatherQuery>,
) -> impl Responder {
    let params = query.into_inner();
    let city = params.city.map(|c| c.trim().to_string()).filter(|c| !c.is_empty());

    let (Some(city), Some(from), Some(to)) = (city, params.from, params.to) else {
        return HttpResponse::BadRequest().json(json!({
            "success": false,
            "error": "Missing required params: city, from, to",
        }));
    };

    let (Ok(from_date), Ok(to_date)) = (
        NaiveDate::parse_from_str(&from, "%Y-%m-%d"),
        NaiveDate::parse_from_str(&to, "%Y-%m-%d"),
    ) else {
        return HttpResponse::BadRequest().json(json!({
            "success": false,
            "error": "from and to must be formatted as YYYY-MM-DD",
        }));
    };

    match weather.city_forecast(&city, from_date, to_date).await {
        Ok((resolved_city, forecasts)) => HttpResponse::Ok().json(json!({
            "success": true,
            "city": resolved_city,
            "forecasts": forecasts,
        })),
        Err(WeatherError::GeocodeFailed(_)) => HttpResponse::NotFound().json(json!({
            "success": false,
            "error": "Failed to geocode city",
        })),
        Err(WeatherError::ApiError { status, body }) => {
            eprintln!("Weather API error {}: {}", status, body);
            HttpResponse::BadGateway().json(json!({
                "success": false,
                "error": format!("Weather API error: {}", body),
            }))
        }
        Err(err) => {
            eprintln!("Weather API error: {}", err);
            HttpResponse::InternalServerError().json(json!({
                "success": false,
                "error": err.to_string(),
            }))
        }
    }
}
