use std::collections::HashMap;

use actix_web::{web, HttpResponse, Responder};
use chrono::Duration;
use futures::future::join_all;
use serde_json::json;

use crate::models::hotels::HotelOffer;
use crate::models::itinerary::Itinerary;
use crate::models::plan::{PlanDay, PlanHotelNight, TripPlan};
use crate::models::trip::TripRequest;
use crate::models::weather::DailyForecast;
use crate::services::allocation_service::AllocationService;
use crate::services::amadeus_service::AmadeusService;
use crate::services::flight_service;
use crate::services::generation_service::GenerationService;
use crate::services::hotel_service;
use crate::services::session_service::{NewTripSession, SessionStore};
use crate::services::weather_service::WeatherService;

/*
    /api/trips
*/
pub async fn create(
    generation: web::Data<GenerationService>,
    store: web::Data<SessionStore>,
    input: web::Json<TripRequest>,
) -> impl Responder {
    let request = input.into_inner();
    if let Err(message) = request.validate() {
        return HttpResponse::BadRequest().json(json!({
            "success": false,
            "error": message,
        }));
    }

    let itinerary = match generation.generate_itinerary(&request).await {
        Ok(itinerary) => itinerary,
        Err(err) => {
            eprintln!("Itinerary generation failed: {}", err);
            return HttpResponse::InternalServerError().json(json!({
                "success": false,
                "error": err.to_string(),
            }));
        }
    };

    let serialized = match serde_json::to_string(&itinerary) {
        Ok(serialized) => serialized,
        Err(err) => {
            eprintln!("Failed to serialize itinerary: {:?}", err);
            return HttpResponse::InternalServerError().json(json!({
                "success": false,
                "error": "Failed to serialize itinerary.",
            }));
        }
    };

    let token = store.insert(NewTripSession {
        origin: request.origin.clone().unwrap_or_default(),
        destinations: request.destination_list(),
        destination_days: request.allocation().unwrap_or_default(),
        date_from: request.travel_dates.from,
        date_to: request.travel_dates.to,
        travelers: request.travelers,
        children: request.children_count(),
        rooms: request.room_count(),
        currency: request.currency_code(),
        itinerary_json: serialized.clone(),
    });

    HttpResponse::Ok().json(json!({
        "success": true,
        "token": token,
        "itinerary": serialized,
    }))
}

/*
    /api/trips/{token}
*/
pub async fn get_by_token(
    store: web::Data<SessionStore>,
    path: web::Path<String>,
) -> impl Responder {
    match store.get(&path.into_inner()) {
        Some(session) => {
            let itinerary = session.itinerary_json.clone();
            HttpResponse::Ok().json(json!({
                "success": true,
                "trip": session,
                "itinerary": itinerary,
            }))
        }
        None => HttpResponse::NotFound().json(json!({
            "success": false,
            "error": "Trip session not found",
        })),
    }
}

/*
    /api/trips/{token}/plan

    The display stage: fans out to the pricing and weather adapters, assigns
    each itinerary day to a destination, and joins the per-date weather tip
    and nightly hotel rate onto the day cards. A failed branch is logged and
    its augmentation omitted; it never fails the whole view.
*/
pub async fn plan(
    amadeus: web::Data<AmadeusService>,
    weather: web::Data<WeatherService>,
    store: web::Data<SessionStore>,
    path: web::Path<String>,
) -> impl Responder {
    let token = path.into_inner();
    let Some(session) = store.get(&token) else {
        return HttpResponse::NotFound().json(json!({
            "success": false,
            "error": "Trip session not found",
        }));
    };

    let itinerary: Itinerary = match serde_json::from_str(&session.itinerary_json) {
        Ok(itinerary) => itinerary,
        Err(err) => {
            eprintln!("Stored itinerary is not parseable: {:?}", err);
            return HttpResponse::InternalServerError().json(json!({
                "success": false,
                "error": "Stored itinerary could not be read.",
            }));
        }
    };

    let destinations = session.destinations.clone();
    let check_in = session.date_from;
    let check_out = session.date_to;

    let hotel_futures = destinations.iter().map(|dest| {
        let amadeus = amadeus.clone();
        let dest = dest.clone();
        let currency = session.currency.clone();
        async move {
            let result = hotel_service::search_city_hotels(
                &amadeus,
                &dest,
                check_in,
                check_out,
                session.travelers,
                &currency,
                session.rooms,
            )
            .await;
            (dest, result)
        }
    });

    let weather_futures = destinations.iter().map(|dest| {
        let weather = weather.clone();
        let dest = dest.clone();
        async move {
            let result = weather.city_forecast(&dest, check_in, check_out).await;
            (dest, result)
        }
    });

    let flight_future = async {
        let origin = session.origin.trim().to_string();
        let Some(primary) = destinations.first() else {
            return Vec::new();
        };
        if origin.is_empty() {
            return Vec::new();
        }
        match flight_service::search_flights(
            &amadeus,
            &origin,
            primary,
            &check_in.format("%Y-%m-%d").to_string(),
            Some(&check_out.format("%Y-%m-%d").to_string()),
            session.travelers,
            session.children,
            &session.currency,
            5,
            false,
        )
        .await
        {
            Ok((_, _, flights)) => flights,
            Err(err) => {
                eprintln!("Flight lookup failed for plan view: {}", err);
                Vec::new()
            }
        }
    };

    let (hotel_results, weather_results, flights) = futures::join!(
        join_all(hotel_futures),
        join_all(weather_futures),
        flight_future
    );

    let mut hotels_by_dest: HashMap<String, Vec<HotelOffer>> = HashMap::new();
    for (dest, result) in hotel_results {
        match result {
            Ok(city_hotels) => {
                hotels_by_dest.insert(dest, city_hotels.hotels);
            }
            Err(err) => eprintln!("Hotel lookup failed for {}: {}", dest, err),
        }
    }

    let mut weather_by_dest: HashMap<String, Vec<DailyForecast>> = HashMap::new();
    for (dest, result) in weather_results {
        match result {
            Ok((_, forecasts)) => {
                weather_by_dest.insert(dest, forecasts);
            }
            Err(err) => eprintln!("Weather lookup failed for {}: {}", dest, err),
        }
    }

    let primary_hotel = destinations
        .first()
        .and_then(|d| hotels_by_dest.get(d))
        .and_then(|hotels| hotels.first());

    let total_days = itinerary.itinerary.len();
    let allocation = if session.destination_days.is_empty() {
        None
    } else {
        Some(session.destination_days.as_slice())
    };

    let days: Vec<PlanDay> = itinerary
        .itinerary
        .iter()
        .enumerate()
        .map(|(index, day)| {
            let assigned = AllocationService::destination_index(
                index,
                total_days,
                destinations.len(),
                allocation,
            )
            .map(|i| destinations[i].clone());
            let date = check_in + Duration::days(index as i64);

            let weather_tip = assigned.as_ref().and_then(|dest| {
                weather_by_dest
                    .get(dest)
                    .and_then(|forecasts| AllocationService::tip_for_date(forecasts, date))
                    .map(|tip| tip.to_string())
            });

            let hotel = assigned
                .as_ref()
                .and_then(|dest| hotels_by_dest.get(dest))
                .and_then(|hotels| hotels.first())
                .or(primary_hotel)
                .and_then(|hotel| {
                    AllocationService::nightly_for_date(hotel, date).map(|night| PlanHotelNight {
                        name: hotel.name.clone(),
                        price: night.price,
                        currency: night.currency.clone(),
                    })
                });

            PlanDay {
                day: day.day.clone(),
                title: day.title.clone(),
                emoji: day.emoji.clone(),
                destination: assigned,
                date: Some(date),
                weather_tip,
                hotel,
                morning: day.morning.clone(),
                afternoon: day.afternoon.clone(),
                evening: day.evening.clone(),
            }
        })
        .collect();

    HttpResponse::Ok().json(json!({
        "success": true,
        "plan": TripPlan {
            token,
            days,
            flights,
            estimated_costs: itinerary.estimated_costs.clone(),
            total_estimated_cost: itinerary.total_estimated_cost.clone(),
        },
    }))
}
