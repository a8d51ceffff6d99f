use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

use crate::models::trip::TripRequest;
use crate::services::generation_service::GenerationService;

/*
    /api/generate
*/
pub async fn generate(
    data: web::Data<GenerationService>,
    input: web::Json<TripRequest>,
) -> impl Responder {
    let request = input.into_inner();
    if let Err(message) = request.validate() {
        return HttpResponse::BadRequest().json(json!({
            "success": false,
            "error": message,
        }));
    }

    match data.generate_itinerary(&request).await {
        Ok(itinerary) => match serde_json::to_string(&itinerary) {
            Ok(serialized) => HttpResponse::Ok().json(json!({
                "success": true,
                "itinerary": serialized,
            })),
            Err(err) => {
                eprintln!("Failed to serialize itinerary: {:?}", err);
                HttpResponse::InternalServerError().json(json!({
                    "success": false,
                    "error": "Failed to serialize itinerary.",
                }))
            }
        },
        Err(err) => {
            eprintln!("Itinerary generation failed: {}", err);
            HttpResponse::InternalServerError().json(json!({
                "success": false,
                "error": err.to_string(),
            }))
        }
    }
}
