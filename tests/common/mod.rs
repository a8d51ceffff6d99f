use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App};
use chrono::NaiveDate;

use tripgenie_api::routes;
use tripgenie_api::services::amadeus_service::AmadeusService;
use tripgenie_api::services::generation_service::GenerationService;
use tripgenie_api::services::session_service::{NewTripSession, SessionStore};
use tripgenie_api::services::weather_service::WeatherService;

pub struct TestApp {
    pub amadeus: web::Data<AmadeusService>,
    pub generation: web::Data<GenerationService>,
    pub weather: web::Data<WeatherService>,
    pub sessions: web::Data<SessionStore>,
}

impl TestApp {
    pub fn new() -> Self {
        // Dummy vendor credentials; tests only exercise paths that return
        // before any vendor call is made.
        std::env::set_var("AMADEUS_API_KEY", "test-key");
        std::env::set_var("AMADEUS_API_SECRET", "test-secret");
        std::env::set_var("GEMINI_API_KEY", "test-gemini-key");

        Self {
            amadeus: web::Data::new(
                AmadeusService::from_env().expect("Amadeus test config failed"),
            ),
            generation: web::Data::new(
                GenerationService::from_env().expect("Gemini test config failed"),
            ),
            weather: web::Data::new(WeatherService::new().expect("weather client build failed")),
            sessions: web::Data::new(SessionStore::from_env()),
        }
    }

    /// Seeds a trip session directly, bypassing the generation flow.
    pub fn seed_session(
        &self,
        destinations: Vec<String>,
        destination_days: Vec<u32>,
        itinerary_json: &str,
    ) -> String {
        self.sessions.insert(NewTripSession {
            origin: String::new(),
            destinations,
            destination_days,
            date_from: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            date_to: NaiveDate::from_ymd_opt(2026, 9, 3).unwrap(),
            travelers: 2,
            children: 0,
            rooms: 1,
            currency: "USD".to_string(),
            itinerary_json: itinerary_json.to_string(),
        })
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .route("/health", web::get().to(|| async { "OK" }))
            .app_data(self.amadeus.clone())
            .app_data(self.generation.clone())
            .app_data(self.weather.clone())
            .app_data(self.sessions.clone())
            .service(
                web::scope("/api")
                    .route("/generate", web::post().to(routes::generate::generate))
                    .route("/flights", web::get().to(routes::flights::search))
                    .route("/hotels", web::get().to(routes::hotels::search))
                    .route("/weather", web::get().to(routes::weather::forecast))
                    .service(
                        web::scope("/trips")
                            .route("", web::post().to(routes::trip::create))
                            .route("/{token}", web::get().to(routes::trip::get_by_token))
                            .route("/{token}/plan", web::get().to(routes::trip::plan)),
                    ),
            )
    }
}

/// A minimal but schema-complete itinerary for seeding sessions.
pub fn sample_itinerary_json() -> String {
    serde_json::json!({
        "itinerary": [
            {
                "day": "Day 1",
                "title": "Getting settled",
                "emoji": "🧳",
                "morning": { "activity": "Arrive", "description": "Check in and drop bags." },
                "afternoon": { "activity": "Old town walk", "description": "First look around." },
                "evening": { "activity": "Dinner", "description": "Neighborhood bistro." }
            },
            {
                "day": "Day 2",
                "title": "Museums",
                "emoji": "🖼️",
                "morning": { "activity": "Gallery", "description": "Morning exhibition." },
                "afternoon": { "activity": "Park", "description": "Picnic lunch." },
                "evening": { "activity": "Concert", "description": "Evening show." }
            }
        ],
        "estimatedCosts": {
            "food": "$200 - $300 USD",
            "accommodation": "$400 - $600 USD",
            "transportation": "$50 - $80 USD"
        },
        "totalEstimatedCost": "$650 - $980 USD"
    })
    .to_string()
}
