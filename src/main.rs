use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use tripgenie_api::routes;
use tripgenie_api::services::amadeus_service::AmadeusService;
use tripgenie_api::services::generation_service::GenerationService;
use tripgenie_api::services::session_service::SessionStore;
use tripgenie_api::services::weather_service::WeatherService;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    println!("Application starting...");

    env_logger::init_from_env(Env::default().default_filter_or("info"));

    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    } else {
        println!("Release mode");
    }

    let host = std::env::var("HOST").unwrap_or_else(|_| HOST.to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| PORT.to_string())
        .parse()
        .unwrap_or(PORT);
    println!("Attempting to bind to {}:{}", host, port);

    let amadeus = web::Data::new(
        AmadeusService::from_env().expect("Amadeus credentials must be configured"),
    );
    let generation = web::Data::new(
        GenerationService::from_env().expect("Gemini API key must be configured"),
    );
    let weather =
        web::Data::new(WeatherService::new().expect("Failed to build weather HTTP client"));
    let sessions = web::Data::new(SessionStore::from_env());

    println!("Starting HTTP server...");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .route("/health", web::get().to(|| async { "OK" }))
            .app_data(amadeus.clone())
            .app_data(generation.clone())
            .app_data(weather.clone())
            .app_data(sessions.clone())
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
    })
    .bind((host, port))?
    .run()
    .await
}
