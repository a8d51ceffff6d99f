pub mod allocation_service;
pub mod amadeus_service;
pub mod flight_service;
pub mod generation_service;
pub mod hotel_service;
pub mod session_service;
pub mod weather_service;
