pub mod flights;
pub mod hotels;
pub mod itinerary;
pub mod plan;
pub mod trip;
pub mod weather;
