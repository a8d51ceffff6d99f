pub mod flights;
pub mod generate;
pub mod hotels;
pub mod trip;
pub mod weather;
