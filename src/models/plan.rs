use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::flights::FlightOffer;
use crate::models::itinerary::{Activity, EstimatedCosts};

/// The enriched day-by-day view: each day joined with its assigned
/// destination, that destination's weather tip for the calendar date, and the
/// nightly rate of the cheapest hotel there.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TripPlan {
    pub token: String,
    pub days: Vec<PlanDay>,
    pub flights: Vec<FlightOffer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_costs: Option<EstimatedCosts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_estimated_cost: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PlanDay {
    pub day: String,
    pub title: String,
    pub emoji: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_tip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotel: Option<PlanHotelNight>,
    pub morning: Activity,
    pub afternoon: Activity,
    pub evening: Activity,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PlanHotelNight {
    pub name: String,
    pub price: f64,
    pub currency: String,
}
