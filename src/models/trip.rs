use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const MIN_DREAM_TRIP_LEN: usize = 10;
const MAX_DREAM_TRIP_LEN: usize = 1000;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TravelDates {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Trip intake payload. Accepts either a single `destination` or a
/// `destinations` list; `destinationDays` optionally maps a day count to each
/// destination in order.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TripRequest {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub destinations: Option<Vec<String>>,
    pub destination_days: Option<Vec<u32>>,
    pub travel_dates: TravelDates,
    pub budget: String,
    pub travelers: u32,
    pub children: Option<u32>,
    pub rooms: Option<u32>,
    pub currency: Option<String>,
    pub travel_style: Vec<String>,
    pub dream_trip: String,
}

impl TripRequest {
    /// Destinations in order, falling back to the single `destination` field.
    pub fn destination_list(&self) -> Vec<String> {
        let mut list: Vec<String> = self
            .destinations
            .clone()
            .unwrap_or_default()
            .into_iter()
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .collect();
        if list.is_empty() {
            if let Some(dest) = &self.destination {
                if !dest.trim().is_empty() {
                    list.push(dest.trim().to_string());
                }
            }
        }
        list
    }

    /// Day allocation truncated to the destination count. Returns `None` when
    /// no vector was supplied at all.
    pub fn allocation(&self) -> Option<Vec<u32>> {
        let dest_count = self.destination_list().len();
        self.destination_days
            .as_ref()
            .map(|days| days.iter().copied().take(dest_count).collect())
    }

    pub fn total_travelers(&self) -> u32 {
        self.travelers + self.children.unwrap_or(0)
    }

    pub fn children_count(&self) -> u32 {
        self.children.unwrap_or(0)
    }

    pub fn room_count(&self) -> u32 {
        self.rooms.unwrap_or(1).max(1)
    }

    pub fn currency_code(&self) -> String {
        self.currency
            .as_deref()
            .map(|c| c.trim().to_uppercase())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| "USD".to_string())
    }

    pub fn validate(&self) -> Result<(), String> {
        let destinations = self.destination_list();
        if destinations.is_empty() {
            return Err("At least one destination is required.".to_string());
        }
        if destinations.iter().any(|d| d.chars().count() < 2) {
            return Err("Each destination must be at least 2 characters.".to_string());
        }
        if self.budget.trim().is_empty() {
            return Err("Budget is required.".to_string());
        }
        if self.travelers < 1 {
            return Err("At least one traveler is required.".to_string());
        }
        if self.travel_style.is_empty() {
            return Err("At least one travel style is required.".to_string());
        }
        let dream_len = self.dream_trip.trim().chars().count();
        if !(MIN_DREAM_TRIP_LEN..=MAX_DREAM_TRIP_LEN).contains(&dream_len) {
            return Err(format!(
                "Dream trip description must be between {} and {} characters.",
                MIN_DREAM_TRIP_LEN, MAX_DREAM_TRIP_LEN
            ));
        }
        if let Some(currency) = &self.currency {
            if currency.trim().chars().count() != 3 {
                return Err("Currency must be a 3-letter code.".to_string());
            }
        }
        if self.travel_dates.to < self.travel_dates.from {
            return Err("Trip end date must not be before the start date.".to_string());
        }
        Ok(())
    }
}
