use serde::{Deserialize, Serialize};

/// A flight offer flattened from the vendor response for the UI.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FlightOffer {
    pub id: String,
    pub price: FlightPrice,
    pub airlines: Vec<String>,
    pub itineraries: Vec<FlightItinerary>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FlightPrice {
    pub total: f64,
    pub currency: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FlightItinerary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    pub segments: Vec<FlightSegment>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FlightSegment {
    pub departure: FlightEndpoint,
    pub arrival: FlightEndpoint,
    pub carrier_code: String,
    pub carrier_name: String,
    pub number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aircraft: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FlightEndpoint {
    pub iata_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terminal: Option<String>,
    pub at: String,
}
