use serde::{Deserialize, Serialize};

/// The structured itinerary produced by the generation flow. Field names
/// match the JSON the model is asked to emit.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Itinerary {
    pub itinerary: Vec<DayPlan>,
    pub estimated_costs: Option<EstimatedCosts>,
    pub total_estimated_cost: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    pub day: String,
    pub title: String,
    pub emoji: String,
    pub morning: Activity,
    pub afternoon: Activity,
    pub evening: Activity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_advice: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub activity: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport_to_next: Option<Transport>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Transport {
    pub mode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub departure_time: String,
    pub arrival_time: String,
    pub cost: String,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EstimatedCosts {
    pub food: String,
    pub accommodation: String,
    pub transportation: String,
}
