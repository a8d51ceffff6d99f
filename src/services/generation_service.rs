use std::env;
use std::error::Error;
use std::fmt;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::models::itinerary::Itinerary;
use crate::models::trip::TripRequest;

const GENERATE_URL_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

// Illustrative context blocks embedded in the generation prompt. Static
// filler, independent of the live forecast fetched for display; see DESIGN.md
// for the pending product decision on them.
const CONTEXT_WEATHER: &str = "Generally sunny with some clouds. Highs around 75°F (24°C). A 20% chance of a brief afternoon shower on the third day.";
const CONTEXT_EVENTS: &str = "Local farmers market at the city center (Saturdays, 9am-1pm). Live music festival at Central Park (Friday evenings). Art exhibition at the Modern Art Museum (daily).";

#[derive(Debug)]
pub enum GenerationError {
    EnvironmentError(String),
    HttpError(reqwest::Error),
    ApiError { status: u16, body: String },
    InvalidOutput(String),
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::EnvironmentError(msg) => write!(f, "Environment error: {}", msg),
            GenerationError::HttpError(err) => write!(f, "HTTP error: {}", err),
            GenerationError::ApiError { status, body } => {
                write!(f, "Generation API error {}: {}", status, body)
            }
            GenerationError::InvalidOutput(msg) => {
                write!(f, "AI failed to generate a valid itinerary: {}", msg)
            }
        }
    }
}

impl Error for GenerationError {}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        GenerationError::HttpError(err)
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

pub struct GenerationService {
    client: Client,
    api_key: String,
    model: String,
}

impl GenerationService {
    pub fn from_env() -> Result<Self, GenerationError> {
        let api_key = env::var("GEMINI_API_KEY")
            .or_else(|_| env::var("GOOGLE_API_KEY"))
            .map_err(|_| {
                GenerationError::EnvironmentError(
                    "GEMINI_API_KEY or GOOGLE_API_KEY not set".to_string(),
                )
            })?;
        let model = env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let client = Client::builder().timeout(Duration::from_secs(120)).build()?;

        Ok(Self {
            client,
            api_key,
            model,
        })
    }

    /// One model call with a strict JSON response schema. A reply that fails
    /// typed parsing is surfaced as an error; nothing is retried.
    pub async fn generate_itinerary(
        &self,
        request: &TripRequest,
    ) -> Result<Itinerary, GenerationError> {
        let prompt = build_prompt(request);
        let url = format!("{}/{}:generateContent", GENERATE_URL_BASE, self.model);

        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema()
            }
        });

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let payload: GenerateContentResponse = response.json().await?;
        let text = payload
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or_else(|| {
                GenerationError::InvalidOutput("model returned no content".to_string())
            })?;

        let itinerary: Itinerary = serde_json::from_str(&text)
            .map_err(|e| GenerationError::InvalidOutput(e.to_string()))?;
        if itinerary.itinerary.is_empty() {
            return Err(GenerationError::InvalidOutput(
                "itinerary contained no days".to_string(),
            ));
        }
        Ok(itinerary)
    }
}

/// Renders the itinerary prompt from the trip fields.
pub fn build_prompt(request: &TripRequest) -> String {
    let destinations = request.destination_list();
    let primary = destinations.first().cloned().unwrap_or_default();
    let additional = if destinations.len() > 1 {
        destinations[1..].join(", ")
    } else {
        "None".to_string()
    };
    let allocation = match request.allocation() {
        Some(days) if !days.is_empty() => days
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(" / "),
        _ => "None".to_string(),
    };
    let travel_dates = format!(
        "From {} to {}",
        request.travel_dates.from.format("%B %-d, %Y"),
        request.travel_dates.to.format("%B %-d, %Y")
    );

    format!(
        r#"You are an expert travel agent and logistics planner with the persona of a knowledgeable and enthusiastic guide. Your task is to create a highly personalized, practical, and dynamic day-by-day travel itinerary in a structured JSON format.

User's Trip Data:
- Primary Destination: {primary}
- Additional Destinations: {additional}
- Day Allocation (if provided): {allocation} (per destinations order)
- Travel Dates: {travel_dates}
- Budget: {budget}
- Travelers (total): {travelers}
- Children: {children}
- Rooms: {rooms}
- Preferred Currency: {currency}
- Travel Style: {travel_style}
- User's Dream Trip Description: {dream_trip}

Real-Time Contextual Data:
- Weather Forecast: {context_weather}
- Local Events: {context_events}

Your Instructions:
1. Generate a detailed, day-by-day itinerary across ALL specified destinations (if multiple). If a day allocation is provided, allocate that many days to each destination in order. Otherwise, distribute days logically to minimize backtracking and travel time.
   - Clearly tailor activities to the current destination of that day.
   - If multiple destinations are provided, ensure transitions between them are logical.
2. Crucially, you must integrate the real-time data. Weave the local events into the schedule where appropriate. The itinerary must be adapted to the weather forecast.
3. For each activity, you MUST include transportation details to the next activity in the 'transportToNext' field. This should include the mode of transport, estimated departure and arrival times, cost, and from/to locations. Be specific. For the last activity of the day (evening), the 'transportToNext' field can be omitted.
4. Include the name of the transportation provider (e.g., airline, bus company, metro line) in the 'details' field of the 'transportToNext' object.
5. Based on destinations, duration, travelers (adults + children), rooms, and budget, provide a realistic cost estimation for 'food', 'accommodation', and 'transportation' in the preferred currency when possible. Present these as a range (e.g., '$500 - $700').
6. Calculate the 'totalEstimatedCost' by summing the lower and upper bounds of the individual cost estimates.
7. Optimize the schedule to minimize travel time between locations where possible.
8. For each day, provide a catchy 'title' and a relevant 'emoji'.
9. Populate the 'weatherAdvice' field for a day if there is specific, actionable advice based on the provided weather forecast.
10. The final output must be a valid JSON object matching the provided output schema."#,
        primary = primary,
        additional = additional,
        allocation = allocation,
        travel_dates = travel_dates,
        budget = request.budget,
        travelers = request.total_travelers(),
        children = request.children_count(),
        rooms = request.room_count(),
        currency = request.currency_code(),
        travel_style = request.travel_style.join(", "),
        dream_trip = request.dream_trip,
        context_weather = CONTEXT_WEATHER,
        context_events = CONTEXT_EVENTS,
    )
}

fn transport_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "mode": { "type": "STRING" },
            "details": { "type": "STRING" },
            "departureTime": { "type": "STRING" },
            "arrivalTime": { "type": "STRING" },
            "cost": { "type": "STRING" },
            "from": { "type": "STRING" },
            "to": { "type": "STRING" }
        },
        "required": ["mode", "departureTime", "arrivalTime", "cost", "from", "to"]
    })
}

fn activity_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "activity": { "type": "STRING" },
            "description": { "type": "STRING" },
            "transportToNext": transport_schema()
        },
        "required": ["activity", "description"]
    })
}

/// The strict output schema handed to the model; mirrors the `Itinerary`
/// data model.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "itinerary": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "day": { "type": "STRING" },
                        "title": { "type": "STRING" },
                        "emoji": { "type": "STRING" },
                        "morning": activity_schema(),
                        "afternoon": activity_schema(),
                        "evening": activity_schema(),
                        "weatherAdvice": { "type": "STRING" }
                    },
                    "required": ["day", "title", "emoji", "morning", "afternoon", "evening"]
                }
            },
            "estimatedCosts": {
                "type": "OBJECT",
                "properties": {
                    "food": { "type": "STRING" },
                    "accommodation": { "type": "STRING" },
                    "transportation": { "type": "STRING" }
                },
                "required": ["food", "accommodation", "transportation"]
            },
            "totalEstimatedCost": { "type": "STRING" }
        },
        "required": ["itinerary", "estimatedCosts", "totalEstimatedCost"]
    })
}
