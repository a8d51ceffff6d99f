use std::collections::HashMap;
use std::env;
use std::error::Error;
use std::fmt;
use std::sync::Mutex;
use std::time::Duration;

use chrono::Utc;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "https://test.api.amadeus.com";

// Refresh the cached token when it is within this many seconds of expiry.
const TOKEN_EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug)]
pub enum AmadeusError {
    EnvironmentError(String),
    HttpError(reqwest::Error),
    AuthError(String),
    ApiError { status: u16, path: String, body: String },
}

impl fmt::Display for AmadeusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmadeusError::EnvironmentError(msg) => write!(f, "Environment error: {}", msg),
            AmadeusError::HttpError(err) => write!(f, "HTTP error: {}", err),
            AmadeusError::AuthError(msg) => write!(f, "Authentication error: {}", msg),
            AmadeusError::ApiError { status, path, body } => {
                write!(f, "Amadeus API error {} for {}: {}", status, path, body)
            }
        }
    }
}

impl Error for AmadeusError {}

impl From<reqwest::Error> for AmadeusError {
    fn from(err: reqwest::Error) -> Self {
        AmadeusError::HttpError(err)
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: i64,
}

#[derive(Debug, Deserialize)]
pub struct LocationsResponse {
    #[serde(default)]
    pub data: Vec<LocationEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationEntry {
    pub iata_code: Option<String>,
    pub sub_type: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FlightOffersResponse {
    #[serde(default)]
    pub data: Vec<RawFlightOffer>,
    pub dictionaries: Option<FlightDictionaries>,
}

#[derive(Debug, Deserialize)]
pub struct FlightDictionaries {
    #[serde(default)]
    pub carriers: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFlightOffer {
    pub id: Option<String>,
    pub price: Option<RawFlightPrice>,
    #[serde(default)]
    pub itineraries: Vec<RawFlightItinerary>,
    #[serde(default)]
    pub validating_airline_codes: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFlightPrice {
    pub grand_total: Option<String>,
    pub total: Option<String>,
    pub currency: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawFlightItinerary {
    pub duration: Option<String>,
    #[serde(default)]
    pub segments: Vec<RawFlightSegment>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFlightSegment {
    pub departure: Option<RawFlightEndpoint>,
    pub arrival: Option<RawFlightEndpoint>,
    pub carrier_code: Option<String>,
    pub number: Option<String>,
    pub duration: Option<String>,
    pub aircraft: Option<RawAircraft>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFlightEndpoint {
    pub iata_code: Option<String>,
    pub terminal: Option<String>,
    pub at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawAircraft {
    pub code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HotelListResponse {
    #[serde(default)]
    pub data: Vec<HotelRef>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelRef {
    pub hotel_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HotelOffersResponse {
    #[serde(default)]
    pub data: Vec<RawHotelOfferItem>,
}

#[derive(Debug, Deserialize)]
pub struct RawHotelOfferItem {
    pub hotel: Option<RawHotelInfo>,
    #[serde(default)]
    pub offers: Vec<RawHotelOffer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawHotelInfo {
    pub hotel_id: Option<String>,
    pub name: Option<String>,
    pub rating: Option<String>,
    pub address: Option<RawHotelAddress>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawHotelAddress {
    #[serde(default)]
    pub lines: Vec<String>,
    pub city_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawHotelOffer {
    pub price: Option<RawHotelPrice>,
}

#[derive(Debug, Deserialize)]
pub struct RawHotelPrice {
    pub total: Option<String>,
    pub currency: Option<String>,
    pub variations: Option<PriceVariations>,
}

#[derive(Debug, Deserialize)]
pub struct PriceVariations {
    pub average: Option<AveragePrice>,
    #[serde(default)]
    pub changes: Vec<VariationChange>,
}

#[derive(Debug, Deserialize)]
pub struct AveragePrice {
    pub base: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariationChange {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub total: Option<String>,
    pub base: Option<String>,
}

pub struct FlightSearchParams {
    pub origin_location_code: String,
    pub destination_location_code: String,
    pub departure_date: String,
    pub return_date: Option<String>,
    pub adults: u32,
    pub children: u32,
    pub currency_code: String,
    pub max: u32,
    pub non_stop: bool,
}

/// Returns true when the input already looks like a 3-letter IATA code.
pub fn looks_like_iata(value: &str) -> bool {
    let candidate = value.trim().to_uppercase();
    Regex::new(r"^[A-Z]{3}$")
        .map(|re| re.is_match(&candidate))
        .unwrap_or(false)
}

pub struct AmadeusService {
    client: Client,
    base_url: String,
    client_id: String,
    client_secret: String,
    token_cache: Mutex<Option<CachedToken>>,
}

impl AmadeusService {
    pub fn from_env() -> Result<Self, AmadeusError> {
        let client_id = env::var("AMADEUS_API_KEY")
            .map_err(|_| AmadeusError::EnvironmentError("AMADEUS_API_KEY not set".to_string()))?;
        let client_secret = env::var("AMADEUS_API_SECRET").map_err(|_| {
            AmadeusError::EnvironmentError("AMADEUS_API_SECRET not set".to_string())
        })?;
        let base_url =
            env::var("AMADEUS_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            client,
            base_url,
            client_id,
            client_secret,
            token_cache: Mutex::new(None),
        })
    }

    /// Returns a valid OAuth access token, refreshing the cached one when it
    /// is within the expiry margin. Concurrent refreshes both produce valid
    /// tokens, so the cache is not otherwise synchronized.
    async fn access_token(&self) -> Result<String, AmadeusError> {
        let now = Utc::now().timestamp();
        {
            let cache = self.token_cache.lock().unwrap();
            if let Some(token) = cache.as_ref() {
                if token.expires_at > now + TOKEN_EXPIRY_MARGIN_SECS {
                    return Ok(token.access_token.clone());
                }
            }
        }

        let url = format!("{}/v1/security/oauth2/token", self.base_url);
        let response = self
            .client
            .post(&url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AmadeusError::AuthError(format!(
                "Failed to obtain Amadeus token ({}): {}",
                status.as_u16(),
                body
            )));
        }

        let token: TokenResponse = response.json().await?;
        let cached = CachedToken {
            access_token: token.access_token.clone(),
            expires_at: now + token.expires_in,
        };
        *self.token_cache.lock().unwrap() = Some(cached);
        Ok(token.access_token)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, AmadeusError> {
        let token = self.access_token().await?;
        let url = format!("{}{}", self.base_url, path);
        let query: Vec<(&str, &str)> = params
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| (*k, v.as_str()))
            .collect();

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AmadeusError::ApiError {
                status: status.as_u16(),
                path: path.to_string(),
                body,
            });
        }

        Ok(response.json::<T>().await?)
    }

    /// Resolves free-text input to a 3-letter city/location code. Input that
    /// already looks like an IATA code passes through unchanged.
    pub async fn resolve_location_code(
        &self,
        keyword: &str,
    ) -> Result<Option<String>, AmadeusError> {
        let trimmed = keyword.trim();
        if trimmed.chars().count() < 2 {
            return Ok(None);
        }
        if looks_like_iata(trimmed) {
            return Ok(Some(trimmed.to_uppercase()));
        }

        let response: LocationsResponse = self
            .get_json(
                "/v1/reference-data/locations",
                &[
                    ("subType", "CITY".to_string()),
                    ("keyword", trimmed.to_string()),
                ],
            )
            .await?;

        let code = response.data.into_iter().find_map(|entry| {
            match (entry.sub_type.as_deref(), entry.iata_code) {
                (Some("CITY"), Some(code)) if !code.is_empty() => Some(code),
                _ => None,
            }
        });
        Ok(code)
    }

    pub async fn search_flight_offers(
        &self,
        params: &FlightSearchParams,
    ) -> Result<FlightOffersResponse, AmadeusError> {
        let mut query = vec![
            ("originLocationCode", params.origin_location_code.clone()),
            (
                "destinationLocationCode",
                params.destination_location_code.clone(),
            ),
            ("departureDate", params.departure_date.clone()),
            ("adults", params.adults.to_string()),
            ("currencyCode", params.currency_code.clone()),
            ("max", params.max.to_string()),
            ("nonStop", params.non_stop.to_string()),
        ];
        if let Some(return_date) = &params.return_date {
            query.push(("returnDate", return_date.clone()));
        }
        if params.children > 0 {
            query.push(("children", params.children.to_string()));
        }

        self.get_json("/v2/shopping/flight-offers", &query).await
    }

    pub async fn list_hotels_by_city(
        &self,
        city_code: &str,
    ) -> Result<HotelListResponse, AmadeusError> {
        self.get_json(
            "/v1/reference-data/locations/hotels/by-city",
            &[("cityCode", city_code.to_string())],
        )
        .await
    }

    /// Fetches FULL-view offers for a batch of hotel ids, cheapest rate only.
    pub async fn hotel_offers_by_ids(
        &self,
        hotel_ids: &[String],
        adults: u32,
        check_in_date: &str,
        check_out_date: &str,
        currency: &str,
        room_quantity: u32,
    ) -> Result<HotelOffersResponse, AmadeusError> {
        self.get_json(
            "/v3/shopping/hotel-offers",
            &[
                ("hotelIds", hotel_ids.join(",")),
                ("adults", adults.to_string()),
                ("checkInDate", check_in_date.to_string()),
                ("checkOutDate", check_out_date.to_string()),
                ("currency", currency.to_string()),
                ("roomQuantity", room_quantity.to_string()),
                ("bestRateOnly", "true".to_string()),
                ("view", "FULL".to_string()),
            ],
        )
        .await
    }
}
