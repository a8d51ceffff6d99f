use std::error::Error;
use std::fmt;
use std::time::Duration;

use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;

use crate::models::weather::DailyForecast;

const GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

const HOT_DAY_MAX_C: f64 = 32.0;
const COLD_DAY_MAX_C: f64 = 5.0;
const RAIN_PROBABILITY_THRESHOLD: f64 = 40.0;

// Simplified groups over the Open-Meteo weather code table.
const THUNDER_CODES: [u8; 3] = [95, 96, 99];
const SNOW_CODES: [u8; 6] = [71, 73, 75, 77, 85, 86];
const DRIZZLE_CODES: [u8; 5] = [51, 53, 55, 56, 57];
const RAIN_CODES: [u8; 8] = [61, 63, 65, 66, 67, 80, 81, 82];
const FOG_CODES: [u8; 2] = [45, 48];
const CLOUDY_CODES: [u8; 3] = [1, 2, 3];

#[derive(Debug)]
pub enum WeatherError {
    HttpError(reqwest::Error),
    GeocodeFailed(String),
    ApiError { status: u16, body: String },
}

impl fmt::Display for WeatherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeatherError::HttpError(err) => write!(f, "HTTP error: {}", err),
            WeatherError::GeocodeFailed(city) => write!(f, "Failed to geocode city '{}'", city),
            WeatherError::ApiError { status, body } => {
                write!(f, "Weather API error {}: {}", status, body)
            }
        }
    }
}

impl Error for WeatherError {}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        WeatherError::HttpError(err)
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    results: Option<Vec<GeoResult>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeoResult {
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    daily: Option<DailyBlock>,
}

#[derive(Debug, Deserialize)]
struct DailyBlock {
    #[serde(default)]
    time: Vec<NaiveDate>,
    weathercode: Option<Vec<Option<u8>>>,
    temperature_2m_max: Option<Vec<Option<f64>>>,
    temperature_2m_min: Option<Vec<Option<f64>>>,
    precipitation_probability_max: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherCategory {
    Thunder,
    Snow,
    Rain,
    Drizzle,
    Fog,
    Cloudy,
    Clear,
}

pub fn categorize(code: u8) -> WeatherCategory {
    if THUNDER_CODES.contains(&code) {
        WeatherCategory::Thunder
    } else if SNOW_CODES.contains(&code) {
        WeatherCategory::Snow
    } else if DRIZZLE_CODES.contains(&code) {
        WeatherCategory::Drizzle
    } else if RAIN_CODES.contains(&code) {
        WeatherCategory::Rain
    } else if FOG_CODES.contains(&code) {
        WeatherCategory::Fog
    } else if CLOUDY_CODES.contains(&code) {
        WeatherCategory::Cloudy
    } else {
        WeatherCategory::Clear
    }
}

struct AdviceInput {
    category: WeatherCategory,
    t_max: f64,
    precip_prob: f64,
}

pub fn build_advice(code: u8, t_max: f64, precip_prob: f64) -> String {
    let input = AdviceInput {
        category: categorize(code),
        t_max,
        precip_prob,
    };

    // Ordered decision table; the first matching rule wins.
    let rules: [(fn(&AdviceInput) -> bool, &str); 7] = [
        (
            |i| i.category == WeatherCategory::Thunder,
            "Severe weather possible. Consider indoor plans and monitor local alerts.",
        ),
        (
            |i| i.category == WeatherCategory::Snow,
            "Cold and snowy. Wear warm layers and waterproof footwear.",
        ),
        (
            |i| {
                i.category == WeatherCategory::Rain
                    || i.category == WeatherCategory::Drizzle
                    || i.precip_prob >= RAIN_PROBABILITY_THRESHOLD
            },
            "Rain likely. Carry an umbrella or light rain jacket.",
        ),
        (
            |i| i.t_max >= HOT_DAY_MAX_C,
            "Hot day. Stay hydrated, apply sunscreen, and plan shade breaks.",
        ),
        (
            |i| i.t_max <= COLD_DAY_MAX_C,
            "Chilly day. Dress warmly with layers.",
        ),
        (
            |i| i.category == WeatherCategory::Fog,
            "Foggy conditions possible. Allow extra travel time and take caution.",
        ),
        (
            |i| i.category == WeatherCategory::Cloudy,
            "Partly cloudy. Comfortable for most outdoor activities.",
        ),
    ];

    for (predicate, message) in rules {
        if predicate(&input) {
            return message.to_string();
        }
    }
    "Clear weather. Great day for outdoor plans!".to_string()
}

pub struct WeatherService {
    client: Client,
}

impl WeatherService {
    pub fn new() -> Result<Self, WeatherError> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self { client })
    }

    /// Geocodes a free-text city name; the first match wins.
    pub async fn geocode_city(&self, name: &str) -> Result<Option<GeoResult>, WeatherError> {
        let response = self
            .client
            .get(GEOCODING_URL)
            .query(&[
                ("name", name),
                ("count", "1"),
                ("language", "en"),
                ("format", "json"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Ok(None);
        }

        let geo: GeocodeResponse = response.json().await?;
        Ok(geo.results.and_then(|mut results| {
            if results.is_empty() {
                None
            } else {
                Some(results.remove(0))
            }
        }))
    }

    /// Fetches the daily forecast for an explicit date range and derives the
    /// advice string for each day.
    pub async fn daily_forecast(
        &self,
        latitude: f64,
        longitude: f64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyForecast>, WeatherError> {
        let response = self
            .client
            .get(FORECAST_URL)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                (
                    "daily",
                    "weathercode,temperature_2m_max,temperature_2m_min,precipitation_probability_max"
                        .to_string(),
                ),
                ("timezone", "auto".to_string()),
                ("start_date", from.format("%Y-%m-%d").to_string()),
                ("end_date", to.format("%Y-%m-%d").to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WeatherError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let forecast: ForecastResponse = response.json().await?;
        Ok(build_daily(forecast))
    }

    /// Geocode + forecast in one call, returning the resolved city name.
    pub async fn city_forecast(
        &self,
        city: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<(String, Vec<DailyForecast>), WeatherError> {
        let geo = self
            .geocode_city(city)
            .await?
            .ok_or_else(|| WeatherError::GeocodeFailed(city.to_string()))?;
        let forecasts = self
            .daily_forecast(geo.latitude, geo.longitude, from, to)
            .await?;
        Ok((geo.name, forecasts))
    }
}

fn build_daily(forecast: ForecastResponse) -> Vec<DailyForecast> {
    let Some(daily) = forecast.daily else {
        return Vec::new();
    };

    let at = |values: &Option<Vec<Option<f64>>>, i: usize| -> f64 {
        values
            .as_ref()
            .and_then(|v| v.get(i).copied().flatten())
            .unwrap_or(0.0)
    };

    daily
        .time
        .iter()
        .enumerate()
        .map(|(i, date)| {
            let code = daily
                .weathercode
                .as_ref()
                .and_then(|v| v.get(i).copied().flatten())
                .unwrap_or(0);
            let t_max = at(&daily.temperature_2m_max, i);
            let t_min = at(&daily.temperature_2m_min, i);
            let precip_prob = at(&daily.precipitation_probability_max, i);
            DailyForecast {
                date: *date,
                tip: build_advice(code, t_max, precip_prob),
                t_max,
                t_min,
                precip_prob,
                code,
            }
        })
        .collect()
}
