use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day of forecast data plus the derived advice string.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub tip: String,
    pub t_max: f64,
    pub t_min: f64,
    pub precip_prob: f64,
    pub code: u8,
}
