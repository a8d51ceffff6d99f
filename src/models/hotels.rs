use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A hotel offer normalized from the vendor response: the cheapest offer per
/// property plus a per-night price schedule.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct HotelOffer {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    pub address: String,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub total: PriceTotal,
    pub nightly: Vec<NightlyRate>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PriceTotal {
    pub amount: f64,
    pub currency: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NightlyRate {
    pub date: NaiveDate,
    pub price: f64,
    pub currency: String,
}
