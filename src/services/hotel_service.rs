use std::error::Error;
use std::fmt;

use chrono::{Duration, NaiveDate};

use crate::models::hotels::{HotelOffer, NightlyRate, PriceTotal};
use crate::services::amadeus_service::{
    AmadeusError, AmadeusService, RawHotelOffer, RawHotelOfferItem,
};

// Offer lookups are chunked to keep the hotelIds query parameter within URL
// length limits.
pub const HOTEL_ID_BATCH_SIZE: usize = 20;

#[derive(Debug)]
pub enum HotelSearchError {
    CityResolution(String),
    Amadeus(AmadeusError),
}

impl fmt::Display for HotelSearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HotelSearchError::CityResolution(city) => {
                write!(f, "Unable to resolve city code for '{}'", city)
            }
            HotelSearchError::Amadeus(err) => write!(f, "{}", err),
        }
    }
}

impl Error for HotelSearchError {}

impl From<AmadeusError> for HotelSearchError {
    fn from(err: AmadeusError) -> Self {
        HotelSearchError::Amadeus(err)
    }
}

pub struct CityHotels {
    pub city_code: String,
    pub hotels: Vec<HotelOffer>,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn parse_amount(value: Option<&String>) -> Option<f64> {
    value.and_then(|v| v.parse::<f64>().ok())
}

fn parse_date(value: Option<&String>) -> Option<NaiveDate> {
    value.and_then(|v| NaiveDate::parse_from_str(v, "%Y-%m-%d").ok())
}

pub fn batch_ids(ids: &[String]) -> Vec<Vec<String>> {
    ids.chunks(HOTEL_ID_BATCH_SIZE)
        .map(|chunk| chunk.to_vec())
        .collect()
}

/// Picks the offer with the lowest total price.
pub fn cheapest_offer(offers: &[RawHotelOffer]) -> Option<&RawHotelOffer> {
    offers.iter().min_by(|a, b| {
        let a_total = a
            .price
            .as_ref()
            .and_then(|p| parse_amount(p.total.as_ref()))
            .unwrap_or(0.0);
        let b_total = b
            .price
            .as_ref()
            .and_then(|p| parse_amount(p.total.as_ref()))
            .unwrap_or(0.0);
        a_total
            .partial_cmp(&b_total)
            .unwrap_or(std::cmp::Ordering::Equal)
    })
}

/// Derives the per-night price schedule for an offer. Preference order:
/// explicit per-date variation buckets, then the average nightly base, then
/// an even division of the total across the stay.
pub fn nightly_schedule(
    offer: &RawHotelOffer,
    check_in: NaiveDate,
    nights: i64,
    total: f64,
    currency: &str,
) -> Vec<NightlyRate> {
    let variations = offer.price.as_ref().and_then(|p| p.variations.as_ref());
    let mut nightly = Vec::with_capacity(nights as usize);

    if let Some(vars) = variations {
        if !vars.changes.is_empty() {
            for i in 0..nights {
                let day = check_in + Duration::days(i);
                let bucket = vars.changes.iter().find(|change| {
                    let Some(start) = parse_date(change.start_date.as_ref()) else {
                        return false;
                    };
                    let end = parse_date(change.end_date.as_ref())
                        .unwrap_or(start + Duration::days(1));
                    day >= start && day < end
                });

                let night_price = match bucket.and_then(|b| {
                    parse_amount(b.total.as_ref()).and_then(|bucket_total| {
                        let start = parse_date(b.start_date.as_ref())?;
                        let end = parse_date(b.end_date.as_ref())
                            .unwrap_or(start + Duration::days(1));
                        let bucket_nights = (end - start).num_days().max(1);
                        Some(bucket_total / bucket_nights as f64)
                    })
                }) {
                    Some(price) => price,
                    None => total / nights as f64,
                };
                nightly.push(NightlyRate {
                    date: day,
                    price: round2(night_price),
                    currency: currency.to_string(),
                });
            }
            return nightly;
        }

        if let Some(avg) = vars
            .average
            .as_ref()
            .and_then(|a| parse_amount(a.base.as_ref()))
        {
            for i in 0..nights {
                nightly.push(NightlyRate {
                    date: check_in + Duration::days(i),
                    price: round2(avg),
                    currency: currency.to_string(),
                });
            }
            return nightly;
        }
    }

    let per_night = total / nights as f64;
    for i in 0..nights {
        nightly.push(NightlyRate {
            date: check_in + Duration::days(i),
            price: round2(per_night),
            currency: currency.to_string(),
        });
    }
    nightly
}

/// Normalizes one vendor hotel+offers item into a `HotelOffer`, keeping the
/// cheapest offer only. Items with no usable offer are dropped.
pub fn normalize_item(
    item: &RawHotelOfferItem,
    check_in: NaiveDate,
    check_out: NaiveDate,
    fallback_currency: &str,
) -> Option<HotelOffer> {
    let nights = (check_out - check_in).num_days().max(1);
    let cheapest = cheapest_offer(&item.offers)?;
    let price = cheapest.price.as_ref();
    let total = price
        .and_then(|p| parse_amount(p.total.as_ref()))
        .unwrap_or(0.0);
    let currency = price
        .and_then(|p| p.currency.clone())
        .unwrap_or_else(|| fallback_currency.to_string());

    let info = item.hotel.as_ref();
    let address = info
        .and_then(|h| h.address.as_ref())
        .map(|addr| {
            if addr.lines.is_empty() {
                addr.city_name.clone().unwrap_or_default()
            } else {
                addr.lines.join(", ")
            }
        })
        .unwrap_or_default();

    Some(HotelOffer {
        id: info.and_then(|h| h.hotel_id.clone()).unwrap_or_default(),
        name: info.and_then(|h| h.name.clone()).unwrap_or_default(),
        rating: info.and_then(|h| h.rating.clone()),
        address,
        check_in_date: check_in,
        check_out_date: check_out,
        total: PriceTotal {
            amount: round2(total),
            currency: currency.clone(),
        },
        nightly: nightly_schedule(cheapest, check_in, nights, total, &currency),
    })
}

/// Full city hotel search: resolves the city code, lists hotel ids, fetches
/// offers in batches, and returns the normalized list sorted by total price
/// ascending.
pub async fn search_city_hotels(
    amadeus: &AmadeusService,
    city: &str,
    check_in: NaiveDate,
    check_out: NaiveDate,
    adults: u32,
    currency: &str,
    room_quantity: u32,
) -> Result<CityHotels, HotelSearchError> {
    let city_code = amadeus
        .resolve_location_code(city)
        .await?
        .ok_or_else(|| HotelSearchError::CityResolution(city.to_string()))?;

    let listing = amadeus.list_hotels_by_city(&city_code).await?;
    let hotel_ids: Vec<String> = listing
        .data
        .into_iter()
        .filter_map(|h| h.hotel_id)
        .filter(|id| !id.is_empty())
        .collect();

    if hotel_ids.is_empty() {
        return Ok(CityHotels {
            city_code,
            hotels: Vec::new(),
        });
    }

    let check_in_str = check_in.format("%Y-%m-%d").to_string();
    let check_out_str = check_out.format("%Y-%m-%d").to_string();

    let mut combined: Vec<RawHotelOfferItem> = Vec::new();
    for batch in batch_ids(&hotel_ids) {
        let response = amadeus
            .hotel_offers_by_ids(
                &batch,
                adults,
                &check_in_str,
                &check_out_str,
                currency,
                room_quantity,
            )
            .await?;
        combined.extend(response.data);
    }

    let mut hotels: Vec<HotelOffer> = combined
        .iter()
        .filter_map(|item| normalize_item(item, check_in, check_out, currency))
        .collect();
    hotels.sort_by(|a, b| {
        a.total
            .amount
            .partial_cmp(&b.total.amount)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Ok(CityHotels { city_code, hotels })
}
