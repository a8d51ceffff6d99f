use crate::models::flights::{
    FlightEndpoint, FlightItinerary, FlightOffer, FlightPrice, FlightSegment,
};
use crate::services::amadeus_service::{
    AmadeusError, AmadeusService, FlightOffersResponse, FlightSearchParams, RawFlightEndpoint,
};

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Flattens vendor flight offers into the lightweight representation the UI
/// consumes, resolving carrier codes to names via the response dictionary.
pub fn normalize_offers(
    response: FlightOffersResponse,
    fallback_currency: &str,
) -> Vec<FlightOffer> {
    let carriers = response
        .dictionaries
        .map(|d| d.carriers)
        .unwrap_or_default();
    let carrier_name = |code: &str| -> String {
        carriers
            .get(code)
            .cloned()
            .unwrap_or_else(|| code.to_string())
    };

    response
        .data
        .into_iter()
        .map(|offer| {
            let price = offer.price.as_ref();
            let total = price
                .and_then(|p| p.grand_total.as_ref().or(p.total.as_ref()))
                .map(|v| v.parse::<f64>().unwrap_or(0.0))
                .unwrap_or(0.0);
            let currency = price
                .and_then(|p| p.currency.clone())
                .unwrap_or_else(|| fallback_currency.to_string());

            let itineraries = offer
                .itineraries
                .into_iter()
                .map(|it| FlightItinerary {
                    duration: it.duration,
                    segments: it
                        .segments
                        .into_iter()
                        .map(|seg| {
                            let code = seg.carrier_code.unwrap_or_default();
                            FlightSegment {
                                departure: endpoint(seg.departure),
                                arrival: endpoint(seg.arrival),
                                carrier_name: carrier_name(&code),
                                carrier_code: code,
                                number: seg.number.unwrap_or_default(),
                                duration: seg.duration,
                                aircraft: seg.aircraft.and_then(|a| a.code),
                            }
                        })
                        .collect(),
                })
                .collect();

            let mut airlines: Vec<String> = Vec::new();
            for code in &offer.validating_airline_codes {
                let name = carrier_name(code);
                if !airlines.contains(&name) {
                    airlines.push(name);
                }
            }

            FlightOffer {
                id: offer.id.unwrap_or_default(),
                price: FlightPrice {
                    total: round2(total),
                    currency,
                },
                airlines,
                itineraries,
            }
        })
        .collect()
}

fn endpoint(raw: Option<RawFlightEndpoint>) -> FlightEndpoint {
    match raw {
        Some(ep) => FlightEndpoint {
            iata_code: ep.iata_code.unwrap_or_default(),
            terminal: ep.terminal,
            at: ep.at.unwrap_or_default(),
        },
        None => FlightEndpoint {
            iata_code: String::new(),
            terminal: None,
            at: String::new(),
        },
    }
}

/// Runs a full flight search: resolves both endpoints to location codes,
/// queries offers, and normalizes the result. Returns the resolved codes so
/// callers can echo them back.
pub async fn search_flights(
    amadeus: &AmadeusService,
    origin: &str,
    destination: &str,
    departure_date: &str,
    return_date: Option<&str>,
    adults: u32,
    children: u32,
    currency_code: &str,
    max: u32,
    non_stop: bool,
) -> Result<(String, String, Vec<FlightOffer>), AmadeusError> {
    let origin_code = ensure_code(amadeus, origin).await?;
    let destination_code = ensure_code(amadeus, destination).await?;

    let response = amadeus
        .search_flight_offers(&FlightSearchParams {
            origin_location_code: origin_code.clone(),
            destination_location_code: destination_code.clone(),
            departure_date: departure_date.to_string(),
            return_date: return_date.map(|d| d.to_string()),
            adults,
            children,
            currency_code: currency_code.to_string(),
            max,
            non_stop,
        })
        .await?;

    let flights = normalize_offers(response, currency_code);
    Ok((origin_code, destination_code, flights))
}

// Unresolvable free text falls back to its uppercased form, letting the
// vendor report the invalid code.
async fn ensure_code(amadeus: &AmadeusService, value: &str) -> Result<String, AmadeusError> {
    Ok(amadeus
        .resolve_location_code(value)
        .await?
        .unwrap_or_else(|| value.trim().to_uppercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::amadeus_service::{
        FlightDictionaries, RawAircraft, RawFlightEndpoint, RawFlightItinerary, RawFlightOffer,
        RawFlightPrice, RawFlightSegment,
    };
    use std::collections::HashMap;

    fn sample_response() -> FlightOffersResponse {
        let mut carriers = HashMap::new();
        carriers.insert("AA".to_string(), "American Airlines".to_string());

        FlightOffersResponse {
            data: vec![RawFlightOffer {
                id: Some("1".to_string()),
                price: Some(RawFlightPrice {
                    grand_total: Some("523.456".to_string()),
                    total: Some("500.00".to_string()),
                    currency: Some("USD".to_string()),
                }),
                itineraries: vec![RawFlightItinerary {
                    duration: Some("PT8H15M".to_string()),
                    segments: vec![RawFlightSegment {
                        departure: Some(RawFlightEndpoint {
                            iata_code: Some("JFK".to_string()),
                            terminal: Some("8".to_string()),
                            at: Some("2026-09-01T18:30:00".to_string()),
                        }),
                        arrival: Some(RawFlightEndpoint {
                            iata_code: Some("CDG".to_string()),
                            terminal: None,
                            at: Some("2026-09-02T07:45:00".to_string()),
                        }),
                        carrier_code: Some("AA".to_string()),
                        number: Some("250".to_string()),
                        duration: Some("PT8H15M".to_string()),
                        aircraft: Some(RawAircraft {
                            code: Some("77W".to_string()),
                        }),
                    }],
                }],
                validating_airline_codes: vec!["AA".to_string(), "AA".to_string()],
            }],
            dictionaries: Some(FlightDictionaries { carriers }),
        }
    }

    #[test]
    fn test_normalize_prefers_grand_total_and_rounds() {
        let flights = normalize_offers(sample_response(), "USD");
        assert_eq!(flights.len(), 1);
        assert_eq!(flights[0].price.total, 523.46);
        assert_eq!(flights[0].price.currency, "USD");
    }

    #[test]
    fn test_normalize_resolves_carrier_names_and_dedupes_airlines() {
        let flights = normalize_offers(sample_response(), "USD");
        assert_eq!(flights[0].airlines, vec!["American Airlines".to_string()]);
        let segment = &flights[0].itineraries[0].segments[0];
        assert_eq!(segment.carrier_name, "American Airlines");
        assert_eq!(segment.carrier_code, "AA");
        assert_eq!(segment.departure.iata_code, "JFK");
        assert_eq!(segment.aircraft.as_deref(), Some("77W"));
    }

    #[test]
    fn test_normalize_unknown_carrier_falls_back_to_code() {
        let mut response = sample_response();
        response.dictionaries = None;
        let flights = normalize_offers(response, "EUR");
        assert_eq!(flights[0].airlines, vec!["AA".to_string()]);
    }
}
