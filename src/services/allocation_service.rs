use chrono::NaiveDate;

use crate::models::hotels::{HotelOffer, NightlyRate};
use crate::models::weather::DailyForecast;

/// Maps itinerary days onto the ordered destination list so that each day's
/// card can be joined with that destination's hotel and weather data.
pub struct AllocationService;

impl AllocationService {
    /// Returns the destination index for a 0-based day index, or `None` when
    /// there are no destinations or no days.
    ///
    /// A supplied allocation vector is honored when its length matches the
    /// destination count and its sum is positive: the 1-based day number is
    /// walked against the cumulative allocation, and days beyond the
    /// allocated total land on the last destination. Otherwise days are
    /// split evenly, with remainder days biased toward later destinations.
    pub fn destination_index(
        day_index: usize,
        total_days: usize,
        destination_count: usize,
        allocation: Option<&[u32]>,
    ) -> Option<usize> {
        if destination_count == 0 || total_days == 0 {
            return None;
        }

        if let Some(alloc) = allocation {
            let sum: u64 = alloc.iter().map(|d| *d as u64).sum();
            if alloc.len() == destination_count && sum > 0 {
                let day_number = (day_index + 1) as u64;
                let mut cumulative = 0u64;
                for (i, days) in alloc.iter().enumerate() {
                    cumulative += *days as u64;
                    if day_number <= cumulative {
                        return Some(i);
                    }
                }
                return Some(alloc.len() - 1);
            }
        }

        Some((day_index * destination_count / total_days).min(destination_count - 1))
    }

    /// Resolves each day index to its destination label.
    pub fn assign_days(
        total_days: usize,
        destinations: &[String],
        allocation: Option<&[u32]>,
    ) -> Vec<Option<String>> {
        (0..total_days)
            .map(|day_index| {
                Self::destination_index(day_index, total_days, destinations.len(), allocation)
                    .map(|i| destinations[i].clone())
            })
            .collect()
    }

    /// The forecast tip for a calendar date, if one was fetched.
    pub fn tip_for_date(forecasts: &[DailyForecast], date: NaiveDate) -> Option<&str> {
        forecasts
            .iter()
            .find(|f| f.date == date)
            .map(|f| f.tip.as_str())
    }

    /// The nightly rate covering a calendar date, if the schedule has one.
    pub fn nightly_for_date(hotel: &HotelOffer, date: NaiveDate) -> Option<&NightlyRate> {
        hotel.nightly.iter().find(|n| n.date == date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dests(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_allocation_vector_maps_days_in_order() {
        // destinations=["Paris","Rome"], dayAllocation=[2,3], totalDays=5:
        // days 1-2 -> Paris, days 3-5 -> Rome.
        let destinations = dests(&["Paris", "Rome"]);
        let assigned = AllocationService::assign_days(5, &destinations, Some(&[2, 3]));
        assert_eq!(
            assigned,
            vec![
                Some("Paris".to_string()),
                Some("Paris".to_string()),
                Some("Rome".to_string()),
                Some("Rome".to_string()),
                Some("Rome".to_string()),
            ]
        );
    }

    #[test]
    fn test_days_beyond_allocation_fall_to_last_destination() {
        let destinations = dests(&["Paris", "Rome"]);
        let assigned = AllocationService::assign_days(6, &destinations, Some(&[2, 3]));
        assert_eq!(assigned[5], Some("Rome".to_string()));
    }

    #[test]
    fn test_single_destination_gets_every_day() {
        let destinations = dests(&["Paris"]);
        let assigned = AllocationService::assign_days(5, &destinations, None);
        assert!(assigned.iter().all(|d| d == &Some("Paris".to_string())));
    }

    #[test]
    fn test_mismatched_vector_length_falls_back_to_even_split() {
        let destinations = dests(&["Paris", "Rome"]);
        let with_bad_alloc = AllocationService::assign_days(4, &destinations, Some(&[4]));
        let without = AllocationService::assign_days(4, &destinations, None);
        assert_eq!(with_bad_alloc, without);
    }

    #[test]
    fn test_zero_sum_vector_falls_back_to_even_split() {
        let destinations = dests(&["Paris", "Rome"]);
        let with_zero = AllocationService::assign_days(4, &destinations, Some(&[0, 0]));
        let without = AllocationService::assign_days(4, &destinations, None);
        assert_eq!(with_zero, without);
    }

    #[test]
    fn test_even_split_indices_are_in_range_and_monotonic() {
        for total_days in 1..=14usize {
            for dest_count in 1..=5usize {
                let mut previous = 0usize;
                for day in 0..total_days {
                    let idx =
                        AllocationService::destination_index(day, total_days, dest_count, None)
                            .unwrap();
                    assert!(idx < dest_count);
                    assert!(idx >= previous);
                    previous = idx;
                }
            }
        }
    }

    #[test]
    fn test_valid_allocation_is_monotonic_and_total() {
        let alloc = [1u32, 2, 3];
        let total_days = 6usize;
        let mut previous = 0usize;
        for day in 0..total_days {
            let idx = AllocationService::destination_index(day, total_days, 3, Some(&alloc))
                .unwrap();
            assert!(idx >= previous);
            previous = idx;
        }
        assert_eq!(
            AllocationService::destination_index(0, total_days, 3, Some(&alloc)),
            Some(0)
        );
        assert_eq!(
            AllocationService::destination_index(5, total_days, 3, Some(&alloc)),
            Some(2)
        );
    }

    #[test]
    fn test_no_destinations_yields_nothing() {
        assert_eq!(AllocationService::destination_index(0, 5, 0, None), None);
        let assigned = AllocationService::assign_days(3, &[], None);
        assert!(assigned.iter().all(|d| d.is_none()));
    }
}
