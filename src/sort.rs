// Copyright (c) 2024-present, the flightql authors
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::error::QueryError;
use crate::flight::{Flight, FlightId};
use std::cmp::Ordering;
use std::fmt;

/// One sort key of a criteria string.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SortKey {
    /// `p` - price, ascending.
    Price,

    /// `d` - duration, ascending.
    Duration,

    /// `s` - stops, ascending.
    Stops,
}

/// A lexicographic multi-key ordering over flights.
///
/// Keys are applied left to right; the first unequal key decides. Flights
/// equal under every key compare equal, and no stability is promised for
/// such ties.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortCriteria {
    keys: Vec<SortKey>,
}

impl SortCriteria {
    /// Parses a criteria token over the alphabet {p, d, s}.
    ///
    /// The token must be nonempty; any other character is rejected.
    pub fn parse(token: &str) -> Result<Self, QueryError> {
        if token.is_empty() {
            return Err(QueryError::BadCriteria(token.to_owned()));
        }

        let mut keys = Vec::with_capacity(token.len());

        for ch in token.chars() {
            keys.push(match ch {
                'p' => SortKey::Price,
                'd' => SortKey::Duration,
                's' => SortKey::Stops,
                _ => return Err(QueryError::BadCriteria(token.to_owned())),
            });
        }

        Ok(Self { keys })
    }

    /// Compares two flights under the criteria.
    #[must_use]
    pub fn compare(&self, a: &Flight, b: &Flight) -> Ordering {
        for key in &self.keys {
            let ord = match key {
                SortKey::Price => a.price.total_cmp(&b.price),
                SortKey::Duration => a.duration().cmp(&b.duration()),
                SortKey::Stops => a.stops.cmp(&b.stops),
            };

            if ord != Ordering::Equal {
                return ord;
            }
        }

        Ordering::Equal
    }
}

impl fmt::Display for SortCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for key in &self.keys {
            f.write_str(match key {
                SortKey::Price => "p",
                SortKey::Duration => "d",
                SortKey::Stops => "s",
            })?;
        }

        Ok(())
    }
}

/// Sorts flight ids by the criteria, ascending on every key.
pub fn sort_flights(ids: &mut [FlightId], flights: &[Flight], criteria: &SortCriteria) {
    ids.sort_unstable_by(|&a, &b| criteria.compare(&flights[a as usize], &flights[b as usize]));
}

#[cfg(test)]
mod tests {
    use super::{sort_flights, SortCriteria, SortKey};
    use crate::flight::{AirportCode, Flight};
    use std::cmp::Ordering;
    use test_log::test;

    fn flight(price: f64, duration: i64, stops: u32) -> Flight {
        Flight {
            origin: AirportCode::parse("AAA").expect("3 bytes"),
            destination: AirportCode::parse("BBB").expect("3 bytes"),
            price,
            seats: 1,
            departure_text: "2024-01-01T00:00:00".into(),
            arrival_text: "2024-01-01T00:00:00".into(),
            departure: 0,
            arrival: duration,
            stops,
        }
    }

    #[test]
    fn criteria_parsing() {
        assert_eq!(
            Ok(vec![SortKey::Price, SortKey::Duration, SortKey::Stops]),
            SortCriteria::parse("pds").map(|c| c.keys)
        );
        assert!(SortCriteria::parse("").is_err());
        assert!(SortCriteria::parse("px").is_err());
    }

    #[test]
    fn criteria_roundtrips_through_display() {
        let criteria = SortCriteria::parse("spd").expect("valid");
        assert_eq!("spd", format!("{criteria}"));
    }

    #[test]
    fn first_unequal_key_decides() {
        let criteria = SortCriteria::parse("pd").expect("valid");

        let cheap_slow = flight(100.0, 7_200, 0);
        let cheap_fast = flight(100.0, 3_600, 0);
        let pricey_fast = flight(200.0, 1_800, 0);

        assert_eq!(
            Ordering::Less,
            criteria.compare(&cheap_fast, &cheap_slow),
            "tie on price falls through to duration"
        );
        assert_eq!(Ordering::Less, criteria.compare(&cheap_slow, &pricey_fast));
    }

    #[test]
    fn exhausted_criteria_compare_equal() {
        let criteria = SortCriteria::parse("p").expect("valid");

        let a = flight(100.0, 3_600, 0);
        let b = flight(100.0, 7_200, 5);

        assert_eq!(Ordering::Equal, criteria.compare(&a, &b));
    }

    #[test]
    fn sorts_ids_not_flights() {
        let flights = vec![
            flight(300.0, 3_600, 0),
            flight(100.0, 3_600, 0),
            flight(200.0, 3_600, 0),
        ];
        let criteria = SortCriteria::parse("p").expect("valid");

        let mut ids = vec![0, 1, 2];
        sort_flights(&mut ids, &flights, &criteria);

        assert_eq!(vec![1, 2, 0], ids);
    }
}
