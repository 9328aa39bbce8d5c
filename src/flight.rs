// Copyright (c) 2024-present, the flightql authors
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use std::fmt;

/// Stable index of a flight in the engine's backing array.
///
/// Identity comparisons between flights are comparisons between ids.
pub type FlightId = u32;

/// A 3-character airport code.
///
/// Stored as raw bytes; ordering is lexicographic over those bytes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AirportCode([u8; 3]);

impl AirportCode {
    /// Parses a code from its textual form.
    ///
    /// Returns `None` unless the input is exactly 3 bytes long.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let bytes: [u8; 3] = s.as_bytes().try_into().ok()?;
        Some(Self(bytes))
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // Construction only accepts 3-byte `&str`s, which stay valid UTF-8
        std::str::from_utf8(&self.0).unwrap_or("???")
    }
}

impl fmt::Display for AirportCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One immutable itinerary segment.
///
/// Flights are created by the input reader during the load phase and never
/// mutated afterwards. The wallclock strings are retained verbatim because
/// result lines must reproduce them byte-for-byte.
#[derive(Clone, Debug)]
pub struct Flight {
    /// Origin airport code.
    pub origin: AirportCode,

    /// Destination airport code.
    pub destination: AirportCode,

    /// Ticket price.
    pub price: f64,

    /// Number of available seats.
    pub seats: u32,

    /// Departure wallclock string as read from the input.
    pub departure_text: String,

    /// Arrival wallclock string as read from the input.
    pub arrival_text: String,

    /// Departure time in unix epoch seconds (UTC).
    pub departure: i64,

    /// Arrival time in unix epoch seconds (UTC).
    ///
    /// Never earlier than [`Flight::departure`]; the reader rejects such
    /// tuples at load time.
    pub arrival: i64,

    /// Number of stops.
    pub stops: u32,
}

impl Flight {
    /// Returns the flight duration in seconds.
    ///
    /// Derived from the two epoch timestamps, never stored separately.
    #[must_use]
    pub fn duration(&self) -> i64 {
        self.arrival - self.departure
    }
}

#[cfg(test)]
mod tests {
    use super::AirportCode;
    use test_log::test;

    #[test]
    fn airport_code_roundtrip() {
        let code = AirportCode::parse("GRU").expect("3 bytes");
        assert_eq!("GRU", code.as_str());
        assert_eq!("GRU", format!("{code}"));
    }

    #[test]
    fn airport_code_rejects_wrong_length() {
        assert!(AirportCode::parse("").is_none());
        assert!(AirportCode::parse("AB").is_none());
        assert!(AirportCode::parse("ABCD").is_none());
    }

    #[test]
    fn airport_code_orders_lexicographically() {
        let a = AirportCode::parse("AAA").expect("3 bytes");
        let b = AirportCode::parse("AAB").expect("3 bytes");
        assert!(a < b);
    }
}
