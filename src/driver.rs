// Copyright (c) 2024-present, the flightql authors
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! The load-then-query pipeline over one input text.

use crate::engine::Engine;
use crate::error::LoadError;
use crate::flight::{AirportCode, Flight};
use crate::query::Query;
use crate::timestamp;
use std::io::Write;

/// Byte cursor over the input text.
///
/// The flight section is whitespace-delimited with insignificant newlines;
/// after the query count the cursor switches to line mode.
struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn next_token(&mut self) -> Option<&'a str> {
        let bytes = self.input.as_bytes();

        while bytes.get(self.pos).is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }

        let start = self.pos;

        while bytes
            .get(self.pos)
            .is_some_and(|b| !b.is_ascii_whitespace())
        {
            self.pos += 1;
        }

        (self.pos > start).then(|| self.input.get(start..self.pos).unwrap_or_default())
    }

    /// Next line without its terminator. Returns `None` at end of input.
    fn next_line(&mut self) -> Option<&'a str> {
        if self.pos >= self.input.len() {
            return None;
        }

        let rest = self.input.get(self.pos..).unwrap_or_default();

        match rest.find('\n') {
            Some(offset) => {
                self.pos += offset + 1;
                Some(rest.get(..offset).unwrap_or_default().trim_end_matches('\r'))
            }
            None => {
                self.pos = self.input.len();
                Some(rest.trim_end_matches('\r'))
            }
        }
    }
}

fn next_field<'a>(cursor: &mut Cursor<'a>, ordinal: usize) -> Result<&'a str, LoadError> {
    cursor.next_token().ok_or(LoadError::TruncatedFlight(ordinal))
}

fn code_field(cursor: &mut Cursor<'_>, ordinal: usize) -> Result<AirportCode, LoadError> {
    let token = next_field(cursor, ordinal)?;
    AirportCode::parse(token).ok_or_else(|| LoadError::BadFlightField(ordinal, token.to_owned()))
}

fn number_field<T: std::str::FromStr>(
    cursor: &mut Cursor<'_>,
    ordinal: usize,
) -> Result<T, LoadError> {
    let token = next_field(cursor, ordinal)?;
    token
        .parse()
        .map_err(|_| LoadError::BadFlightField(ordinal, token.to_owned()))
}

/// Reads one `ORIG DEST PRICE SEATS DEP ARR STOPS` tuple.
fn parse_flight(cursor: &mut Cursor<'_>, ordinal: usize) -> Result<Flight, LoadError> {
    let origin = code_field(cursor, ordinal)?;
    let destination = code_field(cursor, ordinal)?;
    let price: f64 = number_field(cursor, ordinal)?;
    let seats: u32 = number_field(cursor, ordinal)?;
    let departure_text = next_field(cursor, ordinal)?.to_owned();
    let arrival_text = next_field(cursor, ordinal)?.to_owned();
    let stops: u32 = number_field(cursor, ordinal)?;

    let departure = timestamp::parse_wallclock(&departure_text)
        .map_err(|_| LoadError::BadTimestamp(ordinal, departure_text.clone()))?;
    let arrival = timestamp::parse_wallclock(&arrival_text)
        .map_err(|_| LoadError::BadTimestamp(ordinal, arrival_text.clone()))?;

    if arrival < departure {
        return Err(LoadError::ArrivalBeforeDeparture(ordinal));
    }

    Ok(Flight {
        origin,
        destination,
        price,
        seats,
        departure_text,
        arrival_text,
        departure,
        arrival,
        stops,
    })
}

fn emit(engine: &Engine, query: &Query, out: &mut impl Write) -> crate::Result<()> {
    writeln!(
        out,
        "{} {} {}",
        query.limit, query.criteria, query.expression_text
    )?;

    for id in engine.run(query) {
        let flight = engine.flight(id);

        writeln!(
            out,
            "{} {} {} {} {} {} {}",
            flight.origin,
            flight.destination,
            flight.price,
            flight.seats,
            flight.departure_text,
            flight.arrival_text,
            flight.stops,
        )?;
    }

    Ok(())
}

/// Runs the whole load-then-query pipeline over `input`, writing results to
/// `out`.
///
/// The input carries a flight count, that many whitespace-delimited flight
/// tuples, a query count, then one query per line (blank lines before a
/// query are skipped). For each query an echo line is written first,
/// followed by at most `K` result lines in sort order; timestamps reproduce
/// the originally read strings and prices print in shortest round-trip
/// decimal form.
///
/// # Errors
///
/// Any malformed flight tuple, malformed query, or write failure aborts the
/// whole run; nothing is downgraded to a warning.
pub fn run(input: &str, out: &mut impl Write) -> crate::Result<()> {
    let mut cursor = Cursor::new(input);

    let count_token = cursor.next_token().ok_or(LoadError::MissingFlightCount)?;
    let flight_count: usize = count_token
        .parse()
        .map_err(|_| LoadError::BadFlightCount(count_token.to_owned()))?;

    let mut flights = Vec::with_capacity(flight_count);

    for ordinal in 1..=flight_count {
        flights.push(parse_flight(&mut cursor, ordinal)?);
    }

    let engine = Engine::new(flights);

    let count_token = cursor.next_token().ok_or(LoadError::MissingQueryCount)?;
    let query_count: usize = count_token
        .parse()
        .map_err(|_| LoadError::BadQueryCount(count_token.to_owned()))?;

    // Discard the remainder of the count line before switching to line mode
    let _ = cursor.next_line();

    for ordinal in 1..=query_count {
        let line = loop {
            let line = cursor.next_line().ok_or(LoadError::MissingQuery(ordinal))?;

            if !line.trim().is_empty() {
                break line;
            }
        };

        let query = Query::parse(line)?;
        emit(&engine, &query, out)?;
    }

    Ok(())
}
