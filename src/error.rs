// Copyright (c) 2024-present, the flightql authors
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::filter::ParseError;
use std::fmt;

/// Represents errors that can occur while loading input or running queries
#[derive(Debug)]
pub enum Error {
    /// I/O error
    Io(std::io::Error),

    /// Malformed flight section or input shape
    Load(LoadError),

    /// Malformed query line
    Query(QueryError),

    /// Filter expression failed to parse
    Filter(ParseError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Load(e) => write!(f, "{e}"),
            Self::Query(e) => write!(f, "{e}"),
            Self::Filter(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<LoadError> for Error {
    fn from(value: LoadError) -> Self {
        Self::Load(value)
    }
}

impl From<QueryError> for Error {
    fn from(value: QueryError) -> Self {
        Self::Query(value)
    }
}

impl From<ParseError> for Error {
    fn from(value: ParseError) -> Self {
        Self::Filter(value)
    }
}

/// Input-shape violations in the flight file.
///
/// All of these are fatal; the driver emits no partial output once one
/// surfaces. Ordinals are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The flight count is missing entirely
    MissingFlightCount,

    /// The flight count is not a nonnegative integer
    BadFlightCount(String),

    /// A flight tuple ended before its seven fields were read
    TruncatedFlight(usize),

    /// A flight field failed to parse (flight ordinal, offending token)
    BadFlightField(usize, String),

    /// A flight timestamp failed to parse (flight ordinal, offending token)
    BadTimestamp(usize, String),

    /// The arrival time lies before the departure time
    ArrivalBeforeDeparture(usize),

    /// The query count is missing entirely
    MissingQueryCount,

    /// The query count is not a nonnegative integer
    BadQueryCount(String),

    /// A promised query line is missing
    MissingQuery(usize),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFlightCount => write!(f, "missing flight count"),
            Self::BadFlightCount(token) => write!(f, "invalid flight count `{token}`"),
            Self::TruncatedFlight(n) => write!(f, "flight {n}: unexpected end of input"),
            Self::BadFlightField(n, token) => write!(f, "flight {n}: malformed field `{token}`"),
            Self::BadTimestamp(n, token) => write!(f, "flight {n}: malformed timestamp `{token}`"),
            Self::ArrivalBeforeDeparture(n) => {
                write!(f, "flight {n}: arrival time is before departure")
            }
            Self::MissingQueryCount => write!(f, "missing query count"),
            Self::BadQueryCount(token) => write!(f, "invalid query count `{token}`"),
            Self::MissingQuery(n) => write!(f, "query {n}: unexpected end of input"),
        }
    }
}

impl std::error::Error for LoadError {}

/// Malformed `K CRITERIA` prefix of a query line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The result limit is missing or not a positive integer
    BadLimit(String),

    /// The sort criteria token is missing, empty, or contains an unknown key
    BadCriteria(String),
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadLimit(token) => write!(f, "invalid result limit `{token}`"),
            Self::BadCriteria(token) => write!(f, "invalid sort criteria `{token}`"),
        }
    }
}

impl std::error::Error for QueryError {}

/// Crate-wide result
pub type Result<T> = std::result::Result<T, Error>;
