// Copyright (c) 2024-present, the flightql authors
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! A K.I.S.S. in-memory query engine for a static set of flight records.
//!
//! ##### About
//!
//! The engine ingests a batch of flight tuples, builds eight height-balanced
//! ordered indexes (one per attribute), then evaluates boolean filter
//! queries against them, returning the top-K matches under a multi-key
//! ordering over price, duration and stops.
//!
//! A query's filter is a small expression language (`&&`, `||`, `!`,
//! parentheses, and `field op value` comparisons). The planner picks the
//! first comparison reachable through conjunctions, turns it into one range
//! scan on the matching index, then re-evaluates the full expression on
//! every candidate, so results are exact regardless of which index - if any
//! - was used.
//!
//! Everything is single-threaded and in-memory: indexes are built once
//! during load and only read afterwards; there is no persistence and no
//! mutation after build.
//!
//! # Example usage
//!
//! ```
//! let input = "\
//! 2
//! GRU LIS 450.5 12 2024-03-10T22:00:00 2024-03-11T08:00:00 1
//! GRU MAD 390 3 2024-03-10T21:30:00 2024-03-11T09:45:00 2
//! 1
//! 5 pd org==GRU && sto<2
//! ";
//!
//! let mut out = Vec::new();
//! flightql::driver::run(input, &mut out)?;
//!
//! let output = String::from_utf8_lossy(&out);
//! assert!(output.starts_with("5 pd org==GRU && sto<2\n"));
//! assert!(output.contains("GRU LIS 450.5 12"));
//! # Ok::<(), flightql::Error>(())
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::all, missing_docs)]
#![deny(clippy::unwrap_used)]
#![warn(clippy::pedantic, clippy::nursery)]
#![warn(clippy::expect_used)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::option_if_let_else)]

pub mod driver;
mod engine;
mod error;
pub mod filter;
mod flight;
pub mod index;
mod planner;
mod query;
mod sort;
mod timestamp;

pub use {
    engine::Engine,
    error::{Error, LoadError, QueryError, Result},
    flight::{AirportCode, Flight, FlightId},
    query::Query,
    sort::{SortCriteria, SortKey},
    timestamp::UnixTimestamp,
};
