// Copyright (c) 2024-present, the flightql authors
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! Per-attribute ordered indexes over the flight array.

mod avl;

pub use avl::AvlTree;

use crate::flight::{AirportCode, Flight, FlightId};
use std::cmp::Ordering;

/// `f64` ordered by [`f64::total_cmp`] so it can key an index.
///
/// Prices are finite and nonnegative, so the total order coincides with
/// numeric order.
#[derive(Copy, Clone, Debug)]
pub struct PriceKey(f64);

impl PriceKey {
    /// Wraps a price.
    #[must_use]
    pub fn new(price: f64) -> Self {
        Self(price)
    }
}

impl PartialEq for PriceKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PriceKey {}

impl PartialOrd for PriceKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PriceKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// The eight per-attribute indexes of the engine.
///
/// Built in one pass over the flight array during load; every flight appears
/// in every index exactly once, under the key its attribute dictates. Never
/// modified afterwards - the query phase only runs range scans.
pub struct FieldIndexes {
    /// Keyed by origin airport code.
    pub origin: AvlTree<AirportCode>,

    /// Keyed by destination airport code.
    pub destination: AvlTree<AirportCode>,

    /// Keyed by price.
    pub price: AvlTree<PriceKey>,

    /// Keyed by duration in seconds.
    pub duration: AvlTree<i64>,

    /// Keyed by number of stops.
    pub stops: AvlTree<u32>,

    /// Keyed by seat count.
    pub seats: AvlTree<u32>,

    /// Keyed by departure epoch second.
    pub departure: AvlTree<i64>,

    /// Keyed by arrival epoch second.
    pub arrival: AvlTree<i64>,
}

impl FieldIndexes {
    /// Builds all eight indexes over the given flights.
    #[must_use]
    pub fn build(flights: &[Flight]) -> Self {
        let start = std::time::Instant::now();

        let mut indexes = Self {
            origin: AvlTree::new(),
            destination: AvlTree::new(),
            price: AvlTree::new(),
            duration: AvlTree::new(),
            stops: AvlTree::new(),
            seats: AvlTree::new(),
            departure: AvlTree::new(),
            arrival: AvlTree::new(),
        };

        for (id, flight) in flights.iter().enumerate() {
            let id = id as FlightId;

            indexes.origin.insert(flight.origin, id);
            indexes.destination.insert(flight.destination, id);
            indexes.price.insert(PriceKey::new(flight.price), id);
            indexes.duration.insert(flight.duration(), id);
            indexes.stops.insert(flight.stops, id);
            indexes.seats.insert(flight.seats, id);
            indexes.departure.insert(flight.departure, id);
            indexes.arrival.insert(flight.arrival, id);
        }

        log::debug!(
            "Built 8 field indexes over {} flights in {:?}",
            flights.len(),
            start.elapsed(),
        );

        indexes
    }
}
