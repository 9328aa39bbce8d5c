// Copyright (c) 2024-present, the flightql authors
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::flight::{Flight, FlightId};
use crate::index::FieldIndexes;
use crate::planner;
use crate::query::Query;

/// The loaded flight set plus its eight field indexes.
///
/// Built once after load; the query phase only reads. Indexes reference
/// flights by id into the backing array, never by copy.
pub struct Engine {
    flights: Vec<Flight>,
    indexes: FieldIndexes,
}

impl Engine {
    /// Builds the engine, indexing every flight.
    #[must_use]
    pub fn new(flights: Vec<Flight>) -> Self {
        let indexes = FieldIndexes::build(&flights);
        Self { flights, indexes }
    }

    /// The backing flight array.
    #[must_use]
    pub fn flights(&self) -> &[Flight] {
        &self.flights
    }

    /// Resolves an id into its flight.
    ///
    /// # Panics
    ///
    /// Panics if the id did not come out of this engine.
    #[must_use]
    pub fn flight(&self, id: FlightId) -> &Flight {
        &self.flights[id as usize]
    }

    /// Runs one query, returning at most `query.limit` ids in sort order.
    #[must_use]
    pub fn run(&self, query: &Query) -> Vec<FlightId> {
        planner::execute(query, &self.flights, &self.indexes)
    }
}
