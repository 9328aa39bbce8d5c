// Copyright (c) 2024-present, the flightql authors
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::filter::{CmpOp, Comparison, Field, FilterExpr, FilterValue};
use crate::flight::{AirportCode, Flight, FlightId};
use crate::index::{AvlTree, FieldIndexes, PriceKey};
use crate::query::Query;
use crate::sort;
use std::ops::Bound;

/// Finds the leftmost indexable comparison reachable through `And` nodes.
///
/// `Or` and `Not` children are never descended: only conjunctions guarantee
/// that every leaf is a necessary condition on the result, which is what
/// makes a single-leaf range scan a sound superset. `!=` leaves are skipped
/// because they do not map onto one contiguous key range.
#[must_use]
pub fn find_indexable(expr: &FilterExpr) -> Option<&Comparison> {
    match expr {
        FilterExpr::And(left, right) => find_indexable(left).or_else(|| find_indexable(right)),
        FilterExpr::Cmp(cmp) if cmp.op != CmpOp::Ne => Some(cmp),
        FilterExpr::Cmp(_) | FilterExpr::Or(..) | FilterExpr::Not(_) => None,
    }
}

fn bounds_for<K>(op: CmpOp, key: &K) -> (Bound<&K>, Bound<&K>) {
    match op {
        CmpOp::Eq => (Bound::Included(key), Bound::Included(key)),
        CmpOp::Lt => (Bound::Unbounded, Bound::Excluded(key)),
        CmpOp::Le => (Bound::Unbounded, Bound::Included(key)),
        CmpOp::Gt => (Bound::Excluded(key), Bound::Unbounded),
        CmpOp::Ge => (Bound::Included(key), Bound::Unbounded),

        // Filtered out by `find_indexable`; a full scan is still a sound superset
        CmpOp::Ne => (Bound::Unbounded, Bound::Unbounded),
    }
}

fn scan<K: Ord>(tree: &AvlTree<K>, op: CmpOp, key: &K) -> Vec<FlightId> {
    let (lower, upper) = bounds_for(op, key);
    tree.range(lower, upper)
}

fn scan_u32(tree: &AvlTree<u32>, op: CmpOp, value: i64) -> Option<Vec<FlightId>> {
    // A literal outside the key domain has no usable bound; the caller
    // falls back to a full scan and the filter pass keeps results exact
    let key = u32::try_from(value).ok()?;
    Some(scan(tree, op, &key))
}

/// Runs the range scan for one indexable comparison.
///
/// The literal is cast into the index's key kind. The scan result is a
/// superset of the flights matching the comparison; `None` means no usable
/// bound could be built and the caller must scan the full flight array.
#[must_use]
pub fn scan_index(indexes: &FieldIndexes, cmp: &Comparison) -> Option<Vec<FlightId>> {
    match (cmp.field, &cmp.value) {
        (Field::Origin, FilterValue::Code(code)) => {
            let key = AirportCode::parse(code)?;
            Some(scan(&indexes.origin, cmp.op, &key))
        }
        (Field::Destination, FilterValue::Code(code)) => {
            let key = AirportCode::parse(code)?;
            Some(scan(&indexes.destination, cmp.op, &key))
        }
        (Field::Price, FilterValue::Real(value)) => {
            Some(scan(&indexes.price, cmp.op, &PriceKey::new(*value)))
        }
        (Field::Duration, FilterValue::Integer(value)) => {
            Some(scan(&indexes.duration, cmp.op, value))
        }
        (Field::Stops, FilterValue::Integer(value)) => scan_u32(&indexes.stops, cmp.op, *value),
        (Field::Seats, FilterValue::Integer(value)) => scan_u32(&indexes.seats, cmp.op, *value),
        (Field::Departure, FilterValue::Integer(value)) => {
            Some(scan(&indexes.departure, cmp.op, value))
        }
        (Field::Arrival, FilterValue::Integer(value)) => {
            Some(scan(&indexes.arrival, cmp.op, value))
        }

        // Kind mismatches cannot come out of the parser
        _ => None,
    }
}

fn full_scan(flights: &[Flight]) -> Vec<FlightId> {
    (0..flights.len() as FlightId).collect()
}

/// Executes one query against the flight array and its indexes.
///
/// Materializes candidates from one index scan (or the whole array),
/// re-evaluates the full filter tree on every candidate, sorts survivors by
/// the query's criteria and truncates to its limit.
#[must_use]
pub fn execute(query: &Query, flights: &[Flight], indexes: &FieldIndexes) -> Vec<FlightId> {
    let start = std::time::Instant::now();

    let candidates = match find_indexable(&query.filter) {
        Some(cmp) => match scan_index(indexes, cmp) {
            Some(ids) => {
                log::trace!(
                    "Index scan on `{}` yielded {} candidates",
                    cmp.field.name(),
                    ids.len(),
                );
                ids
            }
            None => full_scan(flights),
        },
        None => {
            log::trace!("No indexable leaf, scanning all {} flights", flights.len());
            full_scan(flights)
        }
    };

    let mut results: Vec<FlightId> = candidates
        .into_iter()
        .filter(|&id| query.filter.matches(&flights[id as usize]))
        .collect();

    sort::sort_flights(&mut results, flights, &query.criteria);
    results.truncate(query.limit);

    log::trace!(
        "Query produced {} results in {:?}",
        results.len(),
        start.elapsed(),
    );

    results
}
