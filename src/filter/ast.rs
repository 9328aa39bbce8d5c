// Copyright (c) 2024-present, the flightql authors
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::flight::Flight;
use std::cmp::Ordering;

/// A recognized filter field.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Field {
    /// Origin airport code (`org`).
    Origin,

    /// Destination airport code (`dst`).
    Destination,

    /// Ticket price (`prc`).
    Price,

    /// Flight duration in seconds (`dur`).
    Duration,

    /// Number of stops (`sto`).
    Stops,

    /// Seat count (`sea`).
    Seats,

    /// Departure time (`dep`).
    Departure,

    /// Arrival time (`arr`).
    Arrival,
}

impl Field {
    /// Resolves a field from its name in the filter language.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "org" => Some(Self::Origin),
            "dst" => Some(Self::Destination),
            "prc" => Some(Self::Price),
            "dur" => Some(Self::Duration),
            "sto" => Some(Self::Stops),
            "sea" => Some(Self::Seats),
            "dep" => Some(Self::Departure),
            "arr" => Some(Self::Arrival),
            _ => None,
        }
    }

    /// The field's name in the filter language.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Origin => "org",
            Self::Destination => "dst",
            Self::Price => "prc",
            Self::Duration => "dur",
            Self::Stops => "sto",
            Self::Seats => "sea",
            Self::Departure => "dep",
            Self::Arrival => "arr",
        }
    }
}

/// A comparison operator.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CmpOp {
    /// `==`
    Eq,

    /// `!=`
    Ne,

    /// `<`
    Lt,

    /// `<=`
    Le,

    /// `>`
    Gt,

    /// `>=`
    Ge,
}

impl CmpOp {
    fn accepts(self, ord: Ordering) -> bool {
        match self {
            Self::Eq => ord == Ordering::Equal,
            Self::Ne => ord != Ordering::Equal,
            Self::Lt => ord == Ordering::Less,
            Self::Le => ord != Ordering::Greater,
            Self::Gt => ord == Ordering::Greater,
            Self::Ge => ord != Ordering::Less,
        }
    }
}

/// A comparison literal.
///
/// The parser produces the kind the field dictates: codes for `org`/`dst`,
/// reals for `prc`, integers for everything else (timestamp literals are
/// resolved to epoch seconds at parse time, and real literals on integer
/// fields are truncated toward zero at parse time, so evaluation and index
/// range scans agree by construction).
#[derive(Clone, Debug, PartialEq)]
pub enum FilterValue {
    /// Airport-code literal, compared lexicographically over raw bytes.
    Code(String),

    /// Real-valued literal.
    Real(f64),

    /// Integer literal (durations, stops, seats, epoch seconds).
    Integer(i64),
}

/// One `field op value` comparison leaf.
#[derive(Clone, Debug, PartialEq)]
pub struct Comparison {
    /// Field the comparison reads.
    pub field: Field,

    /// Comparison operator.
    pub op: CmpOp,

    /// Literal to compare against.
    pub value: FilterValue,
}

impl Comparison {
    /// Evaluates the comparison against one flight.
    #[must_use]
    pub fn matches(&self, flight: &Flight) -> bool {
        let ord = match (self.field, &self.value) {
            (Field::Origin, FilterValue::Code(code)) => flight.origin.as_str().cmp(code.as_str()),
            (Field::Destination, FilterValue::Code(code)) => {
                flight.destination.as_str().cmp(code.as_str())
            }
            (Field::Price, FilterValue::Real(value)) => flight.price.total_cmp(value),
            (Field::Duration, FilterValue::Integer(value)) => flight.duration().cmp(value),
            (Field::Stops, FilterValue::Integer(value)) => i64::from(flight.stops).cmp(value),
            (Field::Seats, FilterValue::Integer(value)) => i64::from(flight.seats).cmp(value),
            (Field::Departure, FilterValue::Integer(value)) => flight.departure.cmp(value),
            (Field::Arrival, FilterValue::Integer(value)) => flight.arrival.cmp(value),

            // The parser never produces a kind-mismatched literal
            _ => return false,
        };

        self.op.accepts(ord)
    }
}

/// A boolean filter expression over flights.
///
/// Owned by the query that parsed it and dropped with it. Evaluation is a
/// pure function of the flight.
#[derive(Clone, Debug, PartialEq)]
pub enum FilterExpr {
    /// Both children must match; the right child is skipped when the left
    /// one fails.
    And(Box<FilterExpr>, Box<FilterExpr>),

    /// Either child may match; the right child is skipped when the left one
    /// succeeds.
    Or(Box<FilterExpr>, Box<FilterExpr>),

    /// Negates its child.
    Not(Box<FilterExpr>),

    /// A single comparison leaf.
    Cmp(Comparison),
}

impl FilterExpr {
    /// Evaluates the expression against one flight.
    #[must_use]
    pub fn matches(&self, flight: &Flight) -> bool {
        match self {
            Self::And(left, right) => left.matches(flight) && right.matches(flight),
            Self::Or(left, right) => left.matches(flight) || right.matches(flight),
            Self::Not(child) => !child.matches(flight),
            Self::Cmp(cmp) => cmp.matches(flight),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CmpOp, Comparison, Field, FilterExpr, FilterValue};
    use crate::flight::{AirportCode, Flight};
    use test_log::test;

    fn sample_flight() -> Flight {
        Flight {
            origin: AirportCode::parse("GRU").expect("3 bytes"),
            destination: AirportCode::parse("LIS").expect("3 bytes"),
            price: 450.5,
            seats: 12,
            departure_text: "2024-03-10T22:00:00".into(),
            arrival_text: "2024-03-11T08:00:00".into(),
            departure: 1_710_108_000,
            arrival: 1_710_144_000,
            stops: 1,
        }
    }

    fn cmp(field: Field, op: CmpOp, value: FilterValue) -> FilterExpr {
        FilterExpr::Cmp(Comparison { field, op, value })
    }

    #[test]
    fn comparison_operators() {
        let flight = sample_flight();

        assert!(cmp(Field::Price, CmpOp::Eq, FilterValue::Real(450.5)).matches(&flight));
        assert!(cmp(Field::Price, CmpOp::Ne, FilterValue::Real(100.0)).matches(&flight));
        assert!(cmp(Field::Price, CmpOp::Lt, FilterValue::Real(451.0)).matches(&flight));
        assert!(cmp(Field::Price, CmpOp::Le, FilterValue::Real(450.5)).matches(&flight));
        assert!(cmp(Field::Price, CmpOp::Gt, FilterValue::Real(450.0)).matches(&flight));
        assert!(cmp(Field::Price, CmpOp::Ge, FilterValue::Real(450.5)).matches(&flight));
        assert!(!cmp(Field::Price, CmpOp::Lt, FilterValue::Real(450.5)).matches(&flight));
        assert!(!cmp(Field::Price, CmpOp::Gt, FilterValue::Real(450.5)).matches(&flight));
    }

    #[test]
    fn code_fields_compare_lexicographically() {
        let flight = sample_flight();

        assert!(cmp(Field::Origin, CmpOp::Eq, FilterValue::Code("GRU".into())).matches(&flight));
        assert!(cmp(Field::Origin, CmpOp::Lt, FilterValue::Code("HEL".into())).matches(&flight));
        assert!(cmp(Field::Destination, CmpOp::Gt, FilterValue::Code("AAA".into())).matches(&flight));

        // A literal longer than any 3-char code never compares equal
        assert!(!cmp(Field::Origin, CmpOp::Eq, FilterValue::Code("GRUX".into())).matches(&flight));
        assert!(cmp(Field::Origin, CmpOp::Lt, FilterValue::Code("GRUX".into())).matches(&flight));
    }

    #[test]
    fn integer_fields_compare_numerically() {
        let flight = sample_flight();

        assert!(cmp(Field::Stops, CmpOp::Eq, FilterValue::Integer(1)).matches(&flight));
        assert!(cmp(Field::Seats, CmpOp::Ge, FilterValue::Integer(12)).matches(&flight));
        assert!(cmp(Field::Duration, CmpOp::Eq, FilterValue::Integer(36_000)).matches(&flight));
        assert!(cmp(Field::Departure, CmpOp::Lt, FilterValue::Integer(1_710_108_001)).matches(&flight));
        assert!(cmp(Field::Arrival, CmpOp::Ge, FilterValue::Integer(1_710_144_000)).matches(&flight));
    }

    #[test]
    fn boolean_composition() {
        let flight = sample_flight();

        let origin = cmp(Field::Origin, CmpOp::Eq, FilterValue::Code("GRU".into()));
        let pricey = cmp(Field::Price, CmpOp::Gt, FilterValue::Real(1_000.0));

        let and = FilterExpr::And(Box::new(origin.clone()), Box::new(pricey.clone()));
        assert!(!and.matches(&flight));

        let or = FilterExpr::Or(Box::new(origin.clone()), Box::new(pricey.clone()));
        assert!(or.matches(&flight));

        let not = FilterExpr::Not(Box::new(pricey));
        assert!(not.matches(&flight));

        let double_not = FilterExpr::Not(Box::new(FilterExpr::Not(Box::new(origin.clone()))));
        assert_eq!(origin.matches(&flight), double_not.matches(&flight));
    }
}
