// Copyright (c) 2024-present, the flightql authors
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use super::ast::{CmpOp, Comparison, Field, FilterExpr, FilterValue};
use crate::timestamp;
use std::fmt;

/// A filter-expression parse failure, tagged with a byte position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Byte offset into the expression where parsing failed.
    pub position: usize,

    /// What went wrong.
    pub kind: ParseErrorKind,
}

/// The ways a filter expression can fail to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// `(` without a matching `)`
    MissingClosingParen,

    /// A comparison operator was expected
    ExpectedOperator,

    /// A field name was expected
    ExpectedField,

    /// The field name is not one of the recognized eight
    UnknownField(String),

    /// The value is empty or of the wrong kind for the field
    ExpectedValue(Field),

    /// A numeric literal did not parse
    BadNumber(String),

    /// A timestamp literal did not parse
    BadTimestamp(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at position {}", self.kind, self.position)
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingClosingParen => write!(f, "expected ')'"),
            Self::ExpectedOperator => write!(f, "expected comparison operator"),
            Self::ExpectedField => write!(f, "expected field name"),
            Self::UnknownField(name) => write!(f, "unknown field `{name}`"),
            Self::ExpectedValue(field) => {
                write!(f, "expected value for field `{}`", field.name())
            }
            Self::BadNumber(token) => write!(f, "malformed numeric literal `{token}`"),
            Self::BadTimestamp(token) => write!(f, "malformed timestamp literal `{token}`"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parses one filter expression into its AST.
///
/// Trailing input after a complete expression is ignored.
pub fn parse(input: &str) -> Result<FilterExpr, ParseError> {
    Parser::new(input).parse_or()
}

/// Recursive-descent parser over a single expression line.
///
/// Grammar, lowest to highest precedence:
///
/// ```text
/// expr      := or
/// or        := and ( "||" and )*
/// and       := not ( "&&" not )*
/// not       := "!" not | primary
/// primary   := "(" expr ")" | predicate
/// predicate := field op value
/// ```
///
/// Binary operators are left-associative; `!` is right-associative.
/// Whitespace is skipped between tokens.
struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError {
            position: self.pos,
            kind,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    /// Consumes `token` if it appears at the cursor, skipping leading
    /// whitespace first.
    fn match_token(&mut self, token: &str) -> bool {
        self.skip_whitespace();

        let rest = self.input.get(self.pos..).unwrap_or_default();

        if rest.starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    /// Consumes the longest run of bytes satisfying `pred`, skipping leading
    /// whitespace first. The run may be empty.
    fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a str {
        self.skip_whitespace();

        let start = self.pos;

        while self.peek().is_some_and(&pred) {
            self.pos += 1;
        }

        self.input.get(start..self.pos).unwrap_or_default()
    }

    fn parse_or(&mut self) -> Result<FilterExpr, ParseError> {
        let mut expr = self.parse_and()?;

        while self.match_token("||") {
            let right = self.parse_and()?;
            expr = FilterExpr::Or(Box::new(expr), Box::new(right));
        }

        Ok(expr)
    }

    fn parse_and(&mut self) -> Result<FilterExpr, ParseError> {
        let mut expr = self.parse_not()?;

        while self.match_token("&&") {
            let right = self.parse_not()?;
            expr = FilterExpr::And(Box::new(expr), Box::new(right));
        }

        Ok(expr)
    }

    fn parse_not(&mut self) -> Result<FilterExpr, ParseError> {
        if self.match_token("!") {
            let child = self.parse_not()?;
            Ok(FilterExpr::Not(Box::new(child)))
        } else {
            self.parse_primary()
        }
    }

    fn parse_primary(&mut self) -> Result<FilterExpr, ParseError> {
        if self.match_token("(") {
            let expr = self.parse_or()?;

            if !self.match_token(")") {
                return Err(self.error(ParseErrorKind::MissingClosingParen));
            }

            Ok(expr)
        } else {
            self.parse_predicate()
        }
    }

    fn parse_predicate(&mut self) -> Result<FilterExpr, ParseError> {
        self.skip_whitespace();

        let field_start = self.pos;
        let name = self.take_while(|b| b.is_ascii_alphabetic());

        if name.is_empty() {
            return Err(self.error(ParseErrorKind::ExpectedField));
        }

        let Some(field) = Field::from_name(name) else {
            return Err(ParseError {
                position: field_start,
                kind: ParseErrorKind::UnknownField(name.to_owned()),
            });
        };

        let op = self.parse_operator()?;
        let value = self.parse_value(field)?;

        Ok(FilterExpr::Cmp(Comparison { field, op, value }))
    }

    fn parse_operator(&mut self) -> Result<CmpOp, ParseError> {
        // Two-character operators must lex before their one-character prefixes
        const OPERATORS: [(&str, CmpOp); 6] = [
            ("==", CmpOp::Eq),
            ("!=", CmpOp::Ne),
            ("<=", CmpOp::Le),
            (">=", CmpOp::Ge),
            ("<", CmpOp::Lt),
            (">", CmpOp::Gt),
        ];

        for (token, op) in OPERATORS {
            if self.match_token(token) {
                return Ok(op);
            }
        }

        Err(self.error(ParseErrorKind::ExpectedOperator))
    }

    fn parse_value(&mut self, field: Field) -> Result<FilterValue, ParseError> {
        match field {
            Field::Origin | Field::Destination => {
                let code = self.take_while(|b| b.is_ascii_alphabetic());

                if code.is_empty() {
                    return Err(self.error(ParseErrorKind::ExpectedValue(field)));
                }

                Ok(FilterValue::Code(code.to_owned()))
            }
            Field::Departure | Field::Arrival => {
                let start_of_token = {
                    self.skip_whitespace();
                    self.pos
                };
                let token = self.take_while(|b| !b.is_ascii_whitespace() && b != b')');

                if token.is_empty() {
                    return Err(self.error(ParseErrorKind::ExpectedValue(field)));
                }

                match timestamp::parse_wallclock(token) {
                    Ok(epoch) => Ok(FilterValue::Integer(epoch)),
                    Err(_) => Err(ParseError {
                        position: start_of_token,
                        kind: ParseErrorKind::BadTimestamp(token.to_owned()),
                    }),
                }
            }
            Field::Price => Ok(FilterValue::Real(self.parse_number(field)?)),
            Field::Duration | Field::Stops | Field::Seats => {
                // Real literals on integer fields truncate toward zero
                let number = self.parse_number(field)?;
                Ok(FilterValue::Integer(number as i64))
            }
        }
    }

    fn parse_number(&mut self, field: Field) -> Result<f64, ParseError> {
        let start_of_token = {
            self.skip_whitespace();
            self.pos
        };
        let token = self.take_while(|b| b.is_ascii_digit() || b == b'.');

        if token.is_empty() {
            return Err(self.error(ParseErrorKind::ExpectedValue(field)));
        }

        token.parse().map_err(|_| ParseError {
            position: start_of_token,
            kind: ParseErrorKind::BadNumber(token.to_owned()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::ast::{CmpOp, Comparison, Field, FilterExpr, FilterValue};
    use super::{parse, ParseErrorKind};
    use test_log::test;

    fn cmp(field: Field, op: CmpOp, value: FilterValue) -> FilterExpr {
        FilterExpr::Cmp(Comparison { field, op, value })
    }

    #[test]
    fn single_predicate() {
        assert_eq!(
            Ok(cmp(
                Field::Origin,
                CmpOp::Eq,
                FilterValue::Code("GRU".into())
            )),
            parse("org==GRU")
        );
    }

    #[test]
    fn every_operator_lexes() {
        for (text, op) in [
            ("==", CmpOp::Eq),
            ("!=", CmpOp::Ne),
            ("<", CmpOp::Lt),
            ("<=", CmpOp::Le),
            (">", CmpOp::Gt),
            (">=", CmpOp::Ge),
        ] {
            assert_eq!(
                Ok(cmp(Field::Price, op, FilterValue::Real(100.0))),
                parse(&format!("prc {text} 100")),
                "operator {text}"
            );
        }
    }

    #[test]
    fn whitespace_between_tokens_is_skipped() {
        assert_eq!(parse("prc<=250.5"), parse("  prc  <=  250.5  "));
    }

    #[test]
    fn and_binds_tighter_than_or() {
        let expr = parse("org==AAA || org==BBB && prc<100").expect("valid");

        // a || (b && c)
        let FilterExpr::Or(_, right) = expr else {
            panic!("expected Or at the root, got {expr:?}");
        };
        assert!(matches!(*right, FilterExpr::And(..)));
    }

    #[test]
    fn binary_operators_are_left_associative() {
        let expr = parse("prc<1 && prc<2 && prc<3").expect("valid");

        // (a && b) && c
        let FilterExpr::And(left, _) = expr else {
            panic!("expected And at the root, got {expr:?}");
        };
        assert!(matches!(*left, FilterExpr::And(..)));
    }

    #[test]
    fn parentheses_override_precedence() {
        let expr = parse("(org==AAA || org==BBB) && prc<100").expect("valid");

        let FilterExpr::And(left, _) = expr else {
            panic!("expected And at the root, got {expr:?}");
        };
        assert!(matches!(*left, FilterExpr::Or(..)));
    }

    #[test]
    fn not_is_right_associative_and_binds_tightest() {
        let expr = parse("!!sto==0 && sea>0").expect("valid");

        // (!(!(sto==0))) && (sea>0)
        let FilterExpr::And(left, _) = expr else {
            panic!("expected And at the root, got {expr:?}");
        };
        let FilterExpr::Not(inner) = *left else {
            panic!("expected Not");
        };
        assert!(matches!(*inner, FilterExpr::Not(_)));
    }

    #[test]
    fn not_over_parenthesized_expression() {
        let expr = parse("!(sto==0)").expect("valid");
        assert!(matches!(expr, FilterExpr::Not(_)));
    }

    #[test]
    fn integer_field_literal_truncates_toward_zero() {
        assert_eq!(
            Ok(cmp(Field::Duration, CmpOp::Ge, FilterValue::Integer(3_599))),
            parse("dur>=3599.9")
        );
    }

    #[test]
    fn price_literal_stays_real() {
        assert_eq!(
            Ok(cmp(Field::Price, CmpOp::Lt, FilterValue::Real(99.5))),
            parse("prc<99.5")
        );
    }

    #[test]
    fn timestamp_literal_resolves_to_epoch_seconds() {
        assert_eq!(
            Ok(cmp(Field::Departure, CmpOp::Gt, FilterValue::Integer(0))),
            parse("dep>1970-01-01T00:00:00")
        );
    }

    #[test]
    fn timestamp_literal_stops_at_closing_paren() {
        let expr = parse("(dep>=1970-01-01T00:00:00)").expect("valid");
        assert_eq!(
            cmp(Field::Departure, CmpOp::Ge, FilterValue::Integer(0)),
            expr
        );
    }

    #[test]
    fn missing_closing_paren() {
        let err = parse("(org==AAA").expect_err("must fail");
        assert_eq!(ParseErrorKind::MissingClosingParen, err.kind);
    }

    #[test]
    fn missing_operator() {
        let err = parse("org AAA").expect_err("must fail");
        assert_eq!(ParseErrorKind::ExpectedOperator, err.kind);

        // The cursor sits past the skipped whitespace when the error surfaces
        assert_eq!(4, err.position);
    }

    #[test]
    fn unknown_field() {
        let err = parse("price==100").expect_err("must fail");
        assert_eq!(
            ParseErrorKind::UnknownField("price".into()),
            err.kind
        );
        assert_eq!(0, err.position);
    }

    #[test]
    fn empty_input() {
        let err = parse("").expect_err("must fail");
        assert_eq!(ParseErrorKind::ExpectedField, err.kind);
    }

    #[test]
    fn eof_inside_predicate() {
        let err = parse("prc>=").expect_err("must fail");
        assert_eq!(ParseErrorKind::ExpectedValue(Field::Price), err.kind);
    }

    #[test]
    fn code_value_on_numeric_field_is_rejected() {
        let err = parse("prc==AAA").expect_err("must fail");
        assert_eq!(ParseErrorKind::ExpectedValue(Field::Price), err.kind);
    }

    #[test]
    fn numeric_value_on_code_field_is_rejected() {
        let err = parse("org==123").expect_err("must fail");
        assert_eq!(ParseErrorKind::ExpectedValue(Field::Origin), err.kind);
    }

    #[test]
    fn malformed_number_is_rejected() {
        let err = parse("prc==1.2.3").expect_err("must fail");
        assert_eq!(ParseErrorKind::BadNumber("1.2.3".into()), err.kind);
    }

    #[test]
    fn malformed_timestamp_is_rejected() {
        let err = parse("dep>=yesterday").expect_err("must fail");
        assert_eq!(ParseErrorKind::BadTimestamp("yesterday".into()), err.kind);
    }

    #[test]
    fn dangling_boolean_operator() {
        let err = parse("org==AAA &&").expect_err("must fail");
        assert_eq!(ParseErrorKind::ExpectedField, err.kind);
    }
}
