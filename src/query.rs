// Copyright (c) 2024-present, the flightql authors
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::error::QueryError;
use crate::filter::{self, FilterExpr};
use crate::sort::SortCriteria;

/// One parsed query line.
#[derive(Clone, Debug)]
pub struct Query {
    /// Maximum number of result lines to emit.
    pub limit: usize,

    /// Multi-key sort order for results.
    pub criteria: SortCriteria,

    /// Filter expression tree, owned by this query.
    pub filter: FilterExpr,

    /// Verbatim expression text, reproduced in the echo line.
    pub expression_text: String,
}

impl Query {
    /// Parses a `K CRITERIA EXPRESSION` query line.
    ///
    /// The expression spans to the end of the line; its leading whitespace
    /// is trimmed and interior whitespace preserved, which is observable in
    /// the echo line.
    pub fn parse(line: &str) -> crate::Result<Self> {
        let rest = line.trim_start();
        let (limit_token, rest) = split_token(rest);

        let limit = limit_token
            .parse::<usize>()
            .ok()
            .filter(|&limit| limit >= 1)
            .ok_or_else(|| QueryError::BadLimit(limit_token.to_owned()))?;

        let rest = rest.trim_start();
        let (criteria_token, rest) = split_token(rest);
        let criteria = SortCriteria::parse(criteria_token)?;

        let expression_text = rest.trim_start();
        let filter = filter::parse(expression_text)?;

        Ok(Self {
            limit,
            criteria,
            filter,
            expression_text: expression_text.to_owned(),
        })
    }
}

fn split_token(s: &str) -> (&str, &str) {
    let end = s.find(char::is_whitespace).unwrap_or(s.len());
    s.split_at(end)
}

#[cfg(test)]
mod tests {
    use super::Query;
    use crate::error::{Error, QueryError};
    use crate::filter::FilterExpr;
    use test_log::test;

    #[test]
    fn full_query_line() {
        let query = Query::parse("5 pd prc<=300 && sto==0").expect("valid");

        assert_eq!(5, query.limit);
        assert_eq!("pd", format!("{}", query.criteria));
        assert_eq!("prc<=300 && sto==0", query.expression_text);
        assert!(matches!(query.filter, FilterExpr::And(..)));
    }

    #[test]
    fn interior_whitespace_is_preserved() {
        let query = Query::parse("  3  p   org==AAA  ||  dst==BBB").expect("valid");
        assert_eq!("org==AAA  ||  dst==BBB", query.expression_text);
    }

    #[test]
    fn zero_limit_is_rejected() {
        let err = Query::parse("0 p org==AAA").expect_err("must fail");
        assert!(matches!(
            err,
            Error::Query(QueryError::BadLimit(token)) if token == "0"
        ));
    }

    #[test]
    fn missing_limit_is_rejected() {
        assert!(Query::parse("").is_err());
        assert!(Query::parse("abc p org==AAA").is_err());
    }

    #[test]
    fn bad_criteria_is_rejected() {
        let err = Query::parse("5 pq org==AAA").expect_err("must fail");
        assert!(matches!(
            err,
            Error::Query(QueryError::BadCriteria(token)) if token == "pq"
        ));
    }

    #[test]
    fn filter_errors_propagate() {
        assert!(matches!(
            Query::parse("5 p (org==AAA").expect_err("must fail"),
            Error::Filter(_)
        ));
    }
}
