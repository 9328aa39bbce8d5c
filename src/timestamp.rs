// Copyright (c) 2024-present, the flightql authors
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::PrimitiveDateTime;

/// Unix epoch seconds (UTC).
pub type UnixTimestamp = i64;

const WALLCLOCK: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
);

/// Converts a `YYYY-MM-DDTHH:MM:SS` wallclock string into unix epoch seconds.
///
/// The wallclock is interpreted as UTC. An optional fractional-second part is
/// accepted and ignored.
pub fn parse_wallclock(s: &str) -> Result<UnixTimestamp, time::error::Parse> {
    let dt = PrimitiveDateTime::parse(s, WALLCLOCK)?;
    Ok(dt.assume_utc().unix_timestamp())
}
