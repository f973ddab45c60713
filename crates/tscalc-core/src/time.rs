//! Parsers and formatting for the time values of the expression grammar.
//!
//! - epoch time: `1700000000` or `1700000000.25`, seconds since the Unix epoch
//! - iso time: `2023-11-14T22:13:20+00:00`, always with an explicit offset
//! - period: `1h30m`, `90s`, one or more `<integer><unit>` groups

use std::fmt;
use std::rc::Rc;
use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset, TimeDelta, Utc};
use regex::Regex;

use crate::cursor::Cursor;
use crate::error::ParseError;
use crate::node::Node;
use crate::parser::{ParseResult, Parser, ParserRef};

/// Format used both to read and to print ISO timestamps.
pub const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

static EPOCH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+(?:\.[0-9]+)?").unwrap());

static ISO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}[+-][0-9]{2}:[0-9]{2}")
        .unwrap()
});

static PERIOD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[0-9]+[hms])+").unwrap());

static PERIOD_PART_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)([hms])").unwrap());

/// Matches seconds since the Unix epoch.
pub struct EpochTime;

impl Parser for EpochTime {
    fn parse<'src>(&self, input: Cursor<'src>) -> ParseResult<'src> {
        let Some(found) = EPOCH_RE.find(input.rest()) else {
            return Ok(None);
        };
        let text = found.as_str();
        let seconds = text
            .parse::<f64>()
            .map_err(|source| ParseError::InvalidNumber {
                text,
                cursor: input,
                source,
            })?;
        tracing::trace!(text, seconds, "epoch time");
        let node = Node::EpochTime {
            seconds,
            cursor: input,
        };
        Ok(Some((node, input.advance(found.end()))))
    }
}

impl fmt::Display for EpochTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<epoch-time>")
    }
}

/// Matches an ISO-8601 timestamp with seconds and a numeric offset.
///
/// Text with the right shape but an impossible date, such as month 13, is an
/// error rather than a non-match.
pub struct IsoTime;

impl Parser for IsoTime {
    fn parse<'src>(&self, input: Cursor<'src>) -> ParseResult<'src> {
        let Some(found) = ISO_RE.find(input.rest()) else {
            return Ok(None);
        };
        let text = found.as_str();
        let instant = DateTime::parse_from_str(text, ISO_FORMAT).map_err(|source| {
            ParseError::InvalidTimestamp {
                text,
                cursor: input,
                source,
            }
        })?;
        tracing::trace!(text, %instant, "iso time");
        let node = Node::IsoTime {
            instant,
            cursor: input,
        };
        Ok(Some((node, input.advance(found.end()))))
    }
}

impl fmt::Display for IsoTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<iso-time>")
    }
}

/// Matches a period such as `1h30m` or `90s`.
///
/// Units may repeat and come in any order; `1m1m` is two minutes.
pub struct Period;

impl Parser for Period {
    fn parse<'src>(&self, input: Cursor<'src>) -> ParseResult<'src> {
        let Some(found) = PERIOD_RE.find(input.rest()) else {
            return Ok(None);
        };
        let text = found.as_str();
        let invalid = |reason| ParseError::InvalidPeriod {
            text,
            reason,
            cursor: input,
        };

        let mut duration = TimeDelta::zero();
        for part in PERIOD_PART_RE.captures_iter(text) {
            let amount: i64 = part[1].parse().map_err(|_| invalid("amount too large"))?;
            let part = match &part[2] {
                "h" => TimeDelta::try_hours(amount),
                "m" => TimeDelta::try_minutes(amount),
                _ => TimeDelta::try_seconds(amount),
            }
            .ok_or_else(|| invalid("amount too large"))?;
            duration = duration
                .checked_add(&part)
                .ok_or_else(|| invalid("total out of range"))?;
        }

        tracing::trace!(text, duration = %format_period(duration), "period");
        let node = Node::Period {
            duration,
            cursor: input,
        };
        Ok(Some((node, input.advance(found.end()))))
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<period>")
    }
}

pub fn epoch_time() -> ParserRef {
    Rc::new(EpochTime)
}

pub fn iso_time() -> ParserRef {
    Rc::new(IsoTime)
}

pub fn period() -> ParserRef {
    Rc::new(Period)
}

/// Converts epoch seconds to an instant in UTC, at microsecond precision.
///
/// Returns `None` when the value is outside the range of [`DateTime`].
pub fn epoch_to_instant(seconds: f64) -> Option<DateTime<FixedOffset>> {
    let micros = (seconds * 1e6).round();
    if !micros.is_finite() {
        return None;
    }
    #[expect(
        clippy::cast_possible_truncation,
        reason = "saturating cast, out of range values are rejected below"
    )]
    let micros = micros as i64;
    DateTime::from_timestamp_micros(micros).map(|utc| utc.fixed_offset())
}

/// Converts an instant to epoch seconds, keeping the sub-second part.
#[expect(
    clippy::cast_precision_loss,
    reason = "epoch seconds are f64 by definition"
)]
pub fn instant_to_epoch(instant: &DateTime<FixedOffset>) -> f64 {
    instant.timestamp() as f64 + f64::from(instant.timestamp_subsec_nanos()) / 1e9
}

/// Formats an instant in UTC, e.g. `2023-11-14T22:13:20+00:00`.
pub fn format_iso(instant: &DateTime<FixedOffset>) -> String {
    instant.with_timezone(&Utc).format(ISO_FORMAT).to_string()
}

/// Formats a period compactly, leaving out zero units.
///
/// `1h`, `1m40s`, `-1h`, `0s`, `1.5s`; periods under a second use the
/// largest unit that keeps the whole part non-zero: `1.5ms`, `250µs`, `10ns`.
pub fn format_period(duration: TimeDelta) -> String {
    if duration.is_zero() {
        return "0s".to_string();
    }

    let mut out = String::new();
    if duration < TimeDelta::zero() {
        out.push('-');
    }
    let duration = duration.abs();
    let seconds = duration.num_seconds();
    let nanos = duration.subsec_nanos().unsigned_abs();

    if seconds == 0 {
        match nanos {
            0..1_000 => push_fraction(&mut out, nanos, 0, 0, "ns"),
            1_000..1_000_000 => push_fraction(&mut out, nanos / 1_000, nanos % 1_000, 3, "µs"),
            _ => push_fraction(&mut out, nanos / 1_000_000, nanos % 1_000_000, 6, "ms"),
        }
        return out;
    }

    let (hours, minutes, secs) = (seconds / 3600, seconds % 3600 / 60, seconds % 60);
    if hours > 0 {
        push_fraction(&mut out, hours, 0, 0, "h");
    }
    if minutes > 0 {
        push_fraction(&mut out, minutes, 0, 0, "m");
    }
    if secs > 0 || nanos > 0 {
        push_fraction(&mut out, secs, nanos, 9, "s");
    }
    out
}

/// Appends `whole.fraction<unit>`, with trailing zeros of the fraction removed.
fn push_fraction(
    out: &mut String,
    whole: impl fmt::Display,
    fraction: u32,
    digits: usize,
    unit: &str,
) {
    out.push_str(&whole.to_string());
    if fraction > 0 {
        let fraction = format!("{fraction:0digits$}");
        out.push('.');
        out.push_str(fraction.trim_end_matches('0'));
    }
    out.push_str(unit);
}
