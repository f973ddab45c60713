//! The line loop: evaluate each expression and render the outcome.

use std::io::{self, Write};

use anyhow::{Context, Result};
use serde::Serialize;
use tscalc_core::{Clock, Error, Grammar, calculate, time};

/// How results are rendered and when to stop.
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    pub json: bool,
    pub fail_fast: bool,
}

/// Counts of what happened during a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub evaluated: usize,
    pub failed: usize,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Record<'a> {
    Value {
        input: &'a str,
        result: String,
        kind: &'static str,
    },
    Failure {
        input: &'a str,
        error: String,
        column: usize,
    },
}

/// Evaluates every non-blank line.
///
/// Results go to `out`. Failures go to `err` with a marker under the failing
/// column, or to `out` as JSON objects in JSON mode. A failing line does not
/// stop the run unless `fail_fast` is set.
pub fn run<I, O, E>(
    lines: I,
    out: &mut O,
    err: &mut E,
    clock: &dyn Clock,
    options: Options,
) -> Result<Summary>
where
    I: IntoIterator<Item = io::Result<String>>,
    O: Write,
    E: Write,
{
    let grammar = Grammar::expression();
    let mut summary = Summary::default();

    for (idx, line) in lines.into_iter().enumerate() {
        let line = line.with_context(|| format!("failed to read line {}", idx + 1))?;
        if line.trim().is_empty() {
            continue;
        }

        summary.evaluated += 1;
        let _span = tracing::debug_span!("line", number = idx + 1).entered();
        match calculate(&grammar, &line, clock) {
            Ok(node) => {
                if options.json {
                    let record = Record::Value {
                        input: &line,
                        result: node.to_string(),
                        kind: node.kind(),
                    };
                    writeln!(out, "{}", serde_json::to_string(&record)?)?;
                } else {
                    writeln!(out, "{node}")?;
                }
            }
            Err(error) => {
                summary.failed += 1;
                tracing::debug!(%error, "line failed");
                if options.json {
                    let record = Record::Failure {
                        input: &line,
                        error: error.to_string(),
                        column: error.cursor().column(),
                    };
                    writeln!(out, "{}", serde_json::to_string(&record)?)?;
                } else {
                    report(err, &line, &error)?;
                }
                if options.fail_fast {
                    break;
                }
            }
        }
    }

    out.flush()?;
    Ok(summary)
}

/// Prints the current time, for when there is nothing to evaluate.
pub fn print_now<W: Write>(out: &mut W, clock: &dyn Clock) -> Result<()> {
    let now = clock.now().fixed_offset();
    writeln!(out, "{}", time::format_iso(&now))?;
    Ok(())
}

fn report<W: Write>(err: &mut W, line: &str, error: &Error<'_>) -> io::Result<()> {
    writeln!(err, "error: {error}")?;
    writeln!(err, "{line}")?;
    writeln!(err, "{:>width$}", "^", width = error.cursor().column() + 1)
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use insta::assert_snapshot;
    use tscalc_core::FixedClock;

    use super::*;

    const EPOCH: FixedClock = FixedClock(DateTime::UNIX_EPOCH);

    fn run_str(input: &str, options: Options) -> (String, String, Summary) {
        let lines = input.lines().map(|line| Ok::<_, io::Error>(line.to_string()));
        let mut out = Vec::new();
        let mut err = Vec::new();
        let summary = run(lines, &mut out, &mut err, &EPOCH, options).unwrap();
        (
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
            summary,
        )
    }

    #[test]
    fn test_evaluates_each_line() {
        let (out, err, summary) = run_str(
            "100\n1970-01-01T00:01:40+00:00\n1m + 1s\nnow - 1h\n",
            Options::default(),
        );
        assert_snapshot!(out, @r"
        1970-01-01T00:01:40+00:00
        100.000000
        1m1s
        1969-12-31T23:00:00+00:00
        ");
        assert!(err.is_empty());
        assert_eq!(
            summary,
            Summary {
                evaluated: 4,
                failed: 0
            }
        );
    }

    #[test]
    fn test_failures_point_at_the_column() {
        let (out, err, summary) = run_str("100 garbage\n1h - now\n1s\n", Options::default());
        assert_eq!(out, "1s\n");
        assert_snapshot!(err, @r#"
        error: failed to parse whole input, the remainder: " garbage"
        100 garbage
           ^
        error: cannot combine period - iso time
        1h - now
             ^
        "#);
        assert_eq!(summary.failed, 2);
    }

    #[test]
    fn test_fail_fast_stops_at_first_failure() {
        let options = Options {
            fail_fast: true,
            ..Options::default()
        };
        let (out, _, summary) = run_str("1s\nbogus\n2s\n", options);
        assert_eq!(out, "1s\n");
        assert_eq!(
            summary,
            Summary {
                evaluated: 2,
                failed: 1
            }
        );
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let (out, err, summary) = run_str("\n   \n1h\n\n", Options::default());
        assert_eq!(out, "1h\n");
        assert!(err.is_empty());
        assert_eq!(summary.evaluated, 1);
    }

    #[test]
    fn test_json_lines() {
        let options = Options {
            json: true,
            ..Options::default()
        };
        let (out, err, _) = run_str("100\n1m + 1s\n100 garbage\n", options);
        assert_snapshot!(out, @r#"
        {"input":"100","result":"1970-01-01T00:01:40+00:00","kind":"iso time"}
        {"input":"1m + 1s","result":"1m1s","kind":"period"}
        {"input":"100 garbage","error":"failed to parse whole input, the remainder: \" garbage\"","column":3}
        "#);
        assert!(err.is_empty());
    }

    #[test]
    fn test_read_errors_are_reported() {
        let lines = vec![
            Ok("1s".to_string()),
            Err(io::Error::new(io::ErrorKind::InvalidData, "not utf-8")),
        ];
        let mut out = Vec::new();
        let mut err = Vec::new();
        let error = run(lines, &mut out, &mut err, &EPOCH, Options::default()).unwrap_err();
        assert_eq!(error.to_string(), "failed to read line 2");
        assert_eq!(String::from_utf8(out).unwrap(), "1s\n");
    }

    #[test]
    fn test_prints_now() {
        let mut out = Vec::new();
        print_now(&mut out, &EPOCH).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1970-01-01T00:00:00+00:00\n");
    }
}
