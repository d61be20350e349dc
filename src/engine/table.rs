//! Whitespace-separated tabular text output.
//!
//! A few commands only have text output. Rows are split on whitespace and
//! fields are addressed from the end of the row, because leading columns
//! (the interface description) may themselves contain spaces.

use crate::engine::EvalError;

/// Field value meaning "no reading".
pub const SENTINEL: &str = "-";

/// One data row of a text table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row<'a> {
    pub line: &'a str,
    pub tokens: Vec<&'a str>,
}

impl<'a> Row<'a> {
    /// First column (the interface name in interface tables).
    pub fn key(&self) -> &'a str {
        self.tokens.first().copied().unwrap_or("")
    }

    /// The `n`th field counted from the end, 1-based.
    pub fn from_end(&self, n: usize) -> Result<&'a str, EvalError> {
        if n == 0 || n > self.tokens.len() {
            return Err(EvalError::MalformedLine {
                line: self.line.to_string(),
                reason: format!("expected at least {} fields, found {}", n, self.tokens.len()),
            });
        }
        Ok(self.tokens[self.tokens.len() - n])
    }
}

/// Data rows of a table: the header line is dropped, as are blank lines.
pub fn rows(text: &str) -> impl Iterator<Item = Row<'_>> {
    text.lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(|line| Row {
            line,
            tokens: line.split_whitespace().collect(),
        })
}

/// Parse a percentage field such as `80%` or `12.5%`. The sentinel yields
/// `None`.
pub fn parse_percent(token: &str) -> Result<Option<f64>, EvalError> {
    if token == SENTINEL {
        return Ok(None);
    }
    token
        .trim_end_matches('%')
        .parse::<f64>()
        .map(Some)
        .map_err(|_| EvalError::InvalidValue {
            what: "percentage".to_string(),
            value: token.to_string(),
        })
}

/// Upper bound a reading must not exceed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threshold(pub f64);

impl Threshold {
    pub fn exceeded_by(&self, value: f64) -> bool {
        value > self.0
    }
}

/// A row whose reading crossed the threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breach {
    pub key: String,
    pub value: String,
}

/// Outcome of scanning a table against a threshold.
#[derive(Debug, Default)]
pub struct Scan {
    pub breaches: Vec<Breach>,
    /// Rows that could not be read, one error each
    pub malformed: Vec<EvalError>,
}

/// Rows where one of the given fields (counted from the end) exceeds the
/// threshold. A row with the sentinel in any of those fields is skipped; the
/// first breaching field in `fields` order is reported. An unreadable row is
/// recorded in [`Scan::malformed`] and the scan moves on.
pub fn breaches(text: &str, fields: &[usize], threshold: Threshold) -> Scan {
    let mut scan = Scan::default();

    for row in rows(text) {
        match breach_in(&row, fields, threshold) {
            Ok(Some(breach)) => scan.breaches.push(breach),
            Ok(None) => {}
            Err(e) => scan.malformed.push(e),
        }
    }

    scan
}

fn breach_in(row: &Row<'_>, fields: &[usize], threshold: Threshold) -> Result<Option<Breach>, EvalError> {
    let tokens = fields
        .iter()
        .map(|&n| row.from_end(n))
        .collect::<Result<Vec<_>, _>>()?;

    if tokens.iter().any(|t| *t == SENTINEL) {
        return Ok(None);
    }

    for token in tokens {
        if let Some(value) = parse_percent(token)? {
            if threshold.exceeded_by(value) {
                return Ok(Some(Breach {
                    key: row.key().to_string(),
                    value: token.to_string(),
                }));
            }
        }
    }
    Ok(None)
}
