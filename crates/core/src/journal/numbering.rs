//! Sequential entry numbers of the form `PREFIX-YYYY-NNNNNN`.

use std::fmt;

use super::error::JournalError;

/// Width of the zero-padded sequence suffix.
const SEQUENCE_WIDTH: usize = 6;
/// Largest sequence that fits the suffix width.
const MAX_SEQUENCE: u32 = 999_999;

/// A parsed entry number.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct EntryNumber {
    /// Prefix, e.g. `AST`.
    pub prefix: String,
    /// Calendar year.
    pub year: i32,
    /// 1-based position within the year.
    pub sequence: u32,
}

impl EntryNumber {
    /// The first number of a year.
    #[must_use]
    pub fn first(prefix: &str, year: i32) -> Self {
        Self {
            prefix: prefix.to_string(),
            year,
            sequence: 1,
        }
    }

    /// The `LIKE`-style prefix shared by every number of a year, e.g. `AST-2025-`.
    #[must_use]
    pub fn year_prefix(prefix: &str, year: i32) -> String {
        format!("{prefix}-{year}-")
    }

    /// Parses `PREFIX-YYYY-NNNNNN`. Returns `None` for anything else.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let (rest, sequence) = value.rsplit_once('-')?;
        let (prefix, year) = rest.rsplit_once('-')?;
        if prefix.is_empty() || sequence.len() != SEQUENCE_WIDTH {
            return None;
        }

        Some(Self {
            prefix: prefix.to_string(),
            year: year.parse().ok()?,
            sequence: sequence.parse().ok()?,
        })
    }

    /// Computes the number following the highest existing one of the year.
    ///
    /// `last` is the greatest stored number starting with
    /// [`EntryNumber::year_prefix`]; a missing or unparseable value starts the
    /// year at `000001`.
    ///
    /// # Errors
    ///
    /// Returns `SequenceExhausted` once the six-digit suffix is used up.
    pub fn next_after(prefix: &str, year: i32, last: Option<&str>) -> Result<Self, JournalError> {
        let Some(previous) = last
            .and_then(Self::parse)
            .filter(|n| n.prefix == prefix && n.year == year)
        else {
            return Ok(Self::first(prefix, year));
        };

        if previous.sequence >= MAX_SEQUENCE {
            return Err(JournalError::SequenceExhausted {
                prefix: prefix.to_string(),
                year,
            });
        }

        Ok(Self {
            sequence: previous.sequence + 1,
            ..previous
        })
    }
}

impl fmt::Display for EntryNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{:0width$}",
            self.prefix,
            self.year,
            self.sequence,
            width = SEQUENCE_WIDTH
        )
    }
}
