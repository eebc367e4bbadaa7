//! Text to date conversion for date-typed cells.
//!
//! Factories take a converter by injection. A process-wide converter can also be
//! installed once; it is consulted only when nothing was injected.

use std::sync::{Arc, OnceLock};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use chrono::format::{Item, StrftimeItems};

use crate::error::{CellError, CellResult};

pub const DEFAULT_DATE_FORMAT: &str = "%d-%b-%Y";

pub trait DateConverter: Send + Sync {
    fn parse(&self, text: &str) -> Result<NaiveDate>;
    fn format(&self, date: &NaiveDate) -> String;
}

/// `strftime`-pattern converter backed by chrono.
#[derive(Debug, Clone)]
pub struct ChronoDateConverter {
    pattern: String,
}

impl ChronoDateConverter {
    pub fn new(pattern: impl Into<String>) -> CellResult<Self> {
        let pattern = pattern.into();
        let invalid = pattern.trim().is_empty()
            || StrftimeItems::new(&pattern).any(|item| matches!(item, Item::Error));
        if invalid {
            return Err(CellError::InvalidDateFormat(pattern));
        }
        Ok(Self { pattern })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl Default for ChronoDateConverter {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl DateConverter for ChronoDateConverter {
    fn parse(&self, text: &str) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(text.trim(), &self.pattern)
            .with_context(|| format!("Failed to parse '{text}' as date using '{}'", self.pattern))
    }

    fn format(&self, date: &NaiveDate) -> String {
        date.format(&self.pattern).to_string()
    }
}

static DATE_CONVERTER: OnceLock<Arc<dyn DateConverter>> = OnceLock::new();

/// Install the process-wide converter. It can only be set once.
pub fn install(converter: Arc<dyn DateConverter>) -> CellResult<()> {
    DATE_CONVERTER
        .set(converter)
        .map_err(|_| CellError::ConverterAlreadyInstalled)
}

pub fn installed() -> Option<Arc<dyn DateConverter>> {
    DATE_CONVERTER.get().cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pattern_round_trips() {
        let converter = ChronoDateConverter::default();
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(converter.format(&date), "05-Mar-2024");
        assert_eq!(converter.parse("05-Mar-2024").unwrap(), date);
    }

    #[test]
    fn rejects_malformed_patterns() {
        assert_eq!(
            ChronoDateConverter::new("%Q").unwrap_err(),
            CellError::InvalidDateFormat("%Q".to_string())
        );
        assert!(ChronoDateConverter::new("  ").is_err());
        assert_eq!(
            ChronoDateConverter::new("%Y-%m-%d").unwrap().pattern(),
            "%Y-%m-%d"
        );
    }

    #[test]
    fn parse_failure_is_reported() {
        let converter = ChronoDateConverter::default();
        assert!(converter.parse("not-a-date").is_err());
    }
}
