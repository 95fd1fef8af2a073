//! Display formatting for bill dates and statuses
//!
//! Dates are shown in the short French form used across the bill pages,
//! e.g. "2004-04-04" -> "4 Avr. 04".

use chrono::Datelike;
use contracts::domain::a001_bill::aggregate::{parse_bill_date, BillStatus};
use std::fmt;

const MONTHS: [&str; 12] = [
    "Jan", "Fév", "Mar", "Avr", "Mai", "Jui", "Jui", "Aoû", "Sep", "Oct", "Nov", "Déc",
];

/// Raised when a stored date cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatError {
    pub raw: String,
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid date: {:?}", self.raw)
    }
}

impl std::error::Error for FormatError {}

/// Format a raw bill date to "D Mon. YY"
pub fn format_date(raw: &str) -> Result<String, FormatError> {
    let date = parse_bill_date(raw).ok_or_else(|| FormatError {
        raw: raw.to_string(),
    })?;
    Ok(format!(
        "{} {}. {:02}",
        date.day(),
        MONTHS[date.month0() as usize],
        date.year().rem_euclid(100)
    ))
}

/// Same as [`format_date`] but keeps the raw value when it does not parse
pub fn format_date_or_raw(raw: &str) -> String {
    format_date(raw).unwrap_or_else(|_| raw.to_string())
}

pub fn format_status(status: BillStatus) -> &'static str {
    match status {
        BillStatus::Pending => "En attente",
        BillStatus::Accepted => "Accepté",
        BillStatus::Refused => "Refusé",
    }
}
