//! Domain model, metrics, filtering and selection for the lead and deal
//! dashboards.
//!
//! Everything in this crate is a pure function of an in-memory record
//! collection. Loading fixtures lives in `salesboard-store`; rendering lives in
//! `salesboard-cli`.

use std::fmt::{Debug, Display};

use time::macros::format_description;
use time::Date;

pub mod deals;
pub mod format;
pub mod leads;
pub mod session;

pub use deals::{Deal, DealMetrics, DealStage, StageBreakdown};
pub use leads::{Contact, Lead, LeadMetrics, LeadStatus, Note, Priority, Property, PropertyType};
pub use session::{DashboardSession, Selection, SessionAction};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

#[derive(Debug, Clone, thiserror::Error, Eq, PartialEq)]
pub enum DashboardError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid action: {0}")]
    InvalidAction(String),
}

/// A categorical dimension a dashboard list can be filtered by.
///
/// Labels are matched case-insensitively, with `-` and `_` accepted in place
/// of spaces, for every dataset.
pub trait Category: Copy + Eq + Debug + Display + 'static {
    /// Every bucket, in display order.
    const ALL: &'static [Self];

    fn as_str(self) -> &'static str;

    /// Human-facing label for filter controls.
    fn label(self) -> &'static str {
        self.as_str()
    }

    #[must_use]
    fn parse(value: &str) -> Option<Self> {
        let wanted = normalize_label(value);
        Self::ALL
            .iter()
            .copied()
            .find(|candidate| normalize_label(candidate.as_str()) == wanted)
    }
}

/// One entry of a dashboard's record collection.
pub trait DashboardRecord {
    type Category: Category;

    fn id(&self) -> &str;

    fn category(&self) -> Self::Category;

    /// The numeric value summed into the dashboard totals.
    fn value(&self) -> f64;

    /// Whether `sub_id` names one of this record's sub-records.
    fn has_sub_record(&self, _sub_id: &str) -> bool {
        false
    }
}

/// Returns the records whose category equals `criterion`, in their original
/// order. `None` returns every record.
#[must_use]
pub fn filter_records<R: DashboardRecord>(
    records: &[R],
    criterion: Option<R::Category>,
) -> Vec<&R> {
    match criterion {
        Some(wanted) => records
            .iter()
            .filter(|record| record.category() == wanted)
            .collect(),
        None => records.iter().collect(),
    }
}

/// Parses a filter criterion. The literal `all` (any case) means no criterion.
///
/// # Errors
/// Returns [`DashboardError::Validation`] when `raw` names no known bucket.
pub fn parse_criterion<C: Category>(raw: &str) -> Result<Option<C>, DashboardError> {
    if normalize_label(raw) == "all" {
        return Ok(None);
    }

    C::parse(raw).map(Some).ok_or_else(|| {
        let allowed = C::ALL
            .iter()
            .map(|candidate| candidate.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        DashboardError::Validation(format!(
            "unknown filter value `{raw}` (expected all, {allowed})"
        ))
    })
}

#[must_use]
pub fn total_value<R: DashboardRecord>(records: &[R]) -> f64 {
    records.iter().map(|record| record.value()).sum()
}

/// Mean of `total` over `count` items; an empty collection averages to zero.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average_value(total: f64, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    total / count as f64
}

#[must_use]
pub fn count_in<R: DashboardRecord>(records: &[R], category: R::Category) -> usize {
    records
        .iter()
        .filter(|record| record.category() == category)
        .count()
}

/// `part / whole` as a whole-number percentage, halves rounding up. Zero when
/// `whole` is zero.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn share_percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as u32
}

/// Parses a `YYYY-MM-DD` calendar date.
///
/// # Errors
/// Returns [`DashboardError::Validation`] when the value is not a valid date.
pub fn parse_iso_date(value: &str) -> Result<Date, DashboardError> {
    Date::parse(value, format_description!("[year]-[month]-[day]"))
        .map_err(|err| DashboardError::Validation(format!("invalid date `{value}`: {err}")))
}

fn normalize_label(value: &str) -> String {
    value
        .trim()
        .chars()
        .map(|ch| match ch {
            '-' | '_' => ' ',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn must_ok<T, E: std::fmt::Display>(result: Result<T, E>) -> T {
        match result {
            Ok(value) => value,
            Err(err) => panic!("expected Ok(..), got error: {err}"),
        }
    }

    pub fn must_some<T>(value: Option<T>) -> T {
        match value {
            Some(inner) => inner,
            None => panic!("expected Some(..), got None"),
        }
    }

    pub fn date(value: &str) -> Date {
        must_ok(parse_iso_date(value))
    }

    pub fn contact(id: &str, notes: usize) -> Contact {
        Contact {
            id: id.to_string(),
            name: format!("Contact {id}"),
            email: format!("{id}@example.com"),
            phone: "(630) 555-0100".to_string(),
            company: "Prairie Holdings".to_string(),
            title: "Principal".to_string(),
            role: "Owner".to_string(),
            notes: (0..notes)
                .map(|index| Note {
                    date: date("2025-01-15"),
                    author: "Dana Ruiz".to_string(),
                    text: format!("note {index}"),
                })
                .collect(),
        }
    }

    pub fn lead(id: &str, property_type: PropertyType, price: f64) -> Lead {
        Lead {
            id: id.to_string(),
            property_type,
            property: Property {
                address: "100 Warrenville Rd".to_string(),
                city: "Naperville".to_string(),
                state: "IL".to_string(),
                zip: "60563".to_string(),
                county: "DuPage".to_string(),
                kind: "Office Building".to_string(),
                square_feet: 12_500,
                price,
                zoning: "O-1".to_string(),
                year_built: 1998,
                description: "Two-story office".to_string(),
            },
            status: LeadStatus::Active,
            priority: Priority::Medium,
            date_added: date("2025-01-10"),
            contacts: Vec::new(),
        }
    }

    pub fn deal(id: &str, stage: DealStage, value: f64, probability: u8) -> Deal {
        Deal {
            id: id.to_string(),
            name: format!("Deal {id}"),
            company: "Acme Logistics".to_string(),
            contact_name: "Jordan Lee".to_string(),
            owner: "Sam Patel".to_string(),
            stage,
            value,
            probability,
            expected_close: date("2025-03-31"),
        }
    }
}
