use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use super::identity::deterministic_id;

/// One row of the source table, exactly as displayed (trimmed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeismicReport {
    pub report_id: String,
    pub reference: String,
    pub local_date_time: String,
    pub magnitude: String,
    pub report_link: String,
}

impl SeismicReport {
    pub fn id(&self) -> String {
        deterministic_id(self)
    }
}

/// Stored magnitude: a number when the displayed text starts with one,
/// otherwise the text itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Magnitude {
    Numeric(f64),
    Raw(String),
}

fn float_prefix() -> &'static Regex {
    static FLOAT_PREFIX: OnceLock<Regex> = OnceLock::new();
    FLOAT_PREFIX.get_or_init(|| {
        Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?")
            .expect("float prefix pattern is valid")
    })
}

impl Magnitude {
    /// Parses the leading floating-point prefix of `text` ("4.5 ML" is 4.5).
    /// Anything without a finite numeric prefix is kept verbatim.
    pub fn coerce(text: &str) -> Self {
        float_prefix()
            .find(text.trim_start())
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .filter(|value| value.is_finite())
            .map(Magnitude::Numeric)
            .unwrap_or_else(|| Magnitude::Raw(text.to_string()))
    }
}

/// What the store receives for each report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedRecord {
    pub id: String,
    pub report_id: String,
    pub reference: String,
    pub local_date_time: String,
    pub magnitude: Magnitude,
    pub report_link: String,
    pub scraped_at: String,
}

impl PersistedRecord {
    pub fn from_report(report: &SeismicReport, scraped_at: &str) -> Self {
        Self {
            id: report.id(),
            report_id: report.report_id.clone(),
            reference: report.reference.clone(),
            local_date_time: report.local_date_time.clone(),
            magnitude: Magnitude::coerce(&report.magnitude),
            report_link: report.report_link.clone(),
            scraped_at: scraped_at.to_string(),
        }
    }
}
