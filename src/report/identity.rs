use sha2::{Digest, Sha256};

use super::SeismicReport;

pub const ID_SEPARATOR: char = '-';

/// Hex SHA-256 of `report_id-local_date_time-magnitude`. Reference text and
/// link never contribute, so cosmetic edits on the source page keep the key.
pub fn deterministic_id(report: &SeismicReport) -> String {
    let raw = format!(
        "{}{sep}{}{sep}{}",
        report.report_id,
        report.local_date_time,
        report.magnitude,
        sep = ID_SEPARATOR
    );

    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    hex::encode(hasher.finalize())
}
