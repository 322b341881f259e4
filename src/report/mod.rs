mod identity;
mod record;

pub use identity::{deterministic_id, ID_SEPARATOR};
pub use record::{Magnitude, PersistedRecord, SeismicReport};
