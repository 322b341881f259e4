mod report_parser;

pub use report_parser::{ParseOutcome, ReportParser, MIN_CELLS};
