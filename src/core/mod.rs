pub mod config;
mod errors;
mod job;
mod response;

#[cfg(test)]
mod tests;

pub use config::JobConfig;
pub use errors::{ScraperError, ScraperResult};
pub use job::SeismicJob;
pub use response::{InvocationResponse, ResponseBody};
