use serde::Serialize;
use std::collections::BTreeMap;

use crate::report::SeismicReport;

pub const SUCCESS_MESSAGE: &str = "Scraping completed successfully";
pub const EMPTY_MESSAGE: &str = "No seismic reports found on the page.";
pub const FAILURE_MESSAGE: &str = "Error during scraping";

/// Structured result handed back to whatever triggered the job.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: ResponseBody,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Success {
        message: String,
        count: usize,
        timestamp: String,
        sismos: Vec<SeismicReport>,
    },
    Empty {
        message: String,
        count: usize,
    },
    Failure {
        message: String,
        error: String,
    },
}

fn default_headers() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("Content-Type".to_string(), "application/json".to_string()),
        ("Access-Control-Allow-Origin".to_string(), "*".to_string()),
    ])
}

impl InvocationResponse {
    pub fn success(reports: Vec<SeismicReport>, timestamp: String) -> Self {
        Self {
            status_code: 200,
            headers: default_headers(),
            body: ResponseBody::Success {
                message: SUCCESS_MESSAGE.to_string(),
                count: reports.len(),
                timestamp,
                sismos: reports,
            },
        }
    }

    pub fn empty() -> Self {
        Self {
            status_code: 200,
            headers: default_headers(),
            body: ResponseBody::Empty {
                message: EMPTY_MESSAGE.to_string(),
                count: 0,
            },
        }
    }

    pub fn failure(error: impl ToString) -> Self {
        Self {
            status_code: 500,
            headers: default_headers(),
            body: ResponseBody::Failure {
                message: FAILURE_MESSAGE.to_string(),
                error: error.to_string(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }

    pub fn count(&self) -> usize {
        match &self.body {
            ResponseBody::Success { count, .. } | ResponseBody::Empty { count, .. } => *count,
            ResponseBody::Failure { .. } => 0,
        }
    }
}
