//! Response envelopes of the Pingdom 3.1 API.

use crate::check::Check;
use crate::outage::OutageInterval;
use serde::Deserialize;
use std::fmt;

pub const DEFAULT_BASE_URL: &str = "https://api.pingdom.com/api/3.1";

/// Error body returned with non-2xx responses.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiError {
    #[serde(rename = "statuscode")]
    pub status_code: u16,
    #[serde(rename = "statusdesc")]
    pub status_desc: String,
    #[serde(rename = "errormessage")]
    pub message: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.status_code, self.status_desc, self.message)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: ApiError,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListChecksResponse {
    #[serde(default)]
    pub checks: Vec<Check>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OutageSummaryResponse {
    pub summary: OutageSummary,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OutageSummary {
    #[serde(default)]
    pub states: Vec<OutageInterval>,
}
