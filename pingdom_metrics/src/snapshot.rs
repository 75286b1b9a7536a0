use crate::aggregator::OutageSummary;
use pingdom_core::Check;
use serde::Serialize;

/// Everything one scrape cycle emits.
///
/// A failed inventory fetch yields `Down`, which carries no per-check data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Snapshot {
    Down,
    Up(UpSnapshot),
}

impl Snapshot {
    pub fn is_up(&self) -> bool {
        matches!(self, Snapshot::Up(_))
    }

    pub fn checks(&self) -> &[CheckSample] {
        match self {
            Snapshot::Down => &[],
            Snapshot::Up(up) => &up.checks,
        }
    }

    pub fn check(&self, id: u64) -> Option<&CheckSample> {
        let id = id.to_string();
        self.checks().iter().find(|c| c.labels.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpSnapshot {
    pub period_seconds: f64,
    pub rate_limit_remaining: Option<f64>,
    pub checks: Vec<CheckSample>,
}

/// Label values identifying one check's series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckLabels {
    pub id: String,
    pub name: String,
    pub hostname: String,
    pub resolution: String,
    pub paused: String,
    pub tags: String,
}

impl From<&Check> for CheckLabels {
    fn from(check: &Check) -> Self {
        Self {
            id: check.id.to_string(),
            name: check.name.clone(),
            hostname: check.hostname.clone(),
            resolution: check.resolution.to_string(),
            paused: check.is_paused().to_string(),
            tags: check.tags_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckSample {
    pub labels: CheckLabels,
    /// 1 when the check is up, 0 for any other status.
    pub status: f64,
    pub response_time_seconds: f64,
    /// Absent when the outage history could not be fetched this cycle.
    pub outages: Option<OutageSummary>,
}

impl CheckSample {
    pub fn new(check: &Check, outages: Option<OutageSummary>) -> Self {
        Self {
            labels: CheckLabels::from(check),
            status: if check.is_up() { 1.0 } else { 0.0 },
            response_time_seconds: check.response_time_seconds(),
            outages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pingdom_core::CheckStatus;

    #[test]
    fn test_sample_from_check() {
        let check = Check::new(85975, "My check 1")
            .with_hostname("example.com")
            .with_resolution(5)
            .with_status(CheckStatus::Paused)
            .with_response_time(1141)
            .with_tag("apache")
            .with_tag("uptime_slo_999");

        let sample = CheckSample::new(&check, None);

        assert_eq!(sample.labels.id, "85975");
        assert_eq!(sample.labels.resolution, "5");
        assert_eq!(sample.labels.paused, "true");
        assert_eq!(sample.labels.tags, "apache,uptime_slo_999");
        assert_eq!(sample.status, 0.0);
        assert!((sample.response_time_seconds - 1.141).abs() < 1e-9);
        assert!(sample.outages.is_none());
    }

    #[test]
    fn test_down_snapshot_has_no_checks() {
        assert!(!Snapshot::Down.is_up());
        assert!(Snapshot::Down.checks().is_empty());
        assert!(Snapshot::Down.check(1).is_none());
    }
}
