use pingdom_core::{OutageInterval, OutageStatus};
use serde::{Deserialize, Serialize};

/// Per-check totals over one outage check period.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OutageSummary {
    pub outage_count: u64,
    pub up_seconds: f64,
    pub down_seconds: f64,
    pub error_budget_seconds: f64,
    /// Negative once the budget is exhausted.
    pub remaining_error_budget_seconds: f64,
}

pub struct OutageAggregator;

impl OutageAggregator {
    /// Sums up and down time over `intervals`, which the upstream has already
    /// clipped to the window. Intervals that are neither up nor down are skipped.
    pub fn aggregate(intervals: &[OutageInterval], window_seconds: f64, uptime_slo: f64) -> OutageSummary {
        let mut outage_count = 0u64;
        let mut up_seconds = 0i64;
        let mut down_seconds = 0i64;

        for interval in intervals {
            match interval.status {
                OutageStatus::Down => {
                    outage_count += 1;
                    down_seconds += interval.duration_seconds();
                }
                OutageStatus::Up => {
                    up_seconds += interval.duration_seconds();
                }
                OutageStatus::UnconfirmedDown | OutageStatus::Unknown => {}
            }
        }

        let error_budget_seconds = Self::error_budget(window_seconds, uptime_slo);
        let down_seconds = down_seconds as f64;

        OutageSummary {
            outage_count,
            up_seconds: up_seconds as f64,
            down_seconds,
            error_budget_seconds,
            remaining_error_budget_seconds: error_budget_seconds - down_seconds,
        }
    }

    /// Allowed downtime in seconds for `window_seconds` at `uptime_slo` percent.
    pub fn error_budget(window_seconds: f64, uptime_slo: f64) -> f64 {
        window_seconds * (100.0 - uptime_slo) / 100.0
    }
}
