use crate::{
    aggregator::{OutageAggregator, OutageSummary},
    slo::SloResolver,
    snapshot::{CheckSample, Snapshot, UpSnapshot},
};
use chrono::Utc;
use pingdom_core::{Check, CheckQuery, DynCheckSource, DynOutageSource, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Upper bound for the outage window, ten years.
pub const MAX_OUTAGE_CHECK_DAYS: u64 = 3650;

#[derive(Debug, Clone, PartialEq)]
pub struct CollectorConfig {
    /// Length of the outage window, counted back from the start of each cycle.
    pub outage_check_period: Duration,
    /// Uptime SLO in percent for checks without an `uptime_slo_*` tag.
    pub default_uptime_slo: f64,
    /// Restrict the inventory to checks carrying one of these tags.
    pub tags: Vec<String>,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            outage_check_period: Self::period_from_days(7),
            default_uptime_slo: 99.0,
            tags: Vec::new(),
        }
    }
}

impl CollectorConfig {
    /// Saturates instead of overflowing; [`validate`](Self::validate) rejects
    /// anything past [`MAX_OUTAGE_CHECK_DAYS`].
    pub fn period_from_days(days: u64) -> Duration {
        Duration::from_secs(days.saturating_mul(SECONDS_PER_DAY))
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.outage_check_period.is_zero() {
            return Err("Outage check period must be > 0".to_string());
        }

        if self.outage_check_period > Self::period_from_days(MAX_OUTAGE_CHECK_DAYS) {
            return Err(format!(
                "Outage check period must be at most {} days",
                MAX_OUTAGE_CHECK_DAYS
            ));
        }

        if !(self.default_uptime_slo > 0.0 && self.default_uptime_slo <= 100.0) {
            return Err(format!(
                "Default uptime SLO must be in (0, 100], got {}",
                self.default_uptime_slo
            ));
        }

        if self.tags.iter().any(|t| t.trim().is_empty()) {
            return Err("Tag filter cannot contain empty tags".to_string());
        }

        Ok(())
    }
}

/// Runs scrape cycles: lists checks, fetches every check's outage history
/// concurrently and assembles the results into one [`Snapshot`].
pub struct Collector {
    checks: DynCheckSource,
    outages: DynOutageSource,
    config: CollectorConfig,
    slo: SloResolver,
    // Held for a whole cycle so concurrent scrapes don't multiply upstream calls.
    cycle: Mutex<()>,
}

impl Collector {
    pub fn new(checks: DynCheckSource, outages: DynOutageSource, config: CollectorConfig) -> Self {
        let slo = SloResolver::new(config.default_uptime_slo);
        Self {
            checks,
            outages,
            config,
            slo,
            cycle: Mutex::new(()),
        }
    }

    /// Builds a collector around a client that serves both inventory and outages.
    pub fn with_source<S>(source: S, config: CollectorConfig) -> Self
    where
        S: pingdom_core::CheckSource + pingdom_core::OutageSource + 'static,
    {
        let source = Arc::new(source);
        Self::new(source.clone(), source, config)
    }

    pub async fn collect(&self) -> Snapshot {
        self.collect_at(Utc::now().timestamp()).await
    }

    /// Runs one cycle with the window ending at `now` (epoch seconds).
    pub async fn collect_at(&self, now: i64) -> Snapshot {
        let _cycle = self.cycle.lock().await;

        let query = CheckQuery {
            tags: self.config.tags.clone(),
        };
        let listing = match self.checks.list_checks(query).await {
            Ok(listing) => listing,
            Err(e) => {
                error!("Error getting checks: {}", e);
                return Snapshot::Down;
            }
        };

        let checks: Vec<Check> = listing
            .checks
            .into_iter()
            .filter(|check| {
                if check.is_ignored() {
                    debug!("Skipping ignored check {}", check.id);
                }
                !check.is_ignored()
            })
            .collect();

        let period_seconds = self.config.outage_check_period.as_secs_f64();
        let period =
            i64::try_from(self.config.outage_check_period.as_secs()).unwrap_or(i64::MAX);
        let from = now.saturating_sub(period);
        let outages = self.aggregate_all(&checks, from, now, period_seconds).await;

        let samples: Vec<CheckSample> = checks
            .iter()
            .zip(outages)
            .map(|(check, summary)| CheckSample::new(check, summary))
            .collect();

        info!(
            "Collected {} checks ({} with outage data)",
            samples.len(),
            samples.iter().filter(|s| s.outages.is_some()).count()
        );

        Snapshot::Up(UpSnapshot {
            period_seconds,
            rate_limit_remaining: listing.rate_limit_remaining,
            checks: samples,
        })
    }

    /// One task per check; slot `i` of the result belongs to `checks[i]` and
    /// stays `None` when that check's fetch failed.
    async fn aggregate_all(
        &self,
        checks: &[Check],
        from: i64,
        to: i64,
        window_seconds: f64,
    ) -> Vec<Option<OutageSummary>> {
        let mut slots: Vec<Option<OutageSummary>> = vec![None; checks.len()];
        let mut tasks = JoinSet::new();

        for (slot, check) in checks.iter().enumerate() {
            let outages = Arc::clone(&self.outages);
            let uptime_slo = self.slo.resolve(&check.tags);
            let check_id = check.id;

            // The fetch runs in its own task so a panic still reports its check.
            tasks.spawn(async move {
                let fetch = tokio::spawn(async move {
                    let result: Result<OutageSummary> = outages
                        .list_outages(check_id, from, to)
                        .await
                        .map(|intervals| {
                            OutageAggregator::aggregate(&intervals, window_seconds, uptime_slo)
                        });
                    result
                });
                (slot, check_id, fetch.await)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((slot, _, Ok(Ok(summary)))) => slots[slot] = Some(summary),
                Ok((_, check_id, Ok(Err(e)))) if e.is_timeout() => {
                    warn!("Timed out getting outages for check {}: {}", check_id, e);
                }
                Ok((_, check_id, Ok(Err(e)))) => {
                    warn!("Error getting outages for check {}: {}", check_id, e);
                }
                Ok((_, check_id, Err(e))) => {
                    error!("Outage task for check {} failed: {}", check_id, e);
                }
                Err(e) => error!("Outage task failed: {}", e),
            }
        }

        slots
    }
}
