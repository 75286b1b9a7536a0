use crate::snapshot::{CheckSample, Snapshot};
use prometheus::{Encoder, Gauge, GaugeVec, Opts, Registry, TextEncoder};

const CHECK_LABELS: [&str; 6] = ["id", "name", "hostname", "resolution", "paused", "tags"];
const OUTAGE_LABELS: [&str; 4] = ["id", "name", "hostname", "tags"];

/// Renders snapshots in the Prometheus text exposition format.
///
/// Every call builds its own [`Registry`], so series from a previous cycle
/// never leak into the next one.
pub struct PrometheusExporter;

impl PrometheusExporter {
    pub fn content_type() -> String {
        TextEncoder::new().format_type().to_string()
    }

    pub fn format(snapshot: &Snapshot) -> prometheus::Result<String> {
        let registry = Self::registry(snapshot)?;
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    pub fn registry(snapshot: &Snapshot) -> prometheus::Result<Registry> {
        let registry = Registry::new();

        let up = Gauge::new(
            "pingdom_up",
            "Whether the last pingdom scrape was successful (1: up, 0: down)",
        )?;
        registry.register(Box::new(up.clone()))?;

        let Snapshot::Up(snapshot) = snapshot else {
            up.set(0.0);
            return Ok(registry);
        };
        up.set(1.0);

        let period = Gauge::new("pingdom_slo_period_seconds", "Outage check period, in seconds")?;
        registry.register(Box::new(period.clone()))?;
        period.set(snapshot.period_seconds);

        if let Some(remaining) = snapshot.rate_limit_remaining {
            let rate_limit = Gauge::new(
                "pingdom_rate_limit_remaining_requests",
                "Smallest number of API requests remaining before the Pingdom rate limit resets",
            )?;
            registry.register(Box::new(rate_limit.clone()))?;
            rate_limit.set(remaining);
        }

        let gauges = CheckGauges::register(&registry)?;
        for sample in &snapshot.checks {
            gauges.observe(sample);
        }

        Ok(registry)
    }
}

struct CheckGauges {
    status: GaugeVec,
    response_time: GaugeVec,
    outages: GaugeVec,
    up_seconds: GaugeVec,
    down_seconds: GaugeVec,
    error_budget: GaugeVec,
    available_error_budget: GaugeVec,
}

impl CheckGauges {
    fn register(registry: &Registry) -> prometheus::Result<Self> {
        let gauge_vec = |name: &str, help: &str, labels: &[&str]| -> prometheus::Result<GaugeVec> {
            let vec = GaugeVec::new(Opts::new(name, help), labels)?;
            registry.register(Box::new(vec.clone()))?;
            Ok(vec)
        };

        Ok(Self {
            status: gauge_vec(
                "pingdom_uptime_status",
                "The current status of the check (1: up, 0: down)",
                &CHECK_LABELS,
            )?,
            response_time: gauge_vec(
                "pingdom_uptime_response_time_seconds",
                "The response time of last test, in seconds",
                &CHECK_LABELS,
            )?,
            outages: gauge_vec(
                "pingdom_outages_total",
                "Number of outages within the outage check period",
                &OUTAGE_LABELS,
            )?,
            up_seconds: gauge_vec(
                "pingdom_up_seconds",
                "Total up time within the outage check period, in seconds",
                &OUTAGE_LABELS,
            )?,
            down_seconds: gauge_vec(
                "pingdom_down_seconds",
                "Total down time within the outage check period, in seconds",
                &OUTAGE_LABELS,
            )?,
            error_budget: gauge_vec(
                "pingdom_uptime_slo_error_budget_total_seconds",
                "Maximum number of allowed downtime, in seconds, according to the uptime SLO",
                &OUTAGE_LABELS,
            )?,
            available_error_budget: gauge_vec(
                "pingdom_uptime_slo_error_budget_available_seconds",
                "Number of seconds of downtime we can still have without breaking the uptime SLO",
                &OUTAGE_LABELS,
            )?,
        })
    }

    fn observe(&self, sample: &CheckSample) {
        let l = &sample.labels;
        let check_labels = [
            l.id.as_str(),
            l.name.as_str(),
            l.hostname.as_str(),
            l.resolution.as_str(),
            l.paused.as_str(),
            l.tags.as_str(),
        ];
        self.status.with_label_values(&check_labels).set(sample.status);
        self.response_time
            .with_label_values(&check_labels)
            .set(sample.response_time_seconds);

        let Some(outages) = &sample.outages else {
            return;
        };
        let outage_labels = [
            l.id.as_str(),
            l.name.as_str(),
            l.hostname.as_str(),
            l.tags.as_str(),
        ];
        self.outages
            .with_label_values(&outage_labels)
            .set(outages.outage_count as f64);
        self.up_seconds
            .with_label_values(&outage_labels)
            .set(outages.up_seconds);
        self.down_seconds
            .with_label_values(&outage_labels)
            .set(outages.down_seconds);
        self.error_budget
            .with_label_values(&outage_labels)
            .set(outages.error_budget_seconds);
        self.available_error_budget
            .with_label_values(&outage_labels)
            .set(outages.remaining_error_budget_seconds);
    }
}
