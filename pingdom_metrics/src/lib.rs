pub mod aggregator;
pub mod collector;
pub mod exporters;
pub mod slo;
pub mod snapshot;

pub use aggregator::{OutageAggregator, OutageSummary};
pub use collector::{Collector, CollectorConfig, MAX_OUTAGE_CHECK_DAYS};
pub use exporters::PrometheusExporter;
pub use slo::SloResolver;
pub use snapshot::{CheckLabels, CheckSample, Snapshot, UpSnapshot};
