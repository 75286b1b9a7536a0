pub mod prometheus;

pub use prometheus::PrometheusExporter;
