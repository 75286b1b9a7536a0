use crate::server;
use anyhow::Result;
use clap::Args;
use pingdom_core::{ClientConfig, PingdomClient, DEFAULT_BASE_URL};
use pingdom_metrics::{Collector, CollectorConfig};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct ServerArgs {
    /// Pingdom API token
    #[arg(long, env = "PINGDOM_API_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Address to listen on
    #[arg(long, env = "PINGDOM_EXPORTER_LISTEN", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub listen: IpAddr,

    /// Port to listen on
    #[arg(short, long, env = "PINGDOM_EXPORTER_PORT", default_value_t = 9158)]
    pub port: u16,

    /// Time (in days) in which to retrieve outage data from the Pingdom API
    #[arg(long, default_value_t = 7)]
    pub outage_check_period: u64,

    /// Uptime SLO for checks without an uptime SLO tag (i.e. uptime_slo_999 for 99.9%)
    #[arg(long, default_value_t = 99.0)]
    pub default_uptime_slo: f64,

    /// Only export checks carrying one of these tags (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Timeout for each Pingdom API request
    #[arg(long, default_value = "10s", value_parser = humantime::parse_duration)]
    pub request_timeout: Duration,

    /// Pingdom API base URL
    #[arg(long, env = "PINGDOM_API_URL", default_value = DEFAULT_BASE_URL)]
    pub api_url: String,
}

impl ServerArgs {
    pub fn collector_config(&self) -> CollectorConfig {
        CollectorConfig {
            outage_check_period: CollectorConfig::period_from_days(self.outage_check_period),
            default_uptime_slo: self.default_uptime_slo,
            tags: self.tags.clone(),
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.token.clone())
            .base_url(self.api_url.clone())
            .timeout(self.request_timeout)
    }
}

pub async fn execute(args: ServerArgs) -> Result<()> {
    let config = args.collector_config();
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    let client = PingdomClient::new(args.client_config())?;
    let collector = Collector::with_source(client, config);

    info!(
        "Outage check period: {} days, default uptime SLO: {}%",
        args.outage_check_period, args.default_uptime_slo
    );
    if !args.tags.is_empty() {
        info!("Restricting checks to tags: {}", args.tags.join(","));
    }

    let app = server::router(Arc::new(collector));

    let addr = SocketAddr::new(args.listen, args.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        "Pingdom Exporter v{} listening on http://{}",
        env!("CARGO_PKG_VERSION"),
        addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(server::shutdown_signal())
        .await?;

    info!("Server gracefully stopped");

    Ok(())
}
