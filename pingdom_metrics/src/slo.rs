use pingdom_core::Tag;
use regex::Regex;
use std::sync::LazyLock;
use tracing::error;

/// `uptime_slo_999` declares a 99.9% uptime SLO.
static UPTIME_SLO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^uptime_slo_([0-9]+)$").expect("valid uptime SLO regex"));

/// Resolves the uptime SLO of a check from its tags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SloResolver {
    default_uptime_slo: f64,
}

impl SloResolver {
    pub fn new(default_uptime_slo: f64) -> Self {
        Self { default_uptime_slo }
    }

    /// Uptime SLO in percent from the first `uptime_slo_<digits>` tag, or the
    /// default when there is none.
    ///
    /// The decimal point sits two digits from the left: `95` is 95%, `999` is
    /// 99.9% and `99995` is 99.995%.
    pub fn resolve(&self, tags: &[Tag]) -> f64 {
        let digits = tags.iter().find_map(|tag| {
            UPTIME_SLO_RE
                .captures(&tag.name)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str())
        });

        let Some(digits) = digits else {
            return self.default_uptime_slo;
        };

        match digits.parse::<u64>() {
            Ok(value) => {
                let scale = digits.len().saturating_sub(2) as i32;
                value as f64 / 10f64.powi(scale)
            }
            Err(e) => {
                error!("Error parsing uptime SLO tag {}: {}", digits, e);
                self.default_uptime_slo
            }
        }
    }
}

impl Default for SloResolver {
    fn default() -> Self {
        Self::new(99.0)
    }
}
