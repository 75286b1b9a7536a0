use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Tag name that removes a check from the exported series.
pub const IGNORE_TAG: &str = "pingdom_exporter_ignored";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Up,
    Down,
    Paused,
    UnconfirmedDown,
    #[default]
    #[serde(other)]
    Unknown,
}

impl CheckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckStatus::Up => "up",
            CheckStatus::Down => "down",
            CheckStatus::Paused => "paused",
            CheckStatus::UnconfirmedDown => "unconfirmed_down",
            CheckStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub count: Option<u64>,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: String::new(),
            count: None,
        }
    }
}

// The API reports tag counts as numbers on most endpoints and as strings on some.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64().or_else(|| n.as_f64().map(|f| f as u64)),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct HttpDetails {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub encryption: bool,
    #[serde(default)]
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct TcpDetails {
    #[serde(default)]
    pub port: u16,
    #[serde(rename = "stringtosend", default)]
    pub string_to_send: String,
    #[serde(rename = "stringtoexpect", default)]
    pub string_to_expect: String,
}

/// The check `type` field. The list endpoint sends a bare name (`"http"`),
/// the detail endpoint an object with a single key (`{"http": {...}}`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawCheckKind")]
pub enum CheckKind {
    Http(Option<HttpDetails>),
    Tcp(Option<TcpDetails>),
    Other(String),
}

impl CheckKind {
    pub fn name(&self) -> &str {
        match self {
            CheckKind::Http(_) => "http",
            CheckKind::Tcp(_) => "tcp",
            CheckKind::Other(name) => name,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCheckKind {
    Name(String),
    Detailed(BTreeMap<String, Value>),
}

impl TryFrom<RawCheckKind> for CheckKind {
    type Error = String;

    fn try_from(raw: RawCheckKind) -> Result<Self, Self::Error> {
        match raw {
            RawCheckKind::Name(name) => Ok(match name.as_str() {
                "http" => CheckKind::Http(None),
                "tcp" => CheckKind::Tcp(None),
                _ => CheckKind::Other(name),
            }),
            RawCheckKind::Detailed(map) => {
                if map.len() != 1 {
                    return Err(format!(
                        "check type must contain exactly one object, got {} keys",
                        map.len()
                    ));
                }
                let Some((name, details)) = map.into_iter().next() else {
                    return Err("check type object is empty".to_string());
                };
                match name.as_str() {
                    "http" => serde_json::from_value(details)
                        .map(|d| CheckKind::Http(Some(d)))
                        .map_err(|e| format!("invalid http details: {}", e)),
                    "tcp" => serde_json::from_value(details)
                        .map(|d| CheckKind::Tcp(Some(d)))
                        .map_err(|e| format!("invalid tcp details: {}", e)),
                    _ => Ok(CheckKind::Other(name)),
                }
            }
        }
    }
}

/// A monitored check as returned by the checks endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Check {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub hostname: String,
    /// Polling resolution in minutes.
    #[serde(default)]
    pub resolution: u32,
    #[serde(default)]
    pub status: CheckStatus,
    /// Last response time in milliseconds.
    #[serde(rename = "lastresponsetime", default)]
    pub last_response_time: u64,
    #[serde(rename = "lasterrortime", default)]
    pub last_error_time: Option<i64>,
    #[serde(rename = "lasttesttime", default)]
    pub last_test_time: Option<i64>,
    #[serde(default)]
    pub created: Option<i64>,
    /// Informational only. `status` is what decides whether a check is paused.
    #[serde(default)]
    pub paused: bool,
    #[serde(rename = "type", default)]
    pub kind: Option<CheckKind>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Check {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            hostname: String::new(),
            resolution: 0,
            status: CheckStatus::Unknown,
            last_response_time: 0,
            last_error_time: None,
            last_test_time: None,
            created: None,
            paused: false,
            kind: None,
            tags: Vec::new(),
        }
    }

    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }

    pub fn with_status(mut self, status: CheckStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_resolution(mut self, resolution: u32) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_response_time(mut self, millis: u64) -> Self {
        self.last_response_time = millis;
        self
    }

    pub fn with_tag(mut self, name: impl Into<String>) -> Self {
        self.tags.push(Tag::new(name));
        self
    }

    /// Tag names joined with commas, in upstream order.
    pub fn tags_string(&self) -> String {
        self.tags
            .iter()
            .map(|t| t.name.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn is_ignored(&self) -> bool {
        self.tags.iter().any(|t| t.name == IGNORE_TAG)
    }

    pub fn is_paused(&self) -> bool {
        self.status == CheckStatus::Paused
    }

    pub fn is_up(&self) -> bool {
        self.status == CheckStatus::Up
    }

    pub fn response_time_seconds(&self) -> f64 {
        self.last_response_time as f64 / 1000.0
    }
}
