use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutageStatus {
    Up,
    Down,
    UnconfirmedDown,
    #[serde(other)]
    Unknown,
}

/// A contiguous span in which a check held one status, in epoch seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutageInterval {
    pub status: OutageStatus,
    #[serde(rename = "timefrom")]
    pub from: i64,
    #[serde(rename = "timeto")]
    pub to: i64,
}

impl OutageInterval {
    pub fn new(status: OutageStatus, from: i64, to: i64) -> Self {
        Self { status, from, to }
    }

    pub fn up(from: i64, to: i64) -> Self {
        Self::new(OutageStatus::Up, from, to)
    }

    pub fn down(from: i64, to: i64) -> Self {
        Self::new(OutageStatus::Down, from, to)
    }

    pub fn duration_seconds(&self) -> i64 {
        self.to - self.from
    }
}
