pub mod api;
pub mod check;
pub mod client;
pub mod error;
pub mod outage;
pub mod rate_limit;
pub mod source;

pub use api::{ApiError, DEFAULT_BASE_URL};
pub use check::{Check, CheckKind, CheckStatus, Tag, IGNORE_TAG};
pub use client::{ClientConfig, PingdomClient};
pub use error::{PingdomError, Result};
pub use outage::{OutageInterval, OutageStatus};
pub use source::{CheckListing, CheckQuery, CheckSource, DynCheckSource, DynOutageSource, OutageSource};

// Re-export commonly used types
pub use async_trait::async_trait;
