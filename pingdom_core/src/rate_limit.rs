use regex::Regex;
use reqwest::header::HeaderMap;
use std::sync::LazyLock;

const REQ_LIMIT_HEADERS: [&str; 2] = ["req-limit-short", "req-limit-long"];

static REQ_LIMIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Remaining: (\d+) Time until reset: (\d+)").expect("valid rate limit regex")
});

/// Smallest "Remaining" count across the request-limit headers, if any parse.
pub fn min_remaining(headers: &HeaderMap) -> Option<f64> {
    REQ_LIMIT_HEADERS
        .iter()
        .filter_map(|key| headers.get(*key)?.to_str().ok())
        .filter_map(parse_remaining)
        .reduce(f64::min)
}

fn parse_remaining(value: &str) -> Option<f64> {
    REQ_LIMIT_RE
        .captures(value)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
