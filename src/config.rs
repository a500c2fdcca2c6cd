//! Engine configuration.
//!
//! The region selector and separator class are structural contracts with
//! the host markup. They are plain data here so tests and the CLI can
//! point the engine at other documents, but the engine never renegotiates
//! them at runtime. The retry interval, fallback poll interval, and the
//! default open/closed state are the only behavioral tunables.

use std::time::Duration;

/// Structural path to the asynchronously populated content region.
pub const REGION_SELECTOR: &str =
    r#"div[data-controller="product-view"] div#product-section-view-frame"#;

/// Class that marks the separator element heading each section group.
pub const SEPARATOR_CLASS: &str = "section-separator";

/// Backoff between region-resolution attempts while searching.
pub const RETRY_INTERVAL: Duration = Duration::from_millis(500);

/// Period of the fallback poll that backs up the mutation watch.
pub const POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Settings for a retrofit run.
#[derive(Debug, Clone)]
pub struct Config {
    /// CSS selector resolving the content region.
    pub region_selector: String,
    /// Class naming the separator inside each section group.
    pub separator_class: String,
    /// How long to wait before re-resolving an absent region.
    pub retry_interval: Duration,
    /// How often the fallback poll re-checks readiness.
    pub poll_interval: Duration,
    /// Whether produced widgets start expanded.
    pub default_open: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            region_selector: REGION_SELECTOR.to_string(),
            separator_class: SEPARATOR_CLASS.to_string(),
            retry_interval: RETRY_INTERVAL,
            poll_interval: POLL_INTERVAL,
            default_open: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_contract() {
        let config = Config::default();
        assert_eq!(config.region_selector, REGION_SELECTOR);
        assert_eq!(config.separator_class, SEPARATOR_CLASS);
        assert_eq!(config.retry_interval, Duration::from_millis(500));
        assert_eq!(config.poll_interval, Duration::from_millis(1000));
        assert!(config.default_open);
    }
}
