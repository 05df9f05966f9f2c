use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;

use crate::api::DEFAULT_FEED_URL;
use crate::normalizer::DEFAULT_RAIL_ROUTE_THRESHOLD;

/// Live Zagreb transit vehicles from a GTFS-realtime feed.
#[derive(Debug, Clone, Parser)]
#[clap(name = "zet-live", version)]
pub struct Cli {
    /// GTFS-realtime vehicle positions endpoint
    #[clap(long, env = "ZET_FEED_URL", default_value = DEFAULT_FEED_URL)]
    pub feed_url: String,

    /// Seconds between feed polls
    #[clap(long, env = "ZET_POLL_INTERVAL_SECS", default_value_t = 10)]
    pub poll_interval_secs: u64,

    /// Seconds before a feed request is abandoned
    #[clap(long, env = "ZET_FETCH_TIMEOUT_SECS", default_value_t = 5)]
    pub fetch_timeout_secs: u64,

    /// Routes numbered below this are classified as trams
    #[clap(long, env = "ZET_RAIL_ROUTE_THRESHOLD", default_value_t = DEFAULT_RAIL_ROUTE_THRESHOLD)]
    pub rail_route_threshold: u64,

    /// Address the vehicles endpoint listens on
    #[clap(long, env = "ZET_LISTEN", default_value = "127.0.0.1:3000")]
    pub listen: SocketAddr,
}

/// Settings for the poll loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub feed_url: String,
    pub poll_interval: Duration,
    pub fetch_timeout: Duration,
    pub rail_route_threshold: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            poll_interval: Duration::from_secs(10),
            fetch_timeout: Duration::from_secs(5),
            rail_route_threshold: DEFAULT_RAIL_ROUTE_THRESHOLD,
        }
    }
}

impl From<&Cli> for Config {
    fn from(cli: &Cli) -> Self {
        Self {
            feed_url: cli.feed_url.clone(),
            poll_interval: Duration::from_secs(cli.poll_interval_secs.max(1)),
            fetch_timeout: Duration::from_secs(cli.fetch_timeout_secs.max(1)),
            rail_route_threshold: cli.rail_route_threshold,
        }
    }
}

impl Config {
    pub fn trace_loaded(&self) {
        tracing::info!(
            feed_url = %self.feed_url,
            poll_interval_secs = self.poll_interval.as_secs(),
            fetch_timeout_secs = self.fetch_timeout.as_secs(),
            rail_route_threshold = self.rail_route_threshold,
            "Loaded config"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_the_public_feed() {
        let cli = Cli::try_parse_from(["zet-live"]).unwrap();

        assert_eq!(Config::from(&cli), Config::default());
        assert_eq!(cli.listen, "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "zet-live",
            "--feed-url",
            "http://localhost:9000/feed",
            "--poll-interval-secs",
            "30",
            "--fetch-timeout-secs",
            "0",
            "--rail-route-threshold",
            "50",
        ])
        .unwrap();

        let config = Config::from(&cli);

        assert_eq!(config.feed_url, "http://localhost:9000/feed");
        assert_eq!(config.poll_interval, Duration::from_secs(30));
        assert_eq!(config.fetch_timeout, Duration::from_secs(1));
        assert_eq!(config.rail_route_threshold, 50);
    }
}
