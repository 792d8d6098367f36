use std::time::Duration;

use crate::name::Name;
use crate::types::RoutingMode;

/// Read-only configuration for the hello sub-protocol.
///
/// Owned by the daemon's configuration store; the protocol never mutates it.
#[derive(Debug, Clone)]
pub struct HelloConfig {
    /// This router's own identity name.
    pub router_name: Name,
    /// Lifetime of a single probe before the transport reports a timeout.
    pub probe_lifetime: Duration,
    /// Time between full probing passes over the neighbor table.
    pub probe_interval: Duration,
    /// Consecutive probe timeouts tolerated before declaring a neighbor down.
    pub retry_limit: u32,
    /// Selects which downstream recomputation a recovery triggers.
    pub routing_mode: RoutingMode,
    /// Key locator stamped into signed responses.
    pub key_name: Name,
}

impl HelloConfig {
    /// Configuration with stock timing values: 5 s probe lifetime,
    /// 60 s probing interval, 3 retries, link-state mode.
    pub fn new(router_name: Name) -> Self {
        let key_name = router_name.clone().append("KEY");
        Self {
            router_name,
            probe_lifetime: Duration::from_secs(5),
            probe_interval: Duration::from_secs(60),
            retry_limit: 3,
            routing_mode: RoutingMode::LinkState,
            key_name,
        }
    }

    /// Set the routing mode.
    pub fn routing_mode(mut self, mode: RoutingMode) -> Self {
        self.routing_mode = mode;
        self
    }

    /// Set the retry limit.
    pub fn retry_limit(mut self, limit: u32) -> Self {
        self.retry_limit = limit;
        self
    }

    /// Set probe timing (lifetime and pass interval).
    pub fn timing(mut self, lifetime: Duration, interval: Duration) -> Self {
        self.probe_lifetime = lifetime;
        self.probe_interval = interval;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_values() {
        let config = HelloConfig::new("/ndn/site/router-a".parse().expect("name"));
        assert_eq!(config.probe_lifetime, Duration::from_secs(5));
        assert_eq!(config.probe_interval, Duration::from_secs(60));
        assert_eq!(config.retry_limit, 3);
        assert_eq!(config.routing_mode, RoutingMode::LinkState);
        assert_eq!(config.key_name.to_string(), "/ndn/site/router-a/KEY");
    }

    #[test]
    fn builder_overrides() {
        let config = HelloConfig::new("/r".parse().expect("name"))
            .routing_mode(RoutingMode::Hyperbolic)
            .retry_limit(2)
            .timing(Duration::from_secs(1), Duration::from_secs(10));
        assert_eq!(config.routing_mode, RoutingMode::Hyperbolic);
        assert_eq!(config.retry_limit, 2);
        assert_eq!(config.probe_lifetime, Duration::from_secs(1));
        assert_eq!(config.probe_interval, Duration::from_secs(10));
    }
}
