use serde::{Deserialize, Serialize};

// ── Constants ────────────────────────────────────────────────────────────

/// Well-known service component in probe names: `/<neighbor>/namelink/INFO/…`.
pub const SERVICE_COMPONENT: &str = "namelink";

/// Well-known info marker component. Also the literal payload of a response.
pub const INFO_COMPONENT: &str = "INFO";

/// Freshness window of a signed response (10 seconds).
pub const RESPONSE_FRESHNESS_MS: u64 = 10_000;

// ── Neighbor liveness ────────────────────────────────────────────────────

/// Reachability state of a configured neighbor.
///
/// Every neighbor starts `Inactive` and becomes `Active` only once a signed
/// response from it has been validated. Transitions happen exclusively
/// inside the liveness engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NeighborStatus {
    Inactive,
    Active,
}

/// Which downstream recomputation a reachability change feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoutingMode {
    /// Adjacency changes rebuild the link-state database.
    LinkState,
    /// Hyperbolic coordinates: recovery triggers a routing table
    /// recalculation instead of a link-state rebuild.
    Hyperbolic,
}

// ── Telemetry ────────────────────────────────────────────────────────────

/// Monotonic counters owned by the telemetry collaborator.
///
/// The protocol only ever increments these; it never reads them back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatKind {
    SentProbe,
    ReceivedProbe,
    SentResponse,
    ReceivedResponse,
}

/// Current Unix time in milliseconds.
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
