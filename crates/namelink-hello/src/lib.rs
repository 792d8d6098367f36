//! Neighbor liveness (hello) protocol for a name-addressed routing daemon.
//!
//! Periodically probes each configured neighbor, tracks consecutive
//! timeouts against a retry limit, answers incoming probes with signed
//! responses, and notifies the daemon when a neighbor's reachability
//! changes.
//!
//! Wire format: MessagePack (compact binary).
//! Crypto: Ed25519 signatures over canonical response bytes.

pub mod adjacency;
pub mod config;
pub mod correlator;
pub mod error;
pub mod hello;
pub mod name;
pub mod runtime;
pub mod types;
pub mod wire;

pub use adjacency::{AdjacencyList, EndpointId, Neighbor};
pub use config::HelloConfig;
pub use error::HelloProtocolError;
pub use hello::{HelloAction, HelloEvent, HelloProtocol};
pub use name::Name;
pub use runtime::{
    HelloChannels, HelloCommand, HelloHandle, HelloRuntime, NeighborSnapshot, ProbeOutcome,
    Telemetry, Transport, Validator,
};
pub use types::{
    now_ms, NeighborStatus, RoutingMode, StatKind, INFO_COMPONENT, RESPONSE_FRESHNESS_MS,
    SERVICE_COMPONENT,
};
pub use wire::{ProbeRequest, ResponseData};
