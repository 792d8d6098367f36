//! Collaborator seams for the event loop.
//!
//! In production: implemented over the daemon's named-request transport,
//! its certificate validator, and its statistics collector.
//! In test: mock impls that record calls for verification.

use crate::types::StatKind;
use crate::wire::{ProbeRequest, ResponseData};

/// The named-request transport.
///
/// Sending is fire-and-forget from the protocol's point of view; the
/// transport resolves each outstanding probe exactly once by delivering a
/// `ProbeOutcome` (response, timeout, or nack) on the outcome channel.
#[async_trait::async_trait]
pub trait Transport: Send {
    /// Express a probe toward a neighbor.
    async fn send_probe(&self, probe: ProbeRequest) -> Result<(), String>;

    /// Publish a signed response to an incoming probe.
    async fn send_response(&self, data: ResponseData) -> Result<(), String>;
}

/// The daemon's cryptographic/policy validator.
#[async_trait::async_trait]
pub trait Validator: Send {
    /// `Ok(())` means validated; `Err(reason)` means validation failed.
    async fn validate(&self, data: &ResponseData) -> Result<(), String>;
}

/// The telemetry collector owning the protocol's monotonic counters.
pub trait Telemetry: Send {
    fn increment(&self, kind: StatKind);
}

// ── Mocks (tests) ───────────────────────────────────────────────────────
