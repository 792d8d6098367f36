//! The liveness engine and response responder.
//!
//! `HelloProtocol` is a pure state machine: every handler consumes one
//! event (scheduled pass, probe outcome, incoming probe, validation result)
//! and returns the `Vec<HelloAction>` to execute. No method touches the
//! network, channels, or clocks other than minting version components.
//! The event loop in `runtime` executes the actions.
//!
//! Failure detection per neighbor: consecutive probe timeouts increment
//! `timeout_count`; below the retry limit each timeout re-probes, at the
//! limit an `Active` neighbor is declared `Inactive` exactly once. A
//! validated response resets the counter and reactivates. Downstream
//! recomputation is requested only on actual status transitions.

use tracing::{debug, trace, warn};

use crate::adjacency::{AdjacencyList, Neighbor};
use crate::config::HelloConfig;
use crate::correlator;
use crate::name::Name;
use crate::types::{now_ms, NeighborStatus, RoutingMode, StatKind, INFO_COMPONENT, RESPONSE_FRESHNESS_MS};
use crate::wire::{ProbeRequest, ResponseData};

// ── Actions & events ────────────────────────────────────────────────────

/// Intention produced by the pure protocol logic, executed by the runtime.
#[derive(Debug)]
pub enum HelloAction {
    /// Send a probe over the transport.
    SendProbe(ProbeRequest),
    /// Send a signed response over the transport.
    SendResponse(ResponseData),
    /// Hand a response to the external validator. The validator's verdict
    /// re-enters the protocol via `handle_validated` /
    /// `handle_validation_failed`.
    Validate { probe: Name, data: ResponseData },
    /// Increment a telemetry counter.
    Record(StatKind),
    /// Notify the rest of the daemon.
    Emit(HelloEvent),
}

/// Notifications for the daemon's other subsystems.
///
/// The rebuild/recalculation requests are coalesced downstream; emitting
/// one is cheap and happens only when a neighbor's status actually changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HelloEvent {
    /// The link-state database should rebuild its adjacency advertisement.
    AdjacencyRebuildRequested,
    /// The routing table should recalculate (hyperbolic mode recovery).
    RoutingRecalculationRequested,
    /// A neighbor's reachability changed.
    NeighborStatusChanged {
        neighbor: Name,
        old: NeighborStatus,
        new: NeighborStatus,
    },
}

// ── Protocol state ──────────────────────────────────────────────────────

/// Per-router hello protocol state: configuration, signing seed, and the
/// neighbor table it alone may mutate.
pub struct HelloProtocol {
    config: HelloConfig,
    secret_seed: [u8; 32],
    adjacencies: AdjacencyList,
}

impl HelloProtocol {
    pub fn new(config: HelloConfig, secret_seed: [u8; 32]) -> Self {
        Self {
            config,
            secret_seed,
            adjacencies: AdjacencyList::new(),
        }
    }

    /// Register a configured neighbor.
    pub fn insert_neighbor(&mut self, neighbor: Neighbor) {
        self.adjacencies.insert(neighbor);
    }

    /// Read access to the neighbor table (diagnostics, peers' status).
    pub fn adjacencies(&self) -> &AdjacencyList {
        &self.adjacencies
    }

    pub fn config(&self) -> &HelloConfig {
        &self.config
    }

    // ── Periodic probing pass ───────────────────────────────────────────

    /// Probe every neighbor that has an assigned endpoint.
    ///
    /// Rescheduling of the next pass is the runtime's job; this method
    /// only emits the probes for one pass.
    pub fn probe_pass(&self) -> Vec<HelloAction> {
        let mut actions = Vec::new();
        for neighbor in self.adjacencies.iter() {
            if neighbor.has_endpoint() {
                debug!(neighbor = %neighbor.name, "sending scheduled probe");
                self.emit_probe(&neighbor.name, &mut actions);
            }
        }
        actions
    }

    fn emit_probe(&self, neighbor: &Name, actions: &mut Vec<HelloAction>) {
        let name = correlator::probe_name(neighbor, &self.config.router_name);
        debug!(probe = %name, "expressing probe");
        actions.push(HelloAction::SendProbe(ProbeRequest::new(
            name,
            self.config.probe_lifetime,
        )));
        actions.push(HelloAction::Record(StatKind::SentProbe));
    }

    // ── Probe outcomes ──────────────────────────────────────────────────

    /// A probe went unanswered.
    pub fn handle_timeout(&mut self, probe_name: &Name) -> Vec<HelloAction> {
        let Some(neighbor) = correlator::decode_timed_out_probe(probe_name) else {
            return Vec::new();
        };
        debug!(probe = %probe_name, %neighbor, "probe timed out");

        let mut actions = Vec::new();
        let Some(count) = self.adjacencies.increment_timeout_count(&neighbor) else {
            debug!(%neighbor, "timeout for unconfigured neighbor, ignoring");
            return actions;
        };
        let status = self.adjacencies.status_of(&neighbor);
        debug!(?status, count, "probe timeout tally");

        if count < self.config.retry_limit {
            self.emit_probe(&neighbor, &mut actions);
        } else if status == Some(NeighborStatus::Active) && count == self.config.retry_limit {
            self.adjacencies
                .set_status(&neighbor, NeighborStatus::Inactive);
            debug!(%neighbor, "status changed to inactive");
            actions.push(HelloAction::Emit(HelloEvent::NeighborStatusChanged {
                neighbor,
                old: NeighborStatus::Active,
                new: NeighborStatus::Inactive,
            }));
            // Loss of an adjacency always goes through the link-state
            // rebuild, independent of routing mode.
            actions.push(HelloAction::Emit(HelloEvent::AdjacencyRebuildRequested));
        }
        // Already inactive or past the limit: stale probe, nothing to do.
        actions
    }

    /// A probe was explicitly rejected. Not distinguished from a timeout.
    pub fn handle_nack(&mut self, probe_name: &Name, reason: &str) -> Vec<HelloAction> {
        trace!(reason, "received negative acknowledgement, treating as timeout");
        self.handle_timeout(probe_name)
    }

    /// A response arrived for one of our probes.
    ///
    /// Only peeks at the structural signature (informational); the actual
    /// verdict comes from the external validator via the returned action.
    pub fn handle_response(&self, probe_name: &Name, data: ResponseData) -> Vec<HelloAction> {
        debug!(name = %data.name, "received response");
        if data.is_signed() {
            if let Some(key) = &data.key_locator {
                debug!(key = %key, "response signed with");
            }
        }
        vec![HelloAction::Validate {
            probe: probe_name.clone(),
            data,
        }]
    }

    // ── Validation verdicts ─────────────────────────────────────────────

    /// The validator accepted a response: the neighbor is reachable.
    pub fn handle_validated(&mut self, data: &ResponseData) -> Vec<HelloAction> {
        debug!(name = %data.name, "response validated");
        let mut actions = Vec::new();

        if let Some(neighbor) = correlator::decode_response(&data.name) {
            let old = self.adjacencies.status_of(&neighbor);
            self.adjacencies
                .set_status(&neighbor, NeighborStatus::Active);
            self.adjacencies.reset_timeout_count(&neighbor);
            let new = self.adjacencies.status_of(&neighbor);
            debug!(%neighbor, ?old, ?new, "neighbor reachable");

            if let (Some(old), Some(new)) = (old, new) {
                if old != new {
                    actions.push(HelloAction::Emit(HelloEvent::NeighborStatusChanged {
                        neighbor,
                        old,
                        new,
                    }));
                    match self.config.routing_mode {
                        RoutingMode::Hyperbolic => actions.push(HelloAction::Emit(
                            HelloEvent::RoutingRecalculationRequested,
                        )),
                        RoutingMode::LinkState => actions
                            .push(HelloAction::Emit(HelloEvent::AdjacencyRebuildRequested)),
                    }
                }
            }
        }
        actions.push(HelloAction::Record(StatKind::ReceivedResponse));
        actions
    }

    /// The validator rejected a response. No state changes; the pending
    /// timeout, if any, still resolves this probe.
    pub fn handle_validation_failed(&self, data: &ResponseData, reason: &str) -> Vec<HelloAction> {
        warn!(name = %data.name, reason, "response validation failed");
        Vec::new()
    }

    // ── Incoming probes (responder) ─────────────────────────────────────

    /// Answer a probe sent to us by another router.
    pub fn process_incoming_probe(&mut self, probe: &ProbeRequest) -> Vec<HelloAction> {
        let mut actions = vec![HelloAction::Record(StatKind::ReceivedProbe)];
        debug!(name = %probe.name, "probe received");

        let Some(requester) = correlator::decode_probe(&probe.name) else {
            debug!(name = %probe.name, "info marker missing or malformed requester, ignoring");
            return actions;
        };
        if !self.adjacencies.is_neighbor(&requester) {
            debug!(%requester, "probe from unrecognized sender, ignoring");
            return actions;
        }

        let mut response = ResponseData::new(
            probe.name.clone().append_version(now_ms()),
            RESPONSE_FRESHNESS_MS,
            INFO_COMPONENT.as_bytes().to_vec(),
        )
        .key_locator(self.config.key_name.clone());
        response.sign(&self.secret_seed);
        debug!(name = %response.name, "sending response");
        actions.push(HelloAction::SendResponse(response));
        actions.push(HelloAction::Record(StatKind::SentResponse));

        // If the requester was down on our side, probe it back right away
        // so both ends re-synchronize without waiting for our own timer.
        if let Some(neighbor) = self.adjacencies.get(&requester) {
            if neighbor.status() == NeighborStatus::Inactive && neighbor.has_endpoint() {
                self.emit_probe(&requester, &mut actions);
            }
        }
        actions
    }
}
