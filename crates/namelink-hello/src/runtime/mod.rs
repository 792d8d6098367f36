//! Protocol runtime — runs the hello state machine on a live event loop.
//!
//! A single spawned task owns the `HelloProtocol` and multiplexes over
//! probe outcomes from the transport, commands from the daemon, and the
//! probing-pass timer. The daemon talks to it through channels only; no
//! shared mutable state, no locks.

mod r#loop;
pub mod transport;

use tokio::sync::{mpsc, oneshot};

use crate::adjacency::EndpointId;
use crate::error::HelloProtocolError;
use crate::hello::{HelloEvent, HelloProtocol};
use crate::name::Name;
use crate::types::NeighborStatus;
use crate::wire::{ProbeRequest, ResponseData};

pub use transport::{Telemetry, Transport, Validator};

// ── Probe outcomes (transport → runtime) ────────────────────────────────

/// Terminal resolution of an outstanding probe.
///
/// The transport delivers exactly one of these per probe, whichever fires
/// first.
#[derive(Debug)]
pub enum ProbeOutcome {
    /// A response arrived.
    Response { probe: Name, data: ResponseData },
    /// The probe lifetime elapsed without an answer.
    Timeout { probe: Name },
    /// The network explicitly rejected the probe.
    Nack { probe: Name, reason: String },
}

// ── Commands (daemon → runtime) ─────────────────────────────────────────

/// Commands the daemon sends to the runtime event loop.
pub enum HelloCommand {
    /// Kick off periodic probing: run a pass now, then every interval.
    StartProbing,
    /// An incoming probe addressed to this router.
    IncomingProbe { probe: ProbeRequest },
    /// Query: diagnostic snapshot of the neighbor table.
    GetNeighbors {
        reply: oneshot::Sender<Vec<NeighborSnapshot>>,
    },
    /// Graceful shutdown.
    Shutdown,
}

/// Diagnostic view of one neighbor.
#[derive(Debug, Clone)]
pub struct NeighborSnapshot {
    pub name: Name,
    pub endpoint: Option<EndpointId>,
    pub status: NeighborStatus,
    pub timeout_count: u32,
}

// ── HelloHandle (daemon-facing API) ─────────────────────────────────────

/// Handle to a running hello runtime. Cheap to clone.
#[derive(Clone)]
pub struct HelloHandle {
    cmd_tx: mpsc::Sender<HelloCommand>,
}

impl HelloHandle {
    /// Kick off periodic probing.
    pub async fn start_probing(&self) -> Result<(), HelloProtocolError> {
        self.cmd_tx
            .send(HelloCommand::StartProbing)
            .await
            .map_err(|_| HelloProtocolError::RuntimeShutDown)
    }

    /// Deliver an incoming probe for this router.
    pub async fn incoming_probe(&self, probe: ProbeRequest) -> Result<(), HelloProtocolError> {
        self.cmd_tx
            .send(HelloCommand::IncomingProbe { probe })
            .await
            .map_err(|_| HelloProtocolError::RuntimeShutDown)
    }

    /// Snapshot of every neighbor's liveness state.
    pub async fn neighbors(&self) -> Vec<NeighborSnapshot> {
        let (tx, rx) = oneshot::channel();
        let _ = self
            .cmd_tx
            .send(HelloCommand::GetNeighbors { reply: tx })
            .await;
        rx.await.unwrap_or_default()
    }

    /// Graceful shutdown.
    pub async fn shutdown(&self) {
        let _ = self.cmd_tx.send(HelloCommand::Shutdown).await;
    }
}

// ── HelloChannels / spawn ───────────────────────────────────────────────

/// Channels returned to the daemon when the runtime starts.
pub struct HelloChannels {
    /// Handle to send commands to the runtime.
    pub handle: HelloHandle,
    /// Receive liveness notifications (rebuild/recalculation requests,
    /// status changes).
    pub events: mpsc::Receiver<HelloEvent>,
}

/// The hello runtime — spawn it and communicate via channels.
pub struct HelloRuntime;

impl HelloRuntime {
    /// Start the runtime, taking ownership of the protocol state.
    ///
    /// `outcome_rx` is the channel on which the transport resolves
    /// outstanding probes. Spawns the event loop as a tokio task.
    pub fn spawn<T, V, M>(
        protocol: HelloProtocol,
        transport: T,
        validator: V,
        telemetry: M,
        outcome_rx: mpsc::Receiver<ProbeOutcome>,
    ) -> HelloChannels
    where
        T: Transport + Sync + 'static,
        V: Validator + Sync + 'static,
        M: Telemetry + Sync + 'static,
    {
        let (cmd_tx, cmd_rx) = mpsc::channel::<HelloCommand>(64);
        let (event_tx, event_rx) = mpsc::channel::<HelloEvent>(64);

        tokio::spawn(r#loop::hello_loop(
            protocol, transport, validator, telemetry, cmd_rx, outcome_rx, event_tx,
        ));

        HelloChannels {
            handle: HelloHandle { cmd_tx },
            events: event_rx,
        }
    }
}
