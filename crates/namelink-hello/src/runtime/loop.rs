//! The hello event loop and its action executor — the only I/O site.
//!
//! Everything runs serialized on one task: probe-pass ticks, probe
//! outcomes, incoming probes, and validation verdicts. The probing pass is
//! a self-rescheduling one-shot timer, re-armed after each pass rather
//! than a free-running interval.

use tokio::sync::mpsc;
use tokio::time::{self, Instant};

use crate::hello::{HelloAction, HelloEvent, HelloProtocol};

use super::transport::{Telemetry, Transport, Validator};
use super::{HelloCommand, NeighborSnapshot, ProbeOutcome};

/// Main event loop — owns all protocol state.
pub(super) async fn hello_loop<T, V, M>(
    mut protocol: HelloProtocol,
    transport: T,
    validator: V,
    telemetry: M,
    mut cmd_rx: mpsc::Receiver<HelloCommand>,
    mut outcome_rx: mpsc::Receiver<ProbeOutcome>,
    event_tx: mpsc::Sender<HelloEvent>,
) where
    T: Transport,
    V: Validator,
    M: Telemetry,
{
    let probe_interval = protocol.config().probe_interval;

    // One-shot pass timer, re-armed after every pass. Tearing down the
    // loop drops it, so no stale tick can outlive the protocol state.
    let next_pass = time::sleep(probe_interval);
    tokio::pin!(next_pass);

    loop {
        tokio::select! {
            // ── 1. Scheduled probing pass ───────────────────────
            () = next_pass.as_mut() => {
                let actions = protocol.probe_pass();
                execute_actions(
                    &mut protocol, actions,
                    &transport, &validator, &telemetry, &event_tx,
                ).await;
                next_pass.as_mut().reset(Instant::now() + probe_interval);
            }

            // ── 2. Probe outcomes from the transport ────────────
            Some(outcome) = outcome_rx.recv() => {
                let actions = match outcome {
                    ProbeOutcome::Response { probe, data } => {
                        protocol.handle_response(&probe, data)
                    }
                    ProbeOutcome::Timeout { probe } => {
                        protocol.handle_timeout(&probe)
                    }
                    ProbeOutcome::Nack { probe, reason } => {
                        protocol.handle_nack(&probe, &reason)
                    }
                };
                execute_actions(
                    &mut protocol, actions,
                    &transport, &validator, &telemetry, &event_tx,
                ).await;
            }

            // ── 3. Commands from the daemon ─────────────────────
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(HelloCommand::StartProbing) => {
                        let actions = protocol.probe_pass();
                        execute_actions(
                            &mut protocol, actions,
                            &transport, &validator, &telemetry, &event_tx,
                        ).await;
                        next_pass.as_mut().reset(Instant::now() + probe_interval);
                    }
                    Some(HelloCommand::IncomingProbe { probe }) => {
                        let actions = protocol.process_incoming_probe(&probe);
                        execute_actions(
                            &mut protocol, actions,
                            &transport, &validator, &telemetry, &event_tx,
                        ).await;
                    }
                    Some(HelloCommand::GetNeighbors { reply }) => {
                        let _ = reply.send(snapshot(&protocol));
                    }
                    // Shutdown, or every handle dropped.
                    Some(HelloCommand::Shutdown) | None => break,
                }
            }
        }
    }
}

/// Execute a list of actions using the given collaborators.
///
/// `Validate` suspends on the external validator and feeds the verdict
/// straight back into the protocol, executing the follow-up actions before
/// moving on.
async fn execute_actions<T, V, M>(
    protocol: &mut HelloProtocol,
    actions: Vec<HelloAction>,
    transport: &T,
    validator: &V,
    telemetry: &M,
    event_tx: &mpsc::Sender<HelloEvent>,
) where
    T: Transport,
    V: Validator,
    M: Telemetry,
{
    for action in actions {
        match action {
            HelloAction::SendProbe(probe) => {
                if let Err(e) = transport.send_probe(probe).await {
                    tracing::debug!("probe send failed: {e}");
                }
            }
            HelloAction::SendResponse(data) => {
                if let Err(e) = transport.send_response(data).await {
                    tracing::debug!("response send failed: {e}");
                }
            }
            HelloAction::Validate { probe, data } => {
                tracing::trace!(probe = %probe, "validating response");
                let follow_up = match validator.validate(&data).await {
                    Ok(()) => protocol.handle_validated(&data),
                    Err(reason) => protocol.handle_validation_failed(&data, &reason),
                };
                Box::pin(execute_actions(
                    protocol, follow_up, transport, validator, telemetry, event_tx,
                ))
                .await;
            }
            HelloAction::Record(kind) => telemetry.increment(kind),
            HelloAction::Emit(event) => {
                // Awaited so a lagging consumer backpressures the loop
                // instead of losing notifications. Err only means the
                // daemon dropped its receiver.
                let _ = event_tx.send(event).await;
            }
        }
    }
}

fn snapshot(protocol: &HelloProtocol) -> Vec<NeighborSnapshot> {
    protocol
        .adjacencies()
        .iter()
        .map(|n| NeighborSnapshot {
            name: n.name.clone(),
            endpoint: n.endpoint,
            status: n.status(),
            timeout_count: n.timeout_count(),
        })
        .collect()
}
