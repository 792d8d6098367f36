//! Integration tests: liveness lifecycle between two routers.
//!
//! Two `HelloProtocol` instances play both ends of the exchange without a
//! transport — actions from one side are fed into the other by hand, and
//! signature verification stands in for the external validator.

use std::time::Duration;

use namelink_hello::{
    correlator, HelloAction, HelloConfig, HelloEvent, HelloProtocol, Name, Neighbor,
    NeighborStatus, ProbeRequest, ResponseData, RoutingMode, StatKind,
};

const SEED_A: [u8; 32] = [1u8; 32];
const SEED_B: [u8; 32] = [2u8; 32];

fn name(uri: &str) -> Name {
    uri.parse().unwrap()
}

fn router(seed: &[u8; 32], own: &str, peer: &str) -> HelloProtocol {
    let config = HelloConfig::new(name(own))
        .retry_limit(2)
        .routing_mode(RoutingMode::LinkState)
        .timing(Duration::from_secs(1), Duration::from_secs(60));
    let mut protocol = HelloProtocol::new(config, *seed);
    protocol.insert_neighbor(Neighbor::new(name(peer), Some(1)));
    protocol
}

fn public_key(seed: &[u8; 32]) -> [u8; 32] {
    ed25519_dalek::SigningKey::from_bytes(seed)
        .verifying_key()
        .to_bytes()
}

fn sent_probes(actions: &[HelloAction]) -> Vec<ProbeRequest> {
    actions
        .iter()
        .filter_map(|a| match a {
            HelloAction::SendProbe(p) => Some(p.clone()),
            _ => None,
        })
        .collect()
}

fn sent_responses(actions: &[HelloAction]) -> Vec<ResponseData> {
    actions
        .iter()
        .filter_map(|a| match a {
            HelloAction::SendResponse(d) => Some(d.clone()),
            _ => None,
        })
        .collect()
}

fn events(actions: &[HelloAction]) -> Vec<HelloEvent> {
    actions
        .iter()
        .filter_map(|a| match a {
            HelloAction::Emit(e) => Some(e.clone()),
            _ => None,
        })
        .collect()
}

fn recorded(actions: &[HelloAction], kind: StatKind) -> usize {
    actions
        .iter()
        .filter(|a| matches!(a, HelloAction::Record(k) if *k == kind))
        .count()
}

/// Deliver a probe to `responder`, returning its signed response after
/// verifying the signature (plus any reciprocal probes it emitted).
fn deliver_probe(
    responder: &mut HelloProtocol,
    responder_seed: &[u8; 32],
    probe: &ProbeRequest,
) -> (ResponseData, Vec<ProbeRequest>) {
    let actions = responder.process_incoming_probe(probe);
    let responses = sent_responses(&actions);
    assert_eq!(responses.len(), 1);
    let response = responses.into_iter().next().unwrap();
    assert!(response.is_signed());
    assert!(response.verify_signature(&public_key(responder_seed)).is_ok());
    (response, sent_probes(&actions))
}

/// Deliver a response to `requester` through the validate-then-handle path.
fn deliver_response(
    requester: &mut HelloProtocol,
    probe: &Name,
    response: ResponseData,
) -> Vec<HelloAction> {
    let actions = requester.handle_response(probe, response);
    assert_eq!(actions.len(), 1);
    match actions.into_iter().next().unwrap() {
        HelloAction::Validate { data, .. } => requester.handle_validated(&data),
        other => panic!("expected Validate, got {other:?}"),
    }
}

/// Full lifecycle: probe → response → both active → silence → down → recovery.
#[test]
fn two_router_liveness_lifecycle() {
    let mut a = router(&SEED_A, "/ndn/site/router-a", "/ndn/site/router-b");
    let mut b = router(&SEED_B, "/ndn/site/router-b", "/ndn/site/router-a");

    // ── Step 1: A probes B ──────────────────────────────────────────────
    let pass = a.probe_pass();
    let probes = sent_probes(&pass);
    assert_eq!(probes.len(), 1);
    let probe_ab = probes.into_iter().next().unwrap();
    assert!(probe_ab.name.starts_with(&name("/ndn/site/router-b")));
    assert_eq!(recorded(&pass, StatKind::SentProbe), 1);

    // ── Step 2: B answers and, seeing A inactive, probes back ──────────
    let (response_ba, reciprocal) = deliver_probe(&mut b, &SEED_B, &probe_ab);
    assert_eq!(reciprocal.len(), 1);
    let probe_ba = reciprocal.into_iter().next().unwrap();
    assert_eq!(
        correlator::decode_timed_out_probe(&probe_ba.name),
        Some(name("/ndn/site/router-a"))
    );

    // ── Step 3: A validates B's response, B becomes active ─────────────
    let actions = deliver_response(&mut a, &probe_ab.name, response_ba);
    assert_eq!(
        a.adjacencies().status_of(&name("/ndn/site/router-b")),
        Some(NeighborStatus::Active)
    );
    assert!(events(&actions).contains(&HelloEvent::AdjacencyRebuildRequested));

    // ── Step 4: the reciprocal exchange brings A up on B's side ────────
    let (response_ab, reciprocal) = deliver_probe(&mut a, &SEED_A, &probe_ba);
    // A already sees B active, so no further reciprocal probe.
    assert!(reciprocal.is_empty());
    let _ = deliver_response(&mut b, &probe_ba.name, response_ab);
    assert_eq!(
        b.adjacencies().status_of(&name("/ndn/site/router-a")),
        Some(NeighborStatus::Active)
    );

    // ── Step 5: B goes silent, A declares it down after the retries ────
    let first = a.handle_timeout(&probe_ab.name);
    assert_eq!(sent_probes(&first).len(), 1);
    assert!(events(&first).is_empty());

    let second = a.handle_timeout(&probe_ab.name);
    assert!(sent_probes(&second).is_empty());
    assert_eq!(
        a.adjacencies().status_of(&name("/ndn/site/router-b")),
        Some(NeighborStatus::Inactive)
    );
    assert!(events(&second).contains(&HelloEvent::AdjacencyRebuildRequested));

    // ── Step 6: B comes back, A answers, reciprocates, reactivates ─────
    let pass = b.probe_pass();
    let probe_ba = sent_probes(&pass).into_iter().next().unwrap();
    let (response_ab, reciprocal) = deliver_probe(&mut a, &SEED_A, &probe_ba);
    assert_eq!(reciprocal.len(), 1);
    let _ = response_ab;

    let probe_ab = reciprocal.into_iter().next().unwrap();
    let (response_ba, _) = deliver_probe(&mut b, &SEED_B, &probe_ab);
    let actions = deliver_response(&mut a, &probe_ab.name, response_ba);
    assert_eq!(
        a.adjacencies().status_of(&name("/ndn/site/router-b")),
        Some(NeighborStatus::Active)
    );
    assert_eq!(a.adjacencies().timeout_count_of(&name("/ndn/site/router-b")), Some(0));
    assert!(events(&actions).contains(&HelloEvent::AdjacencyRebuildRequested));
}

/// A tampered response fails signature verification, and a validation
/// failure must not disturb the failure detector.
#[test]
fn tampered_response_is_rejected_without_state_change() {
    let a = router(&SEED_A, "/ndn/site/router-a", "/ndn/site/router-b");
    let mut b = router(&SEED_B, "/ndn/site/router-b", "/ndn/site/router-a");

    let probe_ab = sent_probes(&a.probe_pass()).into_iter().next().unwrap();
    let (mut response, _) = deliver_probe(&mut b, &SEED_B, &probe_ab);

    response.content = b"forged".to_vec();
    assert!(response.verify_signature(&public_key(&SEED_B)).is_err());

    let actions = a.handle_validation_failed(&response, "signature mismatch");
    assert!(actions.is_empty());
    assert_eq!(
        a.adjacencies().status_of(&name("/ndn/site/router-b")),
        Some(NeighborStatus::Inactive)
    );
    assert_eq!(a.adjacencies().timeout_count_of(&name("/ndn/site/router-b")), Some(0));
}

/// Probes from routers outside the configured adjacency list are ignored.
#[test]
fn probe_from_stranger_gets_no_response() {
    let mut a = router(&SEED_A, "/ndn/site/router-a", "/ndn/site/router-b");

    let probe = ProbeRequest::new(
        correlator::probe_name(&name("/ndn/site/router-a"), &name("/ndn/mallory")),
        Duration::from_secs(1),
    );
    let actions = a.process_incoming_probe(&probe);
    assert!(sent_responses(&actions).is_empty());
    assert_eq!(recorded(&actions, StatKind::ReceivedProbe), 1);
}
