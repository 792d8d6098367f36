//! Probe name encoding and decoding.
//!
//! Probe name layout: `/<neighbor>/namelink/INFO/<requester-wire>` where the
//! last component is the requester's own identity, wire-encoded as a nested
//! name. A response extends the probe name with one version component:
//! `/<neighbor>/namelink/INFO/<requester-wire>/<version>`.
//!
//! Decoders return `Option`: a name that does not carry the expected marker
//! in the expected slot is simply not a message of this protocol. No error
//! propagates; callers ignore the message.

use crate::name::Name;
use crate::types::{INFO_COMPONENT, SERVICE_COMPONENT};

/// Build the probe name addressed to `neighbor`, carrying our own identity.
pub fn probe_name(neighbor: &Name, own_router: &Name) -> Name {
    neighbor
        .clone()
        .append(SERVICE_COMPONENT)
        .append(INFO_COMPONENT)
        .append(
            own_router
                .to_wire()
                .expect("name wire serialization cannot fail"),
        )
}

/// Extract the requester identity from an incoming probe name.
///
/// Checks the info marker at offset -2, then decodes the nested identity
/// from the last component.
pub fn decode_probe(name: &Name) -> Option<Name> {
    if name.get(-2)? != INFO_COMPONENT.as_bytes() {
        return None;
    }
    Name::from_wire(name.get(-1)?).ok()
}

/// Recover the probed neighbor from a timed-out probe name.
///
/// Checks the info marker at offset -2, then strips the last three
/// components (service, marker, requester identity).
pub fn decode_timed_out_probe(name: &Name) -> Option<Name> {
    if name.get(-2)? != INFO_COMPONENT.as_bytes() {
        return None;
    }
    Some(name.prefix(-3))
}

/// Recover the responding neighbor from a validated response name.
///
/// Checks the info marker at offset -3, then strips the last four
/// components (service, marker, requester identity, version).
pub fn decode_response(name: &Name) -> Option<Name> {
    if name.get(-3)? != INFO_COMPONENT.as_bytes() {
        return None;
    }
    Some(name.prefix(-4))
}
