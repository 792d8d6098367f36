//! Wire-level messages: outgoing probes and signed responses.
//!
//! Serialized as MessagePack. A `ResponseData` is signed over canonical
//! signing bytes with Ed25519, mirroring how the daemon signs everything
//! else it publishes.

use std::time::Duration;

use ed25519_dalek::Signer;
use serde::{Deserialize, Serialize};

use crate::error::HelloProtocolError;
use crate::name::Name;

/// An outgoing named request probing a neighbor for liveness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeRequest {
    /// Full probe name: `/<neighbor>/namelink/INFO/<requester-wire>`.
    pub name: Name,
    /// How long the transport waits before reporting a timeout.
    pub lifetime: Duration,
    /// Cached copies older than their freshness window must not answer.
    pub must_be_fresh: bool,
    /// A response whose name extends the probe name satisfies it.
    pub can_be_prefix: bool,
}

impl ProbeRequest {
    /// Probe semantics are fixed: must-be-fresh, prefix match allowed.
    pub fn new(name: Name, lifetime: Duration) -> Self {
        Self {
            name,
            lifetime,
            must_be_fresh: true,
            can_be_prefix: true,
        }
    }

    /// Serialize to MessagePack bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, HelloProtocolError> {
        rmp_serde::to_vec(self).map_err(Into::into)
    }

    /// Deserialize from MessagePack bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self, HelloProtocolError> {
        rmp_serde::from_slice(data).map_err(Into::into)
    }
}

/// A signed response to a probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseData {
    /// Response name: the probe name plus a freshly minted version suffix.
    pub name: Name,
    /// Freshness window in milliseconds.
    pub freshness_ms: u64,
    /// Payload bytes. For hello responses, the literal info marker.
    pub content: Vec<u8>,
    /// Name of the key the producer signed with, if it says so.
    pub key_locator: Option<Name>,
    /// Ed25519 signature over `signing_bytes()`. Empty if unsigned.
    pub signature: Vec<u8>,
}

impl ResponseData {
    /// Create a new unsigned response.
    pub fn new(name: Name, freshness_ms: u64, content: Vec<u8>) -> Self {
        Self {
            name,
            freshness_ms,
            content,
            key_locator: None,
            signature: Vec::new(),
        }
    }

    /// Set the key locator.
    pub fn key_locator(mut self, key_name: Name) -> Self {
        self.key_locator = Some(key_name);
        self
    }

    /// Serialize to MessagePack bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, HelloProtocolError> {
        rmp_serde::to_vec(self).map_err(Into::into)
    }

    /// Deserialize from MessagePack bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self, HelloProtocolError> {
        rmp_serde::from_slice(data).map_err(Into::into)
    }

    /// Canonical bytes to sign/verify: every field except `signature`.
    pub fn signing_bytes(&self) -> Vec<u8> {
        let signable = SignableResponse {
            name: &self.name,
            freshness_ms: self.freshness_ms,
            content: &self.content,
            key_locator: &self.key_locator,
        };
        rmp_serde::to_vec(&signable).expect("signing_bytes serialization cannot fail")
    }

    /// Whether a (non-empty) signature is present.
    pub fn is_signed(&self) -> bool {
        !self.signature.is_empty()
    }

    /// Sign with an Ed25519 secret key (32-byte seed).
    pub fn sign(&mut self, secret_seed: &[u8; 32]) {
        let signing_key = ed25519_dalek::SigningKey::from_bytes(secret_seed);
        let sig = signing_key.sign(&self.signing_bytes());
        self.signature = sig.to_bytes().to_vec();
    }

    /// Verify the signature against a known Ed25519 public key.
    ///
    /// Strict verification: rejects non-canonical signatures.
    pub fn verify_signature(&self, public_key: &[u8; 32]) -> Result<(), HelloProtocolError> {
        if self.signature.len() != 64 {
            return Err(HelloProtocolError::InvalidSignature);
        }
        let verifying_key = ed25519_dalek::VerifyingKey::from_bytes(public_key)
            .map_err(|_| HelloProtocolError::InvalidSignature)?;
        let sig_bytes: [u8; 64] = self.signature[..64]
            .try_into()
            .map_err(|_| HelloProtocolError::InvalidSignature)?;
        let signature = ed25519_dalek::Signature::from_bytes(&sig_bytes);
        verifying_key
            .verify_strict(&self.signing_bytes(), &signature)
            .map_err(|_| HelloProtocolError::InvalidSignature)
    }
}

/// Borrow-only view for deterministic signing bytes.
#[derive(Serialize)]
struct SignableResponse<'a> {
    name: &'a Name,
    freshness_ms: u64,
    content: &'a [u8],
    key_locator: &'a Option<Name>,
}
