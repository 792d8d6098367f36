//! Hierarchical names for the receiver-pull network.
//!
//! A `Name` is an ordered list of opaque byte components. Probes and
//! responses are addressed by name; a router identity is itself a name and
//! may travel nested inside another name as a single wire-encoded component.
//!
//! Wire format: MessagePack (compact binary).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::HelloProtocolError;

/// An ordered sequence of opaque byte components, e.g. `/ndn/site/router-a`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Name {
    components: Vec<Vec<u8>>,
}

impl Name {
    /// The empty name (`/`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether this is the empty name.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Append one component. Consuming, so calls chain like the URI reads:
    /// `neighbor.append("namelink").append("INFO")`.
    pub fn append(mut self, component: impl AsRef<[u8]>) -> Self {
        self.components.push(component.as_ref().to_vec());
        self
    }

    /// Append a freshly minted version component (`v=<unix-ms>`).
    ///
    /// Version components are never parsed on receive; they are only
    /// stripped by count when a response name is decoded.
    pub fn append_version(self, unix_ms: u64) -> Self {
        self.append(format!("v={unix_ms}"))
    }

    /// Component at `index`. Negative indices count from the end, so
    /// `get(-1)` is the last component and `get(-2)` the one before it.
    pub fn get(&self, index: isize) -> Option<&[u8]> {
        let n = self.components.len() as isize;
        let i = if index < 0 { n + index } else { index };
        if i < 0 || i >= n {
            return None;
        }
        Some(&self.components[i as usize])
    }

    /// Prefix of this name. A non-negative `count` keeps the first `count`
    /// components; a negative `count` strips the last `-count` components.
    /// Out-of-range counts saturate to the empty name.
    pub fn prefix(&self, count: isize) -> Name {
        let n = self.components.len() as isize;
        let keep = if count < 0 { n + count } else { count.min(n) };
        let keep = keep.max(0) as usize;
        Name {
            components: self.components[..keep].to_vec(),
        }
    }

    /// Whether `other` is a prefix of this name.
    pub fn starts_with(&self, other: &Name) -> bool {
        other.components.len() <= self.components.len()
            && self.components[..other.components.len()] == other.components[..]
    }

    /// Serialize to MessagePack bytes, for nesting a name inside a single
    /// component of another name.
    pub fn to_wire(&self) -> Result<Vec<u8>, HelloProtocolError> {
        rmp_serde::to_vec(self).map_err(Into::into)
    }

    /// Deserialize from MessagePack bytes.
    pub fn from_wire(data: &[u8]) -> Result<Self, HelloProtocolError> {
        rmp_serde::from_slice(data).map_err(Into::into)
    }
}

impl FromStr for Name {
    type Err = HelloProtocolError;

    /// Parse a URI-style name: `/component/component/...`.
    ///
    /// `%XX` escapes decode to raw bytes. Empty segments are skipped, so
    /// `"/"` and `""` both parse to the empty name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut components = Vec::new();
        for segment in s.split('/') {
            if segment.is_empty() {
                continue;
            }
            components.push(unescape(segment)?);
        }
        Ok(Name { components })
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.components.is_empty() {
            return write!(f, "/");
        }
        for component in &self.components {
            write!(f, "/")?;
            for &byte in component {
                if is_unescaped(byte) {
                    write!(f, "{}", byte as char)?;
                } else {
                    write!(f, "%{byte:02X}")?;
                }
            }
        }
        Ok(())
    }
}

/// Bytes that print as-is in the URI form.
fn is_unescaped(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~' | b'=')
}

fn unescape(segment: &str) -> Result<Vec<u8>, HelloProtocolError> {
    let mut bytes = Vec::with_capacity(segment.len());
    let mut chars = segment.bytes();
    while let Some(b) = chars.next() {
        if b != b'%' {
            bytes.push(b);
            continue;
        }
        let hi = chars.next();
        let lo = chars.next();
        match (hi, lo) {
            (Some(hi), Some(lo)) => {
                let hex = [hi, lo];
                let hex = std::str::from_utf8(&hex).ok().and_then(|h| u8::from_str_radix(h, 16).ok());
                match hex {
                    Some(value) => bytes.push(value),
                    None => {
                        return Err(HelloProtocolError::InvalidName {
                            reason: format!("bad percent escape in component: {segment}"),
                        })
                    }
                }
            }
            _ => {
                return Err(HelloProtocolError::InvalidName {
                    reason: format!("truncated percent escape in component: {segment}"),
                })
            }
        }
    }
    Ok(bytes)
}
