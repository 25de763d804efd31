//! Content-derived identifiers for graph entities.
//!
//! [`NodeSignature`] is the blake3 digest of a node's canonical string and is
//! the identity used to unify nodes across pathways. [`EdgeKey`] identifies an
//! edge by its endpoints and data so exact duplicates can be suppressed while
//! parallel edges with different data are kept.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::edge::EdgeData;
use crate::error::CoreError;

/// Stable node identifier: blake3 of the canonical string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeSignature(pub [u8; 32]);

/// Identity of an edge: blake3 over both endpoint signatures and the
/// canonical JSON of the edge data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey(pub [u8; 32]);

impl NodeSignature {
    /// Computes the signature of a canonical node string.
    pub fn of(canonical: &str) -> Self {
        NodeSignature(*blake3::hash(canonical.as_bytes()).as_bytes())
    }

    /// Lowercase hex rendering (64 characters).
    pub fn to_hex(&self) -> String {
        blake3::Hash::from(self.0).to_hex().to_string()
    }
}

impl fmt::Display for NodeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for NodeSignature {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hash = blake3::Hash::from_hex(s.trim()).map_err(|_| CoreError::InvalidSignature {
            value: s.to_string(),
        })?;
        Ok(NodeSignature(*hash.as_bytes()))
    }
}

impl Serialize for NodeSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for NodeSignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl EdgeKey {
    /// Computes the identity of an edge from its endpoints and payload.
    pub fn of(subject: &NodeSignature, object: &NodeSignature, data: &EdgeData) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&subject.0);
        hasher.update(&object.0);
        hasher.update(&data.canonical_bytes());
        EdgeKey(*hasher.finalize().as_bytes())
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&blake3::Hash::from(self.0).to_hex())
    }
}
