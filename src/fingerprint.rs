//! # Spec fingerprints
//!
//! A [Fingerprint] is a short digest of the spec slice that produced a synthesized object. It is
//! stored in the `agent.datadoghq.com/agentspechash` annotation so a reconciler can tell whether a
//! live object is stale by comparing two strings instead of two object trees.
//!
//! The value is serialized to JSON, every object has its keys sorted, and the canonical bytes are
//! hashed with SHA-256. Arrays keep their order: env vars, volumes and mounts are order sensitive.

use crate::k8s::annotations::{get_spec_hash_value, Annotations};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::Serialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::fmt::{Display, Formatter};

/// Number of hex characters kept from the digest.
pub const FINGERPRINT_LEN: usize = 32;

#[derive(thiserror::Error, Debug)]
pub enum FingerprintError {
    #[error("serializing spec for fingerprinting: `{0}`")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Computes the fingerprint of any serializable value.
    pub fn of<T: Serialize>(value: &T) -> Result<Self, FingerprintError> {
        let bytes = canonical_json_bytes(value)?;
        let digest = format!("{:x}", Sha256::digest(&bytes));
        Ok(Self(digest[..FINGERPRINT_LEN].to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn annotations(&self) -> Annotations {
        Annotations::new_spec_hash_annotation(&self.0)
    }

    /// Returns true when `meta` already carries this fingerprint.
    pub fn is_current(&self, meta: &ObjectMeta) -> bool {
        meta.annotations
            .as_ref()
            .and_then(get_spec_hash_value)
            .is_some_and(|live| live == &self.0)
    }
}

impl Display for Fingerprint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns true when the live object must be updated to match the desired fingerprint. Objects
/// without the annotation are always considered stale.
pub fn needs_update(live: &ObjectMeta, desired: &Fingerprint) -> bool {
    !desired.is_current(live)
}

pub fn canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let raw = serde_json::to_value(value)?;
    serde_json::to_vec(&canonicalize(raw))
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map
                .into_iter()
                .map(|(k, v)| (k, canonicalize(v)))
                .collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(entries.into_iter().collect::<Map<String, Value>>())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}
