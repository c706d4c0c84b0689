//! Hashing determinista del pipeline.
//!
//! Los identificadores de contenido se derivan de los bytes con blake3; los
//! payloads JSON se canonicalizan antes de hashear para que el mismo valor
//! produzca siempre el mismo hex.

pub mod canonical_json;
pub mod hash;

pub use canonical_json::to_canonical_json;
pub use hash::{hash_bytes, hash_str};

use serde_json::Value;

/// Hashea un `Value` sobre su forma canónica.
pub fn hash_value(value: &Value) -> String {
    hash_str(&to_canonical_json(value))
}
