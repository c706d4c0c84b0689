//! Identificador de contenido.
//!
//! Clave determinista derivada de los bytes almacenados: bytes idénticos
//! producen siempre el mismo identificador, lo que hace idempotente re-subir
//! el mismo archivo. La red puede confirmar el mismo identificador calculado
//! localmente (id provisional) o asignar el definitivo al listar.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::AGGREGATOR_BLOB_PATH;
use crate::hashing::hash_bytes;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentId(String);

impl ContentId {
    /// Deriva el identificador de los bytes (blake3 hex).
    pub fn derive(bytes: &[u8]) -> Self {
        Self(hash_bytes(bytes))
    }

    /// Construye desde un identificador ya asignado por la red.
    pub fn from_raw(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// URL pública de recuperación: `<base>/v1/<content_id>`. Contrato estable.
pub fn aggregator_url(base: &str, id: &ContentId) -> String {
    format!("{}/{}/{}", base.trim_end_matches('/'), AGGREGATOR_BLOB_PATH, id)
}
