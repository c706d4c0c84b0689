//! Archivo crudo y payload codificado.
//!
//! `RawFile` pertenece a la sesión sólo hasta que la codificación termina;
//! `EncodedBlob` vive en la caché de payloads desde la codificación hasta que
//! la subida queda aceptada por quorum (o la sesión falla de forma terminal).

use std::collections::BTreeMap;

use super::ContentId;

/// Archivo tal como lo entrega el caller.
#[derive(Debug, Clone)]
pub struct RawFile {
    pub name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl RawFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { name: name.into(), content_type: None, bytes }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Payload codificado listo para viajar a los nodos de almacenamiento.
///
/// El `provisional_id` se calcula localmente antes de tocar la red; los tags
/// acompañan al blob pero no entran en el identificador.
#[derive(Debug, Clone)]
pub struct EncodedBlob {
    pub provisional_id: ContentId,
    pub bytes: Vec<u8>,
    pub encoded_len: u64,
    pub file_name: String,
    pub tags: BTreeMap<String, String>,
}
