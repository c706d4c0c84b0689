//! Codificación local del archivo antes de tocar la red.
//!
//! Reglas clave:
//! - Puro y local: sin red ni firma, siempre reintentable sin efectos.
//! - El identificador provisional se deriva de los bytes crudos; la
//!   codificación de borrado real es una capacidad opaca de la red y no se
//!   reproduce aquí.
//! - Los tags (content-type) acompañan al blob pero no entran al hash.

use std::collections::BTreeMap;

use crate::errors::UploadError;
use crate::model::{ContentId, EncodedBlob, RawFile};

pub trait ContentEncoder: Send + Sync {
    /// Valida y empaqueta el archivo; falla con `Encoding` ante entrada
    /// vacía.
    fn encode(&self, raw: &RawFile) -> Result<EncodedBlob, UploadError>;
}

/// Codificador por defecto: identidad sobre los bytes más identificador
/// blake3 y marco de metadatos.
#[derive(Debug, Clone, Default)]
pub struct Blake3ContentEncoder;

impl ContentEncoder for Blake3ContentEncoder {
    fn encode(&self, raw: &RawFile) -> Result<EncodedBlob, UploadError> {
        if raw.bytes.is_empty() {
            return Err(UploadError::Encoding(format!("empty file: {}", raw.name)));
        }

        let mut tags = BTreeMap::new();
        tags.insert("content-type".to_string(),
                    raw.content_type.clone().unwrap_or_else(|| "application/octet-stream".to_string()));

        Ok(EncodedBlob { provisional_id: ContentId::derive(&raw.bytes),
                         encoded_len: raw.bytes.len() as u64,
                         bytes: raw.bytes.clone(),
                         file_name: raw.name.clone(),
                         tags })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_fails_encoding() {
        let err = Blake3ContentEncoder.encode(&RawFile::new("empty.txt", vec![])).unwrap_err();
        assert!(matches!(err, UploadError::Encoding(_)));
    }

    #[test]
    fn same_bytes_same_provisional_id() {
        let a = Blake3ContentEncoder.encode(&RawFile::new("a.txt", b"hello walrus".to_vec())).unwrap();
        let b = Blake3ContentEncoder.encode(&RawFile::new("b.txt", b"hello walrus".to_vec())).unwrap();
        // el nombre del archivo no participa del identificador
        assert_eq!(a.provisional_id, b.provisional_id);
        assert_eq!(a.encoded_len, 12);
    }

    #[test]
    fn content_type_lands_in_tags() {
        let blob = Blake3ContentEncoder.encode(&RawFile::new("a.ogg", b"audio".to_vec()).with_content_type("audio/ogg"))
                                       .unwrap();
        assert_eq!(blob.tags.get("content-type").map(String::as_str), Some("audio/ogg"));
    }
}
