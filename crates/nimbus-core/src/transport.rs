//! Adaptador de red hacia los nodos de almacenamiento.
//!
//! Mecanismo puro: cada llamada va keyed por un digest ya confirmado y
//! devuelve respuestas de nodos o un error de transporte. La política de
//! reintento/backoff vive en el orquestador, no aquí.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::capability::TxDigest;
use crate::errors::UploadError;
use crate::model::{ContentId, EncodedBlob};

/// Aceptación de un nodo individual. El quorum se evalúa contando acks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeAck {
    pub node_id: String,
}

/// Entrada devuelta por el listado de una sesión certificada.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEntry {
    pub content_id: ContentId,
    pub encoded_len: u64,
    pub certified: bool,
}

#[async_trait]
pub trait StorageTransport: Send + Sync {
    /// Empuja el payload a los nodos, keyed por el digest de registro
    /// confirmado. Idempotente: los nodos deduplican por identificador de
    /// contenido.
    async fn upload_payload(&self, blob: &EncodedBlob, register_digest: &TxDigest)
                            -> Result<Vec<NodeAck>, UploadError>;

    /// Entrega el certificado a los nodos una vez confirmada la transacción
    /// de certificación.
    async fn certify_payload(&self, content_id: &ContentId, certify_digest: &TxDigest)
                             -> Result<(), UploadError>;

    /// Resuelve las entradas almacenadas para la clave de sesión (el digest
    /// de registro que los nodos aprendieron al subir).
    async fn list_stored_files(&self, session_key: &TxDigest) -> Result<Vec<StoredEntry>, UploadError>;
}

#[async_trait]
impl<T> StorageTransport for Arc<T> where T: StorageTransport + ?Sized
{
    async fn upload_payload(&self, blob: &EncodedBlob, register_digest: &TxDigest)
                            -> Result<Vec<NodeAck>, UploadError> {
        (**self).upload_payload(blob, register_digest).await
    }

    async fn certify_payload(&self, content_id: &ContentId, certify_digest: &TxDigest)
                             -> Result<(), UploadError> {
        (**self).certify_payload(content_id, certify_digest).await
    }

    async fn list_stored_files(&self, session_key: &TxDigest) -> Result<Vec<StoredEntry>, UploadError> {
        (**self).list_stored_files(session_key).await
    }
}
