//! Tipos de evento de sesión y estructura `SessionEvent`.
//!
//! Rol en el pipeline:
//! - Cada sesión de subida emite eventos a un log append-only; el snapshot
//!   observable se reconstruye por replay, sin estructuras mutables.
//! - Los eventos son el contrato observable del orquestador: cada transición
//!   del estado de sesión corresponde a exactamente un tipo de evento.
//! - Los errores viajan dentro del evento (serializables), nunca se tragan.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::capability::TxDigest;
use crate::errors::UploadError;
use crate::model::ContentId;

/// Etapa del pipeline a la que se atribuye un error o interrupción.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UploadStage {
    Encode,
    Register,
    ConfirmRegister,
    Upload,
    Certify,
    ConfirmCertify,
    List,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SessionEventKind {
    /// Primer evento de toda sesión: fija nombre y tamaño del archivo.
    SessionCreated { file_name: String, raw_len: u64 },
    EncodeStarted,
    /// La codificación terminó; el payload queda en la caché de la sesión.
    EncodeCompleted { provisional_id: ContentId, encoded_len: u64 },
    /// El firmante aceptó la transacción de registro. Un digest por sesión:
    /// no hay re-envío salvo rollback explícito por rechazo.
    RegisterSubmitted { digest: TxDigest },
    RegisterConfirmed,
    /// Rechazo on-chain del registro: el digest se descarta y la sesión
    /// vuelve a `Encoded`.
    RegisterRejected { reason: String },
    UploadStarted,
    /// Los nodos aceptaron el payload con quorum; los bytes codificados se
    /// liberan a partir de aquí.
    UploadAccepted { acks: usize },
    CertifySubmitted { digest: TxDigest },
    CertifyConfirmed,
    /// Rechazo on-chain de la certificación: vuelve a `Uploaded`.
    CertifyRejected { reason: String },
    ListStarted,
    /// Identificador definitivo asignado por la red. Cierre exitoso.
    Listed { content_id: ContentId },
    /// Interrupción recuperable: la sesión queda estacionada en el estado de
    /// reanudación de la etapa, con el error registrado.
    StageInterrupted { stage: UploadStage, error: UploadError },
    /// Fallo terminal: la sesión pasa a `Failed` y no se reutiliza.
    StageFailed { stage: UploadStage, error: UploadError },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEvent {
    pub seq: u64, // asignado por el log (orden de append por sesión)
    pub session_id: Uuid,
    pub kind: SessionEventKind,
    pub ts: DateTime<Utc>, // metadato, no participa de ningún hash
}
