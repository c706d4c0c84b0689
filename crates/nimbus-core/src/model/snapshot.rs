//! Snapshots observables de sesión y tarea.
//!
//! La capa de presentación sondea estos snapshots; se reconstruyen por
//! replay del log de eventos y nunca se mutan in situ.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::capability::TxDigest;
use crate::errors::{TaskError, UploadError};

use super::ContentId;

/// Estados de una sesión de subida.
///
/// Transiciones válidas (terminales marcadas *):
/// `Init → Encoding → Encoded → RegisterPending → Registered → Uploading →
/// Uploaded → CertifyPending → Certified → Listing → Listed(*) | Failed(*)`.
/// Un rechazo de confirmación retrocede a `Encoded`/`Uploaded` descartando el
/// digest obsoleto; una interrupción recuperable estaciona la sesión en el
/// estado de reanudación de su etapa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UploadState {
    Init,
    Encoding,
    Encoded,
    RegisterPending,
    Registered,
    Uploading,
    Uploaded,
    CertifyPending,
    Certified,
    Listing,
    Listed,
    Failed,
}

impl UploadState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, UploadState::Listed | UploadState::Failed)
    }
}

/// Vista inmutable de una sesión de subida.
///
/// Invariantes que el replay garantiza:
/// - `content_id` es `Some` si y sólo si `state == Listed`.
/// - `certify_tx_digest` sólo aparece con `register_tx_digest` ya confirmado.
/// - `last_error` se limpia en cada transición de etapa exitosa.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadSnapshot {
    pub session_id: Uuid,
    pub state: UploadState,
    pub file_name: String,
    /// Identificador calculado localmente al codificar; aún no es el
    /// identificador confirmado por la red.
    pub provisional_id: Option<ContentId>,
    pub encoded_len: Option<u64>,
    pub register_tx_digest: Option<TxDigest>,
    pub certify_tx_digest: Option<TxDigest>,
    pub node_acks: Option<usize>,
    /// Identificador definitivo asignado por la red. Sólo desde `Listed`.
    pub content_id: Option<ContentId>,
    pub last_error: Option<UploadError>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    Idle,
    Running,
    Succeeded,
    Failed,
}

/// Resultado de un workflow: artefacto direccionado por contenido más su URL
/// de recuperación.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowOutcome {
    pub result_content_id: ContentId,
    pub resolved_url: String,
}

/// Vista inmutable de una tarea de workflow (una por workflow id en vuelo).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskSnapshot {
    pub task_key: String,
    pub input_content_id: ContentId,
    pub status: TaskStatus,
    pub result: Option<WorkflowOutcome>,
    pub last_error: Option<TaskError>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl TaskSnapshot {
    /// Slot recién ocupado por un intento en ejecución.
    pub fn running(task_key: &str, input: &ContentId) -> Self {
        Self { task_key: task_key.to_string(),
               input_content_id: input.clone(),
               status: TaskStatus::Running,
               result: None,
               last_error: None,
               started_at: Some(Utc::now()),
               finished_at: None }
    }

    /// Vista para un workflow sin ejecuciones registradas.
    pub fn idle(task_key: &str) -> Self {
        Self { task_key: task_key.to_string(),
               input_content_id: ContentId::default(),
               status: TaskStatus::Idle,
               result: None,
               last_error: None,
               started_at: None,
               finished_at: None }
    }
}
