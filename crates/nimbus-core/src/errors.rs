//! Errores del pipeline de subida y de las tareas de workflow.
//!
//! `UploadError` es serializable porque viaja dentro de los eventos de
//! sesión (el snapshot lo reconstruye por replay). La variante determina la
//! política de reintento: codificación y consistencia son terminales; firma,
//! confirmación y transporte dejan la sesión estacionada para reintento
//! explícito del caller.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum UploadError {
    /// Entrada local inválida (archivo vacío/corrupto). No se reintenta.
    #[error("encoding failed: {0}")]
    Encoding(String),
    /// El firmante externo rechazó o abortó. Requiere re-invocación explícita.
    #[error("signer refused or aborted: {0}")]
    Signing(String),
    /// Se agotó el presupuesto de sondeo; el digest se conserva y el sondeo
    /// puede reanudarse sin re-enviar la transacción.
    #[error("confirmation timed out after {polls} polls")]
    ConfirmationTimeout { polls: u32 },
    /// Rechazo on-chain: el digest queda obsoleto y se descarta.
    #[error("transaction rejected on-chain: {0}")]
    ConfirmationRejected(String),
    /// Fallo de red hacia los nodos de almacenamiento. Reintentable: la
    /// subida es idempotente por identificador de contenido.
    #[error("storage transport: {0}")]
    Transport(String),
    #[error("quorum not reached: {acks}/{required} node acks")]
    QuorumNotReached { acks: usize, required: usize },
    /// Certificado pero el listado no devolvió entradas. Fatal para la sesión.
    #[error("certified but listing returned no entries")]
    Consistency,
    #[error("encoded payload no longer available; start a new session")]
    PayloadUnavailable,
    #[error("unknown session")]
    UnknownSession,
    #[error("internal: {0}")]
    Internal(String),
}

#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum TaskError {
    /// Ya hay una ejecución en vuelo para el mismo workflow; el duplicado se
    /// rechaza sin tocar la tarea en curso.
    #[error("workflow '{0}' already has a run in flight")]
    TaskInFlight(String),
    /// Id de workflow no reconocido: se falla cerrado, nunca un resultado
    /// vacío silencioso.
    #[error("unknown workflow '{0}'")]
    UnknownWorkflow(String),
    #[error("input content identifier is empty")]
    MissingInput,
    #[error("executor failed: {0}")]
    Executor(String),
    /// La subida del artefacto resultado falló dentro del executor.
    #[error("upload of workflow result failed: {0}")]
    ResultUpload(#[from] UploadError),
}
