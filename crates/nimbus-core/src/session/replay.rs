//! Replay lineal: consume eventos en orden y produce el `UploadSnapshot`.
//!
//! Aquí viven las invariantes del estado observable:
//! - `content_id` sólo se fija con `Listed`.
//! - Un rechazo de confirmación descarta el digest de su fase y retrocede el
//!   estado (registro → `Encoded`, certificación → `Uploaded`).
//! - `last_error` se limpia en toda transición exitosa y se fija en
//!   interrupciones, rechazos y fallos terminales.

use uuid::Uuid;

use crate::errors::UploadError;
use crate::event::{SessionEvent, SessionEventKind, UploadStage};
use crate::model::{UploadSnapshot, UploadState};

/// Estado en el que una etapa interrumpida queda lista para reanudarse.
fn resume_state(stage: UploadStage) -> UploadState {
    match stage {
        UploadStage::Encode => UploadState::Init,
        UploadStage::Register => UploadState::Encoded,
        UploadStage::ConfirmRegister => UploadState::RegisterPending,
        UploadStage::Upload => UploadState::Registered,
        UploadStage::Certify => UploadState::Uploaded,
        UploadStage::ConfirmCertify => UploadState::CertifyPending,
        UploadStage::List => UploadState::Certified,
    }
}

/// Reconstruye el snapshot; `None` si la sesión no tiene eventos.
pub fn replay(session_id: Uuid, events: &[SessionEvent]) -> Option<UploadSnapshot> {
    let first = events.first()?;
    let mut snap = UploadSnapshot { session_id,
                                    state: UploadState::Init,
                                    file_name: String::new(),
                                    provisional_id: None,
                                    encoded_len: None,
                                    register_tx_digest: None,
                                    certify_tx_digest: None,
                                    node_acks: None,
                                    content_id: None,
                                    last_error: None,
                                    created_at: first.ts,
                                    updated_at: first.ts };

    for ev in events {
        snap.updated_at = ev.ts;
        match &ev.kind {
            SessionEventKind::SessionCreated { file_name, .. } => {
                snap.file_name = file_name.clone();
                snap.state = UploadState::Init;
            }
            SessionEventKind::EncodeStarted => {
                snap.state = UploadState::Encoding;
                snap.last_error = None;
            }
            SessionEventKind::EncodeCompleted { provisional_id, encoded_len } => {
                snap.provisional_id = Some(provisional_id.clone());
                snap.encoded_len = Some(*encoded_len);
                snap.state = UploadState::Encoded;
                snap.last_error = None;
            }
            SessionEventKind::RegisterSubmitted { digest } => {
                snap.register_tx_digest = Some(digest.clone());
                snap.state = UploadState::RegisterPending;
                snap.last_error = None;
            }
            SessionEventKind::RegisterConfirmed => {
                snap.state = UploadState::Registered;
                snap.last_error = None;
            }
            SessionEventKind::RegisterRejected { reason } => {
                snap.register_tx_digest = None;
                snap.state = UploadState::Encoded;
                snap.last_error = Some(UploadError::ConfirmationRejected(reason.clone()));
            }
            SessionEventKind::UploadStarted => {
                snap.state = UploadState::Uploading;
                snap.last_error = None;
            }
            SessionEventKind::UploadAccepted { acks } => {
                snap.node_acks = Some(*acks);
                snap.state = UploadState::Uploaded;
                snap.last_error = None;
            }
            SessionEventKind::CertifySubmitted { digest } => {
                snap.certify_tx_digest = Some(digest.clone());
                snap.state = UploadState::CertifyPending;
                snap.last_error = None;
            }
            SessionEventKind::CertifyConfirmed => {
                snap.state = UploadState::Certified;
                snap.last_error = None;
            }
            SessionEventKind::CertifyRejected { reason } => {
                snap.certify_tx_digest = None;
                snap.state = UploadState::Uploaded;
                snap.last_error = Some(UploadError::ConfirmationRejected(reason.clone()));
            }
            SessionEventKind::ListStarted => {
                snap.state = UploadState::Listing;
                snap.last_error = None;
            }
            SessionEventKind::Listed { content_id } => {
                snap.content_id = Some(content_id.clone());
                snap.state = UploadState::Listed;
                snap.last_error = None;
            }
            SessionEventKind::StageInterrupted { stage, error } => {
                snap.state = resume_state(*stage);
                snap.last_error = Some(error.clone());
            }
            SessionEventKind::StageFailed { error, .. } => {
                snap.state = UploadState::Failed;
                snap.last_error = Some(error.clone());
            }
        }
    }
    Some(snap)
}
