//! Implementación del `UploadOrchestrator`.
//!
//! Una sesión avanza con el bucle replay-then-advance: se reconstruye el
//! snapshot desde el log y se ejecuta la etapa que corresponde al estado
//! actual. Eso hace al orquestador reanudable por construcción: una sesión
//! estacionada (firma rechazada, confirmación vencida, transporte caído)
//! retoma exactamente donde quedó, sin re-codificar ni re-enviar
//! transacciones ya aceptadas.

use std::sync::Arc;
use uuid::Uuid;

use crate::capability::{ChainConfirmer, Finality, TransactionSigner, TxDigest, TxKind, UnsignedTransaction};
use crate::config::PipelineConfig;
use crate::encoder::{Blake3ContentEncoder, ContentEncoder};
use crate::errors::UploadError;
use crate::event::{SessionEventKind, UploadStage};
use crate::model::{ContentId, RawFile, UploadState};
use crate::registry::SessionRegistry;
use crate::transport::StorageTransport;

/// Orquestador de sesiones de subida.
///
/// Las dos fases firmadas (registro y certificación) comparten la misma
/// rutina: armar transacción → firmar → confirmar → avanzar-o-retroceder.
/// Nada cruza la frontera de firma sin re-consentimiento explícito del
/// caller.
pub struct UploadOrchestrator<S, C, T>
    where S: TransactionSigner,
          C: ChainConfirmer,
          T: StorageTransport
{
    signer: S,
    confirmer: C,
    transport: T,
    encoder: Box<dyn ContentEncoder>,
    registry: Arc<SessionRegistry>,
    config: PipelineConfig,
}

impl<S, C, T> UploadOrchestrator<S, C, T>
    where S: TransactionSigner,
          C: ChainConfirmer,
          T: StorageTransport
{
    pub fn new(signer: S, confirmer: C, transport: T, registry: Arc<SessionRegistry>, config: PipelineConfig) -> Self {
        Self { signer,
               confirmer,
               transport,
               encoder: Box::new(Blake3ContentEncoder),
               registry,
               config }
    }

    pub fn with_encoder(mut self, encoder: Box<dyn ContentEncoder>) -> Self {
        self.encoder = encoder;
        self
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Crea una sesión nueva para un archivo y devuelve su id.
    pub fn open_session(&self, raw: RawFile) -> Uuid {
        self.registry.create_session(raw)
    }

    /// Ejecuta (o reanuda) la sesión hasta `Listed`, una interrupción
    /// recuperable o un fallo terminal. Cada sesión corre en su propia
    /// unidad de concurrencia; las etapas dentro de una sesión son
    /// estrictamente secuenciales.
    pub async fn run_session(&self, session_id: Uuid) -> Result<ContentId, UploadError> {
        loop {
            let snap = self.registry.snapshot(session_id).ok_or(UploadError::UnknownSession)?;
            match snap.state {
                UploadState::Init | UploadState::Encoding => self.encode_stage(session_id)?,
                UploadState::Encoded => self.register_stage(session_id).await?,
                UploadState::RegisterPending => {
                    self.confirm_stage(session_id, TxKind::Register, snap.register_tx_digest).await?
                }
                // Uploading sin UploadAccepted es un conductor muerto a mitad
                // de subida; re-entrar es seguro (idempotente por digest)
                UploadState::Registered | UploadState::Uploading => self.upload_stage(session_id).await?,
                UploadState::Uploaded => self.certify_stage(session_id).await?,
                UploadState::CertifyPending => {
                    self.confirm_stage(session_id, TxKind::Certify, snap.certify_tx_digest).await?
                }
                UploadState::Certified | UploadState::Listing => self.list_stage(session_id).await?,
                UploadState::Listed => {
                    return snap.content_id
                               .ok_or_else(|| UploadError::Internal("listed session without content id".into()));
                }
                UploadState::Failed => {
                    return Err(snap.last_error
                                   .unwrap_or_else(|| UploadError::Internal("failed session without error".into())));
                }
            }
        }
    }

    /// Registra el fallo terminal de una etapa. La sesión pasa a `Failed` y
    /// libera sus bytes; un intento nuevo es siempre una sesión nueva.
    fn fail(&self, session_id: Uuid, stage: UploadStage, error: UploadError) -> UploadError {
        log::warn!("session {session_id}: terminal failure at {stage:?}: {error}");
        self.registry.drop_payload(session_id);
        self.registry.append(session_id, SessionEventKind::StageFailed { stage, error: error.clone() });
        error
    }

    /// Estaciona la sesión en el estado de reanudación de la etapa; el
    /// caller decide cuándo re-invocar.
    fn park(&self, session_id: Uuid, stage: UploadStage, error: UploadError) -> UploadError {
        log::info!("session {session_id}: parked at {stage:?}: {error}");
        self.registry.append(session_id, SessionEventKind::StageInterrupted { stage, error: error.clone() });
        error
    }

    /// Codificación local: sin red ni firma. Un fallo acá es terminal (la
    /// entrada es inválida, reintentarla no cambia nada).
    fn encode_stage(&self, session_id: Uuid) -> Result<(), UploadError> {
        let Some(raw) = self.registry.take_raw(session_id) else {
            return Err(self.fail(session_id, UploadStage::Encode, UploadError::PayloadUnavailable));
        };
        self.registry.append(session_id, SessionEventKind::EncodeStarted);
        match self.encoder.encode(&raw) {
            Ok(blob) => {
                self.registry.append(session_id,
                                     SessionEventKind::EncodeCompleted { provisional_id: blob.provisional_id
                                                                                             .clone(),
                                                                         encoded_len: blob.encoded_len });
                self.registry.cache_payload(session_id, blob);
                Ok(())
            }
            Err(error) => Err(self.fail(session_id, UploadStage::Encode, error)),
        }
    }

    /// Fase firmada genérica: firma la transacción y registra el digest.
    /// Un rechazo del firmante estaciona la sesión sin consumir el payload;
    /// nunca se reintenta automáticamente.
    async fn signed_phase(&self, session_id: Uuid, kind: TxKind, tx: UnsignedTransaction)
                          -> Result<(), UploadError> {
        let stage = match kind {
            TxKind::Register => UploadStage::Register,
            TxKind::Certify => UploadStage::Certify,
        };
        match self.signer.sign(&tx).await {
            Ok(digest) => {
                let kind_ev = match kind {
                    TxKind::Register => SessionEventKind::RegisterSubmitted { digest },
                    TxKind::Certify => SessionEventKind::CertifySubmitted { digest },
                };
                self.registry.append(session_id, kind_ev);
                Ok(())
            }
            Err(error) => Err(self.park(session_id, stage, error)),
        }
    }

    /// Confirmación genérica con sondeo acotado. Un timeout conserva el
    /// digest (el sondeo es idempotente); un rechazo lo descarta y
    /// retrocede la fase, exigiendo una transacción fresca.
    async fn confirm_stage(&self, session_id: Uuid, kind: TxKind, digest: Option<TxDigest>)
                           -> Result<(), UploadError> {
        let stage = match kind {
            TxKind::Register => UploadStage::ConfirmRegister,
            TxKind::Certify => UploadStage::ConfirmCertify,
        };
        let Some(digest) = digest else {
            return Err(self.fail(session_id, stage, UploadError::Internal("confirm stage without digest".into())));
        };

        let mut polls = 0u32;
        loop {
            match self.confirmer.await_finality(&digest, self.config.confirm_timeout).await {
                Finality::Confirmed => {
                    let kind_ev = match kind {
                        TxKind::Register => SessionEventKind::RegisterConfirmed,
                        TxKind::Certify => SessionEventKind::CertifyConfirmed,
                    };
                    self.registry.append(session_id, kind_ev);
                    return Ok(());
                }
                Finality::Rejected(reason) => {
                    log::warn!("session {session_id}: {kind:?} tx {digest} rejected: {reason}");
                    let kind_ev = match kind {
                        TxKind::Register => SessionEventKind::RegisterRejected { reason: reason.clone() },
                        TxKind::Certify => SessionEventKind::CertifyRejected { reason: reason.clone() },
                    };
                    self.registry.append(session_id, kind_ev);
                    return Err(UploadError::ConfirmationRejected(reason));
                }
                Finality::TimedOut => {
                    polls += 1;
                    if polls >= self.config.max_confirm_polls {
                        return Err(self.park(session_id, stage, UploadError::ConfirmationTimeout { polls }));
                    }
                    // el digest se conserva: re-sondear no re-envía nada
                }
            }
        }
    }

    /// Arma y firma el registro del blob (tamaño/identificador/dueño).
    async fn register_stage(&self, session_id: Uuid) -> Result<(), UploadError> {
        let Some(blob) = self.registry.payload(session_id) else {
            return Err(self.fail(session_id, UploadStage::Register, UploadError::PayloadUnavailable));
        };
        let tx = UnsignedTransaction::register(&blob,
                                               &self.config.owner_address,
                                               self.config.storage_epochs,
                                               session_id);
        self.signed_phase(session_id, TxKind::Register, tx).await
    }

    /// Empuja el payload a los nodos con reintentos y backoff lineal. La
    /// subida es idempotente por identificador de contenido, así que agotar
    /// los intentos estaciona la sesión en `Registered` con el digest
    /// confirmado intacto.
    async fn upload_stage(&self, session_id: Uuid) -> Result<(), UploadError> {
        let Some(blob) = self.registry.payload(session_id) else {
            return Err(self.fail(session_id, UploadStage::Upload, UploadError::PayloadUnavailable));
        };
        let Some(digest) = self.registry.snapshot(session_id).and_then(|s| s.register_tx_digest) else {
            return Err(self.fail(session_id,
                                 UploadStage::Upload,
                                 UploadError::Internal("upload stage without confirmed register digest".into())));
        };

        self.registry.append(session_id, SessionEventKind::UploadStarted);
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            let error = match self.transport.upload_payload(&blob, &digest).await {
                Ok(acks) if acks.len() >= self.config.min_node_acks => {
                    self.registry.append(session_id, SessionEventKind::UploadAccepted { acks: acks.len() });
                    // los nodos ya tienen los bytes; liberar la caché
                    self.registry.drop_payload(session_id);
                    return Ok(());
                }
                Ok(acks) => UploadError::QuorumNotReached { acks: acks.len(),
                                                           required: self.config.min_node_acks },
                Err(error) => error,
            };
            if attempt >= self.config.max_upload_attempts {
                return Err(self.park(session_id, UploadStage::Upload, error));
            }
            log::debug!("session {session_id}: upload attempt {attempt} failed ({error}), backing off");
            tokio::time::sleep(self.config.upload_backoff * attempt).await;
        }
    }

    /// Arma y firma la certificación. Sólo se emite con la subida aceptada
    /// por quorum (el estado `Uploaded` lo garantiza).
    async fn certify_stage(&self, session_id: Uuid) -> Result<(), UploadError> {
        let snap = self.registry.snapshot(session_id).ok_or(UploadError::UnknownSession)?;
        let (Some(provisional_id), Some(register_digest)) = (snap.provisional_id, snap.register_tx_digest) else {
            return Err(self.fail(session_id,
                                 UploadStage::Certify,
                                 UploadError::Internal("certify stage without registered blob".into())));
        };
        let tx = UnsignedTransaction::certify(&provisional_id, &register_digest, session_id);
        self.signed_phase(session_id, TxKind::Certify, tx).await
    }

    /// Entrega el certificado a los nodos y resuelve el identificador
    /// definitivo. Cero entradas para una sesión certificada es una
    /// violación de consistencia: fatal y visible, nunca se reintenta en
    /// silencio.
    async fn list_stage(&self, session_id: Uuid) -> Result<(), UploadError> {
        let snap = self.registry.snapshot(session_id).ok_or(UploadError::UnknownSession)?;
        let (Some(provisional_id), Some(session_key), Some(certify_digest)) =
            (snap.provisional_id, snap.register_tx_digest, snap.certify_tx_digest)
        else {
            return Err(self.fail(session_id,
                                 UploadStage::List,
                                 UploadError::Internal("list stage without certified blob".into())));
        };

        self.registry.append(session_id, SessionEventKind::ListStarted);
        if let Err(error) = self.transport.certify_payload(&provisional_id, &certify_digest).await {
            return Err(self.park(session_id, UploadStage::List, error));
        }
        match self.transport.list_stored_files(&session_key).await {
            Ok(entries) => {
                let entry = entries.iter().find(|e| e.content_id == provisional_id).or_else(|| entries.first());
                match entry {
                    Some(entry) => {
                        self.registry.append(session_id,
                                             SessionEventKind::Listed { content_id: entry.content_id.clone() });
                        Ok(())
                    }
                    None => Err(self.fail(session_id, UploadStage::List, UploadError::Consistency)),
                }
            }
            Err(error) => Err(self.park(session_id, UploadStage::List, error)),
        }
    }
}
