//! Capacidades externas de firma y confirmación.
//!
//! El core nunca construye material de claves privadas: arma payloads de
//! transacción y los entrega al `TransactionSigner` (la wallet del usuario u
//! otro firmante). La finalidad on-chain se observa a través del
//! `ChainConfirmer` como un tipo suma explícito, sin cadenas de callbacks.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::constants::PIPELINE_VERSION;
use crate::errors::UploadError;
use crate::model::{ContentId, EncodedBlob};

/// Digest de una transacción firmada y enviada.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxDigest(pub String);

impl TxDigest {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxKind {
    Register,
    Certify,
}

/// Transacción sin firmar. El payload es JSON canonicalizable; el firmante
/// deriva el digest, el core no interpreta el formato de la firma.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnsignedTransaction {
    pub kind: TxKind,
    pub payload: Value,
}

impl UnsignedTransaction {
    /// Transacción de registro: declara intención de almacenar un blob de
    /// cierto tamaño/identificador antes de empujar bytes a los nodos.
    /// La sesión entra al payload para que cada sesión produzca un digest
    /// propio aunque los bytes se repitan.
    pub fn register(blob: &EncodedBlob, owner: &str, epochs: u64, session_id: Uuid) -> Self {
        Self { kind: TxKind::Register,
               payload: json!({
                   "action": "register",
                   "pipeline_version": PIPELINE_VERSION,
                   "session": session_id.to_string(),
                   "content_id": blob.provisional_id.as_str(),
                   "encoded_len": blob.encoded_len,
                   "owner": owner,
                   "epochs": epochs,
                   "deletable": true,
               }) }
    }

    /// Transacción de certificación: confirma que los nodos aceptaron el
    /// blob de forma durable. Referencia el registro ya confirmado.
    pub fn certify(content_id: &ContentId, register_digest: &TxDigest, session_id: Uuid) -> Self {
        Self { kind: TxKind::Certify,
               payload: json!({
                   "action": "certify",
                   "pipeline_version": PIPELINE_VERSION,
                   "session": session_id.to_string(),
                   "content_id": content_id.as_str(),
                   "register_digest": register_digest.as_str(),
               }) }
    }
}

/// Resultado de esperar finalidad de una transacción.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finality {
    Confirmed,
    /// El plazo venció sin veredicto; el digest sigue siendo válido para
    /// re-sondear.
    TimedOut,
    /// La cadena rechazó la transacción; el digest queda obsoleto.
    Rejected(String),
}

#[async_trait]
pub trait TransactionSigner: Send + Sync {
    /// Firma y envía; devuelve el digest aceptado por la red o
    /// `UploadError::Signing` si el firmante rechaza o aborta.
    async fn sign(&self, tx: &UnsignedTransaction) -> Result<TxDigest, UploadError>;
}

#[async_trait]
pub trait ChainConfirmer: Send + Sync {
    /// Espera finalidad con plazo acotado. Nunca bloquea indefinidamente:
    /// el vencimiento se reporta como `Finality::TimedOut`.
    async fn await_finality(&self, digest: &TxDigest, timeout: Duration) -> Finality;
}

#[async_trait]
impl<S> TransactionSigner for Arc<S> where S: TransactionSigner + ?Sized
{
    async fn sign(&self, tx: &UnsignedTransaction) -> Result<TxDigest, UploadError> {
        (**self).sign(tx).await
    }
}

#[async_trait]
impl<C> ChainConfirmer for Arc<C> where C: ChainConfirmer + ?Sized
{
    async fn await_finality(&self, digest: &TxDigest, timeout: Duration) -> Finality {
        (**self).await_finality(digest, timeout).await
    }
}
