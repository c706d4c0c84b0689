//! Dobles guionables para los tests de integración del orquestador.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use nimbus_core::{ChainConfirmer, Finality, PipelineConfig, TransactionSigner, TxDigest, TxKind,
                  UnsignedTransaction, UploadError};

/// Firmante guionable: declina las primeras `declines` firmas y luego emite
/// digests únicos y legibles (`0xsigned-register-1`, ...).
pub struct ScriptedSigner {
    declines: AtomicU32,
    signed: AtomicU32,
}

impl ScriptedSigner {
    pub fn new() -> Self {
        Self::declining(0)
    }

    pub fn declining(declines: u32) -> Self {
        Self { declines: AtomicU32::new(declines),
               signed: AtomicU32::new(0) }
    }

    pub fn signed_count(&self) -> u32 {
        self.signed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TransactionSigner for ScriptedSigner {
    async fn sign(&self, tx: &UnsignedTransaction) -> Result<TxDigest, UploadError> {
        if self.declines.load(Ordering::SeqCst) > 0 {
            self.declines.fetch_sub(1, Ordering::SeqCst);
            return Err(UploadError::Signing("user declined in wallet".to_string()));
        }
        let n = self.signed.fetch_add(1, Ordering::SeqCst) + 1;
        let kind = match tx.kind {
            TxKind::Register => "register",
            TxKind::Certify => "certify",
        };
        Ok(TxDigest(format!("0xsigned-{kind}-{n}")))
    }
}

/// Confirmador guionable: consume veredictos en orden y confirma por defecto
/// cuando el guión se agota.
pub struct ScriptedConfirmer {
    script: Mutex<VecDeque<Finality>>,
}

impl ScriptedConfirmer {
    pub fn confirming() -> Self {
        Self::with_script(Vec::new())
    }

    pub fn with_script(script: Vec<Finality>) -> Self {
        Self { script: Mutex::new(script.into_iter().collect()) }
    }
}

#[async_trait]
impl ChainConfirmer for ScriptedConfirmer {
    async fn await_finality(&self, _digest: &TxDigest, _timeout: Duration) -> Finality {
        self.script.lock().unwrap().pop_front().unwrap_or(Finality::Confirmed)
    }
}

/// Configuración con plazos cortos para que agotar presupuestos sea barato.
pub fn test_config() -> PipelineConfig {
    PipelineConfig { confirm_timeout: Duration::from_millis(10),
                     max_confirm_polls: 3,
                     min_node_acks: 2,
                     max_upload_attempts: 2,
                     upload_backoff: Duration::from_millis(1),
                     ..PipelineConfig::default() }
}
