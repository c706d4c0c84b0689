//! Confirmador de desarrollo con latencia simulada.

use async_trait::async_trait;
use dashmap::DashSet;
use std::time::Duration;

use nimbus_core::{ChainConfirmer, Finality, TxDigest};

/// Simula la espera de finalidad: confirma tras una latencia fija, vence el
/// plazo si la latencia lo excede, y rechaza los digests marcados.
pub struct DevnetConfirmer {
    latency: Duration,
    rejected: DashSet<String>,
}

impl DevnetConfirmer {
    pub fn new(latency: Duration) -> Self {
        Self { latency, rejected: DashSet::new() }
    }

    /// Marca un digest para que la próxima espera lo reporte rechazado.
    pub fn reject(&self, digest: &TxDigest, _reason: &str) {
        self.rejected.insert(digest.as_str().to_string());
    }
}

#[async_trait]
impl ChainConfirmer for DevnetConfirmer {
    async fn await_finality(&self, digest: &TxDigest, timeout: Duration) -> Finality {
        if self.rejected.contains(digest.as_str()) {
            return Finality::Rejected("transaction rejected by chain".to_string());
        }
        if self.latency >= timeout {
            tokio::time::sleep(timeout).await;
            return Finality::TimedOut;
        }
        tokio::time::sleep(self.latency).await;
        Finality::Confirmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn confirms_within_timeout() {
        let confirmer = DevnetConfirmer::new(Duration::from_millis(1));
        let digest = TxDigest("0xabc".into());
        assert_eq!(confirmer.await_finality(&digest, Duration::from_millis(50)).await,
                   Finality::Confirmed);
    }

    #[tokio::test]
    async fn slow_chain_times_out() {
        let confirmer = DevnetConfirmer::new(Duration::from_millis(50));
        let digest = TxDigest("0xabc".into());
        assert_eq!(confirmer.await_finality(&digest, Duration::from_millis(1)).await,
                   Finality::TimedOut);
    }

    #[tokio::test]
    async fn marked_digest_is_rejected() {
        let confirmer = DevnetConfirmer::new(Duration::from_millis(1));
        let digest = TxDigest("0xbad".into());
        confirmer.reject(&digest, "stale epoch");
        assert!(matches!(confirmer.await_finality(&digest, Duration::from_millis(50)).await,
                         Finality::Rejected(_)));
    }
}
