//! Firmante local de desarrollo.
//!
//! Deriva el digest del payload canónico más un nonce monótono: la misma
//! transacción re-firmada produce un digest nuevo, igual que una wallet
//! real que re-envía con otro gas object. Sin material de claves: esto es
//! un doble de la wallet, no criptografía.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicU64, Ordering};

use nimbus_core::hashing::to_canonical_json;
use nimbus_core::{TransactionSigner, TxDigest, UnsignedTransaction, UploadError};

#[derive(Default)]
pub struct LocalSigner {
    nonce: AtomicU64,
}

impl LocalSigner {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransactionSigner for LocalSigner {
    async fn sign(&self, tx: &UnsignedTransaction) -> Result<TxDigest, UploadError> {
        let nonce = self.nonce.fetch_add(1, Ordering::SeqCst);
        let canonical = to_canonical_json(&tx.payload);
        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        hasher.update(nonce.to_be_bytes());
        let digest = hasher.finalize();
        let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
        log::debug!("signed {:?} tx, nonce {nonce}", tx.kind);
        Ok(TxDigest(format!("0x{hex}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nimbus_core::model::{ContentId, EncodedBlob};
    use std::collections::BTreeMap;
    use uuid::Uuid;

    fn register_tx() -> UnsignedTransaction {
        let blob = EncodedBlob { provisional_id: ContentId::derive(b"payload"),
                                 bytes: b"payload".to_vec(),
                                 encoded_len: 7,
                                 file_name: "payload.bin".into(),
                                 tags: BTreeMap::new() };
        UnsignedTransaction::register(&blob, "0xowner", 10, Uuid::new_v4())
    }

    #[tokio::test]
    async fn resigning_same_tx_yields_fresh_digest() {
        let signer = LocalSigner::new();
        let tx = register_tx();
        let a = signer.sign(&tx).await.unwrap();
        let b = signer.sign(&tx).await.unwrap();
        assert_ne!(a, b, "a resubmitted transaction must get a new digest");
        assert!(a.as_str().starts_with("0x"));
    }
}
