//! Clúster de almacenamiento en memoria.
//!
//! Hace de red de nodos para desarrollo y pruebas: deduplica por
//! identificador de contenido, aprende la clave de sesión (el digest de
//! registro) al subir y sirve el listado por esa clave. Los interruptores
//! de alcanzabilidad y de listado permiten ensayar fallos de transporte y
//! violaciones de consistencia.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use nimbus_core::model::{ContentId, EncodedBlob};
use nimbus_core::{NodeAck, StorageTransport, StoredEntry, TxDigest, UploadError};

struct StoredBlobState {
    bytes: Vec<u8>,
    encoded_len: u64,
    certified: bool,
}

pub struct InMemoryStorageCluster {
    nodes: Vec<String>,
    down: DashMap<String, ()>,
    blobs: DashMap<ContentId, StoredBlobState>,
    sessions: DashMap<TxDigest, ContentId>,
    drop_listings: AtomicBool,
}

impl InMemoryStorageCluster {
    pub fn new(node_count: usize) -> Self {
        Self { nodes: (0..node_count).map(|i| format!("node-{i}")).collect(),
               down: DashMap::new(),
               blobs: DashMap::new(),
               sessions: DashMap::new(),
               drop_listings: AtomicBool::new(false) }
    }

    pub fn set_reachable(&self, node_id: &str, reachable: bool) {
        if reachable {
            self.down.remove(node_id);
        } else {
            self.down.insert(node_id.to_string(), ());
        }
    }

    pub fn set_all_reachable(&self, reachable: bool) {
        for node in &self.nodes {
            self.set_reachable(node, reachable);
        }
    }

    /// Hace que el listado devuelva cero entradas aunque el blob exista.
    pub fn drop_listings(&self, drop: bool) {
        self.drop_listings.store(drop, Ordering::SeqCst);
    }

    /// Lectura directa de un blob almacenado (lo que haría el agregador).
    pub fn read_blob(&self, content_id: &ContentId) -> Option<Vec<u8>> {
        self.blobs.get(content_id).map(|b| b.bytes.clone())
    }

    pub fn is_certified(&self, content_id: &ContentId) -> bool {
        self.blobs.get(content_id).map(|b| b.certified).unwrap_or(false)
    }

    fn reachable_nodes(&self) -> Vec<&String> {
        self.nodes.iter().filter(|n| !self.down.contains_key(*n)).collect()
    }
}

#[async_trait]
impl StorageTransport for InMemoryStorageCluster {
    async fn upload_payload(&self, blob: &EncodedBlob, register_digest: &TxDigest)
                            -> Result<Vec<NodeAck>, UploadError> {
        let reachable = self.reachable_nodes();
        if reachable.is_empty() {
            return Err(UploadError::Transport("no storage node reachable".to_string()));
        }
        // deduplicación por contenido: re-subir el mismo blob es idempotente
        self.blobs.entry(blob.provisional_id.clone()).or_insert_with(|| {
                      StoredBlobState { bytes: blob.bytes.clone(),
                                        encoded_len: blob.encoded_len,
                                        certified: false }
                  });
        self.sessions.insert(register_digest.clone(), blob.provisional_id.clone());
        Ok(reachable.into_iter().map(|n| NodeAck { node_id: n.clone() }).collect())
    }

    async fn certify_payload(&self, content_id: &ContentId, _certify_digest: &TxDigest)
                             -> Result<(), UploadError> {
        if self.reachable_nodes().is_empty() {
            return Err(UploadError::Transport("no storage node reachable".to_string()));
        }
        match self.blobs.get_mut(content_id) {
            Some(mut blob) => {
                blob.certified = true;
                Ok(())
            }
            None => Err(UploadError::Transport(format!("blob {content_id} not found on any node"))),
        }
    }

    async fn list_stored_files(&self, session_key: &TxDigest) -> Result<Vec<StoredEntry>, UploadError> {
        if self.reachable_nodes().is_empty() {
            return Err(UploadError::Transport("no storage node reachable".to_string()));
        }
        if self.drop_listings.load(Ordering::SeqCst) {
            return Ok(Vec::new());
        }
        let Some(content_id) = self.sessions.get(session_key).map(|c| c.clone()) else {
            return Ok(Vec::new());
        };
        Ok(self.blobs
               .get(&content_id)
               .map(|b| {
                   vec![StoredEntry { content_id: content_id.clone(),
                                      encoded_len: b.encoded_len,
                                      certified: b.certified }]
               })
               .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn blob(bytes: &[u8]) -> EncodedBlob {
        EncodedBlob { provisional_id: ContentId::derive(bytes),
                      bytes: bytes.to_vec(),
                      encoded_len: bytes.len() as u64,
                      file_name: "f.bin".into(),
                      tags: BTreeMap::new() }
    }

    #[tokio::test]
    async fn upload_acks_only_reachable_nodes() {
        let cluster = InMemoryStorageCluster::new(3);
        cluster.set_reachable("node-1", false);
        let acks = cluster.upload_payload(&blob(b"data"), &TxDigest("0xd1".into())).await.unwrap();
        assert_eq!(acks.len(), 2);
    }

    #[tokio::test]
    async fn unreachable_cluster_is_a_transport_error() {
        let cluster = InMemoryStorageCluster::new(2);
        cluster.set_all_reachable(false);
        let err = cluster.upload_payload(&blob(b"data"), &TxDigest("0xd1".into())).await.unwrap_err();
        assert!(matches!(err, UploadError::Transport(_)));
    }

    #[tokio::test]
    async fn listing_is_keyed_by_register_digest() {
        let cluster = InMemoryStorageCluster::new(3);
        let b = blob(b"data");
        cluster.upload_payload(&b, &TxDigest("0xd1".into())).await.unwrap();
        cluster.certify_payload(&b.provisional_id, &TxDigest("0xd2".into())).await.unwrap();

        let entries = cluster.list_stored_files(&TxDigest("0xd1".into())).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].content_id, b.provisional_id);
        assert!(entries[0].certified);

        // otra clave de sesión no ve nada
        assert!(cluster.list_stored_files(&TxDigest("0xother".into())).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn dropped_listings_return_empty() {
        let cluster = InMemoryStorageCluster::new(3);
        let b = blob(b"data");
        cluster.upload_payload(&b, &TxDigest("0xd1".into())).await.unwrap();
        cluster.drop_listings(true);
        assert!(cluster.list_stored_files(&TxDigest("0xd1".into())).await.unwrap().is_empty());
    }
}
