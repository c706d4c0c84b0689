//! Transporte: reintentos con backoff, quorum de acks y reanudación sin
//! re-registrar.

mod support;

use std::sync::Arc;

use nimbus_adapters::InMemoryStorageCluster;
use nimbus_core::model::{RawFile, UploadState};
use nimbus_core::{SessionEventKind, SessionRegistry, UploadError, UploadOrchestrator};
use support::{test_config, ScriptedConfirmer, ScriptedSigner};

type TestOrchestrator =
    UploadOrchestrator<Arc<ScriptedSigner>, Arc<ScriptedConfirmer>, Arc<InMemoryStorageCluster>>;

fn build(cluster: Arc<InMemoryStorageCluster>, signer: Arc<ScriptedSigner>) -> TestOrchestrator {
    UploadOrchestrator::new(signer,
                            Arc::new(ScriptedConfirmer::confirming()),
                            cluster,
                            Arc::new(SessionRegistry::new()),
                            test_config())
}

#[tokio::test]
async fn unreachable_cluster_parks_at_registered_and_resumes() {
    let cluster = Arc::new(InMemoryStorageCluster::new(3));
    let signer = Arc::new(ScriptedSigner::new());
    let orchestrator = build(Arc::clone(&cluster), Arc::clone(&signer));
    let session = orchestrator.open_session(RawFile::new("notes.txt", b"hello walrus".to_vec()));

    cluster.set_all_reachable(false);
    let err = orchestrator.run_session(session).await.unwrap_err();
    assert!(matches!(err, UploadError::Transport(_)));

    // estacionada en Registered con el registro confirmado intacto
    let snap = orchestrator.registry().snapshot(session).unwrap();
    assert_eq!(snap.state, UploadState::Registered);
    assert!(snap.register_tx_digest.is_some());

    cluster.set_all_reachable(true);
    orchestrator.run_session(session).await.unwrap();
    let snap = orchestrator.registry().snapshot(session).unwrap();
    assert_eq!(snap.state, UploadState::Listed);

    // reanudar no re-registra: un solo RegisterSubmitted en el log
    let registers = orchestrator.registry()
                                .events(session)
                                .iter()
                                .filter(|e| matches!(e.kind, SessionEventKind::RegisterSubmitted { .. }))
                                .count();
    assert_eq!(registers, 1);
}

#[tokio::test]
async fn session_observed_mid_upload_resumes_the_upload() {
    let cluster = Arc::new(InMemoryStorageCluster::new(3));
    let signer = Arc::new(ScriptedSigner::new());
    let orchestrator = build(Arc::clone(&cluster), signer);
    let session = orchestrator.open_session(RawFile::new("notes.txt", b"hello walrus".to_vec()));

    // dejar la sesión estacionada en Registered con el payload aún cacheado
    cluster.set_all_reachable(false);
    orchestrator.run_session(session).await.unwrap_err();

    // conductor muerto a mitad de subida: el log termina en UploadStarted
    orchestrator.registry().append(session, SessionEventKind::UploadStarted);
    let snap = orchestrator.registry().snapshot(session).unwrap();
    assert_eq!(snap.state, UploadState::Uploading);

    cluster.set_all_reachable(true);
    orchestrator.run_session(session).await.unwrap();
    assert_eq!(orchestrator.registry().snapshot(session).unwrap().state, UploadState::Listed);
}

#[tokio::test]
async fn missing_quorum_parks_even_with_partial_acks() {
    let cluster = Arc::new(InMemoryStorageCluster::new(3));
    let signer = Arc::new(ScriptedSigner::new());
    let orchestrator = build(Arc::clone(&cluster), signer);
    let session = orchestrator.open_session(RawFile::new("notes.txt", b"hello walrus".to_vec()));

    // un solo nodo alcanzable: 1 ack < quorum de 2
    cluster.set_reachable("node-1", false);
    cluster.set_reachable("node-2", false);
    let err = orchestrator.run_session(session).await.unwrap_err();
    assert_eq!(err, UploadError::QuorumNotReached { acks: 1, required: 2 });

    let snap = orchestrator.registry().snapshot(session).unwrap();
    assert_eq!(snap.state, UploadState::Registered);

    cluster.set_reachable("node-1", true);
    orchestrator.run_session(session).await.unwrap();
    let snap = orchestrator.registry().snapshot(session).unwrap();
    assert_eq!(snap.state, UploadState::Listed);
    assert_eq!(snap.node_acks, Some(2));
}
