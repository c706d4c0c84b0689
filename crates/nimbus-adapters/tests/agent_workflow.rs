//! Integración end-to-end: subida completa más ejecución de workflow sobre
//! el clúster en memoria.

use std::sync::Arc;
use std::time::Duration;

use nimbus_adapters::{DevnetConfirmer, InMemoryStorageCluster, LocalSigner, NimbusAgent};
use nimbus_core::model::{RawFile, UploadState};
use nimbus_core::{PipelineConfig, SessionRegistry, TaskError, UploadOrchestrator, WorkflowExecutor};

fn fast_config() -> PipelineConfig {
    PipelineConfig { confirm_timeout: Duration::from_millis(50),
                     max_confirm_polls: 3,
                     min_node_acks: 2,
                     max_upload_attempts: 3,
                     upload_backoff: Duration::from_millis(5),
                     ..PipelineConfig::default() }
}

type DevOrchestrator =
    UploadOrchestrator<LocalSigner, Arc<DevnetConfirmer>, Arc<InMemoryStorageCluster>>;

fn build_stack() -> (Arc<DevOrchestrator>, Arc<InMemoryStorageCluster>) {
    let cluster = Arc::new(InMemoryStorageCluster::new(3));
    let confirmer = Arc::new(DevnetConfirmer::new(Duration::from_millis(1)));
    let orchestrator = Arc::new(UploadOrchestrator::new(LocalSigner::new(),
                                                        confirmer,
                                                        Arc::clone(&cluster),
                                                        Arc::new(SessionRegistry::new()),
                                                        fast_config()));
    (orchestrator, cluster)
}

#[tokio::test]
async fn full_pipeline_reaches_listed() {
    let (orchestrator, cluster) = build_stack();
    let session = orchestrator.open_session(RawFile::new("notes.txt", b"hello walrus".to_vec()));

    let content_id = orchestrator.run_session(session).await.unwrap();

    let snap = orchestrator.registry().snapshot(session).unwrap();
    assert_eq!(snap.state, UploadState::Listed);
    assert_eq!(snap.content_id, Some(content_id.clone()));
    assert_eq!(snap.node_acks, Some(3));
    assert_eq!(cluster.read_blob(&content_id), Some(b"hello walrus".to_vec()));
    assert!(cluster.is_certified(&content_id));
}

#[tokio::test]
async fn workflow_runs_over_listed_content() {
    let (orchestrator, cluster) = build_stack();
    let session = orchestrator.open_session(RawFile::new("docs.txt", b"quarterly numbers".to_vec()));
    let input = orchestrator.run_session(session).await.unwrap();

    let agent = NimbusAgent::new(Arc::clone(&orchestrator), Arc::clone(&cluster));
    let outcome = agent.run("rag-chatbot", &input).await.unwrap();

    // el resultado quedó subido, certificado y es recuperable por URL
    assert_ne!(outcome.result_content_id, input);
    assert!(cluster.is_certified(&outcome.result_content_id));
    let base = &orchestrator.config().aggregator_base;
    assert_eq!(outcome.resolved_url, format!("{base}/v1/{}", outcome.result_content_id));

    let result_bytes = cluster.read_blob(&outcome.result_content_id).unwrap();
    let text = String::from_utf8(result_bytes).unwrap();
    assert!(text.contains("rag-chatbot"));
}

#[tokio::test]
async fn workflow_results_are_deterministic_per_input() {
    let (orchestrator, cluster) = build_stack();
    let session = orchestrator.open_session(RawFile::new("docs.txt", b"same input".to_vec()));
    let input = orchestrator.run_session(session).await.unwrap();

    let agent = NimbusAgent::new(Arc::clone(&orchestrator), Arc::clone(&cluster));
    let first = agent.run("web-scraper", &input).await.unwrap();
    let second = agent.run("web-scraper", &input).await.unwrap();
    assert_eq!(first.result_content_id, second.result_content_id);
}

#[tokio::test]
async fn unknown_workflow_fails_closed() {
    let (orchestrator, cluster) = build_stack();
    let session = orchestrator.open_session(RawFile::new("docs.txt", b"payload".to_vec()));
    let input = orchestrator.run_session(session).await.unwrap();

    let agent = NimbusAgent::new(Arc::clone(&orchestrator), Arc::clone(&cluster));
    let err = agent.run("crypto-miner", &input).await.unwrap_err();
    assert_eq!(err, TaskError::UnknownWorkflow("crypto-miner".to_string()));
}

#[tokio::test]
async fn missing_input_blob_is_an_executor_error() {
    let (orchestrator, cluster) = build_stack();
    let agent = NimbusAgent::new(orchestrator, cluster);
    let ghost = nimbus_core::model::ContentId::derive(b"never uploaded");
    let err = agent.run("rag-chatbot", &ghost).await.unwrap_err();
    assert!(matches!(err, TaskError::Executor(_)));
}
