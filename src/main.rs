//! Demo del pipeline completo contra el clúster en memoria: publicar el
//! catálogo, subir un archivo hasta `Listed`, correr un workflow sobre él y
//! mostrar la URL del resultado.

use std::sync::Arc;
use std::time::Duration;

use nimbus_adapters::{DevnetConfirmer, InMemoryStorageCluster, LocalSigner, NimbusAgent};
use nimbus_core::model::{RawFile, TaskStatus, UploadState};
use nimbus_core::{MarketplaceService, PipelineConfig, SessionRegistry, UploadOrchestrator};
use nimbus_domain::{catalog_fingerprint, CATALOG};

#[tokio::main]
async fn main() {
    env_logger::init();
    nimbus_core::config::init_dotenv();
    let config = PipelineConfig { confirm_timeout: Duration::from_millis(100),
                                  upload_backoff: Duration::from_millis(20),
                                  ..PipelineConfig::from_env() };

    // --- catálogo del marketplace ---
    println!("--- Workflow marketplace ---");
    for entry in CATALOG.iter() {
        println!("  [{}] {} — {} SUI (by {})",
                 entry.kind.id(),
                 entry.title,
                 entry.price,
                 entry.author);
    }
    println!("catalog fingerprint: {}", catalog_fingerprint());

    // --- armado del stack ---
    let cluster = Arc::new(InMemoryStorageCluster::new(3));
    let confirmer = Arc::new(DevnetConfirmer::new(Duration::from_millis(5)));
    let registry = Arc::new(SessionRegistry::new());
    let orchestrator = Arc::new(UploadOrchestrator::new(LocalSigner::new(),
                                                        confirmer,
                                                        Arc::clone(&cluster),
                                                        registry,
                                                        config));
    let agent = Arc::new(NimbusAgent::new(Arc::clone(&orchestrator), Arc::clone(&cluster)));
    let service = MarketplaceService::new(Arc::clone(&orchestrator), agent);

    // --- subida: INIT → ... → LISTED ---
    println!("--- Uploading notes.txt ---");
    let session = service.start_upload(RawFile::new("notes.txt", b"hello walrus".to_vec())
                                           .with_content_type("text/plain"));
    let input = loop {
        tokio::time::sleep(Duration::from_millis(20)).await;
        let snap = service.get_upload_state(session).expect("session exists");
        println!("  session {session}: {:?}", snap.state);
        match snap.state {
            UploadState::Listed => break snap.content_id.expect("listed session has a content id"),
            UploadState::Failed => {
                eprintln!("upload failed: {:?}", snap.last_error);
                return;
            }
            _ => {}
        }
    };
    println!("listed as {input}");

    // --- workflow sobre el contenido listado ---
    println!("--- Running rag-chatbot ---");
    let task_key = service.run_workflow("rag-chatbot", &input).expect("workflow accepted");
    let outcome = loop {
        tokio::time::sleep(Duration::from_millis(20)).await;
        let task = service.get_task_state(&task_key);
        println!("  task {task_key}: {:?}", task.status);
        match task.status {
            TaskStatus::Succeeded => break task.result.expect("succeeded task has a result"),
            TaskStatus::Failed => {
                eprintln!("workflow failed: {:?}", task.last_error);
                return;
            }
            _ => {}
        }
    };
    println!("result blob: {}", outcome.result_content_id);
    println!("result url:  {}", outcome.resolved_url);
}
