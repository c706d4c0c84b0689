//! Agente ejecutor de workflows.
//!
//! Resuelve el input por identificador de contenido, corre el workflow y
//! sube el artefacto resultante por el mismo pipeline de orquestación que
//! cualquier otra subida: el resultado también queda certificado y listado
//! antes de publicarse su URL.

use async_trait::async_trait;
use std::sync::Arc;

use nimbus_core::model::{ContentId, RawFile, WorkflowOutcome};
use nimbus_core::{aggregator_url, ChainConfirmer, TaskError, TransactionSigner, UploadOrchestrator,
                  WorkflowExecutor};
use nimbus_domain::{InputType, WorkflowKind};

use crate::cluster::InMemoryStorageCluster;

pub struct NimbusAgent<S, C, T>
    where S: TransactionSigner,
          C: ChainConfirmer,
          T: nimbus_core::StorageTransport
{
    orchestrator: Arc<UploadOrchestrator<S, C, T>>,
    cluster: Arc<InMemoryStorageCluster>,
    aggregator_base: String,
}

impl<S, C, T> NimbusAgent<S, C, T>
    where S: TransactionSigner,
          C: ChainConfirmer,
          T: nimbus_core::StorageTransport
{
    pub fn new(orchestrator: Arc<UploadOrchestrator<S, C, T>>, cluster: Arc<InMemoryStorageCluster>) -> Self {
        let aggregator_base = orchestrator.config().aggregator_base.clone();
        Self { orchestrator, cluster, aggregator_base }
    }

    /// Produce el artefacto del workflow. Determinista sobre el input: el
    /// resultado queda direccionado por contenido, correr dos veces el mismo
    /// workflow sobre el mismo blob produce el mismo identificador.
    fn render_output(&self, kind: WorkflowKind, input: &ContentId, input_bytes: &[u8]) -> RawFile {
        let preview_len = input_bytes.len().min(64);
        let preview = String::from_utf8_lossy(&input_bytes[..preview_len]);
        match kind.input_type() {
            InputType::Audio => {
                let body = format!("# Meeting summary\n\nsource: {input}\nduration bytes: {}\n\n\
                                    Transcribed and summarized the recording.\n",
                                   input_bytes.len());
                RawFile::new(format!("{}-summary.md", kind.id()), body.into_bytes())
            }
            InputType::Image => {
                // bytes "de imagen" deterministas derivados del input
                let mut bytes = format!("GENERATED-IMAGE:{input}:").into_bytes();
                bytes.extend_from_slice(&input_bytes[..preview_len]);
                RawFile::new(format!("{}-artwork.bin", kind.id()), bytes)
                    .with_content_type("application/octet-stream")
            }
            InputType::Text => {
                let body = format!("workflow: {kind}\ninput: {input}\ninput bytes: {}\n\n\
                                    > {preview}\n\nProcessed by the Nimbus agent.\n",
                                   input_bytes.len());
                RawFile::new(format!("{}-result.txt", kind.id()), body.into_bytes())
                    .with_content_type("text/plain")
            }
        }
    }
}

#[async_trait]
impl<S, C, T> WorkflowExecutor for NimbusAgent<S, C, T>
    where S: TransactionSigner,
          C: ChainConfirmer,
          T: nimbus_core::StorageTransport
{
    async fn run(&self, workflow_id: &str, input: &ContentId) -> Result<WorkflowOutcome, TaskError> {
        // fallar cerrado: el id se valida antes de tocar la red
        let kind = WorkflowKind::parse(workflow_id)
            .map_err(|_| TaskError::UnknownWorkflow(workflow_id.to_string()))?;
        let Some(input_bytes) = self.cluster.read_blob(input) else {
            return Err(TaskError::Executor(format!("input blob {input} not found on the cluster")));
        };

        log::info!("agent: running {kind} over {input}");
        let output = self.render_output(kind, input, &input_bytes);

        // el resultado viaja por el pipeline completo, igual que una subida
        // iniciada por el usuario
        let session_id = self.orchestrator.open_session(output);
        let result_content_id = self.orchestrator
                                    .run_session(session_id)
                                    .await
                                    .map_err(TaskError::ResultUpload)?;

        let resolved_url = aggregator_url(&self.aggregator_base, &result_content_id);
        log::info!("agent: {kind} finished, result at {resolved_url}");
        Ok(WorkflowOutcome { result_content_id, resolved_url })
    }
}
