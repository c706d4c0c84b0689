//! Ejecución de workflows contra contenido ya subido.

use async_trait::async_trait;
use std::sync::Arc;

use crate::errors::TaskError;
use crate::model::{ContentId, WorkflowOutcome};

#[async_trait]
pub trait WorkflowExecutor: Send + Sync {
    /// Ejecuta el workflow sobre un input que ya alcanzó `Listed`.
    /// El identificador de input debe ser no vacío; un workflow desconocido
    /// es `TaskError::UnknownWorkflow` (se falla cerrado).
    async fn run(&self, workflow_id: &str, input: &ContentId) -> Result<WorkflowOutcome, TaskError>;
}

#[async_trait]
impl<X> WorkflowExecutor for Arc<X> where X: WorkflowExecutor + ?Sized
{
    async fn run(&self, workflow_id: &str, input: &ContentId) -> Result<WorkflowOutcome, TaskError> {
        (**self).run(workflow_id, input).await
    }
}
