//! Fachada de servicio para la capa de presentación.
//!
//! `MarketplaceService` expone las cuatro operaciones del caller: iniciar
//! una subida, consultar su estado, lanzar un workflow y consultar la
//! tarea. Las operaciones de lanzamiento devuelven de inmediato; el avance
//! real ocurre en tareas conductoras desacopladas y se observa por sondeo
//! de snapshots.

use std::sync::Arc;
use uuid::Uuid;

use crate::capability::{ChainConfirmer, TransactionSigner};
use crate::errors::{TaskError, UploadError};
use crate::executor::WorkflowExecutor;
use crate::model::{ContentId, RawFile, TaskSnapshot, UploadSnapshot};
use crate::orchestrator::UploadOrchestrator;
use crate::registry::SessionRegistry;
use crate::transport::StorageTransport;

pub struct MarketplaceService<S, C, T, X>
    where S: TransactionSigner + 'static,
          C: ChainConfirmer + 'static,
          T: StorageTransport + 'static,
          X: WorkflowExecutor + 'static
{
    orchestrator: Arc<UploadOrchestrator<S, C, T>>,
    executor: Arc<X>,
    registry: Arc<SessionRegistry>,
}

impl<S, C, T, X> MarketplaceService<S, C, T, X>
    where S: TransactionSigner + 'static,
          C: ChainConfirmer + 'static,
          T: StorageTransport + 'static,
          X: WorkflowExecutor + 'static
{
    pub fn new(orchestrator: Arc<UploadOrchestrator<S, C, T>>, executor: Arc<X>) -> Self {
        let registry = Arc::clone(orchestrator.registry());
        Self { orchestrator, executor, registry }
    }

    /// Abre una sesión para el archivo y lanza su tarea conductora.
    /// Devuelve el id de sesión de inmediato; el progreso se observa con
    /// [`MarketplaceService::get_upload_state`].
    pub fn start_upload(&self, raw: RawFile) -> Uuid {
        let session_id = self.orchestrator.open_session(raw);
        self.drive(session_id);
        session_id
    }

    /// Relanza la tarea conductora de una sesión estacionada (firma
    /// declinada, confirmación vencida, transporte caído). Sobre una sesión
    /// terminal no tiene efecto: el conductor retorna en el primer replay.
    pub fn resume_upload(&self, session_id: Uuid) -> Result<(), UploadError> {
        if self.registry.snapshot(session_id).is_none() {
            return Err(UploadError::UnknownSession);
        }
        self.drive(session_id);
        Ok(())
    }

    /// Un conductor por sesión: el slot se toma antes de despachar y se
    /// libera al retornar. Con un conductor en vuelo la llamada no arranca
    /// un segundo bucle (firmaría transacciones duplicadas).
    fn drive(&self, session_id: Uuid) {
        if !self.registry.try_begin_drive(session_id) {
            log::debug!("session {session_id}: driver already in flight");
            return;
        }
        let orchestrator = Arc::clone(&self.orchestrator);
        let registry = Arc::clone(&self.registry);
        tokio::spawn(async move {
            // el resultado ya queda en el log; acá sólo se registra el cierre
            match orchestrator.run_session(session_id).await {
                Ok(content_id) => log::info!("session {session_id} listed as {content_id}"),
                Err(error) => log::info!("session {session_id} stopped: {error}"),
            }
            registry.finish_drive(session_id);
        });
    }

    /// Snapshot actual de la sesión; `None` si el id es desconocido.
    pub fn get_upload_state(&self, session_id: Uuid) -> Option<UploadSnapshot> {
        self.registry.snapshot(session_id)
    }

    /// Lanza un workflow sobre contenido ya listado. La guardia de
    /// duplicados se toma antes de despachar: con un intento en vuelo para
    /// el mismo workflow el pedido se rechaza sin efectos.
    pub fn run_workflow(&self, workflow_id: &str, input: &ContentId) -> Result<String, TaskError> {
        let task_key = self.registry.begin_task(workflow_id, input)?;
        let executor = Arc::clone(&self.executor);
        let registry = Arc::clone(&self.registry);
        let input = input.clone();
        let key = task_key.clone();
        tokio::spawn(async move {
            let outcome = executor.run(&key, &input).await;
            registry.finish_task(&key, outcome);
        });
        Ok(task_key)
    }

    /// Snapshot de la tarea del workflow. Un workflow sin ejecuciones
    /// registradas se reporta `Idle` en vez de error: la consulta es
    /// siempre válida.
    pub fn get_task_state(&self, workflow_id: &str) -> TaskSnapshot {
        self.registry.task_snapshot(workflow_id)
            .unwrap_or_else(|| TaskSnapshot::idle(workflow_id))
    }
}
