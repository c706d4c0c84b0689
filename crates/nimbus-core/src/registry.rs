//! Registro de sesiones y tareas: la única pieza de estado mutable
//! compartido.
//!
//! Dueño de todos los logs de sesión, de la caché de payloads y de los slots
//! de tarea durante la vida del proceso (sin persistencia: re-subir es
//! idempotente porque los identificadores derivan del contenido). Las
//! mutaciones de una sesión las hace únicamente su tarea conductora; los
//! snapshots se leen concurrentemente desde la capa de presentación.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use chrono::Utc;
use uuid::Uuid;

use crate::errors::TaskError;
use crate::event::{SessionEvent, SessionEventKind, SessionEventLog};
use crate::model::{ContentId, EncodedBlob, RawFile, TaskSnapshot, TaskStatus, UploadSnapshot, WorkflowOutcome};
use crate::session::replay;

#[derive(Default)]
pub struct SessionRegistry {
    log: SessionEventLog,
    raw_files: DashMap<Uuid, RawFile>,
    payloads: DashMap<Uuid, EncodedBlob>,
    tasks: DashMap<String, TaskSnapshot>,
    drivers: DashMap<Uuid, ()>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Crea una sesión nueva para un archivo; el registro toma posesión de
    /// los bytes crudos hasta que la codificación los consume.
    pub fn create_session(&self, raw: RawFile) -> Uuid {
        let session_id = Uuid::new_v4();
        self.log.append(session_id,
                        SessionEventKind::SessionCreated { file_name: raw.name.clone(),
                                                           raw_len: raw.bytes.len() as u64 });
        self.raw_files.insert(session_id, raw);
        session_id
    }

    pub fn append(&self, session_id: Uuid, kind: SessionEventKind) -> SessionEvent {
        self.log.append(session_id, kind)
    }

    pub fn events(&self, session_id: Uuid) -> Vec<SessionEvent> {
        self.log.list(session_id)
    }

    /// Snapshot por replay; `None` si la sesión no existe.
    pub fn snapshot(&self, session_id: Uuid) -> Option<UploadSnapshot> {
        let events = self.log.list(session_id);
        replay(session_id, &events)
    }

    pub(crate) fn take_raw(&self, session_id: Uuid) -> Option<RawFile> {
        self.raw_files.remove(&session_id).map(|(_, raw)| raw)
    }

    pub(crate) fn cache_payload(&self, session_id: Uuid, blob: EncodedBlob) {
        self.payloads.insert(session_id, blob);
    }

    pub(crate) fn payload(&self, session_id: Uuid) -> Option<EncodedBlob> {
        self.payloads.get(&session_id).map(|b| b.clone())
    }

    /// Libera los bytes de la sesión (subida aceptada o fallo terminal).
    pub(crate) fn drop_payload(&self, session_id: Uuid) {
        self.payloads.remove(&session_id);
        self.raw_files.remove(&session_id);
    }

    /// Ocupa el slot de conductor de la sesión. Una sesión tiene a lo sumo
    /// un conductor en vuelo: con el slot ocupado el segundo pedido no
    /// arranca nada (el conductor vivo ya está avanzando el log).
    pub(crate) fn try_begin_drive(&self, session_id: Uuid) -> bool {
        match self.drivers.entry(session_id) {
            Entry::Occupied(_) => false,
            Entry::Vacant(vacant) => {
                vacant.insert(());
                true
            }
        }
    }

    /// Libera el slot de conductor al retornar la tarea conductora.
    pub(crate) fn finish_drive(&self, session_id: Uuid) {
        self.drivers.remove(&session_id);
    }

    /// Ocupa el slot del workflow para un intento nuevo. Guardia de
    /// duplicados: con un intento `Running` el segundo pedido se rechaza sin
    /// tocar el que corre; un slot terminal se sobreescribe (intento fresco).
    pub fn begin_task(&self, workflow_id: &str, input: &ContentId) -> Result<String, TaskError> {
        if input.is_empty() {
            return Err(TaskError::MissingInput);
        }
        match self.tasks.entry(workflow_id.to_string()) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().status == TaskStatus::Running {
                    return Err(TaskError::TaskInFlight(workflow_id.to_string()));
                }
                occupied.insert(TaskSnapshot::running(workflow_id, input));
                Ok(workflow_id.to_string())
            }
            Entry::Vacant(vacant) => {
                vacant.insert(TaskSnapshot::running(workflow_id, input));
                Ok(workflow_id.to_string())
            }
        }
    }

    /// Cierra el intento en vuelo con su resultado terminal.
    pub fn finish_task(&self, task_key: &str, outcome: Result<WorkflowOutcome, TaskError>) {
        if let Some(mut slot) = self.tasks.get_mut(task_key) {
            slot.finished_at = Some(Utc::now());
            match outcome {
                Ok(result) => {
                    slot.status = TaskStatus::Succeeded;
                    slot.result = Some(result);
                    slot.last_error = None;
                }
                Err(error) => {
                    slot.status = TaskStatus::Failed;
                    slot.result = None;
                    slot.last_error = Some(error);
                }
            }
        }
    }

    pub fn task_snapshot(&self, task_key: &str) -> Option<TaskSnapshot> {
        self.tasks.get(task_key).map(|t| t.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cid() -> ContentId {
        ContentId::derive(b"input")
    }

    #[test]
    fn duplicate_run_is_rejected_while_running() {
        let reg = SessionRegistry::new();
        reg.begin_task("rag-chatbot", &cid()).unwrap();
        let err = reg.begin_task("rag-chatbot", &cid()).unwrap_err();
        assert_eq!(err, TaskError::TaskInFlight("rag-chatbot".into()));
        // la tarea en vuelo queda intacta
        assert_eq!(reg.task_snapshot("rag-chatbot").unwrap().status, TaskStatus::Running);
    }

    #[test]
    fn terminal_slot_is_replaced_by_fresh_attempt() {
        let reg = SessionRegistry::new();
        reg.begin_task("web-scraper", &cid()).unwrap();
        reg.finish_task("web-scraper", Err(TaskError::Executor("boom".into())));
        assert_eq!(reg.task_snapshot("web-scraper").unwrap().status, TaskStatus::Failed);

        reg.begin_task("web-scraper", &cid()).unwrap();
        let snap = reg.task_snapshot("web-scraper").unwrap();
        assert_eq!(snap.status, TaskStatus::Running);
        assert!(snap.last_error.is_none(), "el intento fresco no hereda el error previo");
    }

    #[test]
    fn empty_input_cannot_start() {
        let reg = SessionRegistry::new();
        let err = reg.begin_task("auto-crawler", &ContentId::default()).unwrap_err();
        assert_eq!(err, TaskError::MissingInput);
        assert!(reg.task_snapshot("auto-crawler").is_none());
    }

    #[test]
    fn distinct_workflows_run_concurrently() {
        let reg = SessionRegistry::new();
        reg.begin_task("rag-chatbot", &cid()).unwrap();
        reg.begin_task("sheet-chat", &cid()).unwrap();
        assert_eq!(reg.task_snapshot("sheet-chat").unwrap().status, TaskStatus::Running);
    }

    #[test]
    fn driver_slot_is_exclusive_per_session() {
        let reg = SessionRegistry::new();
        let session = reg.create_session(RawFile::new("a.txt", b"aa".to_vec()));
        assert!(reg.try_begin_drive(session));
        assert!(!reg.try_begin_drive(session), "una sesión admite un solo conductor en vuelo");

        reg.finish_drive(session);
        assert!(reg.try_begin_drive(session), "el slot se libera al retornar el conductor");

        // sesiones distintas no compiten por el slot
        let other = reg.create_session(RawFile::new("b.txt", b"bb".to_vec()));
        assert!(reg.try_begin_drive(other));
    }

    #[test]
    fn payload_cache_is_per_session() {
        let reg = SessionRegistry::new();
        let a = reg.create_session(RawFile::new("a.txt", b"aa".to_vec()));
        let b = reg.create_session(RawFile::new("b.txt", b"bb".to_vec()));
        assert!(reg.take_raw(a).is_some());
        assert!(reg.take_raw(a).is_none(), "los bytes crudos se consumen una sola vez");
        assert!(reg.take_raw(b).is_some());
    }
}
