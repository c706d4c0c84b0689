//! Log en memoria de eventos por sesión.
//!
//! A diferencia de un store secuencial single-writer, múltiples sesiones
//! escriben concurrentemente; el mapa particiona por sesión y dentro de una
//! sesión escribe únicamente su tarea conductora.

use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use super::{SessionEvent, SessionEventKind};

#[derive(Default)]
pub struct SessionEventLog {
    inner: DashMap<Uuid, Vec<SessionEvent>>,
}

impl SessionEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Agrega un evento y devuelve el evento completo (con seq y ts).
    pub fn append(&self, session_id: Uuid, kind: SessionEventKind) -> SessionEvent {
        let mut entry = self.inner.entry(session_id).or_default();
        let ev = SessionEvent { seq: entry.len() as u64, session_id, kind, ts: Utc::now() };
        entry.push(ev.clone());
        ev
    }

    /// Lista los eventos de una sesión en orden de append.
    pub fn list(&self, session_id: Uuid) -> Vec<SessionEvent> {
        self.inner.get(&session_id).map(|v| v.clone()).unwrap_or_default()
    }

    pub fn contains(&self, session_id: Uuid) -> bool {
        self.inner.contains_key(&session_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_assigns_sequential_seq() {
        let log = SessionEventLog::new();
        let id = Uuid::new_v4();
        let a = log.append(id, SessionEventKind::SessionCreated { file_name: "a".into(), raw_len: 1 });
        let b = log.append(id, SessionEventKind::EncodeStarted);
        assert_eq!((a.seq, b.seq), (0, 1));
        assert_eq!(log.list(id).len(), 2);
    }

    #[test]
    fn sessions_are_isolated() {
        let log = SessionEventLog::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        log.append(a, SessionEventKind::EncodeStarted);
        assert!(log.list(b).is_empty());
        assert!(!log.contains(b));
    }
}
