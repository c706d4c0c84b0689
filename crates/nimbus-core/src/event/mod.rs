//! Log de eventos de sesión (append-only).

pub mod log;
pub mod types;

pub use log::SessionEventLog;
pub use types::{SessionEvent, SessionEventKind, UploadStage};
