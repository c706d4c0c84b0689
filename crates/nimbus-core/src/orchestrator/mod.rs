//! Orquestador del pipeline de subida.
//!
//! Provee la máquina de estados por sesión: replay del log, ejecución de la
//! siguiente etapa y política de reintento/backoff sobre los colaboradores
//! externos (firmante, confirmador, transporte).

pub mod core;

pub use core::UploadOrchestrator;
