//! Modelo de datos neutral del pipeline.

pub mod blob;
pub mod content_id;
pub mod snapshot;

pub use blob::{EncodedBlob, RawFile};
pub use content_id::{aggregator_url, ContentId};
pub use snapshot::{TaskSnapshot, TaskStatus, UploadSnapshot, UploadState, WorkflowOutcome};
