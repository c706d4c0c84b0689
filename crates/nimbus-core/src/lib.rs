//! nimbus-core: motor de orquestación subir-y-ejecutar (M1)
pub mod capability;
pub mod config;
pub mod constants;
pub mod encoder;
pub mod errors;
pub mod event;
pub mod executor;
pub mod hashing;
pub mod model;
pub mod orchestrator;
pub mod registry;
pub mod service;
pub mod session;
pub mod transport;


pub use capability::{ChainConfirmer, Finality, TransactionSigner, TxDigest, TxKind, UnsignedTransaction};
pub use config::PipelineConfig;
pub use encoder::{Blake3ContentEncoder, ContentEncoder};
pub use errors::{TaskError, UploadError};
pub use event::{SessionEvent, SessionEventKind, SessionEventLog, UploadStage};
pub use executor::WorkflowExecutor;
pub use model::{aggregator_url, ContentId, EncodedBlob, RawFile, TaskSnapshot, TaskStatus, UploadSnapshot,
                UploadState, WorkflowOutcome};
pub use orchestrator::UploadOrchestrator;
pub use registry::SessionRegistry;
pub use service::MarketplaceService;
pub use transport::{NodeAck, StorageTransport, StoredEntry};
