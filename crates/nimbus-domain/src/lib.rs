// nimbus-domain library entry point
pub mod catalog;
pub mod errors;
pub mod workflow;
pub use catalog::{catalog_fingerprint, listing, WorkflowListing, CATALOG};
pub use errors::DomainError;
pub use workflow::{InputType, WorkflowKind};
