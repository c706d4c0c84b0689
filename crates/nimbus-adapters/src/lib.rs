// nimbus-adapters library entry point
pub mod agent;
pub mod cluster;
pub mod confirmer;
pub mod signer;
pub use agent::NimbusAgent;
pub use cluster::InMemoryStorageCluster;
pub use confirmer::DevnetConfirmer;
pub use signer::LocalSigner;
