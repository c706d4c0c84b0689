//! Constantes del motor de orquestación.
//!
//! Valores estáticos que forman parte del contrato observable: la versión
//! del pipeline entra en el payload de cada transacción sin firmar, de modo
//! que un cambio incompatible del motor produzca digests distintos aunque el
//! contenido no cambie.

/// Versión lógica del pipeline (M1). Mantener estable mientras no haya
/// cambios incompatibles en el formato de transacciones o eventos.
pub const PIPELINE_VERSION: &str = "M1.0";

/// Ruta pública de recuperación de blobs en el agregador. Otras herramientas
/// dependen de este template; no cambiar sin versionar.
pub const AGGREGATOR_BLOB_PATH: &str = "v1";
