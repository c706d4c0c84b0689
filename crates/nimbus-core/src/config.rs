//! Configuración del pipeline desde variables de entorno.
//! Convención `NIMBUS_*`; todos los parámetros tienen default utilizable, una
//! variable ausente nunca es fatal.

use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;
use std::str::FromStr;
use std::time::Duration;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Dirección del dueño que firma el registro del blob.
    pub owner_address: String,
    /// Épocas de almacenamiento declaradas al registrar.
    pub storage_epochs: u64,
    /// Plazo de una espera de finalidad individual.
    pub confirm_timeout: Duration,
    /// Sondeos de confirmación antes de estacionar la sesión.
    pub max_confirm_polls: u32,
    /// Acks de nodo mínimos para dar la subida por aceptada (quorum).
    pub min_node_acks: usize,
    /// Intentos de subida antes de estacionar la sesión.
    pub max_upload_attempts: u32,
    /// Backoff base entre intentos de subida (crece linealmente).
    pub upload_backoff: Duration,
    /// Base del agregador para URLs de recuperación.
    pub aggregator_base: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self { owner_address: "0xnimbus-dev".to_string(),
               storage_epochs: 10,
               confirm_timeout: Duration::from_secs(5),
               max_confirm_polls: 3,
               min_node_acks: 2,
               max_upload_attempts: 3,
               upload_backoff: Duration::from_millis(200),
               aggregator_base: "https://aggregator.walrus-testnet.walrus.space".to_string() }
    }
}

fn env_parse<T: FromStr>(name: &str, default: T) -> T {
    env::var(name).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

impl PipelineConfig {
    pub fn from_env() -> Self {
        Lazy::force(&DOTENV_LOADED);
        let d = Self::default();
        Self { owner_address: env::var("NIMBUS_OWNER_ADDRESS").unwrap_or(d.owner_address),
               storage_epochs: env_parse("NIMBUS_STORAGE_EPOCHS", d.storage_epochs),
               confirm_timeout: Duration::from_millis(env_parse("NIMBUS_CONFIRM_TIMEOUT_MS",
                                                                d.confirm_timeout.as_millis() as u64)),
               max_confirm_polls: env_parse("NIMBUS_MAX_CONFIRM_POLLS", d.max_confirm_polls),
               min_node_acks: env_parse("NIMBUS_MIN_NODE_ACKS", d.min_node_acks),
               max_upload_attempts: env_parse("NIMBUS_MAX_UPLOAD_ATTEMPTS", d.max_upload_attempts),
               upload_backoff: Duration::from_millis(env_parse("NIMBUS_UPLOAD_BACKOFF_MS",
                                                               d.upload_backoff.as_millis() as u64)),
               aggregator_base: env::var("NIMBUS_AGGREGATOR_BASE").unwrap_or(d.aggregator_base) }
    }
}

/// Forzar carga temprana de .env desde aplicaciones externas si se desea.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}
