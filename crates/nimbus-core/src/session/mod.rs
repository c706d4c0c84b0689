//! Reconstrucción del estado de sesión a partir de eventos.

pub mod replay;

pub use replay::replay;
