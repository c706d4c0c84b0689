//! Hash helpers – abstracción para permitir cambiar de algoritmo sin tocar el resto.

use blake3::Hasher;

/// Hashea bytes y devuelve hex.
pub fn hash_bytes(input: &[u8]) -> String {
    let mut h = Hasher::new();
    h.update(input);
    h.finalize().to_hex().to_string()
}

/// Hashea un string y devuelve hex.
pub fn hash_str(input: &str) -> String {
    hash_bytes(input.as_bytes())
}
