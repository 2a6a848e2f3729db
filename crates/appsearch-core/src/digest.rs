use sha2::{Digest, Sha256};

use crate::error::{Error, Result};
use crate::traits::ContentHasher;

/// Hex SHA-256 of the UTF-8 bytes. Matches `content_hash` values in existing stores.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256Hasher;

impl ContentHasher for Sha256Hasher {
    fn digest(&self, text: &str) -> String {
        hex::encode(Sha256::digest(text.as_bytes()))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Blake3Hasher;

impl ContentHasher for Blake3Hasher {
    fn digest(&self, text: &str) -> String {
        blake3::hash(text.as_bytes()).to_hex().to_string()
    }
}

/// Parse the `index.digest` config value.
pub fn hasher_by_name(name: &str) -> Result<Box<dyn ContentHasher>> {
    match name.to_ascii_lowercase().as_str() {
        "sha256" | "sha-256" => Ok(Box::new(Sha256Hasher)),
        "blake3" => Ok(Box::new(Blake3Hasher)),
        other => Err(Error::Configuration(format!("unknown digest algorithm '{other}'"))),
    }
}
