//! Sender identity loading
//!
//! Accepts the Solana CLI keypair format: a JSON array of 64 decimal bytes,
//! the 32-byte ed25519 secret seed followed by the 32-byte public key.

use solana_sdk::{
    signature::Keypair,
    signer::{keypair::keypair_from_seed, Signer},
};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::config::KeySource;
use crate::errors::{Result, SubmitterError};

const KEYPAIR_LENGTH: usize = 64;
const SECRET_LENGTH: usize = 32;

pub fn load_keypair(source: &KeySource) -> Result<Keypair> {
    match source {
        KeySource::Path(path) => load_keypair_file(path),
        KeySource::Json(json) => keypair_from_json(json),
    }
}

pub fn load_keypair_file(path: &Path) -> Result<Keypair> {
    let contents = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => SubmitterError::KeyFileNotFound(path.to_path_buf()),
        _ => SubmitterError::KeyDecode(format!("failed to read {}: {}", path.display(), e)),
    })?;
    keypair_from_json(&contents)
}

/// Decode a JSON byte array into a keypair, checking the public half against the secret
pub fn keypair_from_json(json: &str) -> Result<Keypair> {
    let bytes: Vec<u8> = serde_json::from_str(json.trim())
        .map_err(|e| SubmitterError::KeyDecode(format!("expected a JSON byte array: {}", e)))?;
    keypair_from_bytes(&bytes)
}

pub fn keypair_from_bytes(bytes: &[u8]) -> Result<Keypair> {
    if bytes.len() != KEYPAIR_LENGTH {
        return Err(SubmitterError::KeyDecode(format!(
            "expected {} bytes, found {}",
            KEYPAIR_LENGTH,
            bytes.len()
        )));
    }

    let (secret, public) = bytes.split_at(SECRET_LENGTH);
    let keypair = keypair_from_seed(secret)
        .map_err(|e| SubmitterError::KeyDecode(format!("invalid secret key: {}", e)))?;

    if keypair.pubkey().as_ref() != public {
        return Err(SubmitterError::KeyDecode(
            "public key does not match secret key".to_string(),
        ));
    }
    Ok(keypair)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn keypair_json(keypair: &Keypair) -> String {
        serde_json::to_string(&keypair.to_bytes().to_vec()).unwrap()
    }

    fn write_key_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_valid_key_file() {
        let original = Keypair::new();
        let file = write_key_file(&keypair_json(&original));

        let loaded = load_keypair(&KeySource::Path(file.path().to_path_buf())).unwrap();
        assert_eq!(loaded.pubkey(), original.pubkey());
        assert_eq!(loaded.to_bytes(), original.to_bytes());
    }

    #[test]
    fn test_pubkey_is_deterministic_in_secret() {
        let original = Keypair::new();
        let json = keypair_json(&original);

        let first = keypair_from_json(&json).unwrap();
        let second = keypair_from_json(&json).unwrap();
        assert_eq!(first.pubkey(), second.pubkey());

        let seeded = keypair_from_seed(&original.to_bytes()[..SECRET_LENGTH]).unwrap();
        assert_eq!(first.pubkey(), seeded.pubkey());
    }

    #[test]
    fn test_inline_source() {
        let original = Keypair::new();
        let loaded = load_keypair(&KeySource::Json(keypair_json(&original))).unwrap();
        assert_eq!(loaded.pubkey(), original.pubkey());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");

        let result = load_keypair(&KeySource::Path(path.clone()));
        assert!(matches!(result, Err(SubmitterError::KeyFileNotFound(p)) if p == path));
    }

    #[test]
    fn test_wrong_length() {
        let file = write_key_file(&serde_json::to_string(&vec![7u8; 32]).unwrap());
        let result = load_keypair_file(file.path());
        assert!(matches!(result, Err(SubmitterError::KeyDecode(msg)) if msg.contains("found 32")));
    }

    #[test]
    fn test_non_numeric_content() {
        let file = write_key_file("[\"a\", \"b\"]");
        assert!(matches!(
            load_keypair_file(file.path()),
            Err(SubmitterError::KeyDecode(_))
        ));

        assert!(matches!(
            keypair_from_json("not json at all"),
            Err(SubmitterError::KeyDecode(_))
        ));

        // 256 does not fit in a byte
        let mut values = vec![1u16; KEYPAIR_LENGTH];
        values[0] = 256;
        assert!(matches!(
            keypair_from_json(&serde_json::to_string(&values).unwrap()),
            Err(SubmitterError::KeyDecode(_))
        ));
    }

    #[test]
    fn test_mismatched_public_half() {
        let mut bytes = Keypair::new().to_bytes();
        let other = Keypair::new();
        bytes[SECRET_LENGTH..].copy_from_slice(other.pubkey().as_ref());

        let result = keypair_from_bytes(&bytes);
        assert!(matches!(result, Err(SubmitterError::KeyDecode(msg)) if msg.contains("does not match")));
    }
}
