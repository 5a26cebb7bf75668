//! SSH public key validation and generation.
//!
//! Keys are stored on the resource as base64 of an OpenSSH authorized-keys
//! line (`ssh-ed25519 AAAA... comment`).

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use ssh_key::{Algorithm, PrivateKey, PublicKey};
use thiserror::Error;

use super::field::{ErrorList, FieldError, FieldPath};

/// Errors from generating a default SSH key.
#[derive(Error, Debug)]
pub enum SshKeyError {
    #[error("failed to generate SSH key pair: {0}")]
    Generate(#[source] ssh_key::Error),

    #[error("failed to encode SSH public key: {0}")]
    Encode(#[source] ssh_key::Error),
}

/// Validate a base64-encoded OpenSSH public key.
pub fn validate_ssh_key(encoded: &str, path: &FieldPath) -> ErrorList {
    let decoded = match STANDARD.decode(encoded.trim()) {
        Ok(bytes) => bytes,
        Err(_) => {
            return vec![FieldError::malformed(
                path.clone(),
                encoded,
                "the SSH public key is not properly base64 encoded",
            )];
        }
    };

    let valid = std::str::from_utf8(&decoded)
        .ok()
        .map(|line| PublicKey::from_openssh(line.trim()).is_ok())
        .unwrap_or(false);
    if !valid {
        return vec![FieldError::malformed(
            path.clone(),
            encoded,
            "the SSH public key is not valid",
        )];
    }

    Vec::new()
}

/// Generate a new Ed25519 key pair and return the base64-encoded public key.
///
/// The private half is discarded; access goes through the cloud provider.
pub fn generate_ssh_public_key() -> Result<String, SshKeyError> {
    let private = PrivateKey::random(&mut rand::rngs::OsRng, Algorithm::Ed25519)
        .map_err(SshKeyError::Generate)?;
    let line = private
        .public_key()
        .to_openssh()
        .map_err(SshKeyError::Encode)?;
    Ok(STANDARD.encode(format!("{}\n", line)))
}
