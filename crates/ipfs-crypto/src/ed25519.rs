//! Ed25519 key operations
//!
//! Private key data is the 64 byte `seed || public key` layout.

use ed25519_dalek::{
    KEYPAIR_LENGTH, PUBLIC_KEY_LENGTH, SECRET_KEY_LENGTH, Signature, Signer, SigningKey, Verifier,
    VerifyingKey,
};
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use crate::{CryptoError, error::Result};

pub const SIGNING_ALGORITHM: &str = "Ed25519";

/// Generates a random Ed25519 signing key
pub fn generate() -> SigningKey {
    SigningKey::generate(&mut OsRng)
}

/// Parses the `seed || public key` private key data
///
/// The trailing public key must match the one derived from the seed.
pub fn from_private_data(data: &[u8]) -> Result<SigningKey> {
    if data.len() != KEYPAIR_LENGTH {
        return Err(CryptoError::Format(format!(
            "Ed25519 private key data must be {KEYPAIR_LENGTH} bytes, got {}",
            data.len()
        )));
    }

    let mut seed = Zeroizing::new([0u8; SECRET_KEY_LENGTH]);
    seed.copy_from_slice(&data[..SECRET_KEY_LENGTH]);
    let signing_key = SigningKey::from_bytes(&seed);

    if signing_key.verifying_key().as_bytes() != &data[SECRET_KEY_LENGTH..] {
        return Err(CryptoError::KeyError(
            "Ed25519 public key does not match the private seed".into(),
        ));
    }

    Ok(signing_key)
}

/// `seed || public key`
pub fn private_data(signing_key: &SigningKey) -> Zeroizing<Vec<u8>> {
    Zeroizing::new(signing_key.to_keypair_bytes().to_vec())
}

/// Raw 32 byte public key
pub fn public_data(signing_key: &SigningKey) -> Vec<u8> {
    signing_key.verifying_key().to_bytes().to_vec()
}

pub fn sign(signing_key: &SigningKey, data: &[u8]) -> Vec<u8> {
    signing_key.sign(data).to_bytes().to_vec()
}

/// Verifies `signature` over `data` with a raw public key
pub fn verify(public_key: &[u8], data: &[u8], signature: &[u8]) -> Result<bool> {
    let public_key: [u8; PUBLIC_KEY_LENGTH] = public_key.try_into().map_err(|_| {
        CryptoError::Format(format!(
            "Ed25519 public key must be {PUBLIC_KEY_LENGTH} bytes, got {}",
            public_key.len()
        ))
    })?;
    let verifying_key = VerifyingKey::from_bytes(&public_key)
        .map_err(|e| CryptoError::KeyError(format!("Couldn't create Ed25519 VerifyingKey: {e}")))?;

    let Ok(signature) = Signature::from_slice(signature) else {
        return Ok(false);
    };

    Ok(verifying_key.verify(data, &signature).is_ok())
}
