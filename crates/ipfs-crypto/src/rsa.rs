//! RSA key operations
//!
//! Private key data is the PKCS#1 `RSAPrivateKey` DER sequence of nine
//! integers, public key data the DER `SubjectPublicKeyInfo`.

use rand::rngs::OsRng;
use rsa::{
    RsaPrivateKey, RsaPublicKey,
    pkcs1::{DecodeRsaPrivateKey, EncodeRsaPrivateKey},
    pkcs1v15::{Signature, SigningKey, VerifyingKey},
    pkcs8::{DecodePublicKey, EncodePublicKey},
    signature::{SignatureEncoding, Signer, Verifier},
};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::{CryptoError, error::Result};

pub const SIGNING_ALGORITHM: &str = "SHA-256withRSA";

/// Generates an RSA key with a modulus of `bits` bits
pub fn generate(bits: usize) -> Result<RsaPrivateKey> {
    RsaPrivateKey::new(&mut OsRng, bits)
        .map_err(|e| CryptoError::KeyError(format!("Couldn't generate a {bits} bit RSA key: {e}")))
}

pub fn from_private_data(data: &[u8]) -> Result<RsaPrivateKey> {
    RsaPrivateKey::from_pkcs1_der(data)
        .map_err(|e| CryptoError::Format(format!("invalid PKCS#1 RSA private key: {e}")))
}

pub fn private_data(key: &RsaPrivateKey) -> Result<Zeroizing<Vec<u8>>> {
    let document = key
        .to_pkcs1_der()
        .map_err(|e| CryptoError::KeyError(format!("Couldn't encode RSA private key: {e}")))?;
    Ok(Zeroizing::new(document.as_bytes().to_vec()))
}

/// Modulus and public exponent as a DER SubjectPublicKeyInfo
pub fn public_data(key: &RsaPrivateKey) -> Result<Vec<u8>> {
    let document = key
        .to_public_key()
        .to_public_key_der()
        .map_err(|e| CryptoError::KeyError(format!("Couldn't encode RSA public key: {e}")))?;
    Ok(document.into_vec())
}

/// PKCS#1 v1.5 signature over SHA-256
pub fn sign(key: &RsaPrivateKey, data: &[u8]) -> Result<Vec<u8>> {
    let signing_key = SigningKey::<Sha256>::new(key.clone());
    let signature = signing_key
        .try_sign(data)
        .map_err(|e| CryptoError::Signing(format!("RSA signing failed: {e}")))?;
    Ok(signature.to_vec())
}

pub fn verify(public_key: &[u8], data: &[u8], signature: &[u8]) -> Result<bool> {
    let public_key = RsaPublicKey::from_public_key_der(public_key)
        .map_err(|e| CryptoError::Format(format!("invalid RSA public key: {e}")))?;
    let verifying_key = VerifyingKey::<Sha256>::new(public_key);

    let Ok(signature) = Signature::try_from(signature) else {
        return Ok(false);
    };

    Ok(verifying_key.verify(data, &signature).is_ok())
}
