//! secp256k1 key operations
//!
//! Private key data is the 32 byte big-endian scalar, public key data the
//! 33 byte compressed SEC1 point.

use k256::{
    AffinePoint, ProjectivePoint, SecretKey,
    ecdsa::{
        Signature, SigningKey, VerifyingKey,
        signature::{Signer, Verifier},
    },
    elliptic_curve::sec1::ToEncodedPoint,
};
use rand::rngs::OsRng;

use crate::{CryptoError, error::Result};

pub const SIGNING_ALGORITHM: &str = "SHA-256withECDSA";

/// Generates a random secp256k1 secret key
pub fn generate() -> SecretKey {
    SecretKey::random(&mut OsRng)
}

pub fn from_private_data(data: &[u8]) -> Result<SecretKey> {
    SecretKey::from_slice(data)
        .map_err(|e| CryptoError::KeyError(format!("secp256k1 secret material isn't valid: {e}")))
}

/// Public point `d * G`, compressed
pub fn public_data(secret: &SecretKey) -> Vec<u8> {
    let scalar = secret.to_nonzero_scalar();
    let point = AffinePoint::from(ProjectivePoint::GENERATOR * *scalar);
    point.to_encoded_point(true).as_bytes().to_vec()
}

/// ECDSA over SHA-256, DER encoded
pub fn sign(secret: &SecretKey, data: &[u8]) -> Vec<u8> {
    let signature: Signature = SigningKey::from(secret).sign(data);
    signature.to_der().as_bytes().to_vec()
}

pub fn verify(public_key: &[u8], data: &[u8], signature: &[u8]) -> Result<bool> {
    let verifying_key = VerifyingKey::from_sec1_bytes(public_key)
        .map_err(|e| CryptoError::KeyError(format!("secp256k1 public key isn't valid: {e}")))?;

    let Ok(signature) = Signature::from_der(signature) else {
        return Ok(false);
    };

    Ok(verifying_key.verify(data, &signature).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_point_of_one_is_generator() {
        let mut one = [0u8; 32];
        one[31] = 1;
        let secret = from_private_data(&one).unwrap();
        assert_eq!(
            hex::encode(public_data(&secret)),
            "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
        );
    }

    #[test]
    fn public_point_matches_verifying_key() {
        let secret = generate();
        let expected = VerifyingKey::from(&SigningKey::from(&secret))
            .to_encoded_point(true)
            .as_bytes()
            .to_vec();
        assert_eq!(public_data(&secret), expected);
    }

    #[test]
    fn sign_and_verify() {
        let secret = generate();
        let public = public_data(&secret);
        let signature = sign(&secret, b"hello");
        assert!(verify(&public, b"hello", &signature).unwrap());
        assert!(!verify(&public, b"hullo", &signature).unwrap());
        assert!(!verify(&public, b"hello", b"not der").unwrap());
    }

    #[test]
    fn zero_scalar_is_rejected() {
        assert!(matches!(
            from_private_data(&[0u8; 32]).unwrap_err(),
            CryptoError::KeyError(_)
        ));
    }
}
