//! Key pairs
//!
//! A [`KeyPair`] holds parsed private key material. The public key and the
//! signing algorithm are derived on first use and cached; generated key pairs
//! have them filled in from the start.

use std::{fmt, sync::OnceLock};

use tracing::debug;

use crate::{
    CryptoError, KeyType, PrivateKey, PublicKey, ed25519, error::Result, rsa, secp256k1,
};

/// Signature scheme used by a key family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SigningAlgorithm {
    /// RSASSA-PKCS1-v1_5 with SHA-256
    Sha256WithRsa,
    Ed25519,
    /// ECDSA with SHA-256, DER encoded signature
    Sha256WithEcdsa,
}

impl SigningAlgorithm {
    pub fn name(&self) -> &'static str {
        match self {
            SigningAlgorithm::Sha256WithRsa => rsa::SIGNING_ALGORITHM,
            SigningAlgorithm::Ed25519 => ed25519::SIGNING_ALGORITHM,
            SigningAlgorithm::Sha256WithEcdsa => secp256k1::SIGNING_ALGORITHM,
        }
    }
}

impl fmt::Display for SigningAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

enum KeyMaterial {
    Rsa(Box<::rsa::RsaPrivateKey>),
    Ed25519(ed25519_dalek::SigningKey),
    Secp256k1(k256::SecretKey),
}

impl KeyMaterial {
    fn key_type(&self) -> KeyType {
        match self {
            KeyMaterial::Rsa(_) => KeyType::Rsa,
            KeyMaterial::Ed25519(_) => KeyType::Ed25519,
            KeyMaterial::Secp256k1(_) => KeyType::Secp256k1,
        }
    }
}

#[derive(Clone)]
struct Derived {
    public_key: PublicKey,
    signing_algorithm: SigningAlgorithm,
}

/// Private key material with a lazily derived public key
pub struct KeyPair {
    material: KeyMaterial,
    derived: OnceLock<Result<Derived>>,
}

impl KeyPair {
    /// Parses the private parameters of `private_key`
    ///
    /// Nothing is derived yet; see [`KeyPair::public_key`].
    pub fn import(private_key: &PrivateKey) -> Result<Self> {
        let data = private_key.data();
        let material = match private_key.key_type() {
            KeyType::Rsa => KeyMaterial::Rsa(Box::new(rsa::from_private_data(data)?)),
            KeyType::Ed25519 => KeyMaterial::Ed25519(ed25519::from_private_data(data)?),
            KeyType::Secp256k1 => KeyMaterial::Secp256k1(secp256k1::from_private_data(data)?),
            key_type @ KeyType::Ecdsa => {
                return Err(CryptoError::UnsupportedKeyType(key_type.to_string()));
            }
        };

        Ok(KeyPair {
            material,
            derived: OnceLock::new(),
        })
    }

    /// Generates a new key pair
    ///
    /// `key_type` is one of `rsa`, `ed25519` or `secp256k1`. `size` is the
    /// modulus length in bits for RSA and ignored otherwise.
    pub fn generate(key_type: &str, size: usize) -> Result<Self> {
        let material = match KeyType::try_from(key_type) {
            Ok(KeyType::Rsa) => KeyMaterial::Rsa(Box::new(rsa::generate(size)?)),
            Ok(KeyType::Ed25519) => KeyMaterial::Ed25519(ed25519::generate()),
            Ok(KeyType::Secp256k1) => KeyMaterial::Secp256k1(secp256k1::generate()),
            Ok(KeyType::Ecdsa) | Err(_) => {
                return Err(CryptoError::KeyError(format!(
                    "Cannot generate a key of type '{key_type}'"
                )));
            }
        };
        debug!("Generated {} key pair", material.key_type());

        let derived = Self::derive(&material)?;
        Ok(KeyPair {
            material,
            derived: OnceLock::from(Ok(derived)),
        })
    }

    pub fn key_type(&self) -> KeyType {
        self.material.key_type()
    }

    /// Public key, derived from the private parameters on first call
    pub fn public_key(&self) -> Result<&PublicKey> {
        self.derived().map(|derived| &derived.public_key)
    }

    pub fn signing_algorithm(&self) -> Result<SigningAlgorithm> {
        self.derived().map(|derived| derived.signing_algorithm)
    }

    /// Projects the key pair back to a private key envelope
    ///
    /// Only RSA and Ed25519 key pairs have a private key envelope layout.
    pub fn to_private_key(&self) -> Result<PrivateKey> {
        let data = match &self.material {
            KeyMaterial::Rsa(key) => rsa::private_data(key)?,
            KeyMaterial::Ed25519(key) => ed25519::private_data(key),
            KeyMaterial::Secp256k1(_) => {
                return Err(CryptoError::UnsupportedKeyType(format!(
                    "{} keys cannot be exported as a private key",
                    self.key_type()
                )));
            }
        };
        Ok(PrivateKey::new(self.key_type(), data.to_vec()))
    }

    /// Signs `data` with the family's signing algorithm
    pub fn sign(&self, data: &[u8]) -> Result<Vec<u8>> {
        let algorithm = self.signing_algorithm()?;
        debug!("Signing {} bytes with {algorithm}", data.len());

        match &self.material {
            KeyMaterial::Rsa(key) => rsa::sign(key, data),
            KeyMaterial::Ed25519(key) => Ok(ed25519::sign(key, data)),
            KeyMaterial::Secp256k1(key) => Ok(secp256k1::sign(key, data)),
        }
    }

    fn derived(&self) -> Result<&Derived> {
        self.derived
            .get_or_init(|| Self::derive(&self.material))
            .as_ref()
            .map_err(Clone::clone)
    }

    fn derive(material: &KeyMaterial) -> Result<Derived> {
        let (data, signing_algorithm) = match material {
            KeyMaterial::Rsa(key) => (rsa::public_data(key)?, SigningAlgorithm::Sha256WithRsa),
            KeyMaterial::Ed25519(key) => (ed25519::public_data(key), SigningAlgorithm::Ed25519),
            KeyMaterial::Secp256k1(key) => {
                (secp256k1::public_data(key), SigningAlgorithm::Sha256WithEcdsa)
            }
        };
        debug!(
            "Derived {} public key, signing with {signing_algorithm}",
            material.key_type()
        );

        Ok(Derived {
            public_key: PublicKey::new(material.key_type(), data),
            signing_algorithm,
        })
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("key_type", &self.key_type())
            .field("derived", &self.derived.get().is_some())
            .finish()
    }
}

impl TryFrom<&PrivateKey> for KeyPair {
    type Error = CryptoError;

    fn try_from(private_key: &PrivateKey) -> Result<Self> {
        KeyPair::import(private_key)
    }
}

impl TryFrom<&KeyPair> for PrivateKey {
    type Error = CryptoError;

    fn try_from(key_pair: &KeyPair) -> Result<Self> {
        key_pair.to_private_key()
    }
}

impl TryFrom<&KeyPair> for PublicKey {
    type Error = CryptoError;

    fn try_from(key_pair: &KeyPair) -> Result<Self> {
        key_pair.public_key().cloned()
    }
}
