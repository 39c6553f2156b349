//! Key family enumeration

use std::fmt;

use zeroize::Zeroize;

use crate::CryptoError;

/// Key families, numbered as in the libp2p key protobuf
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Zeroize)]
pub enum KeyType {
    Rsa,
    Ed25519,
    Secp256k1,
    Ecdsa,
}

impl KeyType {
    /// Numeric code used by the key envelope
    pub fn code(&self) -> u64 {
        match self {
            KeyType::Rsa => 0,
            KeyType::Ed25519 => 1,
            KeyType::Secp256k1 => 2,
            KeyType::Ecdsa => 3,
        }
    }

    pub fn from_code(code: u64) -> Result<Self, CryptoError> {
        match code {
            0 => Ok(KeyType::Rsa),
            1 => Ok(KeyType::Ed25519),
            2 => Ok(KeyType::Secp256k1),
            3 => Ok(KeyType::Ecdsa),
            _ => Err(CryptoError::Format(format!("unknown key type code {code}"))),
        }
    }
}

impl TryFrom<&str> for KeyType {
    type Error = CryptoError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "rsa" => Ok(KeyType::Rsa),
            "ed25519" => Ok(KeyType::Ed25519),
            "secp256k1" => Ok(KeyType::Secp256k1),
            "ecdsa" => Ok(KeyType::Ecdsa),
            _ => Err(CryptoError::UnsupportedKeyType(value.to_string())),
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            KeyType::Rsa => write!(f, "rsa"),
            KeyType::Ed25519 => write!(f, "ed25519"),
            KeyType::Secp256k1 => write!(f, "secp256k1"),
            KeyType::Ecdsa => write!(f, "ecdsa"),
        }
    }
}
