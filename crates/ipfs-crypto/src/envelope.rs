//! Private and public key envelopes
//!
//! Both envelopes use the libp2p key protobuf framing:
//! `0x08 varint(key type) 0x12 varint(length) data`
//!
//! The data is family specific, see [`crate::KeyPair`].

use std::fmt;

use ipfs_multiformats::varint;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{CryptoError, KeyType, ed25519, error::Result, rsa, secp256k1};

/// Field 1, varint
const TYPE_TAG: u64 = 0x08;
/// Field 2, length delimited
const DATA_TAG: u64 = 0x12;

fn encode(key_type: KeyType, data: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(data.len() + 8);
    varint::encode_u64(TYPE_TAG, &mut bytes);
    varint::encode_u64(key_type.code(), &mut bytes);
    varint::encode_u64(DATA_TAG, &mut bytes);
    varint::encode_u64(data.len() as u64, &mut bytes);
    bytes.extend_from_slice(data);
    bytes
}

fn next_varint<'a>(bytes: &'a [u8], field: &str) -> Result<(u64, &'a [u8])> {
    varint::decode_u64(bytes)
        .map_err(|e| CryptoError::Format(format!("bad key envelope {field}: {e}")))
}

/// Accepts the two fields in either order
fn decode(mut bytes: &[u8]) -> Result<(KeyType, Vec<u8>)> {
    let mut key_type = None;
    let mut data = None;

    while !bytes.is_empty() {
        let (tag, rest) = next_varint(bytes, "tag")?;
        match tag {
            TYPE_TAG if key_type.is_none() => {
                let (code, rest) = next_varint(rest, "key type")?;
                key_type = Some(KeyType::from_code(code)?);
                bytes = rest;
            }
            DATA_TAG if data.is_none() => {
                let (length, rest) = next_varint(rest, "data length")?;
                let length = usize::try_from(length)
                    .ok()
                    .filter(|length| *length <= rest.len())
                    .ok_or_else(|| {
                        CryptoError::Format(format!(
                            "key envelope declares {length} data bytes but {} remain",
                            rest.len()
                        ))
                    })?;
                data = Some(rest[..length].to_vec());
                bytes = &rest[length..];
            }
            TYPE_TAG | DATA_TAG => {
                return Err(CryptoError::Format(format!(
                    "key envelope repeats field tag 0x{tag:x}"
                )));
            }
            _ => {
                return Err(CryptoError::Format(format!(
                    "unknown key envelope field tag 0x{tag:x}"
                )));
            }
        }
    }

    match (key_type, data) {
        (Some(key_type), Some(data)) => Ok((key_type, data)),
        (None, _) => Err(CryptoError::Format("key envelope has no key type".into())),
        (_, None) => Err(CryptoError::Format("key envelope has no key data".into())),
    }
}

/// Serialized private key: a key family and its private parameters
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    key_type: KeyType,
    data: Vec<u8>,
}

impl PrivateKey {
    pub fn new(key_type: KeyType, data: Vec<u8>) -> Self {
        PrivateKey { key_type, data }
    }

    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    /// Family specific private parameters
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn serialize(&self) -> Vec<u8> {
        encode(self.key_type, &self.data)
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        let (key_type, data) = decode(bytes)?;
        Ok(PrivateKey { key_type, data })
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("key_type", &self.key_type)
            .field("data", &format_args!("[{} bytes]", self.data.len()))
            .finish()
    }
}

/// Serialized public key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PublicKey {
    key_type: KeyType,
    data: Vec<u8>,
}

impl PublicKey {
    pub fn new(key_type: KeyType, data: Vec<u8>) -> Self {
        PublicKey { key_type, data }
    }

    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    /// SubjectPublicKeyInfo DER for RSA, 32 raw bytes for Ed25519 and the
    /// compressed point for secp256k1
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn serialize(&self) -> Vec<u8> {
        encode(self.key_type, &self.data)
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        let (key_type, data) = decode(bytes)?;
        Ok(PublicKey { key_type, data })
    }

    /// Checks a signature made by [`crate::KeyPair::sign`]
    ///
    /// A well formed key with a non-matching signature is `Ok(false)`.
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> Result<bool> {
        match self.key_type {
            KeyType::Rsa => rsa::verify(&self.data, data, signature),
            KeyType::Ed25519 => ed25519::verify(&self.data, data, signature),
            KeyType::Secp256k1 => secp256k1::verify(&self.data, data, signature),
            KeyType::Ecdsa => Err(CryptoError::UnsupportedKeyType(self.key_type.to_string())),
        }
    }
}
