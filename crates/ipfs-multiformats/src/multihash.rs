//! Multihash encoding/decoding
//!
//! A multihash tags a digest with the algorithm that produced it:
//! `varint(code) || varint(digest length) || digest`
//!
//! See: <https://github.com/multiformats/multihash>

use std::{
    fmt,
    hash::{Hash, Hasher},
    io::{Read, Write},
    str::FromStr,
    sync::Arc,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::{
    HashingAlgorithm, HashingRegistry, MultiBaseRegistry, MultiformatError, error::Result, varint,
};

/// A digest together with the algorithm that produced it
#[derive(Clone)]
pub struct MultiHash {
    algorithm: Arc<HashingAlgorithm>,
    digest: Vec<u8>,
}

impl MultiHash {
    /// Wraps an existing digest, checking its length against the algorithm
    pub fn new(algorithm: Arc<HashingAlgorithm>, digest: Vec<u8>) -> Result<Self> {
        if algorithm.digest_size() > 0 && digest.len() != algorithm.digest_size() {
            return Err(MultiformatError::Format(format!(
                "{} digest must be {} bytes, got {}",
                algorithm.name(),
                algorithm.digest_size(),
                digest.len()
            )));
        }
        Ok(MultiHash { algorithm, digest })
    }

    /// Hashes `data` with the default algorithm (sha2-256)
    pub fn compute(data: &[u8]) -> Result<Self> {
        let algorithm = HashingRegistry::global().default_algorithm()?;
        Self::hash_with(algorithm, data)
    }

    /// Hashes `data` with the named algorithm from the global registry
    pub fn compute_with_algorithm(data: &[u8], algorithm: &str) -> Result<Self> {
        Self::compute_with(HashingRegistry::global(), data, algorithm)
    }

    /// Hashes `data` with the named algorithm from `registry`
    pub fn compute_with(registry: &HashingRegistry, data: &[u8], algorithm: &str) -> Result<Self> {
        Self::hash_with(registry.lookup(algorithm)?, data)
    }

    fn hash_with(algorithm: Arc<HashingAlgorithm>, data: &[u8]) -> Result<Self> {
        let digest = algorithm.compute(data);
        Self::new(algorithm, digest)
    }

    /// Wraps a digest computed elsewhere without recomputing it
    pub fn from_digest(digest: &[u8], algorithm: &str) -> Result<Self> {
        Self::from_digest_with(HashingRegistry::global(), digest, algorithm)
    }

    pub fn from_digest_with(
        registry: &HashingRegistry,
        digest: &[u8],
        algorithm: &str,
    ) -> Result<Self> {
        Self::new(registry.lookup(algorithm)?, digest.to_vec())
    }

    pub fn algorithm(&self) -> &HashingAlgorithm {
        &self.algorithm
    }

    pub fn digest(&self) -> &[u8] {
        &self.digest
    }

    /// Returns true if the hash uses the default algorithm
    pub fn is_default_algorithm(&self) -> bool {
        self.algorithm.is_default()
    }

    /// Returns true if hashing `data` with the same algorithm gives this digest
    pub fn matches(&self, data: &[u8]) -> bool {
        self.algorithm.compute(data) == self.digest
    }

    /// Binary form: `varint(code) || varint(length) || digest`
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.digest.len() + 4);
        varint::encode_u64(self.algorithm.code(), &mut bytes);
        varint::encode_u64(self.digest.len() as u64, &mut bytes);
        bytes.extend_from_slice(&self.digest);
        bytes
    }

    /// Decodes a binary multihash, which must span the whole buffer
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes_with(HashingRegistry::global(), bytes)
    }

    pub fn from_bytes_with(registry: &HashingRegistry, bytes: &[u8]) -> Result<Self> {
        let (code, rest) = varint::decode_u64(bytes)?;
        let algorithm = lookup_code(registry, code)?;
        let (length, digest) = varint::decode_u64(rest)?;

        if digest.len() as u64 != length {
            return Err(MultiformatError::Format(format!(
                "multihash declares {length} digest bytes but {} remain",
                digest.len()
            )));
        }

        Self::new(algorithm, digest.to_vec())
    }

    /// Writes the binary form to a stream
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.to_bytes())?;
        Ok(())
    }

    /// Reads a binary multihash from a stream, consuming only its bytes
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        Self::read_from_with(HashingRegistry::global(), reader)
    }

    pub fn read_from_with<R: Read>(registry: &HashingRegistry, reader: &mut R) -> Result<Self> {
        let code = varint::read_u64(reader)?;
        Self::read_after_code(registry, code, reader)
    }

    /// Finishes reading a multihash whose code has already been consumed
    pub(crate) fn read_after_code<R: Read>(
        registry: &HashingRegistry,
        code: u64,
        reader: &mut R,
    ) -> Result<Self> {
        let algorithm = lookup_code(registry, code)?;
        let length = varint::read_u64(reader)?;

        if algorithm.digest_size() > 0 && length != algorithm.digest_size() as u64 {
            return Err(MultiformatError::Format(format!(
                "{} digest must be {} bytes, stream declares {length}",
                algorithm.name(),
                algorithm.digest_size()
            )));
        }

        let mut digest = Vec::new();
        reader.take(length).read_to_end(&mut digest)?;
        if digest.len() as u64 != length {
            return Err(MultiformatError::Format(format!(
                "multihash declares {length} digest bytes but the stream ended after {}",
                digest.len()
            )));
        }

        Self::new(algorithm, digest)
    }

    /// Legacy text form: base58btc of the binary form without a multibase prefix
    pub fn to_base58(&self) -> String {
        bs58::encode(self.to_bytes()).into_string()
    }

    pub fn from_base58(s: &str) -> Result<Self> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| MultiformatError::Format(format!("invalid base58: {e}")))?;
        Self::from_bytes(&bytes)
    }

    /// Binary form encoded with the named multibase (prefix included)
    pub fn to_multibase(&self, encoding: &str) -> Result<String> {
        self.to_multibase_with(MultiBaseRegistry::global(), encoding)
    }

    pub fn to_multibase_with(&self, bases: &MultiBaseRegistry, encoding: &str) -> Result<String> {
        bases.encode(&self.to_bytes(), encoding)
    }
}

fn lookup_code(registry: &HashingRegistry, code: u64) -> Result<Arc<HashingAlgorithm>> {
    registry.lookup_code(code).map_err(|_| {
        MultiformatError::Format(format!("unknown multihash algorithm code 0x{code:x}"))
    })
}

impl PartialEq for MultiHash {
    fn eq(&self, other: &Self) -> bool {
        self.algorithm.code() == other.algorithm.code() && self.digest == other.digest
    }
}

impl Eq for MultiHash {}

impl Hash for MultiHash {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.algorithm.code().hash(state);
        self.digest.hash(state);
    }
}

impl fmt::Debug for MultiHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiHash")
            .field("algorithm", &self.algorithm.name())
            .field("digest", &self.to_base58())
            .finish()
    }
}

impl FromStr for MultiHash {
    type Err = MultiformatError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_base58(s)
    }
}

impl Serialize for MultiHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base58())
    }
}

impl<'de> Deserialize<'de> for MultiHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        MultiHash::from_base58(&s).map_err(de::Error::custom)
    }
}
