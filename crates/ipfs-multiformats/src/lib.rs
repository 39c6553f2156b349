//! Self-describing data formats used by IPFS
//!
//! This crate provides:
//! - Hashing algorithm registry and multihash encoding/decoding
//! - Multibase text encodings (base58btc, base32, base64, ...)
//! - Multicodec content types
//! - Content identifiers (CID v0 and v1)
//!
//! Every registry has a process-wide instance (`global()`) and can also be
//! built standalone (`new()` with the built-ins, `empty()` without) and
//! passed to the `*_with` variants.

pub mod cid;
pub mod hashing;
pub mod multibase;
pub mod multicodec;
pub mod multihash;
pub mod varint;

pub use cid::{Cid, CidBuilder, Registries};
pub use hashing::{DEFAULT_ALGORITHM_NAME, DigestFn, HashingAlgorithm, HashingRegistry};
pub use multibase::{BASE58BTC_PREFIX, MultiBaseAlgorithm, MultiBaseRegistry};
pub use multicodec::{CodecRegistry, DEFAULT_CONTENT_TYPE, MultiCodec};
pub use multihash::MultiHash;

mod error;
pub use error::{MultiformatError, Result};
