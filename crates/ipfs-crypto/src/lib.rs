//! Key envelopes and key pairs for IPFS clients
//!
//! This crate provides:
//! - Private and public key envelopes in the libp2p key protobuf framing
//! - Key pairs for RSA, Ed25519 and secp256k1 with lazily derived public keys
//! - Signing and signature verification
//! - Key generation

mod ed25519;
mod envelope;
mod error;
mod key_type;
mod keypair;
mod rsa;
mod secp256k1;

pub use envelope::{PrivateKey, PublicKey};
pub use error::{CryptoError, Result};
pub use key_type::KeyType;
pub use keypair::{KeyPair, SigningAlgorithm};
