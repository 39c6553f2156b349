//! Hashing algorithm registry
//!
//! Maps a multihash algorithm name (and any aliases) to its numeric code,
//! digest size and the function that computes the digest.
//!
//! See: <https://github.com/multiformats/multicodec/blob/master/table.csv>

use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, LazyLock, PoisonError, RwLock},
};

use blake2::{Blake2b512, Blake2s256, Blake2b, digest::consts::U32};
use sha2::Digest;
use tracing::{debug, warn};

use crate::{MultiformatError, error::Result};

// ****************************************************************************
// Hash Algorithm Codes
// ****************************************************************************
pub const IDENTITY: u64 = 0x00;
pub const SHA1: u64 = 0x11;
pub const SHA2_256: u64 = 0x12;
pub const SHA2_512: u64 = 0x13;
pub const SHA3_512: u64 = 0x14;
pub const SHA3_384: u64 = 0x15;
pub const SHA3_256: u64 = 0x16;
pub const SHA3_224: u64 = 0x17;
pub const KECCAK_224: u64 = 0x1a;
pub const KECCAK_256: u64 = 0x1b;
pub const KECCAK_384: u64 = 0x1c;
pub const KECCAK_512: u64 = 0x1d;
pub const DBL_SHA2_256: u64 = 0x56;
pub const MD5: u64 = 0xd5;
pub const BLAKE2B_256: u64 = 0xb220;
pub const BLAKE2B_512: u64 = 0xb240;
pub const BLAKE2S_256: u64 = 0xb260;

/// Name of the algorithm used when none is specified
pub const DEFAULT_ALGORITHM_NAME: &str = "sha2-256";

/// Computes a digest over the input bytes
pub type DigestFn = Arc<dyn Fn(&[u8]) -> Vec<u8> + Send + Sync>;

/// Metadata and digest function of a registered hashing algorithm
#[derive(Clone)]
pub struct HashingAlgorithm {
    name: String,
    code: u64,
    digest_size: usize,
    hasher: DigestFn,
}

impl HashingAlgorithm {
    /// Canonical (lower case) name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Multicodec code
    pub fn code(&self) -> u64 {
        self.code
    }

    /// Size of the digest in bytes, 0 when variable (identity)
    pub fn digest_size(&self) -> usize {
        self.digest_size
    }

    /// Runs the digest function over `data`
    pub fn compute(&self, data: &[u8]) -> Vec<u8> {
        (self.hasher)(data)
    }

    /// Returns true if this is the algorithm used when none is specified
    pub fn is_default(&self) -> bool {
        self.name == DEFAULT_ALGORITHM_NAME
    }
}

impl fmt::Debug for HashingAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashingAlgorithm")
            .field("name", &self.name)
            .field("code", &format_args!("0x{:x}", self.code))
            .field("digest_size", &self.digest_size)
            .finish()
    }
}

impl PartialEq for HashingAlgorithm {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for HashingAlgorithm {}

#[derive(Default)]
struct Tables {
    by_name: HashMap<String, Arc<HashingAlgorithm>>,
    by_code: HashMap<u64, Arc<HashingAlgorithm>>,
    aliases: HashMap<String, String>,
    order: Vec<Arc<HashingAlgorithm>>,
}

/// Registry of hashing algorithms
///
/// Registration is expected to happen at startup; lookups may then be shared
/// freely across threads.
pub struct HashingRegistry {
    tables: RwLock<Tables>,
}

static GLOBAL: LazyLock<HashingRegistry> = LazyLock::new(HashingRegistry::new);

fn normalize(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

fn digest_fn<D: Digest + 'static>() -> DigestFn {
    Arc::new(|data: &[u8]| D::digest(data).to_vec())
}

fn identity_fn() -> DigestFn {
    Arc::new(|data: &[u8]| data.to_vec())
}

fn dbl_sha2_256_fn() -> DigestFn {
    Arc::new(|data: &[u8]| sha2::Sha256::digest(sha2::Sha256::digest(data)).to_vec())
}

impl HashingRegistry {
    /// Creates a registry with the built-in algorithms registered
    pub fn new() -> Self {
        let registry = Self::empty();
        registry.register_builtins();
        registry
    }

    /// Creates a registry with nothing registered
    pub fn empty() -> Self {
        HashingRegistry {
            tables: RwLock::new(Tables::default()),
        }
    }

    /// The process-wide registry
    pub fn global() -> &'static HashingRegistry {
        &GLOBAL
    }

    fn register_builtins(&self) {
        let builtins: Vec<(&str, u64, usize, DigestFn)> = vec![
            ("identity", IDENTITY, 0, identity_fn()),
            ("sha1", SHA1, 20, digest_fn::<sha1::Sha1>()),
            ("sha2-256", SHA2_256, 32, digest_fn::<sha2::Sha256>()),
            ("sha2-512", SHA2_512, 64, digest_fn::<sha2::Sha512>()),
            ("sha3-224", SHA3_224, 28, digest_fn::<sha3::Sha3_224>()),
            ("sha3-256", SHA3_256, 32, digest_fn::<sha3::Sha3_256>()),
            ("sha3-384", SHA3_384, 48, digest_fn::<sha3::Sha3_384>()),
            ("sha3-512", SHA3_512, 64, digest_fn::<sha3::Sha3_512>()),
            ("keccak-224", KECCAK_224, 28, digest_fn::<sha3::Keccak224>()),
            ("keccak-256", KECCAK_256, 32, digest_fn::<sha3::Keccak256>()),
            ("keccak-384", KECCAK_384, 48, digest_fn::<sha3::Keccak384>()),
            ("keccak-512", KECCAK_512, 64, digest_fn::<sha3::Keccak512>()),
            ("blake2b-256", BLAKE2B_256, 32, digest_fn::<Blake2b<U32>>()),
            ("blake2b-512", BLAKE2B_512, 64, digest_fn::<Blake2b512>()),
            ("blake2s-256", BLAKE2S_256, 32, digest_fn::<Blake2s256>()),
            ("md5", MD5, 16, digest_fn::<md5::Md5>()),
            ("dbl-sha2-256", DBL_SHA2_256, 32, dbl_sha2_256_fn()),
        ];

        for (name, code, digest_size, hasher) in builtins {
            // Built-in names and codes are unique
            let _ = self.register(name, code, digest_size, hasher);
        }
        let _ = self.register_alias("id", "identity");
    }

    /// Registers a new hashing algorithm
    ///
    /// # Arguments
    /// * `name` - Unique name, stored in lower case
    /// * `code` - Unique multicodec code
    /// * `digest_size` - Digest length in bytes, 0 for variable length
    /// * `hasher` - Function computing the digest
    pub fn register(
        &self,
        name: &str,
        code: u64,
        digest_size: usize,
        hasher: DigestFn,
    ) -> Result<Arc<HashingAlgorithm>> {
        let name = normalize(name);
        if name.is_empty() {
            return Err(MultiformatError::Validation(
                "hashing algorithm name must not be empty".into(),
            ));
        }

        let mut tables = self
            .tables
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if tables.by_name.contains_key(&name) || tables.aliases.contains_key(&name) {
            warn!("Rejected hashing algorithm ({name}): name already registered");
            return Err(MultiformatError::Validation(format!(
                "hashing algorithm '{name}' is already defined"
            )));
        }
        if tables.by_code.contains_key(&code) {
            warn!("Rejected hashing algorithm ({name}): code 0x{code:x} already registered");
            return Err(MultiformatError::Validation(format!(
                "hashing algorithm code 0x{code:x} is already defined"
            )));
        }

        let algorithm = Arc::new(HashingAlgorithm {
            name: name.clone(),
            code,
            digest_size,
            hasher,
        });
        tables.by_name.insert(name.clone(), algorithm.clone());
        tables.by_code.insert(code, algorithm.clone());
        tables.order.push(algorithm.clone());
        debug!("Registered hashing algorithm ({name}) code(0x{code:x}) size({digest_size})");

        Ok(algorithm)
    }

    /// Registers `alias` as another name for the existing algorithm `target`
    pub fn register_alias(&self, alias: &str, target: &str) -> Result<Arc<HashingAlgorithm>> {
        let alias = normalize(alias);
        if alias.is_empty() {
            return Err(MultiformatError::Validation(
                "hashing algorithm alias must not be empty".into(),
            ));
        }
        let target = normalize(target);
        if target.is_empty() {
            return Err(MultiformatError::Validation(
                "hashing algorithm alias target must not be empty".into(),
            ));
        }

        let mut tables = self
            .tables
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if tables.by_name.contains_key(&alias) || tables.aliases.contains_key(&alias) {
            return Err(MultiformatError::Validation(format!(
                "hashing algorithm alias '{alias}' is already defined"
            )));
        }
        // Aliases always point at a canonical name, never at another alias
        let canonical = tables.aliases.get(&target).cloned().unwrap_or(target);
        let Some(algorithm) = tables.by_name.get(&canonical).cloned() else {
            return Err(MultiformatError::Validation(format!(
                "hashing algorithm alias target '{canonical}' is not defined"
            )));
        };

        tables.aliases.insert(alias.clone(), canonical.clone());
        debug!("Registered hashing algorithm alias ({alias}) -> ({canonical})");

        Ok(algorithm)
    }

    /// Finds an algorithm by its name or alias
    pub fn lookup(&self, name: &str) -> Result<Arc<HashingAlgorithm>> {
        let name = normalize(name);
        let tables = self
            .tables
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        let canonical = tables.aliases.get(&name).unwrap_or(&name);
        tables.by_name.get(canonical).cloned().ok_or_else(|| {
            MultiformatError::NotFound(format!("hashing algorithm '{name}' is not defined"))
        })
    }

    /// Finds an algorithm by its multicodec code
    pub fn lookup_code(&self, code: u64) -> Result<Arc<HashingAlgorithm>> {
        let tables = self
            .tables
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        tables.by_code.get(&code).cloned().ok_or_else(|| {
            MultiformatError::NotFound(format!("hashing algorithm code 0x{code:x} is not defined"))
        })
    }

    /// The algorithm used when none is specified
    pub fn default_algorithm(&self) -> Result<Arc<HashingAlgorithm>> {
        self.lookup(DEFAULT_ALGORITHM_NAME)
    }

    /// Snapshot of every registered algorithm
    pub fn all(&self) -> Vec<Arc<HashingAlgorithm>> {
        self.tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .order
            .clone()
    }
}

impl Default for HashingRegistry {
    fn default() -> Self {
        Self::new()
    }
}
