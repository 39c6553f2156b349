//! Multicodec content types
//!
//! A multicodec is a numeric code identifying the format of the data a CID
//! points to, paired with a human readable name.
//!
//! See: <https://github.com/multiformats/multicodec>

use std::{
    collections::HashMap,
    sync::{LazyLock, PoisonError, RwLock},
};

use tracing::{debug, warn};

use crate::{MultiformatError, error::Result};

// ****************************************************************************
// Codec Magic Numbers
// See: https://github.com/multiformats/multicodec/blob/master/table.csv
// ****************************************************************************
pub const MULTIHASH: u64 = 0x31;
pub const MULTIADDR: u64 = 0x32;
pub const MULTIBASE: u64 = 0x33;
pub const PROTOBUF: u64 = 0x50;
pub const CBOR: u64 = 0x51;
pub const RAW: u64 = 0x55;
pub const DAG_PB: u64 = 0x70;
pub const DAG_CBOR: u64 = 0x71;
pub const LIBP2P_KEY: u64 = 0x72;
pub const GIT_RAW: u64 = 0x78;
pub const DAG_JOSE: u64 = 0x85;
pub const DAG_COSE: u64 = 0x86;
pub const ETH_BLOCK: u64 = 0x90;
pub const ETH_TX: u64 = 0x93;
pub const BITCOIN_BLOCK: u64 = 0xb0;
pub const ZCASH_BLOCK: u64 = 0xc0;
pub const SECP256K1_PUB: u64 = 0xe7;
pub const X25519_PUB: u64 = 0xec;
pub const ED25519_PUB: u64 = 0xed;
pub const DAG_JSON: u64 = 0x0129;
pub const JSON: u64 = 0x0200;

/// Content type used when none is specified
pub const DEFAULT_CONTENT_TYPE: &str = "dag-pb";

/// Prefix of the placeholder name given to unregistered codes
const PLACEHOLDER_PREFIX: &str = "codec-";

/// A registered content type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiCodec {
    pub name: String,
    pub code: u64,
}

#[derive(Default)]
struct Tables {
    by_name: HashMap<String, MultiCodec>,
    by_code: HashMap<u64, MultiCodec>,
    order: Vec<MultiCodec>,
}

/// Registry of content types keyed by name and code
pub struct CodecRegistry {
    tables: RwLock<Tables>,
}

static GLOBAL: LazyLock<CodecRegistry> = LazyLock::new(CodecRegistry::new);

impl CodecRegistry {
    /// Creates a registry with the built-in content types registered
    pub fn new() -> Self {
        let registry = Self::empty();
        for (name, code) in [
            ("multihash", MULTIHASH),
            ("multiaddr", MULTIADDR),
            ("multibase", MULTIBASE),
            ("protobuf", PROTOBUF),
            ("cbor", CBOR),
            ("raw", RAW),
            ("dag-pb", DAG_PB),
            ("dag-cbor", DAG_CBOR),
            ("libp2p-key", LIBP2P_KEY),
            ("git-raw", GIT_RAW),
            ("dag-jose", DAG_JOSE),
            ("dag-cose", DAG_COSE),
            ("eth-block", ETH_BLOCK),
            ("eth-tx", ETH_TX),
            ("bitcoin-block", BITCOIN_BLOCK),
            ("zcash-block", ZCASH_BLOCK),
            ("secp256k1-pub", SECP256K1_PUB),
            ("x25519-pub", X25519_PUB),
            ("ed25519-pub", ED25519_PUB),
            ("dag-json", DAG_JSON),
            ("json", JSON),
        ] {
            // Built-in names and codes are unique
            let _ = registry.register(name, code);
        }
        registry
    }

    /// Creates a registry with nothing registered
    pub fn empty() -> Self {
        CodecRegistry {
            tables: RwLock::new(Tables::default()),
        }
    }

    /// The process-wide registry
    pub fn global() -> &'static CodecRegistry {
        &GLOBAL
    }

    /// Registers a new content type
    pub fn register(&self, name: &str, code: u64) -> Result<MultiCodec> {
        let name = name.trim();
        if name.is_empty() {
            return Err(MultiformatError::Validation(
                "codec name must not be empty".into(),
            ));
        }

        let mut tables = self
            .tables
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if tables.by_name.contains_key(name) {
            warn!("Rejected codec ({name}): name already registered");
            return Err(MultiformatError::Validation(format!(
                "codec '{name}' is already defined"
            )));
        }
        if tables.by_code.contains_key(&code) {
            warn!("Rejected codec ({name}): code 0x{code:x} already registered");
            return Err(MultiformatError::Validation(format!(
                "codec code 0x{code:x} is already defined"
            )));
        }

        let codec = MultiCodec {
            name: name.to_string(),
            code,
        };
        tables.by_name.insert(codec.name.clone(), codec.clone());
        tables.by_code.insert(code, codec.clone());
        tables.order.push(codec.clone());
        debug!("Registered codec ({name}) code(0x{code:x})");

        Ok(codec)
    }

    /// Finds a content type by name
    pub fn lookup(&self, name: &str) -> Result<MultiCodec> {
        let tables = self
            .tables
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        tables
            .by_name
            .get(name)
            .cloned()
            .ok_or_else(|| MultiformatError::NotFound(format!("codec '{name}' is not defined")))
    }

    /// Finds a content type by code
    pub fn lookup_code(&self, code: u64) -> Result<MultiCodec> {
        let tables = self
            .tables
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        tables
            .by_code
            .get(&code)
            .cloned()
            .ok_or_else(|| MultiformatError::NotFound(format!("codec 0x{code:x} is not defined")))
    }

    /// Snapshot of every registered content type
    pub fn all(&self) -> Vec<MultiCodec> {
        self.tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .order
            .clone()
    }

    /// Name for a code, or the placeholder `codec-<n>` when it is not registered
    ///
    /// Unknown codes survive a decode/encode round trip through the placeholder.
    pub fn name_for_code(&self, code: u64) -> String {
        match self.lookup_code(code) {
            Ok(codec) => codec.name,
            Err(_) => format!("{PLACEHOLDER_PREFIX}{code}"),
        }
    }

    /// Code for a name, accepting the `codec-<n>` placeholder
    pub fn code_for_name(&self, name: &str) -> Result<u64> {
        match self.lookup(name) {
            Ok(codec) => Ok(codec.code),
            Err(e) => name
                .strip_prefix(PLACEHOLDER_PREFIX)
                .and_then(|code| code.parse::<u64>().ok())
                .ok_or(e),
        }
    }

    /// The single spelling a content type is stored and compared under
    ///
    /// A placeholder naming a registered code resolves to that codec's name
    /// (`codec-85` becomes `raw`), and leading zeros are dropped from the rest.
    pub fn canonical_name(&self, name: &str) -> Result<String> {
        Ok(self.name_for_code(self.code_for_name(name)?))
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins() {
        let registry = CodecRegistry::global();
        assert_eq!(registry.lookup("raw").unwrap().code, 0x55);
        assert_eq!(registry.lookup("dag-pb").unwrap().code, 0x70);
        assert_eq!(registry.lookup_code(0x0129).unwrap().name, "dag-json");
    }

    #[test]
    fn unknown_codes_use_placeholder() {
        let registry = CodecRegistry::global();
        assert_eq!(registry.name_for_code(32767), "codec-32767");
        assert_eq!(registry.code_for_name("codec-32767").unwrap(), 32767);
        assert!(matches!(
            registry.code_for_name("unknown").unwrap_err(),
            MultiformatError::NotFound(_)
        ));
        assert!(matches!(
            registry.code_for_name("codec-x").unwrap_err(),
            MultiformatError::NotFound(_)
        ));
    }

    #[test]
    fn canonical_names() {
        let registry = CodecRegistry::global();
        assert_eq!(registry.canonical_name("raw").unwrap(), "raw");
        assert_eq!(registry.canonical_name("codec-85").unwrap(), "raw");
        assert_eq!(registry.canonical_name("codec-0085").unwrap(), "raw");
        assert_eq!(registry.canonical_name("codec-032767").unwrap(), "codec-32767");
        assert!(matches!(
            registry.canonical_name("unknown").unwrap_err(),
            MultiformatError::NotFound(_)
        ));
    }

    #[test]
    fn poisoned_lock_is_recovered() {
        let registry = CodecRegistry::new();
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = registry.tables.write().unwrap();
            panic!("writer died holding the lock");
        }));
        assert!(registry.tables.is_poisoned());

        assert_eq!(registry.lookup("raw").unwrap().code, RAW);
        assert_eq!(registry.lookup_code(DAG_PB).unwrap().name, "dag-pb");
        assert!(!registry.all().is_empty());
        registry.register("after-poison", 0x300001).unwrap();
        assert_eq!(registry.name_for_code(0x300001), "after-poison");
    }

    #[test]
    fn duplicates_rejected() {
        let registry = CodecRegistry::new();
        assert!(matches!(
            registry.register("raw", 0x300000).unwrap_err(),
            MultiformatError::Validation(_)
        ));
        assert!(matches!(
            registry.register("raw-2", RAW).unwrap_err(),
            MultiformatError::Validation(_)
        ));
        assert!(matches!(
            registry.register(" ", 0x300000).unwrap_err(),
            MultiformatError::Validation(_)
        ));
    }

    #[test]
    fn isolated_registry() {
        let registry = CodecRegistry::empty();
        registry.register("my-format", 0x300000).unwrap();
        assert_eq!(registry.all().len(), 1);
        assert_eq!(registry.name_for_code(0x300000), "my-format");
        assert!(CodecRegistry::global().lookup("my-format").is_err());
    }
}
