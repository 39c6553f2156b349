//! Multibase encoding/decoding
//!
//! Multibase is a protocol for self-describing base encodings.
//! The first character indicates the encoding used.
//!
//! See: <https://github.com/multiformats/multibase>

use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, LazyLock, PoisonError, RwLock},
};

use multibase::Base;
use tracing::{debug, warn};

use crate::{MultiformatError, error::Result};

/// Multibase prefix for base58btc (Bitcoin alphabet)
pub const BASE58BTC_PREFIX: char = 'z';

/// Multibase prefix for the identity (no-op) encoding
pub const IDENTITY_PREFIX: char = '\0';

pub type EncodeFn = Arc<dyn Fn(&[u8]) -> Result<String> + Send + Sync>;
pub type DecodeFn = Arc<dyn Fn(&str) -> Result<Vec<u8>> + Send + Sync>;

/// A registered multibase encoding
#[derive(Clone)]
pub struct MultiBaseAlgorithm {
    name: String,
    code: char,
    encoder: EncodeFn,
    decoder: DecodeFn,
}

impl MultiBaseAlgorithm {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Prefix character
    pub fn code(&self) -> char {
        self.code
    }

    /// Encodes `bytes` without the prefix character
    pub fn encode_body(&self, bytes: &[u8]) -> Result<String> {
        (self.encoder)(bytes)
    }

    /// Decodes text that has already had its prefix character removed
    pub fn decode_body(&self, text: &str) -> Result<Vec<u8>> {
        (self.decoder)(text)
    }
}

impl fmt::Debug for MultiBaseAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiBaseAlgorithm")
            .field("name", &self.name)
            .field("code", &self.code)
            .finish()
    }
}

#[derive(Default)]
struct Tables {
    by_name: HashMap<String, Arc<MultiBaseAlgorithm>>,
    by_code: HashMap<char, Arc<MultiBaseAlgorithm>>,
    order: Vec<Arc<MultiBaseAlgorithm>>,
}

/// Registry of multibase encodings keyed by name and prefix character
pub struct MultiBaseRegistry {
    tables: RwLock<Tables>,
}

static GLOBAL: LazyLock<MultiBaseRegistry> = LazyLock::new(MultiBaseRegistry::new);

fn base_codec(base: Base) -> (EncodeFn, DecodeFn) {
    (
        Arc::new(move |bytes: &[u8]| -> Result<String> { Ok(base.encode(bytes)) }),
        Arc::new(move |text: &str| {
            base.decode(text)
                .map_err(|e| MultiformatError::Format(format!("invalid {base:?} body: {e}")))
        }),
    )
}

fn identity_codec() -> (EncodeFn, DecodeFn) {
    (
        Arc::new(|bytes: &[u8]| {
            String::from_utf8(bytes.to_vec()).map_err(|e| {
                MultiformatError::Format(format!("identity multibase requires UTF-8: {e}"))
            })
        }),
        Arc::new(|text: &str| -> Result<Vec<u8>> { Ok(text.as_bytes().to_vec()) }),
    )
}

impl MultiBaseRegistry {
    /// Creates a registry with the built-in encodings registered
    pub fn new() -> Self {
        let registry = Self::empty();
        registry.register_builtins();
        registry
    }

    /// Creates a registry with nothing registered
    pub fn empty() -> Self {
        MultiBaseRegistry {
            tables: RwLock::new(Tables::default()),
        }
    }

    /// The process-wide registry
    pub fn global() -> &'static MultiBaseRegistry {
        &GLOBAL
    }

    fn register_builtins(&self) {
        let (encoder, decoder) = identity_codec();
        let _ = self.register("identity", IDENTITY_PREFIX, encoder, decoder);

        let builtins = [
            ("base2", Base::Base2),
            ("base8", Base::Base8),
            ("base10", Base::Base10),
            ("base16", Base::Base16Lower),
            ("base16upper", Base::Base16Upper),
            ("base32hex", Base::Base32HexLower),
            ("base32hexupper", Base::Base32HexUpper),
            ("base32hexpad", Base::Base32HexPadLower),
            ("base32hexpadupper", Base::Base32HexPadUpper),
            ("base32", Base::Base32Lower),
            ("base32upper", Base::Base32Upper),
            ("base32pad", Base::Base32PadLower),
            ("base32padupper", Base::Base32PadUpper),
            ("base32z", Base::Base32Z),
            ("base36", Base::Base36Lower),
            ("base36upper", Base::Base36Upper),
            ("base58flickr", Base::Base58Flickr),
            ("base58btc", Base::Base58Btc),
            ("base64", Base::Base64),
            ("base64pad", Base::Base64Pad),
            ("base64url", Base::Base64Url),
            ("base64urlpad", Base::Base64UrlPad),
        ];

        for (name, base) in builtins {
            let (encoder, decoder) = base_codec(base);
            // Built-in names and prefixes are unique
            let _ = self.register(name, base.code(), encoder, decoder);
        }
    }

    /// Registers a new multibase encoding
    ///
    /// # Arguments
    /// * `name` - Unique name
    /// * `code` - Unique prefix character
    /// * `encoder` - Encodes bytes to the body text (no prefix)
    /// * `decoder` - Decodes the body text (no prefix)
    pub fn register(
        &self,
        name: &str,
        code: char,
        encoder: EncodeFn,
        decoder: DecodeFn,
    ) -> Result<Arc<MultiBaseAlgorithm>> {
        let name = name.trim();
        if name.is_empty() {
            return Err(MultiformatError::Validation(
                "multibase name must not be empty".into(),
            ));
        }

        let mut tables = self
            .tables
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if tables.by_name.contains_key(name) {
            warn!("Rejected multibase ({name}): name already registered");
            return Err(MultiformatError::Validation(format!(
                "multibase '{name}' is already defined"
            )));
        }
        if tables.by_code.contains_key(&code) {
            warn!("Rejected multibase ({name}): prefix {code:?} already registered");
            return Err(MultiformatError::Validation(format!(
                "multibase prefix {code:?} is already defined"
            )));
        }

        let algorithm = Arc::new(MultiBaseAlgorithm {
            name: name.to_string(),
            code,
            encoder,
            decoder,
        });
        tables.by_name.insert(name.to_string(), algorithm.clone());
        tables.by_code.insert(code, algorithm.clone());
        tables.order.push(algorithm.clone());
        debug!("Registered multibase ({name}) prefix({code:?})");

        Ok(algorithm)
    }

    /// Finds an encoding by name
    pub fn lookup(&self, name: &str) -> Result<Arc<MultiBaseAlgorithm>> {
        let tables = self
            .tables
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        tables
            .by_name
            .get(name)
            .cloned()
            .ok_or_else(|| MultiformatError::NotFound(format!("multibase '{name}' is not defined")))
    }

    /// Finds an encoding by its prefix character
    pub fn lookup_code(&self, code: char) -> Result<Arc<MultiBaseAlgorithm>> {
        let tables = self
            .tables
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        tables.by_code.get(&code).cloned().ok_or_else(|| {
            MultiformatError::NotFound(format!("multibase prefix {code:?} is not defined"))
        })
    }

    /// Snapshot of every registered encoding
    pub fn all(&self) -> Vec<Arc<MultiBaseAlgorithm>> {
        self.tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .order
            .clone()
    }

    /// Encodes `bytes` with the named encoding, prefix character included
    pub fn encode(&self, bytes: &[u8], name: &str) -> Result<String> {
        let algorithm = self.lookup(name)?;
        let body = algorithm.encode_body(bytes)?;
        let mut text = String::with_capacity(body.len() + 1);
        text.push(algorithm.code());
        text.push_str(&body);
        Ok(text)
    }

    /// Decodes multibase text, returning the encoding used and the bytes
    pub fn decode(&self, text: &str) -> Result<(Arc<MultiBaseAlgorithm>, Vec<u8>)> {
        let mut chars = text.chars();
        let Some(code) = chars.next() else {
            return Err(MultiformatError::Format(
                "multibase text must not be empty".into(),
            ));
        };
        let algorithm = self
            .lookup_code(code)
            .map_err(|_| MultiformatError::Format(format!("unknown multibase prefix {code:?}")))?;
        let bytes = algorithm.decode_body(chars.as_str())?;
        Ok((algorithm, bytes))
    }
}

impl Default for MultiBaseRegistry {
    fn default() -> Self {
        Self::new()
    }
}
