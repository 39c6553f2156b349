//! Content identifiers (CID)
//!
//! A CID composes a multihash, a content type (multicodec) and a text
//! encoding (multibase) into one immutable value.
//!
//! Two wire formats exist:
//! - v0: the bare base58btc multihash (`Qm...`), binary form is the multihash itself
//! - v1: `multibase(varint(version) || varint(content type) || multihash)`
//!
//! See: <https://github.com/multiformats/cid>

use std::{
    hash::{Hash, Hasher},
    io::{Read, Write},
    str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de, ser};
use tracing::debug;

use crate::{
    CodecRegistry, HashingRegistry, MultiBaseRegistry, MultiHash, MultiformatError,
    error::Result, multicodec::DEFAULT_CONTENT_TYPE, varint,
};

/// Encoding of every v0 CID
pub const V0_ENCODING: &str = "base58btc";

/// Encoding given to v1 CIDs when none is specified
pub const V1_DEFAULT_ENCODING: &str = "base32";

/// Length of a v0 CID string (base58btc of a 34 byte sha2-256 multihash)
const V0_STRING_LENGTH: usize = 46;

/// The registries a CID is encoded and decoded against
#[derive(Clone, Copy)]
pub struct Registries<'a> {
    pub hashing: &'a HashingRegistry,
    pub codecs: &'a CodecRegistry,
    pub bases: &'a MultiBaseRegistry,
}

impl Registries<'static> {
    /// The process-wide registries
    pub fn global() -> Self {
        Registries {
            hashing: HashingRegistry::global(),
            codecs: CodecRegistry::global(),
            bases: MultiBaseRegistry::global(),
        }
    }
}

/// Content identifier
///
/// Built once through [`CidBuilder`], by decoding, or from a [`MultiHash`];
/// there are no setters afterwards.
#[derive(Debug, Clone)]
pub struct Cid {
    version: u64,
    content_type: String,
    encoding: String,
    hash: MultiHash,
}

impl Cid {
    /// Returns a builder for `Cid`
    /// Example:
    /// ```
    /// use ipfs_multiformats::Cid;
    ///
    /// let cid = Cid::builder()
    ///     .content_type("raw")
    ///     .hash("QmaozNR7DZHQK1ZcU9p7QdrshMvXqWK6gpu5rmrkPdT3L4".parse().unwrap())
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(cid.version(), 1);
    /// ```
    pub fn builder() -> CidBuilder {
        CidBuilder::default()
    }

    /// v0 for a default-algorithm hash, otherwise v1 with base32
    pub fn from_multihash(hash: MultiHash) -> Self {
        let (version, encoding) = if hash.is_default_algorithm() {
            (0, V0_ENCODING)
        } else {
            (1, V1_DEFAULT_ENCODING)
        };

        Cid {
            version,
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            encoding: encoding.to_string(),
            hash,
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Content type (multicodec) name
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Multibase name used by the string form
    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    pub fn hash(&self) -> &MultiHash {
        &self.hash
    }

    /// String form against the global registries
    pub fn encode(&self) -> Result<String> {
        self.encode_with(&Registries::global())
    }

    /// String form
    ///
    /// Fails with `NotFound` if the content type or encoding is not registered.
    pub fn encode_with(&self, registries: &Registries) -> Result<String> {
        if self.version == 0 {
            return Ok(self.hash.to_base58());
        }

        let bytes = self.to_bytes_with(registries)?;
        registries.bases.encode(&bytes, &self.encoding)
    }

    /// Binary form against the global registries
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.to_bytes_with(&Registries::global())
    }

    /// Binary form; v0 is the multihash alone
    pub fn to_bytes_with(&self, registries: &Registries) -> Result<Vec<u8>> {
        if self.version == 0 {
            return Ok(self.hash.to_bytes());
        }

        let codec = registries.codecs.code_for_name(&self.content_type)?;
        let hash = self.hash.to_bytes();
        let mut bytes = Vec::with_capacity(hash.len() + 8);
        varint::encode_u64(self.version, &mut bytes);
        varint::encode_u64(codec, &mut bytes);
        bytes.extend_from_slice(&hash);
        Ok(bytes)
    }

    /// Decodes the string form against the global registries
    pub fn decode(s: &str) -> Result<Self> {
        Self::decode_with(&Registries::global(), s)
    }

    /// Decodes the string form
    ///
    /// A 46 character `Qm...` string is a v0 CID; anything else must be a
    /// multibase encoded v1 CID.
    pub fn decode_with(registries: &Registries, s: &str) -> Result<Self> {
        if s.len() == V0_STRING_LENGTH && s.starts_with("Qm") {
            let bytes = bs58::decode(s)
                .into_vec()
                .map_err(|e| MultiformatError::Format(format!("invalid v0 CID '{s}': {e}")))?;
            let hash = MultiHash::from_bytes_with(registries.hashing, &bytes)?;
            return Self::v0(hash);
        }

        let (base, bytes) = registries.bases.decode(s)?;
        let (version, rest) = varint::decode_u64(&bytes)?;
        if version != 1 {
            return Err(MultiformatError::Format(format!(
                "unsupported CID version {version}"
            )));
        }
        Self::v1_from_tail(registries, rest, base.name())
    }

    /// Null-propagating decode: `None` in, `None` out
    pub fn decode_optional(s: Option<&str>) -> Result<Option<Self>> {
        s.map(Self::decode).transpose()
    }

    /// Null-propagating encode: `None` in, `None` out
    pub fn encode_optional(cid: Option<&Self>) -> Result<Option<String>> {
        cid.map(Self::encode).transpose()
    }

    /// Decodes the binary form against the global registries
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes_with(&Registries::global(), bytes)
    }

    /// Decodes the binary form
    ///
    /// A leading varint of 1 marks a v1 CID. Any other value except 0 is the
    /// hash code of a bare v0 multihash. No hashing algorithm may use code 1,
    /// and code 0 (identity) can never be a v0 hash.
    pub fn from_bytes_with(registries: &Registries, bytes: &[u8]) -> Result<Self> {
        let (first, rest) = varint::decode_u64(bytes)?;
        match first {
            0 => Err(MultiformatError::Format(
                "CID version 0 has no explicit version prefix".into(),
            )),
            1 => Self::v1_from_tail(registries, rest, V1_DEFAULT_ENCODING),
            _ => Self::v0(MultiHash::from_bytes_with(registries.hashing, bytes)?),
        }
    }

    /// Writes the binary form to a stream
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        self.write_to_with(&Registries::global(), writer)
    }

    pub fn write_to_with<W: Write>(&self, registries: &Registries, writer: &mut W) -> Result<()> {
        writer.write_all(&self.to_bytes_with(registries)?)?;
        Ok(())
    }

    /// Reads a binary CID from a stream, consuming only its bytes
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        Self::read_from_with(&Registries::global(), reader)
    }

    pub fn read_from_with<R: Read>(registries: &Registries, reader: &mut R) -> Result<Self> {
        match varint::read_u64(reader)? {
            0 => Err(MultiformatError::Format(
                "CID version 0 has no explicit version prefix".into(),
            )),
            1 => {
                let codec = varint::read_u64(reader)?;
                let hash = MultiHash::read_from_with(registries.hashing, reader)?;
                Ok(Cid {
                    version: 1,
                    content_type: registries.codecs.name_for_code(codec),
                    encoding: V1_DEFAULT_ENCODING.to_string(),
                    hash,
                })
            }
            code => Self::v0(MultiHash::read_after_code(registries.hashing, code, reader)?),
        }
    }

    /// Formats the CID against the global registries
    pub fn format(&self, format: &str) -> Result<String> {
        self.format_with(&Registries::global(), format)
    }

    /// Formats the CID
    ///
    /// * `G` - the string form
    /// * `L` - `<encoding> cidv<version> <content type> <hash algorithm> <hash>`
    pub fn format_with(&self, registries: &Registries, format: &str) -> Result<String> {
        match format {
            "G" => self.encode_with(registries),
            "L" => {
                let base = registries.bases.lookup(&self.encoding)?;
                Ok(format!(
                    "{} cidv{} {} {} {}",
                    self.encoding,
                    self.version,
                    self.content_type,
                    self.hash.algorithm().name(),
                    base.encode_body(&self.hash.to_bytes())?
                ))
            }
            other => Err(MultiformatError::Format(format!(
                "unknown CID format '{other}', expected 'G' or 'L'"
            ))),
        }
    }

    fn v0(hash: MultiHash) -> Result<Self> {
        if !hash.is_default_algorithm() {
            return Err(MultiformatError::Format(format!(
                "a v0 CID requires a sha2-256 hash, got {}",
                hash.algorithm().name()
            )));
        }
        Ok(Cid {
            version: 0,
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            encoding: V0_ENCODING.to_string(),
            hash,
        })
    }

    fn v1_from_tail(registries: &Registries, tail: &[u8], encoding: &str) -> Result<Self> {
        let (codec, hash) = varint::decode_u64(tail)?;
        let hash = MultiHash::from_bytes_with(registries.hashing, hash)?;
        Ok(Cid {
            version: 1,
            content_type: registries.codecs.name_for_code(codec),
            encoding: encoding.to_string(),
            hash,
        })
    }
}

impl PartialEq for Cid {
    /// Same version, content type and multihash, i.e. the same binary form.
    /// The text encoding is not part of the identity.
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version
            && self.content_type == other.content_type
            && self.hash == other.hash
    }
}

impl Eq for Cid {}

impl Hash for Cid {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.version.hash(state);
        self.content_type.hash(state);
        self.hash.hash(state);
    }
}

impl From<MultiHash> for Cid {
    fn from(hash: MultiHash) -> Self {
        Cid::from_multihash(hash)
    }
}

impl FromStr for Cid {
    type Err = MultiformatError;

    fn from_str(s: &str) -> Result<Self> {
        Cid::decode(s)
    }
}

impl TryFrom<&str> for Cid {
    type Error = MultiformatError;

    fn try_from(s: &str) -> Result<Self> {
        Cid::decode(s)
    }
}

impl TryFrom<&Cid> for String {
    type Error = MultiformatError;

    fn try_from(cid: &Cid) -> Result<Self> {
        cid.encode()
    }
}

impl Serialize for Cid {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode().map_err(ser::Error::custom)?)
    }
}

impl<'de> Deserialize<'de> for Cid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Cid::decode(&s).map_err(de::Error::custom)
    }
}

/// Builder for `Cid`
///
/// Every field may be assigned once; a second assignment makes `build()` fail.
#[derive(Default)]
pub struct CidBuilder {
    version: Option<u64>,
    content_type: Option<String>,
    encoding: Option<String>,
    hash: Option<MultiHash>,
    reassigned: Option<&'static str>,
}

impl CidBuilder {
    pub fn new() -> Self {
        CidBuilder::default()
    }

    fn assign<T>(
        slot: &mut Option<T>,
        value: T,
        field: &'static str,
        reassigned: &mut Option<&'static str>,
    ) {
        if slot.replace(value).is_some() && reassigned.is_none() {
            *reassigned = Some(field);
        }
    }

    /// Requested version, a version of 0 is promoted to 1 when v0 cannot hold the CID
    pub fn version(mut self, version: u64) -> Self {
        Self::assign(&mut self.version, version, "version", &mut self.reassigned);
        self
    }

    /// Content type name, defaults to `dag-pb`
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        Self::assign(
            &mut self.content_type,
            content_type.into(),
            "content type",
            &mut self.reassigned,
        );
        self
    }

    /// Multibase name, defaults to `base58btc` for v0 and `base32` otherwise
    pub fn encoding(mut self, encoding: impl Into<String>) -> Self {
        Self::assign(
            &mut self.encoding,
            encoding.into(),
            "encoding",
            &mut self.reassigned,
        );
        self
    }

    pub fn hash(mut self, hash: MultiHash) -> Self {
        Self::assign(&mut self.hash, hash, "hash", &mut self.reassigned);
        self
    }

    /// Build the `Cid` from the builder against the global registries
    pub fn build(self) -> Result<Cid> {
        self.build_with(&Registries::global())
    }

    /// Build the `Cid` from the builder
    ///
    /// A content type naming a registered code is stored under its canonical
    /// name, so `codec-85` and `raw` build the same CID. Unknown content type
    /// and encoding names are only rejected when the CID is encoded.
    pub fn build_with(self, registries: &Registries) -> Result<Cid> {
        if let Some(field) = self.reassigned {
            return Err(MultiformatError::UnsupportedOperation(format!(
                "the CID {field} can only be set once"
            )));
        }
        let Some(hash) = self.hash else {
            return Err(MultiformatError::Validation("a CID requires a hash".into()));
        };

        let content_type = self
            .content_type
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
        let content_type = match registries.codecs.canonical_name(&content_type) {
            Ok(canonical) => canonical,
            Err(_) => content_type,
        };

        let v0_allowed = content_type == DEFAULT_CONTENT_TYPE
            && self.encoding.as_deref().is_none_or(|e| e == V0_ENCODING)
            && hash.is_default_algorithm();

        let version = match self.version {
            Some(version) if version != 0 => version,
            _ if v0_allowed => 0,
            requested => {
                if requested == Some(0) {
                    debug!("CID version 0 cannot hold ({content_type}) content, promoting to 1");
                }
                1
            }
        };

        let encoding = self.encoding.unwrap_or_else(|| {
            if version == 0 {
                V0_ENCODING.to_string()
            } else {
                V1_DEFAULT_ENCODING.to_string()
            }
        });

        Ok(Cid {
            version,
            content_type,
            encoding,
            hash,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    const V0_HASH: &str = "QmXg9Pp2ytZ14xgmQjYEiHjVjMFXzCVVEcRTWJBmLgR39V";
    const RAW_HASH: &str = "QmaozNR7DZHQK1ZcU9p7QdrshMvXqWK6gpu5rmrkPdT3L4";
    const RAW_V1: &str = "zb2rhj7crUKTQYRGCRATFaQ6YFLTde2YzdqbbhAASkL9uRDXn";
    const SHA512_V1: &str = "zBunRGrmCGokA1oMESGGTfrtcMFsVA8aEtcNzM54akPWXF97uXCqTjF3GZ9v8YzxHrG66J8QhtPFWwZebRZ2zeUEELu67";

    fn mh(s: &str) -> MultiHash {
        s.parse().unwrap()
    }

    #[test]
    fn default_is_v0() {
        let cid = Cid::builder().hash(mh(V0_HASH)).build().unwrap();
        assert_eq!(cid.version(), 0);
        assert_eq!(cid.content_type(), "dag-pb");
        assert_eq!(cid.encoding(), "base58btc");
        assert_eq!(cid.encode().unwrap(), V0_HASH);
    }

    #[test]
    fn explicit_v0_fields() {
        let cid = Cid::builder()
            .content_type("dag-pb")
            .encoding("base58btc")
            .hash(mh(V0_HASH))
            .build()
            .unwrap();
        assert_eq!(cid.version(), 0);
        assert_eq!(cid.encode().unwrap(), V0_HASH);
    }

    #[test]
    fn encode_v1() {
        let cid = Cid::builder()
            .version(1)
            .content_type("raw")
            .encoding("base58btc")
            .hash(mh(RAW_HASH))
            .build()
            .unwrap();
        assert_eq!(cid.encode().unwrap(), RAW_V1);
    }

    #[test]
    fn upgrade_to_v1_content_type() {
        let cid = Cid::builder()
            .content_type("raw")
            .hash(mh(RAW_HASH))
            .build()
            .unwrap();
        assert_eq!(cid.version(), 1);
        assert_eq!(cid.encoding(), "base32");
        assert_eq!(
            cid.encode().unwrap(),
            "bafkreifzjut3te2nhyekklss27nh3k72ysco7y32koao5eei66wof36n5e"
        );
    }

    #[test]
    fn upgrade_to_v1_encoding() {
        let cid = Cid::builder()
            .encoding("base64")
            .hash(mh(RAW_HASH))
            .build()
            .unwrap();
        assert_eq!(cid.version(), 1);
        assert_eq!(
            cid.encode().unwrap(),
            "mAXASILlNJ7mTTT4IpS5S19p9q/rEhO/jelOA7pCI96zi783p"
        );
    }

    #[test]
    fn upgrade_to_v1_hash() {
        let hash = MultiHash::compute_with_algorithm(b"Hello, world.", "sha2-512").unwrap();
        let cid = Cid::builder().hash(hash).build().unwrap();
        assert_eq!(cid.version(), 1);
        assert_eq!(cid.encoding(), "base32");
        assert_eq!(
            cid.encode().unwrap(),
            "bafybgqfnbq34ghljwmk7hka7cpem3zybbffnsfzfxinq3qyztsuxcntbxaua23xx42hrgptcchrolkndcucelv3pc4eoarjbwdxagtylboxsm"
        );
    }

    #[test]
    fn requested_v0_is_promoted() {
        let cid = Cid::builder()
            .version(0)
            .content_type("raw")
            .hash(mh(RAW_HASH))
            .build()
            .unwrap();
        assert_eq!(cid.version(), 1);
    }

    #[test]
    fn unknown_names_fail_at_encode() {
        let cid = Cid::builder()
            .version(1)
            .content_type("unknown")
            .encoding("base58btc")
            .hash(mh(RAW_HASH))
            .build()
            .unwrap();
        assert!(matches!(
            cid.encode().unwrap_err(),
            MultiformatError::NotFound(_)
        ));

        let cid = Cid::builder()
            .version(1)
            .content_type("raw")
            .encoding("unknown")
            .hash(mh(RAW_HASH))
            .build()
            .unwrap();
        assert!(matches!(
            cid.encode().unwrap_err(),
            MultiformatError::NotFound(_)
        ));
    }

    #[test]
    fn multihash_to_cid() {
        let cid = Cid::from(mh(V0_HASH));
        assert_eq!(cid.version(), 0);
        assert_eq!(cid.content_type(), "dag-pb");
        assert_eq!(cid.encoding(), "base58btc");
        assert_eq!(cid.hash(), &mh(V0_HASH));

        let hash = MultiHash::compute_with_algorithm(b"Hello, world.", "sha2-512").unwrap();
        let cid = Cid::from(hash.clone());
        assert_eq!(cid.version(), 1);
        assert_eq!(cid.content_type(), "dag-pb");
        assert_eq!(cid.encoding(), "base32");
        assert_eq!(cid.hash(), &hash);
    }

    #[test]
    fn decode_v0() {
        let cid = Cid::decode(V0_HASH).unwrap();
        assert_eq!(cid.version(), 0);
        assert_eq!(cid.content_type(), "dag-pb");
        assert_eq!(cid.encoding(), "base58btc");
        assert_eq!(cid.encode().unwrap(), V0_HASH);
    }

    #[test]
    fn decode_v1() {
        let cid: Cid = RAW_V1.parse().unwrap();
        assert_eq!(cid.version(), 1);
        assert_eq!(cid.encoding(), "base58btc");
        assert_eq!(cid.content_type(), "raw");
        assert_eq!(cid.hash().to_base58(), RAW_HASH);
        assert_eq!(String::try_from(&cid).unwrap(), RAW_V1);
    }

    #[test]
    fn decode_unknown_content_type() {
        let id = "zJAFhtPN28kqMxDkZawWCCL52BzaiymqFgX3LA7XzkNRMNAN1T1J";
        let cid = Cid::decode(id).unwrap();
        assert_eq!(cid.version(), 1);
        assert_eq!(cid.encoding(), "base58btc");
        assert_eq!(cid.content_type(), "codec-32767");
        assert_eq!(cid.hash().to_base58(), RAW_HASH);
        // the unknown code survives re-encoding
        assert_eq!(cid.encode().unwrap(), id);
    }

    #[test]
    fn decode_errors() {
        for bad in [
            "QmXg9Pp2ytZ14xgmQjYEiHjVjMFXzCVVEcRTWJBmLgR39?",
            "zb2rhj7crUKTQYRGCRATFaQ6YFLTde2YzdqbbhAASkL9uRDX?",
            "?",
            "",
        ] {
            assert!(
                matches!(Cid::decode(bad).unwrap_err(), MultiformatError::Format(_)),
                "{bad} should not decode"
            );
        }
    }

    #[test]
    fn decode_invalid_version() {
        let cid = Cid::builder()
            .version(32767)
            .content_type("raw")
            .encoding("base58btc")
            .hash(mh(RAW_HASH))
            .build()
            .unwrap();
        let s = cid.encode().unwrap();
        assert!(matches!(
            Cid::decode(&s).unwrap_err(),
            MultiformatError::Format(_)
        ));
    }

    #[test]
    fn value_equality() {
        let a0 = Cid::decode(RAW_V1).unwrap();
        let a1 = Cid::decode(RAW_V1).unwrap();
        let b = Cid::decode("QmaozNR7DZHQK1ZcU9p7QdrshMvXqWK6gpu5rmrkPdT3L5").unwrap();

        assert_eq!(a0, a0);
        assert_eq!(a0, a1);
        assert_ne!(a0, b);

        let set: HashSet<Cid> = [a0.clone(), a1, b].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert!(set.contains(&a0));

        // encoding is not part of identity, the binary form is
        let base32 = Cid::builder()
            .content_type("raw")
            .hash(mh(RAW_HASH))
            .build()
            .unwrap();
        assert_eq!(base32, a0);
        assert_eq!(base32.to_bytes().unwrap(), a0.to_bytes().unwrap());
    }

    #[test]
    fn null_propagation() {
        assert_eq!(Cid::decode_optional(None).unwrap(), None);
        assert_eq!(Cid::encode_optional(None).unwrap(), None);
        assert_eq!(
            Cid::decode_optional(Some(V0_HASH)).unwrap(),
            Some(Cid::decode(V0_HASH).unwrap())
        );
        let none: Option<Cid> = None;
        assert_eq!(none, None::<Cid>);
        assert_ne!(Some(Cid::decode(V0_HASH).unwrap()), none);
    }

    #[test]
    fn write_once() {
        let hash = mh(RAW_HASH);
        let attempts = [
            Cid::builder().hash(hash.clone()).content_type("raw").content_type("dag-cbor"),
            Cid::builder().hash(hash.clone()).encoding("base32").encoding("base64"),
            Cid::builder().hash(hash.clone()).hash(mh(V0_HASH)),
            Cid::builder().hash(hash.clone()).version(1).version(0),
        ];
        for builder in attempts {
            assert!(matches!(
                builder.build().unwrap_err(),
                MultiformatError::UnsupportedOperation(_)
            ));
        }
    }

    #[test]
    fn missing_hash() {
        assert!(matches!(
            Cid::builder().content_type("raw").build().unwrap_err(),
            MultiformatError::Validation(_)
        ));
    }

    #[test]
    fn bytes_v0() {
        let buffer = [
            0x12, 0x20, 0xa4, 0xed, 0xf3, 0x86, 0x11, 0xd7, 0xd4, 0xa2, 0xd3, 0xff, 0x2d, 0x97,
            0xf8, 0x8a, 0x72, 0x56, 0xeb, 0xa3, 0x1b, 0x57, 0x98, 0x2f, 0x80, 0x3b, 0x4d, 0xe7,
            0xbb, 0xeb, 0x03, 0x43, 0xc3, 0x7b,
        ];
        let cid = Cid::from_bytes(&buffer).unwrap();
        assert_eq!(cid.version(), 0);
        assert_eq!(cid.content_type(), "dag-pb");
        assert_eq!(
            cid.hash().to_base58(),
            "QmZSU1xNFsBtCnzK2Nk9N4bAxQiVNdmugU9DQDE3ntkTpe"
        );
        assert_eq!(cid.to_bytes().unwrap(), buffer);
    }

    #[test]
    fn bytes_v1() {
        let cid = Cid::decode(SHA512_V1).unwrap();
        let clone = Cid::from_bytes(&cid.to_bytes().unwrap()).unwrap();
        assert_eq!(clone.version(), cid.version());
        assert_eq!(clone.content_type(), cid.content_type());
        assert_eq!(clone.hash().algorithm().name(), "sha2-512");
        assert_eq!(clone, cid);
    }

    #[test]
    fn bytes_errors() {
        // explicit version 0
        assert!(matches!(
            Cid::from_bytes(&[0x00, 0x70]).unwrap_err(),
            MultiformatError::Format(_)
        ));
        // v0 with a non-default algorithm
        let sha512 = MultiHash::compute_with_algorithm(b"x", "sha2-512").unwrap();
        assert!(matches!(
            Cid::from_bytes(&sha512.to_bytes()).unwrap_err(),
            MultiformatError::Format(_)
        ));
        // truncated v1
        assert!(matches!(
            Cid::from_bytes(&[0x01, 0x55, 0x12, 0x20, 0x00]).unwrap_err(),
            MultiformatError::Format(_)
        ));
    }

    #[test]
    fn placeholder_content_type_is_canonical() {
        let named = Cid::builder()
            .content_type("raw")
            .hash(mh(RAW_HASH))
            .build()
            .unwrap();
        for placeholder in ["codec-85", "codec-0085"] {
            let cid = Cid::builder()
                .content_type(placeholder)
                .hash(mh(RAW_HASH))
                .build()
                .unwrap();
            assert_eq!(cid.content_type(), "raw");
            assert_eq!(cid.to_bytes().unwrap(), named.to_bytes().unwrap());
            assert_eq!(cid, named);
            assert_eq!(Cid::decode(&cid.encode().unwrap()).unwrap(), cid);
        }

        // unregistered codes keep the placeholder, without leading zeros
        let cid = Cid::builder()
            .content_type("codec-032767")
            .hash(mh(RAW_HASH))
            .build()
            .unwrap();
        assert_eq!(cid.content_type(), "codec-32767");
        assert_eq!(Cid::decode(&cid.encode().unwrap()).unwrap(), cid);

        // the placeholder for dag-pb still allows v0
        let cid = Cid::builder()
            .content_type(format!("codec-{}", 0x70))
            .hash(mh(V0_HASH))
            .build()
            .unwrap();
        assert_eq!(cid.version(), 0);
        assert_eq!(cid.encode().unwrap(), V0_HASH);
    }

    #[test]
    fn streaming() {
        for s in [RAW_HASH, SHA512_V1, RAW_V1] {
            let cid = Cid::decode(s).unwrap();
            let mut buffer = Vec::new();
            cid.write_to(&mut buffer).unwrap();
            buffer.extend_from_slice(b"trailing");

            let mut cursor = std::io::Cursor::new(buffer);
            let clone = Cid::read_from(&mut cursor).unwrap();
            assert_eq!(clone.version(), cid.version());
            assert_eq!(clone.content_type(), cid.content_type());
            assert_eq!(clone.hash(), cid.hash());

            let mut rest = Vec::new();
            cursor.read_to_end(&mut rest).unwrap();
            assert_eq!(rest, b"trailing");
        }
    }

    #[test]
    fn long_format() {
        let cid = Cid::decode(V0_HASH).unwrap();
        assert_eq!(
            cid.format("L").unwrap(),
            format!("base58btc cidv0 dag-pb sha2-256 {V0_HASH}")
        );
        assert_eq!(cid.format("G").unwrap(), V0_HASH);

        let cid = Cid::decode(SHA512_V1).unwrap();
        assert_eq!(
            cid.format("L").unwrap(),
            "base58btc cidv1 dag-pb sha2-512 8Vx9QNCcSt39anEamkkSaNw5rDHQ7yuadq7ihZed477qQNXxYr3HReMamd1Q2EnUeL4oNtVAmNw1frEhEN1aoqFuKD"
        );
        assert_eq!(cid.format("G").unwrap(), SHA512_V1);

        assert!(matches!(
            cid.format("?").unwrap_err(),
            MultiformatError::Format(_)
        ));
    }
}
