use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// Size of a native identifier in bytes.
pub const ID_LEN: usize = 12;

/// Length of the external (hex) form of an identifier.
pub const HEX_LEN: usize = ID_LEN * 2;

static COUNTER: AtomicU32 = AtomicU32::new(0);
static PROCESS_UNIQUE: OnceLock<[u8; 5]> = OnceLock::new();

/// Native identifier of a stored document.
///
/// Layout: 4 bytes of big-endian seconds since the UNIX epoch, 5 bytes unique
/// to this process, and a 3-byte big-endian counter. Identifiers created in
/// the same process are therefore unique and roughly ordered by creation
/// time.
///
/// The only ways to obtain a `DocumentId` are [`DocumentId::generate`] (used
/// by the store when inserting) and [`DocumentId::from_hex`] (the decoding
/// half of the identifier codec). The external form is always 24 lowercase
/// hex characters.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId([u8; ID_LEN]);

impl DocumentId {
    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as u32;
        let process = PROCESS_UNIQUE.get_or_init(|| rand::thread_rng().gen());
        let count = COUNTER.fetch_add(1, Ordering::Relaxed) & 0x00ff_ffff;

        let mut bytes = [0u8; ID_LEN];
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(process);
        bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);
        Self(bytes)
    }

    /// The raw 12 bytes.
    pub fn as_bytes(&self) -> &[u8; ID_LEN] {
        &self.0
    }

    /// Seconds since the UNIX epoch embedded at generation time.
    pub fn generation_secs(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }

    /// Hex-encoded external form (24 lowercase characters). Never fails.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse the external form.
    ///
    /// Accepts exactly 24 hex characters in either case; anything else is
    /// rejected.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        if s.len() != HEX_LEN {
            return Err(TypeError::InvalidLength {
                expected: HEX_LEN,
                actual: s.len(),
            });
        }
        let mut arr = [0u8; ID_LEN];
        hex::decode_to_slice(s, &mut arr).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DocumentId({})", self.to_hex())
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for DocumentId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for DocumentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for DocumentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn generated_ids_are_unique() {
        let a = DocumentId::generate();
        let b = DocumentId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn generated_ids_embed_current_time() {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as u32;
        let id = DocumentId::generate();
        assert!(id.generation_secs() <= now + 1);
        assert!(id.generation_secs() + 5 >= now);
    }

    #[test]
    fn hex_roundtrip() {
        let id = DocumentId::generate();
        let hex = id.to_hex();
        assert_eq!(hex.len(), HEX_LEN);
        assert_eq!(DocumentId::from_hex(&hex).unwrap(), id);
    }

    #[test]
    fn known_external_form() {
        let id = DocumentId::from_hex("5ffd6e13de19e0a9724b9b20").unwrap();
        assert_eq!(id.to_hex(), "5ffd6e13de19e0a9724b9b20");
        assert_eq!(id.generation_secs(), 0x5ffd_6e13);
    }

    #[test]
    fn uppercase_is_accepted_and_normalized() {
        let id = DocumentId::from_hex("5FFD6E13DE19E0A9724B9B20").unwrap();
        assert_eq!(id.to_hex(), "5ffd6e13de19e0a9724b9b20");
    }

    #[test]
    fn wrong_length_is_rejected() {
        let err = DocumentId::from_hex("5ffd6e13").unwrap_err();
        assert_eq!(
            err,
            TypeError::InvalidLength {
                expected: 24,
                actual: 8
            }
        );
        assert!(DocumentId::from_hex("").is_err());
    }

    #[test]
    fn non_hex_is_rejected() {
        let err = DocumentId::from_hex("zzfd6e13de19e0a9724b9b20").unwrap_err();
        assert!(matches!(err, TypeError::InvalidHex(_)));
    }

    #[test]
    fn serde_uses_external_form() {
        let id = DocumentId::from_hex("600021457ca951f000beda40").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"600021457ca951f000beda40\"");
        let parsed: DocumentId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
        assert!(serde_json::from_str::<DocumentId>("\"nope\"").is_err());
    }

    proptest! {
        #[test]
        fn encode_decode_roundtrip(s in "[0-9a-f]{24}") {
            let id = DocumentId::from_hex(&s).unwrap();
            prop_assert_eq!(id.to_hex(), s);
        }

        #[test]
        fn malformed_input_never_decodes(s in "\\PC*") {
            let well_formed = s.len() == HEX_LEN && s.chars().all(|c| c.is_ascii_hexdigit());
            prop_assume!(!well_formed);
            prop_assert!(DocumentId::from_hex(&s).is_err());
        }
    }
}
