//! Content identifier of a blob (SHA-1 hash)
//!
//! Content ids in raw diff records are 40-character hexadecimal strings. The all-zero id is a
//! sentinel: the side it describes has no committed content and lives in the working tree.

use crate::artifacts::objects::{OBJECT_ID_LENGTH, SHORT_OBJECT_ID_LENGTH};

const NULL_OID_RAW: &str = "0000000000000000000000000000000000000000";

/// Validated 40-character hexadecimal content id
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse and validate an object ID from a string
    ///
    /// # Returns
    ///
    /// Validated ObjectId or error if invalid length/characters
    pub fn try_parse(id: String) -> anyhow::Result<Self> {
        if id.len() != OBJECT_ID_LENGTH {
            return Err(anyhow::anyhow!("Invalid object ID length: {}", id.len()));
        }
        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(anyhow::anyhow!("Invalid object ID characters: {}", id));
        }
        Ok(Self(id))
    }

    /// True for the all-zero id git reports for uncommitted working tree content
    pub fn is_null(&self) -> bool {
        self.0 == NULL_OID_RAW
    }

    /// First 8 characters of the id, as shown in submodule labels
    pub fn to_short_oid(&self) -> String {
        self.0.split_at(SHORT_OBJECT_ID_LENGTH).0.to_string()
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::proptest;

    proptest! {
        #[test]
        fn test_parse_accepts_any_hex_id(id in "[0-9a-f]{40}") {
            let oid = ObjectId::try_parse(id.clone()).unwrap();
            pretty_assertions::assert_eq!(oid.as_ref(), id.as_str());
            pretty_assertions::assert_eq!(oid.to_short_oid(), id[..8].to_string());
        }

        #[test]
        fn test_parse_rejects_wrong_length(id in "[0-9a-f]{1,39}") {
            assert!(ObjectId::try_parse(id).is_err());
        }
    }

    #[test]
    fn test_parse_rejects_non_hex() {
        assert!(ObjectId::try_parse("g".repeat(40)).is_err());
    }

    #[test]
    fn test_null_id_is_sentinel() {
        assert!(ObjectId::try_parse("0".repeat(40)).unwrap().is_null());
        assert!(!ObjectId::try_parse("a".repeat(40)).unwrap().is_null());
    }
}
