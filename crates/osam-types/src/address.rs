use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Identifier of one single-use storage slot.
///
/// An `Address` pairs a globally unique, monotonically issued `id` with the
/// `bucket` (leaf) the store placed it in. Addresses are opaque to the
/// pointer layer: it only compares them, stores them inside records, and
/// hands them back to the address manager.
///
/// [`Address::NIL`] is the reserved "no address" value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address {
    id: u64,
    bucket: u32,
}

impl Address {
    /// The reserved "no address" value.
    pub const NIL: Self = Self {
        id: u64::MAX,
        bucket: u32::MAX,
    };

    /// Create an address from an issued id and its bucket.
    pub const fn new(id: u64, bucket: u32) -> Self {
        Self { id, bucket }
    }

    /// Returns `true` if this is [`Address::NIL`].
    pub fn is_nil(&self) -> bool {
        *self == Self::NIL
    }

    /// Globally unique id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Bucket (leaf index) the store placed this address in.
    pub fn bucket(&self) -> u32 {
        self.bucket
    }
}

impl Default for Address {
    fn default() -> Self {
        Self::NIL
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

/// Diagnostic form `"<id>_<bucket>"`, or `"nil"`. Not a wire format.
impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_nil() {
            write!(f, "nil")
        } else {
            write!(f, "{}_{}", self.id, self.bucket)
        }
    }
}

impl FromStr for Address {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "nil" {
            return Ok(Self::NIL);
        }
        let (id, bucket) = s
            .split_once('_')
            .ok_or_else(|| TypeError::InvalidAddress(s.to_string()))?;
        let id = id.parse().map_err(|_| TypeError::InvalidComponent {
            component: "id",
            input: s.to_string(),
        })?;
        let bucket = bucket.parse().map_err(|_| TypeError::InvalidComponent {
            component: "bucket",
            input: s.to_string(),
        })?;
        Ok(Self::new(id, bucket))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn nil_is_nil() {
        assert!(Address::NIL.is_nil());
        assert!(Address::default().is_nil());
        assert!(!Address::new(0, 0).is_nil());
    }

    #[test]
    fn display_format() {
        assert_eq!(Address::new(17, 3).to_string(), "17_3");
        assert_eq!(Address::NIL.to_string(), "nil");
        assert_eq!(format!("{:?}", Address::new(1, 2)), "Address(1_2)");
    }

    #[test]
    fn parse_nil() {
        assert_eq!("nil".parse::<Address>().unwrap(), Address::NIL);
    }

    #[test]
    fn parse_rejects_missing_separator() {
        let err = "1234".parse::<Address>().unwrap_err();
        assert_eq!(err, TypeError::InvalidAddress("1234".into()));
    }

    #[test]
    fn parse_rejects_bad_bucket() {
        let err = "12_x".parse::<Address>().unwrap_err();
        assert!(matches!(
            err,
            TypeError::InvalidComponent {
                component: "bucket",
                ..
            }
        ));
    }

    #[test]
    fn ordering_follows_id_first() {
        assert!(Address::new(1, 9) < Address::new(2, 0));
    }

    #[test]
    fn serde_roundtrip() {
        let addr = Address::new(42, 7);
        let json = serde_json::to_string(&addr).unwrap();
        let parsed: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(addr, parsed);
    }

    proptest! {
        #[test]
        fn display_parses_back(id in 0u64..u64::MAX, bucket in 0u32..u32::MAX) {
            let addr = Address::new(id, bucket);
            prop_assert_eq!(addr.to_string().parse::<Address>().unwrap(), addr);
        }
    }
}
