//! Token and account identities
//!
//! Both are opaque 32-byte ids rendered as hex, with the canonical
//! `token0 < token1` ordering coming from the byte-wise `Ord`.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident, $tag:literal) => {
        $(#[$doc])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub [u8; 32]);

        impl $name {
            /// Deterministic id from a human-readable seed (test tokens,
            /// CLI accounts).
            pub fn from_seed(seed: &str) -> Self {
                let mut hasher = Sha256::new();
                hasher.update($tag);
                hasher.update(seed.as_bytes());
                Self(hasher.finalize().into())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&hex::encode(self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self)
            }
        }

        impl FromStr for $name {
            type Err = hex::FromHexError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let mut bytes = [0u8; 32];
                hex::decode_to_slice(s, &mut bytes)?;
                Ok(Self(bytes))
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(D::Error::custom)
            }
        }
    };
}

id_type!(
    /// Identifier of a fungible token type
    TokenId,
    b"token:"
);
id_type!(
    /// Identifier of a balance-holding account
    AccountId,
    b"account:"
);

/// Well-known sink account. Liquidity credited here is unredeemable; the
/// minimum-liquidity lock lives on its balance.
pub const BURN_ADDRESS: AccountId = AccountId([0u8; 32]);

/// Canonical unordered-pair ordering: the smaller id is token0.
pub fn sort_tokens(a: TokenId, b: TokenId) -> (TokenId, TokenId) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Contract identity of the pair for an ordered token set, derived
/// collision-free from both ids. The pair's liquidity token shares these
/// bytes.
pub fn derive_pair_id(token0: TokenId, token1: TokenId) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(b"pair:");
    hasher.update(token0.0);
    hasher.update(token1.0);
    hasher.finalize().into()
}
