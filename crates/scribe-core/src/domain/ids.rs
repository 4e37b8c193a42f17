//! Typed identifiers.
//!
//! Parsing accepts only the hyphenated 8-4-4-4-12 shape (either case) and
//! normalizes to lowercase. Braced, URN and simple forms are rejected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

const HYPHENATED_LEN: usize = 36;

fn parse_canonical(raw: &str, label: &str) -> Result<Uuid, DomainError> {
    let invalid = || DomainError::invalid(format!("invalid {label}: {raw:?}"));

    if raw.len() != HYPHENATED_LEN {
        return Err(invalid());
    }
    let uuid = Uuid::parse_str(raw).map_err(|_| invalid())?;
    if !uuid.hyphenated().to_string().eq_ignore_ascii_case(raw) {
        return Err(invalid());
    }
    Ok(uuid)
}

macro_rules! define_id {
    ($name:ident, $label:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(Uuid);

        impl $name {
            /// Fresh random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Parse a hyphenated UUID string.
            pub fn parse(raw: &str) -> Result<Self, DomainError> {
                parse_canonical(raw, $label).map(Self)
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0.hyphenated())
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$name> for Uuid {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = DomainError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(&value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.to_string()
            }
        }
    };
}

define_id!(PostId, "post id");
define_id!(UserId, "user id");
define_id!(TagId, "tag id");
