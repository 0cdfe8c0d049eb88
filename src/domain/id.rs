//! Domain identifier types with proper encapsulation.
//!
//! The backend is not consistent about identifier encoding: some payloads
//! carry string ids, others integers. Every id type here accepts both on the
//! wire and stores the canonical string form.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Signed(i64),
    Unsigned(u64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Signed(n) => n.to_string(),
            RawId::Unsigned(n) => n.to_string(),
        }
    }
}

/// Deserialize a string-or-number field into a `String`, mapping null or
/// absence to the empty string.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawId>::deserialize(deserializer)?
        .map(String::from)
        .unwrap_or_default())
}

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[doc = concat!("Create a new `", stringify!($name), "` from a string.")]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                RawId::deserialize(deserializer).map(|raw| Self(raw.into()))
            }
        }
    };
}

record_id!(
    /// Identifier of a transaction as assigned by the backend.
    TransactionId
);

record_id!(
    /// Identifier of a streamed system alert.
    AlertId
);

record_id!(
    /// Identifier of a detected anomaly.
    AnomalyId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_from_string() {
        let id: TransactionId = serde_json::from_str(r#""tx-42""#).unwrap();
        assert_eq!(id.as_str(), "tx-42");
    }

    #[test]
    fn deserializes_from_integer() {
        let id: AnomalyId = serde_json::from_str("17").unwrap();
        assert_eq!(id, AnomalyId::new("17"));
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&AlertId::new("a1")).unwrap();
        assert_eq!(json, r#""a1""#);
    }
}
