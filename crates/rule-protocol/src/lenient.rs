//! Tolerant decoding helpers
//!
//! The backend stores user-edited documents, so list fields can be missing,
//! `null`, a single object instead of a list, or contain entries of an
//! unexpected shape. These helpers absorb all of that at decode time and leave
//! the decision of what to drop to the translator.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A list entry that either decoded into `T` or was kept as raw JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireEntry<T> {
    /// Entry matched the expected shape
    Parsed(T),
    /// Entry did not match; original JSON kept for diagnostics
    Malformed(Value),
}

impl<T> WireEntry<T> {
    /// Borrow the decoded value, if any
    pub fn as_parsed(&self) -> Option<&T> {
        match self {
            WireEntry::Parsed(value) => Some(value),
            WireEntry::Malformed(_) => None,
        }
    }

    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(self, WireEntry::Malformed(_))
    }
}

/// Deserialize a list field that may be missing, `null`, a single entry or a list
pub fn entries<'de, D, T>(deserializer: D) -> Result<Vec<WireEntry<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany<T> {
        Many(Vec<WireEntry<T>>),
        One(WireEntry<T>),
    }

    Ok(match Option::<OneOrMany<T>>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::Many(list)) => list,
        Some(OneOrMany::One(entry)) => vec![entry],
    })
}

/// Treat an explicit `null` the same as a missing field
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decode an optional field, treating a value of the wrong type as absent
pub fn optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .and_then(|value| serde_json::from_value(value).ok()))
}

/// Decode a field, substituting the default for `null` or a value of the wrong type
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    Ok(optional(deserializer)?.unwrap_or_default())
}

/// Decode an identifier sent as either a string or a number
pub fn id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(id)) => Some(id),
        Some(Value::Number(id)) => Some(id.to_string()),
        Some(_) | None => None,
    })
}

/// Deserialize a field that can be either a single string or an array of strings
pub fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrVec {
        String(String),
        Vec(Vec<String>),
    }

    Ok(match Option::<StringOrVec>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(StringOrVec::String(s)) => vec![s],
        Some(StringOrVec::Vec(v)) => v,
    })
}
