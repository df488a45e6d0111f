//! Lenient field deserializers for GraphQL payloads.
//!
//! Hasura returns `null` for unset scalars and sometimes encodes numeric
//! aggregates as floats. These helpers keep the typed records strict about
//! shape while tolerating those encodings.

use serde::{Deserialize, Deserializer};

/// Treat `null` like a missing field.
pub fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept an integer, a float (rounded), or `null` (zero).
pub fn integer<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_integer(deserializer)?.unwrap_or(0))
}

/// Accept an integer, a float (rounded), or `null`.
pub fn optional_integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let number = Option::<serde_json::Number>::deserialize(deserializer)?;
    Ok(number.and_then(|n| {
        n.as_i64()
            .or_else(|| n.as_u64().and_then(|u| i64::try_from(u).ok()))
            .or_else(|| n.as_f64().map(|f| f.round() as i64))
    }))
}
