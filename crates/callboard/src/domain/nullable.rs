//! Serde adapter for fields the backend may send as `null`.
//!
//! `#[serde(default)]` only covers a missing field; this also maps an
//! explicit `null` to `T::default()`.

use serde::{Deserialize, Deserializer};

pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
