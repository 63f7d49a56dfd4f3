//! Trait identifier module.
//!
//! Provides the `TraitId` type, an interned string naming one priced
//! property of a character ("st", "wealth", "languages"). Uses `Arc<str>`
//! so ids are cheap to clone into delta maps, modifier lists and errors.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// Interned string identifier for character traits.
///
/// # Examples
///
/// ```rust
/// use pointbuy::TraitId;
///
/// let st = TraitId::from_str("st");
/// let st2: TraitId = "st".into();
/// let st3: TraitId = String::from("st").into();
///
/// assert_eq!(st, st2);
/// assert_eq!(st, st3);
/// ```
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct TraitId(Arc<str>);

impl Serialize for TraitId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.as_ref().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TraitId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(TraitId::from(s))
    }
}

impl TraitId {
    /// Create a new `TraitId` from a string slice.
    pub fn from_str(s: &str) -> Self {
        Self(Arc::from(s))
    }

    /// Get the string representation of this `TraitId`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Build the composite price key for one value of an enumerated trait.
    ///
    /// Enumerated and boolean traits are priced per value, so the price
    /// table lists them as `trait + value`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pointbuy::TraitId;
    ///
    /// let appearance = TraitId::from_str("appearance");
    /// assert_eq!(appearance.keyed(5), "appearance5");
    /// assert_eq!(TraitId::from_str("universal").keyed(true), "universaltrue");
    /// ```
    pub fn keyed(&self, value: impl fmt::Display) -> String {
        format!("{}{}", self.0, value)
    }
}

impl From<&str> for TraitId {
    fn from(s: &str) -> Self {
        Self::from_str(s)
    }
}

impl From<String> for TraitId {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl AsRef<str> for TraitId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TraitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trait_id_creation() {
        let id1 = TraitId::from_str("dx");
        let id2 = TraitId::from_str("dx");
        assert_eq!(id1, id2);
        assert_eq!(id1.as_str(), "dx");
    }

    #[test]
    fn test_keyed_enum_value() {
        let wealth = TraitId::from_str("wealth");
        assert_eq!(wealth.keyed(8), "wealth8");
        assert_eq!(wealth.keyed(-1), "wealth-1");
    }

    #[test]
    fn test_serde_as_plain_string() {
        let id = TraitId::from_str("basicSpeed");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"basicSpeed\"");
        let back: TraitId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_trait_id_ordering() {
        let dx = TraitId::from_str("dx");
        let st = TraitId::from_str("st");
        assert!(dx < st);
    }
}
