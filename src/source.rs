//! Baseline sources module.
//!
//! A baseline source is the committed entity a `DeltaGroup` edits. It hands
//! out trait values by name and accepts them back when pending changes are
//! committed. Access goes through an explicit name-to-field dispatch; there
//! is no reflection.

use crate::error::PointError;
use crate::trait_id::TraitId;
use crate::value::TraitValue;
use std::collections::HashMap;

/// Trait for baseline entities that deltas are computed against.
///
/// # Examples
///
/// ```rust
/// use pointbuy::{TraitId, TraitMap, TraitSource, TraitValue};
///
/// let mut baseline = TraitMap::empty();
/// baseline.insert(TraitId::from_str("st"), TraitValue::Number(10.0));
///
/// let st = TraitId::from_str("st");
/// assert_eq!(baseline.trait_value(&st), Some(TraitValue::Number(10.0)));
/// assert!(baseline.trait_value(&TraitId::from_str("dx")).is_none());
/// ```
pub trait TraitSource {
    /// Current committed value of a trait, or `None` if the entity has no
    /// such trait.
    fn trait_value(&self, trait_id: &TraitId) -> Option<TraitValue>;

    /// Write a value back into the entity.
    ///
    /// Fails with `UnknownTrait` for names the entity does not have and
    /// `TypeMismatch` when the value's shape differs from the field's.
    fn set_trait_value(&mut self, trait_id: &TraitId, value: TraitValue) -> Result<(), PointError>;
}

/// A map-backed baseline.
///
/// Useful for entities without a fixed record type, and for tests that
/// need trait shapes the character record does not carry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TraitMap {
    values: HashMap<TraitId, TraitValue>,
}

impl TraitMap {
    /// Create a new `TraitMap` from a `HashMap`.
    pub fn new(values: HashMap<TraitId, TraitValue>) -> Self {
        Self { values }
    }

    /// Create a new empty `TraitMap`.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Insert or replace a trait.
    pub fn insert(&mut self, trait_id: TraitId, value: TraitValue) {
        self.values.insert(trait_id, value);
    }

    /// Builder form of [`TraitMap::insert`].
    pub fn with(mut self, trait_id: &str, value: impl Into<TraitValue>) -> Self {
        self.insert(TraitId::from_str(trait_id), value.into());
        self
    }
}

impl TraitSource for TraitMap {
    fn trait_value(&self, trait_id: &TraitId) -> Option<TraitValue> {
        self.values.get(trait_id).cloned()
    }

    fn set_trait_value(&mut self, trait_id: &TraitId, value: TraitValue) -> Result<(), PointError> {
        let slot = self
            .values
            .get_mut(trait_id)
            .ok_or_else(|| PointError::UnknownTrait(trait_id.clone()))?;
        if slot.kind() != value.kind() {
            return Err(PointError::type_mismatch(trait_id, slot.kind(), value.kind()));
        }
        *slot = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::TraitKind;

    #[test]
    fn test_trait_map_lookup() {
        let map = TraitMap::empty()
            .with("st", 10.0)
            .with("name", "Vex")
            .with("impressive", false);

        assert_eq!(
            map.trait_value(&TraitId::from_str("st")),
            Some(TraitValue::Number(10.0))
        );
        assert_eq!(
            map.trait_value(&TraitId::from_str("impressive")),
            Some(TraitValue::Boolean(false))
        );
        assert_eq!(map.trait_value(&TraitId::from_str("MISSING")), None);
    }

    #[test]
    fn test_trait_map_write_back() {
        let mut map = TraitMap::empty().with("st", 10.0);
        let st = TraitId::from_str("st");
        map.set_trait_value(&st, TraitValue::Number(13.0)).unwrap();
        assert_eq!(map.trait_value(&st), Some(TraitValue::Number(13.0)));
    }

    #[test]
    fn test_trait_map_write_back_errors() {
        let mut map = TraitMap::empty().with("st", 10.0);
        let err = map
            .set_trait_value(&TraitId::from_str("dx"), TraitValue::Number(1.0))
            .unwrap_err();
        assert_eq!(err, PointError::UnknownTrait(TraitId::from_str("dx")));

        let err = map
            .set_trait_value(&TraitId::from_str("st"), TraitValue::Boolean(true))
            .unwrap_err();
        assert_eq!(
            err,
            PointError::type_mismatch(&TraitId::from_str("st"), TraitKind::Number, TraitKind::Boolean)
        );
    }
}
