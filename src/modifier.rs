//! Modifier module.
//!
//! Modifiers are sourced discount contributions to a trait's point cost.
//! Several sources may discount the same trait (size, a racial template,
//! a magic item); each (trait, source) pair holds at most one modifier.

use crate::trait_id::TraitId;
use serde::{Deserialize, Serialize};

/// One sourced contribution to a trait.
///
/// `actual_mod` and `effective_mod` describe the underlying game effect and
/// are kept for display; only `discount` enters cost arithmetic. A negative
/// discount is a surcharge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modifier {
    pub trait_id: TraitId,
    pub actual_mod: f64,
    pub effective_mod: f64,
    pub discount: f64,
    pub source: String,
}

/// The active modifiers of an editing session.
///
/// # Examples
///
/// ```rust
/// use pointbuy::{ModifierGroup, TraitId};
///
/// let st = TraitId::from_str("st");
/// let mut modifiers = ModifierGroup::new();
/// modifiers.set_modifier(st.clone(), 0.0, 0.0, 0.6, "size");
/// modifiers.set_modifier(st.clone(), 0.0, 0.0, 0.6, "template");
///
/// // 1.2 stacked, capped at strength's 0.8 ceiling
/// assert_eq!(modifiers.total_discount(&st, 0.8), 0.8);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModifierGroup {
    modifiers: Vec<Modifier>,
}

impl ModifierGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// All modifiers for a trait, in the order they were first set.
    pub fn modifiers(&self, trait_id: &TraitId) -> impl Iterator<Item = &Modifier> {
        let trait_id = trait_id.clone();
        self.modifiers.iter().filter(move |m| m.trait_id == trait_id)
    }

    /// Insert a modifier, or replace the one with the same trait and source.
    pub fn set_modifier(
        &mut self,
        trait_id: TraitId,
        actual_mod: f64,
        effective_mod: f64,
        discount: f64,
        source: impl Into<String>,
    ) {
        let source = source.into();
        if let Some(existing) = self
            .modifiers
            .iter_mut()
            .find(|m| m.trait_id == trait_id && m.source == source)
        {
            existing.actual_mod = actual_mod;
            existing.effective_mod = effective_mod;
            existing.discount = discount;
            return;
        }
        self.modifiers.push(Modifier {
            trait_id,
            actual_mod,
            effective_mod,
            discount,
            source,
        });
    }

    /// Drop the modifier for a (trait, source) pair. Returns it if present.
    pub fn remove_modifier(&mut self, trait_id: &TraitId, source: &str) -> Option<Modifier> {
        let index = self
            .modifiers
            .iter()
            .position(|m| &m.trait_id == trait_id && m.source == source)?;
        Some(self.modifiers.remove(index))
    }

    /// Sum of effective modifiers for a trait. Informational only.
    pub fn total_modifier(&self, trait_id: &TraitId) -> f64 {
        self.modifiers(trait_id).map(|m| m.effective_mod).sum()
    }

    /// Sum of discounts for a trait, capped above at `max_discount`.
    ///
    /// Only the upper bound is clamped, so a net surcharge passes through.
    pub fn total_discount(&self, trait_id: &TraitId, max_discount: f64) -> f64 {
        let total: f64 = self.modifiers(trait_id).map(|m| m.discount).sum();
        total.min(max_discount)
    }

    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }
}
