//! Cost breakdown module.
//!
//! Contains the `CostBreakdown` type, a per-trait report of how the point
//! total of an editing session was reached.

use crate::trait_id::TraitId;
use serde::{Deserialize, Serialize};

/// The priced result for one trait.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TraitCost {
    /// The trait identifier.
    pub trait_id: TraitId,

    /// Cost before discounts and rounding.
    pub raw: f64,

    /// Discount fraction applied, after the trait's ceiling.
    pub discount: f64,

    /// Rounded cost that enters the total.
    pub cost: f64,
}

/// A point total with one line per priced trait.
///
/// This is read-only, cloneable and serializable. Entries are sorted by
/// trait name so two breakdowns of the same session compare equal.
///
/// # Examples
///
/// ```rust
/// use pointbuy::{CostBreakdown, TraitId};
///
/// let mut breakdown = CostBreakdown::new();
/// breakdown.add(TraitId::from_str("st"), 20.0, 0.3, 14.0);
/// breakdown.add(TraitId::from_str("dx"), 20.0, 0.0, 20.0);
///
/// assert_eq!(breakdown.total, 34.0);
/// assert_eq!(breakdown.entries[0].trait_id.as_str(), "dx");
/// assert_eq!(breakdown.get(&TraitId::from_str("st")).unwrap().discount, 0.3);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CostBreakdown {
    /// Per-trait lines, sorted by trait name.
    pub entries: Vec<TraitCost>,

    /// Sum of the rounded per-trait costs.
    pub total: f64,
}

impl CostBreakdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one trait's line and fold its rounded cost into the total.
    pub fn add(&mut self, trait_id: TraitId, raw: f64, discount: f64, cost: f64) {
        let at = self
            .entries
            .partition_point(|entry| entry.trait_id < trait_id);
        self.entries.insert(
            at,
            TraitCost {
                trait_id,
                raw,
                discount,
                cost,
            },
        );
        self.total += cost;
    }

    /// The line for one trait, if it was priced.
    pub fn get(&self, trait_id: &TraitId) -> Option<&TraitCost> {
        self.entries.iter().find(|entry| &entry.trait_id == trait_id)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
