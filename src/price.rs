//! Price lookup module.
//!
//! The price table is a pure lookup service: flat cost per trait (or per
//! `trait + value` for enumerated traits), the step size of numeric traits,
//! the per-trait discount ceiling, and basic damage by strength.

use crate::damage::DamageTable;
use crate::error::PointError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Trait for price lookup services.
///
/// Unknown cost keys fail with `PointError::Lookup`; they are never treated
/// as free. Increment and maximum discount fall back to 1 when a trait has
/// no override.
pub trait PriceLookup {
    /// Flat price for a key.
    fn cost(&self, key: &str) -> Result<f64, PointError>;

    /// How far one step moves a numeric trait.
    fn increment(&self, trait_id: &str) -> f64;

    /// Discount ceiling for a trait, in (0, 1].
    fn max_discount(&self, trait_id: &str) -> f64;

    /// Thrust damage at a strength score.
    fn thrust_damage(&self, st: i64) -> Result<String, PointError>;

    /// Swing damage at a strength score.
    fn swing_damage(&self, st: i64) -> Result<String, PointError>;

    /// Price of one value of an enumerated trait (`trait + value`).
    fn keyed_cost(&self, trait_id: &str, value: &dyn fmt::Display) -> Result<f64, PointError> {
        self.cost(&format!("{trait_id}{value}"))
    }
}

/// Table-backed price lookup.
///
/// # Examples
///
/// ```rust
/// use pointbuy::{PriceLookup, PriceTable};
///
/// let prices = PriceTable::standard();
/// assert_eq!(prices.cost("st").unwrap(), 10.0);
/// assert_eq!(prices.keyed_cost("appearance", &5).unwrap(), 0.0);
/// assert_eq!(prices.increment("basicSpeed"), 0.25);
/// assert_eq!(prices.increment("st"), 1.0);
/// assert_eq!(prices.max_discount("st"), 0.8);
/// assert!(prices.cost("charisma").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTable {
    #[serde(default)]
    costs: HashMap<String, f64>,
    #[serde(default)]
    increments: HashMap<String, f64>,
    #[serde(default)]
    max_discounts: HashMap<String, f64>,
    #[serde(default)]
    damage: DamageTable,
}

impl PriceTable {
    /// An empty table with the standard damage breakpoints.
    pub fn empty() -> Self {
        Self {
            costs: HashMap::new(),
            increments: HashMap::new(),
            max_discounts: HashMap::new(),
            damage: DamageTable::standard(),
        }
    }

    /// The standard point costs.
    pub fn standard() -> Self {
        const COSTS: &[(&str, f64)] = &[
            ("st", 10.0),
            ("dx", 20.0),
            ("iq", 20.0),
            ("ht", 10.0),
            ("hp", 2.0),
            ("will", 5.0),
            ("per", 5.0),
            ("fp", 3.0),
            ("basicSpeed", 5.0),
            ("basicMove", 5.0),
            ("size", 0.0),
            ("build0", -5.0),
            ("build1", 0.0),
            ("build2", -1.0),
            ("build3", -3.0),
            ("build4", -5.0),
            ("appearance0", -24.0),
            ("appearance1", -20.0),
            ("appearance2", -16.0),
            ("appearance3", -8.0),
            ("appearance4", -4.0),
            ("appearance5", 0.0),
            ("appearance6", 4.0),
            ("appearance7", 8.0),
            ("appearance8", 16.0),
            ("appearance9", 20.0),
            ("personalTechLevel", 5.0),
            ("language0", 0.0),
            ("language1", 2.0),
            ("language2", 4.0),
            ("language3", 6.0),
            ("wealth0", -25.0),
            ("wealth1", -15.0),
            ("wealth2", -10.0),
            ("wealth3", 0.0),
            ("wealth4", 10.0),
            ("wealth5", 20.0),
            ("wealth6", 30.0),
            ("wealth7", 50.0),
            // Multimillionaire: points per level, on top of wealth7.
            ("wealth8", 25.0),
            ("multimillionaireLevel", 0.0),
            ("repReaction", 5.0),
            ("repScope0", 1.0),
            ("repScope1", 0.666),
            ("repScope2", 0.5),
            ("repScope3", 0.333),
            ("repFrequency0", 1.0),
            ("repFrequency1", 0.5),
            ("repFrequency2", 0.333),
            ("status", 5.0),
            ("rank", 5.0),
            ("rankReplacesStatus", 10.0),
        ];

        let mut table = Self::empty();
        table.costs = COSTS.iter().map(|&(k, v)| (k.to_string(), v)).collect();
        table.increments.insert("basicSpeed".to_string(), 0.25);
        table.max_discounts.insert("st".to_string(), 0.8);
        table
    }

    /// Load a table from JSON. Sections left out are empty; damage left out
    /// uses the standard breakpoints.
    pub fn from_json(json: &str) -> Result<Self, PointError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set a flat price.
    pub fn with_cost(mut self, key: impl Into<String>, cost: f64) -> Self {
        self.costs.insert(key.into(), cost);
        self
    }

    /// Set a step size.
    pub fn with_increment(mut self, trait_id: impl Into<String>, increment: f64) -> Self {
        self.increments.insert(trait_id.into(), increment);
        self
    }

    /// Set a discount ceiling.
    pub fn with_max_discount(mut self, trait_id: impl Into<String>, max: f64) -> Self {
        self.max_discounts.insert(trait_id.into(), max);
        self
    }
}

impl Default for PriceTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl PriceLookup for PriceTable {
    fn cost(&self, key: &str) -> Result<f64, PointError> {
        self.costs
            .get(key)
            .copied()
            .ok_or_else(|| PointError::Lookup(key.to_string()))
    }

    fn increment(&self, trait_id: &str) -> f64 {
        self.increments.get(trait_id).copied().unwrap_or(1.0)
    }

    fn max_discount(&self, trait_id: &str) -> f64 {
        self.max_discounts.get(trait_id).copied().unwrap_or(1.0)
    }

    fn thrust_damage(&self, st: i64) -> Result<String, PointError> {
        Ok(self.damage.thrust(st)?.to_string())
    }

    fn swing_damage(&self, st: i64) -> Result<String, PointError> {
        Ok(self.damage.swing(st)?.to_string())
    }
}
