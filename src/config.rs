//! Session configuration.

use crate::error::PointError;
use serde::{Deserialize, Serialize};

/// Tunables for an [`EditSession`](crate::EditSession).
///
/// Every field has a default, so a JSON document only needs the values it
/// changes.
///
/// # Examples
///
/// ```rust
/// use pointbuy::SessionConfig;
///
/// let config = SessionConfig::from_json(r#"{"starting_points": 150}"#).unwrap();
/// assert_eq!(config.starting_points, 150.0);
/// assert_eq!(config.attribute_floor, 1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Point budget of a new character.
    pub starting_points: f64,
    /// Discount on strength and hit points per level of size.
    pub size_discount_per_level: f64,
    /// Size levels past this one earn no further discount.
    pub max_size_discount_level: f64,
    /// Lowest value a primary attribute can be stepped down to.
    pub attribute_floor: f64,
    /// Reputation reactions are held within plus or minus this value.
    pub reputation_reaction_limit: i64,
    /// Lowest multimillionaire level.
    pub multimillionaire_floor: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            starting_points: 125.0,
            size_discount_per_level: 0.1,
            max_size_discount_level: 8.0,
            attribute_floor: 1.0,
            reputation_reaction_limit: 4,
            multimillionaire_floor: 1.0,
        }
    }
}

impl SessionConfig {
    pub fn from_json(json: &str) -> Result<Self, PointError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Discount earned by a size level, capped at the maximum level.
    pub fn size_discount(&self, size: f64) -> f64 {
        size.min(self.max_size_discount_level) * self.size_discount_per_level
    }
}
