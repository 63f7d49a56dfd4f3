//! Damage lookup module.
//!
//! Thrust and swing damage are derived from strength through a sparse
//! breakpoint table. Strength values between breakpoints use the nearest
//! lower breakpoint; strength well past the last breakpoint gains one die
//! per ten points.

use crate::error::PointError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Dice notation: `count` six-sided dice plus a flat adjustment.
///
/// # Examples
///
/// ```rust
/// use pointbuy::damage::Dice;
///
/// let dice: Dice = "2d-1".parse().unwrap();
/// assert_eq!(dice, Dice::new(2, -1));
/// assert_eq!(Dice::new(1, 0).to_string(), "1d");
/// assert_eq!(Dice::new(3, 2).to_string(), "3d+2");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dice {
    pub count: u32,
    pub adds: i32,
}

impl Dice {
    pub fn new(count: u32, adds: i32) -> Self {
        Self { count, adds }
    }

    /// The same roll with `extra` more dice.
    pub fn plus_dice(self, extra: u32) -> Self {
        Self {
            count: self.count + extra,
            adds: self.adds,
        }
    }
}

impl fmt::Display for Dice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d", self.count)?;
        if self.adds != 0 {
            write!(f, "{:+}", self.adds)?;
        }
        Ok(())
    }
}

impl FromStr for Dice {
    type Err = PointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PointError::InvalidArgument(format!("not dice notation: {s:?}"));
        let (count, adds) = s.trim().split_once('d').ok_or_else(invalid)?;
        let count = count.parse::<u32>().map_err(|_| invalid())?;
        let adds = if adds.is_empty() {
            0
        } else {
            if !adds.starts_with(['+', '-']) {
                return Err(invalid());
            }
            adds.parse::<i32>().map_err(|_| invalid())?
        };
        Ok(Self { count, adds })
    }
}

impl Serialize for Dice {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Dice {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Thrust and swing damage at one strength breakpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageEntry {
    #[serde(rename = "thr")]
    pub thrust: Dice,
    #[serde(rename = "sw")]
    pub swing: Dice,
}

/// Breakpoint table mapping strength to basic damage.
///
/// # Examples
///
/// ```rust
/// use pointbuy::damage::DamageTable;
///
/// let table = DamageTable::standard();
/// assert_eq!(table.thrust(2).unwrap().to_string(), "1d-6");
/// assert_eq!(table.swing(10).unwrap().to_string(), "1d");
/// assert_eq!(table.thrust(111).unwrap().to_string(), "12d");
/// assert!(table.thrust(0).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DamageTable {
    breakpoints: BTreeMap<u32, DamageEntry>,
}

/// Strength past the last breakpoint gains one die per this many points.
const EXTRAPOLATION_STEP: u32 = 10;

impl DamageTable {
    pub fn new(breakpoints: BTreeMap<u32, DamageEntry>) -> Self {
        Self { breakpoints }
    }

    /// The standard basic damage table, strength 1 through 100.
    pub fn standard() -> Self {
        const ROWS: &[(u32, (u32, i32), (u32, i32))] = &[
            (1, (1, -6), (1, -5)),
            (3, (1, -5), (1, -4)),
            (5, (1, -4), (1, -3)),
            (7, (1, -3), (1, -2)),
            (9, (1, -2), (1, -1)),
            (10, (1, -2), (1, 0)),
            (11, (1, -1), (1, 1)),
            (12, (1, -1), (1, 2)),
            (13, (1, 0), (2, -1)),
            (14, (1, 0), (2, 0)),
            (15, (1, 1), (2, 1)),
            (16, (1, 1), (2, 2)),
            (17, (1, 2), (3, -1)),
            (18, (1, 2), (3, 0)),
            (19, (2, -1), (3, 1)),
            (20, (2, -1), (3, 2)),
            (21, (2, 0), (4, -1)),
            (22, (2, 0), (4, 0)),
            (23, (2, 1), (4, 1)),
            (24, (2, 1), (4, 2)),
            (25, (2, 2), (5, -1)),
            (26, (2, 2), (5, 0)),
            (27, (3, -1), (5, 1)),
            (29, (3, 0), (5, 2)),
            (31, (3, 1), (6, -1)),
            (33, (3, 2), (6, 0)),
            (35, (4, -1), (6, 1)),
            (37, (4, 0), (6, 2)),
            (39, (4, 1), (7, -1)),
            (45, (5, 0), (7, 1)),
            (50, (5, 2), (8, -1)),
            (55, (6, 0), (8, 1)),
            (60, (7, -1), (9, 0)),
            (65, (7, 1), (9, 2)),
            (70, (8, 0), (10, 0)),
            (75, (8, 2), (10, 2)),
            (80, (8, 0), (11, 0)),
            (85, (9, 2), (11, 2)),
            (90, (10, 0), (12, 0)),
            (95, (10, 2), (12, 2)),
            (100, (11, 0), (13, 0)),
        ];

        let breakpoints = ROWS
            .iter()
            .map(|&(st, (tc, ta), (sc, sa))| {
                (
                    st,
                    DamageEntry {
                        thrust: Dice::new(tc, ta),
                        swing: Dice::new(sc, sa),
                    },
                )
            })
            .collect();
        Self { breakpoints }
    }

    /// Damage at a strength score.
    ///
    /// Fails with `InvalidArgument` for strength below 1 or below the
    /// table's first breakpoint.
    pub fn lookup(&self, st: i64) -> Result<DamageEntry, PointError> {
        if st < 1 {
            return Err(PointError::InvalidArgument(format!(
                "strength must be at least 1, got {st}"
            )));
        }
        let st = u32::try_from(st)
            .map_err(|_| PointError::InvalidArgument(format!("strength out of range: {st}")))?;

        let (&cap, &cap_entry) = self
            .breakpoints
            .last_key_value()
            .ok_or_else(|| PointError::InvalidArgument("damage table is empty".to_string()))?;

        if st >= cap + EXTRAPOLATION_STEP {
            let extra = (st - cap) / EXTRAPOLATION_STEP;
            return Ok(DamageEntry {
                thrust: cap_entry.thrust.plus_dice(extra),
                swing: cap_entry.swing.plus_dice(extra),
            });
        }

        self.breakpoints
            .range(..=st)
            .next_back()
            .map(|(_, entry)| *entry)
            .ok_or_else(|| {
                PointError::InvalidArgument(format!("no damage breakpoint at or below {st}"))
            })
    }

    pub fn thrust(&self, st: i64) -> Result<Dice, PointError> {
        Ok(self.lookup(st)?.thrust)
    }

    pub fn swing(&self, st: i64) -> Result<Dice, PointError> {
        Ok(self.lookup(st)?.swing)
    }
}

impl Default for DamageTable {
    fn default() -> Self {
        Self::standard()
    }
}
