//! Baseline character records.
//!
//! A `Character` is the last committed snapshot that deltas are computed
//! against. It carries flat scalar traits plus nested language, reputation,
//! rank and appearance records. Records have no behavior beyond value access;
//! all pricing lives in the cost and delta modules.

use crate::error::PointError;
use crate::source::TraitSource;
use crate::trait_id::TraitId;
use crate::value::{Composite, Element, TraitKind, TraitValue};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Trait names understood by [`Character`].
pub mod names {
    pub const NAME: &str = "name";
    pub const PLAYER: &str = "player";
    pub const HEIGHT: &str = "height";
    pub const WEIGHT: &str = "weight";
    pub const APPEARANCE: &str = "appearance";
    pub const BUILD: &str = "build";
    pub const SIZE: &str = "size";
    pub const ST: &str = "st";
    pub const DX: &str = "dx";
    pub const IQ: &str = "iq";
    pub const HT: &str = "ht";
    pub const BASIC_SPEED: &str = "basicSpeed";
    pub const BASIC_MOVE: &str = "basicMove";
    pub const HP: &str = "hp";
    pub const WILL: &str = "will";
    pub const PER: &str = "per";
    pub const FP: &str = "fp";
    pub const LANGUAGES: &str = "languages";
    pub const WEALTH: &str = "wealth";
    pub const MULTIMILLIONAIRE_LEVEL: &str = "multimillionaireLevel";
    pub const STATUS: &str = "status";
    pub const REPUTATIONS: &str = "reputations";
    pub const RANKS: &str = "ranks";
    pub const PERSONAL_TECH_LEVEL: &str = "personalTechLevel";
}

use names::*;

/// Local identity of an array element.
///
/// Assigned when the element is created (or hydrated without one), so
/// incremental cost diffing never depends on a persistence id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementKey(Uuid);

impl ElementKey {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ElementKey {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ElementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Appearance level plus the flags that modify its price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Appearance {
    pub appearance: i64,
    pub description: String,
    pub androgynous: bool,
    pub impressive: bool,
    pub universal: bool,
    pub off_the_shelf_looks: bool,
}

impl Appearance {
    /// Average looks, no flags.
    pub fn blank() -> Self {
        Self {
            appearance: 5,
            description: String::new(),
            androgynous: false,
            impressive: false,
            universal: false,
            off_the_shelf_looks: false,
        }
    }

    /// Numeric view of one field; flags read as 0 or 1.
    pub fn attribute(&self, name: &str) -> Option<f64> {
        let flag = |b: bool| if b { 1.0 } else { 0.0 };
        match name {
            "appearance" => Some(self.appearance as f64),
            "androgynous" => Some(flag(self.androgynous)),
            "impressive" => Some(flag(self.impressive)),
            "universal" => Some(flag(self.universal)),
            "offTheShelfLooks" => Some(flag(self.off_the_shelf_looks)),
            _ => None,
        }
    }
}

impl Default for Appearance {
    fn default() -> Self {
        Self::blank()
    }
}

/// A known language with spoken and written comprehension levels (0-3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Language {
    #[serde(default, skip_serializing)]
    pub key: ElementKey,
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
    pub spoken_comprehension: i64,
    /// `None` or 0 means written comprehension matches spoken.
    #[serde(default)]
    pub written_comprehension: Option<i64>,
}

impl Language {
    pub fn new(name: impl Into<String>, spoken: i64, written: Option<i64>) -> Self {
        Self {
            key: ElementKey::new(),
            id: None,
            name: name.into(),
            spoken_comprehension: spoken,
            written_comprehension: written,
        }
    }

    pub fn blank() -> Self {
        Self::new("", 0, None)
    }

    /// Written level used for pricing. An unset or zero written level
    /// follows the spoken one.
    pub fn effective_written_comprehension(&self) -> i64 {
        match self.written_comprehension {
            Some(written) if written != 0 => written,
            _ => self.spoken_comprehension,
        }
    }
}

/// A reputation among some group.
///
/// `scope` and `frequency` index the `repScope` and `repFrequency` price
/// tables; `reaction` is the reaction modifier, positive or negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reputation {
    #[serde(default, skip_serializing)]
    pub key: ElementKey,
    #[serde(default)]
    pub id: Option<u64>,
    pub description: String,
    pub reaction: i64,
    pub scope: i64,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub frequency: i64,
    #[serde(default)]
    pub free: bool,
}

impl Reputation {
    pub fn new(
        description: impl Into<String>,
        reaction: i64,
        scope: i64,
        group: impl Into<String>,
        frequency: i64,
        free: bool,
    ) -> Self {
        Self {
            key: ElementKey::new(),
            id: None,
            description: description.into(),
            reaction,
            scope,
            group: group.into(),
            frequency,
            free,
        }
    }

    pub fn blank() -> Self {
        Self::new("", 0, 0, "", 0, false)
    }
}

/// Rank in an organization. At most one rank may replace status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rank {
    #[serde(default, skip_serializing)]
    pub key: ElementKey,
    #[serde(default)]
    pub id: Option<u64>,
    pub organization: String,
    pub rank: i64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub replaces_status: bool,
}

impl Rank {
    pub fn new(
        organization: impl Into<String>,
        rank: i64,
        description: impl Into<String>,
        replaces_status: bool,
    ) -> Self {
        Self {
            key: ElementKey::new(),
            id: None,
            organization: organization.into(),
            rank,
            description: description.into(),
            replaces_status,
        }
    }

    pub fn blank() -> Self {
        Self::new("", 0, "", false)
    }
}

/// The committed snapshot of one character.
///
/// # Examples
///
/// ```rust
/// use pointbuy::{Character, TraitId, TraitSource, TraitValue};
///
/// let character = Character::new(125.0);
/// assert_eq!(
///     character.trait_value(&TraitId::from_str("st")),
///     Some(TraitValue::Number(10.0))
/// );
/// assert_eq!(character.trait_value(&TraitId::from_str("wealth")), Some(TraitValue::Enum(3)));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Character {
    pub id: Option<u64>,
    pub point_value: f64,
    pub available_points: f64,

    pub name: String,
    pub player: String,
    pub height: String,
    pub weight: String,
    pub appearance: Appearance,
    pub build: i64,
    pub size: f64,

    pub st: f64,
    pub dx: f64,
    pub iq: f64,
    pub ht: f64,

    pub basic_speed: f64,
    pub basic_move: f64,
    pub hp: f64,
    pub will: f64,
    pub per: f64,
    pub fp: f64,

    pub languages: Vec<Language>,

    pub wealth: i64,
    pub multimillionaire_level: f64,
    pub status: f64,

    pub reputations: Vec<Reputation>,
    pub ranks: Vec<Rank>,

    pub personal_tech_level: f64,
}

impl Character {
    /// A fresh 10/10/10/10 character with the given point budget.
    pub fn new(available_points: f64) -> Self {
        let (st, dx, iq, ht) = (10.0, 10.0, 10.0, 10.0);
        let basic_speed = (ht + dx) / 4.0;
        Self {
            id: None,
            point_value: 0.0,
            available_points,
            name: String::new(),
            player: String::new(),
            height: String::new(),
            weight: String::new(),
            appearance: Appearance::blank(),
            build: 1,
            size: 0.0,
            st,
            dx,
            iq,
            ht,
            basic_speed,
            basic_move: basic_speed.floor(),
            hp: st,
            will: iq,
            per: iq,
            fp: ht,
            languages: Vec::new(),
            wealth: 3,
            multimillionaire_level: 1.0,
            status: 0.0,
            reputations: Vec::new(),
            ranks: Vec::new(),
            personal_tech_level: 0.0,
        }
    }

    /// Hydrate a character from a JSON document.
    ///
    /// Elements without a local key receive a fresh one.
    pub fn from_json(json: &str) -> Result<Self, PointError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, PointError> {
        Ok(serde_json::to_string(self)?)
    }

    fn number_field(&self, name: &str) -> Option<f64> {
        let value = match name {
            SIZE => self.size,
            ST => self.st,
            DX => self.dx,
            IQ => self.iq,
            HT => self.ht,
            BASIC_SPEED => self.basic_speed,
            BASIC_MOVE => self.basic_move,
            HP => self.hp,
            WILL => self.will,
            PER => self.per,
            FP => self.fp,
            MULTIMILLIONAIRE_LEVEL => self.multimillionaire_level,
            STATUS => self.status,
            PERSONAL_TECH_LEVEL => self.personal_tech_level,
            _ => return None,
        };
        Some(value)
    }

    fn number_field_mut(&mut self, name: &str) -> Option<&mut f64> {
        let field = match name {
            SIZE => &mut self.size,
            ST => &mut self.st,
            DX => &mut self.dx,
            IQ => &mut self.iq,
            HT => &mut self.ht,
            BASIC_SPEED => &mut self.basic_speed,
            BASIC_MOVE => &mut self.basic_move,
            HP => &mut self.hp,
            WILL => &mut self.will,
            PER => &mut self.per,
            FP => &mut self.fp,
            MULTIMILLIONAIRE_LEVEL => &mut self.multimillionaire_level,
            STATUS => &mut self.status,
            PERSONAL_TECH_LEVEL => &mut self.personal_tech_level,
            _ => return None,
        };
        Some(field)
    }

    fn text_field_mut(&mut self, name: &str) -> Option<&mut String> {
        let field = match name {
            NAME => &mut self.name,
            PLAYER => &mut self.player,
            HEIGHT => &mut self.height,
            WEIGHT => &mut self.weight,
            _ => return None,
        };
        Some(field)
    }
}

impl Default for Character {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Unwrap a list of elements into one record type, rejecting strays.
fn unwrap_elements<T>(
    trait_id: &TraitId,
    items: Vec<Element>,
    unwrap: fn(Element) -> Option<T>,
) -> Result<Vec<T>, PointError> {
    items
        .into_iter()
        .map(|element| {
            let key = element.key();
            unwrap(element).ok_or_else(|| {
                PointError::InvalidArgument(format!(
                    "element {} does not belong in {}",
                    key, trait_id
                ))
            })
        })
        .collect()
}

impl TraitSource for Character {
    fn trait_value(&self, trait_id: &TraitId) -> Option<TraitValue> {
        let name = trait_id.as_str();
        if let Some(n) = self.number_field(name) {
            return Some(TraitValue::Number(n));
        }
        let value = match name {
            NAME => TraitValue::String(self.name.clone()),
            PLAYER => TraitValue::String(self.player.clone()),
            HEIGHT => TraitValue::String(self.height.clone()),
            WEIGHT => TraitValue::String(self.weight.clone()),
            APPEARANCE => TraitValue::Object(Composite::Appearance(self.appearance.clone())),
            BUILD => TraitValue::Enum(self.build),
            WEALTH => TraitValue::Enum(self.wealth),
            LANGUAGES => TraitValue::Array(
                self.languages.iter().cloned().map(Element::Language).collect(),
            ),
            REPUTATIONS => TraitValue::Array(
                self.reputations
                    .iter()
                    .cloned()
                    .map(Element::Reputation)
                    .collect(),
            ),
            RANKS => TraitValue::Array(self.ranks.iter().cloned().map(Element::Rank).collect()),
            _ => return None,
        };
        Some(value)
    }

    fn set_trait_value(&mut self, trait_id: &TraitId, value: TraitValue) -> Result<(), PointError> {
        let expected = self
            .trait_value(trait_id)
            .map(|v| v.kind())
            .ok_or_else(|| PointError::UnknownTrait(trait_id.clone()))?;
        if value.kind() != expected {
            return Err(PointError::type_mismatch(trait_id, expected, value.kind()));
        }

        let name = trait_id.as_str();
        match value {
            TraitValue::Number(n) => {
                if let Some(field) = self.number_field_mut(name) {
                    *field = n;
                }
            }
            TraitValue::String(s) => {
                if let Some(field) = self.text_field_mut(name) {
                    *field = s;
                }
            }
            TraitValue::Enum(n) => match name {
                BUILD => self.build = n,
                _ => self.wealth = n,
            },
            TraitValue::Object(Composite::Appearance(a)) => self.appearance = a,
            TraitValue::Array(items) => match name {
                LANGUAGES => {
                    self.languages = unwrap_elements(trait_id, items, |e| match e {
                        Element::Language(l) => Some(l),
                        _ => None,
                    })?
                }
                REPUTATIONS => {
                    self.reputations = unwrap_elements(trait_id, items, |e| match e {
                        Element::Reputation(r) => Some(r),
                        _ => None,
                    })?
                }
                _ => {
                    self.ranks = unwrap_elements(trait_id, items, |e| match e {
                        Element::Rank(r) => Some(r),
                        _ => None,
                    })?
                }
            },
            TraitValue::Boolean(_) => {
                return Err(PointError::type_mismatch(trait_id, expected, TraitKind::Boolean))
            }
        }
        Ok(())
    }
}
