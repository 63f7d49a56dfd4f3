//! Trait values.
//!
//! Every trait a delta can track carries one of six shapes. The shape decides
//! which mutations are legal and how the default pricing works.

use crate::character::{Appearance, ElementKey, Language, Rank, Reputation};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The declared shape of a trait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TraitKind {
    /// A stepped numeric trait priced per unit (attributes, size, status).
    Number,
    /// Free text; never costs points.
    String,
    /// A two-valued trait priced per value.
    Boolean,
    /// An integer level priced per value (`trait + value` keys).
    Enum,
    /// An ordered list of identity-bearing elements.
    Array,
    /// A composite record priced as a whole.
    Object,
}

impl TraitKind {
    /// Whether cost for this kind can only come from caller-supplied pricing.
    pub fn requires_custom_cost(self) -> bool {
        matches!(self, TraitKind::Array | TraitKind::Object)
    }
}

impl fmt::Display for TraitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TraitKind::Number => "Number",
            TraitKind::String => "String",
            TraitKind::Boolean => "Boolean",
            TraitKind::Enum => "Enum",
            TraitKind::Array => "Array",
            TraitKind::Object => "Object",
        };
        f.write_str(name)
    }
}

/// The value of one trait, either baseline or pending.
///
/// # Examples
///
/// ```rust
/// use pointbuy::{TraitKind, TraitValue};
///
/// let st = TraitValue::Number(10.0);
/// assert_eq!(st.kind(), TraitKind::Number);
/// assert_eq!(st.as_number(), Some(10.0));
/// assert_eq!(TraitValue::Enum(3).price_suffix(), Some("3".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum TraitValue {
    Number(f64),
    String(String),
    Boolean(bool),
    Enum(i64),
    Array(Vec<Element>),
    Object(Composite),
}

impl TraitValue {
    /// The shape of this value.
    pub fn kind(&self) -> TraitKind {
        match self {
            TraitValue::Number(_) => TraitKind::Number,
            TraitValue::String(_) => TraitKind::String,
            TraitValue::Boolean(_) => TraitKind::Boolean,
            TraitValue::Enum(_) => TraitKind::Enum,
            TraitValue::Array(_) => TraitKind::Array,
            TraitValue::Object(_) => TraitKind::Object,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            TraitValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TraitValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TraitValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<i64> {
        match self {
            TraitValue::Enum(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_elements(&self) -> Option<&[Element]> {
        match self {
            TraitValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_composite(&self) -> Option<&Composite> {
        match self {
            TraitValue::Object(c) => Some(c),
            _ => None,
        }
    }

    /// The suffix this value contributes to a composite price key.
    ///
    /// Only enumerated and boolean values are priced per value.
    pub fn price_suffix(&self) -> Option<String> {
        match self {
            TraitValue::Enum(n) => Some(n.to_string()),
            TraitValue::Boolean(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

impl From<f64> for TraitValue {
    fn from(n: f64) -> Self {
        TraitValue::Number(n)
    }
}

impl From<bool> for TraitValue {
    fn from(b: bool) -> Self {
        TraitValue::Boolean(b)
    }
}

impl From<&str> for TraitValue {
    fn from(s: &str) -> Self {
        TraitValue::String(s.to_string())
    }
}

impl From<String> for TraitValue {
    fn from(s: String) -> Self {
        TraitValue::String(s)
    }
}

impl From<Appearance> for TraitValue {
    fn from(a: Appearance) -> Self {
        TraitValue::Object(Composite::Appearance(a))
    }
}

/// One identity-bearing member of an array trait.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Element {
    Language(Language),
    Reputation(Reputation),
    Rank(Rank),
}

impl Element {
    /// The local identity used to match this element across edits.
    pub fn key(&self) -> ElementKey {
        match self {
            Element::Language(l) => l.key,
            Element::Reputation(r) => r.key,
            Element::Rank(r) => r.key,
        }
    }

    pub fn as_language(&self) -> Option<&Language> {
        match self {
            Element::Language(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_reputation(&self) -> Option<&Reputation> {
        match self {
            Element::Reputation(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_rank(&self) -> Option<&Rank> {
        match self {
            Element::Rank(r) => Some(r),
            _ => None,
        }
    }
}

impl From<Language> for Element {
    fn from(l: Language) -> Self {
        Element::Language(l)
    }
}

impl From<Reputation> for Element {
    fn from(r: Reputation) -> Self {
        Element::Reputation(r)
    }
}

impl From<Rank> for Element {
    fn from(r: Rank) -> Self {
        Element::Rank(r)
    }
}

/// A composite record tracked as a single object trait.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Composite {
    Appearance(Appearance),
}

impl Composite {
    pub fn as_appearance(&self) -> Option<&Appearance> {
        match self {
            Composite::Appearance(a) => Some(a),
        }
    }

    /// Read one numeric sub-attribute. Flags read as 0 or 1.
    pub fn attribute(&self, name: &str) -> Option<f64> {
        match self {
            Composite::Appearance(a) => a.attribute(name),
        }
    }
}
