//! Delta module.
//!
//! A `Delta` is one trait's pending change: the baseline value captured when
//! the trait was first touched, the pending value, and the shape that decides
//! how both are priced.

use crate::character::ElementKey;
use crate::cost::{CustomCost, ElementCost};
use crate::error::PointError;
use crate::price::PriceLookup;
use crate::trait_id::TraitId;
use crate::value::{Element, TraitKind, TraitValue};
use std::collections::{HashMap, HashSet};

/// A pending change to one trait.
///
/// The old value never changes after construction, and the pending value
/// always keeps the declared shape. Every mutator validates before it
/// writes, so a rejected call leaves the delta as it was.
///
/// # Examples
///
/// ```rust
/// use pointbuy::{Delta, PriceTable, TraitId, TraitKind, TraitValue};
///
/// let prices = PriceTable::standard();
/// let mut st = Delta::new(TraitId::from_str("st"), TraitKind::Number, TraitValue::Number(10.0)).unwrap();
///
/// st.increase_value(2.0).unwrap();
/// assert_eq!(st.value_change().unwrap(), 2.0);
/// assert_eq!(st.cost(&prices).unwrap(), 20.0);
/// assert_eq!(st.old_value(), &TraitValue::Number(10.0));
/// ```
#[derive(Debug)]
pub struct Delta {
    trait_id: TraitId,
    kind: TraitKind,
    old_value: TraitValue,
    new_value: TraitValue,
    custom_cost: Option<CustomCost>,
}

impl Delta {
    /// Start tracking a trait from its baseline value.
    ///
    /// Fails with `TypeMismatch` if the baseline value is not of `kind`.
    pub fn new(trait_id: TraitId, kind: TraitKind, baseline: TraitValue) -> Result<Self, PointError> {
        if baseline.kind() != kind {
            return Err(PointError::type_mismatch(&trait_id, kind, baseline.kind()));
        }
        Ok(Self {
            trait_id,
            kind,
            new_value: baseline.clone(),
            old_value: baseline,
            custom_cost: None,
        })
    }

    pub fn trait_id(&self) -> &TraitId {
        &self.trait_id
    }

    pub fn kind(&self) -> TraitKind {
        self.kind
    }

    /// The pending value.
    pub fn modded_value(&self) -> &TraitValue {
        &self.new_value
    }

    /// The baseline value captured at creation.
    pub fn old_value(&self) -> &TraitValue {
        &self.old_value
    }

    /// Whether the pending value differs from the baseline.
    pub fn is_changed(&self) -> bool {
        self.new_value != self.old_value
    }

    fn expect_kind(&self, expected: TraitKind) -> Result<(), PointError> {
        if self.kind != expected {
            return Err(PointError::type_mismatch(&self.trait_id, expected, self.kind));
        }
        Ok(())
    }

    /// Net numeric change. Number traits only.
    pub fn value_change(&self) -> Result<f64, PointError> {
        match (&self.old_value, &self.new_value) {
            (TraitValue::Number(old), TraitValue::Number(new)) => Ok(new - old),
            _ => Err(PointError::type_mismatch(&self.trait_id, TraitKind::Number, self.kind)),
        }
    }

    /// Net change of one sub-attribute of an object trait.
    ///
    /// Flags count as 0 or 1. Unknown attribute names fail with
    /// `InvalidArgument`.
    pub fn attribute_change(&self, attribute: &str) -> Result<f64, PointError> {
        match (&self.old_value, &self.new_value) {
            (TraitValue::Object(old), TraitValue::Object(new)) => {
                let read = |value: &crate::value::Composite| {
                    value.attribute(attribute).ok_or_else(|| {
                        PointError::InvalidArgument(format!(
                            "{} has no attribute {attribute:?}",
                            self.trait_id
                        ))
                    })
                };
                Ok(read(new)? - read(old)?)
            }
            _ => Err(PointError::type_mismatch(&self.trait_id, TraitKind::Object, self.kind)),
        }
    }

    pub fn increase_value(&mut self, amount: f64) -> Result<(), PointError> {
        self.step(amount)
    }

    pub fn decrease_value(&mut self, amount: f64) -> Result<(), PointError> {
        self.step(-amount)
    }

    fn step(&mut self, amount: f64) -> Result<(), PointError> {
        match &mut self.new_value {
            TraitValue::Number(n) => {
                *n += amount;
                Ok(())
            }
            other => Err(PointError::type_mismatch(&self.trait_id, TraitKind::Number, other.kind())),
        }
    }

    fn elements(&self) -> Result<&[Element], PointError> {
        self.new_value
            .as_elements()
            .ok_or_else(|| PointError::type_mismatch(&self.trait_id, TraitKind::Array, self.kind))
    }

    fn elements_mut(&mut self) -> Result<&mut Vec<Element>, PointError> {
        match &mut self.new_value {
            TraitValue::Array(items) => Ok(items),
            other => Err(PointError::type_mismatch(&self.trait_id, TraitKind::Array, other.kind())),
        }
    }

    fn duplicate(&self, key: ElementKey) -> PointError {
        PointError::DuplicateElement {
            trait_id: self.trait_id.clone(),
            key: key.to_string(),
        }
    }

    /// Append an element to an array trait.
    pub fn add_value(&mut self, element: Element) -> Result<(), PointError> {
        let key = element.key();
        if self.elements()?.iter().any(|e| e.key() == key) {
            return Err(self.duplicate(key));
        }
        self.elements_mut()?.push(element);
        Ok(())
    }

    /// Remove the element with this key from an array trait.
    ///
    /// Returns the removed element, or `None` if no element had the key.
    pub fn remove_value(&mut self, key: &ElementKey) -> Result<Option<Element>, PointError> {
        let items = self.elements_mut()?;
        Ok(items
            .iter()
            .position(|e| &e.key() == key)
            .map(|index| items.remove(index)))
    }

    /// Replace the pending value of a non-array trait.
    ///
    /// Array traits fail with `MissingIndex`; use [`Delta::change_element`].
    pub fn change_value(&mut self, value: TraitValue) -> Result<(), PointError> {
        if self.kind == TraitKind::Array {
            return Err(PointError::MissingIndex(self.trait_id.clone()));
        }
        if value.kind() != self.kind {
            return Err(PointError::type_mismatch(&self.trait_id, self.kind, value.kind()));
        }
        self.new_value = value;
        Ok(())
    }

    /// Replace one element of an array trait.
    pub fn change_element(&mut self, element: Element, index: Option<usize>) -> Result<(), PointError> {
        self.expect_kind(TraitKind::Array)?;
        let index = index.ok_or_else(|| PointError::MissingIndex(self.trait_id.clone()))?;

        let items = self.elements()?;
        if index >= items.len() {
            return Err(PointError::IndexOutOfRange {
                trait_id: self.trait_id.clone(),
                index,
                len: items.len(),
            });
        }
        let key = element.key();
        if items.iter().enumerate().any(|(i, e)| i != index && e.key() == key) {
            return Err(self.duplicate(key));
        }

        self.elements_mut()?[index] = element;
        Ok(())
    }

    /// Attach caller-supplied pricing.
    ///
    /// Per-element pricing only fits array traits and whole-value pricing
    /// only fits the rest; a mismatch fails with `Configuration`.
    pub fn set_custom_cost(&mut self, cost: CustomCost) -> Result<(), PointError> {
        if !cost.fits(self.kind) {
            return Err(PointError::configuration(
                &self.trait_id,
                format!("{cost:?} does not apply to a {} trait", self.kind),
            ));
        }
        self.custom_cost = Some(cost);
        Ok(())
    }

    pub fn has_custom_cost(&self) -> bool {
        self.custom_cost.is_some()
    }

    /// Point cost of the pending change, before discounts and rounding.
    pub fn cost(&self, prices: &dyn PriceLookup) -> Result<f64, PointError> {
        match &self.custom_cost {
            Some(CustomCost::Whole(cost)) => {
                return cost.value_cost(&self.old_value, &self.new_value, prices);
            }
            None if self.kind.requires_custom_cost() => {
                return Err(PointError::configuration(
                    &self.trait_id,
                    format!("{} traits need custom pricing", self.kind),
                ));
            }
            _ => {}
        }

        match (&self.old_value, &self.new_value) {
            (TraitValue::Number(_), TraitValue::Number(_)) => {
                let key = self.trait_id.as_str();
                Ok(self.value_change()? * prices.cost(key)? / prices.increment(key))
            }
            (TraitValue::String(_), TraitValue::String(_)) => Ok(0.0),
            (TraitValue::Array(old), TraitValue::Array(new)) => match &self.custom_cost {
                Some(CustomCost::PerElement(cost)) => array_cost(old, new, cost.as_ref(), prices),
                _ => Err(PointError::configuration(
                    &self.trait_id,
                    "array traits need per-element pricing",
                )),
            },
            (TraitValue::Object(_), TraitValue::Object(_)) => Err(PointError::configuration(
                &self.trait_id,
                "object traits need whole-value pricing",
            )),
            (old, new) => match (old.price_suffix(), new.price_suffix()) {
                (Some(old), Some(new)) => {
                    let new_cost = prices.cost(&self.trait_id.keyed(new))?;
                    let old_cost = prices.cost(&self.trait_id.keyed(old))?;
                    Ok(new_cost - old_cost)
                }
                _ => Err(PointError::type_mismatch(&self.trait_id, old.kind(), new.kind())),
            },
        }
    }
}

/// Itemized cost of an array edit, matching elements by key.
///
/// Added elements count in full, removed ones count negatively, and
/// elements present on both sides count by the difference of their prices.
fn array_cost(
    old: &[Element],
    new: &[Element],
    cost: &dyn ElementCost,
    prices: &dyn PriceLookup,
) -> Result<f64, PointError> {
    let before: HashMap<ElementKey, &Element> = old.iter().map(|e| (e.key(), e)).collect();
    let after: HashSet<ElementKey> = new.iter().map(Element::key).collect();

    let mut total = 0.0;
    for element in new {
        total += cost.element_cost(element, prices)?;
        if let Some(previous) = before.get(&element.key()) {
            total -= cost.element_cost(previous, prices)?;
        }
    }
    for element in old.iter().filter(|e| !after.contains(&e.key())) {
        total -= cost.element_cost(element, prices)?;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::{Appearance, Language, Rank};
    use crate::cost::{AppearanceCost, LanguageCost, RankCost};
    use crate::price::PriceTable;

    fn number(name: &str, value: f64) -> Delta {
        Delta::new(TraitId::from_str(name), TraitKind::Number, TraitValue::Number(value)).unwrap()
    }

    fn ranks(items: Vec<Rank>) -> Delta {
        let elements = items.into_iter().map(Element::from).collect();
        let mut delta = Delta::new(
            TraitId::from_str("ranks"),
            TraitKind::Array,
            TraitValue::Array(elements),
        )
        .unwrap();
        delta.set_custom_cost(CustomCost::per_element(RankCost)).unwrap();
        delta
    }

    #[test]
    fn test_new_rejects_wrong_baseline_shape() {
        let err = Delta::new(TraitId::from_str("st"), TraitKind::Enum, TraitValue::Number(10.0))
            .unwrap_err();
        assert!(matches!(err, PointError::TypeMismatch { .. }));
    }

    #[test]
    fn test_number_cost_prorated_by_increment() {
        let prices = PriceTable::standard();
        let mut speed = number("basicSpeed", 5.0);
        speed.increase_value(0.25).unwrap();
        assert_eq!(speed.cost(&prices).unwrap(), 5.0 * 0.25 / 0.25);

        speed.increase_value(0.25).unwrap();
        assert_eq!(speed.cost(&prices).unwrap(), 10.0);
    }

    #[test]
    fn test_old_value_is_a_snapshot() {
        let mut st = number("st", 10.0);
        st.decrease_value(3.0).unwrap();
        assert_eq!(st.old_value(), &TraitValue::Number(10.0));
        assert_eq!(st.modded_value(), &TraitValue::Number(7.0));
        assert!(st.is_changed());
    }

    #[test]
    fn test_string_is_free() {
        let prices = PriceTable::standard();
        let mut name = Delta::new(TraitId::from_str("name"), TraitKind::String, "".into()).unwrap();
        name.change_value("Ardent".into()).unwrap();
        assert_eq!(name.cost(&prices).unwrap(), 0.0);
    }

    #[test]
    fn test_enum_cost_uses_composite_keys() {
        let prices = PriceTable::standard();
        let mut build = Delta::new(TraitId::from_str("build"), TraitKind::Enum, TraitValue::Enum(1)).unwrap();
        build.change_value(TraitValue::Enum(0)).unwrap();
        assert_eq!(build.cost(&prices).unwrap(), -5.0);

        build.change_value(TraitValue::Enum(1)).unwrap();
        assert_eq!(build.cost(&prices).unwrap(), 0.0);
    }

    #[test]
    fn test_boolean_cost_uses_value_keys() {
        let prices = PriceTable::empty()
            .with_cost("ambidextrousfalse", 0.0)
            .with_cost("ambidextroustrue", 5.0);
        let mut flag = Delta::new(
            TraitId::from_str("ambidextrous"),
            TraitKind::Boolean,
            TraitValue::Boolean(false),
        )
        .unwrap();
        flag.change_value(TraitValue::Boolean(true)).unwrap();
        assert_eq!(flag.cost(&prices).unwrap(), 5.0);
    }

    #[test]
    fn test_missing_price_is_a_lookup_error() {
        let prices = PriceTable::empty();
        let mut st = number("st", 10.0);
        st.increase_value(1.0).unwrap();
        assert_eq!(st.cost(&prices), Err(PointError::Lookup("st".into())));
    }

    #[test]
    fn test_number_ops_rejected_on_other_kinds() {
        let mut name = Delta::new(TraitId::from_str("name"), TraitKind::String, "".into()).unwrap();
        assert!(matches!(name.increase_value(1.0), Err(PointError::TypeMismatch { .. })));
        assert!(matches!(name.value_change(), Err(PointError::TypeMismatch { .. })));
        assert_eq!(name.modded_value(), &TraitValue::from(""));
    }

    #[test]
    fn test_change_value_rejects_other_shape() {
        let mut st = number("st", 10.0);
        let err = st.change_value(TraitValue::Boolean(true)).unwrap_err();
        assert!(matches!(err, PointError::TypeMismatch { .. }));
        assert_eq!(st.modded_value(), &TraitValue::Number(10.0));
    }

    #[test]
    fn test_array_requires_custom_cost() {
        let prices = PriceTable::standard();
        let delta = Delta::new(
            TraitId::from_str("languages"),
            TraitKind::Array,
            TraitValue::Array(vec![]),
        )
        .unwrap();
        assert!(matches!(delta.cost(&prices), Err(PointError::Configuration { .. })));
    }

    #[test]
    fn test_object_requires_custom_cost() {
        let prices = PriceTable::standard();
        let delta = Delta::new(
            TraitId::from_str("appearance"),
            TraitKind::Object,
            Appearance::blank().into(),
        )
        .unwrap();
        assert!(matches!(delta.cost(&prices), Err(PointError::Configuration { .. })));
    }

    #[test]
    fn test_custom_cost_must_fit_kind() {
        let mut st = number("st", 10.0);
        let err = st
            .set_custom_cost(CustomCost::per_element(LanguageCost))
            .unwrap_err();
        assert!(matches!(err, PointError::Configuration { .. }));
        assert!(!st.has_custom_cost());
    }

    #[test]
    fn test_whole_override_replaces_number_pricing() {
        let prices = PriceTable::standard();
        let mut st = number("st", 10.0);
        st.set_custom_cost(CustomCost::whole(
            |_: &TraitValue, _: &TraitValue, _: &dyn PriceLookup| -> Result<f64, PointError> {
                Ok(42.0)
            },
        ))
        .unwrap();
        st.increase_value(1.0).unwrap();
        assert_eq!(st.cost(&prices).unwrap(), 42.0);
    }

    #[test]
    fn test_array_add_remove_and_edit() {
        let prices = PriceTable::standard();
        let guild = Rank::new("Guild", 1, "", false);
        let navy = Rank::new("Navy", 2, "", false);
        let mut delta = ranks(vec![guild.clone()]);

        delta.add_value(navy.clone().into()).unwrap();
        assert_eq!(delta.cost(&prices).unwrap(), 10.0);

        let mut promoted = guild.clone();
        promoted.rank = 3;
        delta.change_element(promoted.into(), Some(0)).unwrap();
        assert_eq!(delta.cost(&prices).unwrap(), 20.0);

        let removed = delta.remove_value(&guild.key).unwrap();
        assert!(removed.is_some());
        assert_eq!(delta.cost(&prices).unwrap(), 10.0 - 5.0);
    }

    #[test]
    fn test_array_reorder_is_free() {
        let prices = PriceTable::standard();
        let a = Rank::new("A", 1, "", false);
        let b = Rank::new("B", 2, "", false);
        let mut delta = ranks(vec![a.clone(), b.clone()]);
        delta.remove_value(&a.key).unwrap();
        delta.add_value(a.into()).unwrap();
        assert_eq!(delta.cost(&prices).unwrap(), 0.0);
    }

    #[test]
    fn test_add_rejects_duplicate_key() {
        let rank = Rank::new("Guild", 1, "", false);
        let mut delta = ranks(vec![rank.clone()]);
        let err = delta.add_value(rank.into()).unwrap_err();
        assert!(matches!(err, PointError::DuplicateElement { .. }));
    }

    #[test]
    fn test_change_element_needs_valid_index() {
        let rank = Rank::new("Guild", 1, "", false);
        let mut delta = ranks(vec![rank.clone()]);

        let err = delta.change_element(rank.clone().into(), None).unwrap_err();
        assert_eq!(err, PointError::MissingIndex(TraitId::from_str("ranks")));

        let err = delta.change_element(rank.into(), Some(4)).unwrap_err();
        assert!(matches!(err, PointError::IndexOutOfRange { index: 4, len: 1, .. }));
    }

    #[test]
    fn test_change_value_on_array_is_missing_index() {
        let mut delta = ranks(vec![]);
        let err = delta.change_value(TraitValue::Array(vec![])).unwrap_err();
        assert!(matches!(err, PointError::MissingIndex(_)));
    }

    #[test]
    fn test_remove_absent_element_is_none() {
        let mut delta = ranks(vec![]);
        let stranger = Language::new("Latin", 1, None);
        assert_eq!(delta.remove_value(&stranger.key).unwrap(), None);
    }

    #[test]
    fn test_object_attribute_change_and_cost() {
        let prices = PriceTable::standard();
        let mut delta = Delta::new(
            TraitId::from_str("appearance"),
            TraitKind::Object,
            Appearance::blank().into(),
        )
        .unwrap();
        delta.set_custom_cost(CustomCost::whole(AppearanceCost)).unwrap();

        let mut attractive = Appearance::blank();
        attractive.appearance = 6;
        attractive.universal = true;
        delta.change_value(attractive.into()).unwrap();

        assert_eq!(delta.attribute_change("appearance").unwrap(), 1.0);
        assert_eq!(delta.attribute_change("universal").unwrap(), 1.0);
        assert!(delta.attribute_change("height").is_err());
        assert_eq!(delta.cost(&prices).unwrap(), 5.0);
    }
}
