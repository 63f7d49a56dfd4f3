//! Delta group module.
//!
//! A `DeltaGroup` binds one baseline entity to the pending changes made to
//! it during an editing session, and prices those changes as a whole.

use crate::breakdown::{CostBreakdown, TraitCost};
use crate::character::ElementKey;
use crate::cost::{round_points, CustomCost, DerivedCost, TraitView};
use crate::delta::Delta;
use crate::error::PointError;
use crate::modifier::ModifierGroup;
use crate::price::{PriceLookup, PriceTable};
use crate::source::TraitSource;
use crate::trait_id::TraitId;
use crate::value::{Composite, Element, TraitKind, TraitValue};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, trace, warn};

/// Pending changes to one baseline entity, at most one delta per trait.
///
/// # Examples
///
/// ```rust
/// use pointbuy::{Character, DeltaGroup, ModifierGroup, PriceTable, TraitId};
///
/// let mut group = DeltaGroup::new(Character::new(125.0), PriceTable::standard());
/// let st = TraitId::from_str("st");
///
/// group.increase_value(&st).unwrap();
/// assert_eq!(group.effective_number(&st).unwrap(), 11.0);
/// assert_eq!(group.cost(&ModifierGroup::new()).unwrap(), 10.0);
///
/// group.decrease_value(&st, Some(1.0)).unwrap();
/// assert_eq!(group.cost(&ModifierGroup::new()).unwrap(), 0.0);
/// ```
pub struct DeltaGroup<E: TraitSource, P: PriceLookup = PriceTable> {
    baseline: E,
    prices: P,
    deltas: HashMap<TraitId, Delta>,
    overrides: HashMap<TraitId, Box<dyn DerivedCost>>,
}

impl<E: TraitSource, P: PriceLookup> DeltaGroup<E, P> {
    pub fn new(baseline: E, prices: P) -> Self {
        Self {
            baseline,
            prices,
            deltas: HashMap::new(),
            overrides: HashMap::new(),
        }
    }

    /// The committed entity. Pending changes are not visible here.
    pub fn baseline(&self) -> &E {
        &self.baseline
    }

    pub fn prices(&self) -> &P {
        &self.prices
    }

    /// The delta for a trait, creating it from the baseline on first touch.
    ///
    /// Fails with `UnknownTrait` if the baseline has no such trait, and with
    /// `TypeMismatch` if the trait is already tracked under another kind or
    /// its baseline value is of another kind.
    pub fn get_or_create(&mut self, trait_id: &TraitId, kind: TraitKind) -> Result<&mut Delta, PointError> {
        match self.deltas.get(trait_id) {
            Some(existing) if existing.kind() != kind => {
                return Err(PointError::type_mismatch(trait_id, existing.kind(), kind));
            }
            Some(_) => {}
            None => {
                let delta = self.untracked_delta(trait_id, kind)?;
                debug!(trait_id = %trait_id, kind = %kind, "tracking trait");
                self.deltas.insert(trait_id.clone(), delta);
            }
        }
        self.deltas
            .get_mut(trait_id)
            .ok_or_else(|| PointError::UnknownTrait(trait_id.clone()))
    }

    fn untracked_delta(&self, trait_id: &TraitId, kind: TraitKind) -> Result<Delta, PointError> {
        Delta::new(trait_id.clone(), kind, self.baseline_value(trait_id)?)
    }

    /// Apply one edit to a trait's delta.
    ///
    /// An untracked trait is edited on a fresh delta that is only kept when
    /// the edit succeeds and changes the value, so a rejected or no-op edit
    /// leaves the group as it was.
    fn edit<T>(
        &mut self,
        trait_id: &TraitId,
        kind: TraitKind,
        apply: impl FnOnce(&mut Delta) -> Result<T, PointError>,
    ) -> Result<T, PointError> {
        if let Some(existing) = self.deltas.get_mut(trait_id) {
            if existing.kind() != kind {
                return Err(PointError::type_mismatch(trait_id, existing.kind(), kind));
            }
            return apply(existing);
        }

        let mut delta = self.untracked_delta(trait_id, kind)?;
        let result = apply(&mut delta)?;
        if delta.is_changed() {
            debug!(trait_id = %trait_id, kind = %kind, "tracking trait");
            self.deltas.insert(trait_id.clone(), delta);
        }
        Ok(result)
    }

    pub fn get(&self, trait_id: &TraitId) -> Option<&Delta> {
        self.deltas.get(trait_id)
    }

    pub fn has(&self, trait_id: &TraitId) -> bool {
        self.deltas.contains_key(trait_id)
    }

    /// Tracked traits, sorted by name.
    pub fn tracked(&self) -> Vec<TraitId> {
        let mut ids: Vec<_> = self.deltas.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Pending value if tracked, else the baseline value.
    pub fn effective_value(&self, trait_id: &TraitId) -> Result<TraitValue, PointError> {
        match self.deltas.get(trait_id) {
            Some(delta) => Ok(delta.modded_value().clone()),
            None => self.baseline_value(trait_id),
        }
    }

    pub fn baseline_value(&self, trait_id: &TraitId) -> Result<TraitValue, PointError> {
        self.baseline
            .trait_value(trait_id)
            .ok_or_else(|| PointError::UnknownTrait(trait_id.clone()))
    }

    pub fn effective_number(&self, trait_id: &TraitId) -> Result<f64, PointError> {
        let value = self.effective_value(trait_id)?;
        value
            .as_number()
            .ok_or_else(|| PointError::type_mismatch(trait_id, TraitKind::Number, value.kind()))
    }

    pub fn effective_enum(&self, trait_id: &TraitId) -> Result<i64, PointError> {
        let value = self.effective_value(trait_id)?;
        value
            .as_enum()
            .ok_or_else(|| PointError::type_mismatch(trait_id, TraitKind::Enum, value.kind()))
    }

    pub fn effective_bool(&self, trait_id: &TraitId) -> Result<bool, PointError> {
        let value = self.effective_value(trait_id)?;
        value
            .as_bool()
            .ok_or_else(|| PointError::type_mismatch(trait_id, TraitKind::Boolean, value.kind()))
    }

    pub fn effective_string(&self, trait_id: &TraitId) -> Result<String, PointError> {
        match self.effective_value(trait_id)? {
            TraitValue::String(s) => Ok(s),
            other => Err(PointError::type_mismatch(trait_id, TraitKind::String, other.kind())),
        }
    }

    pub fn effective_elements(&self, trait_id: &TraitId) -> Result<Vec<Element>, PointError> {
        match self.effective_value(trait_id)? {
            TraitValue::Array(items) => Ok(items),
            other => Err(PointError::type_mismatch(trait_id, TraitKind::Array, other.kind())),
        }
    }

    pub fn effective_composite(&self, trait_id: &TraitId) -> Result<Composite, PointError> {
        match self.effective_value(trait_id)? {
            TraitValue::Object(c) => Ok(c),
            other => Err(PointError::type_mismatch(trait_id, TraitKind::Object, other.kind())),
        }
    }

    /// Net numeric change of a trait; 0 when untracked.
    pub fn value_change(&self, trait_id: &TraitId) -> Result<f64, PointError> {
        match self.deltas.get(trait_id) {
            Some(delta) => delta.value_change(),
            None => Ok(0.0),
        }
    }

    /// Step a numeric trait up by its increment.
    pub fn increase_value(&mut self, trait_id: &TraitId) -> Result<(), PointError> {
        let step = self.prices.increment(trait_id.as_str());
        self.edit(trait_id, TraitKind::Number, |d| d.increase_value(step))
    }

    /// Step a numeric trait down by its increment.
    ///
    /// A no-op when the effective value is already at or below `min`.
    pub fn decrease_value(&mut self, trait_id: &TraitId, min: Option<f64>) -> Result<(), PointError> {
        let current = self.effective_number(trait_id)?;
        if min.is_some_and(|floor| current <= floor) {
            return Ok(());
        }
        let step = self.prices.increment(trait_id.as_str());
        self.edit(trait_id, TraitKind::Number, |d| d.decrease_value(step))
    }

    pub fn change_string(&mut self, trait_id: &TraitId, value: impl Into<String>) -> Result<(), PointError> {
        let value = TraitValue::String(value.into());
        self.edit(trait_id, TraitKind::String, |d| d.change_value(value))
    }

    pub fn change_boolean(&mut self, trait_id: &TraitId, value: bool) -> Result<(), PointError> {
        self.edit(trait_id, TraitKind::Boolean, |d| d.change_value(TraitValue::Boolean(value)))
    }

    pub fn change_enum(&mut self, trait_id: &TraitId, value: i64) -> Result<(), PointError> {
        self.edit(trait_id, TraitKind::Enum, |d| d.change_value(TraitValue::Enum(value)))
    }

    pub fn change_object(&mut self, trait_id: &TraitId, value: Composite) -> Result<(), PointError> {
        self.edit(trait_id, TraitKind::Object, |d| d.change_value(TraitValue::Object(value)))
    }

    /// Replace one element of an array trait with an edited copy.
    pub fn change_array(
        &mut self,
        trait_id: &TraitId,
        element: Element,
        index: Option<usize>,
    ) -> Result<(), PointError> {
        self.edit(trait_id, TraitKind::Array, |d| d.change_element(element, index))
    }

    pub fn push_to_array(&mut self, trait_id: &TraitId, element: Element) -> Result<(), PointError> {
        self.edit(trait_id, TraitKind::Array, |d| d.add_value(element))
    }

    pub fn remove_from_array(
        &mut self,
        trait_id: &TraitId,
        key: &ElementKey,
    ) -> Result<Option<Element>, PointError> {
        self.edit(trait_id, TraitKind::Array, |d| d.remove_value(key))
    }

    /// Attach caller-supplied pricing to a trait, tracking it if needed.
    pub fn set_custom_cost(
        &mut self,
        trait_id: &TraitId,
        kind: TraitKind,
        cost: CustomCost,
    ) -> Result<(), PointError> {
        debug!(trait_id = %trait_id, ?cost, "registering custom cost");
        self.get_or_create(trait_id, kind)?.set_custom_cost(cost)
    }

    /// Price a trait from the whole session instead of its own delta.
    ///
    /// The trait is priced on every total even while untracked, so changes
    /// to the traits it depends on are picked up.
    pub fn set_override(
        &mut self,
        trait_id: &TraitId,
        cost: impl DerivedCost + 'static,
    ) -> Result<(), PointError> {
        self.baseline_value(trait_id)?;
        debug!(trait_id = %trait_id, "registering derived cost");
        self.overrides.insert(trait_id.clone(), Box::new(cost));
        Ok(())
    }

    /// Raw cost of one trait, before discounts and rounding.
    pub fn raw_cost(&self, trait_id: &TraitId) -> Result<f64, PointError> {
        if let Some(derived) = self.overrides.get(trait_id) {
            return derived.derived_cost(trait_id, self);
        }
        match self.deltas.get(trait_id) {
            Some(delta) => delta.cost(&self.prices),
            None => Ok(0.0),
        }
    }

    /// Priced line for one trait under the active modifiers.
    pub fn trait_cost(&self, trait_id: &TraitId, modifiers: &ModifierGroup) -> Result<TraitCost, PointError> {
        let raw = self.raw_cost(trait_id)?;
        let discount =
            modifiers.total_discount(trait_id, self.prices.max_discount(trait_id.as_str()));
        let cost = round_points(raw - raw * discount);
        trace!(trait_id = %trait_id, raw, discount, cost, "priced trait");
        Ok(TraitCost {
            trait_id: trait_id.clone(),
            raw,
            discount,
            cost,
        })
    }

    /// Every priced trait with its raw cost, discount and rounded cost.
    pub fn cost_breakdown(&self, modifiers: &ModifierGroup) -> Result<CostBreakdown, PointError> {
        let priced: BTreeSet<&TraitId> = self.deltas.keys().chain(self.overrides.keys()).collect();

        let mut breakdown = CostBreakdown::new();
        for trait_id in priced {
            let line = self.trait_cost(trait_id, modifiers).map_err(|err| {
                warn!(trait_id = %trait_id, error = %err, "cost computation failed");
                err
            })?;
            breakdown.add(line.trait_id, line.raw, line.discount, line.cost);
        }
        Ok(breakdown)
    }

    /// Total cost of all pending changes, rounded per trait before summing.
    pub fn cost(&self, modifiers: &ModifierGroup) -> Result<f64, PointError> {
        Ok(self.cost_breakdown(modifiers)?.total)
    }

    /// Stop tracking one trait, dropping its pending change.
    pub fn reset(&mut self, trait_id: &TraitId) -> Option<Delta> {
        self.deltas.remove(trait_id)
    }

    /// Replace the baseline and drop every pending change.
    pub(crate) fn adopt(&mut self, baseline: E) {
        debug!(traits = self.deltas.len(), "adopted new baseline");
        self.baseline = baseline;
        self.deltas.clear();
    }

    /// Throw away every pending change and hand back the baseline.
    pub fn discard(self) -> E {
        self.baseline
    }
}

impl<E: TraitSource + Clone, P: PriceLookup> DeltaGroup<E, P> {
    /// A copy of the baseline with every pending change folded in.
    ///
    /// The group itself is left untouched.
    pub fn committed(&self) -> Result<E, PointError> {
        let mut committed = self.baseline.clone();
        for trait_id in self.tracked() {
            if let Some(delta) = self.deltas.get(&trait_id) {
                committed.set_trait_value(&trait_id, delta.modded_value().clone())?;
            }
        }
        Ok(committed)
    }

    /// Fold every pending change into the baseline.
    ///
    /// A failed write leaves both the baseline and the pending changes as
    /// they were. Derived pricing stays registered; per-delta custom pricing
    /// goes with its delta.
    pub fn commit(&mut self) -> Result<(), PointError> {
        let committed = self.committed()?;
        self.adopt(committed);
        Ok(())
    }
}

impl<E: TraitSource, P: PriceLookup> TraitView for DeltaGroup<E, P> {
    fn effective_value(&self, trait_id: &TraitId) -> Result<TraitValue, PointError> {
        DeltaGroup::effective_value(self, trait_id)
    }

    fn baseline_value(&self, trait_id: &TraitId) -> Result<TraitValue, PointError> {
        DeltaGroup::baseline_value(self, trait_id)
    }

    fn prices(&self) -> &dyn PriceLookup {
        &self.prices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::Character;
    use crate::cost::{RankCost, WealthCost};
    use crate::source::TraitMap;
    use crate::character::Rank;

    fn id(name: &str) -> TraitId {
        TraitId::from_str(name)
    }

    fn group() -> DeltaGroup<Character> {
        DeltaGroup::new(Character::new(125.0), PriceTable::standard())
    }

    #[test]
    fn test_effective_value_passthrough() {
        let group = group();
        assert_eq!(group.effective_number(&id("st")).unwrap(), 10.0);
        assert!(!group.has(&id("st")));
        assert_eq!(group.value_change(&id("st")).unwrap(), 0.0);
    }

    #[test]
    fn test_unknown_trait() {
        let mut group = group();
        let err = group.increase_value(&id("charisma")).unwrap_err();
        assert_eq!(err, PointError::UnknownTrait(id("charisma")));
        assert!(group.tracked().is_empty());
    }

    #[test]
    fn test_get_or_create_conflicting_kind() {
        let mut group = DeltaGroup::new(TraitMap::empty().with("st", 10.0), PriceTable::standard());
        group.get_or_create(&id("st"), TraitKind::Number).unwrap();
        let err = group.get_or_create(&id("st"), TraitKind::Enum).unwrap_err();
        assert!(matches!(err, PointError::TypeMismatch { .. }));
    }

    #[test]
    fn test_decrease_floor_guard() {
        let mut group = DeltaGroup::new(TraitMap::empty().with("iq", 2.0), PriceTable::standard());
        group.decrease_value(&id("iq"), Some(1.0)).unwrap();
        group.decrease_value(&id("iq"), Some(1.0)).unwrap();
        group.decrease_value(&id("iq"), Some(1.0)).unwrap();
        assert_eq!(group.effective_number(&id("iq")).unwrap(), 1.0);
        assert_eq!(group.cost(&ModifierGroup::new()).unwrap(), -20.0);
    }

    #[test]
    fn test_discount_rounds_per_trait() {
        let mut group = group();
        let mut modifiers = ModifierGroup::new();
        modifiers.set_modifier(id("st"), 1.0, 1.0, 0.25, "template");
        modifiers.set_modifier(id("hp"), 1.0, 1.0, 0.25, "template");

        group.increase_value(&id("st")).unwrap();
        group.increase_value(&id("hp")).unwrap();

        // st: 10 - 2.5 = 7.5 -> 8, hp: 2 - 0.5 = 1.5 -> 2
        let breakdown = group.cost_breakdown(&modifiers).unwrap();
        assert_eq!(breakdown.get(&id("st")).unwrap().cost, 8.0);
        assert_eq!(breakdown.get(&id("hp")).unwrap().cost, 2.0);
        assert_eq!(breakdown.total, 10.0);
    }

    #[test]
    fn test_array_edits_through_group() {
        let mut group = group();
        let ranks = id("ranks");
        group
            .set_custom_cost(&ranks, TraitKind::Array, CustomCost::per_element(RankCost))
            .unwrap();

        let mut rank = Rank::new("Guild", 1, "", false);
        group.push_to_array(&ranks, rank.clone().into()).unwrap();
        rank.rank = 2;
        group.change_array(&ranks, rank.clone().into(), Some(0)).unwrap();
        assert_eq!(group.cost(&ModifierGroup::new()).unwrap(), 10.0);

        group.remove_from_array(&ranks, &rank.key).unwrap();
        assert_eq!(group.cost(&ModifierGroup::new()).unwrap(), 0.0);
    }

    #[test]
    fn test_override_priced_while_untracked() {
        let mut group = group();
        group.set_override(&id("wealth"), WealthCost).unwrap();
        group.change_enum(&id("wealth"), 8).unwrap();
        assert_eq!(group.cost(&ModifierGroup::new()).unwrap(), 75.0);

        group.reset(&id("wealth"));
        assert_eq!(group.cost(&ModifierGroup::new()).unwrap(), 0.0);

        let err = group.set_override(&id("charisma"), WealthCost).unwrap_err();
        assert_eq!(err, PointError::UnknownTrait(id("charisma")));
    }

    #[test]
    fn test_failed_cost_surfaces() {
        let mut group = group();
        group.get_or_create(&id("appearance"), TraitKind::Object).unwrap();
        let err = group.cost(&ModifierGroup::new()).unwrap_err();
        assert!(matches!(err, PointError::Configuration { .. }));
    }

    #[test]
    fn test_commit_and_discard() {
        let mut group = group();
        group.increase_value(&id("st")).unwrap();
        group.change_string(&id("name"), "Ilse").unwrap();
        group.commit().unwrap();

        assert!(group.tracked().is_empty());
        assert_eq!(group.baseline().st, 11.0);
        assert_eq!(group.baseline().name, "Ilse");
        assert_eq!(group.cost(&ModifierGroup::new()).unwrap(), 0.0);

        group.increase_value(&id("st")).unwrap();
        let baseline = group.discard();
        assert_eq!(baseline.st, 11.0);
    }
}
