//! Custom pricing module.
//!
//! Numbers, strings, booleans and enums price themselves from the price
//! table. Arrays and objects cannot: their cost must be supplied by the
//! caller as a [`CustomCost`]. Traits whose price depends on other traits
//! (wealth depends on the multimillionaire level, status on ranks) use a
//! [`DerivedCost`], which sees the whole editing session through a
//! [`TraitView`].
//!
//! The built-in rules for languages, reputations, ranks, appearance, wealth
//! and status live here as well.

use crate::character::names::{MULTIMILLIONAIRE_LEVEL, RANKS, STATUS, WEALTH};
use crate::character::{Appearance, Language, Rank, Reputation};
use crate::error::PointError;
use crate::price::PriceLookup;
use crate::trait_id::TraitId;
use crate::value::{Element, TraitKind, TraitValue};
use std::fmt;

/// Round a point cost to a whole number, halves upward.
///
/// # Examples
///
/// ```rust
/// use pointbuy::cost::round_points;
///
/// assert_eq!(round_points(2.5), 3.0);
/// assert_eq!(round_points(-2.5), -2.0);
/// assert_eq!(round_points(-2.6), -3.0);
/// ```
pub fn round_points(points: f64) -> f64 {
    (points + 0.5).floor()
}

/// Read access to an editing session: pending values, baseline values and
/// the price table.
pub trait TraitView {
    /// Pending value if the trait is tracked, else the baseline value.
    fn effective_value(&self, trait_id: &TraitId) -> Result<TraitValue, PointError>;

    /// Committed value, ignoring any pending change.
    fn baseline_value(&self, trait_id: &TraitId) -> Result<TraitValue, PointError>;

    fn prices(&self) -> &dyn PriceLookup;
}

fn expect_number(trait_id: &TraitId, value: TraitValue) -> Result<f64, PointError> {
    value
        .as_number()
        .ok_or_else(|| PointError::type_mismatch(trait_id, TraitKind::Number, value.kind()))
}

fn expect_enum(trait_id: &TraitId, value: TraitValue) -> Result<i64, PointError> {
    value
        .as_enum()
        .ok_or_else(|| PointError::type_mismatch(trait_id, TraitKind::Enum, value.kind()))
}

fn expect_ranks(trait_id: &TraitId, value: TraitValue) -> Result<Vec<Rank>, PointError> {
    match value {
        TraitValue::Array(items) => Ok(items
            .iter()
            .filter_map(Element::as_rank)
            .cloned()
            .collect()),
        other => Err(PointError::type_mismatch(trait_id, TraitKind::Array, other.kind())),
    }
}

/// Prices one element of an array trait.
///
/// Implemented for any `Fn(&Element, &dyn PriceLookup) -> Result<f64, PointError>`.
pub trait ElementCost: Send + Sync {
    fn element_cost(&self, element: &Element, prices: &dyn PriceLookup) -> Result<f64, PointError>;
}

impl<F> ElementCost for F
where
    F: Fn(&Element, &dyn PriceLookup) -> Result<f64, PointError> + Send + Sync,
{
    fn element_cost(&self, element: &Element, prices: &dyn PriceLookup) -> Result<f64, PointError> {
        self(element, prices)
    }
}

/// Prices a whole-value change from old to new.
///
/// Implemented for any
/// `Fn(&TraitValue, &TraitValue, &dyn PriceLookup) -> Result<f64, PointError>`.
pub trait ValueCost: Send + Sync {
    fn value_cost(
        &self,
        old: &TraitValue,
        new: &TraitValue,
        prices: &dyn PriceLookup,
    ) -> Result<f64, PointError>;
}

impl<F> ValueCost for F
where
    F: Fn(&TraitValue, &TraitValue, &dyn PriceLookup) -> Result<f64, PointError> + Send + Sync,
{
    fn value_cost(
        &self,
        old: &TraitValue,
        new: &TraitValue,
        prices: &dyn PriceLookup,
    ) -> Result<f64, PointError> {
        self(old, new, prices)
    }
}

/// Prices a trait from the state of the whole session.
///
/// Replaces the default pricing of the trait it is registered on.
pub trait DerivedCost: Send + Sync {
    fn derived_cost(&self, trait_id: &TraitId, view: &dyn TraitView) -> Result<f64, PointError>;
}

/// Caller-supplied pricing stored on a delta.
pub enum CustomCost {
    /// Array traits: price of one element. The delta diffs elements by key.
    PerElement(Box<dyn ElementCost>),
    /// Any non-array trait: price of the change from old to new.
    Whole(Box<dyn ValueCost>),
}

impl CustomCost {
    pub fn per_element(cost: impl ElementCost + 'static) -> Self {
        Self::PerElement(Box::new(cost))
    }

    pub fn whole(cost: impl ValueCost + 'static) -> Self {
        Self::Whole(Box::new(cost))
    }

    /// Whether this pricing can be attached to a trait of `kind`.
    pub fn fits(&self, kind: TraitKind) -> bool {
        match self {
            CustomCost::PerElement(_) => kind == TraitKind::Array,
            CustomCost::Whole(_) => kind != TraitKind::Array,
        }
    }
}

impl fmt::Debug for CustomCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustomCost::PerElement(_) => f.write_str("CustomCost::PerElement(<fn>)"),
            CustomCost::Whole(_) => f.write_str("CustomCost::Whole(<fn>)"),
        }
    }
}

// Languages

/// The native-language discount: a fully fluent language is free once.
pub fn native_discount(prices: &dyn PriceLookup) -> Result<f64, PointError> {
    prices.keyed_cost("language", &3)
}

/// Price of one language; half spoken, half written.
pub fn language_cost(
    language: &Language,
    native: bool,
    prices: &dyn PriceLookup,
) -> Result<f64, PointError> {
    let spoken = prices.keyed_cost("language", &language.spoken_comprehension)? / 2.0;
    let written = prices.keyed_cost("language", &language.effective_written_comprehension())? / 2.0;
    let discount = if native { native_discount(prices)? } else { 0.0 };
    Ok(spoken + written - discount)
}

/// Price of a whole language list. The first language is native.
pub fn languages_cost(languages: &[Language], prices: &dyn PriceLookup) -> Result<f64, PointError> {
    languages
        .iter()
        .enumerate()
        .map(|(i, language)| language_cost(language, i == 0, prices))
        .sum()
}

/// Per-element pricing for the `languages` trait. Never applies the native
/// discount; that depends on position, which elements do not know.
#[derive(Debug, Clone, Copy, Default)]
pub struct LanguageCost;

impl ElementCost for LanguageCost {
    fn element_cost(&self, element: &Element, prices: &dyn PriceLookup) -> Result<f64, PointError> {
        let language = element
            .as_language()
            .ok_or_else(|| PointError::InvalidArgument(format!("{} is not a language", element.key())))?;
        language_cost(language, false, prices)
    }
}

// Reputations

/// Price of a reputation: reaction × scope × frequency, floored.
pub fn reputation_cost(reputation: &Reputation, prices: &dyn PriceLookup) -> Result<f64, PointError> {
    if reputation.free {
        return Ok(0.0);
    }
    let mut cost = prices.cost("repReaction")? * reputation.reaction as f64;
    cost *= prices.keyed_cost("repScope", &reputation.scope)?;
    cost *= prices.keyed_cost("repFrequency", &reputation.frequency)?;
    Ok(cost.floor())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReputationCost;

impl ElementCost for ReputationCost {
    fn element_cost(&self, element: &Element, prices: &dyn PriceLookup) -> Result<f64, PointError> {
        let reputation = element.as_reputation().ok_or_else(|| {
            PointError::InvalidArgument(format!("{} is not a reputation", element.key()))
        })?;
        reputation_cost(reputation, prices)
    }
}

// Ranks and status

/// Price of a rank. A rank that replaces status uses its own price key.
pub fn rank_cost(rank: &Rank, prices: &dyn PriceLookup) -> Result<f64, PointError> {
    let key = if rank.replaces_status {
        "rankReplacesStatus"
    } else {
        "rank"
    };
    Ok(prices.cost(key)? * rank.rank as f64)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RankCost;

impl ElementCost for RankCost {
    fn element_cost(&self, element: &Element, prices: &dyn PriceLookup) -> Result<f64, PointError> {
        let rank = element
            .as_rank()
            .ok_or_else(|| PointError::InvalidArgument(format!("{} is not a rank", element.key())))?;
        rank_cost(rank, prices)
    }
}

/// The first rank that replaces status, if any.
pub fn status_rank(ranks: &[Rank]) -> Option<&Rank> {
    ranks.iter().find(|r| r.replaces_status)
}

/// Status after ranks: a status-replacing rank's level wins outright.
pub fn effective_status(status: f64, ranks: &[Rank]) -> f64 {
    match status_rank(ranks) {
        Some(rank) => rank.rank as f64,
        None => status,
    }
}

/// Price of the status score. Free when a rank replaces it.
pub fn status_cost(status: f64, ranks: &[Rank], prices: &dyn PriceLookup) -> Result<f64, PointError> {
    if status_rank(ranks).is_some() {
        return Ok(0.0);
    }
    Ok(prices.cost(STATUS)? * status)
}

/// Derived pricing for `status`, aware of status-replacing ranks.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusCost;

impl DerivedCost for StatusCost {
    fn derived_cost(&self, trait_id: &TraitId, view: &dyn TraitView) -> Result<f64, PointError> {
        let ranks_id = TraitId::from_str(RANKS);
        let new_status = expect_number(trait_id, view.effective_value(trait_id)?)?;
        let old_status = expect_number(trait_id, view.baseline_value(trait_id)?)?;
        let new_ranks = expect_ranks(&ranks_id, view.effective_value(&ranks_id)?)?;
        let old_ranks = expect_ranks(&ranks_id, view.baseline_value(&ranks_id)?)?;
        Ok(status_cost(new_status, &new_ranks, view.prices())?
            - status_cost(old_status, &old_ranks, view.prices())?)
    }
}

// Wealth

/// Level at which wealth switches to per-level multimillionaire pricing.
pub const MULTIMILLIONAIRE: i64 = 8;

/// Price of a wealth level. Multimillionaire costs the level below it plus
/// the per-level price for each multimillionaire level.
pub fn wealth_cost(level: i64, multimillionaire_level: f64, prices: &dyn PriceLookup) -> Result<f64, PointError> {
    if level == MULTIMILLIONAIRE {
        let base = prices.keyed_cost(WEALTH, &(MULTIMILLIONAIRE - 1))?;
        let per_level = prices.keyed_cost(WEALTH, &MULTIMILLIONAIRE)?;
        return Ok(base + per_level * multimillionaire_level);
    }
    prices.keyed_cost(WEALTH, &level)
}

/// Derived pricing for `wealth`, aware of the multimillionaire level.
#[derive(Debug, Clone, Copy, Default)]
pub struct WealthCost;

impl DerivedCost for WealthCost {
    fn derived_cost(&self, trait_id: &TraitId, view: &dyn TraitView) -> Result<f64, PointError> {
        let level_id = TraitId::from_str(MULTIMILLIONAIRE_LEVEL);
        let new_wealth = expect_enum(trait_id, view.effective_value(trait_id)?)?;
        let old_wealth = expect_enum(trait_id, view.baseline_value(trait_id)?)?;
        let new_level = expect_number(&level_id, view.effective_value(&level_id)?)?;
        let old_level = expect_number(&level_id, view.baseline_value(&level_id)?)?;
        Ok(wealth_cost(new_wealth, new_level, view.prices())?
            - wealth_cost(old_wealth, old_level, view.prices())?)
    }
}

// Appearance

/// Price of an appearance record.
///
/// Universal appeal adds 25% to the level's price; off-the-shelf looks
/// take 50% off.
pub fn appearance_cost(appearance: &Appearance, prices: &dyn PriceLookup) -> Result<f64, PointError> {
    let base = prices.keyed_cost("appearance", &appearance.appearance)?;
    let mut discount = 0.0;
    if appearance.universal {
        discount -= 0.25;
    }
    if appearance.off_the_shelf_looks {
        discount += 0.5;
    }
    Ok(round_points(base - base * discount))
}

/// Whole-value pricing for the `appearance` object trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppearanceCost;

impl ValueCost for AppearanceCost {
    fn value_cost(
        &self,
        old: &TraitValue,
        new: &TraitValue,
        prices: &dyn PriceLookup,
    ) -> Result<f64, PointError> {
        let appearance = |value: &TraitValue| -> Result<Appearance, PointError> {
            value
                .as_composite()
                .and_then(|c| c.as_appearance())
                .cloned()
                .ok_or_else(|| PointError::InvalidArgument("expected an appearance record".into()))
        };
        Ok(appearance_cost(&appearance(new)?, prices)? - appearance_cost(&appearance(old)?, prices)?)
    }
}
