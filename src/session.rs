//! Editing session module.
//!
//! `EditSession` is the orchestrator a character sheet talks to. It owns the
//! delta group for one character together with the active modifiers, the
//! follow graph of secondary attributes and the staging slots for a new
//! language, reputation and rank. It reports the live point total while the
//! user edits and folds everything back into the character on commit.

use crate::character::names::*;
use crate::character::{Appearance, Character, ElementKey, Language, Rank, Reputation};
use crate::config::SessionConfig;
use crate::cost::{
    self, language_cost, native_discount, rank_cost, reputation_cost, round_points, AppearanceCost,
    CustomCost, LanguageCost, RankCost, ReputationCost, StatusCost, WealthCost,
};
use crate::error::PointError;
use crate::graph::TraitGraph;
use crate::group::DeltaGroup;
use crate::modifier::ModifierGroup;
use crate::price::{PriceLookup, PriceTable};
use crate::source::TraitSource;
use crate::store::CharacterStore;
use crate::trait_id::TraitId;
use crate::value::{Composite, Element, TraitKind};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Source tag of the modifiers set from the character's size.
pub const SIZE_SOURCE: &str = "size";

/// Highest wealth level.
const MAX_WEALTH: i64 = 8;

/// Lift and move multipliers for encumbrance levels 0 (none) to 4 (extra-heavy).
const ENCUMBRANCE: [(f64, f64); 5] = [(1.0, 1.0), (2.0, 0.8), (3.0, 0.6), (6.0, 0.4), (10.0, 0.2)];

/// Carrying capacity and its effect at one encumbrance level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Encumbrance {
    pub level: u8,
    pub basic_lift: f64,
    pub basic_move: f64,
    pub dodge: f64,
}

fn primary_attribute(name: &str) -> bool {
    matches!(name, ST | DX | IQ | HT)
}

/// One editing session of one character.
///
/// # Examples
///
/// ```rust
/// use pointbuy::{Character, EditSession};
///
/// let mut session = EditSession::standard(Character::new(125.0)).unwrap();
/// session.increase("st").unwrap();
/// session.increase("st").unwrap();
///
/// assert_eq!(session.attribute("hp").unwrap(), 12.0);
/// assert_eq!(session.live_cost().unwrap(), 20.0);
/// assert_eq!(session.available_points().unwrap(), 105.0);
///
/// session.commit().unwrap();
/// assert_eq!(session.character().st, 12.0);
/// assert_eq!(session.character().available_points, 105.0);
/// assert_eq!(session.live_cost().unwrap(), 0.0);
/// ```
pub struct EditSession<P: PriceLookup = PriceTable> {
    config: SessionConfig,
    group: DeltaGroup<Character, P>,
    modifiers: ModifierGroup,
    graph: TraitGraph,
    new_language: Language,
    new_reputation: Reputation,
    new_rank: Rank,
}

impl EditSession<PriceTable> {
    /// A session with the standard price table and default configuration.
    pub fn standard(character: Character) -> Result<Self, PointError> {
        Self::new(character, PriceTable::standard(), SessionConfig::default())
    }

    /// A session for a fresh character with the configured starting points.
    pub fn blank(config: SessionConfig) -> Result<Self, PointError> {
        let character = Character::new(config.starting_points);
        Self::new(character, PriceTable::standard(), config)
    }
}

impl<P: PriceLookup> EditSession<P> {
    pub fn new(character: Character, prices: P, config: SessionConfig) -> Result<Self, PointError> {
        let mut group = DeltaGroup::new(character, prices);
        group.set_override(&TraitId::from_str(WEALTH), WealthCost)?;
        group.set_override(&TraitId::from_str(STATUS), StatusCost)?;

        let mut session = Self {
            config,
            group,
            modifiers: ModifierGroup::new(),
            graph: TraitGraph::standard(),
            new_language: Language::blank(),
            new_reputation: Reputation::blank(),
            new_rank: Rank::blank(),
        };
        session.graph.topological_order()?;
        session.update_size_modifiers()?;
        Ok(session)
    }

    /// Load a stored character and open a session on it.
    pub fn load(
        store: &impl CharacterStore,
        id: u64,
        prices: P,
        config: SessionConfig,
    ) -> Result<Self, PointError> {
        let character = store.fetch_one(id)?;
        info!(id, name = %character.name, "opened character");
        Self::new(character, prices, config)
    }

    /// Replace the follow graph, e.g. to add house-rule secondary attributes.
    pub fn with_graph(mut self, graph: TraitGraph) -> Result<Self, PointError> {
        graph.topological_order()?;
        self.graph = graph;
        Ok(self)
    }

    /// The committed character. Pending changes are not visible here.
    pub fn character(&self) -> &Character {
        self.group.baseline()
    }

    pub fn group(&self) -> &DeltaGroup<Character, P> {
        &self.group
    }

    pub fn modifiers(&self) -> &ModifierGroup {
        &self.modifiers
    }

    /// Modifiers from sources other than size (templates, equipment).
    pub fn modifiers_mut(&mut self) -> &mut ModifierGroup {
        &mut self.modifiers
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn graph(&self) -> &TraitGraph {
        &self.graph
    }

    pub fn prices(&self) -> &P {
        self.group.prices()
    }

    // Numeric traits

    /// Step a numeric trait up by its increment.
    pub fn increase(&mut self, name: &str) -> Result<(), PointError> {
        self.group.increase_value(&TraitId::from_str(name))?;
        if name == SIZE {
            self.update_size_modifiers()?;
        }
        Ok(())
    }

    /// Step a numeric trait down by its increment.
    ///
    /// Primary attributes stop at the configured floor, and the
    /// multimillionaire level never drops below its floor.
    pub fn decrease(&mut self, name: &str) -> Result<(), PointError> {
        let floor = if primary_attribute(name) {
            Some(self.config.attribute_floor)
        } else if name == MULTIMILLIONAIRE_LEVEL {
            Some(self.config.multimillionaire_floor)
        } else {
            None
        };
        self.group.decrease_value(&TraitId::from_str(name), floor)?;
        if name == SIZE {
            self.update_size_modifiers()?;
        }
        Ok(())
    }

    /// Drop the pending change to one trait.
    pub fn reset(&mut self, name: &str) -> Result<(), PointError> {
        self.group.reset(&TraitId::from_str(name));
        if name == SIZE {
            self.update_size_modifiers()?;
        }
        Ok(())
    }

    fn update_size_modifiers(&mut self) -> Result<(), PointError> {
        let size = self.group.effective_number(&TraitId::from_str(SIZE))?;
        let effective = size.min(self.config.max_size_discount_level);
        let discount = self.config.size_discount(size);
        for name in [ST, HP] {
            self.modifiers
                .set_modifier(TraitId::from_str(name), size, effective, discount, SIZE_SOURCE);
        }
        debug!(size, discount, "updated size discount");
        Ok(())
    }

    /// Effective value of a numeric trait, including what it picks up from
    /// the traits it follows.
    pub fn attribute(&self, name: &str) -> Result<f64, PointError> {
        let trait_id = TraitId::from_str(name);
        let own = self.group.effective_number(&trait_id)?;
        if !self.graph.contains(&trait_id) {
            return Ok(own);
        }
        let totals = self
            .graph
            .resolve_changes(|t| self.group.value_change(t))?;
        let inherited = totals.get(&trait_id).copied().unwrap_or(0.0)
            - self.group.value_change(&trait_id)?;
        Ok(own + inherited)
    }

    // Text, enumerated and composite traits

    /// Set a free-text trait (name, player, height, weight).
    pub fn change_text(&mut self, name: &str, value: impl Into<String>) -> Result<(), PointError> {
        self.group.change_string(&TraitId::from_str(name), value)
    }

    pub fn text(&self, name: &str) -> Result<String, PointError> {
        self.group.effective_string(&TraitId::from_str(name))
    }

    pub fn change_build(&mut self, build: i64) -> Result<(), PointError> {
        self.group.change_enum(&TraitId::from_str(BUILD), build)
    }

    pub fn build(&self) -> Result<i64, PointError> {
        self.group.effective_enum(&TraitId::from_str(BUILD))
    }

    /// Set the wealth level (0 to 8; 8 is multimillionaire).
    pub fn change_wealth(&mut self, level: i64) -> Result<(), PointError> {
        if !(0..=MAX_WEALTH).contains(&level) {
            return Err(PointError::InvalidArgument(format!(
                "wealth level must be 0-{MAX_WEALTH}, got {level}"
            )));
        }
        self.group.change_enum(&TraitId::from_str(WEALTH), level)
    }

    pub fn wealth(&self) -> Result<i64, PointError> {
        self.group.effective_enum(&TraitId::from_str(WEALTH))
    }

    pub fn appearance(&self) -> Result<Appearance, PointError> {
        match self.group.effective_composite(&TraitId::from_str(APPEARANCE))? {
            Composite::Appearance(a) => Ok(a),
        }
    }

    /// Edit a copy of the effective appearance and make it pending.
    pub fn edit_appearance(&mut self, edit: impl FnOnce(&mut Appearance)) -> Result<(), PointError> {
        let trait_id = TraitId::from_str(APPEARANCE);
        let mut appearance = self.appearance()?;
        edit(&mut appearance);
        self.ensure_pricing(&trait_id, TraitKind::Object)?;
        self.group
            .change_object(&trait_id, Composite::Appearance(appearance))
    }

    /// Register the built-in pricing for a composite trait on first touch.
    fn ensure_pricing(&mut self, trait_id: &TraitId, kind: TraitKind) -> Result<(), PointError> {
        if self.group.get(trait_id).is_some_and(|d| d.has_custom_cost()) {
            return Ok(());
        }
        let cost = match trait_id.as_str() {
            LANGUAGES => CustomCost::per_element(LanguageCost),
            REPUTATIONS => CustomCost::per_element(ReputationCost),
            RANKS => CustomCost::per_element(RankCost),
            APPEARANCE => CustomCost::whole(AppearanceCost),
            _ => {
                return Err(PointError::configuration(
                    trait_id,
                    "no built-in pricing for this trait",
                ))
            }
        };
        self.group.set_custom_cost(trait_id, kind, cost)
    }

    // Array traits

    fn records<T: Clone>(&self, name: &str, pick: fn(&Element) -> Option<&T>) -> Result<Vec<T>, PointError> {
        Ok(self
            .group
            .effective_elements(&TraitId::from_str(name))?
            .iter()
            .filter_map(pick)
            .cloned()
            .collect())
    }

    fn push_record(&mut self, name: &str, element: Element) -> Result<(), PointError> {
        let trait_id = TraitId::from_str(name);
        self.ensure_pricing(&trait_id, TraitKind::Array)?;
        self.group.push_to_array(&trait_id, element)
    }

    fn remove_record(&mut self, name: &str, key: &ElementKey) -> Result<Option<Element>, PointError> {
        let trait_id = TraitId::from_str(name);
        self.ensure_pricing(&trait_id, TraitKind::Array)?;
        self.group.remove_from_array(&trait_id, key)
    }

    /// Clone the record at `index`, edit the clone, and put it back in place.
    fn edit_record<T>(
        &mut self,
        name: &str,
        index: usize,
        pick: fn(&Element) -> Option<&T>,
        edit: impl FnOnce(&mut T),
    ) -> Result<T, PointError>
    where
        T: Clone + Into<Element>,
    {
        let trait_id = TraitId::from_str(name);
        let items = self.group.effective_elements(&trait_id)?;
        let element = items.get(index).ok_or_else(|| PointError::IndexOutOfRange {
            trait_id: trait_id.clone(),
            index,
            len: items.len(),
        })?;
        let mut record = pick(element).cloned().ok_or_else(|| {
            PointError::InvalidArgument(format!("element {index} of {trait_id} has the wrong type"))
        })?;
        edit(&mut record);

        self.ensure_pricing(&trait_id, TraitKind::Array)?;
        self.group
            .change_array(&trait_id, record.clone().into(), Some(index))?;
        Ok(record)
    }

    pub fn languages(&self) -> Result<Vec<Language>, PointError> {
        self.records(LANGUAGES, Element::as_language)
    }

    pub fn staged_language(&self) -> &Language {
        &self.new_language
    }

    pub fn edit_staged_language(&mut self, edit: impl FnOnce(&mut Language)) {
        edit(&mut self.new_language);
    }

    /// Whether the staged language has any comprehension, and so any cost.
    fn staged_language_counts(&self) -> bool {
        self.new_language.spoken_comprehension != 0
            || self.new_language.effective_written_comprehension() != 0
    }

    /// Move the staged language into the list.
    ///
    /// It needs a name and some spoken or written comprehension.
    pub fn add_language(&mut self) -> Result<(), PointError> {
        if self.new_language.name.is_empty() || !self.staged_language_counts() {
            return Err(PointError::InvalidArgument(
                "a new language needs a name and some comprehension".into(),
            ));
        }
        let language = std::mem::replace(&mut self.new_language, Language::blank());
        self.push_record(LANGUAGES, language.into())
    }

    pub fn edit_language(
        &mut self,
        index: usize,
        edit: impl FnOnce(&mut Language),
    ) -> Result<(), PointError> {
        self.edit_record(LANGUAGES, index, Element::as_language, edit)
            .map(|_| ())
    }

    pub fn remove_language(&mut self, key: &ElementKey) -> Result<Option<Language>, PointError> {
        Ok(self
            .remove_record(LANGUAGES, key)?
            .and_then(|e| e.as_language().cloned()))
    }

    pub fn reputations(&self) -> Result<Vec<Reputation>, PointError> {
        self.records(REPUTATIONS, Element::as_reputation)
    }

    pub fn staged_reputation(&self) -> &Reputation {
        &self.new_reputation
    }

    /// Edit the staged reputation. The reaction is held within the limit.
    pub fn edit_staged_reputation(&mut self, edit: impl FnOnce(&mut Reputation)) {
        edit(&mut self.new_reputation);
        let limit = self.config.reputation_reaction_limit;
        self.new_reputation.reaction = self.new_reputation.reaction.clamp(-limit, limit);
    }

    /// Move the staged reputation into the list.
    ///
    /// It needs a description, and a group unless its scope is 0.
    pub fn add_reputation(&mut self) -> Result<(), PointError> {
        let staged = &self.new_reputation;
        if staged.description.is_empty() || (staged.scope != 0 && staged.group.is_empty()) {
            return Err(PointError::InvalidArgument(
                "a new reputation needs a description and, unless universal, a group".into(),
            ));
        }
        let reputation = std::mem::replace(&mut self.new_reputation, Reputation::blank());
        self.push_record(REPUTATIONS, reputation.into())
    }

    /// Edit a listed reputation. The reaction is held within the limit.
    pub fn edit_reputation(
        &mut self,
        index: usize,
        edit: impl FnOnce(&mut Reputation),
    ) -> Result<(), PointError> {
        let limit = self.config.reputation_reaction_limit;
        self.edit_record(REPUTATIONS, index, Element::as_reputation, |r| {
            edit(r);
            r.reaction = r.reaction.clamp(-limit, limit);
        })
        .map(|_| ())
    }

    /// Step a reputation's reaction up; `None` targets the staged reputation.
    pub fn increase_reaction(&mut self, index: Option<usize>) -> Result<(), PointError> {
        self.step_reaction(index, 1)
    }

    /// Step a reputation's reaction down; `None` targets the staged reputation.
    pub fn decrease_reaction(&mut self, index: Option<usize>) -> Result<(), PointError> {
        self.step_reaction(index, -1)
    }

    fn step_reaction(&mut self, index: Option<usize>, direction: i64) -> Result<(), PointError> {
        let step = self.whole_step("reputation", direction)?;
        match index {
            Some(index) => self.edit_reputation(index, |r| r.reaction += step),
            None => {
                self.edit_staged_reputation(|r| r.reaction += step);
                Ok(())
            }
        }
    }

    /// The signed step for a record field that only holds whole levels.
    fn whole_step(&self, key: &str, direction: i64) -> Result<i64, PointError> {
        let increment = self.group.prices().increment(key);
        if increment.fract() != 0.0 {
            return Err(PointError::InvalidArgument(format!(
                "{key} steps must be whole levels, got {increment}"
            )));
        }
        Ok(increment as i64 * direction)
    }

    pub fn remove_reputation(&mut self, key: &ElementKey) -> Result<Option<Reputation>, PointError> {
        Ok(self
            .remove_record(REPUTATIONS, key)?
            .and_then(|e| e.as_reputation().cloned()))
    }

    pub fn ranks(&self) -> Result<Vec<Rank>, PointError> {
        self.records(RANKS, Element::as_rank)
    }

    pub fn staged_rank(&self) -> &Rank {
        &self.new_rank
    }

    pub fn edit_staged_rank(&mut self, edit: impl FnOnce(&mut Rank)) {
        edit(&mut self.new_rank);
    }

    fn check_single_status_rank(&self, ranks: &[Rank]) -> Result<(), PointError> {
        if ranks.iter().filter(|r| r.replaces_status).count() > 1 {
            return Err(PointError::InvalidArgument(
                "only one rank may replace status".into(),
            ));
        }
        Ok(())
    }

    /// Move the staged rank into the list. It needs an organization.
    pub fn add_rank(&mut self) -> Result<(), PointError> {
        if self.new_rank.organization.is_empty() {
            return Err(PointError::InvalidArgument(
                "a new rank needs an organization".into(),
            ));
        }
        let mut ranks = self.ranks()?;
        ranks.push(self.new_rank.clone());
        self.check_single_status_rank(&ranks)?;

        let rank = std::mem::replace(&mut self.new_rank, Rank::blank());
        self.push_record(RANKS, rank.into())
    }

    /// Edit a listed rank. At most one rank may replace status.
    pub fn edit_rank(&mut self, index: usize, edit: impl FnOnce(&mut Rank)) -> Result<(), PointError> {
        let mut ranks = self.ranks()?;
        let Some(slot) = ranks.get_mut(index) else {
            return Err(PointError::IndexOutOfRange {
                trait_id: TraitId::from_str(RANKS),
                index,
                len: ranks.len(),
            });
        };
        edit(slot);
        self.check_single_status_rank(&ranks)?;

        let edited = ranks.swap_remove(index);
        self.edit_record(RANKS, index, Element::as_rank, |r| *r = edited)
            .map(|_| ())
    }

    /// Step a rank level up; `None` targets the staged rank.
    pub fn increase_rank(&mut self, index: Option<usize>) -> Result<(), PointError> {
        self.step_rank(index, 1)
    }

    /// Step a rank level down; `None` targets the staged rank.
    pub fn decrease_rank(&mut self, index: Option<usize>) -> Result<(), PointError> {
        self.step_rank(index, -1)
    }

    fn step_rank(&mut self, index: Option<usize>, direction: i64) -> Result<(), PointError> {
        let step = self.whole_step("rank", direction)?;
        match index {
            Some(index) => self.edit_rank(index, |r| r.rank += step),
            None => {
                self.edit_staged_rank(|r| r.rank += step);
                Ok(())
            }
        }
    }

    pub fn remove_rank(&mut self, key: &ElementKey) -> Result<Option<Rank>, PointError> {
        Ok(self
            .remove_record(RANKS, key)?
            .and_then(|e| e.as_rank().cloned()))
    }

    // Status

    /// Listed ranks plus the staged one.
    fn ranks_with_staged(&self) -> Result<Vec<Rank>, PointError> {
        let mut ranks = self.ranks()?;
        ranks.push(self.new_rank.clone());
        Ok(ranks)
    }

    /// Whether any listed or staged rank replaces status.
    pub fn rank_replaces_status(&self) -> Result<bool, PointError> {
        Ok(cost::status_rank(&self.ranks_with_staged()?).is_some())
    }

    /// Status after ranks, counting the staged rank.
    pub fn effective_status(&self) -> Result<f64, PointError> {
        let status = self.group.effective_number(&TraitId::from_str(STATUS))?;
        Ok(cost::effective_status(status, &self.ranks_with_staged()?))
    }

    // Point totals

    /// Native-language correction to the per-element language costs.
    ///
    /// Element pricing never applies the native discount. A list that goes
    /// from empty to non-empty gains a free native language; one that goes
    /// the other way loses it.
    fn native_adjustment(&self, include_staged: bool) -> Result<f64, PointError> {
        let was_empty = self.character().languages.is_empty();
        let now_empty =
            self.languages()?.is_empty() && !(include_staged && self.staged_language_counts());
        let discount = native_discount(self.group.prices())?;
        Ok(match (was_empty, now_empty) {
            (true, false) => -discount,
            (false, true) => discount,
            _ => 0.0,
        })
    }

    /// Cost of the staged language, reputation and rank.
    pub fn staged_cost(&self) -> Result<f64, PointError> {
        let prices = self.group.prices();
        Ok(language_cost(&self.new_language, false, prices)?
            + reputation_cost(&self.new_reputation, prices)?
            + rank_cost(&self.new_rank, prices)?)
    }

    fn committed_cost(&self) -> Result<f64, PointError> {
        Ok(self.group.cost(&self.modifiers)? + self.native_adjustment(false)?)
    }

    /// Cost of every pending change, staged records included.
    pub fn live_cost(&self) -> Result<f64, PointError> {
        Ok(self.group.cost(&self.modifiers)?
            + self.native_adjustment(true)?
            + self.staged_cost()?)
    }

    pub fn point_value(&self) -> Result<f64, PointError> {
        Ok(self.character().point_value + self.live_cost()?)
    }

    pub fn available_points(&self) -> Result<f64, PointError> {
        Ok(self.character().available_points - self.live_cost()?)
    }

    // Derived display values

    /// Basic lift, `st² / 5`, rounded once it reaches 10.
    pub fn basic_lift(&self) -> Result<f64, PointError> {
        let st = self.attribute(ST)?;
        let lift = st * st / 5.0;
        Ok(if lift >= 10.0 { round_points(lift) } else { lift })
    }

    pub fn thrust_damage(&self) -> Result<String, PointError> {
        self.group.prices().thrust_damage(self.attribute(ST)? as i64)
    }

    pub fn swing_damage(&self) -> Result<String, PointError> {
        self.group.prices().swing_damage(self.attribute(ST)? as i64)
    }

    pub fn dodge(&self) -> Result<f64, PointError> {
        Ok((self.attribute(BASIC_SPEED)? + 3.0).floor())
    }

    /// Lift, move and dodge at one encumbrance level (0 to 4).
    pub fn encumbrance(&self, level: u8) -> Result<Encumbrance, PointError> {
        let &(lift_factor, move_factor) = ENCUMBRANCE.get(level as usize).ok_or_else(|| {
            PointError::InvalidArgument(format!("encumbrance level must be 0-4, got {level}"))
        })?;
        Ok(Encumbrance {
            level,
            basic_lift: self.basic_lift()? * lift_factor,
            basic_move: (self.attribute(BASIC_MOVE)? * move_factor).floor(),
            dodge: self.dodge()? - level as f64,
        })
    }

    pub fn encumbrance_levels(&self) -> Result<Vec<Encumbrance>, PointError> {
        (0..ENCUMBRANCE.len() as u8)
            .map(|level| self.encumbrance(level))
            .collect()
    }

    // Lifecycle

    /// The character as it would be after a commit, with the committed
    /// cost charged. The session is left untouched.
    fn committed_character(&self) -> Result<Character, PointError> {
        let cost = self.committed_cost()?;
        let followed: Vec<(TraitId, f64)> = self
            .graph
            .topological_order()?
            .into_iter()
            .filter(|t| !self.graph.parents(t).is_empty())
            .map(|t| self.attribute(t.as_str()).map(|v| (t, v)))
            .collect::<Result<_, _>>()?;

        let mut character = self.group.committed()?;
        for (trait_id, value) in followed {
            character.set_trait_value(&trait_id, value.into())?;
        }
        character.point_value += cost;
        character.available_points -= cost;
        Ok(character)
    }

    /// Fold pending changes into the character and charge their cost.
    ///
    /// Staged records stay staged. Secondary attributes keep the values
    /// they picked up from their primaries.
    pub fn commit(&mut self) -> Result<&Character, PointError> {
        let character = self.committed_character()?;
        info!(
            point_value = character.point_value,
            available = character.available_points,
            "committed character"
        );
        self.group.adopt(character);
        Ok(self.group.baseline())
    }

    /// Save the committed character and adopt the id the store assigned.
    ///
    /// Pending changes are only folded in once the store accepts the
    /// character, so a failed save leaves the session as it was.
    pub fn save(&mut self, store: &mut impl CharacterStore) -> Result<Character, PointError> {
        let mut character = self.committed_character()?;
        let saved = store.save(character.clone())?;
        info!(id = ?saved.id, available = saved.available_points, "saved character");
        character.id = saved.id;
        self.group.adopt(character);
        Ok(saved)
    }

    /// Throw away every pending change and hand back the committed character.
    pub fn discard(self) -> Character {
        self.group.discard()
    }
}
