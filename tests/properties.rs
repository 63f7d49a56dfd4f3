//! Property tests for the delta engine.
//!
//! These tests verify:
//! - Stepping a trait up and back down costs nothing
//! - Incremental list pricing matches pricing the whole list afresh
//! - Mixed list edits in any order still match a fresh total
//! - Enumerated traits cost the same in both directions, negated
//! - Totals are always whole points

use pointbuy::character::names::*;
use pointbuy::cost::{language_cost, rank_cost, LanguageCost, RankCost};
use pointbuy::*;
use proptest::prelude::*;

fn id(name: &str) -> TraitId {
    TraitId::from_str(name)
}

fn language() -> impl Strategy<Value = Language> {
    (0i64..=3, prop::option::of(0i64..=3))
        .prop_map(|(spoken, written)| Language::new("Tongue", spoken, written))
}

fn rank() -> impl Strategy<Value = Rank> {
    (0i64..=8, any::<bool>()).prop_map(|(level, replaces)| Rank::new("Order", level, "", replaces))
}

#[derive(Debug, Clone)]
enum ListEdit {
    Push(Rank),
    Remove(usize),
    Edit(usize, Rank),
    MoveToEnd(usize),
}

fn list_edit() -> impl Strategy<Value = ListEdit> {
    prop_oneof![
        rank().prop_map(ListEdit::Push),
        (0usize..8).prop_map(ListEdit::Remove),
        (0usize..8, rank()).prop_map(|(index, rank)| ListEdit::Edit(index, rank)),
        (0usize..8).prop_map(ListEdit::MoveToEnd),
    ]
}

fn listed_ranks<P: PriceLookup>(group: &DeltaGroup<Character, P>) -> Vec<Rank> {
    group
        .effective_elements(&id(RANKS))
        .unwrap()
        .iter()
        .filter_map(Element::as_rank)
        .cloned()
        .collect()
}

proptest! {
    #[test]
    fn prop_up_then_down_is_free(
        name in prop::sample::select(vec![ST, DX, IQ, HT, HP, WILL, PER, FP, BASIC_SPEED]),
        steps in 1usize..8,
    ) {
        let mut group = DeltaGroup::new(Character::new(125.0), PriceTable::standard());
        for _ in 0..steps {
            group.increase_value(&id(name)).unwrap();
        }
        for _ in 0..steps {
            group.decrease_value(&id(name), Some(1.0)).unwrap();
        }
        prop_assert_eq!(group.value_change(&id(name)).unwrap(), 0.0);
        prop_assert_eq!(group.cost(&ModifierGroup::new()).unwrap(), 0.0);
    }

    #[test]
    fn prop_language_list_matches_fresh_total(
        baseline in prop::collection::vec(language(), 0..4),
        added in prop::collection::vec(language(), 0..4),
        removed in 0usize..4,
    ) {
        let prices = PriceTable::standard();
        let mut character = Character::new(125.0);
        character.languages = baseline.clone();
        let mut group = DeltaGroup::new(character, PriceTable::standard());
        group
            .set_custom_cost(&id(LANGUAGES), TraitKind::Array, CustomCost::per_element(LanguageCost))
            .unwrap();

        for language in &added {
            group.push_to_array(&id(LANGUAGES), language.clone().into()).unwrap();
        }
        let keys: Vec<ElementKey> = baseline.iter().take(removed).map(|l| l.key).collect();
        for key in &keys {
            group.remove_from_array(&id(LANGUAGES), key).unwrap();
        }

        let fresh = |list: &[Language]| -> f64 {
            list.iter().map(|l| language_cost(l, false, &prices).unwrap()).sum()
        };
        let now: Vec<Language> = group
            .effective_elements(&id(LANGUAGES))
            .unwrap()
            .iter()
            .filter_map(Element::as_language)
            .cloned()
            .collect();
        let expected = fresh(&now) - fresh(&baseline);
        prop_assert_eq!(group.raw_cost(&id(LANGUAGES)).unwrap(), expected);
    }

    #[test]
    fn prop_rank_edits_match_fresh_total(
        baseline in prop::collection::vec(rank(), 1..4),
        replacement in rank(),
        index in 0usize..4,
    ) {
        let prices = PriceTable::standard();
        let mut character = Character::new(125.0);
        character.ranks = baseline.clone();
        let mut group = DeltaGroup::new(character, PriceTable::standard());
        group
            .set_custom_cost(&id(RANKS), TraitKind::Array, CustomCost::per_element(RankCost))
            .unwrap();

        let index = index % baseline.len();
        let mut edited = replacement;
        edited.key = baseline[index].key;
        group
            .change_array(&id(RANKS), edited.clone().into(), Some(index))
            .unwrap();

        let expected = rank_cost(&edited, &prices).unwrap() - rank_cost(&baseline[index], &prices).unwrap();
        prop_assert_eq!(group.raw_cost(&id(RANKS)).unwrap(), expected);
    }

    #[test]
    fn prop_mixed_rank_edits_match_fresh_total(
        baseline in prop::collection::vec(rank(), 0..4),
        edits in prop::collection::vec(list_edit(), 0..12),
    ) {
        let prices = PriceTable::standard();
        let mut character = Character::new(125.0);
        character.ranks = baseline.clone();
        let mut group = DeltaGroup::new(character, PriceTable::standard());
        group
            .set_custom_cost(&id(RANKS), TraitKind::Array, CustomCost::per_element(RankCost))
            .unwrap();

        for edit in edits {
            let current = listed_ranks(&group);
            match edit {
                ListEdit::Push(rank) => {
                    group.push_to_array(&id(RANKS), rank.into()).unwrap();
                }
                ListEdit::Remove(_) | ListEdit::Edit(..) | ListEdit::MoveToEnd(_)
                    if current.is_empty() => {}
                ListEdit::Remove(index) => {
                    let key = current[index % current.len()].key;
                    prop_assert!(group.remove_from_array(&id(RANKS), &key).unwrap().is_some());
                }
                ListEdit::Edit(index, mut rank) => {
                    let index = index % current.len();
                    rank.key = current[index].key;
                    group.change_array(&id(RANKS), rank.into(), Some(index)).unwrap();
                }
                ListEdit::MoveToEnd(index) => {
                    let moved = current[index % current.len()].clone();
                    group.remove_from_array(&id(RANKS), &moved.key).unwrap();
                    group.push_to_array(&id(RANKS), moved.into()).unwrap();
                }
            }
        }

        let fresh = |list: &[Rank]| -> f64 {
            list.iter().map(|r| rank_cost(r, &prices).unwrap()).sum()
        };
        let expected = fresh(&listed_ranks(&group)) - fresh(&baseline);
        prop_assert_eq!(group.raw_cost(&id(RANKS)).unwrap(), expected);
    }

    #[test]
    fn prop_enum_cost_is_antisymmetric(from in 0i64..=4, to in 0i64..=4) {
        let mut forward_base = Character::new(125.0);
        forward_base.build = from;
        let mut forward = DeltaGroup::new(forward_base, PriceTable::standard());
        forward.change_enum(&id(BUILD), to).unwrap();

        let mut backward_base = Character::new(125.0);
        backward_base.build = to;
        let mut backward = DeltaGroup::new(backward_base, PriceTable::standard());
        backward.change_enum(&id(BUILD), from).unwrap();

        let modifiers = ModifierGroup::new();
        prop_assert_eq!(forward.cost(&modifiers).unwrap(), -backward.cost(&modifiers).unwrap());
    }

    #[test]
    fn prop_session_totals_are_whole_points(
        size in 0usize..12,
        strength in 0usize..6,
        speed in 0usize..6,
    ) {
        let mut session = EditSession::standard(Character::new(125.0)).unwrap();
        for _ in 0..size {
            session.increase(SIZE).unwrap();
        }
        for _ in 0..strength {
            session.increase(ST).unwrap();
            session.increase(HP).unwrap();
        }
        for _ in 0..speed {
            session.increase(BASIC_SPEED).unwrap();
        }
        let total = session.live_cost().unwrap();
        prop_assert_eq!(total, total.round());
        prop_assert_eq!(session.available_points().unwrap(), 125.0 - total);
    }
}
