//! Tests for the editing session.
//!
//! These tests verify:
//! - Attribute purchases and secondary attributes
//! - Wealth, status and rank pricing
//! - Languages, reputations and ranks with their staging slots
//! - Derived display values
//! - Commit, save and load

use pointbuy::character::names::*;
use pointbuy::*;

fn session() -> EditSession {
    EditSession::standard(Character::new(125.0)).unwrap()
}

// ============================================================================
// Attributes
// ============================================================================

#[test]
fn test_basic_attribute_purchase() {
    let mut s = session();
    assert_eq!(s.live_cost().unwrap(), 0.0);
    s.increase(ST).unwrap();
    assert_eq!(s.live_cost().unwrap(), 10.0);
    assert_eq!(s.point_value().unwrap(), 10.0);
    assert_eq!(s.available_points().unwrap(), 115.0);
}

#[test]
fn test_increase_then_decrease_is_a_no_op() {
    let mut s = session();
    s.increase(IQ).unwrap();
    s.decrease(IQ).unwrap();
    assert_eq!(s.attribute(IQ).unwrap(), 10.0);
    assert_eq!(s.attribute(WILL).unwrap(), 10.0);
    assert_eq!(s.live_cost().unwrap(), 0.0);
}

#[test]
fn test_secondary_attribute_bought_on_top_of_followed_change() {
    let mut s = session();
    s.increase(IQ).unwrap();
    s.increase(PER).unwrap();
    assert_eq!(s.attribute(PER).unwrap(), 12.0);
    assert_eq!(s.attribute(WILL).unwrap(), 11.0);
    // 20 for iq, 5 for the extra perception
    assert_eq!(s.live_cost().unwrap(), 25.0);
}

#[test]
fn test_size_discount_is_capped_at_strength_ceiling() {
    let mut s = session();
    for _ in 0..10 {
        s.increase(SIZE).unwrap();
    }
    s.increase(ST).unwrap();
    s.increase(HP).unwrap();

    let breakdown = s.group().cost_breakdown(s.modifiers()).unwrap();
    // size 10 earns 0.8, strength allows 0.8
    assert_eq!(breakdown.get(&TraitId::from_str(ST)).unwrap().cost, 2.0);
    assert_eq!(breakdown.get(&TraitId::from_str(HP)).unwrap().cost, 0.0);
}

#[test]
fn test_extra_modifiers_stack_with_size() {
    let mut s = session();
    s.increase(SIZE).unwrap();
    s.modifiers_mut()
        .set_modifier(TraitId::from_str(ST), 0.0, 0.0, 0.4, "template");
    s.increase(ST).unwrap();
    // 10 - 10 * 0.5
    assert_eq!(s.live_cost().unwrap(), 5.0);
}

#[test]
fn test_unknown_trait_is_rejected() {
    let mut s = session();
    assert!(matches!(
        s.increase("charisma"),
        Err(PointError::UnknownTrait(_))
    ));
}

// ============================================================================
// Wealth, Status and Ranks
// ============================================================================

#[test]
fn test_multimillionaire_wealth() {
    let mut s = session();
    s.change_wealth(8).unwrap();
    assert_eq!(s.live_cost().unwrap(), 75.0);
    assert_eq!(s.wealth().unwrap(), 8);
}

#[test]
fn test_dead_broke_refunds_points() {
    let mut s = session();
    s.change_wealth(0).unwrap();
    assert_eq!(s.available_points().unwrap(), 150.0);
}

#[test]
fn test_rank_replacing_status() {
    let mut character = Character::new(125.0);
    character.status = 1.0;
    let mut s = EditSession::standard(character).unwrap();

    s.edit_staged_rank(|r| {
        r.organization = "Imperial Court".into();
        r.rank = 3;
        r.replaces_status = true;
    });
    assert!(s.rank_replaces_status().unwrap());
    assert_eq!(s.effective_status().unwrap(), 3.0);
    // staged rank at the replacing price
    assert_eq!(s.staged_cost().unwrap(), 30.0);

    s.add_rank().unwrap();
    assert_eq!(s.effective_status().unwrap(), 3.0);
    // rank 30, status 5 refunded now that rank replaces it
    assert_eq!(s.live_cost().unwrap(), 25.0);
}

#[test]
fn test_plain_rank_leaves_status_alone() {
    let mut character = Character::new(125.0);
    character.status = 2.0;
    let mut s = EditSession::standard(character).unwrap();
    s.edit_staged_rank(|r| {
        r.organization = "Merchant Guild".into();
        r.rank = 2;
    });
    s.add_rank().unwrap();
    assert_eq!(s.effective_status().unwrap(), 2.0);
    assert_eq!(s.live_cost().unwrap(), 10.0);
}

#[test]
fn test_rank_needs_organization() {
    let mut s = session();
    s.increase_rank(None).unwrap();
    assert!(matches!(s.add_rank(), Err(PointError::InvalidArgument(_))));
    assert_eq!(s.staged_rank().rank, 1);
    assert_eq!(s.live_cost().unwrap(), 5.0);
}

#[test]
fn test_edit_listed_rank() {
    let mut s = session();
    s.edit_staged_rank(|r| {
        r.organization = "Navy".into();
        r.rank = 1;
    });
    s.add_rank().unwrap();
    s.increase_rank(Some(0)).unwrap();
    s.increase_rank(Some(0)).unwrap();
    assert_eq!(s.ranks().unwrap()[0].rank, 3);
    assert_eq!(s.live_cost().unwrap(), 15.0);

    let err = s.increase_rank(Some(4)).unwrap_err();
    assert!(matches!(err, PointError::IndexOutOfRange { index: 4, .. }));
}

#[test]
fn test_fractional_rank_step_is_rejected() {
    let prices = PriceTable::standard().with_increment("rank", 0.5);
    let mut s = EditSession::new(Character::new(125.0), prices, SessionConfig::default()).unwrap();
    assert!(matches!(s.increase_rank(None), Err(PointError::InvalidArgument(_))));
    assert!(matches!(s.decrease_rank(None), Err(PointError::InvalidArgument(_))));
    assert_eq!(s.staged_rank().rank, 0);
}

// ============================================================================
// Languages
// ============================================================================

#[test]
fn test_first_language_is_native() {
    let mut s = session();
    s.edit_staged_language(|l| {
        l.name = "Common".into();
        l.spoken_comprehension = 3;
    });
    // staged language counts, with the native discount
    assert_eq!(s.live_cost().unwrap(), 0.0);

    s.add_language().unwrap();
    assert_eq!(s.live_cost().unwrap(), 0.0);

    s.edit_staged_language(|l| {
        l.name = "Elvish".into();
        l.spoken_comprehension = 2;
        l.written_comprehension = Some(1);
    });
    s.add_language().unwrap();
    // 4 / 2 + 2 / 2
    assert_eq!(s.live_cost().unwrap(), 3.0);
}

#[test]
fn test_removing_the_only_native_language_is_free() {
    let mut character = Character::new(125.0);
    character.languages.push(Language::new("Common", 3, None));
    let mut s = EditSession::standard(character).unwrap();

    let key = s.languages().unwrap()[0].key;
    let removed = s.remove_language(&key).unwrap();
    assert_eq!(removed.map(|l| l.name), Some("Common".to_string()));
    assert_eq!(s.live_cost().unwrap(), 0.0);
}

#[test]
fn test_language_needs_name_and_comprehension() {
    let mut s = session();
    s.edit_staged_language(|l| l.name = "Mute Tongue".into());
    assert!(s.add_language().is_err());
    s.edit_staged_language(|l| {
        l.name.clear();
        l.spoken_comprehension = 1;
    });
    assert!(s.add_language().is_err());
    assert!(s.languages().unwrap().is_empty());
}

#[test]
fn test_edit_language_in_place() {
    let mut character = Character::new(125.0);
    character.languages.push(Language::new("Common", 3, None));
    character.languages.push(Language::new("Dwarvish", 1, Some(1)));
    let mut s = EditSession::standard(character).unwrap();

    s.edit_language(1, |l| l.spoken_comprehension = 2).unwrap();
    // spoken 1 -> 2 adds (4 - 2) / 2
    assert_eq!(s.live_cost().unwrap(), 1.0);
    assert_eq!(s.languages().unwrap()[1].spoken_comprehension, 2);
}

// ============================================================================
// Reputations
// ============================================================================

#[test]
fn test_reputation_scope_and_frequency() {
    let mut s = session();
    s.edit_staged_reputation(|r| {
        r.description = "Honest trader".into();
        r.reaction = 2;
        r.scope = 2;
        r.group = "Dockside merchants".into();
        r.frequency = 2;
    });
    assert_eq!(s.staged_cost().unwrap(), 1.0);
    s.add_reputation().unwrap();
    assert_eq!(s.live_cost().unwrap(), 1.0);
    assert_eq!(s.staged_reputation(), &Reputation {
        key: s.staged_reputation().key,
        ..Reputation::blank()
    });
}

#[test]
fn test_reputation_needs_group_unless_universal() {
    let mut s = session();
    s.edit_staged_reputation(|r| {
        r.description = "Coward".into();
        r.reaction = -2;
        r.scope = 1;
    });
    assert!(s.add_reputation().is_err());
    s.edit_staged_reputation(|r| r.scope = 0);
    s.add_reputation().unwrap();
    assert_eq!(s.live_cost().unwrap(), -10.0);
}

#[test]
fn test_listed_reaction_is_clamped() {
    let mut character = Character::new(125.0);
    character
        .reputations
        .push(Reputation::new("Hero", 3, 0, "", 0, false));
    let mut s = EditSession::standard(character).unwrap();

    s.increase_reaction(Some(0)).unwrap();
    s.increase_reaction(Some(0)).unwrap();
    assert_eq!(s.reputations().unwrap()[0].reaction, 4);
    assert_eq!(s.live_cost().unwrap(), 5.0);

    s.edit_reputation(0, |r| r.free = true).unwrap();
    assert_eq!(s.live_cost().unwrap(), -15.0);
}

// ============================================================================
// Appearance and Derived Values
// ============================================================================

#[test]
fn test_appearance_flags() {
    let mut s = session();
    s.edit_appearance(|a| {
        a.appearance = 7;
        a.universal = true;
    })
    .unwrap();
    assert_eq!(s.live_cost().unwrap(), 10.0);

    s.edit_appearance(|a| a.description = "Striking".into()).unwrap();
    assert_eq!(s.appearance().unwrap().description, "Striking");
    assert_eq!(s.live_cost().unwrap(), 10.0);
}

#[test]
fn test_damage_follows_effective_strength() {
    let mut s = session();
    assert_eq!(s.thrust_damage().unwrap(), "1d-2");
    assert_eq!(s.swing_damage().unwrap(), "1d");
    for _ in 0..3 {
        s.increase(ST).unwrap();
    }
    assert_eq!(s.thrust_damage().unwrap(), "1d");
    assert_eq!(s.swing_damage().unwrap(), "2d-1");
    assert_eq!(s.basic_lift().unwrap(), 34.0);
}

#[test]
fn test_small_lift_is_not_rounded() {
    let mut character = Character::new(125.0);
    character.st = 6.0;
    let s = EditSession::standard(character).unwrap();
    assert_eq!(s.basic_lift().unwrap(), 7.2);
}

#[test]
fn test_dodge_uses_followed_speed() {
    let mut s = session();
    assert_eq!(s.dodge().unwrap(), 8.0);
    for _ in 0..2 {
        s.increase(HT).unwrap();
        s.increase(DX).unwrap();
    }
    assert_eq!(s.attribute(BASIC_SPEED).unwrap(), 6.0);
    assert_eq!(s.dodge().unwrap(), 9.0);
}

// ============================================================================
// Commit, Save and Load
// ============================================================================

#[test]
fn test_commit_keeps_followed_values() {
    let mut s = session();
    s.increase(ST).unwrap();
    s.increase(HT).unwrap();
    let character = s.commit().unwrap().clone();

    assert_eq!(character.st, 11.0);
    assert_eq!(character.hp, 11.0);
    assert_eq!(character.fp, 11.0);
    assert_eq!(character.basic_speed, 5.25);
    assert_eq!(character.point_value, 20.0);
    assert_eq!(character.available_points, 105.0);

    // nothing pending, nothing double-counted
    assert_eq!(s.live_cost().unwrap(), 0.0);
    assert_eq!(s.attribute(HP).unwrap(), 11.0);
}

#[test]
fn test_commit_leaves_staged_records_staged() {
    let mut s = session();
    s.edit_staged_rank(|r| {
        r.organization = "Army".into();
        r.rank = 1;
    });
    s.commit().unwrap();
    assert_eq!(s.character().available_points, 125.0);
    assert_eq!(s.live_cost().unwrap(), 5.0);
}

#[test]
fn test_save_and_load_round_trip() {
    let mut store = MemoryStore::new();
    let mut s = session();
    s.change_text(NAME, "Brannoc").unwrap();
    s.increase(DX).unwrap();
    s.edit_staged_language(|l| {
        l.name = "Common".into();
        l.spoken_comprehension = 3;
    });
    s.add_language().unwrap();

    let saved = s.save(&mut store).unwrap();
    let id = saved.id.unwrap();
    assert_eq!(s.character().id, Some(id));

    let loaded =
        EditSession::load(&store, id, PriceTable::standard(), SessionConfig::default()).unwrap();
    assert_eq!(loaded.text(NAME).unwrap(), "Brannoc");
    assert_eq!(loaded.attribute(DX).unwrap(), 11.0);
    assert_eq!(loaded.languages().unwrap().len(), 1);
    assert_eq!(loaded.available_points().unwrap(), 105.0);
}

struct FailingStore;

impl CharacterStore for FailingStore {
    fn fetch_all(&self) -> Result<Vec<Character>, PointError> {
        Ok(Vec::new())
    }

    fn fetch_one(&self, id: u64) -> Result<Character, PointError> {
        Err(PointError::NotFound(id))
    }

    fn save(&mut self, _character: Character) -> Result<Character, PointError> {
        Err(PointError::Serialization("store offline".into()))
    }
}

#[test]
fn test_failed_save_keeps_pending_changes() {
    let mut s = session();
    s.increase(ST).unwrap();

    assert!(matches!(s.save(&mut FailingStore), Err(PointError::Serialization(_))));
    assert_eq!(s.live_cost().unwrap(), 10.0);
    assert_eq!(s.character().st, 10.0);
    assert_eq!(s.character().available_points, 125.0);
    assert_eq!(s.character().id, None);

    let mut store = MemoryStore::new();
    let saved = s.save(&mut store).unwrap();
    assert_eq!(saved.st, 11.0);
    assert_eq!(saved.available_points, 115.0);
}

#[test]
fn test_load_missing_character() {
    let store = MemoryStore::new();
    let result = EditSession::load(&store, 3, PriceTable::standard(), SessionConfig::default());
    assert!(matches!(result, Err(PointError::NotFound(3))));
}

#[test]
fn test_discard_returns_committed_character() {
    let mut s = session();
    s.increase(ST).unwrap();
    let character = s.discard();
    assert_eq!(character.st, 10.0);
}

#[test]
fn test_blank_session_uses_configured_budget() {
    let config = SessionConfig::from_json(r#"{"starting_points": 200}"#).unwrap();
    let s = EditSession::blank(config).unwrap();
    assert_eq!(s.available_points().unwrap(), 200.0);
}
