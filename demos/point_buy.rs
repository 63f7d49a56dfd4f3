//! Point-buy example: build a character, watch the balance, save and reload
//!
//! This example demonstrates:
//! - Stepping attributes and reading followed secondary attributes
//! - Staging and adding languages, reputations and ranks
//! - Reading the per-trait cost breakdown
//! - Committing and saving to a store
//!
//! Run with `RUST_LOG=pointbuy=debug` to see the engine's logging.

use pointbuy::character::names::*;
use pointbuy::*;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), PointError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut store = MemoryStore::new();
    let mut session = EditSession::blank(SessionConfig::default())?;
    session.change_text(NAME, "Brannoc the Tall")?;

    // Attributes
    println!("Buying attributes:");
    for _ in 0..3 {
        session.increase(ST)?;
    }
    session.increase(HT)?;
    session.increase(SIZE)?;
    println!("  - ST {} (HP follows: {})", session.attribute(ST)?, session.attribute(HP)?);
    println!("  - HT {} (Basic Speed {})", session.attribute(HT)?, session.attribute(BASIC_SPEED)?);
    println!("  - Size {} discounts ST and HP", session.attribute(SIZE)?);

    // Languages, first one native
    println!("\nLanguages:");
    session.edit_staged_language(|l| {
        l.name = "Common".into();
        l.spoken_comprehension = 3;
    });
    session.add_language()?;
    session.edit_staged_language(|l| {
        l.name = "Dwarvish".into();
        l.spoken_comprehension = 2;
        l.written_comprehension = Some(1);
    });
    session.add_language()?;
    for language in session.languages()? {
        println!("  - {} (spoken {})", language.name, language.spoken_comprehension);
    }

    // Social traits
    println!("\nSocial:");
    session.change_wealth(5)?;
    session.edit_staged_rank(|r| {
        r.organization = "Northern Legion".into();
        r.rank = 2;
        r.replaces_status = true;
    });
    session.add_rank()?;
    session.edit_staged_reputation(|r| {
        r.description = "Held the bridge".into();
        r.reaction = 2;
        r.scope = 1;
        r.group = "Legion veterans".into();
        r.frequency = 1;
    });
    session.add_reputation()?;
    println!("  - Wealth level {}", session.wealth()?);
    println!("  - Effective status {}", session.effective_status()?);

    // Cost report
    println!("\n=== Cost Breakdown ===");
    let breakdown = session.group().cost_breakdown(session.modifiers())?;
    for line in &breakdown.entries {
        println!(
            "  {:<16} raw {:>6.2}  discount {:>4.2}  cost {:>4}",
            line.trait_id, line.raw, line.discount, line.cost
        );
    }
    println!("Live cost: {}", session.live_cost()?);
    println!("Available: {}", session.available_points()?);

    // Derived values
    println!("\nDamage: thrust {}, swing {}", session.thrust_damage()?, session.swing_damage()?);
    for level in session.encumbrance_levels()? {
        println!(
            "  Encumbrance {}: lift {:.1}, move {}, dodge {}",
            level.level, level.basic_lift, level.basic_move, level.dodge
        );
    }

    // Save and reload
    let saved = session.save(&mut store)?;
    let id = saved.id.unwrap_or_default();
    println!("\nSaved character {} with {} points left", id, saved.available_points);

    let reloaded = EditSession::load(&store, id, PriceTable::standard(), SessionConfig::default())?;
    println!(
        "Reloaded {}: ST {}, {} languages",
        reloaded.text(NAME)?,
        reloaded.attribute(ST)?,
        reloaded.languages()?.len()
    );

    Ok(())
}
