//! # pointbuy - Delta-Tracking Character Point Engine
//!
//! A point-accounting engine for GURPS-style character builders that provides:
//! - **Pending vs. committed** edits: every change is a typed delta against a
//!   baseline snapshot until it is committed
//! - **Pluggable pricing**: price tables for plain traits, caller-supplied
//!   pricing for lists and composite records
//! - **Per-trait discounts**: sourced modifiers, capped per trait, rounded per
//!   trait before summing
//! - **Live totals**: the unspent balance is recomputed on every edit
//!
//! ## Core Concepts
//!
//! ### Cost Pipeline
//!
//! ```text
//! [Character] → [DeltaGroup / Delta] → [PriceLookup + ModifierGroup] → [CostBreakdown]
//! ```
//!
//! 1. **Baseline**: the committed `Character` (any [`TraitSource`])
//! 2. **Deltas**: created lazily the first time a trait is touched
//! 3. **Pricing**: by trait kind, or by a [`CustomCost`] / [`DerivedCost`](cost::DerivedCost)
//! 4. **Discounts**: per-trait modifier totals, capped by the price table
//!
//! ## Example
//!
//! ```rust
//! use pointbuy::*;
//!
//! let mut session = EditSession::standard(Character::new(125.0)).unwrap();
//!
//! session.increase("st").unwrap();
//! session.change_wealth(8).unwrap();
//!
//! // 10 for strength, 50 + 25 for multimillionaire 1
//! assert_eq!(session.live_cost().unwrap(), 85.0);
//! assert_eq!(session.available_points().unwrap(), 40.0);
//! assert_eq!(session.attribute("hp").unwrap(), 11.0);
//! ```
//!
//! ## Modules
//!
//! - [`trait_id`] - Trait identifier type
//! - [`value`] - Trait kinds and values
//! - [`character`] - Baseline character records
//! - [`source`] - Baseline access
//! - [`price`] / [`damage`] - Price and damage lookup
//! - [`modifier`] - Sourced discounts
//! - [`cost`] - Custom and built-in pricing rules
//! - [`delta`] / [`group`] - Pending changes and their cost
//! - [`breakdown`] - Per-trait cost report
//! - [`graph`] - Secondary attributes that follow primaries
//! - [`session`] - Editing session orchestrator
//! - [`config`] - Session configuration
//! - [`store`] - Persistence interface
//! - [`error`] - Error types

pub mod breakdown;
pub mod character;
pub mod config;
pub mod cost;
pub mod damage;
pub mod delta;
pub mod error;
pub mod graph;
pub mod group;
pub mod modifier;
pub mod price;
pub mod session;
pub mod source;
pub mod store;
pub mod trait_id;
pub mod value;

// Re-export main types for convenience
pub use breakdown::{CostBreakdown, TraitCost};
pub use character::{Appearance, Character, ElementKey, Language, Rank, Reputation};
pub use config::SessionConfig;
pub use cost::{CustomCost, TraitView};
pub use delta::Delta;
pub use error::PointError;
pub use graph::TraitGraph;
pub use group::DeltaGroup;
pub use modifier::{Modifier, ModifierGroup};
pub use price::{PriceLookup, PriceTable};
pub use session::{EditSession, Encumbrance};
pub use source::{TraitMap, TraitSource};
pub use store::{CharacterStore, MemoryStore};
pub use trait_id::TraitId;
pub use value::{Composite, Element, TraitKind, TraitValue};
