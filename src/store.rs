//! Character persistence interface.
//!
//! The engine only needs to fetch and save whole characters. `MemoryStore`
//! keeps each character as a JSON document, so every load goes through the
//! same hydration path as data arriving from a remote service.

use crate::character::Character;
use crate::error::PointError;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Trait for character persistence backends.
pub trait CharacterStore {
    fn fetch_all(&self) -> Result<Vec<Character>, PointError>;

    /// Fails with `NotFound` if no character has this id.
    fn fetch_one(&self, id: u64) -> Result<Character, PointError>;

    /// Store a character and return it as committed.
    ///
    /// A character without an id is assigned the next free one.
    fn save(&mut self, character: Character) -> Result<Character, PointError>;
}

/// An in-memory store of JSON documents, keyed by id.
///
/// # Examples
///
/// ```rust
/// use pointbuy::{Character, CharacterStore, MemoryStore};
///
/// let mut store = MemoryStore::new();
/// let saved = store.save(Character::new(125.0)).unwrap();
/// let id = saved.id.unwrap();
///
/// assert_eq!(store.fetch_one(id).unwrap().available_points, 125.0);
/// assert!(store.fetch_one(id + 1).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: BTreeMap<u64, String>,
    next_id: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            documents: BTreeMap::new(),
            next_id: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl CharacterStore for MemoryStore {
    fn fetch_all(&self) -> Result<Vec<Character>, PointError> {
        self.documents
            .values()
            .map(|json| Character::from_json(json))
            .collect()
    }

    fn fetch_one(&self, id: u64) -> Result<Character, PointError> {
        match self.documents.get(&id) {
            Some(json) => Character::from_json(json),
            None => {
                warn!(id, "character not found");
                Err(PointError::NotFound(id))
            }
        }
    }

    fn save(&mut self, mut character: Character) -> Result<Character, PointError> {
        let id = match character.id {
            Some(id) => id,
            None => {
                let id = self.next_id.max(1);
                self.next_id = id + 1;
                id
            }
        };
        self.next_id = self.next_id.max(id + 1);
        character.id = Some(id);

        let json = character.to_json()?;
        debug!(id, bytes = json.len(), "saved character");
        self.documents.insert(id, json);
        self.fetch_one(id)
    }
}
