//! Follow graph module.
//!
//! Provides the `TraitGraph` type: secondary attributes that follow primary
//! ones, held as a directed acyclic graph. An edge runs from the followed
//! trait to its follower and carries the ratio of the parent's change that
//! the follower picks up. Following moves values, never cost.

use crate::character::names::{BASIC_SPEED, DX, FP, HP, HT, IQ, PER, ST, WILL};
use crate::error::PointError;
use crate::trait_id::TraitId;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{HashMap, HashSet};

/// A directed acyclic graph of trait follow relationships.
///
/// # Examples
///
/// ```rust
/// use pointbuy::{TraitGraph, TraitId};
///
/// let graph = TraitGraph::standard();
/// let st = TraitId::from_str("st");
/// let hp = TraitId::from_str("hp");
///
/// // hp follows st one for one
/// assert_eq!(graph.parents(&hp), vec![(st.clone(), 1.0)]);
///
/// let order = graph.topological_order().unwrap();
/// let st_pos = order.iter().position(|t| t == &st).unwrap();
/// let hp_pos = order.iter().position(|t| t == &hp).unwrap();
/// assert!(st_pos < hp_pos);
/// ```
#[derive(Debug, Clone)]
pub struct TraitGraph {
    graph: DiGraph<TraitId, f64>,
    node_map: HashMap<TraitId, NodeIndex>,
}

impl TraitGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
        }
    }

    /// The standard secondary attributes: hit points follow strength, will
    /// and perception follow intelligence, fatigue follows health, and basic
    /// speed follows a quarter of health and dexterity each.
    pub fn standard() -> Self {
        let mut graph = Self::new();
        for (derived, parent, ratio) in [
            (HP, ST, 1.0),
            (WILL, IQ, 1.0),
            (PER, IQ, 1.0),
            (FP, HT, 1.0),
            (BASIC_SPEED, HT, 0.25),
            (BASIC_SPEED, DX, 0.25),
        ] {
            graph.follow(TraitId::from_str(derived), TraitId::from_str(parent), ratio);
        }
        graph
    }

    /// Add a node to the graph if it doesn't exist.
    pub fn add_node(&mut self, trait_id: TraitId) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(&trait_id) {
            idx
        } else {
            let idx = self.graph.add_node(trait_id.clone());
            self.node_map.insert(trait_id, idx);
            idx
        }
    }

    /// Make `derived` pick up `ratio` of every change to `parent`.
    ///
    /// Setting the same pair again replaces the ratio.
    pub fn follow(&mut self, derived: TraitId, parent: TraitId, ratio: f64) {
        let derived_idx = self.add_node(derived);
        let parent_idx = self.add_node(parent);
        self.graph.update_edge(parent_idx, derived_idx, ratio);
    }

    pub fn contains(&self, trait_id: &TraitId) -> bool {
        self.node_map.contains_key(trait_id)
    }

    /// The traits `trait_id` follows, with their ratios, sorted by name.
    pub fn parents(&self, trait_id: &TraitId) -> Vec<(TraitId, f64)> {
        let Some(&idx) = self.node_map.get(trait_id) else {
            return Vec::new();
        };
        let mut parents: Vec<_> = self
            .graph
            .edges_directed(idx, Direction::Incoming)
            .map(|edge| (self.graph[edge.source()].clone(), *edge.weight()))
            .collect();
        parents.sort_by(|a, b| a.0.cmp(&b.0));
        parents
    }

    /// Detect cycles in the graph.
    ///
    /// Returns `PointError::Cycle` with the closed path, e.g. `hp -> st -> hp`.
    pub fn detect_cycles(&self) -> Result<(), PointError> {
        let mut visited = HashSet::new();
        let mut on_stack = HashSet::new();

        for node_idx in self.graph.node_indices() {
            if !visited.contains(&node_idx) {
                let mut path = Vec::new();
                if let Some(cycle) = self.find_cycle(node_idx, &mut visited, &mut on_stack, &mut path) {
                    return Err(cycle);
                }
            }
        }
        Ok(())
    }

    fn find_cycle(
        &self,
        node: NodeIndex,
        visited: &mut HashSet<NodeIndex>,
        on_stack: &mut HashSet<NodeIndex>,
        path: &mut Vec<TraitId>,
    ) -> Option<PointError> {
        visited.insert(node);
        on_stack.insert(node);
        path.push(self.graph[node].clone());

        for next in self.graph.neighbors_directed(node, Direction::Outgoing) {
            if !visited.contains(&next) {
                if let Some(cycle) = self.find_cycle(next, visited, on_stack, path) {
                    return Some(cycle);
                }
            } else if on_stack.contains(&next) {
                let closing = self.graph[next].clone();
                let start = path.iter().position(|t| t == &closing).unwrap_or(0);
                let mut cycle = path[start..].to_vec();
                cycle.push(closing);
                return Some(PointError::Cycle { path: cycle });
            }
        }

        on_stack.remove(&node);
        path.pop();
        None
    }

    /// All traits, parents before followers.
    pub fn topological_order(&self) -> Result<Vec<TraitId>, PointError> {
        self.detect_cycles()?;

        toposort(&self.graph, None)
            .map(|indices| {
                indices
                    .into_iter()
                    .map(|idx| self.graph[idx].clone())
                    .collect()
            })
            .map_err(|cycle| PointError::Cycle {
                path: vec![self.graph[cycle.node_id()].clone()],
            })
    }

    /// Total change of every trait in the graph.
    ///
    /// A trait's total change is its own change plus, for each trait it
    /// follows, the ratio times that parent's total change. Parents are
    /// resolved first, so chains propagate.
    pub fn resolve_changes<F>(&self, own_change: F) -> Result<HashMap<TraitId, f64>, PointError>
    where
        F: Fn(&TraitId) -> Result<f64, PointError>,
    {
        let mut totals: HashMap<TraitId, f64> = HashMap::new();
        for trait_id in self.topological_order()? {
            let mut total = own_change(&trait_id)?;
            for (parent, ratio) in self.parents(&trait_id) {
                total += ratio * totals.get(&parent).copied().unwrap_or(0.0);
            }
            totals.insert(trait_id, total);
        }
        Ok(totals)
    }
}

impl Default for TraitGraph {
    fn default() -> Self {
        Self::new()
    }
}
