use std::collections::{BTreeMap, HashMap, HashSet};

use super::{HashType, RuleId, RuleInfo, StateHandle, StateSpace};

use crate::util::hash::hash_list;

////////////////////////////////////////////////////////////////////////////////

#[derive(Default)]
struct Predicate {
    holds: HashSet<usize>,
    distance: HashMap<usize, f64>,
}

////////////////////////////////////////////////////////////////////////////////

/// Explicit in-memory transition table implementing the [StateSpace]
/// contract. States are indices, transitions are per-rule edges. Serves as
/// the reference adapter for tests and for the model-reduction step of
/// transfer search.
pub struct TableSpace {
    rules: Vec<RuleInfo>,
    edges: Vec<BTreeMap<usize, usize>>,
    predicates: HashMap<String, Predicate>,
    hashes: Vec<HashType>,
}

impl TableSpace {
    pub fn new(rules: Vec<RuleInfo>) -> Self {
        Self {
            rules,
            edges: vec![BTreeMap::new()],
            predicates: HashMap::new(),
            hashes: vec![hash_list([0].into_iter())],
        }
    }

    /// Appends a fresh state and returns its handle. State 0 is always the
    /// initial one.
    pub fn add_state(&mut self) -> StateHandle {
        self.edges.push(BTreeMap::new());
        let handle = StateHandle(self.edges.len() - 1);
        self.hashes.push(hash_list([handle.0 as u64].into_iter()));
        handle
    }

    /// Overrides a state's hash. A table mirroring part of another space
    /// keeps the source states' identities this way, so the same state is
    /// never counted twice across the two.
    pub fn set_state_hash(&mut self, state: StateHandle, hash: HashType) {
        self.hashes[state.0] = hash;
    }

    pub fn add_edge(&mut self, src: StateHandle, rule: RuleId, dst: StateHandle) {
        assert!(src.0 < self.edges.len() && dst.0 < self.edges.len());
        assert!(rule.0 < self.rules.len());
        self.edges[src.0].insert(rule.0, dst.0);
    }

    pub fn mark_predicate(&mut self, predicate: &str, state: StateHandle) {
        self.predicates
            .entry(predicate.to_string())
            .or_default()
            .holds
            .insert(state.0);
    }

    /// Overrides the indicator metric with a graded distance for one state.
    pub fn set_predicate_distance(&mut self, predicate: &str, state: StateHandle, distance: f64) {
        self.predicates
            .entry(predicate.to_string())
            .or_default()
            .distance
            .insert(state.0, distance);
    }

    pub fn predicate_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.predicates.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn state_count(&self) -> usize {
        self.edges.len()
    }

    pub fn state_handles(&self) -> impl Iterator<Item = StateHandle> + '_ {
        (0..self.edges.len()).map(StateHandle)
    }
}

////////////////////////////////////////////////////////////////////////////////

impl StateSpace for TableSpace {
    fn initial_state(&self) -> StateHandle {
        StateHandle(0)
    }

    fn successors(&self, state: StateHandle) -> Vec<StateHandle> {
        self.edges[state.0]
            .values()
            .map(|dst| StateHandle(*dst))
            .collect()
    }

    fn apply(&self, state: StateHandle, rule: RuleId) -> Option<StateHandle> {
        self.edges[state.0].get(&rule.0).map(|dst| StateHandle(*dst))
    }

    fn is_enabled(&self, state: StateHandle, rule: RuleId) -> bool {
        self.edges[state.0].contains_key(&rule.0)
    }

    fn matches_predicate(&self, state: StateHandle, predicate: &str) -> bool {
        self.predicates
            .get(predicate)
            .map(|p| p.holds.contains(&state.0))
            .unwrap_or(false)
    }

    fn predicate_distance(&self, state: StateHandle, predicate: &str) -> f64 {
        if self.matches_predicate(state, predicate) {
            return 0.0;
        }
        self.predicates
            .get(predicate)
            .and_then(|p| p.distance.get(&state.0))
            .copied()
            .unwrap_or(1.0)
    }

    fn rules(&self) -> &[RuleInfo] {
        &self.rules
    }

    fn state_hash(&self, state: StateHandle) -> HashType {
        self.hashes[state.0]
    }
}

////////////////////////////////////////////////////////////////////////////////
