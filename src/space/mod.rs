pub mod table;

////////////////////////////////////////////////////////////////////////////////

pub type HashType = u64;

////////////////////////////////////////////////////////////////////////////////

/// Identifier of a transformation rule inside one grammar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RuleId(pub usize);

impl RuleId {
    pub fn index(&self) -> usize {
        self.0
    }
}

////////////////////////////////////////////////////////////////////////////////

#[derive(Clone, Debug)]
pub struct RuleInfo {
    pub name: String,

    /// Rules without explicit new/delete effects and with empty anchors do
    /// not change the host graph; they are excluded from candidate
    /// generation but still reported in the run statistics.
    pub effectful: bool,
}

impl RuleInfo {
    pub fn new(name: impl Into<String>, effectful: bool) -> Self {
        Self {
            name: name.into(),
            effectful,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Opaque handle to a state owned by the adapter. Strategies hold handles
/// only and never the graph itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StateHandle(pub usize);

////////////////////////////////////////////////////////////////////////////////

/// Contract of the graph-grammar engine. The search core never inspects
/// host graphs directly: successor computation, rule matching and predicate
/// evaluation all live behind this trait.
pub trait StateSpace {
    fn initial_state(&self) -> StateHandle;

    fn successors(&self, state: StateHandle) -> Vec<StateHandle>;

    /// Applies one rule at `state`. `None` when the rule does not match.
    fn apply(&self, state: StateHandle, rule: RuleId) -> Option<StateHandle>;

    fn is_enabled(&self, state: StateHandle, rule: RuleId) -> bool;

    fn matches_predicate(&self, state: StateHandle, predicate: &str) -> bool;

    /// Structural distance from `state` to a state satisfying `predicate`,
    /// zero iff the predicate already matches. The default is the indicator
    /// metric (0 or 1), which keeps heuristic search correct but
    /// uninformed; adapters should override it with a graded metric such as
    /// the count of missing or surplus required elements.
    fn predicate_distance(&self, state: StateHandle, predicate: &str) -> f64 {
        if self.matches_predicate(state, predicate) {
            0.0
        } else {
            1.0
        }
    }

    fn rules(&self) -> &[RuleInfo];

    /// Stable identity of the state, equal for isomorphic states.
    fn state_hash(&self, state: StateHandle) -> HashType;

    ////////////////////////////////////////////////////////////////////////////////

    fn enabled_rules(&self, state: StateHandle) -> Vec<RuleId> {
        (0..self.rules().len())
            .map(RuleId)
            .filter(|r| self.is_enabled(state, *r))
            .collect()
    }

    fn is_deadlock(&self, state: StateHandle) -> bool {
        (0..self.rules().len()).all(|r| !self.is_enabled(state, RuleId(r)))
    }

    fn effectful_rules(&self) -> Vec<RuleId> {
        self.rules()
            .iter()
            .enumerate()
            .filter(|(_, r)| r.effectful)
            .map(|(i, _)| RuleId(i))
            .collect()
    }

    /// Bounded feature encoding of a state: the rule-applicability bitmap
    /// followed by the branching degree. Heuristic input for learned
    /// strategies.
    fn features(&self, state: StateHandle) -> Vec<f64> {
        let mut f: Vec<f64> = (0..self.rules().len())
            .map(|r| {
                if self.is_enabled(state, RuleId(r)) {
                    1.0
                } else {
                    0.0
                }
            })
            .collect();
        f.push(self.successors(state).len() as f64);
        f
    }
}
