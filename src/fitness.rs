use std::{
    collections::HashSet,
    time::{Duration, Instant},
};

use crate::{
    property::Property,
    space::{HashType, StateHandle, StateSpace},
};

////////////////////////////////////////////////////////////////////////////////

/// Hashes of the states on the path currently being extended. Liveness
/// refutation treats a revisit of one of them as a found cycle.
#[derive(Clone, Debug, Default)]
pub struct PathContext {
    on_path: HashSet<HashType>,
}

impl PathContext {
    pub fn empty() -> Self {
        Default::default()
    }

    pub fn push(&mut self, hash: HashType) -> bool {
        self.on_path.insert(hash)
    }

    pub fn pop(&mut self, hash: HashType) {
        self.on_path.remove(&hash);
    }

    pub fn contains(&self, hash: HashType) -> bool {
        self.on_path.contains(&hash)
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Run-scoped distance evaluator. Lower is closer to the goal, zero is the
/// goal. One evaluator per run; strategies never share one.
///
/// Counting convention: every [score](FitnessEvaluator::score) call counts,
/// repeat evaluations of an already-seen state included. There is no
/// caching, so the counters stay comparable across strategies.
pub struct FitnessEvaluator {
    property: Property,
    calls: usize,
    eval_time: Duration,
    seen: HashSet<HashType>,
}

impl FitnessEvaluator {
    pub fn new(property: Property) -> Self {
        Self {
            property,
            calls: 0,
            eval_time: Duration::ZERO,
            seen: HashSet::new(),
        }
    }

    pub fn score(
        &mut self,
        space: &impl StateSpace,
        state: StateHandle,
        path: &PathContext,
    ) -> f64 {
        let started = Instant::now();
        self.calls += 1;
        self.seen.insert(space.state_hash(state));

        let distance = match &self.property {
            Property::Deadlock => space.enabled_rules(state).len() as f64,
            Property::Reachability(q) | Property::RefuteSafety(q) => {
                space.predicate_distance(state, q)
            }
            Property::RefuteLiveness => {
                if path.contains(space.state_hash(state)) {
                    // revisit on the current path: a lasso refuting liveness
                    0.0
                } else {
                    space.enabled_rules(state).len() as f64
                }
            }
        };

        self.eval_time += started.elapsed();

        // a state the adapter cannot score is maximally distant, never a goal
        if distance.is_nan() || distance < 0.0 {
            f64::INFINITY
        } else {
            distance
        }
    }

    pub fn is_goal(distance: f64) -> bool {
        distance == 0.0
    }

    ////////////////////////////////////////////////////////////////////////////////

    /// Total `score` calls (`Call_Number_Fitness`).
    pub fn calls(&self) -> usize {
        self.calls
    }

    /// Distinct states scored so far (`Number_Explored_States`).
    pub fn explored(&self) -> usize {
        self.seen.len()
    }

    pub fn eval_time(&self) -> Duration {
        self.eval_time
    }

    /// Folds the counters of a helper evaluator (e.g. the reduced-model
    /// phase of transfer search) into this one.
    pub fn absorb(&mut self, other: FitnessEvaluator) {
        self.calls += other.calls;
        self.eval_time += other.eval_time;
        self.seen.extend(other.seen);
    }
}

////////////////////////////////////////////////////////////////////////////////
