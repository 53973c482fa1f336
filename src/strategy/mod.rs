pub mod genetic;
pub mod ida;
pub mod learn;
pub mod rl;
pub mod swarm;
pub mod transfer;

#[cfg(test)]
pub(crate) mod tests;

////////////////////////////////////////////////////////////////////////////////

use std::{
    collections::HashSet,
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::Sender,
        Arc,
    },
    time::{Duration, Instant},
};

use crate::{
    candidate::Candidate,
    config::RunConfig,
    error::SearchError,
    fitness::{FitnessEvaluator, PathContext},
    property::Property,
    space::{HashType, StateHandle, StateSpace},
    stats::{GoalState, PhaseTimes, RunReport, RunStatistics, Verdict},
};

////////////////////////////////////////////////////////////////////////////////

/// Cooperative cancellation flag, checked by strategies at iteration
/// boundaries only.
#[derive(Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

////////////////////////////////////////////////////////////////////////////////

struct Budget {
    deadline: Option<Instant>,
    cancel: CancelToken,
}

impl Budget {
    fn exhausted(&self) -> bool {
        if self.cancel.is_cancelled() {
            return true;
        }
        self.deadline.map(|d| Instant::now() >= d).unwrap_or(false)
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Everything a strategy needs during one run: the adapter, the property,
/// the run-scoped evaluator, the budget and the goal bookkeeping. Owned by
/// the controller, one per run.
pub struct RunContext<'a, S: StateSpace> {
    pub space: &'a S,
    pub property: Property,
    pub continue_after_goal: bool,

    evaluator: FitnessEvaluator,
    budget: Budget,
    goals: Vec<GoalState>,
    goal_hashes: HashSet<HashType>,
    phases: PhaseTimes,
    started: Instant,
    progress: Option<Sender<GoalState>>,
}

impl<'a, S: StateSpace> RunContext<'a, S> {
    pub fn new(space: &'a S, cfg: &RunConfig) -> Self {
        Self::with_control(space, cfg, CancelToken::new(), None)
    }

    pub fn with_control(
        space: &'a S,
        cfg: &RunConfig,
        cancel: CancelToken,
        progress: Option<Sender<GoalState>>,
    ) -> Self {
        let started = Instant::now();
        Self {
            space,
            property: cfg.property.clone(),
            continue_after_goal: cfg.continue_after_goal,
            evaluator: FitnessEvaluator::new(cfg.property.clone()),
            budget: Budget {
                deadline: cfg.time_limit.map(|l| started + l),
                cancel,
            },
            goals: Vec::new(),
            goal_hashes: HashSet::new(),
            phases: PhaseTimes::default(),
            started,
            progress,
        }
    }

    ////////////////////////////////////////////////////////////////////////////////

    pub fn score(&mut self, state: StateHandle, path: &PathContext) -> f64 {
        self.evaluator.score(self.space, state, path)
    }

    /// Scores a state and records it as a goal when the distance is zero.
    pub fn score_and_record(
        &mut self,
        state: StateHandle,
        path: &PathContext,
        witness_len: usize,
    ) -> f64 {
        let score = self.score(state, path);
        if FitnessEvaluator::is_goal(score) {
            self.record_goal(state, witness_len);
        }
        score
    }

    /// Appends a goal unless the same state was already recorded. Outside
    /// continue mode the list is capped at one entry, whatever a strategy
    /// still evaluates before it observes the halt. The goal list stays
    /// ordered by strictly increasing discovery time.
    pub fn record_goal(&mut self, state: StateHandle, witness_len: usize) {
        if !self.continue_after_goal && !self.goals.is_empty() {
            return;
        }
        let hash = self.space.state_hash(state);
        if !self.goal_hashes.insert(hash) {
            return;
        }
        let mut found_at = self.started.elapsed();
        if let Some(last) = self.goals.last() {
            if found_at <= last.found_at {
                found_at = last.found_at + Duration::from_nanos(1);
            }
        }
        let goal = GoalState {
            state: hash,
            witness_len,
            found_at,
            explored_when_found: self.evaluator.explored(),
        };
        if let Some(progress) = &self.progress {
            // receiver may be gone; the run itself goes on
            let _ = progress.send(goal.clone());
        }
        self.goals.push(goal);
    }

    /// True once the strategy should stop: budget exhausted, or a goal was
    /// found and the run is not in continue mode.
    pub fn halt(&self) -> bool {
        if self.budget.exhausted() {
            return true;
        }
        !self.continue_after_goal && !self.goals.is_empty()
    }

    pub fn goal_count(&self) -> usize {
        self.goals.len()
    }

    pub fn explored(&self) -> usize {
        self.evaluator.explored()
    }

    pub fn phases_mut(&mut self) -> &mut PhaseTimes {
        &mut self.phases
    }

    /// Folds a helper evaluator's counters into the run statistics (used by
    /// the reduced-model phase of transfer search).
    pub fn absorb_evaluator(&mut self, other: FitnessEvaluator) {
        self.evaluator.absorb(other);
    }

    ////////////////////////////////////////////////////////////////////////////////

    pub fn into_report(self) -> RunReport {
        let excluded: Vec<String> = self
            .space
            .rules()
            .iter()
            .filter(|r| !r.effectful)
            .map(|r| r.name.clone())
            .collect();
        let stats = RunStatistics {
            explored_states: self.evaluator.explored(),
            fitness_calls: self.evaluator.calls(),
            fitness_time: self.evaluator.eval_time(),
            first_goal_depth: self.goals.first().map(|g| g.witness_len),
            phases: self.phases,
            excluded_rule_count: excluded.len(),
            excluded_rule_names: excluded,
            elapsed: self.started.elapsed(),
        };
        RunReport {
            verdict: Verdict::of(&self.property, !self.goals.is_empty()),
            witness: self.goals.first().map(|g| g.state),
            stats,
            goals: self.goals,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Shared outer contract of all search strategies. A strategy explores the
/// adapter's state space, scoring states through the context; the context
/// keeps the statistics and the goal list.
pub trait Strategy<S: StateSpace> {
    fn explore(&mut self, ctx: &mut RunContext<'_, S>) -> Result<(), SearchError>;
}

impl<S: StateSpace, T: Strategy<S> + ?Sized> Strategy<S> for Box<T> {
    fn explore(&mut self, ctx: &mut RunContext<'_, S>) -> Result<(), SearchError> {
        self.as_mut().explore(ctx)
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Replays a candidate and scores every state along the resulting path,
/// returning the lowest distance seen. A goal anywhere on the path is
/// recorded with the prefix length as its witness, so a run through a goal
/// state counts even when the replay moves past it. Each state sees the
/// hashes of its predecessors, which lets liveness refutation spot a
/// closed cycle.
pub(crate) fn evaluate_candidate<S: StateSpace>(
    ctx: &mut RunContext<'_, S>,
    candidate: &Candidate,
) -> f64 {
    let replay = candidate.replay(ctx.space);
    let mut path = PathContext::empty();
    let mut best = f64::INFINITY;
    for (witness_len, &state) in replay.states.iter().enumerate() {
        let score = ctx.score_and_record(state, &path, witness_len);
        best = best.min(score);
        path.push(ctx.space.state_hash(state));
    }
    best
}
