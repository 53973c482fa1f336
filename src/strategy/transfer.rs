use std::{
    collections::{HashSet, VecDeque},
    time::Instant,
};

use super::{
    learn::{guided_search, sample_bfs},
    RunContext, Strategy,
};

use crate::{
    config::{Learner, TransferConfig},
    error::{ConfigError, SearchError},
    fitness::{FitnessEvaluator, PathContext},
    mine::KnowledgeBase,
    space::{table::TableSpace, RuleId, StateSpace},
};

////////////////////////////////////////////////////////////////////////////////

/// Failed model reduction. Recoverable by retrying with a different target
/// percentage.
#[derive(Debug, Clone)]
pub struct ReduceError {
    pub reason: String,
}

/// Produces a smaller host model preserving rule-applicability structure.
/// The reduction itself is an external concern; the search core only
/// consumes its output.
pub trait ModelReducer<S: StateSpace> {
    type Reduced: StateSpace;

    fn reduce(&self, space: &S, min_percent: f64) -> Result<Self::Reduced, ReduceError>;
}

////////////////////////////////////////////////////////////////////////////////

/// Transfer search: sample and learn on a reduced model, then run the
/// guided phase on the full one with the transferred knowledge base.
pub struct TransferSearch<R> {
    cfg: TransferConfig,
    reducer: R,
}

impl<R> TransferSearch<R> {
    pub fn new(cfg: TransferConfig, reducer: R) -> Self {
        Self { cfg, reducer }
    }
}

////////////////////////////////////////////////////////////////////////////////

impl<S, R> Strategy<S> for TransferSearch<R>
where
    S: StateSpace,
    R: ModelReducer<S>,
{
    fn explore(&mut self, ctx: &mut RunContext<'_, S>) -> Result<(), SearchError> {
        self.cfg.validate()?;
        if ctx.space.rules().is_empty() {
            return Err(ConfigError::EmptyRuleSet.into());
        }

        let reduced = self
            .reducer
            .reduce(ctx.space, self.cfg.min_percent)
            .map_err(|e| SearchError::ModelReduction {
                percent: self.cfg.min_percent,
                reason: e.reason,
            })?;

        // phases 1-2 run on the reduced model with a helper evaluator;
        // goals found there train the knowledge base but are not goals of
        // this run
        let started = Instant::now();
        let mut evaluator = FitnessEvaluator::new(ctx.property.clone());
        let path = PathContext::empty();
        let transactions = sample_bfs(&reduced, self.cfg.learn.max_states, |space, state, _| {
            evaluator.score(space, state, &path)
        });
        ctx.phases_mut().sampling = started.elapsed();

        let started = Instant::now();
        let knowledge = match self.cfg.learn.learner {
            Learner::Patterns(algorithm) => KnowledgeBase::learn_patterns(
                &transactions,
                algorithm,
                self.cfg.learn.min_support,
            ),
            Learner::Bayes => {
                KnowledgeBase::learn_bayes(&transactions, reduced.rules().len())
            }
        };
        ctx.phases_mut().mining = started.elapsed();
        ctx.absorb_evaluator(evaluator);
        if ctx.halt() {
            return Ok(());
        }

        // phase 3 on the full model
        let started = Instant::now();
        guided_search(ctx, &knowledge, &self.cfg.learn);
        ctx.phases_mut().guided = started.elapsed();

        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Reference reducer for explicit transition tables: keeps the first
/// breadth-first ≈`min_percent` of the states and the edges among them.
pub struct TableReducer;

impl ModelReducer<TableSpace> for TableReducer {
    type Reduced = TableSpace;

    fn reduce(&self, space: &TableSpace, min_percent: f64) -> Result<TableSpace, ReduceError> {
        let total = space.state_count();
        let target = ((min_percent / 100.0) * total as f64).round() as usize;
        if target < 2 {
            return Err(ReduceError {
                reason: format!("{target} of {total} states is too small to sample"),
            });
        }

        // breadth-first prefix of the reachable part
        let mut keep = Vec::new();
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([space.initial_state()]);
        while let Some(state) = queue.pop_front() {
            if keep.len() >= target {
                break;
            }
            if !seen.insert(state) {
                continue;
            }
            keep.push(state);
            queue.extend(space.successors(state));
        }
        if keep.len() < 2 {
            return Err(ReduceError {
                reason: "reachable prefix is a single state".to_string(),
            });
        }

        let mut reduced = TableSpace::new(space.rules().to_vec());
        let mut remap = std::collections::HashMap::new();
        remap.insert(keep[0], reduced.initial_state());
        for state in keep.iter().skip(1) {
            let new = reduced.add_state();
            remap.insert(*state, new);
        }
        // reduced states keep the identity of their source, so the run's
        // distinct-state count stays honest across the two models
        for (src, dst) in &remap {
            reduced.set_state_hash(*dst, space.state_hash(*src));
        }
        for state in &keep {
            for rule in 0..space.rules().len() {
                let rule = RuleId(rule);
                if let Some(dst) = space.apply(*state, rule) {
                    if let Some(new_dst) = remap.get(&dst) {
                        reduced.add_edge(remap[state], rule, *new_dst);
                    }
                }
            }
        }
        for predicate in space.predicate_names() {
            for state in &keep {
                if space.matches_predicate(*state, &predicate) {
                    reduced.mark_predicate(&predicate, remap[state]);
                } else {
                    let d = space.predicate_distance(*state, &predicate);
                    reduced.set_predicate_distance(&predicate, remap[state], d);
                }
            }
        }
        Ok(reduced)
    }
}
