use std::{
    collections::{BTreeSet, BinaryHeap, HashSet, VecDeque},
    time::Instant,
};

use super::{RunContext, Strategy};

use crate::{
    config::{Learner, LearnConfig},
    error::{ConfigError, SearchError},
    fitness::{FitnessEvaluator, PathContext},
    mine::{KnowledgeBase, Transaction},
    space::{StateHandle, StateSpace},
};

////////////////////////////////////////////////////////////////////////////////

/// Three-phase search: sample a bounded breadth-first exploration, learn a
/// knowledge base from the sampled traces, then run a greedy search biased
/// by it.
pub struct LearnSearch {
    cfg: LearnConfig,
}

impl LearnSearch {
    pub fn new(cfg: LearnConfig) -> Self {
        Self { cfg }
    }
}

////////////////////////////////////////////////////////////////////////////////

impl<S: StateSpace> Strategy<S> for LearnSearch {
    fn explore(&mut self, ctx: &mut RunContext<'_, S>) -> Result<(), SearchError> {
        self.cfg.validate()?;
        if ctx.space.rules().is_empty() {
            return Err(ConfigError::EmptyRuleSet.into());
        }

        // phase 1: bounded breadth-first sampling
        let started = Instant::now();
        let space = ctx.space;
        let path = PathContext::empty();
        let transactions = sample_bfs(space, self.cfg.max_states, |_, state, depth| {
            ctx.score_and_record(state, &path, depth)
        });
        ctx.phases_mut().sampling = started.elapsed();
        if ctx.halt() {
            return Ok(());
        }

        // phase 2: learn
        let started = Instant::now();
        let knowledge = match self.cfg.learner {
            Learner::Patterns(algorithm) => {
                KnowledgeBase::learn_patterns(&transactions, algorithm, self.cfg.min_support)
            }
            Learner::Bayes => KnowledgeBase::learn_bayes(&transactions, ctx.space.rules().len()),
        };
        ctx.phases_mut().mining = started.elapsed();

        // phase 3: guided search
        let started = Instant::now();
        guided_search(ctx, &knowledge, &self.cfg);
        ctx.phases_mut().guided = started.elapsed();

        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Breadth-first sampling bounded by `max_states` scored states. Each
/// sampled state yields one transaction: the rules applied along its path
/// and whether it scored as a goal.
pub(crate) fn sample_bfs<S: StateSpace>(
    space: &S,
    max_states: usize,
    mut score: impl FnMut(&S, StateHandle, usize) -> f64,
) -> Vec<Transaction> {
    let mut transactions = Vec::new();
    let mut visited = HashSet::new();
    let mut queue: VecDeque<(StateHandle, BTreeSet<usize>, usize)> = VecDeque::new();
    queue.push_back((space.initial_state(), BTreeSet::new(), 0));

    while let Some((state, applied, depth)) = queue.pop_front() {
        if transactions.len() >= max_states {
            break;
        }
        if !visited.insert(space.state_hash(state)) {
            continue;
        }

        let distance = score(space, state, depth);
        transactions.push(Transaction {
            items: applied.clone(),
            goal: FitnessEvaluator::is_goal(distance),
        });

        for rule in space.enabled_rules(state) {
            if let Some(next) = space.apply(state, rule) {
                let mut next_applied = applied.clone();
                next_applied.insert(rule.index());
                queue.push_back((next, next_applied, depth + 1));
            }
        }
    }
    transactions
}

////////////////////////////////////////////////////////////////////////////////

struct Ranked {
    priority: f64,
    depth: usize,
    state: StateHandle,
}

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority
    }
}
impl Eq for Ranked {}
impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // BinaryHeap is a max-heap; invert for lowest-priority-first
        other.priority.total_cmp(&self.priority)
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Greedy best-first expansion ordered by raw fitness minus the weighted
/// knowledge-base bias of the state's enabled-rule set.
pub(crate) fn guided_search<S: StateSpace>(
    ctx: &mut RunContext<'_, S>,
    knowledge: &KnowledgeBase,
    cfg: &LearnConfig,
) {
    let path = PathContext::empty();
    let mut visited = HashSet::new();
    let mut heap = BinaryHeap::new();
    let mut scored = 0usize;

    let init = ctx.space.initial_state();
    visited.insert(ctx.space.state_hash(init));
    let score = ctx.score_and_record(init, &path, 0);
    scored += 1;
    heap.push(Ranked {
        priority: rank(ctx.space, init, score, knowledge, cfg),
        depth: 0,
        state: init,
    });

    while let Some(Ranked { depth, state, .. }) = heap.pop() {
        if ctx.halt() || scored >= cfg.guided_max_states {
            break;
        }
        for succ in ctx.space.successors(state) {
            if !visited.insert(ctx.space.state_hash(succ)) {
                continue;
            }
            let score = ctx.score_and_record(succ, &path, depth + 1);
            scored += 1;
            heap.push(Ranked {
                priority: rank(ctx.space, succ, score, knowledge, cfg),
                depth: depth + 1,
                state: succ,
            });
            if scored >= cfg.guided_max_states {
                break;
            }
        }
    }
}

fn rank<S: StateSpace>(
    space: &S,
    state: StateHandle,
    score: f64,
    knowledge: &KnowledgeBase,
    cfg: &LearnConfig,
) -> f64 {
    let enabled: BTreeSet<usize> = space
        .enabled_rules(state)
        .into_iter()
        .map(|r| r.index())
        .collect();
    score - cfg.bias_weight * knowledge.bias(&enabled)
}
