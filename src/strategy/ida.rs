use std::collections::HashSet;

use super::{RunContext, Strategy};

use crate::{
    config::{BeamConfig, IdaConfig},
    error::{ConfigError, SearchError},
    fitness::{FitnessEvaluator, PathContext},
    space::{StateHandle, StateSpace},
};

////////////////////////////////////////////////////////////////////////////////

/// Iterative-deepening A*: depth-first probes bounded by `f = depth + h`,
/// with the bound raised each round to the minimum f that exceeded it.
pub struct IdaStarSearch {
    cfg: IdaConfig,
}

impl IdaStarSearch {
    pub fn new(cfg: IdaConfig) -> Self {
        Self { cfg }
    }

    fn probe<S: StateSpace>(
        &self,
        ctx: &mut RunContext<'_, S>,
        state: StateHandle,
        depth: usize,
        bound: f64,
        path: &mut PathContext,
        next_bound: &mut f64,
    ) {
        let h = ctx.score_and_record(state, path, depth);
        let f = depth as f64 + h;
        if f > bound {
            *next_bound = next_bound.min(f);
            return;
        }
        if FitnessEvaluator::is_goal(h) || depth >= self.cfg.max_depth || ctx.halt() {
            return;
        }

        let hash = ctx.space.state_hash(state);
        if !path.push(hash) {
            // already on the probe path
            return;
        }
        for succ in ctx.space.successors(state) {
            self.probe(ctx, succ, depth + 1, bound, path, next_bound);
            if ctx.halt() {
                break;
            }
        }
        path.pop(hash);
    }
}

////////////////////////////////////////////////////////////////////////////////

impl<S: StateSpace> Strategy<S> for IdaStarSearch {
    fn explore(&mut self, ctx: &mut RunContext<'_, S>) -> Result<(), SearchError> {
        self.cfg.validate()?;
        if ctx.space.rules().is_empty() {
            return Err(ConfigError::EmptyRuleSet.into());
        }

        let init = ctx.space.initial_state();
        let mut bound = ctx.score(init, &PathContext::empty());

        loop {
            if ctx.halt() {
                break;
            }
            let mut next_bound = f64::INFINITY;
            let mut path = PathContext::empty();
            self.probe(ctx, init, 0, bound, &mut path, &mut next_bound);
            if !next_bound.is_finite() || next_bound <= bound {
                break;
            }
            bound = next_bound;
        }

        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Level-wise search keeping only the `beam_width` best-scoring states per
/// depth. Incomplete but bounded in memory.
pub struct BeamSearch {
    cfg: BeamConfig,
}

impl BeamSearch {
    pub fn new(cfg: BeamConfig) -> Self {
        Self { cfg }
    }
}

impl<S: StateSpace> Strategy<S> for BeamSearch {
    fn explore(&mut self, ctx: &mut RunContext<'_, S>) -> Result<(), SearchError> {
        self.cfg.validate()?;
        if ctx.space.rules().is_empty() {
            return Err(ConfigError::EmptyRuleSet.into());
        }

        let path = PathContext::empty();
        let mut visited: HashSet<_> = HashSet::new();

        let init = ctx.space.initial_state();
        visited.insert(ctx.space.state_hash(init));
        ctx.score_and_record(init, &path, 0);
        let mut frontier = vec![init];

        for depth in 1..=self.cfg.max_depth {
            if ctx.halt() || frontier.is_empty() {
                break;
            }

            let mut level: Vec<(StateHandle, f64)> = Vec::new();
            for state in frontier.drain(..) {
                for succ in ctx.space.successors(state) {
                    if !visited.insert(ctx.space.state_hash(succ)) {
                        continue;
                    }
                    let score = ctx.score_and_record(succ, &path, depth);
                    level.push((succ, score));
                }
            }

            // keep only the best beam_width states
            level.sort_by(|a, b| a.1.total_cmp(&b.1));
            level.truncate(self.cfg.beam_width);
            frontier = level.into_iter().map(|(s, _)| s).collect();
        }

        Ok(())
    }
}
