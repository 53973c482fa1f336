use ndarray::Array1;

use super::{RunContext, Strategy};

use crate::{
    config::{RewardKind, RlConfig},
    error::{ConfigError, SearchError},
    fitness::{FitnessEvaluator, PathContext},
    property::Property,
    rl::{DqnAgent, Experience},
    space::{StateHandle, StateSpace},
};

////////////////////////////////////////////////////////////////////////////////

/// Exploration as an MDP: the agent picks among the enabled rules of the
/// current state, gets a shaped reward and learns a Q-function online over
/// the run's episodes.
pub struct RlSearch {
    cfg: RlConfig,
}

impl RlSearch {
    pub fn new(cfg: RlConfig) -> Self {
        Self { cfg }
    }

    fn encode<S: StateSpace>(&self, space: &S, state: StateHandle) -> Array1<f64> {
        let mut features = space.features(state);
        features.truncate(self.cfg.max_state_size);
        features.resize(self.cfg.max_state_size, 0.0);
        Array1::from_vec(features)
    }

    fn reward(&self, property: &Property, prev: f64, next: f64, next_deadlock: bool) -> f64 {
        match self.cfg.reward {
            RewardKind::DistanceDelta => {
                if prev.is_finite() && next.is_finite() {
                    prev - next
                } else {
                    -1.0
                }
            }
            RewardKind::Dedicated => {
                if FitnessEvaluator::is_goal(next) {
                    100.0
                } else if next_deadlock && *property != Property::Deadlock {
                    -100.0
                } else {
                    -1.0
                }
            }
        }
    }
}

////////////////////////////////////////////////////////////////////////////////

impl<S: StateSpace> Strategy<S> for RlSearch {
    fn explore(&mut self, ctx: &mut RunContext<'_, S>) -> Result<(), SearchError> {
        self.cfg.validate()?;
        if ctx.space.rules().is_empty() {
            return Err(ConfigError::EmptyRuleSet.into());
        }
        if self.cfg.episodes == 0 {
            // vacuous run: nothing explored, nothing found
            return Ok(());
        }

        let mut agent = DqnAgent::new(&self.cfg);
        let path = PathContext::empty();
        let property = ctx.property.clone();

        for _episode in 0..self.cfg.episodes {
            if ctx.halt() {
                break;
            }

            let mut state = ctx.space.initial_state();
            let mut score = ctx.score_and_record(state, &path, 0);

            for step in 0..self.cfg.max_step {
                let enabled = ctx.space.enabled_rules(state);
                let valid = enabled.len().min(self.cfg.max_action_output);
                if valid == 0 {
                    break;
                }

                let encoded = self.encode(ctx.space, state);
                let action = agent.select_action(&encoded, valid);
                let Some(next) = ctx.space.apply(state, enabled[action]) else {
                    break;
                };

                let next_score = ctx.score_and_record(next, &path, step + 1);
                let next_deadlock = ctx.space.is_deadlock(next);
                let goal = FitnessEvaluator::is_goal(next_score);
                let terminal = goal || next_deadlock || step + 1 == self.cfg.max_step;
                let next_valid = ctx
                    .space
                    .enabled_rules(next)
                    .len()
                    .min(self.cfg.max_action_output)
                    .max(1);

                agent.remember(Experience {
                    state: encoded,
                    action,
                    reward: self.reward(&property, score, next_score, next_deadlock),
                    next_state: self.encode(ctx.space, next),
                    next_valid,
                    terminal,
                });
                agent.train_step();
                agent.advance_epsilon();

                state = next;
                score = next_score;
                if terminal {
                    break;
                }
            }
        }

        Ok(())
    }
}
