use ndarray::Array1;
use rand::{rngs::SmallRng, Rng, SeedableRng};

use super::{
    memory::{Experience, ReplayMemory},
    net::Mlp,
};

use crate::config::{AgentKind, MemoryKind, RlConfig};

////////////////////////////////////////////////////////////////////////////////

/// DQN / Double-DQN agent: online and target approximators, bounded replay
/// memory and a decaying epsilon-greedy policy. Created per run, trained
/// online, discarded at run end.
pub struct DqnAgent {
    online: Mlp,
    target: Mlp,
    memory: ReplayMemory,
    kind: AgentKind,
    prioritized: bool,
    batch_size: usize,
    discount: f64,
    epsilon: f64,
    epsilon_min: f64,
    epsilon_decay: f64,
    target_update_steps: usize,
    steps: usize,
    rng: SmallRng,
}

impl DqnAgent {
    pub fn new(cfg: &RlConfig) -> Self {
        let mut rng = SmallRng::seed_from_u64(cfg.seed);
        let online = Mlp::new(
            cfg.max_state_size,
            &cfg.hidden_layers,
            cfg.max_action_output,
            cfg.learning_rate,
            &mut rng,
        );
        let mut target = Mlp::new(
            cfg.max_state_size,
            &cfg.hidden_layers,
            cfg.max_action_output,
            cfg.learning_rate,
            &mut rng,
        );
        target.clone_weights_from(&online);
        Self {
            online,
            target,
            memory: ReplayMemory::new(cfg.memory, cfg.memory_capacity),
            kind: cfg.agent,
            prioritized: cfg.memory == MemoryKind::Prioritized,
            batch_size: cfg.batch_size,
            discount: cfg.discount_factor,
            epsilon: 1.0,
            epsilon_min: cfg.epsilon_min,
            epsilon_decay: cfg.epsilon_decay,
            target_update_steps: cfg.target_update_steps,
            steps: 0,
            rng,
        }
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    ////////////////////////////////////////////////////////////////////////////////

    /// Epsilon-greedy choice among the first `valid` actions (the enabled
    /// rules of the current state, capped by the network's output width).
    pub fn select_action(&mut self, state: &Array1<f64>, valid: usize) -> usize {
        debug_assert!(valid > 0 && valid <= self.online.output_len());
        if self.rng.random::<f64>() < self.epsilon {
            return self.rng.random_range(0..valid);
        }
        let q = self.online.forward(state);
        argmax(q.iter().take(valid))
    }

    pub fn remember(&mut self, experience: Experience) {
        self.memory.push(experience);
    }

    pub fn advance_epsilon(&mut self) {
        self.epsilon = (self.epsilon * self.epsilon_decay).max(self.epsilon_min);
    }

    ////////////////////////////////////////////////////////////////////////////////

    /// One mini-batch update of the online network, with a periodic target
    /// sync. No-op until the memory holds a full batch.
    pub fn train_step(&mut self) {
        if self.memory.len() < self.batch_size {
            return;
        }
        let sampled = self.memory.sample(self.batch_size, &mut self.rng);

        let mut inputs = Vec::with_capacity(sampled.len());
        let mut actions = Vec::with_capacity(sampled.len());
        let mut targets = Vec::with_capacity(sampled.len());
        let mut indices = Vec::with_capacity(sampled.len());

        for (index, e) in sampled {
            let target = if e.terminal {
                e.reward
            } else {
                e.reward + self.discount * self.future_value(e)
            };
            inputs.push(e.state.clone());
            actions.push(e.action);
            targets.push(target);
            indices.push(index);
        }

        let td_errors = self.online.train(&inputs, &actions, &targets);
        if self.prioritized {
            self.memory.update_priorities(&indices, &td_errors);
        }

        self.steps += 1;
        if self.steps % self.target_update_steps == 0 {
            self.target.clone_weights_from(&self.online);
        }
    }

    /// Bootstrap value of a non-terminal transition. Only the first
    /// `next_valid` outputs name rules enabled in the successor state; the
    /// rest are padding and must not leak into the target.
    fn future_value(&self, e: &Experience) -> f64 {
        match self.kind {
            AgentKind::Dqn => {
                let q = self.target.forward(&e.next_state);
                q.iter()
                    .take(e.next_valid)
                    .cloned()
                    .fold(f64::NEG_INFINITY, f64::max)
            }
            AgentKind::DoubleDqn => {
                // action chosen online, valued by the target net
                let online_q = self.online.forward(&e.next_state);
                let best = argmax(online_q.iter().take(e.next_valid));
                self.target.forward(&e.next_state)[best]
            }
        }
    }
}

////////////////////////////////////////////////////////////////////////////////

fn argmax<'a>(values: impl Iterator<Item = &'a f64>) -> usize {
    let mut best = 0;
    let mut best_value = f64::NEG_INFINITY;
    for (i, v) in values.enumerate() {
        if *v > best_value {
            best = i;
            best_value = *v;
        }
    }
    best
}

////////////////////////////////////////////////////////////////////////////////
