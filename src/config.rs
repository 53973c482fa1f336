use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{error::ConfigError, property::Property};

////////////////////////////////////////////////////////////////////////////////

fn positive(field: &'static str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        Err(ConfigError::NotPositive { field })
    } else {
        Ok(())
    }
}

fn rate(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) || value.is_nan() {
        Err(ConfigError::RateOutOfRange { field, value })
    } else {
        Ok(())
    }
}

fn positive_real(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value <= 0.0 {
        Err(ConfigError::NotPositiveReal { field, value })
    } else {
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Strategy-independent part of a run: what to look for and how long.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunConfig {
    pub property: Property,

    /// Keep searching after the first goal, collecting every distinct goal
    /// within the time limit.
    pub continue_after_goal: bool,

    /// Wall-clock budget, checked cooperatively at iteration boundaries.
    pub time_limit: Option<Duration>,
}

impl RunConfig {
    pub fn new(property: Property) -> Self {
        Self {
            property,
            continue_after_goal: false,
            time_limit: None,
        }
    }

    pub fn continue_after_goal(mut self, time_limit: Duration) -> Self {
        self.continue_after_goal = true;
        self.time_limit = Some(time_limit);
        self
    }

    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = Some(time_limit);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(limit) = self.time_limit {
            positive_real("time_limit", limit.as_secs_f64())?;
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    /// Keep the best `keep` candidates, refill by breeding.
    Truncation { keep: usize },
    /// Fixed-size tournaments over the whole population.
    Tournament,
}

pub const TOURNAMENT_SIZE: usize = 4;

////////////////////////////////////////////////////////////////////////////////

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeneticConfig {
    pub population: usize,
    pub depth: usize,
    pub iterations: usize,
    pub crossover_rate: f64,
    pub mutation_rate: f64,
    pub selection: Selection,
    pub seed: u64,
}

impl GeneticConfig {
    pub fn builder() -> GeneticConfigBuilder {
        GeneticConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("population", self.population)?;
        positive("depth", self.depth)?;
        positive("iterations", self.iterations)?;
        rate("crossover_rate", self.crossover_rate)?;
        rate("mutation_rate", self.mutation_rate)?;
        if let Selection::Truncation { keep } = self.selection {
            positive("selection.keep", keep)?;
        }
        Ok(())
    }
}

pub struct GeneticConfigBuilder {
    population: usize,
    depth: usize,
    iterations: usize,
    crossover_rate: f64,
    mutation_rate: f64,
    selection: Selection,
    seed: u64,
}

impl Default for GeneticConfigBuilder {
    fn default() -> Self {
        Self {
            population: 30,
            depth: 10,
            iterations: 50,
            crossover_rate: 0.8,
            mutation_rate: 0.1,
            selection: Selection::Tournament,
            seed: 0,
        }
    }
}

impl GeneticConfigBuilder {
    pub fn population(mut self, population: usize) -> Self {
        self.population = population;
        self
    }

    pub fn depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn crossover_rate(mut self, crossover_rate: f64) -> Self {
        self.crossover_rate = crossover_rate;
        self
    }

    pub fn mutation_rate(mut self, mutation_rate: f64) -> Self {
        self.mutation_rate = mutation_rate;
        self
    }

    pub fn selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn build(self) -> GeneticConfig {
        GeneticConfig {
            population: self.population,
            depth: self.depth,
            iterations: self.iterations,
            crossover_rate: self.crossover_rate,
            mutation_rate: self.mutation_rate,
            selection: self.selection,
            seed: self.seed,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SwarmConfig {
    pub particles: usize,
    pub depth: usize,
    pub iterations: usize,

    /// Inertia weight `w`.
    pub inertia: f64,
    /// Cognitive coefficient `c1` (pull toward the particle's own best).
    pub cognitive: f64,
    /// Social coefficient `c2` (pull toward the swarm best).
    pub social: f64,

    /// Enables the gravitational-search hybrid term.
    pub gsa: bool,
    /// Initial gravitational constant for the hybrid, decayed per
    /// iteration.
    pub gravity: f64,

    pub seed: u64,
}

impl SwarmConfig {
    pub fn builder() -> SwarmConfigBuilder {
        SwarmConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("particles", self.particles)?;
        positive("depth", self.depth)?;
        positive("iterations", self.iterations)?;
        positive_real("inertia", self.inertia)?;
        positive_real("cognitive", self.cognitive)?;
        positive_real("social", self.social)?;
        if self.gsa {
            positive_real("gravity", self.gravity)?;
        }
        Ok(())
    }
}

pub struct SwarmConfigBuilder {
    particles: usize,
    depth: usize,
    iterations: usize,
    inertia: f64,
    cognitive: f64,
    social: f64,
    gsa: bool,
    gravity: f64,
    seed: u64,
}

impl Default for SwarmConfigBuilder {
    fn default() -> Self {
        Self {
            particles: 30,
            depth: 10,
            iterations: 50,
            inertia: 0.7,
            cognitive: 1.5,
            social: 1.5,
            gsa: false,
            gravity: 1.0,
            seed: 0,
        }
    }
}

impl SwarmConfigBuilder {
    pub fn particles(mut self, particles: usize) -> Self {
        self.particles = particles;
        self
    }

    pub fn depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn inertia(mut self, inertia: f64) -> Self {
        self.inertia = inertia;
        self
    }

    pub fn cognitive(mut self, cognitive: f64) -> Self {
        self.cognitive = cognitive;
        self
    }

    pub fn social(mut self, social: f64) -> Self {
        self.social = social;
        self
    }

    pub fn gsa(mut self, gravity: f64) -> Self {
        self.gsa = true;
        self.gravity = gravity;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn build(self) -> SwarmConfig {
        SwarmConfig {
            particles: self.particles,
            depth: self.depth,
            iterations: self.iterations,
            inertia: self.inertia,
            cognitive: self.cognitive,
            social: self.social,
            gsa: self.gsa,
            gravity: self.gravity,
            seed: self.seed,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IdaConfig {
    pub max_depth: usize,
}

impl IdaConfig {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("max_depth", self.max_depth)
    }
}

////////////////////////////////////////////////////////////////////////////////

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BeamConfig {
    pub max_depth: usize,
    pub beam_width: usize,
}

impl BeamConfig {
    pub fn new(max_depth: usize, beam_width: usize) -> Self {
        Self {
            max_depth,
            beam_width,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("max_depth", self.max_depth)?;
        positive("beam_width", self.beam_width)
    }
}

////////////////////////////////////////////////////////////////////////////////

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MiningAlgorithm {
    Apriori,
    FpGrowth,
    Eclat,
    Fin,
}

/// What phase 2 of sample-and-learn fits over the sampled traces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Learner {
    Patterns(MiningAlgorithm),
    Bayes,
}

////////////////////////////////////////////////////////////////////////////////

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LearnConfig {
    /// Bound on the breadth-first sampling phase.
    pub max_states: usize,

    pub learner: Learner,

    /// Minimum support for pattern mining, as a fraction of transactions.
    pub min_support: f64,

    /// Weight of the knowledge-base bias against raw fitness in the guided
    /// phase.
    pub bias_weight: f64,

    /// Bound on the guided phase.
    pub guided_max_states: usize,
}

impl LearnConfig {
    pub fn builder() -> LearnConfigBuilder {
        LearnConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("max_states", self.max_states)?;
        positive("guided_max_states", self.guided_max_states)?;
        rate("min_support", self.min_support)?;
        positive_real("bias_weight", self.bias_weight)
    }
}

pub struct LearnConfigBuilder {
    max_states: usize,
    learner: Learner,
    min_support: f64,
    bias_weight: f64,
    guided_max_states: usize,
}

impl Default for LearnConfigBuilder {
    fn default() -> Self {
        Self {
            max_states: 1000,
            learner: Learner::Patterns(MiningAlgorithm::Apriori),
            min_support: 0.2,
            bias_weight: 1.0,
            guided_max_states: 1000,
        }
    }
}

impl LearnConfigBuilder {
    pub fn max_states(mut self, max_states: usize) -> Self {
        self.max_states = max_states;
        self
    }

    pub fn learner(mut self, learner: Learner) -> Self {
        self.learner = learner;
        self
    }

    pub fn min_support(mut self, min_support: f64) -> Self {
        self.min_support = min_support;
        self
    }

    pub fn bias_weight(mut self, bias_weight: f64) -> Self {
        self.bias_weight = bias_weight;
        self
    }

    pub fn guided_max_states(mut self, guided_max_states: usize) -> Self {
        self.guided_max_states = guided_max_states;
        self
    }

    pub fn build(self) -> LearnConfig {
        LearnConfig {
            max_states: self.max_states,
            learner: self.learner,
            min_support: self.min_support,
            bias_weight: self.bias_weight,
            guided_max_states: self.guided_max_states,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransferConfig {
    pub learn: LearnConfig,

    /// Target size of the reduced model, percent of the full model.
    pub min_percent: f64,
}

impl TransferConfig {
    pub fn new(learn: LearnConfig, min_percent: f64) -> Self {
        Self { learn, min_percent }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.learn.validate()?;
        if !self.min_percent.is_finite() || self.min_percent <= 0.0 || self.min_percent > 100.0 {
            return Err(ConfigError::NotPositiveReal {
                field: "min_percent",
                value: self.min_percent,
            });
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentKind {
    Dqn,
    DoubleDqn,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemoryKind {
    Fifo,
    Prioritized,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RewardKind {
    /// Reward proportional to the fitness-distance reduction of a step.
    DistanceDelta,
    /// Property-dedicated shaping: large bonus on goal, penalty on
    /// off-target deadlock.
    Dedicated,
}

////////////////////////////////////////////////////////////////////////////////

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RlConfig {
    pub episodes: usize,
    pub max_step: usize,

    /// Input width of the approximator; feature vectors are padded or
    /// truncated to this size.
    pub max_state_size: usize,
    /// Output width of the approximator; caps the number of selectable
    /// rules per state.
    pub max_action_output: usize,

    pub agent: AgentKind,
    pub memory: MemoryKind,
    pub reward: RewardKind,

    pub hidden_layers: Vec<usize>,
    pub batch_size: usize,
    pub memory_capacity: usize,
    pub discount_factor: f64,
    pub epsilon_min: f64,
    pub epsilon_decay: f64,
    pub target_update_steps: usize,
    pub learning_rate: f64,

    pub seed: u64,
}

impl RlConfig {
    pub fn builder() -> RlConfigBuilder {
        RlConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        // episodes == 0 is allowed: the run is vacuous, not invalid.
        positive("max_step", self.max_step)?;
        positive("max_state_size", self.max_state_size)?;
        positive("max_action_output", self.max_action_output)?;
        positive("batch_size", self.batch_size)?;
        positive("memory_capacity", self.memory_capacity)?;
        positive("target_update_steps", self.target_update_steps)?;
        if self.hidden_layers.iter().any(|width| *width == 0) {
            return Err(ConfigError::NotPositive {
                field: "hidden_layers",
            });
        }
        rate("discount_factor", self.discount_factor)?;
        rate("epsilon_min", self.epsilon_min)?;
        rate("epsilon_decay", self.epsilon_decay)?;
        positive_real("learning_rate", self.learning_rate)
    }
}

pub struct RlConfigBuilder {
    episodes: usize,
    max_step: usize,
    max_state_size: usize,
    max_action_output: usize,
    agent: AgentKind,
    memory: MemoryKind,
    reward: RewardKind,
    hidden_layers: Vec<usize>,
    batch_size: usize,
    memory_capacity: usize,
    discount_factor: f64,
    epsilon_min: f64,
    epsilon_decay: f64,
    target_update_steps: usize,
    learning_rate: f64,
    seed: u64,
}

impl Default for RlConfigBuilder {
    fn default() -> Self {
        Self {
            episodes: 100,
            max_step: 50,
            max_state_size: 32,
            max_action_output: 8,
            agent: AgentKind::Dqn,
            memory: MemoryKind::Fifo,
            reward: RewardKind::DistanceDelta,
            hidden_layers: vec![64, 64],
            batch_size: 32,
            memory_capacity: 10_000,
            discount_factor: 0.95,
            epsilon_min: 0.05,
            epsilon_decay: 0.995,
            target_update_steps: 100,
            learning_rate: 0.001,
            seed: 0,
        }
    }
}

impl RlConfigBuilder {
    pub fn episodes(mut self, episodes: usize) -> Self {
        self.episodes = episodes;
        self
    }

    pub fn max_step(mut self, max_step: usize) -> Self {
        self.max_step = max_step;
        self
    }

    pub fn max_state_size(mut self, max_state_size: usize) -> Self {
        self.max_state_size = max_state_size;
        self
    }

    pub fn max_action_output(mut self, max_action_output: usize) -> Self {
        self.max_action_output = max_action_output;
        self
    }

    pub fn agent(mut self, agent: AgentKind) -> Self {
        self.agent = agent;
        self
    }

    pub fn memory(mut self, memory: MemoryKind) -> Self {
        self.memory = memory;
        self
    }

    pub fn reward(mut self, reward: RewardKind) -> Self {
        self.reward = reward;
        self
    }

    pub fn hidden_layers(mut self, hidden_layers: Vec<usize>) -> Self {
        self.hidden_layers = hidden_layers;
        self
    }

    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn memory_capacity(mut self, memory_capacity: usize) -> Self {
        self.memory_capacity = memory_capacity;
        self
    }

    pub fn discount_factor(mut self, discount_factor: f64) -> Self {
        self.discount_factor = discount_factor;
        self
    }

    pub fn epsilon_min(mut self, epsilon_min: f64) -> Self {
        self.epsilon_min = epsilon_min;
        self
    }

    pub fn epsilon_decay(mut self, epsilon_decay: f64) -> Self {
        self.epsilon_decay = epsilon_decay;
        self
    }

    pub fn target_update_steps(mut self, target_update_steps: usize) -> Self {
        self.target_update_steps = target_update_steps;
        self
    }

    pub fn learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn build(self) -> RlConfig {
        RlConfig {
            episodes: self.episodes,
            max_step: self.max_step,
            max_state_size: self.max_state_size,
            max_action_output: self.max_action_output,
            agent: self.agent,
            memory: self.memory,
            reward: self.reward,
            hidden_layers: self.hidden_layers,
            batch_size: self.batch_size,
            memory_capacity: self.memory_capacity,
            discount_factor: self.discount_factor,
            epsilon_min: self.epsilon_min,
            epsilon_decay: self.epsilon_decay,
            target_update_steps: self.target_update_steps,
            learning_rate: self.learning_rate,
            seed: self.seed,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
