mod candidate;
mod config;
mod controller;
mod error;
mod fitness;
mod mine;
mod property;
mod space;
mod stats;
mod strategy;
mod util;

////////////////////////////////////////////////////////////////////////////////

pub mod rl;

pub use candidate::{Candidate, Replay};

pub use config::{
    AgentKind, BeamConfig, GeneticConfig, GeneticConfigBuilder, IdaConfig, LearnConfig,
    LearnConfigBuilder, Learner, MemoryKind, MiningAlgorithm, RewardKind, RlConfig,
    RlConfigBuilder, RunConfig, Selection, SwarmConfig, SwarmConfigBuilder, TransferConfig,
};

pub use controller::{spawn, Controller, RunHandle};

pub use error::{ConfigError, SearchError, SearchResult};

pub use fitness::{FitnessEvaluator, PathContext};

pub use mine::{AssociationRule, KnowledgeBase, Transaction};

pub use property::Property;

pub use space::{table::TableSpace, HashType, RuleId, RuleInfo, StateHandle, StateSpace};

pub use stats::{GoalState, PhaseTimes, RunReport, RunStatistics, Verdict};

pub use strategy::{
    genetic::GeneticSearch,
    ida::{BeamSearch, IdaStarSearch},
    learn::LearnSearch,
    rl::RlSearch,
    swarm::SwarmSearch,
    transfer::{ModelReducer, ReduceError, TableReducer, TransferSearch},
    CancelToken, RunContext, Strategy,
};
