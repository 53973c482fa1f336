use rstest::rstest;

use super::common::{long_chain, no_rules, run};

use crate::{
    config::{AgentKind, MemoryKind, RewardKind, RlConfig},
    error::{ConfigError, SearchError},
    property::Property,
    stats::Verdict,
    strategy::rl::RlSearch,
};

////////////////////////////////////////////////////////////////////////////////

fn small_cfg() -> RlConfig {
    RlConfig::builder()
        .episodes(200)
        .max_step(10)
        .max_state_size(4)
        .max_action_output(4)
        .hidden_layers(vec![8])
        .batch_size(8)
        .seed(42)
        .build()
}

////////////////////////////////////////////////////////////////////////////////

#[rstest]
#[case(AgentKind::Dqn, MemoryKind::Fifo, RewardKind::DistanceDelta)]
#[case(AgentKind::DoubleDqn, MemoryKind::Prioritized, RewardKind::Dedicated)]
fn agent_finds_the_deadlock(
    #[case] agent: AgentKind,
    #[case] memory: MemoryKind,
    #[case] reward: RewardKind,
) {
    let space = long_chain(4);
    let cfg = RlConfig::builder()
        .episodes(200)
        .max_step(10)
        .max_state_size(4)
        .max_action_output(4)
        .hidden_layers(vec![8])
        .batch_size(8)
        .agent(agent)
        .memory(memory)
        .reward(reward)
        .seed(42)
        .build();
    let report = run(&space, &mut RlSearch::new(cfg), Property::Deadlock).unwrap();

    assert_eq!(report.verdict, Verdict::Verified);
    assert_eq!(report.goals.len(), 1);
    // the walk may wander through resets before reaching the end
    assert!(report.stats.first_goal_depth.unwrap() >= 3);
}

////////////////////////////////////////////////////////////////////////////////

#[test]
fn zero_episodes_is_a_vacuous_run() {
    let space = long_chain(4);
    let cfg = small_cfg();
    let cfg = RlConfig { episodes: 0, ..cfg };
    let report = run(&space, &mut RlSearch::new(cfg), Property::Deadlock).unwrap();

    assert_eq!(report.verdict, Verdict::NotVerified);
    assert_eq!(report.stats.explored_states, 0);
    assert!(report.goals.is_empty());
}

////////////////////////////////////////////////////////////////////////////////

#[test]
fn empty_rule_set_is_a_config_error() {
    let space = no_rules();
    let err = run(&space, &mut RlSearch::new(small_cfg()), Property::Deadlock).unwrap_err();
    assert_eq!(err, SearchError::Config(ConfigError::EmptyRuleSet));
}
