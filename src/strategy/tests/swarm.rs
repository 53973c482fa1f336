use rstest::rstest;

use super::common::{deadlock_chain, loaded_chain, no_rules, run};

use crate::{
    config::SwarmConfig,
    error::{ConfigError, SearchError},
    property::Property,
    stats::Verdict,
    strategy::swarm::SwarmSearch,
};

////////////////////////////////////////////////////////////////////////////////

fn small_swarm() -> crate::config::SwarmConfigBuilder {
    SwarmConfig::builder()
        .particles(10)
        .depth(5)
        .iterations(30)
        .seed(11)
}

////////////////////////////////////////////////////////////////////////////////

#[rstest]
#[case(false)]
#[case(true)]
fn finds_deadlock(#[case] gsa: bool) {
    let space = deadlock_chain();
    let builder = small_swarm();
    let cfg = if gsa { builder.gsa(2.0) } else { builder }.build();

    let report = run(&space, &mut SwarmSearch::new(cfg), Property::Deadlock).unwrap();
    assert_eq!(report.verdict, Verdict::Verified);
    assert!(report.stats.first_goal_depth.unwrap() <= 5);
}

////////////////////////////////////////////////////////////////////////////////

#[test]
fn graded_distance_guides_to_predicate() {
    let space = loaded_chain();
    let cfg = small_swarm().build();
    let report = run(
        &space,
        &mut SwarmSearch::new(cfg),
        Property::Reachability("loaded".into()),
    )
    .unwrap();
    assert_eq!(report.verdict, Verdict::Verified);
}

////////////////////////////////////////////////////////////////////////////////

#[test]
fn empty_rule_set_is_a_config_error() {
    let space = no_rules();
    let cfg = SwarmConfig::builder().build();
    let err = run(&space, &mut SwarmSearch::new(cfg), Property::Deadlock).unwrap_err();
    assert_eq!(err, SearchError::Config(ConfigError::EmptyRuleSet));
}
