use rstest::rstest;

use super::common::{deadlock_chain, loaded_chain, no_rules, run, twin_deadlocks};

use crate::{
    candidate::Candidate,
    config::{GeneticConfig, RunConfig, Selection},
    error::{ConfigError, SearchError},
    property::Property,
    space::{RuleId, RuleInfo, StateSpace},
    stats::Verdict,
    strategy::{evaluate_candidate, genetic::GeneticSearch, RunContext},
};

////////////////////////////////////////////////////////////////////////////////

#[rstest]
#[case(Selection::Tournament)]
#[case(Selection::Truncation { keep: 4 })]
fn finds_single_deadlock(#[case] selection: Selection) {
    let space = deadlock_chain();
    let cfg = GeneticConfig::builder()
        .population(10)
        .depth(5)
        .iterations(20)
        .selection(selection)
        .seed(42)
        .build();
    let report = run(&space, &mut GeneticSearch::new(cfg), Property::Deadlock).unwrap();

    assert_eq!(report.verdict, Verdict::Verified);
    assert!(report.witness.is_some());
    // heuristic witness is bounded by the chromosome length
    assert!(report.stats.first_goal_depth.unwrap() <= 5);
}

////////////////////////////////////////////////////////////////////////////////

#[test]
fn empty_rule_set_is_a_config_error() {
    let space = no_rules();
    let cfg = GeneticConfig::builder().build();
    let err = run(&space, &mut GeneticSearch::new(cfg), Property::Deadlock).unwrap_err();
    assert_eq!(err, SearchError::Config(ConfigError::EmptyRuleSet));
}

////////////////////////////////////////////////////////////////////////////////

#[test]
fn stops_at_first_goal_without_continue() {
    // both deadlocks get evaluated inside the first generation; only the
    // first one may enter the goal list
    let space = twin_deadlocks();
    let cfg = GeneticConfig::builder()
        .population(8)
        .depth(3)
        .iterations(50)
        .seed(0)
        .build();
    let report = run(&space, &mut GeneticSearch::new(cfg), Property::Deadlock).unwrap();

    assert_eq!(report.verdict, Verdict::Verified);
    assert_eq!(report.goals.len(), 1);
}

////////////////////////////////////////////////////////////////////////////////

#[test]
fn a_goal_passed_through_mid_path_is_recorded() {
    // the replay visits the loaded state and then leaves it again
    let space = loaded_chain();
    let cfg = RunConfig::new(Property::Reachability("loaded".into()));
    let mut ctx = RunContext::new(&space, &cfg);
    let cand = Candidate::from_genes(vec![RuleId(0), RuleId(0), RuleId(0), RuleId(1)]);

    let best = evaluate_candidate(&mut ctx, &cand);
    assert_eq!(best, 0.0);

    let report = ctx.into_report();
    assert_eq!(report.verdict, Verdict::Verified);
    assert_eq!(report.stats.first_goal_depth, Some(3));
}

////////////////////////////////////////////////////////////////////////////////

#[test]
fn effectless_rules_are_excluded_but_reported() {
    // `observe` changes nothing and must never appear in a chromosome
    let mut space = crate::space::table::TableSpace::new(vec![
        RuleInfo::new("advance", true),
        RuleInfo::new("observe", false),
    ]);
    let s1 = space.add_state();
    let s2 = space.add_state();
    let s3 = space.add_state();
    let init = space.initial_state();
    space.add_edge(init, RuleId(0), s1);
    space.add_edge(s1, RuleId(0), s2);
    space.add_edge(s2, RuleId(0), s3);
    space.add_edge(init, RuleId(1), init);
    assert_eq!(space.effectful_rules(), vec![RuleId(0)]);

    let cfg = GeneticConfig::builder()
        .population(10)
        .depth(5)
        .iterations(20)
        .seed(7)
        .build();
    let report = run(&space, &mut GeneticSearch::new(cfg), Property::Deadlock).unwrap();
    assert_eq!(report.verdict, Verdict::Verified);
    assert_eq!(report.stats.excluded_rule_count, 1);
    assert_eq!(report.stats.excluded_rule_names, vec!["observe".to_string()]);
}

////////////////////////////////////////////////////////////////////////////////

#[test]
fn invalid_rate_is_rejected_before_exploring() {
    let space = deadlock_chain();
    let cfg = GeneticConfig::builder().crossover_rate(2.0).build();
    let err = run(&space, &mut GeneticSearch::new(cfg), Property::Deadlock).unwrap_err();
    assert!(matches!(
        err,
        SearchError::Config(ConfigError::RateOutOfRange { .. })
    ));
}
