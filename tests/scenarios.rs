use hexplore::{
    BeamConfig, BeamSearch, Controller, GeneticConfig, GeneticSearch, IdaConfig, IdaStarSearch, LearnConfig,
    LearnSearch, Learner, MiningAlgorithm, Property, RlConfig, RlSearch, RuleId, RuleInfo,
    RunConfig, StateSpace, Strategy, SwarmConfig, SwarmSearch, TableReducer, TableSpace,
    TransferConfig, TransferSearch, Verdict,
};

////////////////////////////////////////////////////////////////////////////////

/// Message-delivery model: a ping is sent, delivered and acknowledged in a
/// loop, or lost in transit. The lost state is the only deadlock, two rule
/// applications from the initial state.
fn pingpong() -> TableSpace {
    let rules = vec![
        RuleInfo::new("send", true),
        RuleInfo::new("deliver", true),
        RuleInfo::new("drop", true),
        RuleInfo::new("ack", true),
    ];
    let mut space = TableSpace::new(rules);
    let init = space.initial_state();
    let sent = space.add_state();
    let delivered = space.add_state();
    let lost = space.add_state();

    space.add_edge(init, RuleId(0), sent);
    space.add_edge(sent, RuleId(1), delivered);
    space.add_edge(sent, RuleId(2), lost);
    space.add_edge(delivered, RuleId(3), init);

    space.set_predicate_distance("delivered", init, 2.0);
    space.set_predicate_distance("delivered", sent, 1.0);
    space.set_predicate_distance("delivered", lost, f64::INFINITY);
    space.mark_predicate("delivered", delivered);
    space
}

fn strategies() -> Vec<(&'static str, Box<dyn Strategy<TableSpace>>)> {
    vec![
        (
            "genetic",
            Box::new(GeneticSearch::new(
                GeneticConfig::builder()
                    .population(20)
                    .depth(4)
                    .iterations(20)
                    .seed(42)
                    .build(),
            )),
        ),
        (
            "swarm",
            Box::new(SwarmSearch::new(
                SwarmConfig::builder()
                    .particles(20)
                    .depth(4)
                    .iterations(30)
                    .seed(42)
                    .build(),
            )),
        ),
        ("ida", Box::new(IdaStarSearch::new(IdaConfig::new(6)))),
        ("beam", Box::new(BeamSearch::new(BeamConfig::new(6, 2)))),
        (
            "learn-apriori",
            Box::new(LearnSearch::new(
                LearnConfig::builder()
                    .learner(Learner::Patterns(MiningAlgorithm::Apriori))
                    .build(),
            )),
        ),
        (
            "learn-bayes",
            Box::new(LearnSearch::new(
                LearnConfig::builder().learner(Learner::Bayes).build(),
            )),
        ),
        (
            "transfer",
            Box::new(TransferSearch::new(
                TransferConfig::new(LearnConfig::builder().build(), 60.0),
                TableReducer,
            )),
        ),
        (
            "rl",
            Box::new(RlSearch::new(
                RlConfig::builder()
                    .episodes(200)
                    .max_step(8)
                    .max_state_size(4)
                    .max_action_output(4)
                    .hidden_layers(vec![8])
                    .batch_size(8)
                    .seed(42)
                    .build(),
            )),
        ),
    ]
}

////////////////////////////////////////////////////////////////////////////////

#[test]
fn every_strategy_refutes_deadlock_freedom() {
    let space = pingpong();
    for (name, mut strategy) in strategies() {
        let report = Controller::new(RunConfig::new(Property::Deadlock))
            .run(&space, &mut strategy)
            .unwrap_or_else(|e| panic!("{name}: {e}"));

        assert_eq!(report.verdict, Verdict::Verified, "{name}");
        assert_eq!(report.goals.len(), 1, "{name}");
        assert!(report.witness.is_some(), "{name}");
        assert!(report.stats.first_goal_depth.unwrap() >= 2, "{name}");
        // each distinct state costs at least one fitness call
        assert!(
            report.stats.explored_states <= report.stats.fitness_calls,
            "{name}"
        );
        assert!(report.stats.explored_states <= 4, "{name}");
    }
}

////////////////////////////////////////////////////////////////////////////////

#[test]
fn reachability_of_the_delivered_predicate() {
    let space = pingpong();
    let property = Property::Reachability("delivered".into());
    for (name, mut strategy) in strategies() {
        let report = Controller::new(RunConfig::new(property.clone()))
            .run(&space, &mut strategy)
            .unwrap_or_else(|e| panic!("{name}: {e}"));
        assert_eq!(report.verdict, Verdict::Verified, "{name}");
    }
}

////////////////////////////////////////////////////////////////////////////////

#[test]
fn seeded_runs_are_reproducible() {
    let space = pingpong();
    let cfg = GeneticConfig::builder()
        .population(10)
        .depth(4)
        .iterations(10)
        .seed(7)
        .build();

    let first = Controller::new(RunConfig::new(Property::Deadlock))
        .run(&space, &mut GeneticSearch::new(cfg.clone()))
        .unwrap();
    let second = Controller::new(RunConfig::new(Property::Deadlock))
        .run(&space, &mut GeneticSearch::new(cfg))
        .unwrap();

    assert_eq!(first.witness, second.witness);
    assert_eq!(
        first.stats.first_goal_depth,
        second.stats.first_goal_depth
    );
    assert_eq!(first.stats.fitness_calls, second.stats.fitness_calls);
}
