use crate::{
    config::RunConfig,
    controller::Controller,
    error::SearchResult,
    property::Property,
    space::{table::TableSpace, RuleId, RuleInfo, StateSpace},
    stats::RunReport,
    strategy::Strategy,
};

////////////////////////////////////////////////////////////////////////////////

fn advance_reset() -> Vec<RuleInfo> {
    vec![
        RuleInfo::new("advance", true),
        RuleInfo::new("reset", true),
    ]
}

////////////////////////////////////////////////////////////////////////////////

/// Chain with a single deadlock three rule applications deep:
/// s0 -a-> s1 -a-> s2 -a-> s3, with `reset` edges back to s0.
pub fn deadlock_chain() -> TableSpace {
    long_chain(4)
}

/// Chain of `n` states with the only deadlock at the end.
pub fn long_chain(n: usize) -> TableSpace {
    assert!(n >= 2);
    let mut space = TableSpace::new(advance_reset());
    let mut states = vec![space.initial_state()];
    for _ in 1..n {
        states.push(space.add_state());
    }
    for i in 0..n - 1 {
        space.add_edge(states[i], RuleId(0), states[i + 1]);
        space.add_edge(states[i], RuleId(1), states[0]);
    }
    space
}

////////////////////////////////////////////////////////////////////////////////

/// Two deadlocks one application away from the initial state.
pub fn twin_deadlocks() -> TableSpace {
    let mut space = TableSpace::new(advance_reset());
    let s1 = space.add_state();
    let s2 = space.add_state();
    let init = space.initial_state();
    space.add_edge(init, RuleId(0), s1);
    space.add_edge(init, RuleId(1), s2);
    space
}

////////////////////////////////////////////////////////////////////////////////

/// Deadlock-free space whose `loaded` predicate holds at the end of a
/// chain, with a graded distance toward it.
pub fn loaded_chain() -> TableSpace {
    let mut space = TableSpace::new(advance_reset());
    let s1 = space.add_state();
    let s2 = space.add_state();
    let s3 = space.add_state();
    let init = space.initial_state();
    space.add_edge(init, RuleId(0), s1);
    space.add_edge(s1, RuleId(0), s2);
    space.add_edge(s2, RuleId(0), s3);
    space.add_edge(s3, RuleId(1), init);
    for (state, d) in [(init, 3.0), (s1, 2.0), (s2, 1.0)] {
        space.set_predicate_distance("loaded", state, d);
    }
    space.mark_predicate("loaded", s3);
    space
}

////////////////////////////////////////////////////////////////////////////////

/// Deadlock-free space with a reachable cycle not through the initial
/// state: s0 -a-> s1 -a-> s2 -r-> s1.
pub fn lasso() -> TableSpace {
    let mut space = TableSpace::new(advance_reset());
    let s1 = space.add_state();
    let s2 = space.add_state();
    space.add_edge(space.initial_state(), RuleId(0), s1);
    space.add_edge(s1, RuleId(0), s2);
    space.add_edge(s2, RuleId(1), s1);
    space
}

////////////////////////////////////////////////////////////////////////////////

pub fn no_rules() -> TableSpace {
    TableSpace::new(Vec::new())
}

////////////////////////////////////////////////////////////////////////////////

pub fn run<S: StateSpace>(
    space: &S,
    strategy: &mut impl Strategy<S>,
    property: Property,
) -> SearchResult<RunReport> {
    Controller::new(RunConfig::new(property)).run(space, strategy)
}
