use std::{
    fmt::Display,
    time::Duration,
};

use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::{property::Property, space::HashType};

////////////////////////////////////////////////////////////////////////////////

/// One goal state found during a run. `found_at` is measured from run
/// start; the list of goals a run produces is append-only and ordered by
/// `found_at`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GoalState {
    pub state: HashType,
    pub witness_len: usize,
    pub found_at: Duration,
    pub explored_when_found: usize,
}

////////////////////////////////////////////////////////////////////////////////

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Verified,
    NotVerified,
    Refuted,
    NotRefuted,
}

impl Verdict {
    pub fn of(property: &Property, goal_found: bool) -> Self {
        match (property.is_refutation(), goal_found) {
            (false, true) => Verdict::Verified,
            (false, false) => Verdict::NotVerified,
            (true, true) => Verdict::Refuted,
            (true, false) => Verdict::NotRefuted,
        }
    }

    /// True when the search found what it was looking for.
    pub fn goal_found(&self) -> bool {
        matches!(self, Verdict::Verified | Verdict::Refuted)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Verified => "verified",
            Verdict::NotVerified => "not verified",
            Verdict::Refuted => "refuted",
            Verdict::NotRefuted => "not refuted",
        }
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Wall-clock cost of the three phases of sample-and-learn runs. Zero for
/// single-phase strategies.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct PhaseTimes {
    pub sampling: Duration,
    pub mining: Duration,
    pub guided: Duration,
}

impl PhaseTimes {
    pub fn total(&self) -> Duration {
        self.sampling + self.mining + self.guided
    }
}

////////////////////////////////////////////////////////////////////////////////

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RunStatistics {
    /// Distinct states scored by the fitness evaluator.
    pub explored_states: usize,

    /// Every fitness call counts, repeat evaluations included.
    pub fitness_calls: usize,

    pub fitness_time: Duration,

    /// Witness length of the first goal, when one was found.
    pub first_goal_depth: Option<usize>,

    pub phases: PhaseTimes,

    /// Rules excluded from candidate generation (no graph effect).
    pub excluded_rule_count: usize,
    pub excluded_rule_names: Vec<String>,

    pub elapsed: Duration,
}

////////////////////////////////////////////////////////////////////////////////

/// Everything a run hands back to its caller: plain serializable data.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunReport {
    pub verdict: Verdict,
    pub witness: Option<HashType>,
    pub stats: RunStatistics,
    pub goals: Vec<GoalState>,
}

impl RunReport {
    pub fn goal_found(&self) -> bool {
        self.verdict.goal_found()
    }
}

impl Display for RunReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let verdict = if self.goal_found() {
            self.verdict.as_str().green()
        } else {
            self.verdict.as_str().red()
        };
        writeln!(f, "Verdict: {}", verdict)?;
        if let Some(w) = self.witness {
            writeln!(
                f,
                "Witness: state {:#018x}, length {}",
                w,
                self.stats.first_goal_depth.unwrap_or(0)
            )?;
        }
        writeln!(
            f,
            "Explored states: {}, fitness calls: {} ({:?})",
            self.stats.explored_states, self.stats.fitness_calls, self.stats.fitness_time
        )?;
        if self.stats.phases.total() > Duration::ZERO {
            writeln!(
                f,
                "Phases: sampling {:?}, mining {:?}, guided {:?}",
                self.stats.phases.sampling, self.stats.phases.mining, self.stats.phases.guided
            )?;
        }
        writeln!(f, "Elapsed: {:?}", self.stats.elapsed)?;
        if !self.goals.is_empty() {
            writeln!(f, "========= GOALS =========")?;
            for (i, g) in self.goals.iter().enumerate() {
                writeln!(
                    f,
                    "{:>3}. state {:#018x}, witness length {}, found at {:?}, {} states explored",
                    i + 1,
                    g.state,
                    g.witness_len,
                    g.found_at,
                    g.explored_when_found
                )?;
            }
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////
