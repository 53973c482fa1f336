use rand::{rngs::SmallRng, Rng};

use crate::space::{RuleId, StateHandle, StateSpace};

////////////////////////////////////////////////////////////////////////////////

/// Fixed-length sequence of rule choices: the chromosome of the genetic
/// search and the decoded position of a particle. Its length never changes
/// after construction; crossover and mutation preserve it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    genes: Vec<RuleId>,
}

impl Candidate {
    /// Draws `depth` random choices from `rules`. `rules` must be the
    /// non-empty effectful subset; emptiness is rejected as a configuration
    /// error before any candidate is built.
    pub fn random(rules: &[RuleId], depth: usize, rng: &mut SmallRng) -> Self {
        assert!(!rules.is_empty());
        let genes = (0..depth)
            .map(|_| rules[rng.random_range(0..rules.len())])
            .collect();
        Self { genes }
    }

    pub fn from_genes(genes: Vec<RuleId>) -> Self {
        Self { genes }
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn genes(&self) -> &[RuleId] {
        &self.genes
    }

    ////////////////////////////////////////////////////////////////////////////////

    /// Single-point crossover. Children keep the parents' length.
    pub fn crossover(&self, other: &Candidate, rng: &mut SmallRng) -> (Candidate, Candidate) {
        assert_eq!(self.len(), other.len());
        let cut = rng.random_range(0..self.len());
        let mut a = self.genes.clone();
        let mut b = other.genes.clone();
        a[cut..].copy_from_slice(&other.genes[cut..]);
        b[cut..].copy_from_slice(&self.genes[cut..]);
        (Candidate::from_genes(a), Candidate::from_genes(b))
    }

    /// Replaces one random gene with a randomly drawn rule.
    pub fn mutate(&mut self, rules: &[RuleId], rng: &mut SmallRng) {
        let at = rng.random_range(0..self.genes.len());
        self.genes[at] = rules[rng.random_range(0..rules.len())];
    }

    ////////////////////////////////////////////////////////////////////////////////

    /// Replays the choices from the initial state. Inapplicable choices are
    /// skipped, so the number of applied rules can be shorter than the
    /// chromosome.
    pub fn replay(&self, space: &impl StateSpace) -> Replay {
        let mut state = space.initial_state();
        let mut states = vec![state];
        let mut applied = 0;
        for rule in &self.genes {
            if let Some(next) = space.apply(state, *rule) {
                state = next;
                applied += 1;
                states.push(state);
            }
        }
        Replay {
            terminal: state,
            applied,
            states,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Outcome of replaying a candidate: the reached state, the number of rule
/// applications and every state along the way, initial state first. The
/// index of a state in `states` is the witness length up to it.
pub struct Replay {
    pub terminal: StateHandle,
    pub applied: usize,
    pub states: Vec<StateHandle>,
}

////////////////////////////////////////////////////////////////////////////////
