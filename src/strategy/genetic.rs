use rand::{rngs::SmallRng, Rng, SeedableRng};

use super::{evaluate_candidate, RunContext, Strategy};

use crate::{
    candidate::Candidate,
    config::{GeneticConfig, Selection, TOURNAMENT_SIZE},
    error::{ConfigError, SearchError},
    space::{RuleId, StateSpace},
};

////////////////////////////////////////////////////////////////////////////////

/// Genetic search over fixed-length rule-choice chromosomes:
/// init -> evaluate -> select -> crossover -> mutate -> evaluate -> ...
/// Every generation is topped up with a handful of fresh random candidates.
pub struct GeneticSearch {
    cfg: GeneticConfig,
}

impl GeneticSearch {
    pub fn new(cfg: GeneticConfig) -> Self {
        Self { cfg }
    }

    fn select(&self, scored: &[(Candidate, f64)], rng: &mut SmallRng) -> Vec<Candidate> {
        match self.cfg.selection {
            Selection::Truncation { keep } => {
                let mut ranked: Vec<_> = scored.iter().collect();
                ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
                ranked
                    .into_iter()
                    .take(keep.min(scored.len()))
                    .map(|(c, _)| c.clone())
                    .collect()
            }
            Selection::Tournament => (0..scored.len())
                .map(|_| {
                    let winner = (0..TOURNAMENT_SIZE)
                        .map(|_| &scored[rng.random_range(0..scored.len())])
                        .min_by(|a, b| a.1.total_cmp(&b.1))
                        .unwrap();
                    winner.0.clone()
                })
                .collect(),
        }
    }

    fn breed(
        &self,
        parents: &[Candidate],
        rules: &[RuleId],
        count: usize,
        rng: &mut SmallRng,
    ) -> Vec<Candidate> {
        let mut next = Vec::with_capacity(self.cfg.population);
        while next.len() < count {
            let a = &parents[rng.random_range(0..parents.len())];
            let b = &parents[rng.random_range(0..parents.len())];
            let (mut c, mut d) = if rng.random::<f64>() < self.cfg.crossover_rate {
                a.crossover(b, rng)
            } else {
                (a.clone(), b.clone())
            };
            if rng.random::<f64>() < self.cfg.mutation_rate {
                c.mutate(rules, rng);
            }
            if rng.random::<f64>() < self.cfg.mutation_rate {
                d.mutate(rules, rng);
            }
            next.push(c);
            if next.len() < count {
                next.push(d);
            }
        }
        next
    }
}

////////////////////////////////////////////////////////////////////////////////

impl<S: StateSpace> Strategy<S> for GeneticSearch {
    fn explore(&mut self, ctx: &mut RunContext<'_, S>) -> Result<(), SearchError> {
        self.cfg.validate()?;
        let rules = ctx.space.effectful_rules();
        if rules.is_empty() {
            return Err(ConfigError::EmptyRuleSet.into());
        }

        let mut rng = SmallRng::seed_from_u64(self.cfg.seed);
        let population: Vec<Candidate> = (0..self.cfg.population)
            .map(|_| Candidate::random(&rules, self.cfg.depth, &mut rng))
            .collect();

        let mut scored = evaluate(ctx, population);

        // A flat fitness landscape lets the population fix by drift alone;
        // a few fresh candidates per generation keep the gene pool open.
        let fresh = self.cfg.population.div_ceil(10);

        for _generation in 0..self.cfg.iterations {
            if ctx.halt() {
                break;
            }
            let parents = self.select(&scored, &mut rng);
            let mut next = self.breed(&parents, &rules, self.cfg.population - fresh, &mut rng);
            next.extend((0..fresh).map(|_| Candidate::random(&rules, self.cfg.depth, &mut rng)));
            scored = evaluate(ctx, next);
        }

        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////

fn evaluate<S: StateSpace>(
    ctx: &mut RunContext<'_, S>,
    population: Vec<Candidate>,
) -> Vec<(Candidate, f64)> {
    population
        .into_iter()
        .map(|c| {
            let score = evaluate_candidate(ctx, &c);
            (c, score)
        })
        .collect()
}
