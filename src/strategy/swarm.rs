use rand::{rngs::SmallRng, Rng, SeedableRng};

use super::{evaluate_candidate, RunContext, Strategy};

use crate::{
    candidate::Candidate,
    config::SwarmConfig,
    error::{ConfigError, SearchError},
    space::{RuleId, StateSpace},
};

////////////////////////////////////////////////////////////////////////////////

struct Particle {
    pos: Vec<f64>,
    vel: Vec<f64>,
    best_pos: Vec<f64>,
    best_fit: f64,
    fit: f64,
}

////////////////////////////////////////////////////////////////////////////////

/// Particle swarm over the discretized rule-index space, optionally
/// hybridized with a gravitational-search term (PSO-GSA). Positions decode
/// to rule-choice candidates by round-and-clamp per dimension.
pub struct SwarmSearch {
    cfg: SwarmConfig,
}

impl SwarmSearch {
    pub fn new(cfg: SwarmConfig) -> Self {
        Self { cfg }
    }
}

////////////////////////////////////////////////////////////////////////////////

impl<S: StateSpace> Strategy<S> for SwarmSearch {
    fn explore(&mut self, ctx: &mut RunContext<'_, S>) -> Result<(), SearchError> {
        self.cfg.validate()?;
        let rules = ctx.space.effectful_rules();
        if rules.is_empty() {
            return Err(ConfigError::EmptyRuleSet.into());
        }

        let mut rng = SmallRng::seed_from_u64(self.cfg.seed);
        let range = rules.len() as f64;
        let vmax = range;

        let mut swarm: Vec<Particle> = (0..self.cfg.particles)
            .map(|_| {
                let pos: Vec<f64> = (0..self.cfg.depth)
                    .map(|_| rng.random::<f64>() * (range - 1.0).max(0.0))
                    .collect();
                Particle {
                    best_pos: pos.clone(),
                    pos,
                    vel: vec![0.0; self.cfg.depth],
                    best_fit: f64::INFINITY,
                    fit: f64::INFINITY,
                }
            })
            .collect();

        let mut global_best_pos = swarm[0].pos.clone();
        let mut global_best_fit = f64::INFINITY;

        for p in swarm.iter_mut() {
            p.fit = fitness(ctx, &p.pos, &rules);
            p.best_fit = p.fit;
            if p.fit < global_best_fit {
                global_best_fit = p.fit;
                global_best_pos = p.pos.clone();
            }
        }

        for iteration in 0..self.cfg.iterations {
            if ctx.halt() {
                break;
            }

            // gravitational pull recomputed each iteration from
            // fitness-weighted masses
            let accel = if self.cfg.gsa {
                let g = self.cfg.gravity
                    * (1.0 - iteration as f64 / self.cfg.iterations.max(1) as f64);
                Some(gravitational_acceleration(&swarm, g))
            } else {
                None
            };

            for (i, p) in swarm.iter_mut().enumerate() {
                for d in 0..self.cfg.depth {
                    let r1 = rng.random::<f64>();
                    let r2 = rng.random::<f64>();
                    let mut v = self.cfg.inertia * p.vel[d]
                        + self.cfg.cognitive * r1 * (p.best_pos[d] - p.pos[d])
                        + self.cfg.social * r2 * (global_best_pos[d] - p.pos[d]);
                    if let Some(a) = &accel {
                        v += rng.random::<f64>() * a[i][d];
                    }
                    p.vel[d] = v.clamp(-vmax, vmax);
                    p.pos[d] = (p.pos[d] + p.vel[d]).clamp(0.0, range - 1.0);
                }
            }

            for p in swarm.iter_mut() {
                p.fit = fitness(ctx, &p.pos, &rules);
                if p.fit < p.best_fit {
                    p.best_fit = p.fit;
                    p.best_pos = p.pos.clone();
                }
                if p.fit < global_best_fit {
                    global_best_fit = p.fit;
                    global_best_pos = p.pos.clone();
                }
            }
        }

        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////

fn decode(pos: &[f64], rules: &[RuleId]) -> Candidate {
    let genes = pos
        .iter()
        .map(|x| {
            let idx = x.round().clamp(0.0, (rules.len() - 1) as f64) as usize;
            rules[idx]
        })
        .collect();
    Candidate::from_genes(genes)
}

fn fitness<S: StateSpace>(ctx: &mut RunContext<'_, S>, pos: &[f64], rules: &[RuleId]) -> f64 {
    let candidate = decode(pos, rules);
    evaluate_candidate(ctx, &candidate)
}

////////////////////////////////////////////////////////////////////////////////

/// Pairwise attraction toward fitter particles. Masses are normalized
/// fitness weights; particles with non-finite fitness carry no mass.
fn gravitational_acceleration(swarm: &[Particle], g: f64) -> Vec<Vec<f64>> {
    let finite: Vec<f64> = swarm.iter().map(|p| p.fit).filter(|f| f.is_finite()).collect();
    let best = finite.iter().cloned().fold(f64::INFINITY, f64::min);
    let worst = finite.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    let masses: Vec<f64> = swarm
        .iter()
        .map(|p| {
            if !p.fit.is_finite() {
                0.0
            } else if worst > best {
                (worst - p.fit) / (worst - best)
            } else {
                1.0
            }
        })
        .collect();
    let total: f64 = masses.iter().sum::<f64>().max(f64::MIN_POSITIVE);
    let masses: Vec<f64> = masses.iter().map(|m| m / total).collect();

    let dims = swarm.first().map(|p| p.pos.len()).unwrap_or(0);
    let mut accel = vec![vec![0.0; dims]; swarm.len()];
    for i in 0..swarm.len() {
        for j in 0..swarm.len() {
            if i == j || masses[j] == 0.0 {
                continue;
            }
            let dist: f64 = swarm[i]
                .pos
                .iter()
                .zip(&swarm[j].pos)
                .map(|(a, b)| (a - b) * (a - b))
                .sum::<f64>()
                .sqrt();
            for d in 0..dims {
                accel[i][d] +=
                    g * masses[j] * (swarm[j].pos[d] - swarm[i].pos[d]) / (dist + f64::EPSILON);
            }
        }
    }
    accel
}
