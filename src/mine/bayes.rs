use std::collections::BTreeSet;

use super::Transaction;

////////////////////////////////////////////////////////////////////////////////

/// Naive Bayes over the rule-applicability bitmap: per rule, the smoothed
/// probability of the rule being present in goal-reaching and in other
/// sampled paths.
#[derive(Clone, Debug)]
pub struct BayesModel {
    prior_goal: f64,
    present_given_goal: Vec<f64>,
    present_given_other: Vec<f64>,
}

impl BayesModel {
    pub fn fit(transactions: &[Transaction], rule_count: usize) -> Self {
        let goals = transactions.iter().filter(|t| t.goal).count();
        let others = transactions.len() - goals;

        let present = |rule: usize, goal: bool| {
            transactions
                .iter()
                .filter(|t| t.goal == goal && t.items.contains(&rule))
                .count()
        };

        // Laplace smoothing keeps unseen rules from zeroing the posterior
        let smooth = |hits: usize, total: usize| (hits + 1) as f64 / (total + 2) as f64;

        Self {
            prior_goal: smooth(goals, transactions.len()),
            present_given_goal: (0..rule_count).map(|r| smooth(present(r, true), goals)).collect(),
            present_given_other: (0..rule_count)
                .map(|r| smooth(present(r, false), others))
                .collect(),
        }
    }

    /// Posterior probability that a state with this enabled-rule set lies
    /// on a goal-reaching path.
    pub fn goal_posterior(&self, enabled: &BTreeSet<usize>) -> f64 {
        let mut log_goal = self.prior_goal.ln();
        let mut log_other = (1.0 - self.prior_goal).ln();
        for rule in 0..self.present_given_goal.len() {
            let (pg, po) = (self.present_given_goal[rule], self.present_given_other[rule]);
            if enabled.contains(&rule) {
                log_goal += pg.ln();
                log_other += po.ln();
            } else {
                log_goal += (1.0 - pg).ln();
                log_other += (1.0 - po).ln();
            }
        }
        let max = log_goal.max(log_other);
        let goal = (log_goal - max).exp();
        let other = (log_other - max).exp();
        goal / (goal + other)
    }
}

////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[usize]) -> BTreeSet<usize> {
        items.iter().copied().collect()
    }

    #[test]
    fn posterior_tracks_goal_correlation() {
        let transactions = vec![
            Transaction {
                items: set(&[0]),
                goal: true,
            },
            Transaction {
                items: set(&[0]),
                goal: true,
            },
            Transaction {
                items: set(&[1]),
                goal: false,
            },
            Transaction {
                items: set(&[1]),
                goal: false,
            },
        ];
        let model = BayesModel::fit(&transactions, 2);
        assert!(model.goal_posterior(&set(&[0])) > 0.5);
        assert!(model.goal_posterior(&set(&[1])) < 0.5);
    }

    ////////////////////////////////////////////////////////////////////////////////

    #[test]
    fn empty_sample_gives_uninformative_posterior() {
        let model = BayesModel::fit(&[], 3);
        let p = model.goal_posterior(&set(&[0, 2]));
        assert!((p - 0.5).abs() < 1e-9);
    }
}
