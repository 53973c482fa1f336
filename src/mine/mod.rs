pub mod apriori;
pub mod bayes;
pub mod eclat;
pub mod fin;
pub mod fpgrowth;

////////////////////////////////////////////////////////////////////////////////

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::config::MiningAlgorithm;

use bayes::BayesModel;

////////////////////////////////////////////////////////////////////////////////

/// One sampled exploration path, reduced to the set of rules applied along
/// it and whether the path reached the goal property.
#[derive(Clone, Debug)]
pub struct Transaction {
    pub items: BTreeSet<usize>,
    pub goal: bool,
}

////////////////////////////////////////////////////////////////////////////////

/// Canonical mining output: sorted itemset -> support count. Keyed by a
/// `BTreeMap` so the result is identical regardless of the algorithm's
/// internal enumeration order.
pub type FrequentItemsets = BTreeMap<Vec<usize>, usize>;

pub fn frequent_itemsets(
    transactions: &[BTreeSet<usize>],
    min_count: usize,
    algorithm: MiningAlgorithm,
) -> FrequentItemsets {
    let min_count = min_count.max(1);
    match algorithm {
        MiningAlgorithm::Apriori => apriori::mine(transactions, min_count),
        MiningAlgorithm::FpGrowth => fpgrowth::mine(transactions, min_count),
        MiningAlgorithm::Eclat => eclat::mine(transactions, min_count),
        MiningAlgorithm::Fin => fin::mine(transactions, min_count),
    }
}

////////////////////////////////////////////////////////////////////////////////

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AssociationRule {
    pub antecedent: Vec<usize>,
    pub consequent: Vec<usize>,
    pub support: f64,
    pub confidence: f64,
}

////////////////////////////////////////////////////////////////////////////////

/// Read-only once built. Consumed as a heuristic bias: states whose enabled
/// rule set matches goal-correlated patterns score higher.
#[derive(Clone, Debug)]
pub enum KnowledgeBase {
    Patterns { rules: Vec<AssociationRule> },
    Bayes(BayesModel),
}

impl KnowledgeBase {
    /// Mines association rules from the goal-reaching transactions (all of
    /// them when no path hit the goal) with the requested algorithm.
    pub fn learn_patterns(
        transactions: &[Transaction],
        algorithm: MiningAlgorithm,
        min_support: f64,
    ) -> Self {
        let goal_sets: Vec<BTreeSet<usize>> = transactions
            .iter()
            .filter(|t| t.goal)
            .map(|t| t.items.clone())
            .collect();
        let sets: Vec<BTreeSet<usize>> = if goal_sets.is_empty() {
            transactions.iter().map(|t| t.items.clone()).collect()
        } else {
            goal_sets
        };

        let n = sets.len().max(1);
        let min_count = ((min_support * n as f64).ceil() as usize).max(1);
        let frequent = frequent_itemsets(&sets, min_count, algorithm);

        let mut rules = Vec::new();
        for (itemset, count) in &frequent {
            if itemset.len() < 2 {
                continue;
            }
            for x in itemset {
                let antecedent: Vec<usize> =
                    itemset.iter().filter(|i| *i != x).copied().collect();
                let base = frequent.get(&antecedent).copied().unwrap_or(*count);
                rules.push(AssociationRule {
                    antecedent,
                    consequent: vec![*x],
                    support: *count as f64 / n as f64,
                    confidence: *count as f64 / base as f64,
                });
            }
        }
        KnowledgeBase::Patterns { rules }
    }

    pub fn learn_bayes(transactions: &[Transaction], rule_count: usize) -> Self {
        KnowledgeBase::Bayes(BayesModel::fit(transactions, rule_count))
    }

    ////////////////////////////////////////////////////////////////////////////////

    /// How strongly `enabled` matches the learned goal-correlated patterns.
    /// Higher is more promising; the scale is strategy-weighted, not
    /// normalized.
    pub fn bias(&self, enabled: &BTreeSet<usize>) -> f64 {
        match self {
            KnowledgeBase::Patterns { rules } => {
                if rules.is_empty() {
                    return 0.0;
                }
                let matched: f64 = rules
                    .iter()
                    .filter(|r| r.antecedent.iter().all(|i| enabled.contains(i)))
                    .map(|r| r.confidence * r.support)
                    .sum();
                matched / rules.len() as f64
            }
            KnowledgeBase::Bayes(model) => model.goal_posterior(enabled),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn set(items: &[usize]) -> BTreeSet<usize> {
        items.iter().copied().collect()
    }

    fn sample_sets() -> Vec<BTreeSet<usize>> {
        vec![
            set(&[0, 1, 2]),
            set(&[0, 1]),
            set(&[0, 2]),
            set(&[1, 2]),
            set(&[0, 1, 2, 3]),
            set(&[3]),
        ]
    }

    ////////////////////////////////////////////////////////////////////////////////

    #[rstest]
    #[case(MiningAlgorithm::Apriori)]
    #[case(MiningAlgorithm::FpGrowth)]
    #[case(MiningAlgorithm::Eclat)]
    #[case(MiningAlgorithm::Fin)]
    fn known_supports(#[case] algorithm: MiningAlgorithm) {
        let frequent = frequent_itemsets(&sample_sets(), 3, algorithm);
        assert_eq!(frequent.get(&vec![0]), Some(&4));
        assert_eq!(frequent.get(&vec![1]), Some(&4));
        assert_eq!(frequent.get(&vec![2]), Some(&4));
        assert_eq!(frequent.get(&vec![0, 1]), Some(&3));
        assert_eq!(frequent.get(&vec![1, 2]), Some(&3));
        // below threshold
        assert_eq!(frequent.get(&vec![3]), None);
        assert_eq!(frequent.get(&vec![0, 1, 2]), None);
    }

    ////////////////////////////////////////////////////////////////////////////////

    #[rstest]
    #[case(MiningAlgorithm::FpGrowth)]
    #[case(MiningAlgorithm::Eclat)]
    #[case(MiningAlgorithm::Fin)]
    fn algorithms_agree_with_apriori(#[case] algorithm: MiningAlgorithm) {
        for min_count in 1..=4 {
            let reference = frequent_itemsets(&sample_sets(), min_count, MiningAlgorithm::Apriori);
            let other = frequent_itemsets(&sample_sets(), min_count, algorithm);
            assert_eq!(reference, other, "min_count = {min_count}");
        }
    }

    ////////////////////////////////////////////////////////////////////////////////

    #[test]
    fn knowledge_base_is_deterministic() {
        let transactions: Vec<Transaction> = sample_sets()
            .into_iter()
            .enumerate()
            .map(|(i, items)| Transaction {
                items,
                goal: i % 2 == 0,
            })
            .collect();

        let a = KnowledgeBase::learn_patterns(&transactions, MiningAlgorithm::Apriori, 0.4);
        let b = KnowledgeBase::learn_patterns(&transactions, MiningAlgorithm::Eclat, 0.4);
        let (KnowledgeBase::Patterns { rules: ra }, KnowledgeBase::Patterns { rules: rb }) =
            (&a, &b)
        else {
            unreachable!()
        };
        assert_eq!(ra.len(), rb.len());
        for (x, y) in ra.iter().zip(rb) {
            assert_eq!(x.antecedent, y.antecedent);
            assert_eq!(x.consequent, y.consequent);
            assert_eq!(x.support, y.support);
            assert_eq!(x.confidence, y.confidence);
        }
    }

    ////////////////////////////////////////////////////////////////////////////////

    #[test]
    fn pattern_bias_prefers_matching_rule_sets() {
        let transactions = vec![
            Transaction {
                items: set(&[0, 1]),
                goal: true,
            },
            Transaction {
                items: set(&[0, 1]),
                goal: true,
            },
            Transaction {
                items: set(&[2]),
                goal: false,
            },
        ];
        let kb = KnowledgeBase::learn_patterns(&transactions, MiningAlgorithm::Apriori, 0.5);
        assert!(kb.bias(&set(&[0, 1])) > kb.bias(&set(&[2])));
    }
}
