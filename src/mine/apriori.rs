use std::collections::{BTreeMap, BTreeSet};

use super::FrequentItemsets;

////////////////////////////////////////////////////////////////////////////////

/// Level-wise candidate generation with subset pruning.
pub(crate) fn mine(transactions: &[BTreeSet<usize>], min_count: usize) -> FrequentItemsets {
    let mut result = FrequentItemsets::new();

    // frequent 1-itemsets
    let mut singles: BTreeMap<usize, usize> = BTreeMap::new();
    for t in transactions {
        for item in t {
            *singles.entry(*item).or_default() += 1;
        }
    }
    let mut level: Vec<Vec<usize>> = singles
        .iter()
        .filter(|(_, c)| **c >= min_count)
        .map(|(item, _)| vec![*item])
        .collect();
    for itemset in &level {
        result.insert(itemset.clone(), singles[&itemset[0]]);
    }

    while !level.is_empty() {
        let candidates = join(&level, &result);

        let mut counts: BTreeMap<Vec<usize>, usize> = BTreeMap::new();
        for t in transactions {
            for c in &candidates {
                if c.iter().all(|i| t.contains(i)) {
                    *counts.entry(c.clone()).or_default() += 1;
                }
            }
        }

        level = counts
            .iter()
            .filter(|(_, c)| **c >= min_count)
            .map(|(itemset, _)| itemset.clone())
            .collect();
        for itemset in &level {
            result.insert(itemset.clone(), counts[itemset]);
        }
    }

    result
}

////////////////////////////////////////////////////////////////////////////////

/// Joins k-itemsets sharing a (k-1)-prefix, pruning candidates with an
/// infrequent subset.
fn join(level: &[Vec<usize>], frequent: &FrequentItemsets) -> Vec<Vec<usize>> {
    let mut candidates = Vec::new();
    for i in 0..level.len() {
        for j in (i + 1)..level.len() {
            let a = &level[i];
            let b = &level[j];
            if a[..a.len() - 1] != b[..b.len() - 1] {
                continue;
            }
            let mut c = a.clone();
            c.push(*b.last().unwrap());
            c.sort_unstable();
            if all_subsets_frequent(&c, frequent) {
                candidates.push(c);
            }
        }
    }
    candidates
}

fn all_subsets_frequent(candidate: &[usize], frequent: &FrequentItemsets) -> bool {
    (0..candidate.len()).all(|skip| {
        let subset: Vec<usize> = candidate
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != skip)
            .map(|(_, item)| *item)
            .collect();
        frequent.contains_key(&subset)
    })
}
