use std::collections::{BTreeMap, BTreeSet};

use super::FrequentItemsets;

////////////////////////////////////////////////////////////////////////////////

/// Vertical mining over transaction-id lists, extended depth-first.
pub(crate) fn mine(transactions: &[BTreeSet<usize>], min_count: usize) -> FrequentItemsets {
    let mut tidlists: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (tid, t) in transactions.iter().enumerate() {
        for item in t {
            tidlists.entry(*item).or_default().push(tid);
        }
    }

    let items: Vec<(usize, Vec<usize>)> = tidlists
        .into_iter()
        .filter(|(_, tids)| tids.len() >= min_count)
        .collect();

    let mut result = FrequentItemsets::new();
    extend(&[], &items, min_count, &mut result);
    result
}

////////////////////////////////////////////////////////////////////////////////

fn extend(
    prefix: &[usize],
    items: &[(usize, Vec<usize>)],
    min_count: usize,
    result: &mut FrequentItemsets,
) {
    for (i, (item, tids)) in items.iter().enumerate() {
        let mut itemset = prefix.to_vec();
        itemset.push(*item);
        result.insert(itemset.clone(), tids.len());

        let suffix: Vec<(usize, Vec<usize>)> = items[i + 1..]
            .iter()
            .filter_map(|(other, other_tids)| {
                let joint = intersect(tids, other_tids);
                (joint.len() >= min_count).then_some((*other, joint))
            })
            .collect();
        extend(&itemset, &suffix, min_count, result);
    }
}

fn intersect(a: &[usize], b: &[usize]) -> Vec<usize> {
    let mut out = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}
