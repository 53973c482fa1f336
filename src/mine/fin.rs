use std::collections::{BTreeMap, BTreeSet};

use super::FrequentItemsets;

////////////////////////////////////////////////////////////////////////////////

/// Set-enumeration mining over difference sets: each extension stores the
/// transactions lost relative to its prefix instead of the full id list,
/// which keeps the per-node sets small on dense data.
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
    for (i, (item, tids)) in items.iter().enumerate() {
        result.insert(vec![*item], tids.len());

        // first level: diffset of {a, b} relative to {a}
        let children: Vec<(usize, Vec<usize>, usize)> = items[i + 1..]
            .iter()
            .filter_map(|(other, other_tids)| {
                let diff = difference(tids, other_tids);
                let support = tids.len() - diff.len();
                (support >= min_count).then_some((*other, diff, support))
            })
            .collect();
        extend(&[*item], &children, min_count, &mut result);
    }
    result
}

////////////////////////////////////////////////////////////////////////////////

fn extend(
    prefix: &[usize],
    nodes: &[(usize, Vec<usize>, usize)],
    min_count: usize,
    result: &mut FrequentItemsets,
) {
    for (i, (item, diff, support)) in nodes.iter().enumerate() {
        let mut itemset = prefix.to_vec();
        itemset.push(*item);
        result.insert(itemset.clone(), *support);

        // diffset of prefix+item+other = diffset(other) \ diffset(item)
        let children: Vec<(usize, Vec<usize>, usize)> = nodes[i + 1..]
            .iter()
            .filter_map(|(other, other_diff, _)| {
                let next_diff = difference(other_diff, diff);
                let next_support = support - next_diff.len();
                (next_support >= min_count).then_some((*other, next_diff, next_support))
            })
            .collect();
        extend(&itemset, &children, min_count, result);
    }
}

/// `a \ b` for sorted id lists.
fn difference(a: &[usize], b: &[usize]) -> Vec<usize> {
    let mut out = Vec::new();
    let mut j = 0;
    for x in a {
        while j < b.len() && b[j] < *x {
            j += 1;
        }
        if j >= b.len() || b[j] != *x {
            out.push(*x);
        }
    }
    out
}
