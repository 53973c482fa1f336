use std::collections::{BTreeMap, BTreeSet};

use super::FrequentItemsets;

////////////////////////////////////////////////////////////////////////////////

struct Node {
    item: usize,
    count: usize,
    parent: usize,
}

/// Prefix-path-compressed transaction tree with a header table per item.
struct Tree {
    nodes: Vec<Node>,
    children: Vec<BTreeMap<usize, usize>>,
    header: BTreeMap<usize, Vec<usize>>,
}

impl Tree {
    fn build(db: &[(Vec<usize>, usize)], order: &BTreeMap<usize, usize>) -> Self {
        let mut tree = Self {
            nodes: vec![Node {
                item: usize::MAX,
                count: 0,
                parent: usize::MAX,
            }],
            children: vec![BTreeMap::new()],
            header: BTreeMap::new(),
        };

        for (items, weight) in db {
            // keep frequent items, most frequent first
            let mut path: Vec<usize> = items
                .iter()
                .filter(|i| order.contains_key(i))
                .copied()
                .collect();
            path.sort_by_key(|i| (usize::MAX - order[i], *i));
            tree.insert(&path, *weight);
        }
        tree
    }

    fn insert(&mut self, path: &[usize], weight: usize) {
        let mut at = 0;
        for item in path {
            at = if let Some(child) = self.children[at].get(item) {
                let child = *child;
                self.nodes[child].count += weight;
                child
            } else {
                let id = self.nodes.len();
                self.nodes.push(Node {
                    item: *item,
                    count: weight,
                    parent: at,
                });
                self.children.push(BTreeMap::new());
                self.children[at].insert(*item, id);
                self.header.entry(*item).or_default().push(id);
                id
            };
        }
    }

    /// Conditional pattern base of one item: every prefix path leading to
    /// it, weighted by the node count.
    fn prefix_paths(&self, item: usize) -> Vec<(Vec<usize>, usize)> {
        let mut base = Vec::new();
        for node in self.header.get(&item).into_iter().flatten() {
            let mut path = Vec::new();
            let mut at = self.nodes[*node].parent;
            while at != 0 {
                path.push(self.nodes[at].item);
                at = self.nodes[at].parent;
            }
            if !path.is_empty() {
                path.reverse();
                base.push((path, self.nodes[*node].count));
            }
        }
        base
    }
}

////////////////////////////////////////////////////////////////////////////////

pub(crate) fn mine(transactions: &[BTreeSet<usize>], min_count: usize) -> FrequentItemsets {
    let db: Vec<(Vec<usize>, usize)> = transactions
        .iter()
        .map(|t| (t.iter().copied().collect(), 1))
        .collect();
    let mut result = FrequentItemsets::new();
    grow(&db, min_count, &[], &mut result);
    result
}

fn grow(
    db: &[(Vec<usize>, usize)],
    min_count: usize,
    suffix: &[usize],
    result: &mut FrequentItemsets,
) {
    let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
    for (items, weight) in db {
        for item in items {
            *counts.entry(*item).or_default() += weight;
        }
    }
    counts.retain(|_, c| *c >= min_count);
    if counts.is_empty() {
        return;
    }

    let tree = Tree::build(db, &counts);

    for (item, count) in &counts {
        let mut itemset = suffix.to_vec();
        itemset.push(*item);
        itemset.sort_unstable();
        result.insert(itemset.clone(), *count);

        let base = tree.prefix_paths(*item);
        if !base.is_empty() {
            grow(&base, min_count, &itemset, result);
        }
    }
}
