//! Source-to-ground path search.
//!
//! Reachability alone is not enough to call a component powered: a lamp that
//! hangs off a live branch and is also reachable from a ground branch, where
//! the two branches never meet in a chain, carries no current. The search
//! enumerates simple paths from live entries to ground entries depth-first
//! with backtracking, and a component is powered iff it lies on at least one
//! completed path.

use std::collections::{BTreeMap, BTreeSet};

use tracing::warn;

use super::propagate::EntryMap;
use crate::circuit::ComponentId;

/// Adjacency restricted to components a path may pass through.
pub(crate) type PathGraph = BTreeMap<ComponentId, Vec<ComponentId>>;

#[derive(Debug, Default)]
pub(crate) struct SearchResult {
    /// Union of components on completed paths, including the sources at
    /// either end
    pub powered: BTreeSet<ComponentId>,
    /// Node expansions used
    pub steps: usize,
    /// The step budget ran out before every path was explored
    pub truncated: bool,
}

pub(crate) struct PathSearch<'a> {
    graph: &'a PathGraph,
    ground: &'a EntryMap,
    max_steps: usize,
}

impl<'a> PathSearch<'a> {
    pub fn new(graph: &'a PathGraph, ground: &'a EntryMap, max_steps: usize) -> Self {
        Self {
            graph,
            ground,
            max_steps,
        }
    }

    /// Search from every live entry that is part of the graph.
    pub fn run(&self, live: &EntryMap) -> SearchResult {
        let mut result = SearchResult::default();

        for (&entry, origins) in live {
            if !self.graph.contains_key(&entry) {
                continue;
            }
            if !self.search_from(entry, origins, &mut result) {
                result.truncated = true;
                warn!(
                    steps = result.steps,
                    "path search budget exhausted; power state may be incomplete"
                );
                break;
            }
        }

        result
    }

    /// Returns false when the step budget ran out.
    fn search_from(
        &self,
        entry: ComponentId,
        origins: &BTreeSet<ComponentId>,
        result: &mut SearchResult,
    ) -> bool {
        // Each frame is a node on the current path and the index of the
        // next neighbour to try.
        let mut stack: Vec<(ComponentId, usize)> = Vec::new();
        let mut on_path: BTreeSet<ComponentId> = BTreeSet::new();

        if !self.step(result) {
            return false;
        }
        stack.push((entry, 0));
        on_path.insert(entry);
        self.record_if_grounded(&stack, origins, result);

        while let Some(frame) = stack.last_mut() {
            let (node, next) = *frame;
            let neighbors = self.graph.get(&node).map(Vec::as_slice).unwrap_or(&[]);

            let Some(&candidate) = neighbors.get(next) else {
                stack.pop();
                on_path.remove(&node);
                continue;
            };
            frame.1 += 1;

            if on_path.contains(&candidate) || !self.graph.contains_key(&candidate) {
                continue;
            }
            if !self.step(result) {
                return false;
            }
            stack.push((candidate, 0));
            on_path.insert(candidate);
            self.record_if_grounded(&stack, origins, result);
        }

        true
    }

    fn step(&self, result: &mut SearchResult) -> bool {
        if result.steps >= self.max_steps {
            return false;
        }
        result.steps += 1;
        true
    }

    fn record_if_grounded(
        &self,
        stack: &[(ComponentId, usize)],
        origins: &BTreeSet<ComponentId>,
        result: &mut SearchResult,
    ) {
        let Some(&(tip, _)) = stack.last() else {
            return;
        };
        let Some(owners) = self.ground.get(&tip) else {
            return;
        };
        result.powered.extend(stack.iter().map(|&(id, _)| id));
        result.powered.extend(origins.iter().copied());
        result.powered.extend(owners.iter().copied());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(n: usize) -> ComponentId {
        ComponentId(n)
    }

    fn graph(edges: &[(usize, usize)]) -> PathGraph {
        let mut g = PathGraph::new();
        for &(a, b) in edges {
            g.entry(c(a)).or_default().push(c(b));
            g.entry(c(b)).or_default().push(c(a));
        }
        g
    }

    fn entries(pairs: &[(usize, usize)]) -> EntryMap {
        let mut m = EntryMap::new();
        for &(entry, owner) in pairs {
            m.entry(c(entry)).or_default().insert(c(owner));
        }
        m
    }

    #[test]
    fn test_dead_end_branch_not_powered() {
        // 1 - 2 - 3 with a dead-end spur 2 - 4
        let g = graph(&[(1, 2), (2, 3), (2, 4)]);
        let ground = entries(&[(3, 0)]);
        let result = PathSearch::new(&g, &ground, 1000).run(&entries(&[(1, 0)]));
        assert_eq!(result.powered, BTreeSet::from([c(0), c(1), c(2), c(3)]));
        assert!(!result.truncated);
    }

    #[test]
    fn test_parallel_branches_both_powered() {
        // Diamond 1 -> {2, 3} -> 4
        let g = graph(&[(1, 2), (1, 3), (2, 4), (3, 4)]);
        let ground = entries(&[(4, 9)]);
        let result = PathSearch::new(&g, &ground, 1000).run(&entries(&[(1, 9)]));
        assert!(result.powered.contains(&c(2)));
        assert!(result.powered.contains(&c(3)));
    }

    #[test]
    fn test_disjoint_live_and_ground_paths() {
        let g = graph(&[(1, 2), (3, 4)]);
        let ground = entries(&[(4, 0)]);
        let result = PathSearch::new(&g, &ground, 1000).run(&entries(&[(1, 0)]));
        assert!(result.powered.is_empty());
    }

    #[test]
    fn test_entry_that_is_also_ground() {
        let mut g = PathGraph::new();
        g.insert(c(1), Vec::new());
        let ground = entries(&[(1, 0)]);
        let result = PathSearch::new(&g, &ground, 1000).run(&entries(&[(1, 0)]));
        assert_eq!(result.powered, BTreeSet::from([c(0), c(1)]));
    }

    #[test]
    fn test_budget_truncates() {
        let g = graph(&[(1, 2), (2, 3), (3, 4), (4, 5)]);
        let ground = entries(&[(5, 0)]);
        let result = PathSearch::new(&g, &ground, 3).run(&entries(&[(1, 0)]));
        assert!(result.truncated);
        assert_eq!(result.steps, 3);
        assert!(result.powered.is_empty());
    }
}
