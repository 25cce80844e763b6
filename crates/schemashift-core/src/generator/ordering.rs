//! Pure resolution helpers: priority ranking and cross-type ordering.
//!
//! Nothing here touches the registry, so both halves can be tested with
//! plain values.

use super::Priority;
use crate::error::{Error, Result};
use crate::structure::ObjectType;

/// Drop non-applicable candidates and sort the rest by descending priority.
///
/// The sort is stable: candidates with equal priority keep their input
/// (registration) order.
pub fn rank_by_priority<T>(candidates: impl IntoIterator<Item = (Priority, T)>) -> Vec<T> {
    let mut ranked: Vec<(Priority, T)> = candidates
        .into_iter()
        .filter(|(priority, _)| priority.applies())
        .collect();
    ranked.sort_by(|a, b| b.0.cmp(&a.0));
    ranked.into_iter().map(|(_, candidate)| candidate).collect()
}

/// Order object types so that every run-after/run-before declaration holds.
///
/// `run_after(t)` lists types that must come before `t`; `run_before(t)`
/// lists types that must come after it. Declarations naming types outside
/// `types` are ignored. When several types are free at once the one listed
/// first in `types` wins, so the result is deterministic.
pub fn order_object_types<A, B>(
    types: &[ObjectType],
    run_after: A,
    run_before: B,
) -> Result<Vec<ObjectType>>
where
    A: Fn(&ObjectType) -> Vec<ObjectType>,
    B: Fn(&ObjectType) -> Vec<ObjectType>,
{
    let mut nodes: Vec<ObjectType> = Vec::with_capacity(types.len());
    for object_type in types {
        if !nodes.contains(object_type) {
            nodes.push(object_type.clone());
        }
    }

    let index_of = |t: &ObjectType| nodes.iter().position(|n| n == t);

    // edges[i] holds the nodes that must follow node i
    let mut edges: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    let mut in_degree = vec![0usize; nodes.len()];

    let mut add_edge = |from: usize, to: usize, edges: &mut Vec<Vec<usize>>| {
        if from != to && !edges[from].contains(&to) {
            edges[from].push(to);
            in_degree[to] += 1;
        }
    };

    for (i, node) in nodes.iter().enumerate() {
        for earlier in run_after(node) {
            if let Some(j) = index_of(&earlier) {
                add_edge(j, i, &mut edges);
            }
        }
        for later in run_before(node) {
            if let Some(j) = index_of(&later) {
                add_edge(i, j, &mut edges);
            }
        }
    }

    let mut done = vec![false; nodes.len()];
    let mut ordered = Vec::with_capacity(nodes.len());

    while ordered.len() < nodes.len() {
        let next = (0..nodes.len()).find(|&i| !done[i] && in_degree[i] == 0);
        let Some(next) = next else {
            let remaining = nodes
                .iter()
                .zip(&done)
                .filter(|(_, done)| !**done)
                .map(|(n, _)| n.to_string())
                .collect();
            return Err(Error::CyclicTypeOrder(remaining));
        };

        done[next] = true;
        for &follower in &edges[next] {
            in_degree[follower] -= 1;
        }
        ordered.push(nodes[next].clone());
    }

    Ok(ordered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_filters_and_sorts() {
        let ranked = rank_by_priority(vec![
            (Priority::DEFAULT, "default"),
            (Priority::NONE, "none"),
            (Priority::ADDITIONAL, "additional"),
            (Priority::DATABASE, "database"),
        ]);
        assert_eq!(ranked, vec!["additional", "database", "default"]);
    }

    #[test]
    fn test_rank_is_stable_for_ties() {
        let ranked = rank_by_priority(vec![
            (Priority::DEFAULT, "first"),
            (Priority::DEFAULT, "second"),
            (Priority::DEFAULT, "third"),
        ]);
        assert_eq!(ranked, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_rank_all_none_is_empty() {
        let ranked: Vec<&str> = rank_by_priority(vec![(Priority::NONE, "a"), (Priority(0), "b")]);
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_order_respects_run_after() {
        // foreign keys after tables and columns, columns after tables
        let types = vec![ObjectType::ForeignKey, ObjectType::Column, ObjectType::Table];
        let ordered = order_object_types(
            &types,
            |t| match t {
                ObjectType::ForeignKey => vec![ObjectType::Table, ObjectType::Column],
                ObjectType::Column => vec![ObjectType::Table],
                _ => vec![],
            },
            |_| vec![],
        )
        .unwrap();

        assert_eq!(
            ordered,
            vec![ObjectType::Table, ObjectType::Column, ObjectType::ForeignKey]
        );
    }

    #[test]
    fn test_order_respects_run_before() {
        let types = vec![ObjectType::Index, ObjectType::Column];
        let ordered = order_object_types(
            &types,
            |_| vec![],
            |t| match t {
                ObjectType::Column => vec![ObjectType::Index],
                _ => vec![],
            },
        )
        .unwrap();

        assert_eq!(ordered, vec![ObjectType::Column, ObjectType::Index]);
    }

    #[test]
    fn test_order_keeps_input_order_without_constraints() {
        let types = vec![ObjectType::Sequence, ObjectType::View, ObjectType::Sequence];
        let ordered = order_object_types(&types, |_| vec![], |_| vec![]).unwrap();
        assert_eq!(ordered, vec![ObjectType::Sequence, ObjectType::View]);
    }

    #[test]
    fn test_order_ignores_unknown_types() {
        let types = vec![ObjectType::Column];
        let ordered =
            order_object_types(&types, |_| vec![ObjectType::Table], |_| vec![]).unwrap();
        assert_eq!(ordered, vec![ObjectType::Column]);
    }

    #[test]
    fn test_order_detects_cycle() {
        let types = vec![ObjectType::Table, ObjectType::Column];
        let err = order_object_types(
            &types,
            |t| match t {
                ObjectType::Table => vec![ObjectType::Column],
                ObjectType::Column => vec![ObjectType::Table],
                _ => vec![],
            },
            |_| vec![],
        )
        .unwrap_err();

        assert!(matches!(err, Error::CyclicTypeOrder(ref names) if names.len() == 2));
    }
}
