use clap::ValueEnum;
use rand::seq::SliceRandom;
use std::cmp::Reverse;

use crate::graph::ConflictGraph;

/// How to renumber the vertices before exporting the graph. A pure relabeling: the
/// adjacency structure never changes, but a good numbering can help a downstream
/// solver's own heuristics.
#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
pub enum VertexOrdering {
	Identity,
	Random,
	ScoreAsc,
	ScoreDesc,
	DegreeAsc,
	DegreeDesc,
}

/// Computes the permutation for `ordering`: entry `v` is the old vertex that becomes
/// vertex `v`. Apply it with `ConflictGraph::permuted`.
pub fn order_vertices(graph: &ConflictGraph, ordering: VertexOrdering) -> Vec<usize> {
	let mut permutation: Vec<usize> = (0 .. graph.n_vertices()).collect();
	match ordering {
		VertexOrdering::Identity => {}
		VertexOrdering::Random => {
			let mut rng = rand::rng();
			permutation.shuffle(&mut rng);
		}
		VertexOrdering::ScoreAsc => permutation.sort_by_key(|&vertex| graph.scores[vertex]),
		VertexOrdering::ScoreDesc => permutation.sort_by_key(|&vertex| Reverse(graph.scores[vertex])),
		VertexOrdering::DegreeAsc => permutation.sort_by_key(|&vertex| graph.degree(vertex)),
		VertexOrdering::DegreeDesc => permutation.sort_by_key(|&vertex| Reverse(graph.degree(vertex))),
	}
	permutation
}

#[cfg(test)]
mod tests {
	use crate::graph::ConflictGraph;
	use super::*;

	fn star_graph() -> ConflictGraph {
		// Vertex 2 conflicts with everything else
		let mut adjacency = vec![vec![false; 4]; 4];
		for other in [0, 1, 3] {
			adjacency[2][other] = true;
			adjacency[other][2] = true;
		}
		ConflictGraph {
			adjacency,
			scores: vec![7, 2, 9, 4],
			labels: (0 .. 4).map(|vertex| format!("vertex {}", vertex)).collect(),
		}
	}

	fn degree_multiset(graph: &ConflictGraph) -> Vec<usize> {
		let mut degrees: Vec<usize> = (0 .. graph.n_vertices()).map(|v| graph.degree(v)).collect();
		degrees.sort();
		degrees
	}

	#[test]
	fn test_identity() {
		let graph = star_graph();
		let permutation = order_vertices(&graph, VertexOrdering::Identity);
		assert_eq!(permutation, vec![0, 1, 2, 3]);
		assert_eq!(graph.permuted(&permutation), graph);
	}

	#[test]
	fn test_score_orderings() {
		let graph = star_graph();
		assert_eq!(order_vertices(&graph, VertexOrdering::ScoreAsc), vec![1, 3, 0, 2]);
		assert_eq!(order_vertices(&graph, VertexOrdering::ScoreDesc), vec![2, 0, 3, 1]);

		let relabeled = graph.permuted(&order_vertices(&graph, VertexOrdering::ScoreDesc));
		assert_eq!(relabeled.scores, vec![9, 7, 4, 2]);
		assert_eq!(relabeled.n_edges(), graph.n_edges());
	}

	#[test]
	fn test_degree_orderings() {
		let graph = star_graph();
		// The hub must come last ascending and first descending
		assert_eq!(*order_vertices(&graph, VertexOrdering::DegreeAsc).last().unwrap(), 2);
		assert_eq!(order_vertices(&graph, VertexOrdering::DegreeDesc)[0], 2);
	}

	#[test]
	fn test_shuffle_preserves_adjacency_semantics() {
		let graph = star_graph();
		for _attempt in 0 .. 20 {
			let permutation = order_vertices(&graph, VertexOrdering::Random);
			let mut sorted = permutation.clone();
			sorted.sort();
			assert_eq!(sorted, vec![0, 1, 2, 3]);

			let relabeled = graph.permuted(&permutation);
			assert_eq!(relabeled.n_edges(), graph.n_edges());
			assert_eq!(degree_multiset(&relabeled), degree_multiset(&graph));
		}
	}
}
