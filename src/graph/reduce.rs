use crate::graph::ConflictGraph;

/// A set of twin vertices. Twins are adjacent and agree with each other on every other
/// vertex, which makes them interchangeable for solution purposes except for their
/// score: only the best-scoring member needs to survive.
#[derive(Debug, Eq, PartialEq)]
pub struct NodeEquivClass {
	pub members: Vec<usize>,
	pub best: usize,
}

impl NodeEquivClass {
	fn new(i: usize, j: usize, scores: &[u128]) -> NodeEquivClass {
		let best = if scores[j] > scores[i] { j } else { i };
		NodeEquivClass { members: vec![i, j], best }
	}

	fn add(&mut self, vertex: usize, scores: &[u128]) {
		self.members.push(vertex);
		if scores[vertex] > scores[self.best] {
			self.best = vertex;
		}
	}
}

fn are_twins(graph: &ConflictGraph, i: usize, j: usize) -> bool {
	(0 .. graph.n_vertices()).all(|k| {
		k == i || k == j || graph.adjacency[i][k] == graph.adjacency[j][k]
	})
}

/// One full pairwise scan, unioning adjacent twins into equivalence classes. Twin-ness
/// with identical external neighborhoods is transitive, so the union never mixes
/// non-twins into one class.
pub fn twin_classes(graph: &ConflictGraph) -> Vec<NodeEquivClass> {
	let n = graph.n_vertices();
	let mut class_of: Vec<Option<usize>> = vec![None; n];
	let mut classes: Vec<NodeEquivClass> = Vec::new();

	for i in 0 .. n {
		for j in i + 1 .. n {
			if !graph.adjacency[i][j] || !are_twins(graph, i, j) {
				continue;
			}
			match (class_of[i], class_of[j]) {
				(None, None) => {
					class_of[i] = Some(classes.len());
					class_of[j] = Some(classes.len());
					classes.push(NodeEquivClass::new(i, j, &graph.scores));
				}
				(Some(class), None) => {
					classes[class].add(j, &graph.scores);
					class_of[j] = Some(class);
				}
				(None, Some(class)) => {
					classes[class].add(i, &graph.scores);
					class_of[i] = Some(class);
				}
				(Some(target), Some(source)) if target != source => {
					let members = std::mem::take(&mut classes[source].members);
					for &vertex in &members {
						class_of[vertex] = Some(target);
					}
					for vertex in members {
						classes[target].add(vertex, &graph.scores);
					}
				}
				_ => {}
			}
		}
	}

	classes.retain(|class| !class.members.is_empty());
	classes
}

/// Removes all twins but each class's best-scoring member (ties keep the lowest index)
/// and rebuilds the adjacency matrix, score array and label array restricted to the kept
/// vertices. Returns `None` when the graph has no twins to remove.
pub fn reduce_once(graph: &ConflictGraph) -> Option<ConflictGraph> {
	let n = graph.n_vertices();
	let classes = twin_classes(graph);

	let mut dropped = vec![false; n];
	for class in &classes {
		for &vertex in &class.members {
			dropped[vertex] = vertex != class.best;
		}
	}
	let keep: Vec<usize> = (0 .. n).filter(|&vertex| !dropped[vertex]).collect();
	if keep.len() == n {
		return None;
	}

	let mut adjacency = vec![vec![false; keep.len()]; keep.len()];
	for (a, &i) in keep.iter().enumerate() {
		for (b, &j) in keep.iter().enumerate() {
			adjacency[a][b] = graph.adjacency[i][j];
		}
	}
	Some(ConflictGraph {
		adjacency,
		scores: keep.iter().map(|&vertex| graph.scores[vertex]).collect(),
		labels: keep.iter().map(|&vertex| graph.labels[vertex].clone()).collect(),
	})
}

/// Runs twin compression to a fixed point: removals can expose new twins, so the scan
/// repeats until the graph stops shrinking. Rerunning on the result changes nothing.
pub fn reduce_to_fixed_point(mut graph: ConflictGraph) -> ConflictGraph {
	while let Some(smaller) = reduce_once(&graph) {
		graph = smaller;
	}
	graph
}

#[cfg(test)]
mod tests {
	use crate::criteria::get_criteria;
	use crate::pool::Pool;
	use crate::score::ScorePacker;
	use super::*;

	fn graph(adjacency: Vec<Vec<bool>>, scores: Vec<u128>) -> ConflictGraph {
		let labels = (0 .. scores.len()).map(|vertex| format!("vertex {}", vertex)).collect();
		ConflictGraph { adjacency, scores, labels }
	}

	fn triangle(scores: Vec<u128>) -> ConflictGraph {
		graph(vec![
			vec![false, true, true],
			vec![true, false, true],
			vec![true, true, false],
		], scores)
	}

	#[test]
	fn test_triangle_collapses_to_best() {
		let reduced = reduce_to_fixed_point(triangle(vec![5, 9, 7]));
		assert_eq!(reduced.n_vertices(), 1);
		assert_eq!(reduced.scores, vec![9]);
		assert_eq!(reduced.labels, vec!["vertex 1"]);
		assert_eq!(reduced.n_edges(), 0);
	}

	#[test]
	fn test_score_tie_keeps_lowest_index() {
		let reduced = reduce_to_fixed_point(triangle(vec![5, 5, 5]));
		assert_eq!(reduced.labels, vec!["vertex 0"]);
	}

	#[test]
	fn test_triangle_classes() {
		let classes = twin_classes(&triangle(vec![5, 9, 7]));
		assert_eq!(classes, vec![NodeEquivClass { members: vec![0, 1, 2], best: 1 }]);
	}

	#[test]
	fn test_path_has_no_twins() {
		// 0 - 1 - 2: the endpoints disagree about each other's neighbor
		let path = graph(vec![
			vec![false, true, false],
			vec![true, false, true],
			vec![false, true, false],
		], vec![1, 2, 3]);
		assert!(twin_classes(&path).is_empty());
		assert_eq!(reduce_once(&path), None);
	}

	#[test]
	fn test_non_adjacent_lookalikes_are_not_twins() {
		// 0 and 2 have identical neighborhoods but are not adjacent: both can be in an
		// independent set together, so neither may be removed
		let square = graph(vec![
			vec![false, true, false, true],
			vec![true, false, true, false],
			vec![false, true, false, true],
			vec![true, false, true, false],
		], vec![1, 2, 3, 4]);
		assert!(twin_classes(&square).is_empty());
	}

	#[test]
	fn test_fixed_point_is_idempotent() {
		let reduced = reduce_to_fixed_point(triangle(vec![5, 9, 7]));
		assert_eq!(reduce_once(&reduced), None);
		assert_eq!(reduce_to_fixed_point(reduced.clone()), reduced);
	}

	#[test]
	fn test_two_classes_reduce_in_one_pass() {
		// Two disconnected twin pairs: 0-1 and 2-3
		let pairs = graph(vec![
			vec![false, true, false, false],
			vec![true, false, false, false],
			vec![false, false, false, true],
			vec![false, false, true, false],
		], vec![5, 9, 7, 1]);
		assert_eq!(twin_classes(&pairs).len(), 2);
		let reduced = reduce_once(&pairs).unwrap();
		assert_eq!(reduced.n_vertices(), 2);
		assert_eq!(reduced.scores, vec![9, 7]);
		assert_eq!(reduced.n_edges(), 0);
	}

	#[test]
	fn test_bidirectional_ring_reduces_to_one_vertex() {
		let mut pool = Pool::new();
		for id in 1 ..= 3 {
			pool.add_patient(id);
			pool.add_paired_donor(id);
		}
		for i in 0 .. 3usize {
			pool.associate_patient_with_donor(i, i);
			pool.add_donor_edge((i + 2) % 3, i, 100.0);
			pool.add_donor_edge(i, (i + 2) % 3, 100.0);
		}
		let criteria = get_criteria("effective").unwrap();
		let packer = ScorePacker::new(&criteria, None).unwrap();
		let cycles = pool.find_cycles(3);
		let graph = ConflictGraph::build(&pool, &[], &cycles, &criteria, &packer);

		// All five cycles pairwise share a pair, and every vertex sees every other, so
		// the whole graph is one twin class; the 3-way cycle scores highest
		assert_eq!(graph.n_vertices(), 5);
		let reduced = reduce_to_fixed_point(graph);
		assert_eq!(reduced.n_vertices(), 1);
		assert_eq!(reduced.scores, vec![3]);
	}
}
