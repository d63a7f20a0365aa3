use std::io::Write;

use crate::criteria::OptCriterion;
use crate::pool::{Chain, Cycle, Pool};
use crate::score::ScorePacker;

pub mod ordering;
pub mod reduce;

/// The conflict graph over candidate nodes. Vertices are every chain, every cycle, and
/// one unused option per altruist, in that order. Two vertices are adjacent when their
/// candidates share a participant, so selecting both would use somebody twice: a
/// maximum-weight independent set over this graph is exactly an optimal conflict-free
/// selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictGraph {
	pub adjacency: Vec<Vec<bool>>,
	pub scores: Vec<u128>,
	pub labels: Vec<String>,
}

fn add_clique(adjacency: &mut [Vec<bool>], nodes: &[usize]) {
	for i in 0 .. nodes.len().saturating_sub(1) {
		for j in i + 1 .. nodes.len() {
			adjacency[nodes[i]][nodes[j]] = true;
			adjacency[nodes[j]][nodes[i]] = true;
		}
	}
}

impl ConflictGraph {
	/// Builds the conflict graph: for every participant (patient, paired donor,
	/// altruist), the candidate vertices referencing it form a clique, and the graph is
	/// the union of all those cliques. Vertex weights are the packed hierarchical scores.
	pub fn build(
		pool: &Pool, chains: &[Chain], cycles: &[Cycle],
		criteria: &[Box<dyn OptCriterion>], packer: &ScorePacker
	) -> ConflictGraph {
		let num_nodes = chains.len() + cycles.len() + pool.altruists.len();
		let mut patient_nodes = vec![Vec::new(); pool.patients.len()];
		let mut donor_nodes = vec![Vec::new(); pool.paired_donors.len()];
		let mut altruist_nodes = vec![Vec::new(); pool.altruists.len()];
		let mut scores = Vec::with_capacity(num_nodes);
		let mut labels = Vec::with_capacity(num_nodes);

		for (node, chain) in chains.iter().enumerate() {
			for &pair in &chain.pairs {
				patient_nodes[pool.pairs[pair].patient].push(node);
				donor_nodes[pool.pairs[pair].donor].push(node);
			}
			altruist_nodes[chain.altruist].push(node);
			scores.push(packer.pack_chain(criteria, chain, pool));
			labels.push(chain.describe(pool));
		}

		for (offset, cycle) in cycles.iter().enumerate() {
			let node = chains.len() + offset;
			for &pair in &cycle.pairs {
				patient_nodes[pool.pairs[pair].patient].push(node);
				donor_nodes[pool.pairs[pair].donor].push(node);
			}
			scores.push(packer.pack_cycle(criteria, cycle, pool));
			labels.push(cycle.describe(pool));
		}

		for (offset, altruist) in pool.altruists.iter().enumerate() {
			let node = chains.len() + cycles.len() + offset;
			altruist_nodes[offset].push(node);
			scores.push(packer.pack_altruist(criteria, altruist));
			labels.push(altruist.describe_unused());
		}

		let mut adjacency = vec![vec![false; num_nodes]; num_nodes];
		for table in [&patient_nodes, &donor_nodes, &altruist_nodes] {
			for nodes in table {
				add_clique(&mut adjacency, nodes);
			}
		}

		ConflictGraph { adjacency, scores, labels }
	}

	pub fn n_vertices(&self) -> usize {
		self.scores.len()
	}

	pub fn degree(&self, vertex: usize) -> usize {
		self.adjacency[vertex].iter().filter(|&&adjacent| adjacent).count()
	}

	pub fn n_edges(&self) -> usize {
		let mut count = 0;
		for i in 0 .. self.n_vertices() {
			for j in i + 1 .. self.n_vertices() {
				if self.adjacency[i][j] {
					count += 1;
				}
			}
		}
		count
	}

	/// Relabels the vertices: new vertex `v` is old vertex `permutation[v]`. Only the
	/// numbering changes; the adjacency structure is carried along unchanged.
	pub fn permuted(&self, permutation: &[usize]) -> ConflictGraph {
		let n = self.n_vertices();
		debug_assert_eq!(permutation.len(), n);
		let mut adjacency = vec![vec![false; n]; n];
		for a in 0 .. n {
			for b in 0 .. n {
				adjacency[a][b] = self.adjacency[permutation[a]][permutation[b]];
			}
		}
		ConflictGraph {
			adjacency,
			scores: permutation.iter().map(|&v| self.scores[v]).collect(),
			labels: permutation.iter().map(|&v| self.labels[v].clone()).collect(),
		}
	}

	/// Writes the line-oriented instance an external maximum-weight-independent-set
	/// solver consumes: a comment line per vertex, a problem line with vertex and edge
	/// counts, an edge line per adjacent pair, and a weight line per vertex carrying its
	/// packed score. Vertices are printed 1-based. With `invert`, the complement graph is
	/// written instead, for solvers expecting the complementary formulation.
	pub fn write_instance(&self, invert: bool, out: &mut dyn Write) -> std::io::Result<()> {
		let n = self.n_vertices();
		for (vertex, label) in self.labels.iter().enumerate() {
			writeln!(out, "c {} {}", vertex + 1, label)?;
		}
		let mut edges = Vec::new();
		for i in 0 .. n {
			for j in i + 1 .. n {
				if self.adjacency[i][j] != invert {
					edges.push((i, j));
				}
			}
		}
		writeln!(out, "p edge {} {}", n, edges.len())?;
		for (i, j) in edges {
			writeln!(out, "e {} {}", i + 1, j + 1)?;
		}
		for (vertex, score) in self.scores.iter().enumerate() {
			writeln!(out, "n {} {}", vertex + 1, score)?;
		}
		Ok(())
	}
}
