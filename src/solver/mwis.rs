use std::io::Write;

use crate::criteria::OptCriterion;
use crate::error::KepError;
use crate::graph::ConflictGraph;
use crate::graph::ordering::order_vertices;
use crate::graph::reduce::reduce_to_fixed_point;
use crate::pool::Pool;
use crate::score::ScorePacker;
use crate::solver::{SolveParams, SolveStrategy, SolveSummary};

/// The reformulation strategy: score the candidates hierarchically, build the conflict
/// graph, optionally compress twins and renumber, and write the instance for an external
/// maximum-weight-independent-set solver. The selection itself is that solver's job, so
/// no summary comes back.
pub struct GraphExportStrategy;

impl SolveStrategy for GraphExportStrategy {
	fn solve(
		&self, pool: &Pool, criteria: &[Box<dyn OptCriterion>], params: &SolveParams,
		out: &mut dyn Write
	) -> Result<Option<SolveSummary>, KepError> {
		let cycles = pool.find_cycles(params.max_cycle);
		let chains = pool.find_chains(params.max_chain);
		let packer = ScorePacker::new(criteria, params.bit_widths.as_deref())?;

		let mut graph = ConflictGraph::build(pool, &chains, &cycles, criteria, &packer);
		if params.reduce {
			graph = reduce_to_fixed_point(graph);
		}
		let graph = graph.permuted(&order_vertices(&graph, params.ordering));
		graph.write_instance(params.invert_edges, out)?;
		Ok(None)
	}
}
