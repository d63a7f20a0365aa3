use std::io::Write;

use crate::criteria::OptCriterion;
use crate::error::KepError;
use crate::graph::ordering::VertexOrdering;
use crate::pool::Pool;

mod ilp;
mod mwis;

pub use ilp::IlpStrategy;
pub use mwis::GraphExportStrategy;

/// The parameter set a solve run is configured with.
pub struct SolveParams {
	pub max_cycle: usize,
	pub max_chain: usize,
	pub max_solutions: usize,
	pub ordering: VertexOrdering,
	pub reduce: bool,
	pub invert_edges: bool,
	pub bit_widths: Option<Vec<u32>>,
}

#[derive(Debug, PartialEq)]
pub struct SolveSummary {
	pub best_objective: f64,
	pub n_solutions: usize,

	/// True exactly when the solution cap ended the enumeration, rather than
	/// infeasibility or a worse objective value
	pub reached_cap: bool,
}

/// The contract both solving strategies implement. The direct ILP strategy writes every
/// optimal selection to `out` and returns a summary; the graph-export strategy writes an
/// independent-set instance for an external solver and returns `None`.
pub trait SolveStrategy {
	fn solve(
		&self, pool: &Pool, criteria: &[Box<dyn OptCriterion>], params: &SolveParams,
		out: &mut dyn Write
	) -> Result<Option<SolveSummary>, KepError>;
}
