use clap::{Parser, ValueEnum};

use crate::graph::ordering::VertexOrdering;

const APP_NAME: &str = env!("CARGO_PKG_NAME");
const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
pub enum StrategyKind {
	/// Solve directly and enumerate every optimal solution
	Ilp,

	/// Export a maximum-weight-independent-set instance for an external solver
	Graph,
}

#[derive(Parser)]
#[command(name = APP_NAME)]
#[command(version = VERSION)]
#[command(author = AUTHOR)]
#[command(about = "Hierarchical kidney-exchange optimisation", long_about = None)]
pub struct Args {
	/// The JSON file containing the exchange pool
	#[arg(short, long)]
	pub file: String,

	/// A colon-separated list of optimality criteria, such as effective:size:3way:backarc:weight
	#[arg(short, long)]
	pub criteria: String,

	/// Maximum cycle length
	#[arg(short = 'e', long = "cycle")]
	pub max_cycle: usize,

	/// Maximum chain length
	#[arg(short = 'n', long = "chain")]
	pub max_chain: usize,

	/// Stop after finding this number of solutions
	#[arg(short = 'm', long = "max", default_value_t = 100)]
	pub max_solutions: usize,

	/// The solving strategy
	#[arg(short, long, value_enum, default_value = "ilp")]
	pub strategy: StrategyKind,

	/// Vertex numbering applied before the graph export
	#[arg(short, long, value_enum, default_value = "identity")]
	pub ordering: VertexOrdering,

	/// Compress twin vertices before the graph export
	#[arg(short, long)]
	pub reduce: bool,

	/// Export the complement of the conflict graph
	#[arg(short, long)]
	pub invert_edges: bool,

	/// A colon-separated list of per-criterion bit widths, such as 10:10:10:10:32
	#[arg(short, long)]
	pub bits: Option<String>,
}
