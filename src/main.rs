mod cli;
mod criteria;
mod error;
mod graph;
mod parser;
mod pool;
mod score;
mod solver;

use clap::Parser;
use cli::{Args, StrategyKind};
use criteria::get_criteria;
use error::KepError;
use parser::parse_pool;
use score::ScorePacker;
use solver::{GraphExportStrategy, IlpStrategy, SolveParams, SolveStrategy};

fn main() {
	let args = Args::parse();
	if let Err(error) = run(&args) {
		eprintln!("{}", error);
		std::process::exit(1);
	}
}

fn parse_bit_widths(raw: &str) -> Result<Vec<u32>, KepError> {
	raw.split(':').map(|width| {
		width.parse::<u32>().map_err(|_| KepError::BitWidthParse(width.to_string()))
	}).collect()
}

fn run(args: &Args) -> Result<(), KepError> {
	let criteria = get_criteria(&args.criteria)?;
	let bit_widths = match &args.bits {
		Some(raw) => Some(parse_bit_widths(raw)?),
		None => None,
	};
	// Surface packing configuration errors before any solving starts
	ScorePacker::new(&criteria, bit_widths.as_deref())?;

	let pool = parse_pool(&args.file);
	eprintln!(
		"Found {} patients, {} paired donors and {} altruists",
		pool.patients.len(), pool.paired_donors.len(), pool.altruists.len()
	);

	let params = SolveParams {
		max_cycle: args.max_cycle,
		max_chain: args.max_chain,
		max_solutions: args.max_solutions,
		ordering: args.ordering,
		reduce: args.reduce,
		invert_edges: args.invert_edges,
		bit_widths,
	};
	let strategy: Box<dyn SolveStrategy> = match args.strategy {
		StrategyKind::Ilp => Box::new(IlpStrategy),
		StrategyKind::Graph => Box::new(GraphExportStrategy),
	};

	let stdout = std::io::stdout();
	let mut out = stdout.lock();
	if let Some(summary) = strategy.solve(&pool, &criteria, &params, &mut out)? {
		println!(
			"Objective value: {} Number of solutions: {} Reached limit: {}",
			summary.best_objective, summary.n_solutions,
			if summary.reached_cap { "TRUE" } else { "FALSE" }
		);
	}
	Ok(())
}
