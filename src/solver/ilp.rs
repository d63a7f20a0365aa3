use coin_cbc::{Col, Model, Sense as ObjSense, Solution};
use std::io::Write;

use crate::criteria::{OptCriterion, Sense};
use crate::error::KepError;
use crate::pool::{Chain, Cycle, Pool};
use crate::solver::{SolveParams, SolveStrategy, SolveSummary};

const EPSILON: f64 = 1e-7;

/// One binary decision column per chain, per cycle, and per altruist. An altruist's own
/// column means "explicitly unused".
struct CandidateCols {
	chains: Vec<Col>,
	cycles: Vec<Col>,
	unused_altruists: Vec<Col>,
}

impl CandidateCols {
	fn selected(&self, solution: &Solution) -> SelectedCandidates {
		let picked = |cols: &[Col]| -> Vec<usize> {
			cols.iter().enumerate()
				.filter(|&(_, &col)| solution.col(col) > 0.5)
				.map(|(index, _)| index)
				.collect()
		};
		SelectedCandidates {
			chains: picked(&self.chains),
			cycles: picked(&self.cycles),
			unused_altruists: picked(&self.unused_altruists),
		}
	}
}

struct SelectedCandidates {
	chains: Vec<usize>,
	cycles: Vec<usize>,
	unused_altruists: Vec<usize>,
}

impl SelectedCandidates {
	fn len(&self) -> usize {
		self.chains.len() + self.cycles.len() + self.unused_altruists.len()
	}
}

/// The direct strategy: model the selection problem as an integer program, solve it
/// criterion by criterion in priority order, then enumerate every optimal solution under
/// the final criterion.
pub struct IlpStrategy;

impl IlpStrategy {
	/// Builds the model: columns for every candidate, at-most-once rows for shared
	/// participants, and an exactly-one row per altruist. The participant-to-columns
	/// side tables live here; pool entities are never touched, so one pool can back any
	/// number of solver runs.
	fn build_model(pool: &Pool, chains: &[Chain], cycles: &[Cycle]) -> (Model, CandidateCols) {
		let mut model = Model::default();
		model.set_parameter("loglevel", "0");

		let cols = CandidateCols {
			chains: chains.iter().map(|_| model.add_binary()).collect(),
			cycles: cycles.iter().map(|_| model.add_binary()).collect(),
			unused_altruists: pool.altruists.iter().map(|_| model.add_binary()).collect(),
		};

		let mut patient_cols: Vec<Vec<Col>> = vec![Vec::new(); pool.patients.len()];
		let mut donor_cols: Vec<Vec<Col>> = vec![Vec::new(); pool.paired_donors.len()];
		let mut altruist_cols: Vec<Vec<Col>> = vec![Vec::new(); pool.altruists.len()];

		let record_pairs = |pairs: &[usize], col: Col, patient_cols: &mut Vec<Vec<Col>>, donor_cols: &mut Vec<Vec<Col>>| {
			for &pair in pairs {
				let pair = pool.pairs[pair];
				patient_cols[pair.patient].push(col);
				// A donor backing a single patient is already covered by that patient's row
				if pool.paired_donors[pair.donor].paired_patients.len() > 1 {
					donor_cols[pair.donor].push(col);
				}
			}
		};
		for (chain, &col) in chains.iter().zip(&cols.chains) {
			record_pairs(&chain.pairs, col, &mut patient_cols, &mut donor_cols);
			altruist_cols[chain.altruist].push(col);
		}
		for (cycle, &col) in cycles.iter().zip(&cols.cycles) {
			record_pairs(&cycle.pairs, col, &mut patient_cols, &mut donor_cols);
		}
		for (altruist, &col) in pool.altruists.iter().zip(&cols.unused_altruists) {
			altruist_cols[altruist.get_index()].push(col);
		}

		for referencing in patient_cols.iter().chain(&donor_cols) {
			if referencing.len() > 1 {
				let row = model.add_row();
				model.set_row_upper(row, 1.0);
				for &col in referencing {
					model.set_weight(row, col, 1.0);
				}
			}
		}
		// Every altruist starts a selected chain or is explicitly unused
		for referencing in &altruist_cols {
			let row = model.add_row();
			model.set_row_equal(row, 1.0);
			for &col in referencing {
				model.set_weight(row, col, 1.0);
			}
		}

		(model, cols)
	}

	fn set_objective(
		model: &mut Model, criterion: &dyn OptCriterion,
		pool: &Pool, chains: &[Chain], cycles: &[Cycle], cols: &CandidateCols
	) {
		for (chain, &col) in chains.iter().zip(&cols.chains) {
			model.set_obj_coeff(col, criterion.chain_val(chain, pool));
		}
		for (cycle, &col) in cycles.iter().zip(&cols.cycles) {
			model.set_obj_coeff(col, criterion.cycle_val(cycle, pool));
		}
		for (altruist, &col) in pool.altruists.iter().zip(&cols.unused_altruists) {
			model.set_obj_coeff(col, criterion.altruist_val(altruist));
		}
		model.set_obj_sense(match criterion.sense() {
			Sense::Maximize => ObjSense::Maximize,
			Sense::Minimize => ObjSense::Minimize,
		});
	}

	/// Freezes the optimal value of `criterion` as a constraint, so every later solve
	/// stays optimal for it.
	fn freeze_objective(
		model: &mut Model, criterion: &dyn OptCriterion, objective: f64,
		pool: &Pool, chains: &[Chain], cycles: &[Cycle], cols: &CandidateCols
	) {
		let row = model.add_row();
		match criterion.sense() {
			Sense::Maximize => model.set_row_lower(row, objective),
			Sense::Minimize => model.set_row_upper(row, objective),
		}
		for (chain, &col) in chains.iter().zip(&cols.chains) {
			model.set_weight(row, col, criterion.chain_val(chain, pool));
		}
		for (cycle, &col) in cycles.iter().zip(&cols.cycles) {
			model.set_weight(row, col, criterion.cycle_val(cycle, pool));
		}
		for (altruist, &col) in pool.altruists.iter().zip(&cols.unused_altruists) {
			model.set_weight(row, col, criterion.altruist_val(altruist));
		}
	}

	/// Forbids re-finding the exact candidate set of `selected` in later rounds.
	fn exclude_selection(model: &mut Model, selected: &SelectedCandidates, cols: &CandidateCols) {
		let row = model.add_row();
		model.set_row_upper(row, selected.len() as f64 - 1.0);
		for &chain in &selected.chains {
			model.set_weight(row, cols.chains[chain], 1.0);
		}
		for &cycle in &selected.cycles {
			model.set_weight(row, cols.cycles[cycle], 1.0);
		}
		for &altruist in &selected.unused_altruists {
			model.set_weight(row, cols.unused_altruists[altruist], 1.0);
		}
	}

	fn is_worse(objective: f64, best: f64, sense: Sense) -> bool {
		match sense {
			Sense::Maximize => objective + EPSILON < best,
			Sense::Minimize => objective - EPSILON > best,
		}
	}

	fn unexpected_status(solution: &Solution) -> KepError {
		KepError::SolverStatus(format!("{:?}", solution.raw().status()))
	}
}

impl SolveStrategy for IlpStrategy {
	fn solve(
		&self, pool: &Pool, criteria: &[Box<dyn OptCriterion>], params: &SolveParams,
		out: &mut dyn Write
	) -> Result<Option<SolveSummary>, KepError> {
		let cycles = pool.find_cycles(params.max_cycle);
		let chains = pool.find_chains(params.max_chain);
		let (mut model, cols) = Self::build_model(pool, &chains, &cycles);

		let (last_criterion, leading_criteria) = criteria.split_last()
			.expect("at least one optimality criterion is required");

		// Solve criterion by criterion, freezing each optimal value before moving down
		// the priority order. Anything short of proven optimality here breaks the
		// lexicographic argument and is fatal.
		for criterion in leading_criteria {
			Self::set_objective(&mut model, criterion.as_ref(), pool, &chains, &cycles, &cols);
			let solution = model.solve();
			if !solution.raw().is_proven_optimal() {
				return Err(Self::unexpected_status(&solution));
			}
			let objective = solution.raw().obj_value();
			Self::freeze_objective(&mut model, criterion.as_ref(), objective, pool, &chains, &cycles, &cols);
		}

		// Enumerate every optimal solution under the final criterion
		Self::set_objective(&mut model, last_criterion.as_ref(), pool, &chains, &cycles, &cols);
		let mut n_solutions = 0;
		let mut best_objective = None;
		let mut reached_cap = false;
		loop {
			if n_solutions == params.max_solutions {
				reached_cap = true;
				break;
			}

			let solution = model.solve();
			if solution.raw().is_proven_infeasible() {
				break;
			}
			if !solution.raw().is_proven_optimal() {
				return Err(Self::unexpected_status(&solution));
			}

			let objective = solution.raw().obj_value();
			match best_objective {
				Some(best) if Self::is_worse(objective, best, last_criterion.sense()) => break,
				Some(_) => {}
				None => best_objective = Some(objective),
			}

			let selected = cols.selected(&solution);
			for &chain in &selected.chains {
				writeln!(out, "{}", chains[chain].describe(pool))?;
			}
			for &cycle in &selected.cycles {
				writeln!(out, "{}", cycles[cycle].describe(pool))?;
			}
			for &altruist in &selected.unused_altruists {
				writeln!(out, "{}", pool.altruists[altruist].describe_unused())?;
			}
			writeln!(out)?;
			n_solutions += 1;

			if selected.len() == 0 {
				break;
			}
			Self::exclude_selection(&mut model, &selected, &cols);
		}

		Ok(Some(SolveSummary {
			best_objective: best_objective.unwrap_or(-1.0),
			n_solutions,
			reached_cap,
		}))
	}
}
