use crate::error::KepError;
use crate::pool::{Altruist, Chain, Cycle, Pool};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Sense {
	Maximize,
	Minimize,
}

/// The packing field of one criterion: how many bits it occupies in the hierarchical
/// score, the largest component that fits (`2^bit_width - 1`), and the factor its raw
/// value is scaled by before truncation to an integer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FieldSpec {
	pub bit_width: u32,
	pub cap: u64,
	pub scale: f64,
}

impl FieldSpec {
	pub fn from_width(bit_width: u32, scale: f64) -> FieldSpec {
		debug_assert!(bit_width > 0 && bit_width < 64);
		FieldSpec { bit_width, cap: (1u64 << bit_width) - 1, scale }
	}
}

/// One optimality criterion: a name, an optimization sense, a packing field, and a
/// numeric contribution for each kind of candidate.
pub trait OptCriterion {
	fn name(&self) -> &'static str;

	fn sense(&self) -> Sense;

	fn field(&self) -> FieldSpec {
		FieldSpec::from_width(10, 1.0)
	}

	fn chain_val(&self, chain: &Chain, pool: &Pool) -> f64;

	fn cycle_val(&self, cycle: &Cycle, pool: &Pool) -> f64;

	fn altruist_val(&self, _altruist: &Altruist) -> f64 {
		0.0
	}
}

/// The number of transplants performed inside the pool.
pub struct EffectiveTransplants;

impl OptCriterion for EffectiveTransplants {
	fn name(&self) -> &'static str { "effective" }

	fn sense(&self) -> Sense { Sense::Maximize }

	fn chain_val(&self, chain: &Chain, _pool: &Pool) -> f64 {
		chain.n_transplants() as f64
	}

	fn cycle_val(&self, cycle: &Cycle, _pool: &Pool) -> f64 {
		cycle.n_transplants() as f64
	}
}

/// The raw size of the exchange. For a chain this also counts the closing donation of
/// the final donor (which goes to the waiting list, not to a pool patient), so a chain
/// is one larger than its transplant count.
pub struct ExchangeSize;

impl OptCriterion for ExchangeSize {
	fn name(&self) -> &'static str { "size" }

	fn sense(&self) -> Sense { Sense::Maximize }

	fn chain_val(&self, chain: &Chain, _pool: &Pool) -> f64 {
		(chain.pairs.len() + 1) as f64
	}

	fn cycle_val(&self, cycle: &Cycle, _pool: &Pool) -> f64 {
		cycle.pairs.len() as f64
	}
}

/// Whether the exchange involves exactly three donors: a 3-pair cycle, or a 2-pair chain
/// plus its altruist. Minimized: a three-way exchange requires three simultaneous
/// operations and fails entirely if any participant drops out.
pub struct ThreeWayExchanges;

impl OptCriterion for ThreeWayExchanges {
	fn name(&self) -> &'static str { "3way" }

	fn sense(&self) -> Sense { Sense::Minimize }

	fn chain_val(&self, chain: &Chain, _pool: &Pool) -> f64 {
		if chain.pairs.len() == 2 { 1.0 } else { 0.0 }
	}

	fn cycle_val(&self, cycle: &Cycle, _pool: &Pool) -> f64 {
		if cycle.pairs.len() == 3 { 1.0 } else { 0.0 }
	}
}

/// The number of back-arcs of a cycle. Chains have none.
pub struct BackArcs;

impl OptCriterion for BackArcs {
	fn name(&self) -> &'static str { "backarc" }

	fn sense(&self) -> Sense { Sense::Maximize }

	fn chain_val(&self, _chain: &Chain, _pool: &Pool) -> f64 {
		0.0
	}

	fn cycle_val(&self, cycle: &Cycle, pool: &Pool) -> f64 {
		cycle.n_backarcs(pool) as f64
	}
}

/// The total weight of the edges an exchange uses. Weights are fractional, so this
/// criterion packs into a wide field with a large scale factor.
pub struct TotalWeight;

impl OptCriterion for TotalWeight {
	fn name(&self) -> &'static str { "weight" }

	fn sense(&self) -> Sense { Sense::Maximize }

	fn field(&self) -> FieldSpec {
		FieldSpec::from_width(32, 100_000.0)
	}

	fn chain_val(&self, chain: &Chain, pool: &Pool) -> f64 {
		chain.total_weight(pool)
	}

	fn cycle_val(&self, cycle: &Cycle, pool: &Pool) -> f64 {
		cycle.total_weight(pool)
	}
}

/// Resolves a colon-separated, priority-ordered criteria list such as
/// `effective:size:3way:backarc:weight`. An unrecognized name is a configuration error,
/// raised before any solving starts.
pub fn get_criteria(names: &str) -> Result<Vec<Box<dyn OptCriterion>>, KepError> {
	names.split(':').map(|name| match name {
		"effective" => Ok(Box::new(EffectiveTransplants) as Box<dyn OptCriterion>),
		"size" => Ok(Box::new(ExchangeSize) as Box<dyn OptCriterion>),
		"3way" => Ok(Box::new(ThreeWayExchanges) as Box<dyn OptCriterion>),
		"backarc" => Ok(Box::new(BackArcs) as Box<dyn OptCriterion>),
		"weight" => Ok(Box::new(TotalWeight) as Box<dyn OptCriterion>),
		other => Err(KepError::UnknownCriterion(other.to_string())),
	}).collect()
}
