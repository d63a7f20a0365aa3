use crate::criteria::{FieldSpec, OptCriterion, Sense};
use crate::error::KepError;
use crate::pool::{Altruist, Chain, Cycle, Pool};

/// Packs the ordered criteria values of a candidate into one non-negative integer with
/// strict lexicographic priority: the highest-priority criterion occupies the most
/// significant bits, so it dominates every lower-priority criterion absolutely.
///
/// Each criterion contributes `min(cap, scaled value)` when maximized and
/// `cap - min(cap, scaled value)` when minimized. The clamp at `cap` is the overflow
/// guard: a raw value can never spill into a neighboring bit field.
pub struct ScorePacker {
	slots: Vec<(Sense, FieldSpec)>,
}

impl ScorePacker {
	/// Builds a packer for `criteria`, in priority order. `width_overrides` replaces the
	/// per-criterion default bit widths (the caps follow as `2^width - 1`). All
	/// configuration errors surface here, before any solving starts.
	pub fn new(
		criteria: &[Box<dyn OptCriterion>], width_overrides: Option<&[u32]>
	) -> Result<ScorePacker, KepError> {
		if let Some(widths) = width_overrides {
			if widths.len() != criteria.len() {
				return Err(KepError::BitWidthCount { expected: criteria.len(), actual: widths.len() });
			}
			for &width in widths {
				if width == 0 || width >= 64 {
					return Err(KepError::BitWidthRange(width));
				}
			}
		}

		let slots: Vec<(Sense, FieldSpec)> = criteria.iter().enumerate().map(|(position, criterion)| {
			let field = match width_overrides {
				Some(widths) => FieldSpec::from_width(widths[position], criterion.field().scale),
				None => criterion.field(),
			};
			(criterion.sense(), field)
		}).collect();

		let total_bits: u32 = slots.iter().map(|(_, field)| field.bit_width).sum();
		if total_bits > 128 {
			return Err(KepError::ScoreWidth(total_bits));
		}

		Ok(ScorePacker { slots })
	}

	pub fn total_bits(&self) -> u32 {
		self.slots.iter().map(|(_, field)| field.bit_width).sum()
	}

	fn component(sense: Sense, field: FieldSpec, raw: f64) -> u128 {
		let scaled = (raw * field.scale).max(0.0) as u64;
		let clamped = scaled.min(field.cap);
		match sense {
			Sense::Maximize => clamped as u128,
			Sense::Minimize => (field.cap - clamped) as u128,
		}
	}

	/// Packs one raw value per criterion, given in priority order.
	pub fn pack(&self, raws: &[f64]) -> u128 {
		debug_assert_eq!(raws.len(), self.slots.len());
		let mut packed = 0u128;
		for (&(sense, field), &raw) in self.slots.iter().zip(raws) {
			packed = (packed << field.bit_width) | Self::component(sense, field, raw);
		}
		packed
	}

	/// Recovers the stored component of every criterion from a packed score, processing
	/// from the least-significant (lowest-priority) field upward. The result is in
	/// priority order. Minimized criteria come back as stored, so `cap - component`
	/// recovers their clamped raw value.
	pub fn unpack(&self, mut packed: u128) -> Vec<u64> {
		let mut components = vec![0u64; self.slots.len()];
		for (position, &(_, field)) in self.slots.iter().enumerate().rev() {
			components[position] = (packed & ((1u128 << field.bit_width) - 1)) as u64;
			packed >>= field.bit_width;
		}
		components
	}

	pub fn pack_chain(
		&self, criteria: &[Box<dyn OptCriterion>], chain: &Chain, pool: &Pool
	) -> u128 {
		let raws: Vec<f64> = criteria.iter().map(|criterion| criterion.chain_val(chain, pool)).collect();
		self.pack(&raws)
	}

	pub fn pack_cycle(
		&self, criteria: &[Box<dyn OptCriterion>], cycle: &Cycle, pool: &Pool
	) -> u128 {
		let raws: Vec<f64> = criteria.iter().map(|criterion| criterion.cycle_val(cycle, pool)).collect();
		self.pack(&raws)
	}

	pub fn pack_altruist(
		&self, criteria: &[Box<dyn OptCriterion>], altruist: &Altruist
	) -> u128 {
		let raws: Vec<f64> = criteria.iter().map(|criterion| criterion.altruist_val(altruist)).collect();
		self.pack(&raws)
	}
}
