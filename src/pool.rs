pub type Weight = f64;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Patient {
	id: u32,
	index: usize,
}

impl Patient {
	pub fn get_id(&self) -> u32 { self.id }

	pub fn get_index(&self) -> usize { self.index }

	pub fn is_in(&self, pairs: &[PatientDonorPair]) -> bool {
		pairs.iter().any(|pair| pair.patient == self.index)
	}
}

/// A directed compatibility edge from a donor (paired or altruistic) to a patient.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DonorPatientMatch {
	pub patient: usize,
	pub weight: Weight,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PairedDonor {
	id: u32,
	index: usize,

	/// A donor entered the exchange for one patient, but may back more than one
	pub paired_patients: Vec<usize>,
	pub edges_out: Vec<DonorPatientMatch>,
}

impl PairedDonor {
	pub fn get_id(&self) -> u32 { self.id }

	pub fn get_index(&self) -> usize { self.index }

	pub fn is_in(&self, pairs: &[PatientDonorPair]) -> bool {
		pairs.iter().any(|pair| pair.donor == self.index)
	}

	pub fn edge_weight_to(&self, patient: usize) -> Option<Weight> {
		self.edges_out.iter().find(|edge| edge.patient == patient).map(|edge| edge.weight)
	}
}

/// A non-directed (altruistic) donor: not paired with any patient. Every altruist either
/// starts a selected chain, or is explicitly left unused.
#[derive(Debug, Clone, PartialEq)]
pub struct Altruist {
	id: u32,
	index: usize,
	pub edges_out: Vec<DonorPatientMatch>,
}

impl Altruist {
	pub fn get_id(&self) -> u32 { self.id }

	pub fn get_index(&self) -> usize { self.index }

	pub fn edge_weight_to(&self, patient: usize) -> Option<Weight> {
		self.edges_out.iter().find(|edge| edge.patient == patient).map(|edge| edge.weight)
	}

	pub fn describe_unused(&self) -> String {
		format!("altruist {} unused", self.id)
	}
}

/// A pairing entered into the exchange: one patient together with one of its paired donors.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PatientDonorPair {
	pub patient: usize,
	pub donor: usize,
}

/// A closed donation loop: the donor of each pair donates to the patient of the next pair,
/// and the donor of the last pair closes the loop back to the first patient.
///
/// Every cycle is recorded starting at its lowest-indexed pair, so rotations of the same
/// loop are never counted twice. The two traversal directions of the same pair set use
/// different edges and therefore remain distinct cycles.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Cycle {
	pub pairs: Vec<usize>,
}

impl Cycle {
	pub fn n_transplants(&self) -> usize {
		self.pairs.len()
	}

	/// Counts the edges from the donor of each pair back to the patient of the previous
	/// pair. Such an edge means the cycle embeds a shorter fallback exchange, which makes
	/// it less fragile. Cycles of length 2 report 0: their would-be back-arcs are the
	/// cycle's own edges.
	pub fn n_backarcs(&self, pool: &Pool) -> usize {
		if self.pairs.len() < 3 {
			return 0;
		}
		let mut count = 0;
		for position in 0 .. self.pairs.len() {
			let donor = pool.pairs[self.pairs[position]].donor;
			let previous = self.pairs[(position + self.pairs.len() - 1) % self.pairs.len()];
			if pool.paired_donors[donor].edge_weight_to(pool.pairs[previous].patient).is_some() {
				count += 1;
			}
		}
		count
	}

	pub fn total_weight(&self, pool: &Pool) -> Weight {
		let mut total = 0.0;
		for position in 0 .. self.pairs.len() {
			let donor = pool.pairs[self.pairs[position]].donor;
			let next = self.pairs[(position + 1) % self.pairs.len()];
			total += pool.paired_donors[donor].edge_weight_to(pool.pairs[next].patient)
				.expect("every consecutive cycle edge must exist in the pool");
		}
		total
	}

	pub fn describe(&self, pool: &Pool) -> String {
		let hops: Vec<String> = self.pairs.iter().map(|&pair| pool.describe_pair(pair)).collect();
		format!("cycle: {}", hops.join(" -> "))
	}
}

/// An open donation sequence started by an altruist: the altruist donates to the first
/// pair's patient, each pair's donor donates to the next pair's patient, and the final
/// donor donates outside the pool (to the waiting list).
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Chain {
	pub altruist: usize,
	pub pairs: Vec<usize>,
}

impl Chain {
	pub fn n_transplants(&self) -> usize {
		self.pairs.len()
	}

	pub fn total_weight(&self, pool: &Pool) -> Weight {
		let first_patient = pool.pairs[self.pairs[0]].patient;
		let mut total = pool.altruists[self.altruist].edge_weight_to(first_patient)
			.expect("the altruist edge starting a chain must exist in the pool");
		for position in 0 .. self.pairs.len() - 1 {
			let donor = pool.pairs[self.pairs[position]].donor;
			let next = self.pairs[position + 1];
			total += pool.paired_donors[donor].edge_weight_to(pool.pairs[next].patient)
				.expect("every consecutive chain edge must exist in the pool");
		}
		total
	}

	pub fn describe(&self, pool: &Pool) -> String {
		let hops: Vec<String> = self.pairs.iter().map(|&pair| pool.describe_pair(pair)).collect();
		format!("chain: altruist {} -> {}", pool.altruists[self.altruist].get_id(), hops.join(" -> "))
	}
}

/// The registered exchange pool: patients, paired donors, altruists, the patient-donor
/// pairings, and the known compatibility edges (stored on their source donor).
#[derive(Debug, Clone, PartialEq)]
pub struct Pool {
	pub patients: Vec<Patient>,
	pub paired_donors: Vec<PairedDonor>,
	pub altruists: Vec<Altruist>,
	pub pairs: Vec<PatientDonorPair>,
}

impl Pool {
	pub fn new() -> Pool {
		Pool { patients: Vec::new(), paired_donors: Vec::new(), altruists: Vec::new(), pairs: Vec::new() }
	}

	pub fn add_patient(&mut self, id: u32) -> usize {
		let index = self.patients.len();
		self.patients.push(Patient { id, index });
		index
	}

	pub fn add_paired_donor(&mut self, id: u32) -> usize {
		let index = self.paired_donors.len();
		self.paired_donors.push(PairedDonor {
			id, index, paired_patients: Vec::new(), edges_out: Vec::new()
		});
		index
	}

	pub fn add_altruist(&mut self, id: u32) -> usize {
		let index = self.altruists.len();
		self.altruists.push(Altruist { id, index, edges_out: Vec::new() });
		index
	}

	/// Registers `patient` and `donor` as a pairing entered into the exchange, creating a
	/// new `PatientDonorPair`.
	pub fn associate_patient_with_donor(&mut self, patient: usize, donor: usize) {
		self.paired_donors[donor].paired_patients.push(patient);
		self.pairs.push(PatientDonorPair { patient, donor });
	}

	pub fn add_donor_edge(&mut self, donor: usize, patient: usize, weight: Weight) {
		self.paired_donors[donor].edges_out.push(DonorPatientMatch { patient, weight });
	}

	pub fn add_altruist_edge(&mut self, altruist: usize, patient: usize, weight: Weight) {
		self.altruists[altruist].edges_out.push(DonorPatientMatch { patient, weight });
	}

	pub fn describe_pair(&self, pair: usize) -> String {
		let pair = self.pairs[pair];
		format!("patient {} (donor {})", self.patients[pair.patient].get_id(), self.paired_donors[pair.donor].get_id())
	}

	fn pairs_by_patient(&self) -> Vec<Vec<usize>> {
		let mut by_patient = vec![Vec::new(); self.patients.len()];
		for (index, pair) in self.pairs.iter().enumerate() {
			by_patient[pair.patient].push(index);
		}
		by_patient
	}

	/// True when the pair at `candidate` shares its patient or its donor with any pair
	/// already on `path`. A participant has one kidney to give or receive, so no cycle or
	/// chain may visit it twice.
	fn participant_overlap(&self, candidate: usize, path: &[usize]) -> bool {
		let candidate = self.pairs[candidate];
		path.iter().any(|&on_path| {
			self.pairs[on_path].patient == candidate.patient || self.pairs[on_path].donor == candidate.donor
		})
	}

	/// Enumerates all cycles of length 2 up to `max_cycle` through the compatibility
	/// graph. See `Cycle` for the canonical starting-point rule.
	pub fn find_cycles(&self, max_cycle: usize) -> Vec<Cycle> {
		let mut cycles = Vec::new();
		if max_cycle < 2 {
			return cycles;
		}
		let pairs_by_patient = self.pairs_by_patient();
		for start in 0 .. self.pairs.len() {
			let mut path = vec![start];
			self.extend_cycle(start, &mut path, &pairs_by_patient, max_cycle, &mut cycles);
		}
		cycles
	}

	fn extend_cycle(
		&self, start: usize, path: &mut Vec<usize>, pairs_by_patient: &[Vec<usize>],
		max_cycle: usize, cycles: &mut Vec<Cycle>
	) {
		let last_donor = self.pairs[*path.last().unwrap()].donor;
		for edge_index in 0 .. self.paired_donors[last_donor].edges_out.len() {
			let edge = self.paired_donors[last_donor].edges_out[edge_index];
			if edge.patient == self.pairs[start].patient && path.len() >= 2 {
				cycles.push(Cycle { pairs: path.clone() });
			}
			if path.len() == max_cycle {
				continue;
			}
			for &next in &pairs_by_patient[edge.patient] {
				// Only pairs above the canonical start, and never a participant twice
				if next <= start || self.participant_overlap(next, path) {
					continue;
				}
				path.push(next);
				self.extend_cycle(start, path, pairs_by_patient, max_cycle, cycles);
				path.pop();
			}
		}
	}

	/// Enumerates all chains of 1 up to `max_chain` pairs, starting from each altruist
	/// edge. Every prefix of a longer chain is emitted as a candidate of its own, so the
	/// solver may settle for a shorter chain.
	pub fn find_chains(&self, max_chain: usize) -> Vec<Chain> {
		let mut chains = Vec::new();
		if max_chain == 0 {
			return chains;
		}
		let pairs_by_patient = self.pairs_by_patient();
		for altruist in 0 .. self.altruists.len() {
			for edge_index in 0 .. self.altruists[altruist].edges_out.len() {
				let edge = self.altruists[altruist].edges_out[edge_index];
				for &first in &pairs_by_patient[edge.patient] {
					let mut path = vec![first];
					self.extend_chain(altruist, &mut path, &pairs_by_patient, max_chain, &mut chains);
				}
			}
		}
		chains
	}

	fn extend_chain(
		&self, altruist: usize, path: &mut Vec<usize>, pairs_by_patient: &[Vec<usize>],
		max_chain: usize, chains: &mut Vec<Chain>
	) {
		chains.push(Chain { altruist, pairs: path.clone() });
		if path.len() == max_chain {
			return;
		}
		let last_donor = self.pairs[*path.last().unwrap()].donor;
		for edge_index in 0 .. self.paired_donors[last_donor].edges_out.len() {
			let edge = self.paired_donors[last_donor].edges_out[edge_index];
			for &next in &pairs_by_patient[edge.patient] {
				if self.participant_overlap(next, path) {
					continue;
				}
				path.push(next);
				self.extend_chain(altruist, path, pairs_by_patient, max_chain, chains);
				path.pop();
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn ring_pool() -> Pool {
		let mut pool = Pool::new();
		let patients = [pool.add_patient(1), pool.add_patient(2), pool.add_patient(3)];
		let donors = [pool.add_paired_donor(1), pool.add_paired_donor(2), pool.add_paired_donor(3)];
		for i in 0 .. 3 {
			pool.associate_patient_with_donor(patients[i], donors[i]);
		}
		pool
	}

	fn add_forward_ring(pool: &mut Pool) {
		// donor 3 -> patient 1, donor 1 -> patient 2, donor 2 -> patient 3
		for i in 0 .. 3usize {
			pool.add_donor_edge((i + 2) % 3, i, 100.0);
		}
	}

	fn add_reverse_ring(pool: &mut Pool) {
		// donor 1 -> patient 3, donor 2 -> patient 1, donor 3 -> patient 2
		for i in 0 .. 3usize {
			pool.add_donor_edge(i, (i + 2) % 3, 100.0);
		}
	}

	#[test]
	fn test_empty_pool() {
		let pool = Pool::new();
		for max_length in 0 .. 5 {
			assert_eq!(pool.find_cycles(max_length), vec![]);
			assert_eq!(pool.find_chains(max_length), vec![]);
		}
	}

	#[test]
	fn test_is_in() {
		let mut pool = Pool::new();
		let p1 = pool.add_patient(1);
		let p2 = pool.add_patient(2);
		let d1 = pool.add_paired_donor(1);
		let d2 = pool.add_paired_donor(2);

		let pair_list = [
			PatientDonorPair { patient: p1, donor: d1 },
			PatientDonorPair { patient: p2, donor: d2 }
		];
		assert!(pool.patients[p1].is_in(&pair_list));
		assert!(pool.patients[p2].is_in(&pair_list));
		assert!(pool.paired_donors[d1].is_in(&pair_list));
		assert!(pool.paired_donors[d2].is_in(&pair_list));

		let pair_list = [
			PatientDonorPair { patient: p1, donor: d1 },
			PatientDonorPair { patient: p1, donor: d2 }
		];
		assert!(!pool.patients[p2].is_in(&pair_list));

		let pair_list = [
			PatientDonorPair { patient: p1, donor: d1 },
			PatientDonorPair { patient: p2, donor: d1 }
		];
		assert!(!pool.paired_donors[d2].is_in(&pair_list));
	}

	#[test]
	fn test_cycle_finding() {
		let mut pool = ring_pool();
		assert_eq!(pool.find_cycles(3), vec![]);

		add_forward_ring(&mut pool);
		let cycles = pool.find_cycles(3);
		assert_eq!(cycles.len(), 1);
		assert_eq!(cycles[0].pairs.len(), 3);

		add_reverse_ring(&mut pool);
		let cycles = pool.find_cycles(3);
		assert_eq!(cycles.len(), 5);
		for cycle in &cycles {
			assert_eq!(cycle.pairs.len(), cycle.n_transplants());
		}
	}

	#[test]
	fn test_cycle_canonical_start() {
		let mut pool = ring_pool();
		add_forward_ring(&mut pool);
		add_reverse_ring(&mut pool);
		for cycle in pool.find_cycles(3) {
			let first = cycle.pairs[0];
			assert!(cycle.pairs[1..].iter().all(|&pair| pair > first));
		}
	}

	#[test]
	fn test_cycle_length_bound() {
		let mut pool = ring_pool();
		add_forward_ring(&mut pool);
		add_reverse_ring(&mut pool);
		assert_eq!(pool.find_cycles(0).len(), 0);
		assert_eq!(pool.find_cycles(1).len(), 0);
		// Only the three 2-cycles fit
		assert_eq!(pool.find_cycles(2).len(), 3);
	}

	#[test]
	fn test_cycle_backarcs() {
		let mut pool = ring_pool();
		add_forward_ring(&mut pool);
		add_reverse_ring(&mut pool);
		for cycle in pool.find_cycles(3) {
			if cycle.pairs.len() == 3 {
				assert_eq!(cycle.n_backarcs(&pool), 3);
			} else {
				assert_eq!(cycle.n_backarcs(&pool), 0);
			}
		}
	}

	#[test]
	fn test_cycle_weight() {
		let mut pool = ring_pool();
		add_forward_ring(&mut pool);
		let cycles = pool.find_cycles(3);
		assert_eq!(cycles[0].total_weight(&pool), 300.0);
	}

	#[test]
	fn test_chain_finding() {
		let mut pool = ring_pool();
		// altruist -> patient 1, donor 1 -> patient 2, donor 2 -> patient 3
		let altruist = pool.add_altruist(9);
		pool.add_altruist_edge(altruist, 0, 10.0);
		pool.add_donor_edge(0, 1, 100.0);
		pool.add_donor_edge(1, 2, 100.0);

		assert_eq!(pool.find_chains(0), vec![]);
		assert_eq!(pool.find_chains(1), vec![Chain { altruist, pairs: vec![0] }]);

		let chains = pool.find_chains(3);
		assert_eq!(chains, vec![
			Chain { altruist, pairs: vec![0] },
			Chain { altruist, pairs: vec![0, 1] },
			Chain { altruist, pairs: vec![0, 1, 2] }
		]);
		assert_eq!(chains[2].n_transplants(), 3);
		assert_eq!(chains[2].total_weight(&pool), 210.0);
	}

	#[test]
	fn test_chain_never_revisits() {
		let mut pool = ring_pool();
		let altruist = pool.add_altruist(9);
		pool.add_altruist_edge(altruist, 0, 10.0);
		pool.add_donor_edge(0, 1, 100.0);
		// donor 2 points back at patient 1, who already received from the altruist
		pool.add_donor_edge(1, 0, 100.0);

		let chains = pool.find_chains(5);
		assert_eq!(chains, vec![
			Chain { altruist, pairs: vec![0] },
			Chain { altruist, pairs: vec![0, 1] }
		]);
	}

	#[test]
	fn test_shared_donor_cycles() {
		let mut pool = Pool::new();
		let p1 = pool.add_patient(1);
		let p2 = pool.add_patient(2);
		let p3 = pool.add_patient(3);
		let d1 = pool.add_paired_donor(1);
		let d2 = pool.add_paired_donor(2);
		// donor 1 backs both patient 1 and patient 3
		pool.associate_patient_with_donor(p1, d1);
		pool.associate_patient_with_donor(p2, d2);
		pool.associate_patient_with_donor(p3, d1);
		pool.add_donor_edge(d1, p2, 100.0);
		pool.add_donor_edge(d2, p1, 100.0);
		pool.add_donor_edge(d2, p3, 100.0);

		// The 2-cycle through (p3, d1) would need donor 1 twice with (p1, d1), and the
		// 2-cycle (p2, d2) <-> (p3, d1) is fine
		let cycles = pool.find_cycles(3);
		assert_eq!(cycles, vec![
			Cycle { pairs: vec![0, 1] },
			Cycle { pairs: vec![1, 2] }
		]);
	}

	#[test]
	fn test_describe() {
		let mut pool = ring_pool();
		add_forward_ring(&mut pool);
		let cycle = &pool.find_cycles(3)[0];
		assert_eq!(
			cycle.describe(&pool),
			"cycle: patient 1 (donor 1) -> patient 2 (donor 2) -> patient 3 (donor 3)"
		);

		let altruist = pool.add_altruist(9);
		pool.add_altruist_edge(altruist, 0, 10.0);
		let chain = &pool.find_chains(1)[0];
		assert_eq!(chain.describe(&pool), "chain: altruist 9 -> patient 1 (donor 1)");
		assert_eq!(pool.altruists[altruist].describe_unused(), "altruist 9 unused");
	}
}
