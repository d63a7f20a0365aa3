use serde::Deserialize;
use std::collections::HashMap;
use std::fs::read_to_string;

use crate::pool::Pool;

/// One donor record of a pool file, keyed by the donor's id. A donor without sources (or
/// flagged altruistic) is an altruist; everyone else is paired with its source patients.
#[derive(Debug, Deserialize)]
struct DonorEntry {
	#[serde(default)]
	sources: Vec<u32>,
	#[serde(default)]
	matches: Vec<MatchEntry>,
	#[serde(default)]
	altruistic: bool,
}

#[derive(Debug, Deserialize)]
struct MatchEntry {
	recipient: u32,
	score: f64,
}

#[derive(Debug, Deserialize)]
struct PoolFile {
	data: HashMap<String, DonorEntry>,
}

pub fn parse_pool(file_path: &str) -> Pool {
	let raw_text = read_to_string(file_path).expect("Couldn't read pool file");
	parse_pool_json(&raw_text)
}

/// Builds a pool from the JSON text of a pool file. Donors are read in ascending id
/// order; patients get their indices in order of first appearance (sources before match
/// recipients, per donor).
pub fn parse_pool_json(raw_text: &str) -> Pool {
	let file: PoolFile = serde_json::from_str(raw_text).expect("Couldn't parse pool file");

	let mut entries: Vec<(u32, DonorEntry)> = file.data.into_iter().map(|(id, entry)| {
		(id.parse::<u32>().expect("Couldn't parse a donor id"), entry)
	}).collect();
	entries.sort_by_key(|(id, _)| *id);

	let mut pool = Pool::new();
	let mut patient_indices = HashMap::<u32, usize>::new();
	for (_, entry) in &entries {
		for &source in &entry.sources {
			patient_indices.entry(source).or_insert_with(|| pool.add_patient(source));
		}
		for match_entry in &entry.matches {
			patient_indices.entry(match_entry.recipient)
				.or_insert_with(|| pool.add_patient(match_entry.recipient));
		}
	}

	for (id, entry) in &entries {
		if entry.altruistic || entry.sources.is_empty() {
			let altruist = pool.add_altruist(*id);
			for match_entry in &entry.matches {
				pool.add_altruist_edge(altruist, patient_indices[&match_entry.recipient], match_entry.score);
			}
		} else {
			let donor = pool.add_paired_donor(*id);
			for &source in &entry.sources {
				pool.associate_patient_with_donor(patient_indices[&source], donor);
			}
			for match_entry in &entry.matches {
				pool.add_donor_edge(donor, patient_indices[&match_entry.recipient], match_entry.score);
			}
		}
	}

	pool
}
