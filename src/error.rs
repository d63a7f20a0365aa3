use thiserror::Error;

#[derive(Debug, Error)]
pub enum KepError {
	#[error("unknown optimality criterion: {0}")]
	UnknownCriterion(String),

	#[error("couldn't parse bit width: {0}")]
	BitWidthParse(String),

	#[error("expected {expected} bit widths, got {actual}")]
	BitWidthCount { expected: usize, actual: usize },

	#[error("bit width {0} is outside the supported range 1..=63")]
	BitWidthRange(u32),

	#[error("the packed hierarchical score needs {0} bits, which exceeds the 128-bit limit")]
	ScoreWidth(u32),

	#[error("solver finished with unexpected status: {0}")]
	SolverStatus(String),

	#[error(transparent)]
	Io(#[from] std::io::Error),
}
