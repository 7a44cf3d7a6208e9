use miette::Diagnostic;
use thiserror::Error;

/// Errors surfaced by the NEAT engine.
///
/// `InvariantViolation` signals an internal bug and should never be
/// triggered by well-formed caller input; every other variant is a
/// reportable, recoverable condition.
#[derive(Error, Diagnostic, Debug)]
pub enum NeatError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    #[error("all species are stagnant and reseeding is disabled")]
    AllSpeciesStagnant,

    #[error("non-finite value produced for organism {organism_id}: {detail}")]
    NumericFailure { organism_id: usize, detail: String },
}
