use serde::{Deserialize, Serialize};

use crate::error::NeatError;
use crate::genome::Genome;
use crate::matrix::WeightMatrix;
use crate::propagate::propagate;

/// A unique, non-owning reference to a species within a population.
pub type SpeciesId = usize;

/// Bundles a genome, its derived weight matrix, last propagation
/// outputs, fitness, and lineage.
///
/// `parent_species` is a weak back-reference (a plain index, not a
/// shared pointer): it exists to answer lookups and is invalidated,
/// not dereferenced, once the species it names is removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organism {
    pub id: usize,
    pub generation: usize,
    pub parent_species: Option<SpeciesId>,
    pub genome: Genome,
    #[serde(skip)]
    pub weight_matrix: WeightMatrix,
    pub outputs: Vec<f64>,
    pub fitness: f64,
}

impl Organism {
    pub fn new(id: usize, generation: usize, genome: Genome) -> Self {
        let weight_matrix = WeightMatrix::build(&genome);
        Self {
            id,
            generation,
            parent_species: None,
            genome,
            weight_matrix,
            outputs: Vec::new(),
            fitness: 0.0,
        }
    }

    /// Rebuilds the weight matrix from the current genome. Required
    /// after any structural mutation.
    pub fn rebuild_matrix(&mut self) {
        self.weight_matrix = WeightMatrix::build(&self.genome);
    }

    /// Runs one forward propagation and stores the full activation
    /// vector in `outputs`. Does not mutate the genome or matrix.
    pub fn propagate(
        &mut self,
        input: &[f64],
        transfer: &dyn Fn(f64) -> f64,
    ) -> Result<(), NeatError> {
        let activations = propagate(&self.weight_matrix, self.genome.input_count, input, transfer)?;
        self.outputs = activations;
        Ok(())
    }

    /// The slice of `outputs` corresponding to the organism's output
    /// nodes, `[input_count, input_count + output_count)`.
    pub fn output_values(&self) -> &[f64] {
        let start = self.genome.input_count;
        let end = start + self.genome.output_count;
        &self.outputs[start..end]
    }

    /// Runs one forward propagation against `input` without touching
    /// `self` at all, not even `outputs`. Fitness functions that need
    /// to probe an organism's response across several inputs (e.g. all
    /// four XOR points) call this directly instead of going through
    /// [`Population::propagate`]'s whole-population, single-input-vector
    /// step.
    pub fn evaluate(
        &self,
        input: &[f64],
        transfer: &dyn Fn(f64) -> f64,
    ) -> Result<Vec<f64>, NeatError> {
        let activations = propagate(&self.weight_matrix, self.genome.input_count, input, transfer)?;
        let start = self.genome.input_count;
        let end = start + self.genome.output_count;
        Ok(activations[start..end].to_vec())
    }

    /// Checks for non-finite fitness and, if found, quarantines the
    /// organism by zeroing its fitness so it cannot poison reproductive
    /// allocation.
    pub fn quarantine_if_non_finite(&mut self) -> Option<NeatError> {
        if !self.fitness.is_finite() {
            let detail = format!("fitness {} is not finite", self.fitness);
            self.fitness = 0.0;
            return Some(NeatError::NumericFailure {
                organism_id: self.id,
                detail,
            });
        }
        None
    }
}
