use crate::error::NeatError;
use crate::organism::Organism;

/// Pure function from a node's weighted input sum to its activation.
pub type TransferFn = Box<dyn Fn(f64) -> f64 + Send + Sync>;

/// Pure function from an organism to a non-negative fitness.
///
/// Takes the whole organism (not just its last `outputs`) because
/// realistic fitness tasks, XOR among them, need to probe the
/// organism's response across several distinct inputs. The function
/// calls [`Organism::evaluate`] as many times as its task requires and
/// aggregates the result itself.
pub type FitnessFn = Box<dyn Fn(&Organism) -> f64 + Send + Sync>;

/// Recognized configuration options for an evolutionary run.
///
/// `transfer_function` and `fitness_function` are capability
/// parameters supplied once at [`crate::Population::create`] and held
/// for the lifetime of the population; they must be callable without
/// additional state.
pub struct NeatConfig {
    pub add_node_mutation_chance: f64,
    pub add_connection_mutation_chance: f64,
    pub weight_mutation_chance: f64,
    pub new_weight_mutation_chance: f64,
    pub excess_gene_importance: f64,
    pub disjoint_gene_importance: f64,
    pub matching_gene_importance: f64,
    pub similarity_threshold: f64,
    pub organism_culling_rate: f64,
    pub generations_before_stagnation: usize,
    pub mating_with_crossover_chance: f64,
    pub transfer_function: TransferFn,
    pub fitness_function: FitnessFn,
}

impl NeatConfig {
    /// Sensible defaults, generalized from the teacher's
    /// `context::NeatConfig::default()`. `transfer_function` defaults
    /// to the hyperbolic tangent; `fitness_function` defaults to a
    /// constant zero and should essentially always be overridden.
    pub fn new(transfer_function: TransferFn, fitness_function: FitnessFn) -> Self {
        Self {
            add_node_mutation_chance: 0.03,
            add_connection_mutation_chance: 0.05,
            weight_mutation_chance: 0.8,
            new_weight_mutation_chance: 0.1,
            excess_gene_importance: 1.0,
            disjoint_gene_importance: 1.0,
            matching_gene_importance: 0.4,
            similarity_threshold: 3.0,
            organism_culling_rate: 0.5,
            generations_before_stagnation: 15,
            mating_with_crossover_chance: 0.75,
            transfer_function,
            fitness_function,
        }
    }

    /// Validates every probability-ranged and threshold field.
    /// Configuration errors are reported without mutating population
    /// state.
    pub fn validate(&self) -> Result<(), NeatError> {
        let probabilities = [
            ("add_node_mutation_chance", self.add_node_mutation_chance),
            (
                "add_connection_mutation_chance",
                self.add_connection_mutation_chance,
            ),
            ("weight_mutation_chance", self.weight_mutation_chance),
            (
                "new_weight_mutation_chance",
                self.new_weight_mutation_chance,
            ),
            ("organism_culling_rate", self.organism_culling_rate),
            (
                "mating_with_crossover_chance",
                self.mating_with_crossover_chance,
            ),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(NeatError::InvalidInput(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        if self.similarity_threshold <= 0.0 {
            return Err(NeatError::InvalidInput(format!(
                "similarity_threshold must be strictly positive, got {}",
                self.similarity_threshold
            )));
        }
        Ok(())
    }
}
