use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::NeatConfig;
use crate::error::NeatError;
use crate::genome::Genome;
use crate::innovation::InnovationRegistry;
use crate::organism::Organism;
use crate::species::{SpeciationEngine, Species};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// The engine's single public handle type.
///
/// Drives the generation loop: `propagate` then `calculate_fitness`
/// then `cross_mutate_and_speciate`. Owns every `Species`, which in
/// turn own every `Organism`; the `InnovationRegistry` is the one
/// shared, population-scoped resource.
pub struct Population {
    next_id: usize,
    next_species_id: usize,
    generation: usize,
    count: usize,
    input_count: usize,
    output_count: usize,
    summed_average_fitness: f64,
    registry: InnovationRegistry,
    species: Vec<Species>,
    config: NeatConfig,
    rng: StdRng,
}

impl Population {
    /// Creates a population of `population_size` minimally-wired
    /// organisms, all initially assigned to a single species.
    pub fn create(
        population_size: usize,
        input_node_count: usize,
        output_node_count: usize,
        config: NeatConfig,
        seed: u64,
    ) -> Result<Self, NeatError> {
        config.validate()?;
        if population_size == 0 {
            return Err(NeatError::InvalidInput(
                "population_size must be at least 1".into(),
            ));
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let mut registry = InnovationRegistry::new(input_node_count + output_node_count);

        let mut organisms = Vec::with_capacity(population_size);
        for id in 0..population_size {
            let genome = Genome::minimal(input_node_count, output_node_count, &mut registry, &mut rng);
            organisms.push(Organism::new(id, 0, genome));
        }

        let mut organisms_iter = organisms.into_iter();
        let founder = organisms_iter
            .next()
            .expect("population_size checked non-zero above");
        let mut species = vec![Species::new(0, 0, founder)];
        for organism in organisms_iter {
            species[0].organisms.push(organism);
        }

        Ok(Self {
            next_id: population_size,
            next_species_id: 1,
            generation: 0,
            count: population_size,
            input_count: input_node_count,
            output_count: output_node_count,
            summed_average_fitness: 0.0,
            registry,
            species,
            config,
            rng,
        })
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn species(&self) -> &[Species] {
        &self.species
    }

    pub fn organism_count(&self) -> usize {
        self.species.iter().map(|s| s.organisms.len()).sum()
    }

    /// The fittest organism currently alive, if any.
    pub fn champion(&self) -> Option<&Organism> {
        self.species
            .iter()
            .filter_map(|s| s.champion())
            .max_by(|a, b| a.fitness.partial_cmp(&b.fitness).unwrap())
    }

    /// Runs forward propagation on every organism. Parallelized
    /// per-organism when the `parallel` feature is enabled; organism
    /// order is never disturbed by parallel evaluation since each
    /// organism is updated in place.
    pub fn propagate(&mut self, input: &[f64]) -> Result<(), NeatError> {
        if input.len() > self.input_count {
            return Err(NeatError::InvalidInput(format!(
                "input length {} exceeds input_count {}",
                input.len(),
                self.input_count
            )));
        }

        let transfer = &self.config.transfer_function;

        #[cfg(feature = "parallel")]
        {
            let errors: Vec<NeatError> = self
                .species
                .par_iter_mut()
                .flat_map(|specie| specie.organisms.par_iter_mut())
                .filter_map(|organism| organism.propagate(input, transfer).err())
                .collect();
            if let Some(err) = errors.into_iter().next() {
                return Err(err);
            }
        }
        #[cfg(not(feature = "parallel"))]
        {
            for specie in &mut self.species {
                for organism in &mut specie.organisms {
                    organism.propagate(input, transfer)?;
                }
            }
        }

        Ok(())
    }

    /// Invokes the user fitness function on every organism and updates
    /// species statistics.
    ///
    /// Non-finite fitness values are quarantined (set to 0) and
    /// reported as `NumericFailure`, logged per-organism, rather than
    /// aborting the whole pass.
    pub fn calculate_fitness(&mut self) -> Vec<NeatError> {
        let fitness_fn = &self.config.fitness_function;
        let mut failures = Vec::new();

        for specie in &mut self.species {
            for organism in &mut specie.organisms {
                organism.fitness = fitness_fn(organism);
                if let Some(err) = organism.quarantine_if_non_finite() {
                    tracing::warn!(organism_id = organism.id, "{err}");
                    failures.push(err);
                }
            }
            specie.update_statistics(self.generation);
        }

        self.summed_average_fitness = self.species.iter().map(|s| s.average_fitness).sum();
        failures
    }

    /// Runs crossover, then mutation, then stagnation/culling, then
    /// reproductive allocation, then re-speciation.
    pub fn cross_mutate_and_speciate(&mut self) -> Result<(), NeatError> {
        let non_stagnant: Vec<usize> = self
            .species
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_stagnant(self.generation, self.config.generations_before_stagnation))
            .map(|(idx, _)| idx)
            .collect();

        if non_stagnant.is_empty() {
            return Err(NeatError::AllSpeciesStagnant);
        }

        for idx in &non_stagnant {
            self.species[*idx].cull(self.config.organism_culling_rate);
        }

        let allocations = allocate_offspring(
            &self.species,
            &non_stagnant,
            self.count,
            self.summed_average_fitness,
        );

        let mut offspring = Vec::with_capacity(self.count);
        for (&idx, &slots) in non_stagnant.iter().zip(allocations.iter()) {
            for _ in 0..slots {
                let child = self.species[idx].make_offspring(
                    &self.config,
                    &mut self.registry,
                    self.next_id,
                    self.generation + 1,
                    &mut self.rng,
                );
                self.next_id += 1;
                offspring.push(child);
            }
        }

        for idx in &non_stagnant {
            self.species[*idx].snapshot_reference();
        }
        // Stagnant species are excluded from reproduction; drop them
        // here rather than waiting for `speciate` to empty them out,
        // so a stagnant species can never be handed a reference
        // organism it never matches against again.
        let surviving_ids: std::collections::HashSet<usize> =
            non_stagnant.iter().map(|&idx| self.species[idx].id).collect();
        self.species.retain(|s| surviving_ids.contains(&s.id));

        self.generation += 1;
        self.speciate(offspring)?;

        tracing::debug!(
            generation = self.generation,
            species = self.species.len(),
            organisms = self.organism_count(),
            "generation advanced"
        );

        Ok(())
    }

    /// Assigns the given pool of organisms to existing or newly
    /// created species. Exposed standalone and used internally after
    /// reproduction.
    pub fn speciate(&mut self, pool: Vec<Organism>) -> Result<(), NeatError> {
        SpeciationEngine::speciate(
            &mut self.species,
            pool,
            &self.config,
            &mut self.next_species_id,
            self.generation,
        );
        let total: usize = self.species.iter().map(|s| s.organisms.len()).sum();
        if total != self.count {
            return Err(NeatError::InvariantViolation(format!(
                "post-speciation organism count {total} does not match population count {}",
                self.count
            )));
        }
        Ok(())
    }

    /// Releases all owned storage. Rust's ownership model already does
    /// this on scope exit; kept as an explicit, self-consuming method
    /// for API symmetry with the rest of the generation loop.
    pub fn dispose(self) {}
}

/// Allots `round(count * species.averageFitness / summedAverageFitness)`
/// offspring per non-stagnant species, then redistributes rounding
/// drift via largest-remainder apportionment so the sum equals `count`
/// exactly.
fn allocate_offspring(
    species: &[Species],
    non_stagnant: &[usize],
    count: usize,
    summed_average_fitness: f64,
) -> Vec<usize> {
    let n = non_stagnant.len();
    if n == 0 {
        return Vec::new();
    }

    if summed_average_fitness <= 0.0 {
        // Zero summedAverageFitness: distribute slots uniformly.
        let base = count / n;
        let remainder = count % n;
        return (0..n)
            .map(|i| base + if i < remainder { 1 } else { 0 })
            .collect();
    }

    let exact: Vec<f64> = non_stagnant
        .iter()
        .map(|&idx| count as f64 * species[idx].average_fitness / summed_average_fitness)
        .collect();

    let mut allocations: Vec<usize> = exact.iter().map(|&x| x.floor() as usize).collect();
    let mut remainders: Vec<(usize, f64)> = exact
        .iter()
        .enumerate()
        .map(|(i, &x)| (i, x - x.floor()))
        .collect();
    remainders.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());

    let mut allocated: usize = allocations.iter().sum();
    let mut cursor = 0;
    while allocated < count {
        let (i, _) = remainders[cursor % remainders.len()];
        allocations[i] += 1;
        allocated += 1;
        cursor += 1;
    }
    while allocated > count {
        let (i, _) = remainders[cursor % remainders.len()];
        if allocations[i] > 0 {
            allocations[i] -= 1;
            allocated -= 1;
        }
        cursor += 1;
    }

    allocations
}
