use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::NeatConfig;
use crate::crossover::crossover;
use crate::innovation::InnovationRegistry;
use crate::mutate::mutate;
use crate::organism::Organism;
use crate::similarity::compatibility_distance;

/// A cluster of organisms within δ of a reference organism.
///
/// `reference_organism` is snapshotted from a surviving member
/// (typically the champion) at each generation boundary and used only
/// for the next speciation pass; it is a value, not an owning
/// reference into `organisms`.
#[derive(Debug, Clone)]
pub struct Species {
    pub id: usize,
    pub organisms: Vec<Organism>,
    pub reference_organism: Option<Organism>,
    pub average_fitness: f64,
    pub maximum_fitness: f64,
    pub start_generation: usize,
    pub generation: usize,
    pub last_generation_where_fitness_improved: usize,
}

impl Species {
    pub fn new(id: usize, start_generation: usize, founder: Organism) -> Self {
        Self {
            id,
            reference_organism: Some(founder.clone()),
            organisms: vec![founder],
            average_fitness: 0.0,
            maximum_fitness: 0.0,
            start_generation,
            generation: start_generation,
            last_generation_where_fitness_improved: start_generation,
        }
    }

    /// Does `organism` belong in this species against its current
    /// reference organism?
    pub fn matches(&self, organism: &Organism, config: &NeatConfig) -> bool {
        match &self.reference_organism {
            Some(reference) => {
                compatibility_distance(&organism.genome, &reference.genome, config)
                    < config.similarity_threshold
            }
            None => false,
        }
    }

    /// Recomputes `average_fitness` and `maximum_fitness`; updates
    /// `last_generation_where_fitness_improved` only on a strict
    /// increase.
    pub fn update_statistics(&mut self, generation: usize) {
        self.generation = generation;
        if self.organisms.is_empty() {
            self.average_fitness = 0.0;
            return;
        }
        let total: f64 = self.organisms.iter().map(|o| o.fitness).sum();
        self.average_fitness = total / self.organisms.len() as f64;

        let best = self
            .organisms
            .iter()
            .fold(f64::NEG_INFINITY, |acc, o| acc.max(o.fitness));
        if best > self.maximum_fitness {
            self.maximum_fitness = best;
            self.last_generation_where_fitness_improved = generation;
        }
    }

    pub fn is_stagnant(&self, generation: usize, generations_before_stagnation: usize) -> bool {
        generation.saturating_sub(self.last_generation_where_fitness_improved)
            >= generations_before_stagnation
    }

    pub fn champion(&self) -> Option<&Organism> {
        self.organisms
            .iter()
            .max_by(|a, b| a.fitness.partial_cmp(&b.fitness).unwrap())
    }

    /// Culls the lowest-fitness `organism_culling_rate * len` members,
    /// always retaining at least the champion.
    pub fn cull(&mut self, culling_rate: f64) {
        if self.organisms.len() <= 1 {
            return;
        }
        self.organisms
            .sort_by(|a, b| b.fitness.partial_cmp(&a.fitness).unwrap());
        let cull_count = ((self.organisms.len() as f64 * culling_rate).floor() as usize)
            .min(self.organisms.len() - 1);
        self.organisms.truncate(self.organisms.len() - cull_count);
    }

    /// Snapshots a surviving member (the champion) as the reference
    /// organism for the next speciation pass.
    pub fn snapshot_reference(&mut self) {
        self.reference_organism = self.champion().cloned();
    }

    /// Produces one offspring via crossover-then-mutate or
    /// clone-then-mutate.
    pub fn make_offspring(
        &self,
        config: &NeatConfig,
        registry: &mut InnovationRegistry,
        next_id: usize,
        generation: usize,
        rng: &mut impl Rng,
    ) -> Organism {
        let mut child = if self.organisms.len() >= 2
            && rng.random::<f64>() < config.mating_with_crossover_chance
        {
            let mut survivors: Vec<&Organism> = self.organisms.iter().collect();
            survivors.shuffle(rng);
            let (p1, p2) = (survivors[0], survivors[1]);
            let genome = crossover(p1, p2, rng);
            Organism::new(next_id, generation, genome)
        } else {
            let parent = self.organisms.choose(rng).expect("species has no organisms");
            Organism::new(next_id, generation, parent.genome.clone())
        };
        mutate(&mut child, config, registry, rng);
        child
    }
}

/// Assigns every organism in `pool` to an existing compatible species
/// (by reference organism, in species order) or creates a new species.
pub struct SpeciationEngine;

impl SpeciationEngine {
    pub fn speciate(
        species: &mut Vec<Species>,
        pool: Vec<Organism>,
        config: &NeatConfig,
        next_species_id: &mut usize,
        generation: usize,
    ) {
        for specie in species.iter_mut() {
            specie.organisms.clear();
        }

        for mut organism in pool {
            let mut placed = false;
            for specie in species.iter_mut() {
                if specie.matches(&organism, config) {
                    organism.parent_species = Some(specie.id);
                    specie.organisms.push(organism);
                    placed = true;
                    break;
                }
            }
            if !placed {
                let id = *next_species_id;
                *next_species_id += 1;
                organism.parent_species = Some(id);
                species.push(Species::new(id, generation, organism));
            }
        }

        species.retain(|s| !s.organisms.is_empty());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::Genome;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn test_config() -> NeatConfig {
        NeatConfig::new(Box::new(|x| x.tanh()), Box::new(|_| 0.0))
    }

    #[test]
    fn stagnation_threshold() {
        let mut registry = InnovationRegistry::new(3);
        let mut rng = StdRng::seed_from_u64(11);
        let genome = Genome::minimal(2, 1, &mut registry, &mut rng);
        let organism = Organism::new(0, 0, genome);
        let mut species = Species::new(0, 0, organism);
        species.maximum_fitness = 1.0;
        species.last_generation_where_fitness_improved = 0;

        assert!(!species.is_stagnant(4, 5));
        assert!(species.is_stagnant(5, 5));
    }

    #[test]
    fn speciation_matches_reference_threshold() {
        let mut registry = InnovationRegistry::new(3);
        let mut rng = StdRng::seed_from_u64(13);
        let config = test_config();
        let genome = Genome::minimal(2, 1, &mut registry, &mut rng);
        let founder = Organism::new(0, 0, genome);
        let mut species = vec![Species::new(0, 0, founder.clone())];
        let mut next_id = 1;

        let pool = vec![founder.clone(), Organism::new(1, 0, founder.genome.clone())];
        SpeciationEngine::speciate(&mut species, pool, &config, &mut next_id, 0);
        assert_eq!(species.len(), 1);
        assert_eq!(species[0].organisms.len(), 2);
    }
}
