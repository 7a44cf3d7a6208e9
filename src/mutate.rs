use rand::Rng;

use crate::config::NeatConfig;
use crate::genome::{ConnectionGene, Genome, WEIGHT_SAMPLE_RANGE};
use crate::innovation::InnovationRegistry;
use crate::organism::Organism;

/// Applies all four mutation operators to an organism per their
/// independent Bernoulli trials, rebuilding the weight matrix if any
/// structural mutation fired.
pub fn mutate(
    organism: &mut Organism,
    config: &NeatConfig,
    registry: &mut InnovationRegistry,
    rng: &mut impl Rng,
) {
    let mut structural = false;

    if rng.random::<f64>() < config.add_connection_mutation_chance {
        structural |= add_connection(&mut organism.genome, registry, rng);
    }
    if rng.random::<f64>() < config.add_node_mutation_chance {
        structural |= add_node(&mut organism.genome, registry, rng);
    }

    perturb_and_replace_weights(&mut organism.genome, config, rng);

    if structural {
        organism.rebuild_matrix();
        tracing::trace!(organism_id = organism.id, "structural mutation rebuilt matrix");
    }
}

/// Adds a random new connection gene: picks `start < end` with `start`
/// not in the output range and `end` not in the input range. If the
/// pair already exists as a disabled gene, re-enables it (reusing its
/// innovation id); otherwise draws a fresh weight and a fresh
/// innovation id.
fn add_connection(
    genome: &mut Genome,
    registry: &mut InnovationRegistry,
    rng: &mut impl Rng,
) -> bool {
    let node_count = genome.node_count();
    let input_count = genome.input_count;
    let output_end = input_count + genome.output_count;

    // `start` must be an input or hidden node: index < node_count and
    // not in [input_count, output_end) would wrongly exclude valid
    // hidden starts; the real constraint is simply "not an output
    // node", i.e. start is in [0, input_count) ∪ [output_end, node_count).
    let mut candidates = Vec::new();
    for start in (0..input_count).chain(output_end..node_count) {
        for end in input_count..node_count {
            if start == end {
                continue;
            }
            if start >= end {
                continue;
            }
            if genome.has_connection(start, end) {
                continue;
            }
            candidates.push((start, end));
        }
    }

    if candidates.is_empty() {
        return false;
    }

    let (start, end) = candidates[rng.random_range(0..candidates.len())];
    let id = registry.get_or_assign(start, end);
    let weight = rng.random_range(WEIGHT_SAMPLE_RANGE.0..WEIGHT_SAMPLE_RANGE.1);
    genome.insert_gene(ConnectionGene::new(id, start, end, weight));
    true
}

/// Splits a random enabled gene `a -> b` into `a -> h` (weight 1) and
/// `h -> b` (weight = original), disabling the original. The new
/// hidden node's index is strictly greater than any existing index
/// (guaranteed by [`InnovationRegistry::new_node`]), preserving the
/// feed-forward ordering invariant.
fn add_node(genome: &mut Genome, registry: &mut InnovationRegistry, rng: &mut impl Rng) -> bool {
    let enabled_indices: Vec<usize> = genome
        .genes()
        .iter()
        .enumerate()
        .filter(|(_, g)| g.enabled)
        .map(|(idx, _)| idx)
        .collect();
    if enabled_indices.is_empty() {
        return false;
    }

    let chosen_idx = enabled_indices[rng.random_range(0..enabled_indices.len())];
    let split = genome.genes()[chosen_idx];

    if let Some(gene) = genome.gene_mut(split.id) {
        gene.enabled = false;
    }

    let hidden = genome.allocate_hidden_node(registry);

    let in_id = registry.get_or_assign(split.start_node_index, hidden);
    let out_id = registry.get_or_assign(hidden, split.end_node_index);

    genome.insert_gene(ConnectionGene::new(in_id, split.start_node_index, hidden, 1.0));
    genome.insert_gene(ConnectionGene::new(out_id, hidden, split.end_node_index, split.weight));
    genome.set_node_count(hidden + 1);
    true
}

/// Perturbs and replaces gene weights. The two trials are drawn
/// independently per gene, so a single gene can both be nudged and
/// then overwritten with a fresh random weight in the same pass.
fn perturb_and_replace_weights(genome: &mut Genome, config: &NeatConfig, rng: &mut impl Rng) {
    for gene in genome.genes().to_vec() {
        let id = gene.id;
        if rng.random::<f64>() < config.weight_mutation_chance {
            let delta = rng.random_range(-0.5..0.5);
            if let Some(g) = genome.gene_mut(id) {
                g.weight += delta;
            }
        }
        if rng.random::<f64>() < config.new_weight_mutation_chance {
            let weight = rng.random_range(WEIGHT_SAMPLE_RANGE.0..WEIGHT_SAMPLE_RANGE.1);
            if let Some(g) = genome.gene_mut(id) {
                g.weight = weight;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn test_config() -> NeatConfig {
        NeatConfig::new(Box::new(|x| x.tanh()), Box::new(|_| 0.0))
    }

    #[test]
    fn add_node_splits_and_preserves_matrix_shape() {
        let mut registry = InnovationRegistry::new(3);
        let mut rng = StdRng::seed_from_u64(42);
        let genome = Genome::minimal(2, 1, &mut registry, &mut rng);
        let mut organism = Organism::new(0, 0, genome);
        let split_gene = organism.genome.genes()[0];

        let mutated = add_node(&mut organism.genome, &mut registry, &mut rng);
        assert!(mutated);
        organism.rebuild_matrix();

        let original = organism
            .genome
            .genes()
            .iter()
            .find(|g| g.id == split_gene.id)
            .unwrap();
        assert!(!original.enabled);
        organism.genome.check_invariants().unwrap();
    }

    #[test]
    fn mutations_never_violate_invariants() {
        let mut registry = InnovationRegistry::new(3);
        let mut rng = StdRng::seed_from_u64(99);
        let genome = Genome::minimal(2, 1, &mut registry, &mut rng);
        let mut organism = Organism::new(0, 0, genome);
        let config = test_config();
        for _ in 0..200 {
            mutate(&mut organism, &config, &mut registry, &mut rng);
            organism.genome.check_invariants().unwrap();
        }
    }
}
