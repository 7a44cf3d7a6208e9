use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::NeatError;
use crate::innovation::InnovationRegistry;

/// One directed, weighted edge between two nodes.
///
/// Disabled genes still occupy an innovation slot and participate in
/// gene alignment, but contribute nothing to the weight matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConnectionGene {
    pub id: usize,
    pub enabled: bool,
    pub start_node_index: usize,
    pub end_node_index: usize,
    pub weight: f64,
}

impl ConnectionGene {
    pub fn new(id: usize, start: usize, end: usize, weight: f64) -> Self {
        Self {
            id,
            enabled: true,
            start_node_index: start,
            end_node_index: end,
            weight,
        }
    }
}

/// A genome: an ordered list of connection genes plus the node count
/// they index into. Immutable identity is keyed by innovation ids.
///
/// `genes` is kept sorted by `id` ascending at all times, since both
/// the matrix build and the compatibility-distance walk depend on that
/// order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genome {
    genes: Vec<ConnectionGene>,
    node_count: usize,
    pub input_count: usize,
    pub output_count: usize,
}

/// Sampling range for freshly drawn weights, used both when a new
/// connection is added and when a weight is replaced outright.
pub const WEIGHT_SAMPLE_RANGE: (f64, f64) = (-1.0, 1.0);

impl Genome {
    /// Builds the minimal seed genome: every input wired directly to
    /// every output, fully connected, no hidden nodes.
    pub fn minimal(
        input_count: usize,
        output_count: usize,
        registry: &mut InnovationRegistry,
        rng: &mut impl Rng,
    ) -> Self {
        let node_count = input_count + output_count;
        let mut genes = Vec::with_capacity(input_count * output_count);
        for start in 0..input_count {
            for end in input_count..node_count {
                let id = registry.get_or_assign(start, end);
                let weight = rng.random_range(WEIGHT_SAMPLE_RANGE.0..WEIGHT_SAMPLE_RANGE.1);
                genes.push(ConnectionGene::new(id, start, end, weight));
            }
        }
        genes.sort_by_key(|g| g.id);
        Self {
            genes,
            node_count,
            input_count,
            output_count,
        }
    }

    /// Builds a genome directly from an explicit gene list, sorting by
    /// id. Used by tests that need to construct precise gene layouts
    /// without going through mutation/crossover.
    #[cfg(test)]
    pub(crate) fn from_raw_genes(
        mut genes: Vec<ConnectionGene>,
        node_count: usize,
        input_count: usize,
        output_count: usize,
    ) -> Self {
        genes.sort_by_key(|g| g.id);
        Self {
            genes,
            node_count,
            input_count,
            output_count,
        }
    }

    pub fn genes(&self) -> &[ConnectionGene] {
        &self.genes
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Checks that no two enabled genes share (start, end) and that
    /// every gene obeys feed-forward node ordering.
    pub fn check_invariants(&self) -> Result<(), NeatError> {
        let mut seen = std::collections::HashSet::new();
        for gene in &self.genes {
            if !gene.enabled {
                continue;
            }
            if !seen.insert((gene.start_node_index, gene.end_node_index)) {
                return Err(NeatError::InvariantViolation(format!(
                    "duplicate enabled connection ({}, {})",
                    gene.start_node_index, gene.end_node_index
                )));
            }
            if gene.start_node_index >= gene.end_node_index {
                return Err(NeatError::InvariantViolation(format!(
                    "gene {} violates feed-forward ordering: {} >= {}",
                    gene.id, gene.start_node_index, gene.end_node_index
                )));
            }
        }
        if self.node_count < self.input_count + self.output_count {
            return Err(NeatError::InvariantViolation(
                "node_count is smaller than input_count + output_count".into(),
            ));
        }
        Ok(())
    }

    /// Inserts a gene, keeping `genes` sorted by id. Used by mutation
    /// and crossover so every call site preserves the ordering
    /// invariant the rest of the engine relies on.
    pub(crate) fn insert_gene(&mut self, gene: ConnectionGene) {
        match self.genes.binary_search_by_key(&gene.id, |g| g.id) {
            Ok(idx) => self.genes[idx] = gene,
            Err(idx) => self.genes.insert(idx, gene),
        }
    }

    pub(crate) fn gene_mut(&mut self, id: usize) -> Option<&mut ConnectionGene> {
        self.genes
            .binary_search_by_key(&id, |g| g.id)
            .ok()
            .map(move |idx| &mut self.genes[idx])
    }

    pub(crate) fn has_connection(&self, start: usize, end: usize) -> bool {
        self.genes
            .iter()
            .any(|g| g.start_node_index == start && g.end_node_index == end)
    }

    pub(crate) fn allocate_hidden_node(&mut self, registry: &mut InnovationRegistry) -> usize {
        let id = registry.new_node();
        self.node_count = self.node_count.max(id + 1);
        id
    }

    pub(crate) fn set_node_count(&mut self, node_count: usize) {
        self.node_count = self.node_count.max(node_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn minimal_genome_is_fully_connected_and_sorted() {
        let mut registry = InnovationRegistry::new(3);
        let mut rng = StdRng::seed_from_u64(42);
        let genome = Genome::minimal(2, 1, &mut registry, &mut rng);
        assert_eq!(genome.genes().len(), 2);
        assert!(genome.genes().windows(2).all(|w| w[0].id < w[1].id));
        genome.check_invariants().unwrap();
    }
}
