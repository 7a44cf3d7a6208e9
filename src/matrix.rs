use crate::genome::Genome;

/// Dense row-major `node_count × node_count` weight matrix derived
/// from a genome.
///
/// `matrix[r][c]` equals the weight of the enabled gene with
/// `(start=c, end=r)`, or 0 if no such enabled gene exists. Stored as a
/// flat `Vec<f64>` with row stride `node_count` rather than a matrix
/// crate, since node counts stay small and the access pattern is
/// purely row-at-a-time.
#[derive(Debug, Clone, Default)]
pub struct WeightMatrix {
    data: Vec<f64>,
    node_count: usize,
}

impl WeightMatrix {
    /// Builds (or rebuilds, the operation is idempotent) the matrix
    /// for a genome. Disabled genes are skipped, contributing 0.
    pub fn build(genome: &Genome) -> Self {
        let node_count = genome.node_count();
        let mut data = vec![0.0; node_count * node_count];
        for gene in genome.genes() {
            if !gene.enabled {
                continue;
            }
            let idx = gene.end_node_index * node_count + gene.start_node_index;
            data[idx] = gene.weight;
        }
        Self { data, node_count }
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.node_count + col]
    }

    pub fn row(&self, row: usize) -> &[f64] {
        let start = row * self.node_count;
        &self.data[start..start + self.node_count]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::innovation::InnovationRegistry;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn matches_gene_weights_and_zero_elsewhere() {
        let mut registry = InnovationRegistry::new(3);
        let mut rng = StdRng::seed_from_u64(1);
        let genome = Genome::minimal(2, 1, &mut registry, &mut rng);
        let matrix = WeightMatrix::build(&genome);
        assert_eq!(matrix.node_count(), genome.node_count());
        for gene in genome.genes() {
            assert_eq!(
                matrix.get(gene.end_node_index, gene.start_node_index),
                gene.weight
            );
        }
        assert_eq!(matrix.get(0, 0), 0.0);
    }
}
