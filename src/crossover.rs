use rand::Rng;

use crate::genome::{ConnectionGene, Genome};
use crate::organism::Organism;

/// Produces a child genome from two parents, aligned by innovation id.
///
/// Matching genes inherit a randomly chosen parent's version. Disjoint
/// and excess genes inherit from the more-fit parent only (ties broken
/// uniformly). `node_count` of the child is the max of both parents'.
pub fn crossover(a: &Organism, b: &Organism, rng: &mut impl Rng) -> Genome {
    let (more_fit, less_fit) = if a.fitness > b.fitness {
        (&a.genome, &b.genome)
    } else if b.fitness > a.fitness {
        (&b.genome, &a.genome)
    } else if rng.random_bool(0.5) {
        (&a.genome, &b.genome)
    } else {
        (&b.genome, &a.genome)
    };

    let node_count = more_fit.node_count().max(less_fit.node_count());
    let mut child = Genome::from_raw_genes(
        Vec::new(),
        node_count,
        more_fit.input_count,
        more_fit.output_count,
    );

    let genes_more = more_fit.genes();
    let genes_less = less_fit.genes();
    let mut i = 0;
    let mut j = 0;

    while i < genes_more.len() || j < genes_less.len() {
        let next = match (genes_more.get(i), genes_less.get(j)) {
            (Some(gm), Some(gl)) if gm.id == gl.id => {
                i += 1;
                j += 1;
                Some(inherit_matching(gm, gl, rng))
            }
            (Some(gm), Some(gl)) if gm.id < gl.id => {
                i += 1;
                Some(*gm)
            }
            (Some(_), Some(gl)) => {
                j += 1;
                // disjoint/excess on the less-fit side is dropped;
                // only the more-fit parent's disjoint/excess genes
                // survive.
                let _ = gl;
                None
            }
            (Some(gm), None) => {
                i += 1;
                Some(*gm)
            }
            (None, Some(_)) => {
                j += 1;
                None
            }
            (None, None) => unreachable!(),
        };
        if let Some(gene) = next {
            child.insert_gene(gene);
        }
    }

    child
}

fn inherit_matching(gm: &ConnectionGene, gl: &ConnectionGene, rng: &mut impl Rng) -> ConnectionGene {
    if rng.random_bool(0.5) {
        *gm
    } else {
        *gl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::innovation::InnovationRegistry;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn idempotent_on_identical_parents() {
        let mut registry = InnovationRegistry::new(3);
        let mut rng = StdRng::seed_from_u64(5);
        let genome = Genome::minimal(2, 1, &mut registry, &mut rng);
        let mut a = Organism::new(0, 0, genome.clone());
        let mut b = Organism::new(1, 0, genome);
        a.fitness = 1.0;
        b.fitness = 1.0;

        let child = crossover(&a, &b, &mut rng);
        assert_eq!(child.genes().len(), a.genome.genes().len());
        for (child_gene, parent_gene) in child.genes().iter().zip(a.genome.genes().iter()) {
            assert_eq!(child_gene.id, parent_gene.id);
        }
    }
}
