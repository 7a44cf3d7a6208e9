use std::collections::HashMap;

use petgraph::stable_graph::{NodeIndex, StableGraph};

use crate::genome::Genome;

/// Projects a genome's enabled connections onto a [`petgraph`]
/// `StableGraph`. Purely a debugging/inspection aid; the core engine
/// has no dependency on this module.
pub fn to_petgraph(genome: &Genome) -> StableGraph<usize, f64> {
    let mut graph = StableGraph::new();
    let mut node_index: HashMap<usize, NodeIndex> = HashMap::new();

    for gene in genome.genes() {
        for node_id in [gene.start_node_index, gene.end_node_index] {
            node_index
                .entry(node_id)
                .or_insert_with(|| graph.add_node(node_id));
        }
    }

    for gene in genome.genes() {
        if !gene.enabled {
            continue;
        }
        let start = node_index[&gene.start_node_index];
        let end = node_index[&gene.end_node_index];
        graph.add_edge(start, end, gene.weight);
    }

    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::innovation::InnovationRegistry;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn graph_has_one_edge_per_enabled_gene() {
        let mut registry = InnovationRegistry::new(3);
        let mut rng = StdRng::seed_from_u64(21);
        let genome = Genome::minimal(2, 1, &mut registry, &mut rng);
        let graph = to_petgraph(&genome);
        assert_eq!(graph.edge_count(), genome.genes().len());
    }
}
