use crate::config::NeatConfig;
use crate::genome::Genome;

/// Computes δ(A, B), the compatibility distance between two genomes,
/// by walking both gene lists (assumed sorted by id) with two cursors.
pub fn compatibility_distance(a: &Genome, b: &Genome, config: &NeatConfig) -> f64 {
    let genes_a = a.genes();
    let genes_b = b.genes();

    let mut i = 0;
    let mut j = 0;
    let mut matching_count = 0usize;
    let mut matching_diff = 0.0;
    let mut disjoint_count = 0usize;
    let mut excess_count = 0usize;

    while i < genes_a.len() && j < genes_b.len() {
        let ga = &genes_a[i];
        let gb = &genes_b[j];
        if ga.id == gb.id {
            matching_count += 1;
            matching_diff += (ga.weight - gb.weight).abs();
            i += 1;
            j += 1;
        } else if ga.id < gb.id {
            disjoint_count += 1;
            i += 1;
        } else {
            disjoint_count += 1;
            j += 1;
        }
    }
    excess_count += genes_a.len() - i;
    excess_count += genes_b.len() - j;

    // N = max(|A|, |B|), per spec §8 scenario 4 ("δ boundary"), which
    // works this normalization out concretely for a 2-gene genome pair
    // with no small-genome carve-out. Floored at 1 only to avoid
    // dividing by zero when both genomes are empty.
    let n = genes_a.len().max(genes_b.len()).max(1) as f64;

    let structural = (config.excess_gene_importance * excess_count as f64
        + config.disjoint_gene_importance * disjoint_count as f64)
        / n;
    let weight_term = config.matching_gene_importance
        * (matching_diff / matching_count.max(1) as f64);

    structural + weight_term
}
