use crate::error::NeatError;
use crate::matrix::WeightMatrix;

/// Runs one forward evaluation of a network.
///
/// Rows are processed in ascending index order, so the network is
/// feed-forward only if every connection satisfies `start < end` in
/// node index space, an invariant the genome/mutation layer guarantees
/// by construction. Returns the full `node_count`-length activation
/// vector; callers slice out `[input_count, input_count + output_count)`
/// for the organism's outputs.
pub fn propagate(
    matrix: &WeightMatrix,
    input_count: usize,
    input: &[f64],
    transfer: &dyn Fn(f64) -> f64,
) -> Result<Vec<f64>, NeatError> {
    if input.len() > input_count {
        return Err(NeatError::InvalidInput(format!(
            "input length {} exceeds input_count {}",
            input.len(),
            input_count
        )));
    }

    let node_count = matrix.node_count();
    let mut activations = vec![0.0; node_count];
    activations[..input.len()].copy_from_slice(input);

    // Input rows are already set from `input` (zero-padded) and carry
    // no incoming enabled genes by construction (§3 Invariant: end must
    // denote a hidden or output node), so their row sum is always 0.
    // Applying `transfer` there would overwrite the inputs with
    // `transfer(0)` before any later row reads them; skip them.
    for row in input_count..node_count {
        let weights = matrix.row(row);
        let sum: f64 = weights
            .iter()
            .zip(activations.iter())
            .map(|(w, a)| w * a)
            .sum();
        activations[row] = transfer(sum);
    }

    Ok(activations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::Genome;
    use crate::innovation::InnovationRegistry;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn rejects_overlong_input() {
        let mut registry = InnovationRegistry::new(3);
        let mut rng = StdRng::seed_from_u64(7);
        let genome = Genome::minimal(2, 1, &mut registry, &mut rng);
        let matrix = WeightMatrix::build(&genome);
        let result = propagate(&matrix, genome.input_count, &[1.0, 2.0, 3.0], &|x| x);
        assert!(matches!(result, Err(NeatError::InvalidInput(_))));
    }

    #[test]
    fn zero_pads_short_input() {
        let mut registry = InnovationRegistry::new(3);
        let mut rng = StdRng::seed_from_u64(7);
        let genome = Genome::minimal(2, 1, &mut registry, &mut rng);
        let matrix = WeightMatrix::build(&genome);
        let outputs = propagate(&matrix, genome.input_count, &[1.0], &|x| x).unwrap();
        assert_eq!(outputs.len(), genome.node_count());
    }

    #[test]
    fn deterministic_for_fixed_inputs() {
        let mut registry = InnovationRegistry::new(3);
        let mut rng = StdRng::seed_from_u64(7);
        let genome = Genome::minimal(2, 1, &mut registry, &mut rng);
        let matrix = WeightMatrix::build(&genome);
        let a = propagate(&matrix, genome.input_count, &[0.5, -0.5], &|x| x.tanh()).unwrap();
        let b = propagate(&matrix, genome.input_count, &[0.5, -0.5], &|x| x.tanh()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn input_rows_are_preserved_not_overwritten() {
        let mut registry = InnovationRegistry::new(3);
        let mut rng = StdRng::seed_from_u64(7);
        let genome = Genome::minimal(2, 1, &mut registry, &mut rng);
        let matrix = WeightMatrix::build(&genome);
        // `transfer` maps everything to 0 except the identity at the
        // inputs; if input rows were (wrongly) passed through
        // `transfer` too, they would come back as 0 instead of the
        // original input values.
        let outputs = propagate(&matrix, genome.input_count, &[0.5, -0.5], &|x| x.tanh()).unwrap();
        assert_eq!(&outputs[0..2], &[0.5, -0.5]);
    }
}
