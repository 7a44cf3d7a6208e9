use bincode::config::standard;
use neat::genome::Genome;
use neat::innovation::InnovationRegistry;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Exercises the `serde` derives on `Genome`/`ConnectionGene` through
/// `bincode`, the teacher's persistence crate of choice. The engine
/// itself performs no I/O; this is a caller-facing capability only.
#[test]
fn genome_survives_a_bincode_roundtrip() {
    let mut registry = InnovationRegistry::new(3);
    let mut rng = StdRng::seed_from_u64(42);
    let genome = Genome::minimal(2, 1, &mut registry, &mut rng);

    let bytes = bincode::serde::encode_to_vec(&genome, standard()).unwrap();
    let (decoded, _): (Genome, usize) =
        bincode::serde::decode_from_slice(&bytes, standard()).unwrap();

    assert_eq!(decoded.node_count(), genome.node_count());
    assert_eq!(decoded.genes(), genome.genes());
}
