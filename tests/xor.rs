use neat::{NeatConfig, Organism, Population};

const XOR: [([f64; 2], f64); 4] = [
    ([0.0, 0.0], 0.0),
    ([0.0, 1.0], 1.0),
    ([1.0, 0.0], 1.0),
    ([1.0, 1.0], 0.0),
];

fn transfer(x: f64) -> f64 {
    x.tanh()
}

fn xor_fitness(organism: &Organism) -> f64 {
    let mut error = 0.0;
    for (inputs, expected) in &XOR {
        let outputs = organism.evaluate(inputs, &transfer).unwrap();
        error += (outputs[0] - expected).powi(2);
    }
    (4.0 - error).max(0.0)
}

#[test]
fn xor_converges_within_a_hundred_generations() {
    let config = NeatConfig::new(Box::new(transfer), Box::new(xor_fitness));
    let mut population = Population::create(150, 2, 1, config, 7).unwrap();

    let mut best = 0.0;
    for _ in 0..100 {
        population.calculate_fitness();
        if let Some(champion) = population.champion() {
            best = champion.fitness;
            if best >= 3.9 {
                break;
            }
        }
        if population.cross_mutate_and_speciate().is_err() {
            break;
        }
    }

    assert!(best >= 3.9, "best fitness after 100 generations was {best}");
}

#[test]
fn population_organism_count_is_invariant_across_generations() {
    let config = NeatConfig::new(Box::new(transfer), Box::new(xor_fitness));
    let mut population = Population::create(60, 2, 1, config, 11).unwrap();

    for _ in 0..10 {
        population.calculate_fitness();
        assert_eq!(population.organism_count(), 60);
        if population.cross_mutate_and_speciate().is_err() {
            break;
        }
        assert_eq!(population.organism_count(), 60);
    }
}
