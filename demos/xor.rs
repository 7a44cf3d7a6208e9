//! Minimal XOR seed. Expectation: within 100 generations, at least one
//! organism reaches fitness >= 3.9.

use neat::{NeatConfig, Population};

const XOR: [([f64; 2], f64); 4] = [
    ([0.0, 0.0], 0.0),
    ([0.0, 1.0], 1.0),
    ([1.0, 0.0], 1.0),
    ([1.0, 1.0], 0.0),
];

fn transfer(x: f64) -> f64 {
    x.tanh()
}

fn xor_fitness(organism: &neat::Organism) -> f64 {
    let mut error = 0.0;
    for (inputs, expected) in &XOR {
        let outputs = organism
            .evaluate(inputs, &transfer)
            .expect("xor inputs never exceed input arity");
        error += (outputs[0] - expected).powi(2);
    }
    (4.0 - error).max(0.0)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = NeatConfig::new(Box::new(transfer), Box::new(xor_fitness));
    let mut population =
        Population::create(150, 2, 1, config, 42).expect("valid configuration");

    for generation in 0..100 {
        population.calculate_fitness();

        if let Some(champion) = population.champion() {
            if champion.fitness >= 3.9 {
                println!(
                    "generation {generation}: champion fitness {:.4}",
                    champion.fitness
                );
                return;
            }
        }

        population
            .cross_mutate_and_speciate()
            .expect("at least one non-stagnant species");
    }

    println!(
        "did not reach target fitness within 100 generations; best: {:?}",
        population.champion().map(|o| o.fitness)
    );
}
