use neurodrive::geometry::{ObstacleSnapshot, Rect};
use neurodrive::{
    Agent, Controller, EvolutionError, GeneticConfig, Genome, Population, PopulationConfig,
    SeedMode, SimulationConfig,
};
use neurodrive_nn::layout::TensorId;
use neurodrive_nn::{DenseNetwork, Topology};

use rand::{rngs::StdRng, SeedableRng};

use std::num::NonZeroUsize;

const ARENA: [Rect; 1] = [Rect::new(0.0, 0.0, 800.0, 600.0)];

fn population_config(size: usize) -> PopulationConfig {
    PopulationConfig {
        size: NonZeroUsize::new(size).unwrap(),
        seed: Some(1234),
        ..PopulationConfig::default()
    }
}

/// A genome whose network ignores its inputs and always
/// answers `steer = 0, throttle = 1`.
fn full_throttle_genome(topology: &Topology) -> Genome {
    let layout = topology.layout();
    let mut genes = vec![0.0; layout.len()];
    genes[layout.spec(TensorId::OutputBias).offset + 1] = 20.0;
    Genome::new(genes)
}

fn seeded_driver(genome: &Genome) -> Population<DenseNetwork> {
    Population::new_seeded(
        genome,
        SeedMode::Single,
        population_config(1),
        GeneticConfig::default(),
        SimulationConfig::default(),
        Topology::default(),
    )
    .unwrap()
}

#[test]
fn constant_full_throttle_scores_max_speed_per_tick() {
    let topology = Topology::default();
    let mut population = seeded_driver(&full_throttle_genome(&topology));
    let config = population.simulation_config().clone();

    for t in 1..=80 {
        population.update(&ObstacleSnapshot::empty());
        let driver = population.best_agent().expect("driver died before the boundary");
        assert_eq!(driver.fitness(), config.max_speed * t as f32);
        assert_eq!(driver.position().y, config.spawn_point.y);
    }

    // Crossing the right wall.
    population.update(&ObstacleSnapshot::empty());
    assert!(population.is_extinct());
}

#[test]
fn stationary_driver_reads_distance_ahead() {
    let topology = Topology::default();
    let mut population = seeded_driver(&Genome::zeros(DenseNetwork::genome_len(&topology)));
    let config = population.simulation_config().clone();
    let distance = 75.0;
    let obstacle = [Rect::new(
        config.spawn_point.x + distance,
        config.spawn_point.y - 50.0,
        20.0,
        100.0,
    )];

    population.update(&ObstacleSnapshot::new(&obstacle));

    let driver = population.best_agent().unwrap();
    assert_eq!(driver.position(), config.spawn_point);
    let forward = config
        .sensor_angles
        .iter()
        .position(|a| *a == 0.0)
        .unwrap();
    assert!((driver.readings()[forward].distance - distance).abs() < 1e-3);
    let danger = driver.sensor_inputs(&config)[forward];
    assert!((danger - (1.0 - distance / config.sensor_range)).abs() < 1e-5);
}

#[test]
fn covering_obstacle_drives_population_extinct() {
    let mut population = Population::<DenseNetwork>::new(
        population_config(30),
        GeneticConfig::default(),
        SimulationConfig::default(),
        Topology::default(),
    )
    .unwrap();

    let mut ticks = 0;
    while !population.is_extinct() {
        population.update(&ObstacleSnapshot::new(&ARENA));
        ticks += 1;
        assert!(ticks < 100);
    }
    for _ in 0..10 {
        population.update(&ObstacleSnapshot::empty());
        assert!(population.is_extinct());
        assert!(population.best_agent().is_none());
    }
    assert_eq!(
        population.evolve(),
        Ok(()),
        "extinct population failed to evolve"
    );
    assert_eq!(population.alive_count(), 30);
}

#[test]
fn best_genome_survives_evolution_unchanged() {
    let mut population = Population::<DenseNetwork>::new(
        PopulationConfig {
            elitism: 1,
            ..population_config(40)
        },
        GeneticConfig {
            gene_mutation_chance: 0.5,
            ..GeneticConfig::default()
        },
        SimulationConfig::default(),
        Topology::default(),
    )
    .unwrap();
    let obstacles = [
        Rect::new(500.0, 250.0, 40.0, 100.0),
        Rect::new(250.0, 100.0, 60.0, 60.0),
    ];

    for generation in 0..3 {
        for _ in 0..200 {
            population.update(&ObstacleSnapshot::new(&obstacles));
        }
        population.update(&ObstacleSnapshot::new(&ARENA));
        assert!(population.is_extinct());

        let best_fitness = population
            .agents()
            .map(Agent::fitness)
            .fold(f32::NEG_INFINITY, f32::max);
        let best_genomes: Vec<Genome> = population
            .agents()
            .filter(|a| a.fitness() == best_fitness)
            .map(Agent::genome)
            .collect();

        population.evolve().unwrap();

        assert_eq!(population.generation(), generation + 1);
        assert!(population
            .agents()
            .any(|a| best_genomes.contains(&a.genome())));
        assert!(population.champion().unwrap().fitness >= best_fitness);
    }
}

#[test]
fn generation_counter_increases_by_one() {
    let mut population = Population::<DenseNetwork>::new(
        population_config(10),
        GeneticConfig::default(),
        SimulationConfig::default(),
        Topology::default(),
    )
    .unwrap();

    assert_eq!(
        population.evolve(),
        Err(EvolutionError::NotExtinct { alive: 10 })
    );
    for generation in 1..=4 {
        population.update(&ObstacleSnapshot::new(&ARENA));
        population.evolve().unwrap();
        assert_eq!(population.generation(), generation);
    }
}

#[test]
fn restored_controller_drives_identically() {
    let config = SimulationConfig::default();
    let topology = Topology::default();
    let network = DenseNetwork::new(&topology, &mut StdRng::seed_from_u64(99));
    let restored = DenseNetwork::from_genome(&topology, &network.genome()).unwrap();
    let mut original = Agent::new(network, &config);
    let mut copy = Agent::new(restored, &config);
    let obstacles = [Rect::new(550.0, 200.0, 30.0, 200.0)];

    for _ in 0..150 {
        original.update(&ObstacleSnapshot::new(&obstacles), &config);
        copy.update(&ObstacleSnapshot::new(&obstacles), &config);
        assert_eq!(original.position(), copy.position());
        assert_eq!(original.fitness(), copy.fitness());
        assert_eq!(original.is_alive(), copy.is_alive());
    }
}

#[test]
fn mismatched_sensor_fan_is_rejected() {
    let result = Population::<DenseNetwork>::new(
        population_config(5),
        GeneticConfig::default(),
        SimulationConfig {
            sensor_angles: vec![-45.0, 0.0, 45.0],
            ..SimulationConfig::default()
        },
        Topology::default(),
    );
    assert!(result.is_err());
}

#[cfg(feature = "parallel")]
#[test]
fn parallel_update_matches_sequential() {
    let make = || {
        Population::<DenseNetwork>::new(
            population_config(64),
            GeneticConfig::default(),
            SimulationConfig::default(),
            Topology::default(),
        )
        .unwrap()
    };
    let (mut sequential, mut parallel) = (make(), make());
    let obstacles = [Rect::new(480.0, 220.0, 50.0, 160.0)];

    for _ in 0..100 {
        sequential.update(&ObstacleSnapshot::new(&obstacles));
        parallel.par_update(&ObstacleSnapshot::new(&obstacles));
    }
    for (a, b) in sequential.agents().zip(parallel.agents()) {
        assert_eq!(a.position(), b.position());
        assert_eq!(a.fitness(), b.fitness());
    }
}
