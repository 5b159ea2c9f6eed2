//! Drives neurodrive populations through a course of falling
//! obstacles.
//!
//! Usage:
//!   trainer train --generations 500 --out champion.ron
//!   trainer replay champion.ron
//!   trainer bench --runs 16
//!
//! Set `RUST_LOG=info` to follow evolution progress.
mod obstacles;
mod settings;

use obstacles::ObstacleField;
use settings::Settings;

use neurodrive::geometry::ObstacleSnapshot;
use neurodrive::logging::{EvolutionLogger, ReportingLevel, Stats};
use neurodrive::{Agent, Controller, Genome, Population, SeedMode};
use neurodrive_nn::DenseNetwork;

use anyhow::{ensure, Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use tracing::info;

use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "trainer")]
#[command(about = "Evolve obstacle-dodging drivers")]
struct Cli {
    /// RON file with population, genetic, simulation,
    /// topology and obstacle settings
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evolve a population and save the best genome
    Train {
        /// Number of generations to evolve
        #[arg(short, long, default_value_t = 2000)]
        generations: usize,
        /// Ticks after which a generation is ended
        #[arg(long, default_value_t = 10_000)]
        max_ticks: usize,
        /// Genome to seed every agent with
        #[arg(short, long)]
        seed: Option<PathBuf>,
        /// Where to save the champion's genome
        #[arg(short, long, default_value = "champion.ron")]
        out: PathBuf,
        /// Generations between progress reports
        #[arg(long, default_value_t = 10)]
        report_every: usize,
    },
    /// Drive a single saved genome, restarting it after every crash
    Replay {
        /// Genome file, as saved by `train`
        genome: PathBuf,
        /// Number of runs to drive
        #[arg(short, long, default_value_t = 5)]
        runs: usize,
        /// Ticks after which a run is ended
        #[arg(long, default_value_t = 10_000)]
        max_ticks: usize,
    },
    /// Run independent trainings in parallel and report their results
    Bench {
        #[arg(short, long, default_value_t = 8)]
        runs: usize,
        #[arg(short, long, default_value_t = 50)]
        generations: usize,
        #[arg(long, default_value_t = 5_000)]
        max_ticks: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Command::Train {
            generations,
            max_ticks,
            seed,
            out,
            report_every,
        } => train(&settings, generations, max_ticks, seed.as_deref(), &out, report_every),
        Command::Replay {
            genome,
            runs,
            max_ticks,
        } => replay(&settings, &genome, runs, max_ticks),
        Command::Bench {
            runs,
            generations,
            max_ticks,
        } => bench(&settings, runs, generations, max_ticks),
    }
}

fn new_population(settings: &Settings, seed: Option<&Genome>) -> Result<Population<DenseNetwork>> {
    let population = match seed {
        Some(genome) => Population::new_seeded(
            genome,
            SeedMode::All,
            settings.population.clone(),
            settings.genetic.clone(),
            settings.simulation.clone(),
            settings.topology.clone(),
        ),
        None => Population::new(
            settings.population.clone(),
            settings.genetic.clone(),
            settings.simulation.clone(),
            settings.topology.clone(),
        ),
    };
    population.context("controller topology does not fit the simulation")
}

/// Runs the population through a fresh obstacle course until
/// extinction. Returns the number of ticks simulated.
///
/// Agents still alive after `max_ticks` are swept off the arena,
/// taking the terminal penalty like everyone else.
fn run_generation(
    population: &mut Population<DenseNetwork>,
    field: &mut ObstacleField,
    max_ticks: usize,
    parallel: bool,
) -> usize {
    field.clear();
    let mut ticks = 0;
    while !population.is_extinct() && ticks < max_ticks {
        field.tick();
        if parallel {
            population.par_update(&field.snapshot());
        } else {
            population.update(&field.snapshot());
        }
        ticks += 1;
    }
    if !population.is_extinct() {
        let sweep = [population.simulation_config().arena()];
        population.update(&ObstacleSnapshot::new(&sweep));
    }
    ticks
}

fn train(
    settings: &Settings,
    generations: usize,
    max_ticks: usize,
    seed: Option<&Path>,
    out: &Path,
    report_every: usize,
) -> Result<()> {
    let seed = seed.map(settings::load_genome).transpose()?;
    let mut population = new_population(settings, seed.as_ref())?;
    let simulation = population.simulation_config().clone();
    let mut field = ObstacleField::new(
        settings.obstacles.clone(),
        simulation.arena_width,
        simulation.arena_height,
    );
    let mut logger = EvolutionLogger::new(ReportingLevel::NoGenomes);

    for _ in 0..generations {
        let ticks = run_generation(&mut population, &mut field, max_ticks, true);
        logger.log(&population, &|a: &Agent<DenseNetwork>| [a.fitness()], ["fitness"]);
        if report_every > 0 && population.generation() % report_every == 0 {
            if let Some(log) = logger.last() {
                info!(ticks, "{}", log);
            }
        }
        population.evolve()?;
    }

    let champion = population
        .champion()
        .context("no generation was evaluated, nothing to save")?;
    settings::save_genome(out, &champion.genome)?;
    println!(
        "Saved champion of generation {} (fitness {:.2}) to {}",
        champion.generation,
        champion.fitness,
        out.display()
    );
    Ok(())
}

fn replay(settings: &Settings, genome: &Path, runs: usize, max_ticks: usize) -> Result<()> {
    let genome = settings::load_genome(genome)?;
    let network = DenseNetwork::from_genome(&settings.topology, &genome)
        .context("genome does not fit the configured topology")?;
    let simulation = &settings.simulation;
    ensure!(
        network.input_count() == simulation.sensor_count(),
        "network takes {} inputs but the sensor fan has {} rays",
        network.input_count(),
        simulation.sensor_count()
    );
    let mut driver = Agent::new(network, simulation);
    let mut field = ObstacleField::new(
        settings.obstacles.clone(),
        simulation.arena_width,
        simulation.arena_height,
    );

    let mut scores = Vec::with_capacity(runs);
    for run in 0..runs {
        field.clear();
        driver.reset(simulation);
        let mut ticks = 0;
        while driver.is_alive() && ticks < max_ticks {
            field.tick();
            driver.update(&field.snapshot(), simulation);
            ticks += 1;
        }
        println!(
            "Run {}: score {:.2} after {} ticks{}",
            run + 1,
            driver.fitness(),
            ticks,
            if driver.is_alive() { " (survived)" } else { "" }
        );
        scores.push(driver.fitness());
    }
    if let Some(stats) = Stats::from(scores.into_iter()) {
        println!("Scores: {:?}", stats);
    }
    Ok(())
}

fn bench(settings: &Settings, runs: usize, generations: usize, max_ticks: usize) -> Result<()> {
    let champions = (0..runs)
        .into_par_iter()
        .map(|run| -> Result<f32> {
            // Decorrelate runs sharing a configured seed.
            let mut settings = settings.clone();
            settings.population.seed = settings.population.seed.map(|s| s.wrapping_add(run as u64));
            settings.obstacles.seed = settings.obstacles.seed.map(|s| s.wrapping_add(run as u64));

            let mut population = new_population(&settings, None)?;
            let mut field = ObstacleField::new(
                settings.obstacles.clone(),
                settings.simulation.arena_width,
                settings.simulation.arena_height,
            );
            for _ in 0..generations {
                run_generation(&mut population, &mut field, max_ticks, false);
                population.evolve()?;
            }
            Ok(population.champion().map_or(f32::NAN, |c| c.fitness))
        })
        .collect::<Result<Vec<f32>>>()?;

    println!(
        "Champion fitness over {} runs of {} generations: {:?}",
        runs,
        generations,
        Stats::from(champions.into_iter().filter(|f| f.is_finite()))
    );
    Ok(())
}
