//! Anneals 50 cities placed on a circle in a 10x10 map and prints the best
//! tour found.
//!
//! Run with `RUST_LOG=debug cargo run --example circle` to see every
//! temperature step.

use tsp_anneal::{solve_with_observer, AnnealConfig, ProblemInstance};

const CITY_COUNT: usize = 50;
const MAP_SIZE: f64 = 10.0;

fn main() -> tsp_anneal::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let instance = ProblemInstance::circle(CITY_COUNT, MAP_SIZE)?;
    let config = AnnealConfig::new(100, 10.0, 2.0);

    let solution = solve_with_observer(instance, &config, |status| {
        if status.k % 10 == 0 {
            log::info!("Iteration #{}, Best Score={},{}", status.k, status.best_score, status);
        }
    })?;

    println!("{:?}", solution.tour);
    Ok(())
}
