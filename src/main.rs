use std::time::{Duration, Instant};

use life_rust::grid::{BoardId, Grid, GridDims, COLS, GENERATIONS, ROWS, WARMUP_GENERATIONS};
use life_rust::implementations::safe::rayon::rayon_parallel;
use life_rust::implementations::safe::single::sequential_game_of_life;
use life_rust::implementations::unsafe_impl::barrier_unsafe::barrier_parallel;
use life_rust::{LifeError, SimulationConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const BENCH_ITERATIONS: usize = 7;
const BENCH_WARMUP: usize = 2;
const LIVE_DENSITY: f64 = 0.35;
const SEED: u64 = 0x5EED_1234_ABCD_EF01;

type Kernel = Box<dyn Fn(&mut Grid, &mut Grid, usize) -> Result<BoardId, LifeError>>;

fn main() {
    // コマンドライン引数でスレッド数を指定可能（なければ LIFE_THREADS）
    let args: Vec<String> = std::env::args().collect();
    let config = match args.get(1) {
        Some(arg) => match arg.parse::<usize>() {
            Ok(n) if n >= 1 => SimulationConfig::default().worker_count(n),
            _ => {
                eprintln!("error: worker count must be a positive integer");
                std::process::exit(1);
            }
        },
        None => SimulationConfig::from_env(),
    };

    rayon::ThreadPoolBuilder::new()
        .num_threads(config.worker_count)
        .build_global()
        .unwrap_or_else(|e| eprintln!("warning: rayon pool already configured: {e}"));

    let dims = GridDims::new(ROWS, COLS);
    let seed = seeded_board(dims);

    println!("=== Game of Life benchmark ===");
    println!(
        "board: {}x{}, generations: {}, iterations: {}, workers: {}\n",
        ROWS, COLS, GENERATIONS, BENCH_ITERATIONS, config.worker_count
    );

    let kernels: Vec<(&str, Kernel)> = vec![
        ("Sequential", Box::new(sequential_game_of_life) as Kernel),
        (
            "Barrier",
            Box::new(move |out: &mut Grid, inb: &mut Grid, gens: usize| {
                barrier_parallel(out, inb, gens, &config)
            }) as Kernel,
        ),
        ("Rayon", Box::new(rayon_parallel) as Kernel),
    ];

    let mut populations = Vec::new();
    for (name, kernel) in &kernels {
        match run_benchmark(name, &seed, kernel) {
            Ok(population) => populations.push((name, population)),
            Err(e) => {
                eprintln!("error: {name} failed: {e}");
                std::process::exit(1);
            }
        }
    }

    let reference = populations[0].1;
    for (name, population) in &populations {
        let status = if *population == reference { "MATCH" } else { "MISMATCH" };
        println!("{name}: population {population} [{status}]");
    }

    println!("\n=== benchmark complete ===");
}

fn seeded_board(dims: GridDims) -> Grid {
    let mut rng = StdRng::seed_from_u64(SEED);
    let mut grid = Grid::new(dims);
    for i in 0..dims.rows {
        for j in 0..dims.cols {
            grid.set(i, j, rng.gen_bool(LIVE_DENSITY));
        }
    }
    grid
}

fn run_benchmark(name: &str, seed: &Grid, kernel: &Kernel) -> Result<usize, LifeError> {
    println!("{}:", name);

    let run = |gens: usize| -> Result<(Duration, usize), LifeError> {
        let mut inboard = seed.clone();
        let mut outboard = Grid::new(seed.dims);
        let start = Instant::now();
        let last = kernel(&mut outboard, &mut inboard, gens)?;
        let elapsed = start.elapsed();
        Ok((elapsed, last.select(&outboard, &inboard).population()))
    };

    for _ in 0..BENCH_WARMUP {
        run(WARMUP_GENERATIONS)?;
    }

    let mut times = Vec::with_capacity(BENCH_ITERATIONS);
    let mut population = 0;
    for i in 0..BENCH_ITERATIONS {
        let (duration, pop) = run(GENERATIONS)?;
        population = pop;
        times.push(duration);
        println!("  run {:2}: {:?}", i + 1, duration);
    }

    times.sort();
    let median = times[BENCH_ITERATIONS / 2];
    let avg = times.iter().sum::<Duration>() / BENCH_ITERATIONS as u32;
    println!("  ---");
    println!("  min:    {:?}", times[0]);
    println!("  median: {:?}", median);
    println!("  avg:    {:?}", avg);
    println!("  max:    {:?}", times[BENCH_ITERATIONS - 1]);
    println!();

    Ok(population)
}
