mod export;

use std::path::PathBuf;

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use neighbor_frames::util::Timed;
use neighbor_frames::{
    cube_faces, get_neighboring_frames, InMemoryZoneDirectory, NeighborFrames, NeighborParams,
    SamplingError, ZoneCache,
};

/// Sample neighbor-zone coordinate frames from a synthetic grid of zones
#[derive(Parser, Debug)]
#[command(name = "neighbor-frames", version, about)]
struct Cli {
    /// Random seed (worker w uses seed + w)
    #[arg(long)]
    seed: Option<u64>,

    /// Number of examples to sample
    #[arg(long, default_value_t = 1000)]
    samples: usize,

    /// Zones per side of the cubic zone grid
    #[arg(long, default_value_t = 3)]
    zones_per_side: usize,

    /// Edge length of each zone, in Å
    #[arg(long, default_value_t = 10.0)]
    zone_size: f64,

    /// Gap between the home and neighbor images, in Å
    #[arg(long, default_value_t = 1.0)]
    neighbor_padding: f64,

    /// Largest translation applied to the neighbor frame, in Å
    #[arg(long, default_value_t = 1.0)]
    noise_max_distance: f64,

    /// Largest rotation applied to the neighbor frame, in degrees
    #[arg(long, default_value_t = 10.0)]
    noise_max_angle: f64,

    /// Worker threads, each with its own RNG and zone cache (default: all cores)
    #[arg(long)]
    workers: Option<usize>,

    /// Export examples to file (supports .json and .json.gz)
    #[arg(long, value_name = "FILE")]
    export: Option<PathBuf>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let seed = cli.seed.unwrap_or_else(rand::random);
    let workers = cli.workers.unwrap_or_else(rayon::current_num_threads).max(1);

    let directory = InMemoryZoneDirectory::cubic_grid(cli.zones_per_side, cli.zone_size);
    let zone_ids = directory.zone_ids().to_vec();
    let params = NeighborParams::new(
        cube_faces(),
        cli.zone_size + cli.neighbor_padding,
        cli.noise_max_distance,
        cli.noise_max_angle,
    )?;

    println!(
        "Sampling {} examples: seed={}, zones={}, workers={}",
        cli.samples,
        seed,
        zone_ids.len(),
        workers
    );

    let mut timer = Timed::info("Sampling neighbor frames");
    let per_worker: Vec<Vec<(usize, NeighborFrames)>> = (0..workers)
        .into_par_iter()
        .map(|w| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(w as u64));
            let mut cache = ZoneCache::new();
            (w..cli.samples)
                .step_by(workers)
                .map(|i| {
                    get_neighboring_frames(&mut rng, &directory, i, &zone_ids, &params, &mut cache)
                        .map(|frames| (i, frames))
                })
                .collect::<Result<Vec<_>, SamplingError>>()
        })
        .collect::<Result<Vec<_>, SamplingError>>()?;

    let mut examples: Vec<(usize, NeighborFrames)> = per_worker.into_iter().flatten().collect();
    examples.sort_by_key(|(i, _)| *i);
    let examples: Vec<NeighborFrames> = examples.into_iter().map(|(_, f)| f).collect();
    timer.set_count(examples.len());
    drop(timer);

    let mut histogram = vec![0usize; params.direction_candidates().len()];
    for frames in &examples {
        histogram[frames.direction_index] += 1;
    }
    println!("Direction buckets (-x, +x, -y, +y, -z, +z): {:?}", histogram);

    if let Some(path) = cli.export {
        export::export_examples(&examples, &params, seed, &path)?;
    }

    Ok(())
}
