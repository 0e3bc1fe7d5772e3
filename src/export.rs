//! Sampled example export for external inspection (e.g. in a molecular viewer).

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use flate2::write::GzEncoder;
use flate2::Compression;
use serde::Serialize;

use neighbor_frames::{Frame, NeighborFrames, NeighborParams};

/// Export sampled examples to a JSON file (optionally gzipped).
pub fn export_examples(
    examples: &[NeighborFrames],
    params: &NeighborParams,
    seed: u64,
    path: &Path,
) -> io::Result<()> {
    print!("Exporting to {}... ", path.display());
    let start = Instant::now();

    let data = ExamplesExport {
        metadata: Metadata {
            seed,
            num_examples: examples.len(),
            params,
        },
        examples: examples.iter().map(ExampleData::from).collect(),
    };

    let file = File::create(path)?;

    // Check if we should gzip based on extension
    let is_gzip = path.extension().map(|ext| ext == "gz").unwrap_or(false);

    if is_gzip {
        let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
        serde_json::to_writer(&mut encoder, &data)?;
        encoder.finish()?.flush()?;
    } else {
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, &data)?;
        writer.flush()?;
    }

    println!("{:.1}ms", start.elapsed().as_secs_f64() * 1000.0);
    Ok(())
}

#[derive(Serialize)]
struct ExamplesExport<'a> {
    metadata: Metadata<'a>,
    examples: Vec<ExampleData>,
}

#[derive(Serialize)]
struct Metadata<'a> {
    seed: u64,
    num_examples: usize,
    params: &'a NeighborParams,
}

#[derive(Serialize)]
struct ExampleData {
    zone_id: u64,
    direction_index: usize,
    /// Row-major 4x4 matrices.
    frame_ia: [[f64; 4]; 4],
    frame_ab: [[f64; 4]; 4],
}

impl From<&NeighborFrames> for ExampleData {
    fn from(frames: &NeighborFrames) -> Self {
        Self {
            zone_id: frames.zone_id,
            direction_index: frames.direction_index,
            frame_ia: rows(&frames.frame_ia),
            frame_ab: rows(&frames.frame_ab),
        }
    }
}

fn rows(frame: &Frame) -> [[f64; 4]; 4] {
    frame.transpose().to_cols_array_2d()
}
