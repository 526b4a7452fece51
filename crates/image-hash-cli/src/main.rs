use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use serde::Serialize;

use image_hash_core::{
    average_hash_from_file, marr_hildreth_hash_from_file, phash_from_file, ImageHash, KernelKind,
    MarrHildrethConfig,
};

#[derive(Parser)]
#[command(name = "image-hash")]
#[command(about = "Perceptual image hashing and comparison")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two images and print per-algorithm mismatch scores
    Compare {
        /// First image file
        image1: PathBuf,

        /// Second image file
        image2: PathBuf,

        /// Algorithm to run
        #[arg(long, value_enum, default_value = "all")]
        algorithm: Algorithm,

        #[command(flatten)]
        marr: MarrArgs,

        /// Emit results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the hash of a single image
    Hash {
        /// Image file
        image: PathBuf,

        /// Algorithm to run
        #[arg(long, value_enum, default_value = "all")]
        algorithm: Algorithm,

        #[command(flatten)]
        marr: MarrArgs,

        /// Emit results as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct MarrArgs {
    /// Scale factor between Marr-Hildreth blur levels
    #[arg(long, default_value_t = 2.0)]
    alpha: f32,

    /// Marr-Hildreth blur level
    #[arg(long, default_value_t = 1.0)]
    scale: f32,

    /// Kernel interpolation for the Marr-Hildreth operator
    #[arg(long, value_enum, default_value = "gaussian")]
    kernel: Kernel,
}

impl MarrArgs {
    fn to_config(&self) -> MarrHildrethConfig {
        MarrHildrethConfig {
            kernel: self.kernel.into(),
            alpha: self.alpha,
            scale: self.scale,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Algorithm {
    All,
    Average,
    Phash,
    MarrHildreth,
}

impl Algorithm {
    fn selected(self) -> Vec<Algorithm> {
        match self {
            Algorithm::All => vec![
                Algorithm::Average,
                Algorithm::Phash,
                Algorithm::MarrHildreth,
            ],
            one => vec![one],
        }
    }

    fn name(self) -> &'static str {
        match self {
            Algorithm::All => "all",
            Algorithm::Average => "average",
            Algorithm::Phash => "phash",
            Algorithm::MarrHildreth => "marr-hildreth",
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Kernel {
    Gaussian,
    Linear,
}

impl From<Kernel> for KernelKind {
    fn from(kernel: Kernel) -> Self {
        match kernel {
            Kernel::Gaussian => KernelKind::Gaussian,
            Kernel::Linear => KernelKind::Linear,
        }
    }
}

#[derive(Serialize)]
struct HashRecord {
    algorithm: &'static str,
    hash: String,
    bits: usize,
}

#[derive(Serialize)]
struct MismatchRecord {
    algorithm: &'static str,
    distance: u32,
    bits: usize,
}

fn hash_file(
    algorithm: Algorithm,
    path: &Path,
    config: &MarrHildrethConfig,
) -> Result<ImageHash, anyhow::Error> {
    let hash = match algorithm {
        Algorithm::Average => average_hash_from_file(path),
        Algorithm::Phash => phash_from_file(path),
        Algorithm::MarrHildreth => marr_hildreth_hash_from_file(path, config),
        Algorithm::All => unreachable!("expanded before hashing"),
    };
    hash.with_context(|| format!("failed to hash {}", path.display()))
}

fn compare(
    image1: &Path,
    image2: &Path,
    algorithm: Algorithm,
    config: &MarrHildrethConfig,
    json: bool,
) -> Result<(), anyhow::Error> {
    let mut records = Vec::new();

    for algo in algorithm.selected() {
        info!("comparing with {}", algo.name());
        let h1 = hash_file(algo, image1, config)?;
        let h2 = hash_file(algo, image2, config)?;
        let distance = h1.distance(&h2)?;
        records.push(MismatchRecord {
            algorithm: algo.name(),
            distance,
            bits: h1.len() * 8,
        });
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        // The lower the mismatch value, the more similar the images.
        for record in &records {
            println!(
                "{:<13} mismatch : {} of {} bits",
                record.algorithm, record.distance, record.bits
            );
        }
    }
    Ok(())
}

fn hash(
    image: &Path,
    algorithm: Algorithm,
    config: &MarrHildrethConfig,
    json: bool,
) -> Result<(), anyhow::Error> {
    let mut records = Vec::new();

    for algo in algorithm.selected() {
        let h = hash_file(algo, image, config)?;
        records.push(HashRecord {
            algorithm: algo.name(),
            bits: h.len() * 8,
            hash: h.to_string(),
        });
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        for record in &records {
            println!("{:<13} : {}", record.algorithm, record.hash);
        }
    }
    Ok(())
}

fn main() -> Result<(), anyhow::Error> {
    // Initialize logger
    env_logger::init();

    // Parse command line arguments
    let cli = Cli::parse();

    match cli.command {
        Commands::Compare {
            image1,
            image2,
            algorithm,
            marr,
            json,
        } => compare(&image1, &image2, algorithm, &marr.to_config(), json),

        Commands::Hash {
            image,
            algorithm,
            marr,
            json,
        } => hash(&image, algorithm, &marr.to_config(), json),
    }
}
