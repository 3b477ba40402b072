use std::{io::Write, path::PathBuf, time::Instant};

use anyhow::Result;
use clap::{ArgAction, Parser};
use pgenview::{Chunks, Fileset, GenotypeValue, Layout, MetadataConfig, ReaderConfig};

#[derive(Parser)]
struct Args {
    /// Fileset prefix ({prefix}.pgen, {prefix}.pvar, {prefix}.psam)
    #[clap(default_value = "plink2")]
    prefix: PathBuf,
    /// Variants per window
    #[clap(long, default_value_t = 32)]
    variant_chunk: u32,
    /// Samples per window
    #[clap(long, default_value_t = 64)]
    sample_chunk: u32,
    /// Read four packed calls per byte instead of one call per byte
    #[clap(long)]
    packed: bool,
    /// Increase log verbosity
    #[clap(short = 'v', long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    if let Err(e) = env_logger::Builder::new()
        .filter_level(level)
        .target(env_logger::Target::Stderr)
        .format(|buf, record| {
            let level = record.level().as_str().to_lowercase();
            writeln!(buf, "[pgenview {level:>5}] {}", record.args())
        })
        .try_init()
    {
        eprintln!("failed to setup logger: {e}");
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.verbose);

    let layout = if args.packed {
        Layout::Packed2Bit
    } else {
        Layout::BytePerGenotype
    };
    let mut fileset = Fileset::from_prefix_with_config(
        &args.prefix,
        ReaderConfig::default().with_layout(layout),
        MetadataConfig::variants(),
        MetadataConfig::samples(),
    )?;

    let header = fileset.header();
    println!("Variant count {}", header.variant_count);
    println!("Sample count {}", header.sample_count);

    let chunks = Chunks::new(&header, args.variant_chunk, args.sample_chunk)?;
    let n_chunks = chunks.n_chunks();

    let start = Instant::now();
    let mut counts = [0u64; 4];
    for (variants, samples) in chunks {
        let window = fileset.read_genotypes(variants, samples)?;
        for value in window.as_slice() {
            counts[value.code() as usize] += 1;
        }
    }
    let elapsed = start.elapsed();

    println!("Scanned {} windows in {:?}", n_chunks, elapsed);
    if header.variant_count > 0 {
        let first_ids = fileset.variant_ids(0..header.variant_count.min(3))?;
        println!("First variants: {}", first_ids.join(", "));
    }
    if header.sample_count > 0 {
        let first_samples = fileset.sample_ids(0..header.sample_count.min(3))?;
        println!("First samples: {}", first_samples.join(", "));
    }
    for value in [
        GenotypeValue::Zero,
        GenotypeValue::One,
        GenotypeValue::Two,
        GenotypeValue::Missing,
    ] {
        println!("  {:?}: {}", value, counts[value.code() as usize]);
    }

    Ok(())
}
