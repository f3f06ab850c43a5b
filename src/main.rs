extern crate env_logger;
#[macro_use]
extern crate log;

use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::Parser;

use fasta2fastq::{fasta, pair, qual};

/// Merge a FASTA file and its matching QUAL file into Phred+33 FASTQ.
///
/// Both files must list the same records in the same order; identifiers
/// and lengths are validated record by record. The FASTQ output is
/// streamed, so arbitrarily large inputs can be processed.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Input FASTA file
    fasta: PathBuf,

    /// Matching QUAL file with one integer score per base
    qual: PathBuf,

    /// Write the FASTQ output here instead of standard output
    #[arg(short, long)]
    output: Option<String>,
}

/// Creates a `BufWriter` for the given output option: a file if a path was
/// passed, standard output otherwise.
fn get_writer(output: &Option<String>) -> Result<impl Write> {
    let writer = BufWriter::new(match output {
        Some(ref x) => {
            let file = File::create(Path::new(x))
                .with_context(|| format!("could not create output file {}", x))?;
            Box::new(file) as Box<dyn Write + Send>
        }
        None => Box::new(stdout()) as Box<dyn Write + Send>,
    });
    Ok(writer)
}

fn try_main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .init();

    let cli = Cli::parse();

    let fasta = fasta::Reader::from_path(&cli.fasta)
        .with_context(|| format!("could not open FASTA file {}", cli.fasta.display()))?;
    let qual = qual::Reader::from_path(&cli.qual)
        .with_context(|| format!("could not open QUAL file {}", cli.qual.display()))?;
    let mut writer = get_writer(&cli.output)?;

    let written = pair::convert(fasta, qual, &mut writer)?;
    info!("wrote {} FASTQ records", written);

    Ok(())
}

fn main() {
    if let Err(err) = try_main() {
        error!("{}", err);

        // report any underlying causes
        err.chain()
            .skip(1)
            .for_each(|cause| error!("  because: {}", cause));

        process::exit(1);
    }
}
