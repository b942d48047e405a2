#![forbid(unsafe_code)]

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;

use mulcert::{verify, Certificate, ProofFormat, Verdict, VerifyOptionsBuilder};
use mulcert_aiger::load_file::load_file;
use mulcert_aiger::{AigModel, ParseOptionsBuilder};

mod stats;
mod util;
use util::HDuration;

// spell-checker:ignore aigsim

/// Exit code for incorrect multipliers
const EXIT_INCORRECT: u8 = 10;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    mode: Mode,

    /// Treat operands and product as two's complement numbers
    #[arg(long, global = true)]
    signed: bool,

    /// Do not compute counter-examples for incorrect multipliers
    #[arg(long, global = true)]
    no_counter_examples: bool,

    /// Verbosity: 0 quiet, 1 phases, 2 details, 3 and 4 everything
    ///
    /// The `RUST_LOG` environment variable takes precedence.
    #[arg(long, short = 'v', default_value_t = 1, value_parser = clap::value_parser!(u8).range(0..=4), global = true)]
    verbosity: u8,

    /// Always output durations as seconds (floating point)
    #[arg(long, global = true)]
    durations_as_secs: bool,

    /// Write run statistics to the given CSV file
    #[arg(long, global = true)]
    stats: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Check that an AIG implements a multiplier
    Verify {
        /// AIGER input file
        file: PathBuf,
    },
    /// Check that an AIG implements a multiplier and write a certificate
    Certify {
        /// AIGER input file
        file: PathBuf,
        /// Output file for the gate polynomials
        polys: PathBuf,
        /// Output file for the proof
        proof: PathBuf,
        /// Output file for the specification
        spec: PathBuf,
        /// Kind of certificate
        #[arg(value_enum, long, short = 'p', default_value_t = ProofFormatArg::Condensed)]
        proof_format: ProofFormatArg,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
enum ProofFormatArg {
    /// PAC proof logging every multiplication and addition
    Expanded,
    /// PAC proof with one linear combination per slice
    Condensed,
    /// Nullstellensatz certificate
    Nullstellensatz,
}

impl From<ProofFormatArg> for ProofFormat {
    fn from(value: ProofFormatArg) -> Self {
        match value {
            ProofFormatArg::Expanded => ProofFormat::Expanded,
            ProofFormatArg::Condensed => ProofFormat::Condensed,
            ProofFormatArg::Nullstellensatz => ProofFormat::Nullstellensatz,
        }
    }
}

impl Mode {
    fn file(&self) -> &Path {
        match self {
            Mode::Verify { file } | Mode::Certify { file, .. } => file,
        }
    }
}

fn create(path: &Path) -> BufWriter<fs::File> {
    match fs::File::create(path) {
        Ok(f) => BufWriter::new(f),
        Err(e) => {
            eprintln!("error: could not create '{}' ({e})", path.display());
            std::process::exit(1);
        }
    }
}

fn init_logger(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Off,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_target(false)
        .format_timestamp(None)
        .parse_default_env()
        .init();
}

/// Write the counter-examples next to `file` and print how to replay them
fn report_counter_examples(file: &Path, counter_examples: &[Vec<bool>], num_inputs: usize) {
    let cex_path = file.with_extension("cex");
    let mut out = create(&cex_path);
    if let Err(e) = mulcert::write_counter_examples(&mut out, counter_examples) {
        eprintln!("error: could not write '{}' ({e})", cex_path.display());
        std::process::exit(1);
    }

    println!("counter-examples (inputs in file order):");
    for w in counter_examples {
        let ones: Vec<String> = (0..num_inputs)
            .filter(|&i| w[i])
            .map(|i| format!("input {i}"))
            .collect();
        if ones.is_empty() {
            println!("  all inputs = 0");
        } else {
            println!("  {} = 1, all other inputs = 0", ones.join(", "));
        }
    }
    println!("counter-examples are written to '{}'", cex_path.display());
    println!(
        "run 'aigsim {} {}' from the AIGER tools to simulate them",
        file.display(),
        cex_path.display()
    );
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    util::DURATIONS_AS_SECS.store(cli.durations_as_secs, std::sync::atomic::Ordering::Relaxed);
    init_logger(cli.verbosity);

    let start = Instant::now();
    let file = cli.mode.file();
    let parse_options = ParseOptionsBuilder::default().build().unwrap();
    let Some(aig) = load_file(file, &parse_options) else {
        return ExitCode::FAILURE;
    };
    let parse_time = start.elapsed();
    log::info!(
        "parsed '{}' ({} inputs, {} outputs, {} AND gates) in {}",
        file.display(),
        aig.num_inputs(),
        aig.num_outputs(),
        aig.num_ands(),
        HDuration(parse_time)
    );

    let mut options = VerifyOptionsBuilder::default();
    options
        .signed(cli.signed)
        .counter_examples(!cli.no_counter_examples);

    let result = match &cli.mode {
        Mode::Verify { .. } => {
            let options = options.build().unwrap();
            verify(&aig, &options, None)
        }
        Mode::Certify {
            polys,
            proof,
            spec,
            proof_format,
            ..
        } => {
            let options = options.proof_format((*proof_format).into()).build().unwrap();
            log::info!("certificate: {:?}", options.proof_format);
            let (mut polys, mut proof, mut spec) = (create(polys), create(proof), create(spec));
            let certificate = Certificate {
                polys: &mut polys,
                proof: &mut proof,
                spec: &mut spec,
            };
            verify(&aig, &options, Some(certificate))
        }
    };

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(e.exit_code() as u8);
        }
    };

    let correct = match &outcome.verdict {
        Verdict::Correct => {
            println!("RESULT: CORRECT MULTIPLIER");
            true
        }
        Verdict::Incorrect {
            remainder,
            counter_examples,
        } => {
            println!("RESULT: INCORRECT MULTIPLIER");
            println!("remainder: {remainder}");
            if !counter_examples.is_empty() {
                report_counter_examples(file, counter_examples, aig.num_inputs());
            }
            false
        }
    };
    if let Err(e) = io::stdout().flush() {
        eprintln!("error: could not write to stdout ({e})");
    }

    let total = start.elapsed();
    let memory = stats::used_memory();
    if cli.verbosity > 0 {
        stats::print(&outcome.stats, parse_time, total, memory);
    }
    if let Some(path) = &cli.stats {
        let res = stats::write_csv(path, file, correct, &outcome.stats, parse_time, total, memory);
        if let Err(e) = res {
            eprintln!("error: could not write statistics to '{}' ({e})", path.display());
            return ExitCode::FAILURE;
        }
    }

    if correct {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_INCORRECT)
    }
}
