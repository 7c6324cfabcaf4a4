use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use serde::Serialize;
use visionai_validate::{
    Document, Ontology, OntologyIndex, ValidateOptions, ValidationReport, Validator, validate_mask,
};

#[derive(Parser, Debug)]
#[command(name = "visionai-validate", version)]
struct Cli {
    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate VisionAI documents against an ontology.
    Check(CheckArgs),
    /// Print the compiled ontology index as JSON.
    Index(IndexArgs),
    /// Check a single RLE mask string.
    Mask(MaskArgs),
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Ontology JSON.
    #[arg(long)]
    ontology: PathBuf,

    /// VisionAI documents to validate.
    #[arg(long = "in", required = true, num_args = 1..)]
    in_paths: Vec<PathBuf>,

    /// Validation options JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print reports as JSON.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Override rayon worker threads.
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
struct IndexArgs {
    /// Ontology JSON.
    #[arg(long)]
    ontology: PathBuf,
}

#[derive(Parser, Debug)]
struct MaskArgs {
    /// RLE string, e.g. `4V0#6V1#`.
    #[arg(long)]
    rle: String,

    /// Tag vocabulary size.
    #[arg(long)]
    vocab: usize,

    /// Expected pixel total.
    #[arg(long)]
    area: Option<u64>,
}

#[derive(Serialize)]
struct DocumentReport<'a> {
    path: String,
    #[serde(flatten)]
    report: &'a ValidationReport,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Check(args) => cmd_check(args),
        Command::Index(args) => cmd_index(args),
        Command::Mask(args) => cmd_mask(args),
    }
}

fn load_ontology(path: &Path) -> anyhow::Result<Ontology> {
    Ontology::from_path(path).with_context(|| format!("load ontology '{}'", path.display()))
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<ExitCode> {
    let ontology = load_ontology(&args.ontology)?;
    let options = match &args.config {
        Some(p) => ValidateOptions::from_path(p)
            .with_context(|| format!("load options '{}'", p.display()))?,
        None => ValidateOptions::default(),
    };
    let validator = Validator::new(&ontology, options).context("compile ontology")?;

    let docs = args
        .in_paths
        .iter()
        .map(|p| Document::from_path(p).with_context(|| format!("load document '{}'", p.display())))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let reports = match args.threads {
        Some(n) => rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build()
            .context("build rayon thread pool")?
            .install(|| validator.validate_batch(&docs)),
        None => validator.validate_batch(&docs),
    };

    let all_valid = reports.iter().all(ValidationReport::is_valid);
    if args.json {
        let out: Vec<DocumentReport<'_>> = args
            .in_paths
            .iter()
            .zip(&reports)
            .map(|(p, report)| DocumentReport {
                path: p.display().to_string(),
                report,
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&out).context("serialize reports")?
        );
    } else {
        for (p, report) in args.in_paths.iter().zip(&reports) {
            if report.is_valid() {
                println!("{}: ok", p.display());
                continue;
            }
            println!("{}: {} error(s)", p.display(), report.errors.len());
            for m in report.messages() {
                println!("  {m}");
            }
        }
    }

    Ok(if all_valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn cmd_index(args: IndexArgs) -> anyhow::Result<ExitCode> {
    let ontology = load_ontology(&args.ontology)?;
    let index = OntologyIndex::build(&ontology).context("compile ontology")?;
    println!(
        "{}",
        serde_json::to_string_pretty(&index).context("serialize ontology index")?
    );
    Ok(ExitCode::SUCCESS)
}

fn cmd_mask(args: MaskArgs) -> anyhow::Result<ExitCode> {
    let errors = validate_mask(&args.rle, args.vocab, args.area);
    if errors.is_empty() {
        println!("ok");
        return Ok(ExitCode::SUCCESS);
    }
    for e in &errors {
        println!("{}: {e}", e.kind());
    }
    Ok(ExitCode::FAILURE)
}
