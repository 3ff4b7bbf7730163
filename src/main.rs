use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use client_extract::{ExtractionReport, Extractor, RejectReason, Settings};

#[derive(Parser)]
#[command(name = "client_extract", about = "Extract client records from free text")]
struct Cli {
    /// Settings file (TOML/JSON/YAML); CLIENT_EXTRACT_* env vars override it
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract records from one document and print them as JSON
    Extract {
        /// Input file (default: stdin)
        path: Option<PathBuf>,
        /// Print the full report including rejections
        #[arg(long)]
        report: bool,
        #[arg(long)]
        pretty: bool,
    },
    /// Extract from several documents in parallel
    Batch {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Write <stem>.json per input into this directory
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Show why lines of a document were skipped
    Stats {
        /// Input file (default: stdin)
        path: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;
    let lexicon = settings.lexicon()?;
    let extractor = Extractor::new(settings, lexicon);

    match cli.command {
        Commands::Extract { path, report, pretty } => {
            let text = read_input(path.as_deref())?;
            let result = extractor.extract_with_report(&text);
            let json = if report {
                to_json(&result, pretty)?
            } else {
                to_json(&result.records, pretty)?
            };
            println!("{}", json);
        }
        Commands::Batch { paths, out } => {
            if let Some(dir) = &out {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("creating {}", dir.display()))?;
            }
            let counts = process_documents(&extractor, &paths, out.as_deref())?;
            counts.print();
        }
        Commands::Stats { path } => {
            let text = read_input(path.as_deref())?;
            let report = extractor.extract_with_report(&text);
            print_stats(&report);
        }
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        eprintln!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }
    Ok(())
}

fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(p) => std::fs::read_to_string(p).with_context(|| format!("reading {}", p.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).context("reading stdin")?;
            Ok(buf)
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> anyhow::Result<String> {
    Ok(if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    })
}

#[derive(Default)]
struct BatchCounts {
    documents: usize,
    records: usize,
    rejected: usize,
    failed: usize,
}

impl BatchCounts {
    fn print(&self) {
        println!(
            "Processed {} documents: {} records, {} rejected segments, {} unreadable.",
            self.documents, self.records, self.rejected, self.failed,
        );
    }
}

fn process_documents(
    extractor: &Extractor,
    paths: &[PathBuf],
    out: Option<&Path>,
) -> anyhow::Result<BatchCounts> {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let pb = ProgressBar::new(paths.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let results: Vec<(&PathBuf, anyhow::Result<ExtractionReport>)> = paths
        .par_iter()
        .map(|path| {
            let result = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))
                .map(|text| extractor.extract_with_report(&text));
            pb.inc(1);
            (path, result)
        })
        .collect();
    pb.finish_and_clear();

    let mut counts = BatchCounts::default();
    for (path, result) in results {
        counts.documents += 1;
        let report = match result {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "skipping document");
                counts.failed += 1;
                continue;
            }
        };
        counts.records += report.records.len();
        counts.rejected += report.rejections.len();

        if let Some(dir) = out {
            let stem = path.file_stem().unwrap_or(path.as_os_str());
            let target = dir.join(stem).with_extension("json");
            std::fs::write(&target, to_json(&report.records, true)?)
                .with_context(|| format!("writing {}", target.display()))?;
        }
    }

    Ok(counts)
}

fn print_stats(report: &ExtractionReport) {
    println!("Lines:     {}", report.lines);
    println!("Segments:  {}", report.segments);
    println!("Accepted:  {}", report.records.len());
    println!("Rejected:  {}", report.rejections.len());

    let counts = report.rejection_counts();
    if !counts.is_empty() {
        println!("\n--- Rejections ---");
        for reason in RejectReason::ALL {
            if let Some(n) = counts.get(&reason) {
                println!("  {:<16} {:>5}", reason.as_str(), n);
            }
        }
        println!("\n--- Samples ---");
        for r in report.rejections.iter().take(10) {
            println!("  line {:>4} [{}] {}", r.line, r.reason.as_str(), r.excerpt);
        }
    }
}
