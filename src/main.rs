//! Command-line driver: recovers one secret per share file.
use anyhow::{bail, Context, Result};
use clap::Parser;
use num_bigint::{BigInt, Sign};
use shamir_recover::batch::{solve_batch, Case};
use shamir_recover::config::Settings;
use shamir_recover::radix;
use shamir_recover::Shortfall;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "shamir-recover")]
#[command(about = "Recover Shamir secrets from base-N encoded share files")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Args {
    /// Share files to solve; each is labelled by its file stem
    ///
    /// When omitted, the cases from the config file are used, or
    /// testcase1.json and testcase2.json in the working directory.
    files: Vec<PathBuf>,

    /// TOML file with the shortfall policy and a list of cases
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Interpolate anyway when a file has fewer than k shares
    ///
    /// Such results are marked as best effort in the output.
    #[arg(long)]
    best_effort: bool,

    /// Also print each secret in this base
    #[arg(long, value_parser = clap::value_parser!(u32).range(2..=16))]
    echo_base: Option<u32>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging()?;

    let settings = match &args.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Settings::default(),
    };

    let shortfall = if args.best_effort {
        Shortfall::BestEffort
    } else {
        settings.shortfall
    };

    let cases: Vec<Case> = if args.files.is_empty() {
        settings.cases()
    } else {
        args.files.iter().cloned().map(Case::from_path).collect()
    };

    info!(cases = cases.len(), ?shortfall, "solving share files");

    let reports = solve_batch(&cases, shortfall);
    let mut failed = 0;

    for report in &reports {
        match &report.outcome {
            Ok(recovery) => {
                let mut line = format!("Secret from {}: {}", report.label, recovery.secret);
                if let Some(base) = args.echo_base {
                    line.push_str(&format!(
                        " (base {}: {})",
                        base,
                        in_base(&recovery.secret, base)?
                    ));
                }
                if !recovery.authoritative {
                    line.push_str(&format!(
                        " (best effort: only {} of {} shares)",
                        recovery.used, recovery.threshold
                    ));
                }
                println!("{}", line);
            }
            Err(e) => {
                failed += 1;
                eprintln!("Failed {}: {}", report.label, e);
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} cases failed", failed, reports.len());
    }
    Ok(())
}

fn in_base(value: &BigInt, base: u32) -> Result<String> {
    let digits = radix::encode(value.magnitude(), base)?;
    Ok(match value.sign() {
        Sign::Minus => format!("-{}", digits),
        _ => digits,
    })
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
