use anyhow::{Result, bail};
use clap::Parser;
use strum::IntoEnumIterator;

use regsearch::{ConstantStatus, count_models};

/// Prints how many specifications a search would evaluate, without evaluating any.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of candidate regressors
    #[arg(short, long)]
    regressors: usize,

    /// Maximum lag depth N (lags 0..=N are tried)
    #[arg(short = 'n', long, default_value_t = 0)]
    max_lag_depth: usize,

    /// include, exclude or test. Omit to print all three.
    #[arg(short, long)]
    constant_status: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let statuses: Vec<ConstantStatus> = match &args.constant_status {
        Some(raw) => match raw.parse::<ConstantStatus>() {
            Ok(status) => vec![status],
            Err(_) => bail!("Unknown constant status {:?} (expected include, exclude or test)", raw),
        },
        None => ConstantStatus::iter().collect(),
    };

    for status in statuses {
        println!(
            "k={} N={} constant={}: {}",
            args.regressors,
            args.max_lag_depth,
            status,
            count_models(args.regressors, args.max_lag_depth, status)
        );
    }
    Ok(())
}
