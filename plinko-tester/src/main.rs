mod harness;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;

use harness::{RunConfig, run};
use report::{ReportFormat, render};

#[derive(Debug, Parser)]
#[command(name = "plinko-tester", version)]
#[command(about = "Batch simulation and fairness QA for the Plinko drop engine")]
struct Args {
    /// Risk levels to sweep (comma-separated: low,medium,high)
    #[arg(long, default_value = "low,medium,high")]
    risks: String,

    /// Row counts to sweep (comma-separated, 8..=16)
    #[arg(long, default_value = "8,12,16")]
    rows: String,

    /// Seeds to run (comma-separated)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Drops per (risk, rows, seed) combination
    #[arg(long, default_value_t = 100_000)]
    drops: u64,

    /// Wager per drop
    #[arg(long, default_value_t = 1.0)]
    wager: f64,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the report instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn split_csv(input: &str) -> Vec<&str> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let risks = split_csv(&args.risks)
        .into_iter()
        .map(harness::parse_risk)
        .collect::<Result<Vec<_>>>()?;
    let rows = split_csv(&args.rows)
        .into_iter()
        .map(|r| r.parse::<u8>().with_context(|| format!("bad row count '{r}'")))
        .collect::<Result<Vec<_>>>()?;
    let seeds = split_csv(&args.seeds)
        .into_iter()
        .map(|s| s.parse::<u64>().with_context(|| format!("bad seed '{s}'")))
        .collect::<Result<Vec<_>>>()?;

    let mut summaries = Vec::new();
    for &risk in &risks {
        for &row_count in &rows {
            for &seed in &seeds {
                log::info!("running risk={risk} rows={row_count} seed={seed}");
                summaries.push(run(RunConfig {
                    risk,
                    rows: row_count,
                    seed,
                    drops: args.drops,
                    wager: args.wager,
                })?);
            }
        }
    }

    let rendered = render(&summaries, args.report)?;
    match &args.output {
        Some(path) => {
            fs::write(path, rendered).with_context(|| format!("writing {}", path.display()))?;
        }
        None => print!("{rendered}"),
    }

    let skewed = summaries.iter().filter(|s| !s.is_fair).count();
    if skewed > 0 {
        anyhow::bail!("{skewed} run(s) failed the fairness check");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_csv_trims_and_drops_empties() {
        assert_eq!(split_csv(" low, high ,"), vec!["low", "high"]);
    }
}
