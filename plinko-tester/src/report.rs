//! Report rendering for simulation runs.

use anyhow::Result;
use colored::Colorize;
use std::fmt::Write as _;

use crate::harness::RunSummary;

/// Output format for a batch of run summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    /// Colorized human-readable console output
    Console,
    /// Machine-readable JSON
    Json,
    /// Markdown table for issue reports
    Markdown,
}

/// Render every summary in the requested format.
pub fn render(summaries: &[RunSummary], format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Console => Ok(render_console(summaries)),
        ReportFormat::Json => Ok(serde_json::to_string_pretty(summaries)?),
        ReportFormat::Markdown => Ok(render_markdown(summaries)),
    }
}

fn fairness_tag(summary: &RunSummary) -> String {
    if summary.is_fair {
        format!("{}", "fair".green())
    } else {
        format!("{}", "SKEWED".red().bold())
    }
}

fn render_console(summaries: &[RunSummary]) -> String {
    let mut out = String::new();
    for summary in summaries {
        let _ = writeln!(
            out,
            "{} risk={} rows={} seed={} drops={}",
            "run".bold(),
            summary.risk.to_string().cyan(),
            summary.rows,
            summary.seed,
            summary.drops
        );
        let _ = writeln!(
            out,
            "  rtp {:.2}%  avg x{:.4}  most-hit slot {}  edge {:.2}%  center {:.2}%  chi2 {:.2} [{}]",
            summary.realized_rtp,
            summary.avg_multiplier,
            summary.most_hit_slot,
            summary.edge_rate,
            summary.center_rate,
            summary.chi_square,
            fairness_tag(summary)
        );
        let _ = writeln!(
            out,
            "  bands: loss {:.2}% | small {:.2}% | medium {:.2}% | big {:.2}% | jackpot {:.4}%",
            summary.bands.loss_rate,
            summary.bands.small_win_rate,
            summary.bands.medium_win_rate,
            summary.bands.big_win_rate,
            summary.bands.jackpot_rate
        );
    }
    out
}

fn render_markdown(summaries: &[RunSummary]) -> String {
    let mut out = String::from(
        "| risk | rows | seed | drops | rtp % | avg x | chi2 | fair | jackpot % |\n\
         |------|------|------|-------|-------|-------|------|------|-----------|\n",
    );
    for s in summaries {
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} | {:.2} | {:.4} | {:.2} | {} | {:.4} |",
            s.risk, s.rows, s.seed, s.drops, s.realized_rtp, s.avg_multiplier, s.chi_square,
            s.is_fair, s.bands.jackpot_rate
        );
    }
    out
}
