//! Deterministic batch simulation harness.
//!
//! Each run drives one seeded session through a block of fast-path drops
//! and reduces the events to the same aggregate shape the analytics
//! dashboard reports, so a run's output can be eyeballed against
//! production numbers.

use anyhow::{Context, Result};
use serde::Serialize;

use plinko_game::numbers::{round_to_places, u64_to_f64};
use plinko_game::payout::{RiskLevel, catalog};
use plinko_game::probability::{SlotRegion, distribution, region_of_slot};
use plinko_game::session::PlinkoSession;

/// Largest drop block issued per `auto_drop` call.
const BATCH: u32 = 10_000;

/// Configuration for one simulation run.
#[derive(Debug, Clone, Copy)]
pub struct RunConfig {
    pub risk: RiskLevel,
    pub rows: u8,
    pub seed: u64,
    pub drops: u64,
    pub wager: f64,
}

/// Win-band rates over a run, percentages of all drops.
#[derive(Debug, Clone, Copy, Serialize, Default)]
pub struct WinBands {
    pub loss_rate: f64,
    pub small_win_rate: f64,
    pub medium_win_rate: f64,
    pub big_win_rate: f64,
    pub jackpot_rate: f64,
}

/// Aggregate outcome of one run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub risk: RiskLevel,
    pub rows: u8,
    pub seed: u64,
    pub drops: u64,
    pub slot_counts: Vec<u64>,
    pub most_hit_slot: usize,
    pub edge_rate: f64,
    pub center_rate: f64,
    pub realized_rtp: f64,
    pub avg_multiplier: f64,
    pub max_multiplier: f64,
    pub bands: WinBands,
    pub chi_square: f64,
    pub is_fair: bool,
}

/// Parse a risk level from its wire name.
pub fn parse_risk(value: &str) -> Result<RiskLevel> {
    match value.trim().to_ascii_lowercase().as_str() {
        "low" => Ok(RiskLevel::Low),
        "medium" => Ok(RiskLevel::Medium),
        "high" => Ok(RiskLevel::High),
        other => anyhow::bail!("unknown risk level '{other}' (expected low|medium|high)"),
    }
}

/// Approximate 95% chi-square critical value for `df` degrees of freedom.
///
/// Matches the dashboard's fixed 25-point cutoff at df 15 and scales for
/// the other board depths.
fn chi_square_critical(df: u8) -> f64 {
    let df = f64::from(df);
    df + (8.0 * df).sqrt()
}

/// Run one seeded block of drops and summarize it.
pub fn run(config: RunConfig) -> Result<RunSummary> {
    let mut session = PlinkoSession::new(config.seed);
    session
        .select_rows(config.rows)
        .with_context(|| format!("selecting {} rows", config.rows))?;
    session
        .select_risk(config.risk)
        .context("selecting risk level")?;
    session.set_wager(config.wager);

    let max_multiplier = catalog().max_multiplier(config.risk, config.rows)?;
    let mut slot_counts = vec![0u64; usize::from(config.rows) + 1];
    let mut bands = WinBands::default();
    let mut paid = 0.0f64;
    let mut multiplier_sum = 0.0f64;

    let mut remaining = config.drops;
    while remaining > 0 {
        let block = u32::try_from(remaining.min(u64::from(BATCH))).expect("block fits u32");
        let events = session
            .auto_drop(block, 0)
            .context("simulating drop block")?;
        for event in &events {
            slot_counts[usize::from(event.slot)] += 1;
            paid += event.payout();
            multiplier_sum += event.multiplier;
            if event.multiplier >= max_multiplier {
                bands.jackpot_rate += 1.0;
            }
            if event.multiplier < 1.0 {
                bands.loss_rate += 1.0;
            } else if event.multiplier < 2.0 {
                bands.small_win_rate += 1.0;
            } else if event.multiplier < 10.0 {
                bands.medium_win_rate += 1.0;
            } else {
                bands.big_win_rate += 1.0;
            }
        }
        remaining -= u64::from(block);
    }

    let n = u64_to_f64(config.drops);
    let to_pct = |count: f64| round_to_places(count / n * 100.0, 2);
    bands = WinBands {
        loss_rate: to_pct(bands.loss_rate),
        small_win_rate: to_pct(bands.small_win_rate),
        medium_win_rate: to_pct(bands.medium_win_rate),
        big_win_rate: to_pct(bands.big_win_rate),
        jackpot_rate: round_to_places(bands.jackpot_rate / n * 100.0, 4),
    };

    let model = distribution(config.rows);
    let chi_square = slot_counts
        .iter()
        .zip(&model)
        .map(|(count, p)| {
            let expected = p * n;
            let diff = u64_to_f64(*count) - expected;
            diff * diff / expected
        })
        .sum::<f64>();

    let most_hit_slot = slot_counts
        .iter()
        .enumerate()
        .max_by_key(|(_, count)| **count)
        .map_or(0, |(slot, _)| slot);

    let mut edge_hits = 0u64;
    let mut center_hits = 0u64;
    for (slot, count) in slot_counts.iter().enumerate() {
        let slot = u8::try_from(slot).expect("slot fits u8");
        match region_of_slot(config.rows, slot) {
            SlotRegion::Edge => edge_hits += count,
            SlotRegion::Center => center_hits += count,
            SlotRegion::Shoulder => {}
        }
    }

    let wagered = n * config.wager;
    Ok(RunSummary {
        risk: config.risk,
        rows: config.rows,
        seed: config.seed,
        drops: config.drops,
        slot_counts,
        most_hit_slot,
        edge_rate: round_to_places(u64_to_f64(edge_hits) / n * 100.0, 2),
        center_rate: round_to_places(u64_to_f64(center_hits) / n * 100.0, 2),
        realized_rtp: round_to_places(paid / wagered * 100.0, 2),
        avg_multiplier: round_to_places(multiplier_sum / n, 4),
        max_multiplier,
        bands,
        chi_square: round_to_places(chi_square, 4),
        is_fair: chi_square < chi_square_critical(config.rows),
    })
}
