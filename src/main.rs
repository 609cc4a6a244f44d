use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use lob_liquidity::batch::run_batch;
use lob_liquidity::config::Settings;
use lob_liquidity::report::{append_jsonl, RunReport};
use lob_liquidity::risk::assess_risk;
use lob_liquidity::source::{ReplaySource, SnapshotSource, SyntheticSource};
use lob_liquidity::stats::Stats;

fn now_ms() -> u64 {
    chrono::Utc::now().timestamp_millis() as u64
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let s = Settings::from_env()?;
    let params = s.simulation_params();
    let risk_thresholds = s.risk_thresholds();
    let stats = Stats::new(now_ms());

    let replay = match s.replay_path.as_ref().filter(|p| !p.trim().is_empty()) {
        Some(p) => {
            let text = tokio::fs::read_to_string(p)
                .await
                .with_context(|| format!("read replay file {p}"))?;
            Some(ReplaySource::from_jsonl(&text)?)
        }
        None => None,
    };
    let tick = s.tick_size;
    let make_source = || -> Box<dyn SnapshotSource> {
        match &replay {
            Some(r) => Box::new(r.clone()),
            None => Box::new(SyntheticSource::new(tick)),
        }
    };

    tracing::info!(
        runs = s.runs,
        steps = s.steps,
        levels = s.levels,
        sigma = s.sigma,
        seed = s.seed,
        replay = replay.is_some(),
        "starting simulation"
    );

    let seeds = s.seeds();
    let results = run_batch(params, &seeds, s.batch_concurrency, make_source).await?;

    for (seed, series) in &results {
        let risk = assess_risk(series, s.lookback, &risk_thresholds)?;
        stats.record_run(series.len(), risk.risk_level);

        tracing::info!(
            seed = seed,
            steps = series.len(),
            last_mid = ?series.last_mid(),
            window = risk.window_len,
            avg_spread = %risk.avg_spread.round_dp(4),
            avg_liq_score = %risk.avg_liq_score.round_dp(2),
            frac_stressed = %risk.frac_stressed.round_dp(4),
            frac_high_liq = %risk.frac_high_liq.round_dp(4),
            risk_level = %risk.risk_level,
            "run assessed"
        );

        let report = RunReport::new(*seed, series, risk);
        let line = serde_json::to_string(&report)?;
        println!("{line}");
        append_jsonl(&s.report_jsonl_path, &line)
            .await
            .context("append run report")?;

        if stats.should_log(s.stats_log_every_runs) {
            let ss = stats.snapshot(now_ms());
            tracing::info!(
                up_ms = ss.up_ms,
                runs = ss.runs,
                steps = ss.steps,
                low = ss.low_risk_runs,
                medium = ss.medium_risk_runs,
                high = ss.high_risk_runs,
                "stats"
            );
        }
    }

    Ok(())
}
