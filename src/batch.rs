use anyhow::{Context, Result};
use futures::{stream, StreamExt};

use crate::simulation::{run_seeded, SimulationParams, TimeSeries};
use crate::source::SnapshotSource;

/// Run one independent simulation per seed on the blocking pool.
///
/// Each run gets its own source from `make_source`, its own generator and its
/// own series; nothing mutable is shared. Results come back in seed order.
pub async fn run_batch<F>(
    params: SimulationParams,
    seeds: &[u64],
    concurrency: usize,
    make_source: F,
) -> Result<Vec<(u64, TimeSeries)>>
where
    F: Fn() -> Box<dyn SnapshotSource>,
{
    tracing::debug!(runs = seeds.len(), conc = concurrency, "starting batch");

    let mut runs = stream::iter(seeds.iter().copied().map(|seed| {
        let mut source = make_source();
        async move {
            let series = tokio::task::spawn_blocking(move || run_seeded(&params, source.as_mut(), seed))
                .await
                .with_context(|| format!("run for seed {seed} panicked"))?
                .with_context(|| format!("run for seed {seed} failed"))?;
            Ok::<(u64, TimeSeries), anyhow::Error>((seed, series))
        }
    }))
    .buffered(concurrency.max(1));

    let mut out = Vec::with_capacity(seeds.len());
    while let Some(res) = runs.next().await {
        out.push(res?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SyntheticSource;

    #[tokio::test]
    async fn test_batch_matches_sequential_runs() {
        let params = SimulationParams { steps: 100, ..Default::default() };
        let seeds = [5, 6, 7, 8];

        let batch = run_batch(params, &seeds, 3, || Box::new(SyntheticSource::default()))
            .await
            .unwrap();

        assert_eq!(batch.iter().map(|(s, _)| *s).collect::<Vec<_>>(), seeds.to_vec());
        for (seed, series) in &batch {
            let alone = run_seeded(&params, &mut SyntheticSource::default(), *seed).unwrap();
            assert_eq!(series, &alone);
        }
    }

    #[tokio::test]
    async fn test_batch_propagates_run_failure() {
        let params = SimulationParams { steps: 0, ..Default::default() };
        let res = run_batch(params, &[1], 1, || Box::new(SyntheticSource::default())).await;
        assert!(res.is_err());
    }
}
