use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::simulation::TimeSeries;
use crate::types::{Regime, RiskAssessment};

/// One line of the run log.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub seed: u64,
    pub ts_ms: i64,
    pub steps: usize,
    pub last_mid: Option<Decimal>,
    pub regime_counts: BTreeMap<Regime, usize>,
    pub risk: RiskAssessment,
}

impl RunReport {
    pub fn new(seed: u64, series: &TimeSeries, risk: RiskAssessment) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            seed,
            ts_ms: chrono::Utc::now().timestamp_millis(),
            steps: series.len(),
            last_mid: series.last_mid(),
            regime_counts: series.regime_counts(),
            risk,
        }
    }
}

pub async fn append_jsonl(path: &Option<String>, line: &str) -> anyhow::Result<()> {
    if let Some(p) = path.as_ref().map(|x| x.trim().to_string()).filter(|x| !x.is_empty()) {
        use tokio::io::AsyncWriteExt;
        let mut f = tokio::fs::OpenOptions::new().create(true).append(true).open(&p).await?;
        f.write_all(line.as_bytes()).await?;
        f.write_all(b"\n").await?;
    }
    Ok(())
}
