use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::types::RiskLevel;

/// Process-wide counters. Only touched between runs, never from inside one.
#[derive(Default)]
pub struct Stats {
    start_ms: AtomicU64,

    runs: AtomicU64,
    steps: AtomicU64,

    low_risk_runs: AtomicU64,
    medium_risk_runs: AtomicU64,
    high_risk_runs: AtomicU64,
}

impl Stats {
    pub fn new(now_ms: u64) -> Arc<Self> {
        let s = Arc::new(Self::default());
        s.start_ms.store(now_ms, Ordering::Relaxed);
        s
    }

    pub fn record_run(&self, steps: usize, level: RiskLevel) {
        self.runs.fetch_add(1, Ordering::Relaxed);
        self.steps.fetch_add(steps as u64, Ordering::Relaxed);
        let counter = match level {
            RiskLevel::Low => &self.low_risk_runs,
            RiskLevel::Medium => &self.medium_risk_runs,
            RiskLevel::High => &self.high_risk_runs,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn should_log(&self, every_runs: u64) -> bool {
        if every_runs == 0 { return false; }
        let runs = self.runs.load(Ordering::Relaxed);
        runs > 0 && runs % every_runs == 0
    }

    pub fn snapshot(&self, now_ms: u64) -> StatsSnapshot {
        let start = self.start_ms.load(Ordering::Relaxed);
        StatsSnapshot {
            now_ms,
            up_ms: now_ms.saturating_sub(start),
            runs: self.runs.load(Ordering::Relaxed),
            steps: self.steps.load(Ordering::Relaxed),
            low_risk_runs: self.low_risk_runs.load(Ordering::Relaxed),
            medium_risk_runs: self.medium_risk_runs.load(Ordering::Relaxed),
            high_risk_runs: self.high_risk_runs.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    pub now_ms: u64,
    pub up_ms: u64,
    pub runs: u64,
    pub steps: u64,
    pub low_risk_runs: u64,
    pub medium_risk_runs: u64,
    pub high_risk_runs: u64,
}
