use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Instant,
};

/// Метрики сессии. Атомики — чтобы `main` мог читать их после `run`
/// и из обработчика Ctrl+C без блокировок.
#[derive(Debug, Default)]
pub struct RecorderMetrics {
    pub lines_read: AtomicU64,
    pub samples_accepted: AtomicU64,
    pub incomplete_lines: AtomicU64,
    pub invalid_lines: AtomicU64,
    pub batches_flushed: AtomicU64,
    pub rows_written: AtomicU64,
    pub discarded_samples: AtomicU64,
}

/// Snapshot метрик для отображения / тестирования.
#[derive(Debug, Clone)]
pub struct MetricsSummary {
    pub duration_secs: f64,
    pub lines_read: u64,
    pub samples_accepted: u64,
    pub incomplete_lines: u64,
    pub invalid_lines: u64,
    pub batches_flushed: u64,
    pub rows_written: u64,
    pub discarded_samples: u64,
    pub samples_per_sec: f64,
    pub reject_rate_pct: f64,
}

impl RecorderMetrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Отброшенных строк всего (обе причины).
    pub fn rejected_lines(&self) -> u64 {
        self.incomplete_lines.load(Ordering::Relaxed) + self.invalid_lines.load(Ordering::Relaxed)
    }

    /// Принятых показаний в секунду.
    pub fn samples_per_sec(
        &self,
        elapsed: &Instant,
    ) -> f64 {
        let secs = elapsed.elapsed().as_secs_f64();

        if secs < 1e-9 {
            return 0.0;
        }

        self.samples_accepted.load(Ordering::Relaxed) as f64 / secs
    }

    /// Процент отброшенных строк (0.0-100.0).
    pub fn reject_rate_pct(&self) -> f64 {
        let total = self.lines_read.load(Ordering::Relaxed);

        if total == 0 {
            0.0
        } else {
            self.rejected_lines() as f64 / total as f64 * 100.0
        }
    }

    /// Итоговая сводка для вывода в конце сессии.
    pub fn summary(
        &self,
        elapsed: &Instant,
    ) -> MetricsSummary {
        MetricsSummary {
            duration_secs: elapsed.elapsed().as_secs_f64(),
            lines_read: self.lines_read.load(Ordering::Relaxed),
            samples_accepted: self.samples_accepted.load(Ordering::Relaxed),
            incomplete_lines: self.incomplete_lines.load(Ordering::Relaxed),
            invalid_lines: self.invalid_lines.load(Ordering::Relaxed),
            batches_flushed: self.batches_flushed.load(Ordering::Relaxed),
            rows_written: self.rows_written.load(Ordering::Relaxed),
            discarded_samples: self.discarded_samples.load(Ordering::Relaxed),
            samples_per_sec: self.samples_per_sec(elapsed),
            reject_rate_pct: self.reject_rate_pct(),
        }
    }
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(f, "  Duration      : {:.1}s", self.duration_secs)?;
        writeln!(f, "  Lines read    : {}", self.lines_read)?;
        writeln!(f, "  Accepted      : {}", self.samples_accepted)?;
        writeln!(
            f,
            "  Rejected      : {} incomplete, {} non-numeric ({:.2}%)",
            self.incomplete_lines, self.invalid_lines, self.reject_rate_pct
        )?;
        writeln!(f, "  Batches       : {}", self.batches_flushed)?;
        writeln!(f, "  Rows written  : {}", self.rows_written)?;
        writeln!(f, "  Discarded     : {}", self.discarded_samples)?;
        writeln!(f, "  Rate          : {:.1} samples/s", self.samples_per_sec)?;
        write!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_initial_metrics_zero() {
        let metrics = RecorderMetrics::new();
        let start = Instant::now();
        let summary = metrics.summary(&start);

        assert_eq!(summary.lines_read, 0);
        assert_eq!(summary.samples_accepted, 0);
        assert_eq!(summary.incomplete_lines, 0);
        assert_eq!(summary.invalid_lines, 0);
        assert_eq!(summary.batches_flushed, 0);
        assert_eq!(summary.rows_written, 0);
        assert_eq!(summary.discarded_samples, 0);
        assert_eq!(summary.reject_rate_pct, 0.0);
    }

    #[test]
    fn test_reject_rate_calculation() {
        let metrics = RecorderMetrics::new();

        metrics.lines_read.store(200, Ordering::Relaxed);
        metrics.incomplete_lines.store(30, Ordering::Relaxed);
        metrics.invalid_lines.store(20, Ordering::Relaxed);

        assert_eq!(metrics.rejected_lines(), 50);
        assert!((metrics.reject_rate_pct() - 25.0).abs() < 1e-6);
    }

    #[test]
    fn test_samples_per_sec() {
        let metrics = RecorderMetrics::new();
        metrics.samples_accepted.store(1_000, Ordering::Relaxed);

        let start = Instant::now() - Duration::from_secs(2);
        let summary = metrics.summary(&start);

        // 1000 / 2s ≈ 500/s
        assert!((summary.samples_per_sec - 500.0).abs() < 5.0);
    }

    #[test]
    fn test_summary_display_mentions_counters() {
        let metrics = RecorderMetrics::new();
        metrics.batches_flushed.store(3, Ordering::Relaxed);
        metrics.rows_written.store(300, Ordering::Relaxed);

        let text = metrics.summary(&Instant::now()).to_string();
        assert!(text.contains("Batches       : 3"));
        assert!(text.contains("Rows written  : 300"));
    }
}
