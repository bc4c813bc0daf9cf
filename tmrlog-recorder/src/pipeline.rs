use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

use log::{error, info, warn};
use tmrlog_core::{DataFileWriter, FlushReport};
use tmrlog_types::{parse_fields, split_fields, LineError, LineResult, Sample};

use crate::{
    device::{create_device, SensorDevice},
    metrics::RecorderMetrics,
    RecorderConfig, RecorderResult,
};

/// Через сколько подряд отброшенных строк предупреждать о шумной линии.
const NOISY_LINE_WARN_EVERY: u64 = 100;

/// Итог сбора одной пачки.
#[derive(Debug)]
pub enum BatchOutcome {
    /// Собрано ровно `batch_size` показаний
    Complete(Vec<Sample>),
    /// Сбор прерван stop-флагом; собранное не пишется
    Interrupted { collected: usize },
}

/// Оркестрирует сессию записи: пачка за пачкой, каждая со своим хэндлом
/// устройства.
pub struct RecordingPipeline {
    config: RecorderConfig,
    writer: DataFileWriter,
    metrics: Arc<RecorderMetrics>,
    stop_flag: Arc<AtomicBool>,
}

impl RecordingPipeline {
    /// Создаёт пайплайн. Возвращает также shared-ссылку на метрики.
    pub fn new(config: RecorderConfig) -> (Self, Arc<RecorderMetrics>) {
        let metrics = RecorderMetrics::new();
        let p = Self {
            writer: DataFileWriter::new(config.output_path.clone()),
            config,
            metrics: metrics.clone(),
            stop_flag: Arc::new(AtomicBool::new(false)),
        };

        (p, metrics)
    }

    /// Флаг остановки. Устанавливается в `true` для graceful shutdown.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }

    /// Запускает запись с устройством из конфигурации. Блокируется до
    /// stop-флага, лимита пачек или фатальной ошибки.
    pub fn run(self) -> RecorderResult<()> {
        self.run_with(create_device)
    }

    /// То же, что [`run`](Self::run), но устройство открывает `open_device`
    /// (вызывается в начале каждой пачки).
    pub fn run_with<F>(
        self,
        mut open_device: F,
    ) -> RecorderResult<()>
    where
        F: FnMut(&RecorderConfig) -> RecorderResult<Box<dyn SensorDevice>>,
    {
        let cfg = &self.config;
        let stats_interval = Duration::from_secs(cfg.stats_interval_secs);
        let session_start = Instant::now();
        let mut last_stats = Instant::now();
        let mut batches: u64 = 0;

        loop {
            if let Some(max) = cfg.max_batches {
                if batches >= max {
                    info!("Batch limit reached ({max}). Stopping...");
                    break;
                }
            }

            if self.stop_flag.load(Ordering::Relaxed) {
                info!("Stop signal received. Stopping...");
                break;
            }

            let mut device = open_device(cfg)?;
            let dev_info = device.info();
            info!(
                "Establishing connection with {} ({})...",
                dev_info.name,
                dev_info.port.as_deref().unwrap_or("-")
            );

            let outcome = self.collect_batch(device.as_mut())?;

            let interrupted = match outcome {
                BatchOutcome::Complete(batch) => {
                    self.flush_batch(batch)?;
                    batches += 1;
                    false
                }
                BatchOutcome::Interrupted { collected } => {
                    self.metrics
                        .discarded_samples
                        .fetch_add(collected as u64, Ordering::Relaxed);
                    if collected > 0 {
                        warn!(
                            "Batch interrupted: {collected}/{} samples discarded",
                            cfg.batch_size
                        );
                    }
                    true
                }
            };

            // Хэндл закрывается после записи пачки
            drop(device);
            info!("Connection closed");

            if interrupted {
                info!("Stop signal received. Stopping...");
                break;
            }

            if last_stats.elapsed() >= stats_interval {
                self.log_progress(&session_start);
                last_stats = Instant::now();
            }
        }

        Ok(())
    }

    /// Читает строки, пока не наберётся `batch_size` корректных показаний.
    ///
    /// Битые строки в счёт пачки не идут, поэтому попыток чтения может быть
    /// сколько угодно больше `batch_size`. Ошибка чтения устройства фатальна.
    pub fn collect_batch(
        &self,
        device: &mut dyn SensorDevice,
    ) -> RecorderResult<BatchOutcome> {
        let target = self.config.batch_size;
        let mut batch = Vec::with_capacity(target);
        let mut rejected_in_row: u64 = 0;

        while batch.len() < target {
            if self.stop_flag.load(Ordering::Relaxed) {
                return Ok(BatchOutcome::Interrupted {
                    collected: batch.len(),
                });
            }

            let line = device.read_line()?;
            self.metrics.lines_read.fetch_add(1, Ordering::Relaxed);

            match self.handle_line(&line, &mut batch) {
                Ok(()) => rejected_in_row = 0,
                Err(e) => {
                    error!("Error: {e}");
                    rejected_in_row += 1;

                    if rejected_in_row % NOISY_LINE_WARN_EVERY == 0 {
                        warn!(
                            "{rejected_in_row} lines in a row rejected ({}/{target} collected). \
                             Check wiring, baud rate and delimiter",
                            batch.len()
                        );
                    }
                }
            }
        }

        Ok(BatchOutcome::Complete(batch))
    }

    /// Разбирает одну строку и, если она корректна, добавляет показание с
    /// текущей меткой времени в `batch`.
    pub fn handle_line(
        &self,
        line: &str,
        batch: &mut Vec<Sample>,
    ) -> LineResult<()> {
        let fields = split_fields(line, self.config.delimiter);
        // Сырые поля печатаются для каждой попытки, в том числе отброшенной
        info!("{fields:?}");

        match parse_fields(&fields) {
            Ok(reading) => {
                batch.push(Sample::now(reading));
                self.metrics.samples_accepted.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(e) => {
                let counter = match &e {
                    LineError::Incomplete { .. } => &self.metrics.incomplete_lines,
                    LineError::InvalidNumber { .. } => &self.metrics.invalid_lines,
                };
                counter.fetch_add(1, Ordering::Relaxed);
                Err(e)
            }
        }
    }

    /// Пишет пачку в CSV файл. Пачка передаётся по значению и после записи
    /// больше не нужна.
    pub fn flush_batch(
        &self,
        batch: Vec<Sample>,
    ) -> RecorderResult<FlushReport> {
        let report = self.writer.append_batch(&batch)?;

        self.metrics.batches_flushed.fetch_add(1, Ordering::Relaxed);
        self.metrics
            .rows_written
            .fetch_add(report.rows as u64, Ordering::Relaxed);

        if report.header_written {
            info!("Created {:?} with header", self.writer.path());
        }
        info!("Data saved in {:?} ({} rows)", self.writer.path(), report.rows);

        Ok(report)
    }

    fn log_progress(
        &self,
        start: &Instant,
    ) {
        let m = &self.metrics;

        info!(
            "[ {:.0}s ] batches={} rows={} lines={} rejected={} ({:.2}%) rate={:.1}/s",
            start.elapsed().as_secs_f64(),
            m.batches_flushed.load(Ordering::Relaxed),
            m.rows_written.load(Ordering::Relaxed),
            m.lines_read.load(Ordering::Relaxed),
            m.rejected_lines(),
            m.reject_rate_pct(),
            m.samples_per_sec(start),
        );
    }
}
