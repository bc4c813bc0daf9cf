use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Instant,
};

use clap::Parser;
use log::{error, info, warn};
use tmrlog_core::count_rows;
use tmrlog_recorder::{
    parse_timeout, DeviceKind, RecorderConfig, RecordingPipeline, DEFAULT_BATCH_SIZE, DEFAULT_BAUD,
    DEFAULT_PORT,
};

#[derive(Parser, Debug)]
#[command(
    name = "tmrlog-recorder",
    version = env!("CARGO_PKG_VERSION"),
    about = "Record TMR sensor readings from a serial port to CSV",
    long_about = None,
)]
struct Cli {
    /// Источник данных: serial, sim
    #[arg(short, long, default_value = "serial")]
    device: String,
    /// Последовательный порт
    #[arg(short, long, default_value = DEFAULT_PORT)]
    port: String,
    /// Скорость порта, бод
    #[arg(short, long, default_value_t = DEFAULT_BAUD)]
    baud: u32,
    /// Таймаут чтения строки (1, 0.5s, 250ms)
    #[arg(short, long, default_value = "1")]
    timeout: String,
    /// Корректных показаний в пачке
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,
    /// Разделитель полей в строке от микроконтроллера
    #[arg(long, default_value_t = 'x')]
    delimiter: char,
    /// Путь к выходному CSV файлу
    #[arg(short, long, default_value = "data.csv")]
    output: PathBuf,
    /// Остановиться после N пачек. По умолчанию: до Ctrl+C
    #[arg(short, long)]
    max_batches: Option<u64>,
    /// Интервал вывода статистики (секунды)
    #[arg(long, default_value = "5")]
    stats_interval: u64,
    /// Тихий режим (только ошибки)
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
    /// Подробный вывод (debug)
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    let level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };

    env_logger::Builder::new()
        .filter_level(level.parse().unwrap())
        .format_target(false)
        .format_timestamp_secs()
        .init();

    let device_kind: DeviceKind = match cli.device.parse() {
        Ok(d) => d,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };

    let read_timeout = match parse_timeout(&cli.timeout) {
        Ok(t) => t,
        Err(e) => {
            error!("--timeout: {e}");
            std::process::exit(1);
        }
    };

    let config = RecorderConfig {
        device: device_kind,
        port_path: cli.port.clone(),
        baud_rate: cli.baud,
        read_timeout,
        batch_size: cli.batch_size,
        delimiter: cli.delimiter,
        output_path: cli.output.clone(),
        max_batches: cli.max_batches,
        stats_interval_secs: cli.stats_interval,
    };

    if let Err(e) = config.validate() {
        error!("{e}");
        std::process::exit(1);
    }

    let (pipeline, metrics) = RecordingPipeline::new(config);
    let stop_flag: Arc<AtomicBool> = pipeline.stop_flag();

    let stop_ctrlc = stop_flag.clone();

    if let Err(e) = ctrlc::set_handler(move || {
        if stop_ctrlc.swap(true, Ordering::SeqCst) {
            // Второй Ctrl+C — принудительный выход
            warn!("Force exit");
            std::process::exit(130);
        }
        warn!("Ctrl+C received — dropping the unfinished batch and closing the port...");
    }) {
        warn!("Failed to set Ctrl+C handler: {e}");
    }

    // Выводим конфигурацию
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!("  Device        : {}", cli.device);
    info!("  Port          : {} @ {} baud", cli.port, cli.baud);
    info!("  Read timeout  : {:?}", read_timeout);
    info!("  Batch size    : {}", cli.batch_size);
    info!("  Delimiter     : {:?}", cli.delimiter);
    info!("  Output        : {:?}", cli.output);

    if cli.output.is_file() {
        match count_rows(&cli.output) {
            Ok(rows) => info!("  Existing rows : {rows} (appending, no header)"),
            Err(e) => warn!("  Existing file is not a tmrlog CSV ({e}); appending anyway"),
        }
    }

    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let session_start = Instant::now();

    if let Err(e) = pipeline.run() {
        error!("Recording failed: {e}");
        std::process::exit(1);
    }

    // --- Итоговая статистика ---
    let summary = metrics.summary(&session_start);
    info!("\n{summary}");

    if summary.discarded_samples > 0 {
        warn!(
            "⚠ {} samples from an unfinished batch were not written",
            summary.discarded_samples
        );
    }

    info!("✓ Recording complete: {:?}", cli.output);
}
